// Prevent console window in addition to Slint window in Windows release builds when, e.g., starting the app via file manager. Ignored on other platforms.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

slint::include_modules!();

mod camera_source;
mod dht11;
mod led_bank;
mod motor;
mod ultrasonic;

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use anyhow::Context;

use carrito_common::camera::{self, ColorMode, FrameSourcePointer};
use carrito_common::drive::DriveState;
use carrito_common::history::SharedHistory;
use carrito_common::leds;
use carrito_common::sample::{ClimateSample, DistanceReading};
use carrito_common::Latest;

use dht11::Dht11;
use led_bank::LedBank;
use motor::MotorDriver;
use ultrasonic::Ultrasonic;

// Wiring, BCM numbering.
const TRIGGER_PIN: u8 = 20;
const ECHO_PIN: u8 = 21;
const DHT_PIN: u8 = 23;
const MOTOR_PINS: [u8; 4] = [6, 13, 19, 26];
const LED_PINS: [u8; 5] = [4, 5, 7, 8, 9];

const CLIMATE_PERIOD: Duration = Duration::from_secs(3);
const DISTANCE_PERIOD: Duration = Duration::from_millis(500);
const FRAME_PERIOD: Duration = Duration::from_millis(10);
const DHT_ATTEMPTS: u32 = 5;

/// The car console: the UI, the owned hardware resources and three sampler
/// threads publishing into slots the UI timer drains.
///
/// The distance history is the only state shared between a sampler and the
/// UI; everything else is a single-writer slot or thread-local.
struct App {
    ui: AppWindow,
    timer: slint::Timer,
    history_lines: std::rc::Rc<slint::VecModel<slint::SharedString>>,
    motor: Arc<Mutex<MotorDriver>>,
    led_bank: Arc<Mutex<LedBank>>,
    history: SharedHistory<f64>,
    climate_slot: Latest<ClimateSample>,
    distance_slot: Latest<DistanceReading>,
    frame_slot: Latest<camera::Frame>,
    color_mode: Arc<AtomicU8>,
    // The camera thread is the one sampler that gets stopped and joined on
    // shutdown, so its source is dropped and the capture device released.
    camera_stop: Arc<AtomicBool>,
    camera_thread: Option<thread::JoinHandle<()>>,
    // Handed over to their sampler threads in run().
    dht: Option<Dht11>,
    ranger: Option<Ultrasonic>,
    frames: Option<FrameSourcePointer>,
}

impl App {
    const RENDER_INTERVAL: Duration = Duration::from_millis(50);

    fn new() -> anyhow::Result<Self> {
        let ui = AppWindow::new()?;

        // Missing hardware at startup is fatal, there is nothing useful to
        // show without it.
        let gpio = rppal::gpio::Gpio::new().context("GPIO is not available on this machine")?;
        let ranger = Ultrasonic::new(&gpio, TRIGGER_PIN, ECHO_PIN)
            .context("could not claim the ultrasonic pins")?;
        let dht = Dht11::new(&gpio, DHT_PIN).context("could not claim the DHT11 pin")?;
        let motor = MotorDriver::new(&gpio, MOTOR_PINS).context("could not claim the motor pins")?;
        let led_bank = LedBank::new(&gpio, &LED_PINS).context("could not claim the LED pins")?;
        let frames = open_frame_source()?;

        let history_lines: std::rc::Rc<slint::VecModel<slint::SharedString>> =
            std::rc::Rc::default();
        ui.global::<ViewModel>()
            .set_history_lines(slint::ModelRc::from(history_lines.clone()));

        Ok(Self {
            ui,
            timer: slint::Timer::default(),
            history_lines,
            motor: Arc::new(Mutex::new(motor)),
            led_bank: Arc::new(Mutex::new(led_bank)),
            history: SharedHistory::default(),
            climate_slot: Latest::new(),
            distance_slot: Latest::new(),
            frame_slot: Latest::new(),
            color_mode: Arc::new(AtomicU8::new(ColorMode::Color.as_u8())),
            camera_stop: Arc::new(AtomicBool::new(false)),
            camera_thread: None,
            dht: Some(dht),
            ranger: Some(ranger),
            frames: Some(frames),
        })
    }

    /// Wires the button callbacks, spawns the sampler threads and runs the
    /// event loop. The climate and distance threads are never joined and die
    /// with the process; the camera thread is stopped first so the capture
    /// device is released.
    fn run(&mut self) -> anyhow::Result<()> {
        self.wire_callbacks();
        self.spawn_climate_sampler();
        self.spawn_distance_sampler();
        self.spawn_camera_sampler();
        self.start_render_timer();

        let result = self.ui.run();

        // Leave the bench in a quiet state before the process terminates:
        // release the camera, stop the motors, darken the LEDs.
        self.camera_stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.camera_thread.take() {
            let _ = handle.join();
        }
        self.motor.lock().unwrap().set_state(DriveState::Stop);
        self.led_bank.lock().unwrap().clear();

        result.map_err(|e| e.into())
    }

    fn wire_callbacks(&self) {
        let model = self.ui.global::<ViewModel>();

        let drive = |state: DriveState| {
            let motor = self.motor.clone();
            move || motor.lock().unwrap().set_state(state)
        };
        model.on_drive_forward(drive(DriveState::Forward));
        model.on_drive_reverse(drive(DriveState::Reverse));
        model.on_drive_left(drive(DriveState::Left));
        model.on_drive_right(drive(DriveState::Right));
        model.on_drive_stop(drive(DriveState::Stop));

        let color_mode = self.color_mode.clone();
        model.on_set_color_mode(move |code| match ColorMode::from_code(code.as_str()) {
            Some(mode) => color_mode.store(mode.as_u8(), Ordering::Relaxed),
            None => log::warn!("unknown color mode {code:?}"),
        });

        model.on_close_requested(|| {
            let _ = slint::quit_event_loop();
        });
    }

    fn spawn_climate_sampler(&mut self) {
        let mut dht = self.dht.take().expect("dht is set in new()");
        let slot = self.climate_slot.clone();
        thread::spawn(move || loop {
            match dht.read_retry(DHT_ATTEMPTS) {
                Ok(sample) => {
                    log::info!(
                        "temperature {:.1} °C, humidity {:.1} %",
                        sample.temperature_celsius,
                        sample.humidity_percent
                    );
                    slot.set(sample);
                }
                Err(err) => log::error!("climate read failed: {err}"),
            }
            thread::sleep(CLIMATE_PERIOD);
        });
    }

    fn spawn_distance_sampler(&mut self) {
        let mut ranger = self.ranger.take().expect("ranger is set in new()");
        let led_bank = self.led_bank.clone();
        let motor = self.motor.clone();
        let history = self.history.clone();
        let slot = self.distance_slot.clone();
        thread::spawn(move || loop {
            match ranger.measure() {
                Ok(distance_cm) => {
                    let leds_on = leds::led_count(distance_cm);
                    led_bank.lock().unwrap().show(leds_on);
                    if leds::should_auto_stop(distance_cm) {
                        log::warn!("obstacle at {distance_cm} cm, stopping");
                        motor.lock().unwrap().set_state(DriveState::Stop);
                    }
                    history.record(distance_cm);
                    slot.set(DistanceReading {
                        distance_cm,
                        leds_on,
                    });
                }
                Err(err) => log::warn!("distance sample skipped: {err}"),
            }
            thread::sleep(DISTANCE_PERIOD);
        });
    }

    fn spawn_camera_sampler(&mut self) {
        let frames = self.frames.take().expect("frames are set in new()");
        let color_mode = self.color_mode.clone();
        let slot = self.frame_slot.clone();
        let stop = self.camera_stop.clone();
        self.camera_thread = Some(thread::spawn(move || {
            camera_loop(frames, color_mode, slot, stop);
        }));
    }

    fn start_render_timer(&self) {
        let ui_handle = self.ui.as_weak();
        let history_lines = self.history_lines.clone();
        let history = self.history.clone();
        let climate_slot = self.climate_slot.clone();
        let distance_slot = self.distance_slot.clone();
        let frame_slot = self.frame_slot.clone();

        self.timer
            .start(slint::TimerMode::Repeated, Self::RENDER_INTERVAL, move || {
                let ui = ui_handle.unwrap();
                let model = ViewModel::get(&ui);

                if let Some(sample) = climate_slot.take() {
                    model.set_temperature_text(slint::format!(
                        "Temperature: {:.2} °C",
                        sample.temperature_celsius
                    ));
                    model.set_humidity_text(slint::format!(
                        "Humidity: {:.2} %",
                        sample.humidity_percent
                    ));
                }

                if let Some(reading) = distance_slot.take() {
                    model.set_distance_text(slint::format!(
                        "Distance: {:.2} cm",
                        reading.distance_cm
                    ));
                    model.set_leds_on(reading.leds_on as i32);
                    history_lines.set_vec(
                        history
                            .snapshot()
                            .into_iter()
                            .map(|d| slint::format!("{d:.2} cm"))
                            .collect::<Vec<_>>(),
                    );
                }

                if let Some(frame) = frame_slot.take() {
                    let mut buffer = slint::SharedPixelBuffer::<slint::Rgb8Pixel>::new(
                        frame.width,
                        frame.height,
                    );
                    buffer.make_mut_bytes().copy_from_slice(&frame.rgb);
                    model.set_video_frame(slint::Image::from_rgb8(buffer));
                }
            });
    }
}

/// Grabs, transforms and publishes frames until `stop` is raised, then
/// returns, dropping the source so the capture device is released.
fn camera_loop(
    mut frames: FrameSourcePointer,
    color_mode: Arc<AtomicU8>,
    slot: Latest<camera::Frame>,
    stop: Arc<AtomicBool>,
) {
    while !stop.load(Ordering::Relaxed) {
        match frames.next_frame() {
            Ok(mut frame) => {
                camera::apply(ColorMode::from_u8(color_mode.load(Ordering::Relaxed)), &mut frame);
                slot.set(frame);
            }
            Err(err) => log::error!("frame capture failed: {err}"),
        }
        thread::sleep(FRAME_PERIOD);
    }
    drop(frames);
    log::info!("camera released");
}

#[cfg(feature = "camera")]
fn open_frame_source() -> anyhow::Result<FrameSourcePointer> {
    let index = std::env::var("CARRITO_CAMERA_INDEX")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(0);
    let source = camera_source::CameraSource::open(index)
        .map_err(|err| anyhow::anyhow!("could not open camera {index}: {err}"))?;
    log::info!("capturing from camera {index}");
    Ok(Box::new(source))
}

#[cfg(not(feature = "camera"))]
fn open_frame_source() -> anyhow::Result<FrameSourcePointer> {
    log::info!("no camera backend compiled in, showing a test pattern");
    Ok(Box::new(camera_source::TestPatternSource::new(450, 300)))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut app = App::new()?;

    app.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use camera_source::TestPatternSource;
    use carrito_common::camera::{Frame, FrameSource};

    /// Wraps the test pattern and remembers whether it was dropped, standing
    /// in for a webcam whose handle must be released on shutdown.
    struct TrackedSource {
        inner: TestPatternSource,
        released: Arc<AtomicBool>,
    }

    impl FrameSource for TrackedSource {
        fn next_frame(&mut self) -> Result<Frame, Box<dyn std::error::Error>> {
            self.inner.next_frame()
        }
    }

    impl Drop for TrackedSource {
        fn drop(&mut self) {
            self.released.store(true, Ordering::Relaxed);
        }
    }

    #[test]
    fn stopping_the_camera_loop_releases_the_source() {
        let released = Arc::new(AtomicBool::new(false));
        let frames: FrameSourcePointer = Box::new(TrackedSource {
            inner: TestPatternSource::new(4, 4),
            released: released.clone(),
        });
        let slot = Latest::new();
        let stop = Arc::new(AtomicBool::new(false));

        let handle = thread::spawn({
            let color_mode = Arc::new(AtomicU8::new(ColorMode::Color.as_u8()));
            let slot = slot.clone();
            let stop = stop.clone();
            move || camera_loop(frames, color_mode, slot, stop)
        });

        // Let it publish at least one frame, then ask it to shut down.
        thread::sleep(Duration::from_millis(50));
        stop.store(true, Ordering::Relaxed);
        handle.join().unwrap();

        assert!(released.load(Ordering::Relaxed));
        assert!(slot.take().is_some());
    }
}

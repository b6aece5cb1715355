// Prevent console window in addition to Slint window in Windows release builds when, e.g., starting the app via file manager. Ignored on other platforms.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

slint::include_modules!();

mod serial_link;

use anyhow::Context;
use carrito_common::history::History;

use serial_link::SerialLink;

const DEFAULT_PORT: &str = "/dev/ttyACM0";
const DEFAULT_BAUD: u32 = 9600;

/// The panel app: the UI, the serial link to the microcontroller and a timer
/// that polls the link every 100 ms.
///
/// Each decoded pair updates the LED row and distance label and is pushed
/// into the rolling history shown next to them.
struct App {
    ui: AppWindow,
    link: Option<SerialLink>,
    timer: slint::Timer,
    records: std::rc::Rc<slint::VecModel<DistanceRecord>>,
}

impl App {
    const POLL_INTERVAL: std::time::Duration = std::time::Duration::from_millis(100);

    fn new() -> anyhow::Result<Self> {
        let ui = AppWindow::new()?;

        // Port and baud come from the environment; the defaults match the
        // usual Arduino UNO hookup. An unopenable port is fatal.
        let path =
            std::env::var("CARRITO_SERIAL_PORT").unwrap_or_else(|_| DEFAULT_PORT.to_string());
        let baud = std::env::var("CARRITO_SERIAL_BAUD")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(DEFAULT_BAUD);
        let link = SerialLink::open(&path, baud)
            .with_context(|| format!("could not open serial port {path}"))?;
        log::info!("listening on {path} at {baud} baud");

        // Shared model for the readings column.
        let records: std::rc::Rc<slint::VecModel<DistanceRecord>> = std::rc::Rc::default();
        ui.global::<ViewModel>()
            .set_records(slint::ModelRc::from(records.clone()));

        Ok(Self {
            ui,
            link: Some(link),
            timer: slint::Timer::default(),
            records,
        })
    }

    fn run(&mut self) -> anyhow::Result<()> {
        let ui_handle = self.ui.as_weak();
        let records = self.records.clone();

        // The link and the history live inside the timer closure; nothing
        // else touches them.
        let mut link = self.link.take().expect("link is set in new()");
        let mut history: History<DistanceRecord> = History::default();

        self.timer
            .start(slint::TimerMode::Repeated, Self::POLL_INTERVAL, move || {
                let Some(sample) = link.poll() else {
                    return;
                };
                log::info!(
                    "LEDs on: {}, distance: {} cm",
                    sample.leds_on,
                    sample.distance_cm
                );

                let ui = ui_handle.unwrap();
                let model = ViewModel::get(&ui);
                model.set_leds_on(sample.leds_on as i32);
                model.set_distance_cm(sample.distance_cm);

                history.record(DistanceRecord {
                    distance_cm: sample.distance_cm,
                    timestamp: slint::SharedString::from(
                        chrono::Local::now().format("%H:%M:%S").to_string(),
                    ),
                });
                records.set_vec(history.snapshot());
            });

        self.ui.run().map_err(|e| e.into())
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut app = App::new()?;

    app.run()
}

//! HC-SR04 ranging over two GPIO lines. The measurement is time critical and
//! runs on its own sampler thread; both echo phases are bounded by
//! [`ECHO_TIMEOUT`] so a disconnected sensor yields a skipped sample instead
//! of a hung thread.

use std::time::{Duration, Instant};

use rppal::gpio::{Gpio, InputPin, OutputPin};

use carrito_common::ranging::{pulse_to_distance_cm, RangeError, ECHO_TIMEOUT};

const TRIGGER_PULSE: Duration = Duration::from_micros(10);

pub struct Ultrasonic {
    trigger: OutputPin,
    echo: InputPin,
}

impl Ultrasonic {
    pub fn new(gpio: &Gpio, trigger_pin: u8, echo_pin: u8) -> Result<Self, rppal::gpio::Error> {
        Ok(Self {
            trigger: gpio.get(trigger_pin)?.into_output_low(),
            echo: gpio.get(echo_pin)?.into_input(),
        })
    }

    /// Fires a trigger pulse and times the echo. Blocks for at most
    /// [`ECHO_TIMEOUT`].
    pub fn measure(&mut self) -> Result<f64, RangeError> {
        self.trigger.set_high();
        spin_for(TRIGGER_PULSE);
        self.trigger.set_low();

        let deadline = Instant::now() + ECHO_TIMEOUT;
        while self.echo.is_low() {
            if Instant::now() >= deadline {
                return Err(RangeError::NoEcho);
            }
            std::hint::spin_loop();
        }

        let pulse_start = Instant::now();
        while self.echo.is_high() {
            if Instant::now() >= deadline {
                return Err(RangeError::NoEcho);
            }
            std::hint::spin_loop();
        }

        Ok(pulse_to_distance_cm(pulse_start.elapsed()))
    }
}

// thread::sleep is too coarse for a 10 us pulse.
fn spin_for(duration: Duration) {
    let end = Instant::now() + duration;
    while Instant::now() < end {
        std::hint::spin_loop();
    }
}

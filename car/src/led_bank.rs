use rppal::gpio::{Gpio, OutputPin};

/// The five physical proximity LEDs. `show(n)` lights the first `n`.
pub struct LedBank {
    pins: Vec<OutputPin>,
}

impl LedBank {
    pub fn new(gpio: &Gpio, pins: &[u8]) -> Result<Self, rppal::gpio::Error> {
        let pins = pins
            .iter()
            .map(|&number| gpio.get(number).map(|pin| pin.into_output_low()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { pins })
    }

    pub fn show(&mut self, count: u8) {
        for (index, pin) in self.pins.iter_mut().enumerate() {
            if (index as u8) < count {
                pin.set_high();
            } else {
                pin.set_low();
            }
        }
    }

    pub fn clear(&mut self) {
        self.show(0);
    }
}

//! Four-pin H-bridge outputs. Commands are idempotent, always succeed, and
//! may switch directly between any two states.

use rppal::gpio::{Gpio, OutputPin};

use carrito_common::drive::DriveState;

pub struct MotorDriver {
    pins: [OutputPin; 4],
    state: DriveState,
}

impl MotorDriver {
    /// Pins in [`DriveState::pin_levels`] order, driven low on acquisition.
    pub fn new(gpio: &Gpio, pins: [u8; 4]) -> Result<Self, rppal::gpio::Error> {
        let [a, b, c, d] = pins;
        Ok(Self {
            pins: [
                gpio.get(a)?.into_output_low(),
                gpio.get(b)?.into_output_low(),
                gpio.get(c)?.into_output_low(),
                gpio.get(d)?.into_output_low(),
            ],
            state: DriveState::Stop,
        })
    }

    pub fn set_state(&mut self, state: DriveState) {
        for (pin, high) in self.pins.iter_mut().zip(state.pin_levels()) {
            if high {
                pin.set_high();
            } else {
                pin.set_low();
            }
        }
        if state != self.state {
            log::info!("drive: {state:?}");
        }
        self.state = state;
    }

    pub fn state(&self) -> DriveState {
        self.state
    }
}

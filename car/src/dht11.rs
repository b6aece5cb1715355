//! Bit-banged DHT11 driver on a single GPIO line. The sensor answers a long
//! low start signal with 40 pulse-width-coded bits; a high phase longer than
//! ~40 us is a one.

use std::fmt;
use std::thread;
use std::time::{Duration, Instant};

use rppal::gpio::{Gpio, IoPin, Level, Mode};

use carrito_common::sample::ClimateSample;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DhtError {
    Checksum,
    Timeout,
}

impl fmt::Display for DhtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DhtError::Checksum => write!(f, "checksum mismatch"),
            DhtError::Timeout => write!(f, "sensor did not answer in time"),
        }
    }
}

impl std::error::Error for DhtError {}

pub struct Dht11 {
    pin: IoPin,
}

impl Dht11 {
    const DATA_BYTES: usize = 5;
    /// Start signal: hold the line low at least 18 ms for a DHT11.
    const START_LOW: Duration = Duration::from_millis(18);
    const RETRY_DELAY: Duration = Duration::from_millis(500);

    pub fn new(gpio: &Gpio, pin: u8) -> Result<Self, rppal::gpio::Error> {
        Ok(Self {
            pin: gpio.get(pin)?.into_io(Mode::Input),
        })
    }

    /// Counts microseconds the line stays at `level`, up to `max_wait` us.
    fn level_duration(&self, level: Level, max_wait: u32) -> Result<u32, DhtError> {
        let mut waited = 0u32;
        while self.pin.read() == level {
            waited += 1;
            if waited > max_wait {
                return Err(DhtError::Timeout);
            }
            spin_us(1);
        }
        Ok(waited)
    }

    /// One read attempt: wake the sensor, then clock in 40 bits.
    pub fn read(&mut self) -> Result<ClimateSample, DhtError> {
        let mut data = [0u8; Self::DATA_BYTES];
        let mut byte_index = 0;
        let mut bit_index = 7u8;

        self.pin.set_mode(Mode::Output);
        self.pin.set_low();
        thread::sleep(Self::START_LOW);
        self.pin.set_high();
        spin_us(30);
        self.pin.set_mode(Mode::Input);

        // The sensor acknowledges with ~80 us low then ~80 us high.
        self.level_duration(Level::Low, 90)?;
        self.level_duration(Level::High, 95)?;

        for _ in 0..40 {
            // Each bit starts with a ~50 us low phase; the high phase width
            // encodes the bit.
            self.level_duration(Level::Low, 60)?;
            let high_us = self.level_duration(Level::High, 80)?;

            if high_us > 40 {
                data[byte_index] |= 1 << bit_index;
            }
            if bit_index == 0 {
                bit_index = 7;
                byte_index += 1;
            } else {
                bit_index -= 1;
            }
        }

        let sum = data[0]
            .wrapping_add(data[1])
            .wrapping_add(data[2])
            .wrapping_add(data[3]);
        if sum != data[4] {
            return Err(DhtError::Checksum);
        }

        // DHT11 puts the integer part in the first byte of each pair; the
        // second byte is tenths and usually zero.
        Ok(ClimateSample {
            humidity_percent: data[0] as f32 + data[1] as f32 / 10.0,
            temperature_celsius: data[2] as f32 + data[3] as f32 / 10.0,
        })
    }

    /// The sensor misses reads routinely; retry a few times before reporting
    /// a failed sample, the way the climate loop expects.
    pub fn read_retry(&mut self, attempts: u32) -> Result<ClimateSample, DhtError> {
        let mut last = DhtError::Timeout;
        for attempt in 1..=attempts.max(1) {
            match self.read() {
                Ok(sample) => return Ok(sample),
                Err(err) => {
                    log::debug!("DHT11 attempt {attempt} failed: {err}");
                    last = err;
                    thread::sleep(Self::RETRY_DELAY);
                }
            }
        }
        Err(last)
    }
}

fn spin_us(micros: u64) {
    let end = Instant::now() + Duration::from_micros(micros);
    while Instant::now() < end {
        std::hint::spin_loop();
    }
}

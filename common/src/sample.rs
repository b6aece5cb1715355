use serde::{Deserialize, Serialize};

/// One temperature/humidity reading from the DHT sensor.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct ClimateSample {
    pub temperature_celsius: f32,
    pub humidity_percent: f32,
}

/// One ultrasonic reading together with the LED count derived from it.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct DistanceReading {
    pub distance_cm: f64,
    pub leds_on: u8,
}

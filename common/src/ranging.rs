//! Echo-pulse timing math for the HC-SR04, kept free of any GPIO dependency
//! so it can be tested on the desk.

use std::fmt;
use std::time::Duration;

pub const SPEED_OF_SOUND_CM_PER_S: f64 = 34_300.0;

/// How long to wait for the echo line before giving up on a measurement.
/// The sensor ranges about 4 m, a ~23 ms round trip; 100 ms is comfortably
/// past anything it can still report.
pub const ECHO_TIMEOUT: Duration = Duration::from_millis(100);

/// The echo line never produced a usable pulse within [`ECHO_TIMEOUT`].
/// Recoverable: the sampler skips the reading and tries again next period.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RangeError {
    NoEcho,
}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeError::NoEcho => write!(f, "no echo within {:?}", ECHO_TIMEOUT),
        }
    }
}

impl std::error::Error for RangeError {}

/// Converts a measured echo-high duration into centimeters: the pulse covers
/// the round trip, so halve it. Rounded to two decimal places.
pub fn pulse_to_distance_cm(pulse: Duration) -> f64 {
    let distance = pulse.as_secs_f64() * SPEED_OF_SOUND_CM_PER_S / 2.0;
    (distance * 100.0).round() / 100.0
}

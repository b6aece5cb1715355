//! Decoder for the microcontroller's two-line frames: an LED count line
//! followed by a distance line, both plain ASCII integers.

use serde::{Deserialize, Serialize};

use crate::leds::LED_COUNT;

/// One decoded LED-count/distance pair from the serial link.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PanelSample {
    pub leds_on: u8,
    pub distance_cm: i32,
}

/// Decodes one frame. If either line is not an integer the whole pair is
/// discarded; the caller just waits for the next one.
pub fn decode_pair(led_line: &str, distance_line: &str) -> Option<PanelSample> {
    let leds_on: u8 = led_line.trim().parse().ok()?;
    let distance_cm: i32 = distance_line.trim().parse().ok()?;
    Some(PanelSample {
        leds_on: leds_on.min(LED_COUNT),
        distance_cm,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_a_clean_pair() {
        assert_eq!(
            decode_pair("3\r\n", "17\n"),
            Some(PanelSample {
                leds_on: 3,
                distance_cm: 17
            })
        );
    }

    #[test]
    fn either_bad_line_drops_the_whole_pair() {
        assert_eq!(decode_pair("three", "17"), None);
        assert_eq!(decode_pair("3", "17cm"), None);
        assert_eq!(decode_pair("", ""), None);
        assert_eq!(decode_pair("3.5", "17"), None);
    }

    #[test]
    fn led_count_is_clamped_for_display() {
        assert_eq!(decode_pair("9", "40").unwrap().leds_on, 5);
    }

    #[test]
    fn negative_distance_is_accepted_as_sent() {
        // The firmware should not send these, but the decoder is not the
        // place to second-guess it.
        assert_eq!(decode_pair("0", "-3").unwrap().distance_cm, -3);
    }
}

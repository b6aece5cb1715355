//! Distance-to-LED thresholding shared by both consoles.

/// Number of LEDs in the bank, on the bench and on screen.
pub const LED_COUNT: u8 = 5;

/// Below this distance the car stops itself. Deliberately not the same value
/// as the zero-LED threshold.
pub const STOP_THRESHOLD_CM: f64 = 7.0;

/// Maps a distance in centimeters to how many of the five LEDs to light.
///
/// Under 5 cm nothing lights, between 5 and 25 cm one LED per 5 cm, and past
/// 25 cm all five stay on.
pub fn led_count(distance_cm: f64) -> u8 {
    if distance_cm < 5.0 {
        0
    } else if distance_cm > 25.0 {
        LED_COUNT
    } else {
        (distance_cm / 5.0).floor() as u8
    }
}

/// Whether the automatic safety stop should fire for this reading.
pub fn should_auto_stop(distance_cm: f64) -> bool {
    distance_cm < STOP_THRESHOLD_CM
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_from_the_bench() {
        assert_eq!(led_count(30.0), 5);
        assert_eq!(led_count(4.0), 0);
        assert_eq!(led_count(10.0), 2);
        assert_eq!(led_count(26.0), 5);
    }

    #[test]
    fn band_edges() {
        assert_eq!(led_count(0.0), 0);
        assert_eq!(led_count(4.99), 0);
        assert_eq!(led_count(5.0), 1);
        assert_eq!(led_count(9.99), 1);
        assert_eq!(led_count(25.0), 5);
        assert_eq!(led_count(25.01), 5);
        assert_eq!(led_count(1000.0), 5);
    }

    #[test]
    fn monotonic_and_bounded() {
        let mut previous = 0;
        for step in 0..600 {
            let count = led_count(step as f64 / 10.0);
            assert!(count <= 5);
            assert!(count >= previous);
            previous = count;
        }
    }

    #[test]
    fn auto_stop_is_independent_of_led_count() {
        // 5..7 cm lights one LED yet still stops the car.
        assert!(should_auto_stop(4.0));
        assert!(should_auto_stop(6.9));
        assert_eq!(led_count(6.9), 1);
        assert!(!should_auto_stop(7.0));
        assert!(!should_auto_stop(10.0));
    }

    #[test]
    fn bench_sequence_stops_only_once() {
        let readings = [30.0, 4.0, 10.0, 26.0];
        let counts: Vec<u8> = readings.iter().map(|&d| led_count(d)).collect();
        assert_eq!(counts, vec![5, 0, 2, 5]);
        let stops: Vec<bool> = readings.iter().map(|&d| should_auto_stop(d)).collect();
        assert_eq!(stops, vec![false, true, false, false]);
    }
}

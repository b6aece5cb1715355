use serde::{Deserialize, Serialize};

/// One of the five motor commands. Exactly one is active at a time; switching
/// directly between any two is allowed, there is no forced stop in between.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DriveState {
    Forward,
    Reverse,
    Left,
    Right,
    #[default]
    Stop,
}

impl DriveState {
    /// Levels for the four direction outputs, in pin order
    /// (left motor A/B, right motor A/B).
    pub fn pin_levels(self) -> [bool; 4] {
        match self {
            DriveState::Forward => [true, false, true, false],
            DriveState::Reverse => [false, true, false, true],
            DriveState::Left => [false, true, true, false],
            DriveState::Right => [true, false, false, true],
            DriveState::Stop => [false, false, false, false],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [DriveState; 5] = [
        DriveState::Forward,
        DriveState::Reverse,
        DriveState::Left,
        DriveState::Right,
        DriveState::Stop,
    ];

    #[test]
    fn pin_table_matches_the_wiring() {
        assert_eq!(DriveState::Forward.pin_levels(), [true, false, true, false]);
        assert_eq!(DriveState::Reverse.pin_levels(), [false, true, false, true]);
        assert_eq!(DriveState::Left.pin_levels(), [false, true, true, false]);
        assert_eq!(DriveState::Right.pin_levels(), [true, false, false, true]);
        assert_eq!(DriveState::Stop.pin_levels(), [false, false, false, false]);
    }

    #[test]
    fn states_are_distinct_and_never_short_a_motor() {
        for (i, a) in ALL.iter().enumerate() {
            for b in &ALL[i + 1..] {
                assert_ne!(a.pin_levels(), b.pin_levels());
            }
            // A and B of the same motor must never both be high.
            let [la, lb, ra, rb] = a.pin_levels();
            assert!(!(la && lb));
            assert!(!(ra && rb));
        }
    }

    #[test]
    fn stop_is_the_default() {
        assert_eq!(DriveState::default(), DriveState::Stop);
    }
}

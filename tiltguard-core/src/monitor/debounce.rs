//! Consecutive-sample debounce counter

use crate::report::PostureStatus;

/// Debounce state owned by the posture monitor
///
/// The counter only grows while samples stay over the threshold and drops
/// straight to zero on the first sample at or under it. There is no
/// partial decay: one good sample forgives the whole streak.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DebounceState {
    counter: u32,
    last_angle: Option<f32>,
}

impl DebounceState {
    pub const fn new() -> Self {
        Self {
            counter: 0,
            last_angle: None,
        }
    }

    /// Fold one sample into the state
    ///
    /// A sample is bad when it is strictly greater than `threshold_deg`.
    pub fn update(&mut self, angle: f32, threshold_deg: f32) -> PostureStatus {
        self.last_angle = Some(angle);

        if angle > threshold_deg {
            self.counter = self.counter.saturating_add(1);
            PostureStatus::Bad
        } else {
            self.counter = 0;
            PostureStatus::Good
        }
    }

    /// Consecutive bad samples so far
    pub fn counter(&self) -> u32 {
        self.counter
    }

    /// Angle of the most recent sample
    pub fn last_angle(&self) -> Option<f32> {
        self.last_angle
    }

    /// Whether the streak is long enough to act on
    pub fn is_triggered(&self, max_count: u32) -> bool {
        self.counter >= max_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_streak_then_reset() {
        let mut state = DebounceState::new();

        for expected in 1..=7 {
            assert_eq!(state.update(35.0, 20.0), PostureStatus::Bad);
            assert_eq!(state.counter(), expected);
        }

        assert_eq!(state.update(10.0, 20.0), PostureStatus::Good);
        assert_eq!(state.counter(), 0);
        assert_eq!(state.last_angle(), Some(10.0));
    }

    #[test]
    fn test_threshold_is_not_bad() {
        let mut state = DebounceState::new();
        state.update(25.0, 20.0);

        // Exactly at the threshold resets
        assert_eq!(state.update(20.0, 20.0), PostureStatus::Good);
        assert_eq!(state.counter(), 0);
    }

    #[test]
    fn test_counter_saturates() {
        let mut state = DebounceState {
            counter: u32::MAX - 1,
            last_angle: None,
        };
        state.update(90.0, 20.0);
        state.update(90.0, 20.0);
        assert_eq!(state.counter(), u32::MAX);
        assert!(state.is_triggered(50));
    }

    proptest! {
        #[test]
        fn prop_counter_is_trailing_bad_run(
            angles in proptest::collection::vec(0.0f32..=180.0, 1..64),
            threshold in 0.0f32..=180.0,
        ) {
            let mut state = DebounceState::new();
            let mut previous = 0u32;

            for &angle in &angles {
                let status = state.update(angle, threshold);
                if status.is_bad() {
                    prop_assert_eq!(state.counter(), previous + 1);
                } else {
                    prop_assert_eq!(state.counter(), 0);
                }
                previous = state.counter();
            }

            let trailing = angles.iter().rev().take_while(|a| **a > threshold).count();
            prop_assert_eq!(state.counter() as usize, trailing);
        }
    }
}

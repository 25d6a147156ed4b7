//! The two stage sequences the keypad plays

use crate::animation::Stage;
use crate::constants::ANIMATION_VALUES;

/// Scale pulse on a slot: grow to the emphasis scale, settle back to 1
#[must_use]
pub fn emphasis_pulse() -> Vec<Stage> {
    vec![
        Stage::new(ANIMATION_VALUES.emphasis_leg, ANIMATION_VALUES.emphasis_scale),
        Stage::new(ANIMATION_VALUES.emphasis_leg, 1.0),
    ]
}

/// Zoom of the error slot from nothing to full size
#[must_use]
pub fn error_zoom_in() -> Vec<Stage> {
    vec![Stage::new(ANIMATION_VALUES.error_zoom, 1.0)]
}

/// Horizontal error shake on the indicator row
///
/// Out to `-offset` in half a leg, then alternate `+offset`/`-offset` for
/// `shake_repeats` full legs, then back to 0 in half a leg.
#[must_use]
pub fn shake_sequence() -> Vec<Stage> {
    let offset = ANIMATION_VALUES.offset;
    let half = ANIMATION_VALUES.timing / 2;

    let mut stages = Vec::with_capacity(ANIMATION_VALUES.shake_repeats + 2);
    stages.push(Stage::new(half, -offset));
    for leg in 0..ANIMATION_VALUES.shake_repeats {
        let target = if leg % 2 == 0 { offset } else { -offset };
        stages.push(Stage::new(ANIMATION_VALUES.timing, target));
    }
    stages.push(Stage::new(half, 0.0));
    stages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Timeline;
    use std::time::Duration;

    #[test]
    fn test_emphasis_pulse_shape() {
        let stages = emphasis_pulse();
        assert_eq!(stages.len(), 2);
        assert_eq!(stages[0].target, 1.2);
        assert_eq!(stages[1].target, 1.0);
        let total: Duration = stages.iter().map(|s| s.duration).sum();
        assert_eq!(total, Duration::from_millis(200));
    }

    #[test]
    fn test_shake_sequence_shape() {
        let targets: Vec<f32> = shake_sequence().iter().map(|s| s.target).collect();
        assert_eq!(targets, [-10.0, 10.0, -10.0, 10.0, -10.0, 0.0]);
        let total: Duration = shake_sequence().iter().map(|s| s.duration).sum();
        assert_eq!(total, Duration::from_millis(400));
    }

    #[test]
    fn test_shake_stays_bounded_and_returns_to_neutral() {
        let mut tl = Timeline::new(0.0);
        tl.play(shake_sequence());
        while tl.tick(Duration::from_millis(7)) {
            assert!(tl.value().abs() <= ANIMATION_VALUES.offset + f32::EPSILON);
        }
        assert_eq!(tl.value(), 0.0);
    }

    #[test]
    fn test_error_zoom_reaches_full_size() {
        let mut timeline = Timeline::new(0.0);
        timeline.play(error_zoom_in());
        assert!(timeline.tick(ANIMATION_VALUES.error_zoom / 2));
        assert!(timeline.value() > 0.0 && timeline.value() < 1.0);
        assert!(!timeline.tick(ANIMATION_VALUES.error_zoom));
        assert_eq!(timeline.value(), 1.0);
    }
}

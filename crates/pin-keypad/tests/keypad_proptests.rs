//! Property-based tests for the keypad state machine
//!
//! Random press/tick sequences must never break the buffer bounds, the
//! callback contract or the indicator count.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use pin_keypad::animation::{shake_sequence, Timeline};
use pin_keypad::constants::{ANIMATION_VALUES, RESET_DELAY};
use pin_keypad::prelude::*;
use proptest::prelude::*;

// ===== Strategy definitions =====

/// Generate any valid digit (0-9)
fn digit_strategy() -> impl Strategy<Value = u8> {
    0u8..=9u8
}

/// Generate a PIN length, including the clamped 0
fn pin_length_strategy() -> impl Strategy<Value = usize> {
    0usize..=8usize
}

/// One host event
#[derive(Debug, Clone, Copy)]
enum Step {
    Press(KeypadKey),
    Tick(u64),
    Errored(bool),
}

fn key_strategy() -> impl Strategy<Value = KeypadKey> {
    prop_oneof![
        4 => digit_strategy().prop_map(KeypadKey::Digit),
        1 => Just(KeypadKey::Delete),
        1 => Just(KeypadKey::Biometric),
    ]
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        6 => key_strategy().prop_map(Step::Press),
        2 => (0u64..400u64).prop_map(Step::Tick),
        1 => any::<bool>().prop_map(Step::Errored),
    ]
}

fn recording_keypad(config: KeypadConfig) -> (Keypad, Rc<RefCell<Vec<String>>>) {
    let entered = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&entered);
    let keypad = Keypad::new(config, move |pin: &str| sink.borrow_mut().push(pin.to_string()));
    (keypad, entered)
}

proptest! {
    /// Buffer never exceeds the PIN length and the view always shows n dots
    #[test]
    fn prop_bounds_hold_under_any_sequence(
        n in pin_length_strategy(),
        steps in prop::collection::vec(step_strategy(), 0..60),
    ) {
        let (mut keypad, entered) = recording_keypad(KeypadConfig::new().with_pin_length(n));
        let capacity = n.max(1);

        for step in steps {
            match step {
                Step::Press(key) => keypad.press_key(key),
                Step::Tick(ms) => keypad.tick(Duration::from_millis(ms)),
                Step::Errored(flag) => keypad.set_errored(flag),
            }
            prop_assert!(keypad.pin_len() <= capacity);

            let view = keypad.view();
            let filled = view.find_all_by_test_id("pin-dot-filled").len();
            let empty = view.find_all_by_test_id("pin-dot").len();
            prop_assert_eq!(filled + empty, capacity);
            prop_assert_eq!(filled, keypad.pin_len());
        }

        for pin in entered.borrow().iter() {
            prop_assert_eq!(pin.len(), capacity);
            prop_assert!(pin.chars().all(|c| c.is_ascii_digit()));
        }
    }

    /// n digit presses deliver exactly those digits, once
    #[test]
    fn prop_completion_delivers_concatenation(
        digits in prop::collection::vec(digit_strategy(), 1..8),
        extra in prop::collection::vec(digit_strategy(), 0..5),
    ) {
        let (mut keypad, entered) =
            recording_keypad(KeypadConfig::new().with_pin_length(digits.len()));

        for d in digits.iter().chain(extra.iter()) {
            keypad.press_digit(*d);
        }
        let expected: String = digits.iter().map(u8::to_string).collect();
        prop_assert_eq!(entered.borrow().clone(), vec![expected]);

        keypad.tick(RESET_DELAY);
        prop_assert_eq!(keypad.pin_len(), 0);
    }

    /// Errors and shakes never change the digits entered
    #[test]
    fn prop_error_never_mutates_buffer(
        digits in prop::collection::vec(digit_strategy(), 0..5),
        toggles in prop::collection::vec(any::<bool>(), 0..10),
    ) {
        let (mut keypad, _) = recording_keypad(KeypadConfig::new().with_pin_length(6));
        for d in &digits {
            keypad.press_digit(*d);
        }
        for flag in toggles {
            keypad.set_errored(flag);
            keypad.tick(Duration::from_millis(50));
        }
        prop_assert_eq!(keypad.pin_len(), digits.len());
    }

    /// The shake stays within the offset at any tick granularity
    #[test]
    fn prop_shake_bounded(step_ms in 1u64..120u64) {
        let mut timeline = Timeline::new(0.0);
        timeline.play(shake_sequence());
        while timeline.tick(Duration::from_millis(step_ms)) {
            prop_assert!(timeline.value().abs() <= ANIMATION_VALUES.offset + 1e-4);
        }
        prop_assert_eq!(timeline.value(), 0.0);
    }

    /// Emphasis scale stays between neutral and peak
    #[test]
    fn prop_emphasis_bounded(d in digit_strategy(), step_ms in 1u64..60u64) {
        let (mut keypad, _) = recording_keypad(KeypadConfig::new());
        keypad.press_digit(d);
        for _ in 0..20 {
            keypad.tick(Duration::from_millis(step_ms));
            let scale = keypad.emphasis(0);
            prop_assert!((1.0 - 1e-4..=ANIMATION_VALUES.emphasis_scale + 1e-4).contains(&scale));
        }
    }

    /// Test ids round-trip through press dispatch
    #[test]
    fn prop_press_by_test_id_matches_press_key(key in key_strategy()) {
        let (mut by_id, _) = recording_keypad(KeypadConfig::new().with_face_id(true));
        let (mut direct, _) = recording_keypad(KeypadConfig::new().with_face_id(true));
        by_id.press(&key.test_id());
        direct.press_key(key);
        prop_assert_eq!(by_id.pin_len(), direct.pin_len());
        prop_assert_eq!(by_id.flashed_key(), direct.flashed_key());
    }
}

//! Keypad widget state machine
//!
//! [`Keypad`] owns everything one on-screen keypad needs between frames:
//! the PIN buffer, one emphasis timeline per indicator slot, the shake
//! timeline for the indicator row, the post-completion reset deadline and
//! the caller's callbacks. Renderers ([`view`](crate::view),
//! [`tui`](crate::tui)) read it; they never mutate it.
//!
//! Time only moves when the host calls [`Keypad::tick`]. Dropping the
//! keypad drops every pending stage and the reset deadline with it.

use std::fmt;
use std::time::Duration;

use crate::animation::{emphasis_pulse, error_zoom_in, shake_sequence, Easing, Timeline};
use crate::config::{KeypadConfig, Theme};
use crate::constants::{KEY_FLASH, RESET_DELAY};
use crate::core::{KeypadKey, KeypadState, PinBuffer};
use crate::view::ViewNode;

type PinCallback = Box<dyn FnMut(&str)>;
type DigitCallback = Box<dyn FnMut(u8)>;
type Notify = Box<dyn FnMut()>;
type NodeProducer = Box<dyn Fn() -> ViewNode>;

/// Neutral scale of an indicator
const NEUTRAL_SCALE: f32 = 1.0;
/// Neutral horizontal offset of the indicator row
const NEUTRAL_OFFSET: f32 = 0.0;
/// Scale of the error slot before it zooms in
const HIDDEN_SCALE: f32 = 0.0;

/// A PIN entry keypad
pub struct Keypad {
    config: KeypadConfig,
    buffer: PinBuffer,
    /// One timeline per indicator slot, sized at construction
    emphasis: Vec<Timeline>,
    shake: Timeline,
    /// Zoom of the error slot, replayed on each rising error edge
    error_zoom: Timeline,
    /// Time left before a completed PIN is cleared
    pending_reset: Option<Duration>,
    errored: bool,
    /// Most recently pressed key and its remaining highlight time
    flash: Option<(KeypadKey, Duration)>,
    on_pin_entered: PinCallback,
    on_digit_pressed: Option<DigitCallback>,
    on_backspace_pressed: Option<Notify>,
    on_face_id: Option<Notify>,
    error_message: Option<NodeProducer>,
    face_id_icon: Option<NodeProducer>,
}

impl Keypad {
    /// Creates a keypad that calls `on_pin_entered` with every completed PIN
    ///
    /// The configured PIN length is clamped to
    /// `MIN_PIN_LENGTH..=MAX_PIN_LENGTH`.
    pub fn new(config: KeypadConfig, on_pin_entered: impl FnMut(&str) + 'static) -> Self {
        let pin_length = config.effective_pin_length();
        Self {
            buffer: PinBuffer::new(pin_length),
            emphasis: (0..pin_length).map(|_| Timeline::new(NEUTRAL_SCALE)).collect(),
            shake: Timeline::new(NEUTRAL_OFFSET),
            error_zoom: Timeline::new(HIDDEN_SCALE).with_easing(Easing::Linear),
            pending_reset: None,
            errored: false,
            flash: None,
            on_pin_entered: Box::new(on_pin_entered),
            on_digit_pressed: None,
            on_backspace_pressed: None,
            on_face_id: None,
            error_message: None,
            face_id_icon: None,
            config,
        }
    }

    /// Supplies the element shown below the indicators while errored
    #[must_use]
    pub fn with_error_message(mut self, producer: impl Fn() -> ViewNode + 'static) -> Self {
        self.error_message = Some(Box::new(producer));
        self
    }

    /// Supplies the icon drawn inside the biometric button
    #[must_use]
    pub fn with_face_id_icon(mut self, producer: impl Fn() -> ViewNode + 'static) -> Self {
        self.face_id_icon = Some(Box::new(producer));
        self
    }

    /// Called when the biometric button is pressed
    #[must_use]
    pub fn with_face_id_handler(mut self, handler: impl FnMut() + 'static) -> Self {
        self.on_face_id = Some(Box::new(handler));
        self
    }

    /// Called on every digit key press, accepted or not
    #[must_use]
    pub fn with_on_digit_pressed(mut self, handler: impl FnMut(u8) + 'static) -> Self {
        self.on_digit_pressed = Some(Box::new(handler));
        self
    }

    /// Called on every delete key press
    #[must_use]
    pub fn with_on_backspace_pressed(mut self, handler: impl FnMut() + 'static) -> Self {
        self.on_backspace_pressed = Some(Box::new(handler));
        self
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Handles a press on any grid key
    pub fn press_key(&mut self, key: KeypadKey) {
        match key {
            KeypadKey::Digit(d) => self.press_digit(d),
            KeypadKey::Delete => self.press_delete(),
            KeypadKey::Biometric => self.press_biometric(),
        }
    }

    /// Handles a press identified by its rendered test id
    ///
    /// Unknown ids and the inert placeholder are ignored.
    pub fn press(&mut self, test_id: &str) {
        if let Some(key) = KeypadKey::from_test_id(test_id) {
            self.press_key(key);
        }
    }

    /// Appends a digit; completes the PIN when the buffer fills
    ///
    /// Completing again while a reset is pending (after a delete) re-arms
    /// the reset to the full delay from this press.
    pub fn press_digit(&mut self, digit: u8) {
        if digit > 9 {
            return;
        }
        self.flash(KeypadKey::Digit(digit));
        if let Some(handler) = self.on_digit_pressed.as_mut() {
            handler(digit);
        }

        let Some(slot) = self.buffer.push(digit) else {
            tracing::trace!(len = self.buffer.len(), "Digit ignored, PIN full");
            return;
        };
        self.emphasize(slot);
        tracing::trace!(len = self.buffer.len(), "Digit accepted");

        if self.buffer.is_full() {
            tracing::debug!(pin_length = self.buffer.capacity(), "PIN entered");
            (self.on_pin_entered)(self.buffer.as_str());
            self.pending_reset = Some(RESET_DELAY);
        }
    }

    /// Removes the last digit, if any
    pub fn press_delete(&mut self) {
        self.flash(KeypadKey::Delete);
        if let Some(handler) = self.on_backspace_pressed.as_mut() {
            handler();
        }

        if self.buffer.is_empty() {
            return;
        }
        self.emphasize(self.buffer.len() - 1);
        self.buffer.pop();
        tracing::trace!(len = self.buffer.len(), "Digit deleted");
    }

    /// Handles a press on the biometric slot
    ///
    /// Does nothing unless the slot is shown as a button.
    pub fn press_biometric(&mut self) {
        if !self.config.uses_face_id {
            return;
        }
        self.flash(KeypadKey::Biometric);
        if let Some(handler) = self.on_face_id.as_mut() {
            tracing::trace!("Biometric pressed");
            handler();
        }
    }

    /// Sets the caller's error flag
    ///
    /// The shake and the error slot zoom play on each false to true
    /// transition; the error message shows for as long as the flag stays
    /// set and disappears as soon as it clears.
    pub fn set_errored(&mut self, errored: bool) {
        if errored && !self.errored {
            tracing::debug!("PIN error, shaking indicators");
            self.shake.play(shake_sequence());
            self.error_zoom.play(error_zoom_in());
        } else if !errored && self.errored {
            self.error_zoom.cancel();
        }
        self.errored = errored;
    }

    /// Switches between light and dark color variants
    pub fn set_theme(&mut self, theme: Theme) {
        self.config.theme = theme;
    }

    // =========================================================================
    // Time
    // =========================================================================

    /// Advances every running animation and the reset deadline by `dt`
    pub fn tick(&mut self, dt: Duration) {
        for timeline in &mut self.emphasis {
            timeline.tick(dt);
        }
        self.shake.tick(dt);
        self.error_zoom.tick(dt);

        if let Some((key, left)) = self.flash {
            self.flash = left.checked_sub(dt).filter(|d| !d.is_zero()).map(|d| (key, d));
        }

        if let Some(left) = self.pending_reset {
            if dt >= left {
                self.pending_reset = None;
                self.buffer.clear();
                tracing::debug!("PIN cleared after completion");
            } else {
                self.pending_reset = Some(left - dt);
            }
        }
    }

    /// Returns true while anything still needs ticking
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.pending_reset.is_some()
            || self.flash.is_some()
            || self.shake.is_running()
            || self.error_zoom.is_running()
            || self.emphasis.iter().any(Timeline::is_running)
    }

    fn emphasize(&mut self, slot: usize) {
        if let Some(timeline) = self.emphasis.get_mut(slot) {
            timeline.play(emphasis_pulse());
        }
    }

    fn flash(&mut self, key: KeypadKey) {
        self.flash = Some((key, KEY_FLASH));
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// The active configuration
    #[must_use]
    pub fn config(&self) -> &KeypadConfig {
        &self.config
    }

    /// Number of indicators (the effective PIN length)
    #[must_use]
    pub fn pin_length(&self) -> usize {
        self.buffer.capacity()
    }

    /// Number of digits entered so far
    #[must_use]
    pub fn pin_len(&self) -> usize {
        self.buffer.len()
    }

    /// Where the keypad is in its input cycle
    #[must_use]
    pub fn state(&self) -> KeypadState {
        KeypadState::from_len(self.buffer.len(), self.buffer.capacity())
    }

    /// Returns true if indicator `slot` is filled
    #[must_use]
    pub fn is_filled(&self, slot: usize) -> bool {
        slot < self.buffer.len()
    }

    /// Current scale of indicator `slot` (1.0 when idle)
    #[must_use]
    pub fn emphasis(&self, slot: usize) -> f32 {
        self.emphasis
            .get(slot)
            .map_or(NEUTRAL_SCALE, Timeline::value)
    }

    /// Current horizontal offset of the indicator row
    #[must_use]
    pub fn shake_offset(&self) -> f32 {
        self.shake.value()
    }

    /// Current scale of the error slot (0.0 hidden, 1.0 full size)
    #[must_use]
    pub fn error_scale(&self) -> f32 {
        self.error_zoom.value()
    }

    /// The caller's error flag
    #[must_use]
    pub fn is_errored(&self) -> bool {
        self.errored
    }

    /// Key currently drawn as pressed
    #[must_use]
    pub fn flashed_key(&self) -> Option<KeypadKey> {
        self.flash.map(|(key, _)| key)
    }

    /// Returns true while a completed PIN waits to be cleared
    #[must_use]
    pub fn reset_pending(&self) -> bool {
        self.pending_reset.is_some()
    }

    /// Error element, when errored and a producer was supplied
    #[must_use]
    pub fn error_message(&self) -> Option<ViewNode> {
        if !self.errored {
            return None;
        }
        self.error_message.as_ref().map(|produce| produce())
    }

    /// Caller-supplied biometric icon, if any
    #[must_use]
    pub fn face_id_icon(&self) -> Option<ViewNode> {
        self.face_id_icon.as_ref().map(|produce| produce())
    }
}

impl fmt::Debug for Keypad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypad")
            .field("config", &self.config)
            .field("buffer", &self.buffer)
            .field("state", &self.state())
            .field("errored", &self.errored)
            .field("pending_reset", &self.pending_reset)
            .field("flash", &self.flash)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MAX_PIN_LENGTH;
    use std::cell::RefCell;
    use std::rc::Rc;

    const fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn recording_keypad(pin_length: usize) -> (Keypad, Rc<RefCell<Vec<String>>>) {
        let entered = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&entered);
        let keypad = Keypad::new(
            KeypadConfig::new().with_pin_length(pin_length),
            move |pin: &str| sink.borrow_mut().push(pin.to_string()),
        );
        (keypad, entered)
    }

    // ===== Digit entry =====

    #[test]
    fn test_fresh_keypad_is_empty() {
        let (keypad, entered) = recording_keypad(4);
        assert_eq!(keypad.pin_len(), 0);
        assert_eq!(keypad.pin_length(), 4);
        assert_eq!(keypad.state(), KeypadState::Empty);
        assert!(entered.borrow().is_empty());
        assert!(!keypad.is_animating());
    }

    #[test]
    fn test_partial_entry_does_not_fire_callback() {
        let (mut keypad, entered) = recording_keypad(4);
        for d in [1, 2, 3] {
            keypad.press_digit(d);
        }
        assert_eq!(keypad.pin_len(), 3);
        assert_eq!(keypad.state(), KeypadState::Filling(3));
        assert!(entered.borrow().is_empty());
    }

    #[test]
    fn test_completion_fires_once_then_resets() {
        let (mut keypad, entered) = recording_keypad(4);
        for d in [1, 2, 3, 4] {
            keypad.press_digit(d);
        }
        assert_eq!(*entered.borrow(), ["1234"]);
        assert_eq!(keypad.state(), KeypadState::Full);
        assert!(keypad.reset_pending());

        keypad.tick(ms(199));
        assert_eq!(keypad.pin_len(), 4);
        keypad.tick(ms(1));
        assert_eq!(keypad.pin_len(), 0);
        assert_eq!(keypad.pin_length(), 4);
        assert_eq!(entered.borrow().len(), 1);
    }

    #[test]
    fn test_press_at_capacity_is_noop() {
        let (mut keypad, entered) = recording_keypad(2);
        keypad.press_digit(5);
        keypad.press_digit(6);
        keypad.tick(ms(150));
        let scale_before = keypad.emphasis(1);

        keypad.press_digit(7);
        assert_eq!(keypad.pin_len(), 2);
        assert_eq!(entered.borrow().len(), 1);
        assert_eq!(keypad.emphasis(1), scale_before);
    }

    #[test]
    fn test_keypad_is_reusable_after_reset() {
        let (mut keypad, entered) = recording_keypad(2);
        for d in [1, 2] {
            keypad.press_digit(d);
        }
        keypad.tick(RESET_DELAY);
        for d in [3, 4] {
            keypad.press_digit(d);
        }
        assert_eq!(*entered.borrow(), ["12", "34"]);
    }

    #[test]
    fn test_zero_pin_length_clamped() {
        let (mut keypad, entered) = recording_keypad(0);
        assert_eq!(keypad.pin_length(), 1);
        keypad.press_digit(8);
        assert_eq!(*entered.borrow(), ["8"]);
    }

    #[test]
    fn test_oversized_pin_length_from_json_clamped() {
        let config = KeypadConfig::from_json(r#"{"pin_length": 18446744073709551615}"#).unwrap();
        let mut keypad = Keypad::new(config, |_: &str| {});
        assert_eq!(keypad.pin_length(), MAX_PIN_LENGTH);
        assert_eq!(keypad.view().find_all_by_test_id("pin-dot").len(), MAX_PIN_LENGTH);

        for _ in 0..MAX_PIN_LENGTH + 3 {
            keypad.press_digit(1);
        }
        assert_eq!(keypad.pin_len(), MAX_PIN_LENGTH);
    }

    #[test]
    fn test_out_of_range_digit_ignored() {
        let (mut keypad, _) = recording_keypad(4);
        keypad.press_digit(12);
        assert_eq!(keypad.pin_len(), 0);
        assert_eq!(keypad.flashed_key(), None);
    }

    // ===== Delete =====

    #[test]
    fn test_delete_on_empty_is_noop() {
        let (mut keypad, _) = recording_keypad(4);
        keypad.press_delete();
        assert_eq!(keypad.pin_len(), 0);
        assert_eq!(keypad.emphasis(0), 1.0);
    }

    #[test]
    fn test_delete_removes_last_and_pulses_its_slot() {
        let (mut keypad, _) = recording_keypad(5);
        keypad.press_digit(9);
        keypad.press_digit(8);
        keypad.tick(ms(500));

        keypad.press_delete();
        assert_eq!(keypad.pin_len(), 1);
        keypad.tick(ms(100));
        assert!((keypad.emphasis(1) - 1.2).abs() < 1e-4);
        assert_eq!(keypad.emphasis(0), 1.0);
    }

    #[test]
    fn test_delete_during_pending_reset_still_resets() {
        let (mut keypad, _) = recording_keypad(2);
        keypad.press_digit(1);
        keypad.press_digit(2);
        keypad.press_delete();
        assert_eq!(keypad.pin_len(), 1);
        keypad.tick(RESET_DELAY);
        assert_eq!(keypad.pin_len(), 0);
    }

    #[test]
    fn test_recompletion_rearms_reset() {
        let (mut keypad, entered) = recording_keypad(2);
        keypad.press_digit(1);
        keypad.press_digit(2);
        keypad.tick(ms(150));
        keypad.press_delete();
        keypad.press_digit(3);
        assert_eq!(*entered.borrow(), ["12", "13"]);

        keypad.tick(ms(150));
        assert_eq!(keypad.pin_len(), 2);
        keypad.tick(ms(50));
        assert_eq!(keypad.pin_len(), 0);
    }

    // ===== Emphasis =====

    #[test]
    fn test_emphasis_targets_new_slot() {
        let (mut keypad, _) = recording_keypad(4);
        keypad.press_digit(1);
        keypad.tick(ms(100));
        assert!((keypad.emphasis(0) - 1.2).abs() < 1e-4);
        assert_eq!(keypad.emphasis(1), 1.0);
        keypad.tick(ms(100));
        assert_eq!(keypad.emphasis(0), 1.0);
    }

    #[test]
    fn test_emphasis_out_of_range_slot_is_neutral() {
        let (keypad, _) = recording_keypad(4);
        assert_eq!(keypad.emphasis(99), 1.0);
    }

    // ===== Error flag =====

    #[test]
    fn test_shake_on_rising_edge_only() {
        let (mut keypad, _) = recording_keypad(4);
        keypad.press_digit(3);
        keypad.set_errored(true);
        keypad.tick(ms(40));
        assert!((keypad.shake_offset() + 10.0).abs() < 1e-4);
        assert_eq!(keypad.pin_len(), 1);

        keypad.tick(ms(360));
        assert_eq!(keypad.shake_offset(), 0.0);

        // Staying errored does not shake again
        keypad.set_errored(true);
        keypad.tick(ms(40));
        assert_eq!(keypad.shake_offset(), 0.0);

        keypad.set_errored(false);
        keypad.set_errored(true);
        keypad.tick(ms(40));
        assert!((keypad.shake_offset() + 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_error_message_level_triggered() {
        let (keypad, _) = recording_keypad(4);
        let mut keypad = keypad.with_error_message(|| ViewNode::text_node("Wrong PIN"));
        assert!(keypad.error_message().is_none());
        keypad.set_errored(true);
        assert!(keypad.error_message().is_some());
        keypad.tick(ms(1_000));
        assert!(keypad.error_message().is_some());
        keypad.set_errored(false);
        assert!(keypad.error_message().is_none());
    }

    #[test]
    fn test_error_slot_zooms_in_and_snaps_out() {
        let (mut keypad, _) = recording_keypad(4);
        assert_eq!(keypad.error_scale(), 0.0);

        keypad.set_errored(true);
        keypad.tick(ms(150));
        assert!((keypad.error_scale() - 0.5).abs() < 1e-4);
        // Past the zoom and the shake
        keypad.tick(ms(250));
        assert_eq!(keypad.error_scale(), 1.0);

        keypad.set_errored(false);
        assert_eq!(keypad.error_scale(), 0.0);
        assert!(!keypad.is_animating());

        // Each new error zooms in from nothing again
        keypad.set_errored(true);
        keypad.tick(ms(30));
        assert!((keypad.error_scale() - 0.1).abs() < 1e-4);
    }

    #[test]
    fn test_errored_without_producer_shows_nothing() {
        let (mut keypad, _) = recording_keypad(4);
        keypad.set_errored(true);
        assert!(keypad.error_message().is_none());
    }

    // ===== Side channels =====

    #[test]
    fn test_digit_and_backspace_notifications() {
        let digits = Rc::new(RefCell::new(Vec::new()));
        let backspaces = Rc::new(RefCell::new(0));
        let (d, b) = (Rc::clone(&digits), Rc::clone(&backspaces));
        let mut keypad = Keypad::new(KeypadConfig::new().with_pin_length(1), |_: &str| {})
            .with_on_digit_pressed(move |digit| d.borrow_mut().push(digit))
            .with_on_backspace_pressed(move || *b.borrow_mut() += 1);

        keypad.press_delete();
        keypad.press_digit(4);
        keypad.press_digit(5);
        assert_eq!(*digits.borrow(), [4, 5]);
        assert_eq!(*backspaces.borrow(), 1);
        assert_eq!(keypad.pin_len(), 1);
    }

    #[test]
    fn test_face_id_handler_only_when_enabled() {
        let hits = Rc::new(RefCell::new(0));
        let h = Rc::clone(&hits);
        let mut disabled = Keypad::new(KeypadConfig::new(), |_: &str| {})
            .with_face_id_handler(move || *h.borrow_mut() += 1);
        disabled.press_biometric();
        assert_eq!(*hits.borrow(), 0);

        let h = Rc::clone(&hits);
        let mut enabled = Keypad::new(KeypadConfig::new().with_face_id(true), |_: &str| {})
            .with_face_id_handler(move || *h.borrow_mut() += 1);
        enabled.press("key-biometric");
        assert_eq!(*hits.borrow(), 1);
        assert_eq!(enabled.pin_len(), 0);
    }

    #[test]
    fn test_press_by_test_id() {
        let (mut keypad, _) = recording_keypad(4);
        keypad.press("key-7");
        keypad.press("key-0");
        keypad.press("key-del");
        keypad.press("nonsense");
        keypad.press("key-biometric-placeholder");
        assert_eq!(keypad.pin_len(), 1);
    }

    // ===== Key flash =====

    #[test]
    fn test_key_flash_expires() {
        let (mut keypad, _) = recording_keypad(4);
        keypad.press_digit(2);
        assert_eq!(keypad.flashed_key(), Some(KeypadKey::Digit(2)));
        keypad.tick(ms(60));
        assert_eq!(keypad.flashed_key(), Some(KeypadKey::Digit(2)));
        keypad.tick(ms(40));
        assert_eq!(keypad.flashed_key(), None);
    }

    #[test]
    fn test_debug_does_not_leak_pin() {
        let (mut keypad, _) = recording_keypad(6);
        for d in [9, 1, 7, 3] {
            keypad.press_digit(d);
        }
        let debug = format!("{:?}", keypad);
        assert!(debug.contains("Keypad"));
        assert!(!debug.contains("9173"));
    }
}

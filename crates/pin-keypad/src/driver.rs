//! Unified keypad driver
//!
//! Write the behavior check once, run it against every renderer. A
//! [`KeypadDriver`] presses keys, advances time and reads back what a user
//! would see; [`ViewDriver`] reads the view tree and [`TuiDriver`] reads a
//! rendered terminal buffer. The `verify_*` functions are the shared checks.
//!
//! ```rust
//! use pin_keypad::driver::{verify_completion, ViewDriver};
//! use pin_keypad::KeypadConfig;
//!
//! let mut driver = ViewDriver::new(KeypadConfig::new());
//! verify_completion(&mut driver);
//! ```

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::config::KeypadConfig;
use crate::constants::RESET_DELAY;
use crate::keypad::Keypad;
use crate::view::{ViewNode, DOT_EMPTY_ID, DOT_FILLED_ID};

/// Abstract driver for keypad interactions
pub trait KeypadDriver {
    /// Presses a digit key
    fn press_digit(&mut self, digit: u8);

    /// Presses the delete key
    fn press_delete(&mut self);

    /// Sets the caller's error flag
    fn set_errored(&mut self, errored: bool);

    /// Advances the keypad clock
    fn advance(&mut self, dt: Duration);

    /// Number of indicators the keypad was built with
    fn pin_length(&self) -> usize;

    /// Filled indicators as rendered
    fn filled_count(&self) -> usize;

    /// All indicators as rendered
    fn indicator_count(&self) -> usize;

    /// Returns true if the rendered output shows `text`
    fn contains_text(&self, text: &str) -> bool;

    /// Returns true if a biometric button is rendered
    fn has_biometric_button(&self) -> bool;

    /// PINs delivered to the completion callback, oldest first
    fn entered_pins(&self) -> Vec<String>;
}

type Entered = Rc<RefCell<Vec<String>>>;

fn recording_keypad(config: KeypadConfig) -> (Keypad, Entered) {
    let entered: Entered = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&entered);
    let keypad = Keypad::new(config, move |pin: &str| sink.borrow_mut().push(pin.to_string()));
    (keypad, entered)
}

/// Driver that reads the view tree
#[derive(Debug)]
pub struct ViewDriver {
    keypad: Keypad,
    entered: Entered,
}

impl ViewDriver {
    /// Creates a driver over a fresh keypad
    #[must_use]
    pub fn new(config: KeypadConfig) -> Self {
        let (keypad, entered) = recording_keypad(config);
        Self { keypad, entered }
    }

    /// Supplies an error message made of `text`
    #[must_use]
    pub fn with_error_message(self, text: &str) -> Self {
        let text = text.to_string();
        Self {
            keypad: self
                .keypad
                .with_error_message(move || ViewNode::text_node(&text)),
            entered: self.entered,
        }
    }

    /// Returns a reference to the underlying keypad
    #[must_use]
    pub fn keypad(&self) -> &Keypad {
        &self.keypad
    }
}

impl KeypadDriver for ViewDriver {
    fn press_digit(&mut self, digit: u8) {
        self.keypad.press(&format!("key-{digit}"));
    }

    fn press_delete(&mut self) {
        self.keypad.press("key-del");
    }

    fn set_errored(&mut self, errored: bool) {
        self.keypad.set_errored(errored);
    }

    fn advance(&mut self, dt: Duration) {
        self.keypad.tick(dt);
    }

    fn pin_length(&self) -> usize {
        self.keypad.pin_length()
    }

    fn filled_count(&self) -> usize {
        self.keypad.view().find_all_by_test_id(DOT_FILLED_ID).len()
    }

    fn indicator_count(&self) -> usize {
        let view = self.keypad.view();
        view.find_all_by_test_id(DOT_FILLED_ID).len() + view.find_all_by_test_id(DOT_EMPTY_ID).len()
    }

    fn contains_text(&self, text: &str) -> bool {
        self.keypad.view().contains_text(text)
    }

    fn has_biometric_button(&self) -> bool {
        self.keypad.view().find_by_test_id("key-biometric").is_some()
    }

    fn entered_pins(&self) -> Vec<String> {
        self.entered.borrow().clone()
    }
}

/// TUI Driver implementation
#[cfg(feature = "tui")]
pub mod tui_driver {
    use std::time::Duration;

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{buffer::Buffer, layout::Rect, style::Color, widgets::Widget};

    use super::{recording_keypad, Entered, KeypadDriver};
    use crate::config::KeypadConfig;
    use crate::constants::GRID_COLUMNS;
    use crate::core::{position_of, KeypadKey, GRID_ROWS};
    use crate::keypad::Keypad;
    use crate::tui::{grid_area, InputHandler, KeyAction, KeypadWidget, EMPTY_DOT, FILLED_DOT};
    use crate::view::ViewNode;

    /// Terminal size the driver renders into
    const AREA: Rect = Rect {
        x: 0,
        y: 0,
        width: 40,
        height: 16,
    };

    /// Row the indicators are drawn on
    const DOTS_ROW: u16 = 1;

    /// Driver that types keys and reads a rendered terminal buffer
    #[derive(Debug)]
    pub struct TuiDriver {
        keypad: Keypad,
        entered: Entered,
        input: InputHandler,
    }

    impl TuiDriver {
        /// Creates a driver over a fresh keypad
        #[must_use]
        pub fn new(config: KeypadConfig) -> Self {
            let (keypad, entered) = recording_keypad(config);
            Self {
                keypad,
                entered,
                input: InputHandler::new(),
            }
        }

        /// Supplies an error message made of `text`
        #[must_use]
        pub fn with_error_message(self, text: &str) -> Self {
            let text = text.to_string();
            Self {
                keypad: self
                    .keypad
                    .with_error_message(move || ViewNode::text_node(&text)),
                ..self
            }
        }

        /// Returns a reference to the underlying keypad
        #[must_use]
        pub fn keypad(&self) -> &Keypad {
            &self.keypad
        }

        /// Renders the keypad into a fresh buffer
        #[must_use]
        pub fn render(&self) -> Buffer {
            let mut buf = Buffer::empty(AREA);
            KeypadWidget::new(&self.keypad).render(AREA, &mut buf);
            buf
        }

        fn type_key(&mut self, code: KeyCode) {
            let event = KeyEvent::new(code, KeyModifiers::NONE);
            if let KeyAction::Press(key) = self.input.handle_key(event) {
                self.keypad.press_key(key);
            }
        }

        fn dots_row(&self) -> String {
            let buf = self.render();
            (0..AREA.width).map(|x| buf[(x, DOTS_ROW)].symbol()).collect()
        }

        /// `(filled, total)` read from the indicator row, dots or `k/n` count
        fn read_indicators(&self) -> (usize, usize) {
            let row = self.dots_row();
            let filled = row.matches(FILLED_DOT).count();
            let empty = row.matches(EMPTY_DOT).count();
            if filled + empty > 0 {
                return (filled, filled + empty);
            }
            row.trim_matches(|c: char| c.is_whitespace() || c == '│')
                .split_once('/')
                .and_then(|(k, n)| Some((k.parse().ok()?, n.parse().ok()?)))
                .unwrap_or((0, 0))
        }
    }

    impl KeypadDriver for TuiDriver {
        fn press_digit(&mut self, digit: u8) {
            if let Some(c) = char::from_digit(u32::from(digit), 10) {
                self.type_key(KeyCode::Char(c));
            }
        }

        fn press_delete(&mut self) {
            self.type_key(KeyCode::Backspace);
        }

        fn set_errored(&mut self, errored: bool) {
            self.keypad.set_errored(errored);
        }

        fn advance(&mut self, dt: Duration) {
            self.keypad.tick(dt);
        }

        fn pin_length(&self) -> usize {
            self.keypad.pin_length()
        }

        fn filled_count(&self) -> usize {
            self.read_indicators().0
        }

        fn indicator_count(&self) -> usize {
            self.read_indicators().1
        }

        fn contains_text(&self, text: &str) -> bool {
            let buf = self.render();
            (0..AREA.height).any(|y| {
                let line: String = (0..AREA.width).map(|x| buf[(x, y)].symbol()).collect();
                line.contains(text)
            })
        }

        fn has_biometric_button(&self) -> bool {
            let Some((row, col)) = position_of(KeypadKey::Biometric) else {
                return false;
            };
            let buf = self.render();
            let grid = grid_area(AREA);
            let width = grid.width / GRID_COLUMNS as u16;
            let height = grid.height / GRID_ROWS as u16;
            let (x0, y0) = (grid.x + col as u16 * width, grid.y + row as u16 * height);

            // Anything drawn in the slot means a button is there
            (y0..y0 + height).any(|y| {
                (x0..x0 + width).any(|x| {
                    let cell = &buf[(x, y)];
                    !cell.symbol().trim().is_empty() || cell.bg != Color::Reset
                })
            })
        }

        fn entered_pins(&self) -> Vec<String> {
            self.entered.borrow().clone()
        }
    }
}

#[cfg(feature = "tui")]
pub use tui_driver::TuiDriver;

// ===== Shared behavior checks =====
// Each check expects a fresh driver.

fn digits(count: usize) -> Vec<u8> {
    (1..=count).map(|i| (i % 10) as u8).collect()
}

fn expected_pin(count: usize) -> String {
    digits(count).iter().map(u8::to_string).collect()
}

/// A fresh keypad shows `pin_length` empty indicators
pub fn verify_fresh_state<D: KeypadDriver>(driver: &mut D) {
    let n = driver.pin_length();
    assert_eq!(driver.indicator_count(), n);
    assert_eq!(driver.filled_count(), 0);
    assert!(driver.entered_pins().is_empty());
}

/// Each accepted digit fills one more indicator; nothing fires early
pub fn verify_partial_entry<D: KeypadDriver>(driver: &mut D) {
    let n = driver.pin_length();
    for (k, digit) in digits(n - 1).into_iter().enumerate() {
        driver.press_digit(digit);
        assert_eq!(driver.filled_count(), k + 1);
        assert_eq!(driver.indicator_count(), n);
    }
    assert!(driver.entered_pins().is_empty());
}

/// A full PIN fires once, then clears after the reset delay
pub fn verify_completion<D: KeypadDriver>(driver: &mut D) {
    let n = driver.pin_length();
    for digit in digits(n) {
        driver.press_digit(digit);
    }
    assert_eq!(driver.entered_pins(), [expected_pin(n)]);
    assert_eq!(driver.filled_count(), n);

    driver.advance(RESET_DELAY);
    assert_eq!(driver.filled_count(), 0);
    assert_eq!(driver.indicator_count(), n);
    assert_eq!(driver.entered_pins().len(), 1);
}

/// Delete is a no-op on empty input and removes one digit otherwise
pub fn verify_delete<D: KeypadDriver>(driver: &mut D) {
    driver.press_delete();
    assert_eq!(driver.filled_count(), 0);

    let n = driver.pin_length();
    let k = n.saturating_sub(1).max(1).min(2);
    if k < n {
        for digit in digits(k) {
            driver.press_digit(digit);
        }
        driver.press_delete();
        assert_eq!(driver.filled_count(), k - 1);
    }
}

/// Presses past capacity before the reset neither grow nor re-fire
pub fn verify_overflow_ignored<D: KeypadDriver>(driver: &mut D) {
    let n = driver.pin_length();
    for digit in digits(n) {
        driver.press_digit(digit);
    }
    for digit in [7, 8, 9] {
        driver.press_digit(digit);
    }
    assert_eq!(driver.filled_count(), n);
    assert_eq!(driver.entered_pins(), [expected_pin(n)]);
}

/// The biometric button appears iff enabled
pub fn verify_biometric_slot<D: KeypadDriver>(driver: &mut D, uses_face_id: bool) {
    assert_eq!(driver.has_biometric_button(), uses_face_id);
}

/// The error message shows exactly while errored
///
/// The driver must have been given `message` as its error message.
pub fn verify_error_message<D: KeypadDriver>(driver: &mut D, message: &str) {
    assert!(!driver.contains_text(message));
    driver.set_errored(true);
    assert!(driver.contains_text(message));
    driver.advance(Duration::from_millis(500));
    assert!(driver.contains_text(message));
    driver.set_errored(false);
    assert!(!driver.contains_text(message));
}

/// An error never touches the digits entered so far
pub fn verify_error_keeps_input<D: KeypadDriver>(driver: &mut D) {
    let n = driver.pin_length();
    let k = n.saturating_sub(1);
    for digit in digits(k) {
        driver.press_digit(digit);
    }
    driver.set_errored(true);
    driver.advance(Duration::from_millis(400));
    assert_eq!(driver.filled_count(), k);
}

/// Typing 1-2-3-4 on a 4-digit keypad delivers "1234"
pub fn verify_scenario_1234<D: KeypadDriver>(driver: &mut D) {
    assert_eq!(driver.pin_length(), 4);
    for digit in [1, 2, 3, 4] {
        driver.press_digit(digit);
    }
    assert_eq!(driver.entered_pins(), ["1234"]);
    driver.advance(RESET_DELAY);
    assert_eq!(driver.filled_count(), 0);
}

/// 9, 8, delete, 7 on a 5-digit keypad leaves two digits and no callback
pub fn verify_scenario_delete<D: KeypadDriver>(driver: &mut D) {
    assert_eq!(driver.pin_length(), 5);
    driver.press_digit(9);
    driver.press_digit(8);
    driver.press_delete();
    driver.press_digit(7);
    assert_eq!(driver.filled_count(), 2);
    assert!(driver.entered_pins().is_empty());
}

//! Keypad model: keys, grid layout and input state
//!
//! Renderer-independent. Both the view tree and the terminal widget lay
//! keys out from [`KEY_GRID`].

pub mod buffer;

pub use buffer::PinBuffer;

use crate::constants::{DELETE_GLYPH, GRID_COLUMNS};

/// One cell of the keypad grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeypadKey {
    /// Digit 0-9
    Digit(u8),
    /// Biometric slot (button or placeholder)
    Biometric,
    /// Delete the last digit
    Delete,
}

impl KeypadKey {
    /// Label drawn on the key; the biometric slot has none of its own
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Digit(d) => d.to_string(),
            Self::Biometric => String::new(),
            Self::Delete => DELETE_GLYPH.to_string(),
        }
    }

    /// Test id used to find the key in rendered output
    #[must_use]
    pub fn test_id(&self) -> String {
        match self {
            Self::Digit(d) => format!("key-{d}"),
            Self::Biometric => "key-biometric".to_string(),
            Self::Delete => "key-del".to_string(),
        }
    }

    /// Parses a test id back into a key
    #[must_use]
    pub fn from_test_id(id: &str) -> Option<Self> {
        match id {
            "key-del" => Some(Self::Delete),
            "key-biometric" => Some(Self::Biometric),
            _ => {
                let rest = id.strip_prefix("key-")?;
                let mut chars = rest.chars();
                let d = chars.next()?.to_digit(10)?;
                chars.next().is_none().then_some(Self::Digit(d as u8))
            }
        }
    }

    /// Maps a typed character to a key
    #[must_use]
    pub fn from_char(ch: char) -> Option<Self> {
        ch.to_digit(10).map(|d| Self::Digit(d as u8))
    }
}

/// The fixed keypad layout, row-major, 3 columns
/// ```text
/// [ 1 ] [ 2 ] [ 3 ]
/// [ 4 ] [ 5 ] [ 6 ]
/// [ 7 ] [ 8 ] [ 9 ]
/// [bio] [ 0 ] [ ⌫ ]
/// ```
pub const KEY_GRID: [KeypadKey; 12] = [
    KeypadKey::Digit(1),
    KeypadKey::Digit(2),
    KeypadKey::Digit(3),
    KeypadKey::Digit(4),
    KeypadKey::Digit(5),
    KeypadKey::Digit(6),
    KeypadKey::Digit(7),
    KeypadKey::Digit(8),
    KeypadKey::Digit(9),
    KeypadKey::Biometric,
    KeypadKey::Digit(0),
    KeypadKey::Delete,
];

/// Number of grid rows
pub const GRID_ROWS: usize = KEY_GRID.len() / GRID_COLUMNS;

/// Key at a grid position
#[must_use]
pub fn key_at(row: usize, col: usize) -> Option<KeypadKey> {
    if row < GRID_ROWS && col < GRID_COLUMNS {
        KEY_GRID.get(row * GRID_COLUMNS + col).copied()
    } else {
        None
    }
}

/// Grid position (row, col) of a key
#[must_use]
pub fn position_of(key: KeypadKey) -> Option<(usize, usize)> {
    KEY_GRID
        .iter()
        .position(|k| *k == key)
        .map(|i| (i / GRID_COLUMNS, i % GRID_COLUMNS))
}

/// Keys with their (row, col) positions
pub fn keys_with_positions() -> impl Iterator<Item = ((usize, usize), KeypadKey)> {
    KEY_GRID
        .iter()
        .enumerate()
        .map(|(i, key)| ((i / GRID_COLUMNS, i % GRID_COLUMNS), *key))
}

/// Where the widget is in its input cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeypadState {
    /// No digits entered
    Empty,
    /// Some digits entered, fewer than the PIN length
    Filling(usize),
    /// PIN complete; clears itself after the reset delay
    Full,
}

impl KeypadState {
    /// Derives the state from buffer length and capacity
    #[must_use]
    pub fn from_len(len: usize, capacity: usize) -> Self {
        if len == 0 {
            Self::Empty
        } else if len >= capacity {
            Self::Full
        } else {
            Self::Filling(len)
        }
    }
}

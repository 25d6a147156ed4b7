//! Bounded PIN buffer
//!
//! Holds the digits entered so far. Length never exceeds the capacity
//! fixed at construction.

use std::fmt;

use crate::constants::{MAX_PIN_LENGTH, MIN_PIN_LENGTH};

/// In-progress PIN digits
#[derive(Clone, PartialEq, Eq)]
pub struct PinBuffer {
    digits: String,
    capacity: usize,
}

impl PinBuffer {
    /// Creates an empty buffer; capacity is clamped to
    /// `MIN_PIN_LENGTH..=MAX_PIN_LENGTH`
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.clamp(MIN_PIN_LENGTH, MAX_PIN_LENGTH);
        Self {
            digits: String::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a digit, returning the slot index it landed in
    ///
    /// Returns `None` (and leaves the buffer untouched) when the buffer is
    /// full or `digit` is not 0-9.
    pub fn push(&mut self, digit: u8) -> Option<usize> {
        if self.is_full() {
            return None;
        }
        let ch = char::from_digit(u32::from(digit), 10)?;
        let slot = self.digits.len();
        self.digits.push(ch);
        Some(slot)
    }

    /// Removes the last digit, returning the slot index it vacated
    pub fn pop(&mut self) -> Option<usize> {
        self.digits.pop().map(|_| self.digits.len())
    }

    /// Empties the buffer
    pub fn clear(&mut self) {
        self.digits.clear();
    }

    /// Number of digits entered
    #[must_use]
    pub fn len(&self) -> usize {
        self.digits.len()
    }

    /// Returns true if no digits are entered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    /// Returns true once the buffer holds `capacity` digits
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.digits.len() >= self.capacity
    }

    /// Maximum number of digits
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The digits entered so far
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.digits
    }
}

// Digits stay out of debug output and logs.
impl fmt::Debug for PinBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PinBuffer")
            .field("len", &self.digits.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

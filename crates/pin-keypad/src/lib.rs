//! pin-keypad - on-screen numeric keypad for PIN entry
//!
//! A reusable keypad widget: digits accumulate into a bounded PIN, each
//! press pulses its indicator, an error flag shakes the indicator row, and
//! a callback receives the PIN once it reaches the configured length.
//! The widget never validates or stores PINs; that is the caller's job.
//!
//! One [`Keypad`] state machine feeds two renderers:
//!
//! - [`Keypad::view`] builds a renderer-neutral [`ViewNode`] tree
//! - [`tui::KeypadWidget`] draws into a ratatui buffer (feature `tui`)
//!
//! Time is driven by the host through [`Keypad::tick`]; nothing in the
//! crate reads a clock or spawns a timer.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use pin_keypad::prelude::*;
//!
//! let mut keypad = Keypad::new(KeypadConfig::new(), |pin: &str| {
//!     assert_eq!(pin, "1234");
//! });
//!
//! for d in [1, 2, 3, 4] {
//!     keypad.press_digit(d);
//! }
//! assert_eq!(keypad.state(), KeypadState::Full);
//!
//! // The completed PIN clears itself shortly after
//! keypad.tick(Duration::from_millis(200));
//! assert_eq!(keypad.state(), KeypadState::Empty);
//! ```

#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::float_cmp
    )
)]
#![deny(missing_docs)]
#![deny(missing_debug_implementations)]

pub mod animation;
pub mod config;
pub mod constants;
pub mod core;
pub mod driver;
pub mod error;
pub mod keypad;
pub mod style;
pub mod view;

#[cfg(feature = "tui")]
pub mod tui;

pub use crate::config::{Color, KeypadConfig, StyleOverride, Theme};
pub use crate::core::{KeypadKey, KeypadState};
pub use crate::error::{KeypadError, KeypadResult};
pub use crate::keypad::Keypad;
pub use crate::view::ViewNode;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::animation::{Easing, Stage, Timeline};
    pub use crate::config::{Color, KeypadConfig, StyleOverride, Theme};
    pub use crate::core::{KeypadKey, KeypadState, PinBuffer};
    pub use crate::driver::{KeypadDriver, ViewDriver};
    pub use crate::error::{KeypadError, KeypadResult};
    pub use crate::keypad::Keypad;
    pub use crate::style::ResolvedStyle;
    pub use crate::view::ViewNode;

    #[cfg(feature = "tui")]
    pub use crate::driver::TuiDriver;
    #[cfg(feature = "tui")]
    pub use crate::tui::{InputHandler, KeyAction, KeypadWidget};
}

//! Error types for the fallible edges of the crate
//!
//! The widget itself never fails: presses, ticks and renders are total.
//! Errors only come from turning external input (config files, color
//! strings) into typed configuration.

use thiserror::Error;

/// Result type for configuration operations
pub type KeypadResult<T> = Result<T, KeypadError>;

/// Keypad configuration errors
#[derive(Debug, Error)]
pub enum KeypadError {
    /// Color string is not `#rgb`, `#rrggbb` or `transparent`
    #[error("invalid color: {0:?}")]
    InvalidColor(String),

    /// Configuration JSON could not be parsed
    #[error("invalid keypad config: {0}")]
    Config(#[from] serde_json::Error),

    /// Configuration file could not be read
    #[error("failed to read keypad config: {0}")]
    Io(#[from] std::io::Error),
}

//! Keypad configuration surface
//!
//! Everything the caller can tune about appearance and behavior. A
//! [`KeypadConfig`] is plain data: the widget reads it, never mutates it.
//! It can be built in code or loaded from JSON, where every field is
//! optional and falls back to [`DEFAULTS`](crate::constants::DEFAULTS).

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULTS, MAX_PIN_LENGTH, MIN_PIN_LENGTH};
use crate::error::{KeypadError, KeypadResult};

/// Color scheme used to pick light/dark variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light variants
    #[default]
    Light,
    /// Dark variants
    Dark,
}

impl Theme {
    /// Returns true for the dark theme
    #[must_use]
    pub const fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }

    /// Returns the other theme
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Light => write!(f, "light"),
            Self::Dark => write!(f, "dark"),
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(format!("unknown theme {other:?} (expected light or dark)")),
        }
    }
}

/// A fill or text color
///
/// Parsed from `#rgb`, `#rrggbb` or `transparent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Color {
    /// No fill
    Transparent,
    /// Opaque RGB color
    Rgb(u8, u8, u8),
}

impl Color {
    /// Creates an opaque RGB color
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::Rgb(r, g, b)
    }

    /// Parses a hex color string
    pub fn hex(s: &str) -> KeypadResult<Self> {
        s.parse()
    }

    /// Returns true for [`Color::Transparent`]
    #[must_use]
    pub const fn is_transparent(self) -> bool {
        matches!(self, Self::Transparent)
    }
}

impl FromStr for Color {
    type Err = KeypadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("transparent") {
            return Ok(Self::Transparent);
        }

        let invalid = || KeypadError::InvalidColor(s.to_string());
        let digits = trimmed.strip_prefix('#').ok_or_else(invalid)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |hex: &str| u8::from_str_radix(hex, 16).map_err(|_| invalid());
        match digits.len() {
            3 => {
                // #abc expands each nibble: #aabbcc
                let expand = |i: usize| channel(&digits[i..=i].repeat(2));
                Ok(Self::Rgb(expand(0)?, expand(1)?, expand(2)?))
            }
            6 => Ok(Self::Rgb(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = KeypadError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transparent => write!(f, "transparent"),
            Self::Rgb(r, g, b) => write!(f, "#{r:02x}{g:02x}{b:02x}"),
        }
    }
}

/// Caller-supplied style properties
///
/// Every field is optional; set fields win over anything the widget derives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleOverride {
    /// Background fill
    pub background: Option<Color>,
    /// Text color
    pub color: Option<Color>,
    /// Font size
    pub font_size: Option<u16>,
    /// Corner rounding
    pub radius: Option<u16>,
    /// Width in layout units
    pub width: Option<u16>,
    /// Height in layout units
    pub height: Option<u16>,
    /// Outer margin in layout units
    pub margin: Option<u16>,
    /// Opacity, 0.0 (invisible) to 1.0
    pub opacity: Option<f32>,
}

impl StyleOverride {
    /// Creates an empty override
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the background
    #[must_use]
    pub const fn background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    /// Sets the text color
    #[must_use]
    pub const fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Sets the font size
    #[must_use]
    pub const fn font_size(mut self, size: u16) -> Self {
        self.font_size = Some(size);
        self
    }

    /// Sets the corner radius
    #[must_use]
    pub const fn radius(mut self, radius: u16) -> Self {
        self.radius = Some(radius);
        self
    }

    /// Sets the opacity
    #[must_use]
    pub const fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = Some(opacity);
        self
    }
}

/// Appearance and behavior options for a [`Keypad`](crate::Keypad)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeypadConfig {
    /// Number of digits in a complete PIN
    pub pin_length: usize,
    /// Selects light or dark color variants
    pub theme: Theme,

    /// Filled indicator color (light theme)
    pub dot_color_light: Color,
    /// Filled indicator color (dark theme)
    pub dot_color_dark: Color,
    /// Empty indicator color
    pub empty_dot_color: Color,

    /// Button background (light theme)
    pub keypad_color_light: Color,
    /// Button background (dark theme)
    pub keypad_color_dark: Color,
    /// Button background for both themes; wins over the light/dark pair
    pub keypad_color: Option<Color>,

    /// Button label color (light theme)
    pub text_color_light: Color,
    /// Button label color (dark theme)
    pub text_color_dark: Color,
    /// Button label color for both themes; wins over the light/dark pair
    pub text_color: Option<Color>,

    /// Label font size
    pub keypad_text_size: u16,
    /// Corner rounding for buttons and indicators
    pub keypad_radius: u16,
    /// Spacing between grid cells
    pub grid_gap: u16,

    /// Suppress button background fill
    pub disable_keypad_background: bool,
    /// Show the biometric slot as an interactive button
    pub uses_face_id: bool,
    /// Give the biometric button the digit-button background
    pub apply_background_to_face_id_button: bool,

    /// Style merged last onto the container
    pub container_style: StyleOverride,
    /// Style merged last onto every button
    pub button_style: StyleOverride,
    /// Style merged last onto every button label
    pub button_text_style: StyleOverride,
}

impl Default for KeypadConfig {
    fn default() -> Self {
        Self {
            pin_length: DEFAULTS.pin_length,
            theme: DEFAULTS.theme,
            dot_color_light: DEFAULTS.dot_color_light,
            dot_color_dark: DEFAULTS.dot_color_dark,
            empty_dot_color: DEFAULTS.empty_dot_color,
            keypad_color_light: DEFAULTS.keypad_color_light,
            keypad_color_dark: DEFAULTS.keypad_color_dark,
            keypad_color: None,
            text_color_light: DEFAULTS.text_color_light,
            text_color_dark: DEFAULTS.text_color_dark,
            text_color: None,
            keypad_text_size: DEFAULTS.keypad_text_size,
            keypad_radius: DEFAULTS.border_radius,
            grid_gap: DEFAULTS.grid_gap,
            disable_keypad_background: DEFAULTS.disable_keypad_background,
            uses_face_id: DEFAULTS.uses_face_id,
            apply_background_to_face_id_button: DEFAULTS.apply_face_id_button_background,
            container_style: StyleOverride::default(),
            button_style: StyleOverride::default(),
            button_text_style: StyleOverride::default(),
        }
    }
}

impl KeypadConfig {
    /// Create a config with all defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> KeypadResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        tracing::debug!(
            pin_length = config.pin_length,
            theme = %config.theme,
            "Loaded keypad config"
        );
        Ok(config)
    }

    /// Load a config from a JSON file
    pub fn load(path: impl AsRef<Path>) -> KeypadResult<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_json(&contents)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> KeypadResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// PIN length actually used by the widget, clamped to
    /// `MIN_PIN_LENGTH..=MAX_PIN_LENGTH`
    #[must_use]
    pub fn effective_pin_length(&self) -> usize {
        self.pin_length.clamp(MIN_PIN_LENGTH, MAX_PIN_LENGTH)
    }

    /// Set the PIN length
    #[must_use]
    pub const fn with_pin_length(mut self, pin_length: usize) -> Self {
        self.pin_length = pin_length;
        self
    }

    /// Set the theme
    #[must_use]
    pub const fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Set the filled indicator color for both themes
    #[must_use]
    pub const fn with_dot_color(mut self, color: Color) -> Self {
        self.dot_color_light = color;
        self.dot_color_dark = color;
        self
    }

    /// Set a unified button background
    #[must_use]
    pub const fn with_keypad_color(mut self, color: Color) -> Self {
        self.keypad_color = Some(color);
        self
    }

    /// Set a unified label color
    #[must_use]
    pub const fn with_text_color(mut self, color: Color) -> Self {
        self.text_color = Some(color);
        self
    }

    /// Set the grid gap
    #[must_use]
    pub const fn with_grid_gap(mut self, gap: u16) -> Self {
        self.grid_gap = gap;
        self
    }

    /// Set the label font size
    #[must_use]
    pub const fn with_text_size(mut self, size: u16) -> Self {
        self.keypad_text_size = size;
        self
    }

    /// Enable or disable the biometric button
    #[must_use]
    pub const fn with_face_id(mut self, uses_face_id: bool) -> Self {
        self.uses_face_id = uses_face_id;
        self
    }

    /// Suppress button backgrounds
    #[must_use]
    pub const fn without_keypad_background(mut self) -> Self {
        self.disable_keypad_background = true;
        self
    }

    /// Set the button style override
    #[must_use]
    pub const fn with_button_style(mut self, style: StyleOverride) -> Self {
        self.button_style = style;
        self
    }

    /// Set the button label style override
    #[must_use]
    pub const fn with_button_text_style(mut self, style: StyleOverride) -> Self {
        self.button_text_style = style;
        self
    }

    /// Set the container style override
    #[must_use]
    pub const fn with_container_style(mut self, style: StyleOverride) -> Self {
        self.container_style = style;
        self
    }
}

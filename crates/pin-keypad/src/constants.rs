//! Default configuration values and animation constants

use std::time::Duration;

use crate::config::{Color, Theme};

/// Defaults applied to every option the caller leaves unset
#[derive(Debug, Clone, Copy)]
pub struct Defaults {
    // ===== PIN Config =====
    /// Number of digits in a complete PIN
    pub pin_length: usize,
    /// Corner rounding for buttons and indicators
    pub border_radius: u16,
    /// Spacing between grid cells
    pub grid_gap: u16,
    /// Font size of button labels
    pub keypad_text_size: u16,
    /// Theme used to pick color variants
    pub theme: Theme,

    // ===== Color Config =====
    /// Indicator color for unfilled slots
    pub empty_dot_color: Color,
    /// Indicator color for filled slots (light theme)
    pub dot_color_light: Color,
    /// Indicator color for filled slots (dark theme)
    pub dot_color_dark: Color,
    /// Button background (light theme)
    pub keypad_color_light: Color,
    /// Button background (dark theme)
    pub keypad_color_dark: Color,
    /// Button label color (light theme)
    pub text_color_light: Color,
    /// Button label color (dark theme)
    pub text_color_dark: Color,

    // ===== Feature Toggles =====
    /// Suppress button background fill
    pub disable_keypad_background: bool,
    /// Show the biometric slot as a button
    pub uses_face_id: bool,
    /// Give the biometric button the same background as digit buttons
    pub apply_face_id_button_background: bool,
}

/// Default widget configuration
pub const DEFAULTS: Defaults = Defaults {
    pin_length: 4,
    border_radius: 30,
    grid_gap: 10,
    keypad_text_size: 24,
    theme: Theme::Light,

    empty_dot_color: Color::rgb(0xcc, 0xcc, 0xcc),
    dot_color_light: Color::rgb(0x66, 0x66, 0x66),
    dot_color_dark: Color::rgb(0x44, 0x44, 0x44),
    keypad_color_light: Color::rgb(0xee, 0xee, 0xee),
    keypad_color_dark: Color::rgb(0x11, 0x11, 0x11),
    text_color_light: Color::rgb(0x00, 0x00, 0x00),
    text_color_dark: Color::rgb(0xff, 0xff, 0xff),

    disable_keypad_background: false,
    uses_face_id: false,
    apply_face_id_button_background: true,
};

/// Animation tuning values
#[derive(Debug, Clone, Copy)]
pub struct AnimationValues {
    /// Peak horizontal displacement of the shake, in layout units
    pub offset: f32,
    /// Duration of one full shake leg
    pub timing: Duration,
    /// Duration of the error slot's zoom in
    pub error_zoom: Duration,
    /// Peak scale of the per-slot emphasis pulse
    pub emphasis_scale: f32,
    /// Duration of each half of the emphasis pulse
    pub emphasis_leg: Duration,
    /// Number of alternating legs in the shake
    pub shake_repeats: usize,
}

/// Default animation tuning
pub const ANIMATION_VALUES: AnimationValues = AnimationValues {
    offset: 10.0,
    timing: Duration::from_millis(80),
    error_zoom: Duration::from_millis(300),
    emphasis_scale: 1.2,
    emphasis_leg: Duration::from_millis(100),
    shake_repeats: 4,
};

/// Delay between completion and clearing the buffer, so the last filled
/// indicator is visible before reset
pub const RESET_DELAY: Duration = Duration::from_millis(200);

/// How long a pressed key stays highlighted
pub const KEY_FLASH: Duration = Duration::from_millis(100);

/// Smallest accepted PIN length; smaller values are clamped up
pub const MIN_PIN_LENGTH: usize = 1;

/// Largest accepted PIN length; larger values are clamped down
pub const MAX_PIN_LENGTH: usize = 32;

/// Glyph shown in the biometric slot when no icon producer is supplied
pub const DEFAULT_FACE_ID_GLYPH: &str = "🔐";

/// Label of the delete key
pub const DELETE_GLYPH: &str = "⌫";

// ===== Fixed layout metrics (layout units) =====

/// Width and height of one keypad button
pub const BUTTON_SIZE: u16 = 60;
/// Outer margin around each button
pub const BUTTON_MARGIN: u16 = 5;
/// Diameter of one indicator dot
pub const DOT_SIZE: u16 = 16;
/// Outer margin around each indicator dot
pub const DOT_MARGIN: u16 = 8;
/// Gap between indicator dots
pub const DOTS_GAP: u16 = 5;
/// Space between the indicator row and what follows it
pub const DOTS_MARGIN_BOTTOM: u16 = 20;
/// Space below the error slot
pub const ERROR_MARGIN_BOTTOM: u16 = 10;
/// Width of the button grid
pub const GRID_WIDTH: u16 = 240;
/// Number of grid columns
pub const GRID_COLUMNS: usize = 3;

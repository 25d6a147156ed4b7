//! Style resolution pipeline
//!
//! Every rendered element gets its style from three ordered layers:
//!
//! ```text
//! base (fixed layout metrics) ─→ theme-derived (config + theme) ─→ caller override
//! ```
//!
//! Later layers win field by field. Renderers only ever see the
//! [`ResolvedStyle`] at the end of the pipeline.

use serde::Serialize;

use crate::config::{Color, KeypadConfig, StyleOverride};
use crate::constants::{BUTTON_MARGIN, BUTTON_SIZE, DOT_MARGIN, DOT_SIZE};

/// Which kind of grid cell is being styled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonKind {
    /// Digit or delete key
    Key,
    /// Biometric slot shown as a button
    Biometric,
    /// Biometric slot hidden but keeping its footprint
    Placeholder,
}

/// Fully resolved style of one element
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolvedStyle {
    /// Background fill
    pub background: Color,
    /// Text color
    pub color: Color,
    /// Font size
    pub font_size: u16,
    /// Corner rounding
    pub radius: u16,
    /// Width in layout units (0 = sized by content)
    pub width: u16,
    /// Height in layout units (0 = sized by content)
    pub height: u16,
    /// Outer margin
    pub margin: u16,
    /// Opacity, 0.0 to 1.0
    pub opacity: f32,
}

impl ResolvedStyle {
    /// Returns true if the element takes up space but draws nothing
    #[must_use]
    pub fn is_invisible(&self) -> bool {
        self.opacity <= 0.0
    }
}

impl From<StyleOverride> for ResolvedStyle {
    fn from(style: StyleOverride) -> Self {
        Self {
            background: style.background.unwrap_or(Color::Transparent),
            color: style.color.unwrap_or(Color::rgb(0, 0, 0)),
            font_size: style.font_size.unwrap_or(0),
            radius: style.radius.unwrap_or(0),
            width: style.width.unwrap_or(0),
            height: style.height.unwrap_or(0),
            margin: style.margin.unwrap_or(0),
            opacity: style.opacity.unwrap_or(1.0).clamp(0.0, 1.0),
        }
    }
}

/// Merge two layers; fields set in `over` win
#[must_use]
pub fn merge(base: StyleOverride, over: &StyleOverride) -> StyleOverride {
    StyleOverride {
        background: over.background.or(base.background),
        color: over.color.or(base.color),
        font_size: over.font_size.or(base.font_size),
        radius: over.radius.or(base.radius),
        width: over.width.or(base.width),
        height: over.height.or(base.height),
        margin: over.margin.or(base.margin),
        opacity: over.opacity.or(base.opacity),
    }
}

/// Run the layers in order and resolve the result
#[must_use]
pub fn resolve(layers: &[StyleOverride]) -> ResolvedStyle {
    layers
        .iter()
        .fold(StyleOverride::default(), |acc, layer| merge(acc, layer))
        .into()
}

// ===== Theme-derived colors =====

/// Color of a filled indicator for the active theme
#[must_use]
pub fn dot_color(config: &KeypadConfig) -> Color {
    if config.theme.is_dark() {
        config.dot_color_dark
    } else {
        config.dot_color_light
    }
}

/// Button background for the active theme; the unified color wins
#[must_use]
pub fn keypad_color(config: &KeypadConfig) -> Color {
    config.keypad_color.unwrap_or(if config.theme.is_dark() {
        config.keypad_color_dark
    } else {
        config.keypad_color_light
    })
}

/// Label color for the active theme; the unified color wins
#[must_use]
pub fn text_color(config: &KeypadConfig) -> Color {
    config.text_color.unwrap_or(if config.theme.is_dark() {
        config.text_color_dark
    } else {
        config.text_color_light
    })
}

// ===== Element styles =====

/// Style of the outer container
#[must_use]
pub fn container_style(config: &KeypadConfig) -> ResolvedStyle {
    resolve(&[StyleOverride::default(), config.container_style])
}

/// Style of one indicator dot
#[must_use]
pub fn dot_style(config: &KeypadConfig, filled: bool) -> ResolvedStyle {
    let base = StyleOverride {
        width: Some(DOT_SIZE),
        height: Some(DOT_SIZE),
        margin: Some(DOT_MARGIN),
        radius: Some(DOT_SIZE / 2),
        ..StyleOverride::default()
    };
    let themed = StyleOverride {
        background: Some(if filled {
            dot_color(config)
        } else {
            config.empty_dot_color
        }),
        radius: Some(config.keypad_radius),
        ..StyleOverride::default()
    };
    resolve(&[base, themed])
}

/// Style of one grid cell
#[must_use]
pub fn button_style(config: &KeypadConfig, kind: ButtonKind) -> ResolvedStyle {
    let base = StyleOverride {
        width: Some(BUTTON_SIZE),
        height: Some(BUTTON_SIZE),
        margin: Some(BUTTON_MARGIN),
        ..StyleOverride::default()
    };

    let background = if config.disable_keypad_background {
        Color::Transparent
    } else {
        match kind {
            ButtonKind::Key | ButtonKind::Placeholder => keypad_color(config),
            ButtonKind::Biometric if config.apply_background_to_face_id_button => config
                .button_style
                .background
                .unwrap_or_else(|| keypad_color(config)),
            ButtonKind::Biometric => Color::Transparent,
        }
    };
    let themed = StyleOverride {
        background: Some(background),
        radius: Some(config.keypad_radius),
        ..StyleOverride::default()
    };

    match kind {
        ButtonKind::Key | ButtonKind::Biometric => resolve(&[base, themed, config.button_style]),
        // The placeholder keeps the caller's geometry so the grid stays
        // aligned, but never becomes visible.
        ButtonKind::Placeholder => resolve(&[
            base,
            themed,
            config.button_style,
            StyleOverride::new().opacity(0.0),
        ]),
    }
}

/// Style of a button label
#[must_use]
pub fn label_style(config: &KeypadConfig) -> ResolvedStyle {
    let themed = StyleOverride {
        color: Some(text_color(config)),
        font_size: Some(config.keypad_text_size),
        ..StyleOverride::default()
    };
    resolve(&[themed, config.button_text_style])
}

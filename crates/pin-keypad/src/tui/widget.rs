//! Terminal rendering of a [`Keypad`]
//!
//! ```text
//! ┌ PIN ───────────────────┐
//! │        ● ● ○ ○         │  indicators, shifted by the shake
//! │  You entered an inv…   │  error text while errored
//! │                        │
//! │   1     2     3        │
//! │   4     5     6        │  4 × 3 grid, pressed key highlighted
//! │   7     8     9        │
//! │  🔐     0     ⌫        │
//! └────────────────────────┘
//! ```

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

use crate::config;
use crate::constants::{DEFAULT_FACE_ID_GLYPH, GRID_COLUMNS};
use crate::core::{key_at, keys_with_positions, KeypadKey, GRID_ROWS};
use crate::keypad::Keypad;
use crate::style::{self, ButtonKind};

/// Rows above the grid: indicators, error text, spacer
const HEADER_ROWS: u16 = 3;

/// Layout units of shake offset per terminal cell
const UNITS_PER_CELL: f32 = 5.0;

/// Glyph of a filled indicator
pub const FILLED_DOT: &str = "●";
/// Glyph of an empty indicator
pub const EMPTY_DOT: &str = "○";

/// Maps a keypad color to a terminal color; transparent leaves the cell alone
#[must_use]
pub fn to_tui_color(color: config::Color) -> Option<Color> {
    match color {
        config::Color::Transparent => None,
        config::Color::Rgb(r, g, b) => Some(Color::Rgb(r, g, b)),
    }
}

fn inner_area(area: Rect) -> Rect {
    Rect {
        x: area.x.saturating_add(1),
        y: area.y.saturating_add(1),
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    }
}

/// Area occupied by the button grid when the widget is drawn in `area`
#[must_use]
pub fn grid_area(area: Rect) -> Rect {
    let inner = inner_area(area);
    Rect {
        x: inner.x,
        y: inner.y.saturating_add(HEADER_ROWS),
        width: inner.width,
        height: inner.height.saturating_sub(HEADER_ROWS),
    }
}

/// Converts a click position to the key under it
#[must_use]
pub fn hit_test(area: Rect, x: u16, y: u16) -> Option<KeypadKey> {
    let grid = grid_area(area);
    if x < grid.x || y < grid.y || x >= grid.x + grid.width || y >= grid.y + grid.height {
        return None;
    }

    let btn_width = grid.width / GRID_COLUMNS as u16;
    let btn_height = grid.height / GRID_ROWS as u16;
    if btn_width == 0 || btn_height == 0 {
        return None;
    }

    let col = ((x - grid.x) / btn_width) as usize;
    let row = ((y - grid.y) / btn_height) as usize;
    key_at(row, col)
}

/// Indicator row shift in whole cells
fn shake_cells(offset: f32) -> i32 {
    (offset / UNITS_PER_CELL).round() as i32
}

/// Keypad widget for rendering
#[derive(Debug)]
pub struct KeypadWidget<'a> {
    keypad: &'a Keypad,
    title: &'a str,
}

impl<'a> KeypadWidget<'a> {
    /// Creates a new keypad widget
    #[must_use]
    pub fn new(keypad: &'a Keypad) -> Self {
        Self {
            keypad,
            title: " PIN ",
        }
    }

    /// Sets the border title
    #[must_use]
    pub fn title(mut self, title: &'a str) -> Self {
        self.title = title;
        self
    }

    fn dot_style(&self, slot: usize) -> Style {
        let keypad = self.keypad;
        let dot = style::dot_style(keypad.config(), keypad.is_filled(slot));
        let mut style = Style::default();
        if let Some(fg) = to_tui_color(dot.background) {
            style = style.fg(fg);
        }
        if keypad.emphasis(slot) > 1.0 + f32::EPSILON {
            style = style.add_modifier(Modifier::BOLD);
        }
        style
    }

    /// Indicator line that fits in `width` cells
    ///
    /// Dots are space separated when room allows, packed when it doesn't,
    /// and replaced by a `filled/total` count when even packed dots would
    /// be clipped.
    fn dots_line(&self, width: usize) -> Line<'static> {
        let keypad = self.keypad;
        let n = keypad.pin_length();

        if n > width {
            let filled = keypad.pin_len();
            let style = self.dot_style(filled.saturating_sub(1));
            return Line::from(Span::styled(format!("{filled}/{n}"), style));
        }

        let spaced = 2 * n - 1 <= width;
        let mut spans = Vec::with_capacity(n * 2);
        for slot in 0..n {
            if spaced && slot > 0 {
                spans.push(Span::raw(" "));
            }
            let glyph = if keypad.is_filled(slot) { FILLED_DOT } else { EMPTY_DOT };
            spans.push(Span::styled(glyph, self.dot_style(slot)));
        }
        Line::from(spans)
    }

    fn render_dots(&self, inner: Rect, buf: &mut Buffer) {
        let keypad = self.keypad;
        let line = self.dots_line(usize::from(inner.width));

        let width = u16::try_from(line.width()).unwrap_or(u16::MAX);
        let free = inner.width.saturating_sub(width);
        let centered = i32::from(inner.x) + i32::from(free / 2) + shake_cells(keypad.shake_offset());
        let max_x = i32::from(inner.x) + i32::from(free);
        let x = u16::try_from(centered.clamp(i32::from(inner.x), max_x)).unwrap_or(inner.x);

        buf.set_line(x, inner.y, &line, inner.width);
    }

    fn render_error(&self, inner: Rect, buf: &mut Buffer) {
        let Some(message) = self.keypad.error_message() else {
            return;
        };
        let text = message.text();
        let span = Span::styled(text, Style::default().fg(Color::Red));
        let width = u16::try_from(span.width()).unwrap_or(u16::MAX);
        let x = inner.x + inner.width.saturating_sub(width) / 2;
        buf.set_span(x, inner.y + 1, &span, inner.width);
    }

    fn render_grid(&self, grid: Rect, buf: &mut Buffer) {
        let keypad = self.keypad;
        let config = keypad.config();
        let label = style::label_style(config);

        let btn_width = grid.width / GRID_COLUMNS as u16;
        let btn_height = grid.height / GRID_ROWS as u16;

        for ((row, col), key) in keys_with_positions() {
            let kind = match key {
                KeypadKey::Biometric if config.uses_face_id => ButtonKind::Biometric,
                KeypadKey::Biometric => continue,
                _ => ButtonKind::Key,
            };
            let button = style::button_style(config, kind);
            if button.is_invisible() {
                continue;
            }

            let x = grid.x + col as u16 * btn_width;
            let y = grid.y + row as u16 * btn_height;

            let mut style = Style::default();
            if let Some(bg) = to_tui_color(button.background) {
                style = style.bg(bg);
            }
            if let Some(fg) = to_tui_color(label.color) {
                style = style.fg(fg);
            }
            if keypad.flashed_key() == Some(key) {
                style = style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
            }

            // One column and one row of spacing between buttons
            let cell = Rect {
                x,
                y,
                width: btn_width.saturating_sub(1).max(1),
                height: btn_height.saturating_sub(1).max(1),
            };
            buf.set_style(cell, style);

            let text = match key {
                KeypadKey::Biometric => keypad
                    .face_id_icon()
                    .map_or_else(|| DEFAULT_FACE_ID_GLYPH.to_string(), |icon| icon.text()),
                _ => key.label(),
            };
            let span = Span::styled(text, style);
            let width = u16::try_from(span.width()).unwrap_or(u16::MAX);
            let label_x = x + cell.width.saturating_sub(width) / 2;
            let label_y = y + cell.height / 2;
            buf.set_span(label_x, label_y, &span, cell.width);
        }
    }
}

impl Widget for KeypadWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Block::default()
            .title(self.title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .render(area, buf);

        let inner = inner_area(area);
        let grid = grid_area(area);
        if inner.width < GRID_COLUMNS as u16 * 2 || grid.height < GRID_ROWS as u16 {
            return; // Too small to render
        }

        self.render_dots(inner, buf);
        self.render_error(inner, buf);
        self.render_grid(grid, buf);
    }
}

//! Terminal frontend (ratatui + crossterm)

mod input;
mod widget;

pub use input::{InputHandler, KeyAction};
pub use widget::{grid_area, hit_test, to_tui_color, KeypadWidget, EMPTY_DOT, FILLED_DOT};

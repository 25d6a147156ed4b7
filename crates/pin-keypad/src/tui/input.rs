//! Keyboard and mouse input mapping
//!
//! Keys map onto the same [`KeypadKey`]s the grid shows, so a typed digit
//! and a clicked digit take the same path through the keypad.

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;

use crate::core::KeypadKey;
use crate::tui::widget::hit_test;

/// Actions that can be triggered by terminal input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Press a keypad key
    Press(KeypadKey),
    /// Quit the application
    Quit,
    /// No action (ignored input)
    None,
}

/// Input handler that maps terminal events to actions
#[derive(Debug, Default)]
pub struct InputHandler;

impl InputHandler {
    /// Creates a new input handler
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Maps a key event to an action
    #[must_use]
    pub fn handle_key(&self, event: KeyEvent) -> KeyAction {
        let KeyEvent {
            code,
            modifiers,
            kind,
            ..
        } = event;

        // Some terminals report releases too; act on presses only
        if kind == KeyEventKind::Release {
            return KeyAction::None;
        }

        if modifiers.contains(KeyModifiers::CONTROL) {
            return match code {
                KeyCode::Char('c') => KeyAction::Quit,
                _ => KeyAction::None,
            };
        }

        match code {
            KeyCode::Char(c) => KeypadKey::from_char(c).map_or_else(
                || match c {
                    'f' | 'F' => KeyAction::Press(KeypadKey::Biometric),
                    _ => KeyAction::None,
                },
                KeyAction::Press,
            ),
            KeyCode::Backspace | KeyCode::Delete => KeyAction::Press(KeypadKey::Delete),
            KeyCode::Esc => KeyAction::Quit,
            _ => KeyAction::None,
        }
    }

    /// Maps a mouse event over a widget drawn in `area` to an action
    #[must_use]
    pub fn handle_mouse(&self, event: MouseEvent, area: Rect) -> KeyAction {
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => hit_test(area, event.column, event.row)
                .map_or(KeyAction::None, KeyAction::Press),
            _ => KeyAction::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::widget::grid_area;

    fn key_event(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn key_event_ctrl(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::CONTROL)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_handle_digit_keys() {
        let handler = InputHandler::new();
        for (i, c) in ('0'..='9').enumerate() {
            assert_eq!(
                handler.handle_key(key_event(KeyCode::Char(c))),
                KeyAction::Press(KeypadKey::Digit(i as u8))
            );
        }
    }

    #[test]
    fn test_handle_delete_keys() {
        let handler = InputHandler::new();
        for code in [KeyCode::Backspace, KeyCode::Delete] {
            assert_eq!(
                handler.handle_key(key_event(code)),
                KeyAction::Press(KeypadKey::Delete)
            );
        }
    }

    #[test]
    fn test_handle_biometric_key() {
        let handler = InputHandler::new();
        assert_eq!(
            handler.handle_key(key_event(KeyCode::Char('f'))),
            KeyAction::Press(KeypadKey::Biometric)
        );
    }

    #[test]
    fn test_handle_quit() {
        let handler = InputHandler::new();
        assert_eq!(handler.handle_key(key_event(KeyCode::Esc)), KeyAction::Quit);
        assert_eq!(
            handler.handle_key(key_event_ctrl(KeyCode::Char('c'))),
            KeyAction::Quit
        );
    }

    #[test]
    fn test_ignored_keys() {
        let handler = InputHandler::new();
        for code in [KeyCode::Char('x'), KeyCode::Enter, KeyCode::Left, KeyCode::Tab] {
            assert_eq!(handler.handle_key(key_event(code)), KeyAction::None);
        }
        assert_eq!(
            handler.handle_key(key_event_ctrl(KeyCode::Char('1'))),
            KeyAction::None
        );
    }

    #[test]
    fn test_key_release_ignored() {
        let handler = InputHandler::new();
        let mut event = key_event(KeyCode::Char('1'));
        event.kind = KeyEventKind::Release;
        assert_eq!(handler.handle_key(event), KeyAction::None);
    }

    #[test]
    fn test_mouse_click_on_key() {
        let handler = InputHandler::new();
        let area = Rect::new(0, 0, 32, 16);
        let grid = grid_area(area);
        let click = mouse(MouseEventKind::Down(MouseButton::Left), grid.x, grid.y);
        assert_eq!(
            handler.handle_mouse(click, area),
            KeyAction::Press(KeypadKey::Digit(1))
        );
    }

    #[test]
    fn test_mouse_other_events_ignored() {
        let handler = InputHandler::new();
        let area = Rect::new(0, 0, 32, 16);
        let grid = grid_area(area);
        let moved = mouse(MouseEventKind::Moved, grid.x, grid.y);
        assert_eq!(handler.handle_mouse(moved, area), KeyAction::None);
        let outside = mouse(MouseEventKind::Down(MouseButton::Left), 0, 0);
        assert_eq!(handler.handle_mouse(outside, area), KeyAction::None);
    }
}

//! Renderer-neutral view tree
//!
//! [`Keypad::view`] turns widget state into a tree of [`ViewNode`]s: tags,
//! test ids, text, classes, attributes and resolved styles. Hosts that are
//! not terminals render from this tree; tests query it the way component
//! tests query rendered output.
//!
//! ```text
//! keypad-container
//! ├── pin-dots            translate-x = shake offset
//! │   └── pin-dot | pin-dot-filled   (× pin length, scale = emphasis)
//! ├── pin-error           only while errored and a message is supplied,
//! │                       scale = error zoom
//! └── keypad-grid         gap = grid gap
//!     └── key-1 … key-9, key-biometric | key-biometric-placeholder, key-0, key-del
//! ```

use std::collections::BTreeMap;

use serde::Serialize;

use crate::constants::DEFAULT_FACE_ID_GLYPH;
use crate::core::{KeypadKey, KEY_GRID};
use crate::keypad::Keypad;
use crate::style::{self, ButtonKind, ResolvedStyle};

/// Test id of a filled indicator
pub const DOT_FILLED_ID: &str = "pin-dot-filled";
/// Test id of an empty indicator
pub const DOT_EMPTY_ID: &str = "pin-dot";
/// Test id of the inert biometric placeholder
pub const PLACEHOLDER_ID: &str = "key-biometric-placeholder";

/// One element of a rendered keypad
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewNode {
    /// Element kind (`div`, `button`, `span`)
    pub tag: String,
    /// Identifier used by tests and press dispatch
    #[serde(skip_serializing_if = "String::is_empty")]
    pub test_id: String,
    /// Own text content
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    /// Classes
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    /// Attributes, in key order
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    /// Resolved style, if the element carries one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<ResolvedStyle>,
    /// False when the element keeps its footprint but draws nothing
    pub visible: bool,
    /// Child elements
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ViewNode>,
}

impl Default for ViewNode {
    fn default() -> Self {
        Self::new("div")
    }
}

impl ViewNode {
    /// Creates an empty element with the given tag
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            test_id: String::new(),
            text: String::new(),
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            style: None,
            visible: true,
            children: Vec::new(),
        }
    }

    /// Creates a text span
    #[must_use]
    pub fn text_node(text: &str) -> Self {
        Self::new("span").with_text(text)
    }

    /// Sets the test id
    #[must_use]
    pub fn with_test_id(mut self, id: &str) -> Self {
        self.test_id = id.to_string();
        self
    }

    /// Sets the text content
    #[must_use]
    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    /// Adds a class
    #[must_use]
    pub fn with_class(mut self, class: &str) -> Self {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
        self
    }

    /// Sets an attribute
    #[must_use]
    pub fn with_attr(mut self, key: &str, value: impl ToString) -> Self {
        self.attributes.insert(key.to_string(), value.to_string());
        self
    }

    /// Sets the resolved style; invisible styles hide the element
    #[must_use]
    pub fn with_style(mut self, style: ResolvedStyle) -> Self {
        self.visible = !style.is_invisible();
        self.style = Some(style);
        self
    }

    /// Adds a child element
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Checks if element has a class
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Gets an attribute value
    #[must_use]
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// This node and all descendants, depth first
    #[must_use]
    pub fn descendants(&self) -> Vec<&Self> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.descendants());
        }
        out
    }

    /// First node with the given test id
    #[must_use]
    pub fn find_by_test_id(&self, id: &str) -> Option<&Self> {
        self.descendants().into_iter().find(|n| n.test_id == id)
    }

    /// Every node with the given test id, in document order
    #[must_use]
    pub fn find_all_by_test_id(&self, id: &str) -> Vec<&Self> {
        self.descendants()
            .into_iter()
            .filter(|n| n.test_id == id)
            .collect()
    }

    /// First node whose own text equals `text`
    #[must_use]
    pub fn find_by_text(&self, text: &str) -> Option<&Self> {
        self.descendants().into_iter().find(|n| n.text == text)
    }

    /// Returns true if any visible text in the subtree contains `text`
    #[must_use]
    pub fn contains_text(&self, text: &str) -> bool {
        self.text().contains(text)
    }

    /// Concatenated text of the visible subtree
    #[must_use]
    pub fn text(&self) -> String {
        if !self.visible {
            return String::new();
        }
        let mut out = self.text.clone();
        for child in &self.children {
            out.push_str(&child.text());
        }
        out
    }
}

impl Keypad {
    /// Renders the current state as a view tree
    #[must_use]
    pub fn view(&self) -> ViewNode {
        let config = self.config();

        let mut root = ViewNode::new("div")
            .with_test_id("keypad-container")
            .with_style(style::container_style(config))
            .with_attr("theme", config.theme)
            .with_child(self.dots_view());

        if let Some(message) = self.error_message() {
            root = root.with_child(
                ViewNode::new("div")
                    .with_test_id("pin-error")
                    .with_attr("scale", format!("{:.3}", self.error_scale()))
                    .with_child(message),
            );
        }

        root.with_child(self.grid_view())
    }

    fn dots_view(&self) -> ViewNode {
        let config = self.config();
        (0..self.pin_length()).fold(
            ViewNode::new("div")
                .with_test_id("pin-dots")
                .with_attr("translate-x", format!("{:.2}", self.shake_offset())),
            |row, slot| {
                let filled = self.is_filled(slot);
                row.with_child(
                    ViewNode::new("div")
                        .with_test_id(if filled { DOT_FILLED_ID } else { DOT_EMPTY_ID })
                        .with_attr("index", slot)
                        .with_attr("scale", format!("{:.3}", self.emphasis(slot)))
                        .with_style(style::dot_style(config, filled)),
                )
            },
        )
    }

    fn grid_view(&self) -> ViewNode {
        let config = self.config();
        KEY_GRID.iter().fold(
            ViewNode::new("div")
                .with_test_id("keypad-grid")
                .with_attr("gap", config.grid_gap),
            |grid, key| grid.with_child(self.key_view(*key)),
        )
    }

    fn key_view(&self, key: KeypadKey) -> ViewNode {
        let config = self.config();

        if key == KeypadKey::Biometric && !config.uses_face_id {
            return ViewNode::new("div")
                .with_test_id(PLACEHOLDER_ID)
                .with_style(style::button_style(config, ButtonKind::Placeholder));
        }

        let kind = if key == KeypadKey::Biometric {
            ButtonKind::Biometric
        } else {
            ButtonKind::Key
        };
        let content = match key {
            KeypadKey::Biometric => self
                .face_id_icon()
                .unwrap_or_else(|| ViewNode::text_node(DEFAULT_FACE_ID_GLYPH)),
            _ => ViewNode::text_node(&key.label()).with_style(style::label_style(config)),
        };

        let mut button = ViewNode::new("button")
            .with_test_id(&key.test_id())
            .with_style(style::button_style(config, kind))
            .with_child(content);
        if self.flashed_key() == Some(key) {
            button = button.with_class("pressed");
        }
        button
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::ANIMATION_VALUES;
    use crate::config::{KeypadConfig, Theme};
    use std::time::Duration;

    fn keypad(config: KeypadConfig) -> Keypad {
        Keypad::new(config, |_: &str| {})
    }

    // ===== ViewNode =====

    #[test]
    fn test_builder_and_queries() {
        let tree = ViewNode::new("div")
            .with_test_id("root")
            .with_child(ViewNode::text_node("Hello").with_test_id("a"))
            .with_child(
                ViewNode::new("div")
                    .with_child(ViewNode::text_node("World").with_test_id("a").with_class("x")),
            );

        assert_eq!(tree.find_all_by_test_id("a").len(), 2);
        assert_eq!(tree.find_by_text("World").map(|n| n.has_class("x")), Some(true));
        assert!(tree.contains_text("HelloWorld"));
        assert!(tree.find_by_test_id("missing").is_none());
    }

    #[test]
    fn test_invisible_subtree_has_no_text() {
        let hidden = ViewNode::text_node("secret").with_style(
            style::resolve(&[crate::config::StyleOverride::new().opacity(0.0)]),
        );
        assert!(!hidden.visible);
        assert_eq!(hidden.text(), "");
    }

    #[test]
    fn test_with_class_dedupes() {
        let node = ViewNode::new("div").with_class("a").with_class("a");
        assert_eq!(node.classes, ["a"]);
    }

    // ===== Keypad::view =====

    #[test]
    fn test_fresh_view_has_empty_dots() {
        let view = keypad(KeypadConfig::new().with_pin_length(6)).view();
        assert_eq!(view.find_all_by_test_id(DOT_EMPTY_ID).len(), 6);
        assert!(view.find_all_by_test_id(DOT_FILLED_ID).is_empty());
    }

    #[test]
    fn test_view_reflects_entered_digits() {
        let mut keypad = keypad(KeypadConfig::new());
        keypad.press("key-1");
        keypad.press("key-2");
        let view = keypad.view();
        let dots = view.find_by_test_id("pin-dots").map(|n| n.children.clone());
        let ids: Vec<String> = dots.unwrap_or_default().into_iter().map(|n| n.test_id).collect();
        assert_eq!(ids, [DOT_FILLED_ID, DOT_FILLED_ID, DOT_EMPTY_ID, DOT_EMPTY_ID]);
    }

    #[test]
    fn test_grid_has_twelve_cells_in_order() {
        let view = keypad(KeypadConfig::new()).view();
        let grid = view.find_by_test_id("keypad-grid").unwrap();
        let ids: Vec<&str> = grid.children.iter().map(|n| n.test_id.as_str()).collect();
        assert_eq!(
            ids,
            [
                "key-1", "key-2", "key-3", "key-4", "key-5", "key-6", "key-7", "key-8", "key-9",
                PLACEHOLDER_ID, "key-0", "key-del"
            ]
        );
        assert_eq!(grid.attr("gap"), Some("10"));
        assert!(view.find_by_text("⌫").is_some());
    }

    #[test]
    fn test_placeholder_without_face_id() {
        let view = keypad(KeypadConfig::new()).view();
        let placeholder = view.find_by_test_id(PLACEHOLDER_ID).unwrap();
        assert!(!placeholder.visible);
        assert!(view.find_by_test_id("key-biometric").is_none());
        assert!(!view.contains_text(DEFAULT_FACE_ID_GLYPH));
    }

    #[test]
    fn test_default_face_id_glyph() {
        let view = keypad(KeypadConfig::new().with_face_id(true)).view();
        let button = view.find_by_test_id("key-biometric").unwrap();
        assert_eq!(button.text(), DEFAULT_FACE_ID_GLYPH);
        assert!(view.find_by_test_id(PLACEHOLDER_ID).is_none());
    }

    #[test]
    fn test_custom_face_id_icon() {
        let view = keypad(KeypadConfig::new().with_face_id(true))
            .with_face_id_icon(|| ViewNode::text_node("FACE").with_test_id("face-icon"))
            .view();
        let button = view.find_by_test_id("key-biometric").unwrap();
        assert!(button.find_by_test_id("face-icon").is_some());
        assert!(!view.contains_text(DEFAULT_FACE_ID_GLYPH));
    }

    #[test]
    fn test_error_slot_present_only_while_errored() {
        let mut keypad = keypad(KeypadConfig::new())
            .with_error_message(|| ViewNode::text_node("You entered an invalid PIN"));
        assert!(keypad.view().find_by_test_id("pin-error").is_none());

        keypad.set_errored(true);
        let view = keypad.view();
        let slot = view.find_by_test_id("pin-error").unwrap();
        assert_eq!(slot.attr("scale"), Some("0.000"));
        assert!(view.contains_text("You entered an invalid PIN"));

        keypad.tick(ANIMATION_VALUES.error_zoom);
        let view = keypad.view();
        assert_eq!(view.find_by_test_id("pin-error").unwrap().attr("scale"), Some("1.000"));

        keypad.set_errored(false);
        assert!(!keypad.view().contains_text("invalid PIN"));
    }

    #[test]
    fn test_shake_offset_in_attribute() {
        let mut keypad = keypad(KeypadConfig::new());
        keypad.set_errored(true);
        keypad.tick(Duration::from_millis(40));
        let view = keypad.view();
        let row = view.find_by_test_id("pin-dots").unwrap();
        assert_eq!(row.attr("translate-x"), Some("-10.00"));
    }

    #[test]
    fn test_pressed_class_follows_flash() {
        let mut keypad = keypad(KeypadConfig::new());
        keypad.press("key-5");
        let view = keypad.view();
        assert!(view.find_by_test_id("key-5").unwrap().has_class("pressed"));
        assert!(!view.find_by_test_id("key-4").unwrap().has_class("pressed"));
    }

    #[test]
    fn test_theme_drives_button_colors() {
        let dark = keypad(KeypadConfig::new().with_theme(Theme::Dark)).view();
        let key = dark.find_by_test_id("key-1").unwrap();
        assert_eq!(
            key.style.map(|s| s.background),
            Some(crate::constants::DEFAULTS.keypad_color_dark)
        );
    }

    #[test]
    fn test_view_serializes_to_json() {
        let json = serde_json::to_string(&keypad(KeypadConfig::new()).view()).unwrap();
        assert!(json.contains("\"test_id\":\"keypad-container\""));
        assert!(json.contains("\"#eeeeee\""));
    }
}

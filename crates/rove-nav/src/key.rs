//! Navigation keys and the key-code map built from them.

use crossterm::event::KeyCode;
use rove_core::dom::{Document, NodeId};
use std::collections::HashMap;

/// The physical keys a container reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavKey {
    LeftArrow,
    RightArrow,
    UpArrow,
    DownArrow,
    Home,
    End,
    Space,
}

/// Read-only table mapping each [`NavKey`] to the key code that produces it.
///
/// The default table uses the usual arrow, Home, End and space keys.  Hosts
/// with different bindings (for example vi-style `h`/`j`/`k`/`l`) inject
/// their own table through [`NavOptions`](crate::NavOptions).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyTable {
    codes: HashMap<NavKey, KeyCode>,
}

impl Default for KeyTable {
    fn default() -> Self {
        Self {
            codes: HashMap::from([
                (NavKey::LeftArrow, KeyCode::Left),
                (NavKey::RightArrow, KeyCode::Right),
                (NavKey::UpArrow, KeyCode::Up),
                (NavKey::DownArrow, KeyCode::Down),
                (NavKey::Home, KeyCode::Home),
                (NavKey::End, KeyCode::End),
                (NavKey::Space, KeyCode::Char(' ')),
            ]),
        }
    }
}

impl KeyTable {
    /// Rebind one key.
    pub fn with(mut self, key: NavKey, code: KeyCode) -> Self {
        self.codes.insert(key, code);
        self
    }

    pub fn code(&self, key: NavKey) -> Option<KeyCode> {
        self.codes.get(&key).copied()
    }

    /// Whether `code` is bound to `key`.
    pub fn is(&self, key: NavKey, code: KeyCode) -> bool {
        self.code(key) == Some(code)
    }

    /// Keys a text field handles itself: caret movement along the line.
    pub fn is_caret_key(&self, code: KeyCode) -> bool {
        [NavKey::LeftArrow, NavKey::RightArrow, NavKey::Home, NavKey::End]
            .into_iter()
            .any(|key| self.is(key, code))
    }
}

/// What a mapped key does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    FocusFirst,
    FocusLast,
    /// Semantic "previous" on the horizontal axis.
    LeftArrow,
    /// Semantic "next" on the horizontal axis.
    RightArrow,
    UpArrow,
    DownArrow,
}

/// Key code → action, fixed when the container is set up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCodeMap {
    actions: HashMap<KeyCode, NavAction>,
}

impl KeyCodeMap {
    /// Build the map for a container.
    ///
    /// In right-to-left containers the physical left and right keys trade
    /// places, so [`NavAction::LeftArrow`] always means "previous".
    pub fn build(table: &KeyTable, right_to_left: bool) -> Self {
        let (left, right) = if right_to_left {
            (NavKey::RightArrow, NavKey::LeftArrow)
        } else {
            (NavKey::LeftArrow, NavKey::RightArrow)
        };
        let bindings = [
            (NavKey::Home, NavAction::FocusFirst),
            (NavKey::End, NavAction::FocusLast),
            (left, NavAction::LeftArrow),
            (right, NavAction::RightArrow),
            (NavKey::UpArrow, NavAction::UpArrow),
            (NavKey::DownArrow, NavAction::DownArrow),
        ];
        let actions = bindings
            .into_iter()
            .filter_map(|(key, action)| Some((table.code(key)?, action)))
            .collect();
        Self { actions }
    }

    pub fn action(&self, code: KeyCode) -> Option<NavAction> {
        self.actions.get(&code).copied()
    }
}

const TEXT_INPUT_TYPES: &[&str] = &[
    "color", "email", "number", "password", "search", "tel", "text", "url", "range",
];

/// Whether `node` is an editable text control that owns caret keys.
pub fn takes_input(doc: &Document, node: NodeId) -> bool {
    if doc.is_read_only(node) {
        return false;
    }
    match doc.input_type(node) {
        Some(ty) => TEXT_INPUT_TYPES.contains(&ty.as_str()),
        None => doc.tag(node) == "textarea",
    }
}

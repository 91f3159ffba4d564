use crate::dom::NodeId;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A keyboard event delivered to a container, tagged with the element it
/// was dispatched at.
///
/// `NavEvent` wraps a [`crossterm::event::KeyEvent`] so key codes and
/// modifiers use the full crossterm API.  Like a browser event it carries two
/// flags that handlers flip to tell the host what happened:
///
/// * [`stop_propagation`](NavEvent::stop_propagation) -- ancestors should
///   not see the event.
/// * [`prevent_default`](NavEvent::prevent_default) -- the host should skip
///   its built-in reaction (activation, scrolling, the follow-up key-press).
///
/// # Example
///
/// ```rust,ignore
/// use rove_core::event::NavEvent;
/// use crossterm::event::KeyCode;
///
/// let mut ev = NavEvent::from_code(KeyCode::Home, item);
/// container.key_down(&mut ev);
/// if !ev.default_prevented() {
///     // let the host handle Home itself
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEvent {
    /// The key that was pressed.
    pub key: KeyEvent,
    /// The element the event was dispatched at (usually the focused one).
    pub target: NodeId,
    propagation_stopped: bool,
    default_prevented: bool,
}

impl NavEvent {
    pub fn new(key: KeyEvent, target: NodeId) -> Self {
        Self {
            key,
            target,
            propagation_stopped: false,
            default_prevented: false,
        }
    }

    /// Build an event for `code` with no modifiers.
    pub fn from_code(code: KeyCode, target: NodeId) -> Self {
        Self::new(KeyEvent::new(code, KeyModifiers::NONE), target)
    }

    /// Replace the modifier set.
    pub fn with_modifiers(mut self, modifiers: KeyModifiers) -> Self {
        self.key.modifiers = modifiers;
        self
    }

    pub fn code(&self) -> KeyCode {
        self.key.code
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// The character a key-press for this key would produce, if any.
    ///
    /// Enter and Tab map to their control characters so callers can filter
    /// everything at or below space in one comparison.
    pub fn char_code(&self) -> Option<char> {
        match self.key.code {
            KeyCode::Char(c) => Some(c),
            KeyCode::Enter => Some('\r'),
            KeyCode::Tab => Some('\t'),
            _ => None,
        }
    }

    /// Whether Ctrl, Alt, or a Meta/Super key is held. Shift does not count.
    pub fn has_command_modifier(&self) -> bool {
        self.key.modifiers.intersects(
            KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER | KeyModifiers::META,
        )
    }
}

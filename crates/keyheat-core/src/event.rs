#![forbid(unsafe_code)]

//! Press/release events addressed by key index.

use crate::keymap::KeyPosition;

/// Whether a key went down or came up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    Press,
    Release,
}

impl KeyAction {
    #[must_use]
    pub const fn is_press(self) -> bool {
        matches!(self, Self::Press)
    }
}

/// A single key transition.
///
/// `index` is host-provided and unvalidated; consumers bounds-check it
/// against their own key count. `position` is informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub index: usize,
    pub action: KeyAction,
    pub position: Option<KeyPosition>,
}

impl KeyEvent {
    #[must_use]
    pub const fn new(index: usize, action: KeyAction) -> Self {
        Self {
            index,
            action,
            position: None,
        }
    }

    #[must_use]
    pub const fn press(index: usize) -> Self {
        Self::new(index, KeyAction::Press)
    }

    #[must_use]
    pub const fn release(index: usize) -> Self {
        Self::new(index, KeyAction::Release)
    }

    /// Attach the host-reported position of the event.
    #[must_use]
    pub const fn with_position(mut self, position: KeyPosition) -> Self {
        self.position = Some(position);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_kind() {
        assert!(KeyAction::Press.is_press());
        assert!(!KeyAction::Release.is_press());
    }

    #[test]
    fn constructors_set_action_and_clear_position() {
        let ev = KeyEvent::press(4);
        assert_eq!(ev.index, 4);
        assert_eq!(ev.action, KeyAction::Press);
        assert_eq!(ev.position, None);

        let ev = KeyEvent::release(9).with_position(KeyPosition::new(3, 5));
        assert_eq!(ev.action, KeyAction::Release);
        assert_eq!(ev.position, Some(KeyPosition::new(3, 5)));
    }
}

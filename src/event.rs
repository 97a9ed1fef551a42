//! Input event model.
//!
//! Events are the unit of traffic between the polling thread and the
//! dispatch loop: key presses, terminal resizes, and backend read errors.
//! Exactly one kind is active per event.

use bitflags::bitflags;
use crossterm::event::KeyModifiers;

bitflags! {
    /// Modifier keys held during a key press
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL  = 0b0010;
        const ALT   = 0b0100;
    }
}

impl From<KeyModifiers> for Modifiers {
    fn from(mods: KeyModifiers) -> Self {
        let mut result = Modifiers::empty();
        if mods.contains(KeyModifiers::SHIFT) {
            result |= Modifiers::SHIFT;
        }
        if mods.contains(KeyModifiers::CONTROL) {
            result |= Modifiers::CTRL;
        }
        if mods.contains(KeyModifiers::ALT) {
            result |= Modifiers::ALT;
        }
        result
    }
}

/// Key identity: exactly one of a printable character or a symbolic key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A printable character
    Char(char),
    Enter,
    Esc,
    Backspace,
    Tab,
    BackTab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    Delete,
    /// Function key F1..F12
    F(u8),
}

/// A single key press
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyPress {
    pub code: KeyCode,
    pub mods: Modifiers,
}

impl KeyPress {
    /// A key press with no modifiers
    pub fn plain(code: KeyCode) -> Self {
        Self {
            code,
            mods: Modifiers::empty(),
        }
    }

    /// A plain character press
    pub fn ch(ch: char) -> Self {
        Self::plain(KeyCode::Char(ch))
    }
}

/// A discrete terminal notification delivered to the dispatch loop.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// A key was pressed
    Key(KeyPress),
    /// The terminal was resized
    Resize { cols: u16, rows: u16 },
    /// The backend failed while reading input
    Error(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_conversion() {
        assert_eq!(Modifiers::from(KeyModifiers::NONE), Modifiers::empty());
        assert_eq!(Modifiers::from(KeyModifiers::CONTROL), Modifiers::CTRL);
        assert_eq!(
            Modifiers::from(KeyModifiers::SHIFT | KeyModifiers::ALT),
            Modifiers::SHIFT | Modifiers::ALT
        );
    }

    #[test]
    fn test_key_press_constructors() {
        let press = KeyPress::ch('q');
        assert_eq!(press.code, KeyCode::Char('q'));
        assert!(press.mods.is_empty());

        let press = KeyPress::plain(KeyCode::Enter);
        assert_eq!(press.code, KeyCode::Enter);
    }
}

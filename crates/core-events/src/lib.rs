//! Input events delivered to a text-edit widget.
//!
//! Pointer coordinates are surface pixels; the widget subtracts its own
//! origin before hit-testing. Ticks carry the timestamp the owner's loop
//! observed so blink timing stays deterministic under test.

use std::fmt;
use std::time::Instant;

pub mod script;
pub use script::{KeyScriptError, parse_key_script};

/// Top-level event consumed by `TextEdit::process_event`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Mouse(MouseEvent),
    Key(KeyEvent),
    Scrollbar(ScrollbarEvent),
    /// Periodic monotonic tick driving the cursor blink.
    Tick(Instant),
    FocusGained,
    FocusLost,
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const CTRL = 0b0000_0001;
        const ALT  = 0b0000_0010;
        const SHIFT= 0b0000_0100;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    pub x: i32,
    pub y: i32,
    pub mods: KeyModifiers,
}

impl MouseEvent {
    pub fn new(kind: MouseEventKind, x: i32, y: i32) -> Self {
        Self {
            kind,
            x,
            y,
            mods: KeyModifiers::empty(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseEventKind {
    Down(MouseButton),
    Up(MouseButton),
    Drag(MouseButton),
    ScrollUp,
    ScrollDown,
    Moved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Vertical,
    Horizontal,
}

/// Scrollbar thumb moved by the user. `value` is a line index for the
/// vertical bar and a pixel offset for the horizontal one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScrollbarEvent {
    pub orientation: Orientation,
    pub value: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyEvent {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::empty())
    }

    pub fn shift(&self) -> bool {
        self.mods.contains(KeyModifiers::SHIFT)
    }

    pub fn ctrl(&self) -> bool {
        self.mods.contains(KeyModifiers::CTRL)
    }
}

/// Normalized logical keys. Control characters delivered as `Char` (BS,
/// DEL, CR, LF) are resolved by the key translator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Delete,
    Insert,
    Tab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}{:?}", self.code, self.mods)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_event_display() {
        let k = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CTRL);
        let s = format!("{}", k);
        assert!(s.contains("Char"));
        assert!(k.ctrl());
        assert!(!k.shift());
    }

    #[test]
    fn mouse_event_defaults_to_no_modifiers() {
        let m = MouseEvent::new(MouseEventKind::Down(MouseButton::Left), 3, 4);
        assert!(m.mods.is_empty());
        assert_eq!((m.x, m.y), (3, 4));
    }
}

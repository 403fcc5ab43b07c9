//! Keyboard to `Action` translation.
//!
//! Stateless: modifiers select between plain, extending (Shift) and
//! shortcut (Ctrl) resolutions. Control characters that some hosts deliver
//! as `Char` are folded onto their dedicated keys (BS, DEL, CR, LF).

use crate::{Action, EditKind, MotionKind};
use core_events::{KeyCode, KeyEvent, KeyModifiers};
use core_text::codec::{REPLACEMENT, unit_from_char};

const BS: char = '\u{8}';
const DEL: char = '\u{7f}';

/// Resolve a key. `None` means the widget does not consume it.
pub fn translate_key(key: &KeyEvent) -> Option<Action> {
    let ctrl = key.ctrl();
    let shift = key.shift();
    let alt = key.mods.contains(KeyModifiers::ALT);

    if ctrl {
        return match key.code {
            KeyCode::Char(c) => match c.to_ascii_lowercase() {
                'c' => Some(Action::Copy),
                'x' => Some(Action::Cut),
                'v' => Some(Action::Paste),
                'a' => Some(Action::SelectAll),
                _ => None,
            },
            KeyCode::Insert => Some(Action::Copy),
            KeyCode::Home => Some(motion(MotionKind::BufferStart, shift)),
            KeyCode::End => Some(motion(MotionKind::BufferEnd, shift)),
            _ => None,
        };
    }

    let action = match key.code {
        KeyCode::Insert if shift => Action::Paste,
        KeyCode::Delete if shift => Action::Cut,
        KeyCode::Insert | KeyCode::Esc => return None,
        KeyCode::Enter | KeyCode::Char('\r') | KeyCode::Char('\n') => Action::Edit(EditKind::NewLine),
        KeyCode::Backspace | KeyCode::Char(BS) => Action::Edit(EditKind::Backspace),
        KeyCode::Delete | KeyCode::Char(DEL) => Action::Edit(EditKind::Delete),
        KeyCode::Tab => Action::Edit(EditKind::InsertChar(0x0009)),
        KeyCode::Left => motion(MotionKind::Left, shift),
        KeyCode::Right => motion(MotionKind::Right, shift),
        KeyCode::Up => motion(MotionKind::Up, shift),
        KeyCode::Down => motion(MotionKind::Down, shift),
        KeyCode::Home => motion(MotionKind::LineStart, shift),
        KeyCode::End => motion(MotionKind::LineEnd, shift),
        KeyCode::PageUp => motion(MotionKind::PageUp, shift),
        KeyCode::PageDown => motion(MotionKind::PageDown, shift),
        KeyCode::Char(c) if alt || c.is_control() => return None,
        KeyCode::Char(c) => Action::Edit(EditKind::InsertChar(unit_from_char(c).unwrap_or(REPLACEMENT))),
    };
    Some(action)
}

fn motion(kind: MotionKind, extend: bool) -> Action {
    Action::Motion { kind, extend }
}

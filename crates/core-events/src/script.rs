//! Textual key scripts such as `Hello<Enter><S-Home><C-x>`.
//!
//! Plain characters map to `KeyCode::Char`. A bracketed token names a key
//! with optional `C-`, `A-`, `S-` modifier prefixes; `<lt>` is a literal `<`.

use crate::{KeyCode, KeyEvent, KeyModifiers};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyScriptError {
    #[error("unterminated key token starting at byte {0}")]
    Unterminated(usize),
    #[error("unknown key name `{0}`")]
    UnknownKey(String),
}

fn named(name: &str) -> Option<KeyCode> {
    let code = match name.to_ascii_lowercase().as_str() {
        "enter" | "cr" | "return" => KeyCode::Enter,
        "esc" => KeyCode::Esc,
        "bs" | "backspace" => KeyCode::Backspace,
        "del" | "delete" => KeyCode::Delete,
        "ins" | "insert" => KeyCode::Insert,
        "tab" => KeyCode::Tab,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" | "pgup" => KeyCode::PageUp,
        "pagedown" | "pgdn" => KeyCode::PageDown,
        "lt" => KeyCode::Char('<'),
        "space" => KeyCode::Char(' '),
        _ => {
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return None,
            }
        }
    };
    Some(code)
}

fn parse_token(token: &str) -> Result<KeyEvent, KeyScriptError> {
    let mut mods = KeyModifiers::empty();
    let mut rest = token;
    loop {
        let Some((prefix, tail)) = rest.split_once('-') else {
            break;
        };
        if tail.is_empty() {
            break;
        }
        let flag = match prefix {
            "C" | "c" => KeyModifiers::CTRL,
            "A" | "a" | "M" | "m" => KeyModifiers::ALT,
            "S" | "s" => KeyModifiers::SHIFT,
            _ => break,
        };
        mods |= flag;
        rest = tail;
    }
    named(rest)
        .map(|code| KeyEvent::new(code, mods))
        .ok_or_else(|| KeyScriptError::UnknownKey(token.to_string()))
}

/// Parse a script into key events.
pub fn parse_key_script(script: &str) -> Result<Vec<KeyEvent>, KeyScriptError> {
    let mut out = Vec::new();
    let mut rest = script;
    let mut offset = 0;
    while let Some(c) = rest.chars().next() {
        if c == '<' {
            let end = rest.find('>').ok_or(KeyScriptError::Unterminated(offset))?;
            out.push(parse_token(&rest[1..end])?);
            offset += end + 1;
            rest = &rest[end + 1..];
        } else {
            out.push(KeyEvent::plain(KeyCode::Char(c)));
            offset += c.len_utf8();
            rest = &rest[c.len_utf8()..];
        }
    }
    Ok(out)
}

//! Conversion between external UTF-8 text and stored code units.
//!
//! Input is NFC-normalized first so a precomposed character occupies one cell
//! instead of a base cell plus a combining cell. `\r\n` and lone `\r` become a
//! single [`LINE_BREAK`]. Characters outside the Basic Multilingual Plane do
//! not fit a single 16-bit cell and are stored as U+FFFD.

use crate::{CodeUnit, LINE_BREAK};
use unicode_normalization::UnicodeNormalization;

pub const REPLACEMENT: CodeUnit = 0xFFFD;

/// Code unit for a single char, `None` outside the BMP.
pub fn unit_from_char(c: char) -> Option<CodeUnit> {
    u16::try_from(u32::from(c)).ok()
}

/// Encode external text into code units.
pub fn encode(text: &str) -> Vec<CodeUnit> {
    let mut out = Vec::with_capacity(text.len());
    let mut chars = text.nfc().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push(LINE_BREAK);
            }
            c => out.push(unit_from_char(c).unwrap_or(REPLACEMENT)),
        }
    }
    out
}

/// Decode code units back to a `String`; unpaired surrogates become U+FFFD.
pub fn decode(units: &[CodeUnit]) -> String {
    char::decode_utf16(units.iter().copied())
        .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

//! Logical operations on an [`EditorModel`](core_model::EditorModel).
//!
//! Input events are resolved into an [`Action`] by the [`EventRouter`]
//! (pointer, wheel, scrollbar, tick) and [`translate_key`] (keyboard), then
//! applied by [`dispatch`]. Every operation reports what it invalidated as an
//! optional [`RenderDelta`](core_render::RenderDelta); `None` means nothing
//! visible changed, including rejected edits.
//!
//! Modules:
//! * `edit`      - text mutation (insert/delete/newline/paste/colorize)
//! * `motion`    - cursor, selection, scroll and blink changes
//! * `clipboard` - clipboard contract and an in-process implementation
//! * `router`    - pointer/wheel/scrollbar/tick resolution
//! * `key_translator` - keyboard resolution

use core_state::MarkMode;
use core_text::{CodeUnit, Position};
use std::time::Instant;

pub mod clipboard;
pub mod dispatcher;
pub mod edit;
pub mod key_translator;
pub mod motion;
pub mod router;

pub use clipboard::{Clipboard, ClipboardContent, MemoryClipboard};
pub use dispatcher::{DispatchResult, EditContext, dispatch};
pub use key_translator::translate_key;
pub use router::EventRouter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionKind {
    Left,
    Right,
    Up,
    Down,
    LineStart,
    LineEnd,
    PageUp,
    PageDown,
    BufferStart,
    BufferEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    InsertChar(CodeUnit),
    NewLine,
    Backspace,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Motion { kind: MotionKind, extend: bool },
    Edit(EditKind),
    Copy,
    Cut,
    Paste,
    SelectAll,
    /// Absolute cursor placement (pointer press or drag).
    MoveTo { pos: Position, mark: MarkMode },
    /// Primary button released.
    PointerRelease,
    /// Scroll by lines; negative is up.
    Scroll(isize),
    SetFirstLine(usize),
    SetXOrigin(u32),
    Tick(Instant),
    Focus(bool),
}

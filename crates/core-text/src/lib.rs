//! Line-oriented code-unit storage with cached glyph geometry.
//!
//! The buffer is a growable array of [`Line`]s, each a growable array of
//! [`CharCell`]s. Every cell caches the pixel x-offset of its left edge so the
//! renderer and hit-testing never re-measure a line. Offsets are maintained
//! incrementally by every structural mutation.
//!
//! Invariants (hold after every public call):
//! * `line_count() >= 1`; the last line may be empty.
//! * Within a line, `cells[0].x == 0` and offsets strictly increase with the
//!   column index; `next_x` equals the offset a trailing cell would have.
//! * `char_count()` equals the sum of all line lengths.
//!
//! Capacity policy: growth is geometric but bounded by [`Limits`]. Hitting a
//! ceiling or failing an allocation never aborts; the mutation is a no-op,
//! the sticky `full` flag is raised and a [`StorageError`] is returned so the
//! edit layer can stop early. Nothing here moves a cursor or a selection.

use thiserror::Error;

pub mod buffer;
pub mod codec;
mod grow;
pub mod line;
pub mod metrics;

pub use buffer::{Limits, TextBuffer};
pub use line::{CharCell, Line};
pub use metrics::{GlyphMetrics, MonospaceMetrics};

/// One 16-bit code unit (UCS-2 equivalent). One unit occupies one cell.
pub type CodeUnit = u16;

/// Code unit used to represent a line break in extracted / inserted sequences.
pub const LINE_BREAK: CodeUnit = 0x000A;

/// Index into an externally owned color table.
pub type ColorIndex = u8;

/// Opaque glyph handle issued by the metrics provider; used only for drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GlyphId(pub u32);

/// Font selector handed back to the metrics provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FontId(pub u16);

/// A buffer coordinate: line index and column (cell index, `0..=len`).
///
/// Ordering is reading order (line first, then column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
    pub fn origin() -> Self {
        Self { line: 0, col: 0 }
    }
    pub fn clamp_to<F>(&mut self, line_count: usize, mut line_len_fn: F)
    where
        F: FnMut(usize) -> usize,
    {
        if line_count == 0 {
            self.line = 0;
            self.col = 0;
            return;
        }
        if self.line >= line_count {
            self.line = line_count - 1;
        }
        let max_len = line_len_fn(self.line);
        if self.col > max_len {
            self.col = max_len;
        }
    }
}

/// Reason a growth operation was rejected.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    #[error("line {line} is at its {max} cell ceiling")]
    LineCapacity { line: usize, max: usize },
    #[error("buffer is at its {max} line ceiling")]
    LineCeiling { max: usize },
    #[error("character limit {limit} reached")]
    CharLimit { limit: usize },
    #[error("allocation failed while growing storage")]
    Alloc,
}

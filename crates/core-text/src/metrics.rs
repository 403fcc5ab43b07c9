//! Glyph metrics provider boundary.
//!
//! The engine never rasterizes; it only needs a glyph handle and an advance
//! width per code unit, plus the font's line pitch. Any width the provider
//! reports as zero is widened to one pixel so cached offsets stay strictly
//! increasing.

use crate::{CodeUnit, FontId, GlyphId};
use unicode_width::UnicodeWidthChar;

/// Font metrics consumed by the storage layer and the viewport.
pub trait GlyphMetrics {
    /// Glyph handle for `unit` in `font`.
    fn glyph_id(&self, font: FontId, unit: CodeUnit) -> GlyphId;
    /// Horizontal advance in pixels.
    fn advance_width(&self, font: FontId, unit: CodeUnit) -> u32;
    /// Vertical distance between consecutive lines in pixels.
    fn line_pitch(&self, font: FontId) -> u32;
    /// Widest advance of any glyph in the font.
    fn max_advance_width(&self, font: FontId) -> u32;
}

/// Advance width as stored in the buffer (never zero).
pub(crate) fn advance<M: GlyphMetrics + ?Sized>(metrics: &M, font: FontId, unit: CodeUnit) -> u32 {
    metrics.advance_width(font, unit).max(1)
}

/// Fixed-cell provider: every code unit is one or two cells wide according to
/// its East Asian width. Control and combining units still occupy one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonospaceMetrics {
    cell_width: u32,
    line_pitch: u32,
}

impl MonospaceMetrics {
    pub fn new(cell_width: u32, line_pitch: u32) -> Self {
        Self {
            cell_width: cell_width.max(1),
            line_pitch: line_pitch.max(1),
        }
    }

    pub fn cell_width(&self) -> u32 {
        self.cell_width
    }

    fn columns(unit: CodeUnit) -> u32 {
        char::from_u32(u32::from(unit))
            .and_then(|c| c.width())
            .unwrap_or(1)
            .clamp(1, 2) as u32
    }
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self::new(8, 16)
    }
}

impl GlyphMetrics for MonospaceMetrics {
    fn glyph_id(&self, font: FontId, unit: CodeUnit) -> GlyphId {
        GlyphId((u32::from(font.0) << 16) | u32::from(unit))
    }

    fn advance_width(&self, _font: FontId, unit: CodeUnit) -> u32 {
        Self::columns(unit) * self.cell_width
    }

    fn line_pitch(&self, _font: FontId) -> u32 {
        self.line_pitch
    }

    fn max_advance_width(&self, _font: FontId) -> u32 {
        2 * self.cell_width
    }
}

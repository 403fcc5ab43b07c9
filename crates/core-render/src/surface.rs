//! Host-implemented drawing contracts.
//!
//! Rectangles use inclusive corner coordinates in surface pixels. The engine
//! never assumes clipping beyond its own widget rectangle; the host clips.

use core_model::ScrollLimits;
use core_text::{ColorIndex, GlyphId};

pub trait RenderSurface {
    fn fill_rect(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: ColorIndex);
    /// Draw `glyph` with its cell's top-left corner at `(x, y)`.
    fn draw_glyph(&mut self, glyph: GlyphId, x: i32, y: i32, fg: ColorIndex, bg: ColorIndex);
    /// Commit a dirty rectangle to the visible surface.
    fn flush_rect(&mut self, x1: i32, y1: i32, x2: i32, y2: i32);
}

/// External scrollbar widget; called on every repaint.
pub trait Scrollbar {
    fn set_limits(&mut self, min: u32, max: u32, visible_start: u32, visible_end: u32);
}

impl<S: Scrollbar + ?Sized> Scrollbar for Box<S> {
    fn set_limits(&mut self, min: u32, max: u32, visible_start: u32, visible_end: u32) {
        (**self).set_limits(min, max, visible_start, visible_end);
    }
}

/// Push `limits` to `bar`.
pub fn apply_limits(bar: &mut dyn Scrollbar, limits: ScrollLimits) {
    bar.set_limits(limits.min, limits.max, limits.visible_start, limits.visible_end);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawCall {
    Fill { x1: i32, y1: i32, x2: i32, y2: i32, color: ColorIndex },
    Glyph { glyph: GlyphId, x: i32, y: i32, fg: ColorIndex, bg: ColorIndex },
    Flush { x1: i32, y1: i32, x2: i32, y2: i32 },
}

/// Surface that records calls; used by the demo binary and tests.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub calls: Vec<DrawCall>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    pub fn glyphs(&self) -> impl Iterator<Item = &DrawCall> + '_ {
        self.calls.iter().filter(|c| matches!(c, DrawCall::Glyph { .. }))
    }

    pub fn flushes(&self) -> impl Iterator<Item = &DrawCall> + '_ {
        self.calls.iter().filter(|c| matches!(c, DrawCall::Flush { .. }))
    }
}

impl RenderSurface for RecordingSurface {
    fn fill_rect(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: ColorIndex) {
        self.calls.push(DrawCall::Fill { x1, y1, x2, y2, color });
    }

    fn draw_glyph(&mut self, glyph: GlyphId, x: i32, y: i32, fg: ColorIndex, bg: ColorIndex) {
        self.calls.push(DrawCall::Glyph { glyph, x, y, fg, bg });
    }

    fn flush_rect(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        self.calls.push(DrawCall::Flush { x1, y1, x2, y2 });
    }
}

//! Turns a [`RenderDelta`] into surface calls.
//!
//! Paths:
//! - Full: clear the widget rectangle, paint every visible line, flush once.
//! - Lines: repaint the visible lines in the range (plus the lines holding
//!   the previous and current cursor) and flush each. A range covering the
//!   whole viewport escalates to Full.
//! - CursorOnly: repaint the previous cursor line and the current one.
//!
//! Each painted line is cleared to the background, then every cell on
//! screen is drawn with its own foreground, or inverted when selected, and
//! finally the cursor bar is drawn if the blink phase shows it.

use crate::scheduler::RenderDelta;
use crate::surface::{RenderSurface, Scrollbar, apply_limits};
use core_model::{EditorModel, Viewport};
use core_state::{Colors, SelectionSpan};
use core_text::{Position, TextBuffer};
use tracing::trace;

/// Counters for executed paint paths.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PaintStats {
    pub full_frames: u64,
    pub partial_frames: u64,
    pub lines_painted: u64,
    pub glyphs_drawn: u64,
    pub escalated: u64,
}

#[derive(Debug, Default)]
pub struct Painter {
    last_cursor: Option<Position>,
    stats: PaintStats,
}

struct Frame<'a> {
    buffer: &'a TextBuffer,
    view: &'a Viewport,
    colors: Colors,
    selection: SelectionSpan,
    cursor: Position,
    cursor_visible: bool,
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
}

impl<'a> Frame<'a> {
    fn new(model: &'a EditorModel) -> Option<Self> {
        let view = model.view();
        if view.width() == 0 || view.height() == 0 {
            return None;
        }
        let origin = model.origin();
        let state = model.state();
        Some(Self {
            buffer: state.buffer(),
            view,
            colors: state.colors,
            selection: state.selection().span(),
            cursor: state.cursor(),
            cursor_visible: model.blink().is_visible(),
            left: origin.x,
            top: origin.y,
            right: origin.x.saturating_add(view.width() as i32 - 1),
            bottom: origin.y.saturating_add(view.height() as i32 - 1),
        })
    }
}

impl Painter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> PaintStats {
        self.stats
    }

    /// Forget the previously painted cursor (e.g. after the surface was
    /// cleared by the host).
    pub fn invalidate(&mut self) {
        self.last_cursor = None;
    }

    /// Execute `delta` against `surface`.
    pub fn paint(&mut self, model: &EditorModel, surface: &mut dyn RenderSurface, delta: &RenderDelta) {
        let Some(frame) = Frame::new(model) else {
            return;
        };
        match delta {
            RenderDelta::Full | RenderDelta::Scroll { .. } => self.paint_full(&frame, surface),
            RenderDelta::Lines(range) => {
                if range.len() >= frame.view.visible_lines() {
                    self.stats.escalated += 1;
                    self.paint_full(&frame, surface);
                } else {
                    let mut lines: Vec<usize> = range.clone().collect();
                    lines.extend(self.last_cursor.map(|c| c.line));
                    lines.push(frame.cursor.line);
                    self.paint_partial(&frame, surface, lines);
                }
            }
            RenderDelta::CursorOnly => {
                let mut lines = vec![frame.cursor.line];
                lines.extend(self.last_cursor.map(|c| c.line));
                self.paint_partial(&frame, surface, lines);
            }
        }
        self.last_cursor = Some(frame.cursor);
    }

    /// Report the current scroll window to attached scrollbars.
    pub fn sync_scrollbars(
        model: &EditorModel,
        vertical: Option<&mut dyn Scrollbar>,
        horizontal: Option<&mut dyn Scrollbar>,
    ) {
        let buffer = model.state().buffer();
        if let Some(bar) = vertical {
            apply_limits(bar, model.view().vertical_limits(buffer));
        }
        if let Some(bar) = horizontal {
            apply_limits(bar, model.view().horizontal_limits(buffer));
        }
    }

    fn paint_full(&mut self, frame: &Frame<'_>, surface: &mut dyn RenderSurface) {
        surface.fill_rect(frame.left, frame.top, frame.right, frame.bottom, frame.colors.bg);
        let first = frame.view.first_line();
        let end = frame.view.last_visible_exclusive().min(frame.buffer.line_count());
        let mut painted = 0;
        for idx in first..end {
            if self.paint_line(frame, surface, idx, false) {
                painted += 1;
            }
        }
        surface.flush_rect(frame.left, frame.top, frame.right, frame.bottom);
        self.stats.full_frames += 1;
        trace!(target: "render.paint", path = "full", first, painted, "paint");
    }

    fn paint_partial(&mut self, frame: &Frame<'_>, surface: &mut dyn RenderSurface, mut lines: Vec<usize>) {
        lines.sort_unstable();
        lines.dedup();
        let mut painted = 0;
        for idx in lines {
            if self.paint_line(frame, surface, idx, true) {
                painted += 1;
            }
        }
        self.stats.partial_frames += 1;
        trace!(target: "render.paint", path = "partial", painted, "paint");
    }

    /// Paint one line if it is on screen. Returns whether it was.
    fn paint_line(&mut self, frame: &Frame<'_>, surface: &mut dyn RenderSurface, idx: usize, flush: bool) -> bool {
        let Some(line) = frame.buffer.line(idx) else {
            return false;
        };
        if !frame.view.is_line_visible(idx) {
            return false;
        }
        let pitch = frame.view.line_pitch() as i32;
        let y = frame.view.line_y(idx);
        let top = frame.top + y - pitch;
        let bottom = (frame.top + y - 1).min(frame.bottom);
        let width = i64::from(frame.view.width());
        let x_origin = i64::from(frame.view.x_origin());

        surface.fill_rect(frame.left, top, frame.right, bottom, frame.colors.bg);
        for (col, cell) in line.cells().iter().enumerate() {
            let cx = i64::from(cell.x) - x_origin;
            let w = i64::from(line.cell_width(col));
            if cx + w <= 0 {
                continue;
            }
            if cx >= width {
                break;
            }
            let x = frame.left + cx as i32;
            let (fg, bg) = if frame.selection.contains(idx, col) {
                surface.fill_rect(x, top, x + w as i32 - 1, bottom, frame.colors.selection_bg);
                (frame.colors.selection_fg, frame.colors.selection_bg)
            } else {
                (cell.fg, frame.colors.bg)
            };
            surface.draw_glyph(cell.glyph, x, top, fg, bg);
            self.stats.glyphs_drawn += 1;
        }
        if frame.cursor_visible && frame.cursor.line == idx {
            let cx = i64::from(line.x_at(frame.cursor.col)) - x_origin;
            if (0..width).contains(&cx) {
                let x = frame.left + cx as i32;
                surface.fill_rect(x, top, x, bottom, frame.colors.cursor);
            }
        }
        if flush {
            surface.flush_rect(frame.left, top, frame.right, bottom);
        }
        self.stats.lines_painted += 1;
        true
    }
}

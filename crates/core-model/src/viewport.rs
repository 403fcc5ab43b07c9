//! Vertical and horizontal scroll state of the edit surface.
//!
//! Geometry is in pixels relative to the widget's top-left corner. Each
//! line's cached `y` is its *bottom* edge: `(idx - first_line + 1) * pitch`,
//! so a line is on screen when `pitch <= y <= visible_lines * pitch`.

use core_text::{Position, TextBuffer};
use tracing::trace;

/// Range and visible window reported to a scrollbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollLimits {
    pub min: u32,
    pub max: u32,
    pub visible_start: u32,
    pub visible_end: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    first_line: usize,
    x_origin: u32,
    width: u32,
    height: u32,
    line_pitch: u32,
    char_step: u32,
}

impl Viewport {
    /// `char_step` is the horizontal scroll increment (normally the widest
    /// glyph advance of the font).
    pub fn new(width: u32, height: u32, line_pitch: u32, char_step: u32) -> Self {
        Self {
            first_line: 0,
            x_origin: 0,
            width,
            height,
            line_pitch: line_pitch.max(1),
            char_step: char_step.max(1),
        }
    }

    pub fn first_line(&self) -> usize {
        self.first_line
    }

    pub fn x_origin(&self) -> u32 {
        self.x_origin
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn line_pitch(&self) -> u32 {
        self.line_pitch
    }

    pub fn char_step(&self) -> u32 {
        self.char_step
    }

    /// Whole lines that fit the height; never zero.
    pub fn visible_lines(&self) -> usize {
        (self.height / self.line_pitch).max(1) as usize
    }

    /// Index one past the last line on screen.
    pub fn last_visible_exclusive(&self) -> usize {
        self.first_line + self.visible_lines()
    }

    /// Columns that surely fit the width for a font whose widest glyph is
    /// `max_advance` pixels.
    pub fn visible_columns_estimate(&self, max_advance: u32) -> usize {
        (self.width / max_advance.max(1)) as usize
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    pub fn set_metrics(&mut self, line_pitch: u32, char_step: u32) {
        self.line_pitch = line_pitch.max(1);
        self.char_step = char_step.max(1);
    }

    /// Bottom edge of line `idx` relative to the viewport top.
    pub fn line_y(&self, idx: usize) -> i32 {
        let rows = idx as i64 - self.first_line as i64 + 1;
        let y = rows.saturating_mul(i64::from(self.line_pitch));
        y.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
    }

    pub fn is_y_visible(&self, y: i32) -> bool {
        let low = i64::from(self.line_pitch);
        let high = self.visible_lines() as i64 * i64::from(self.line_pitch);
        (low..=high).contains(&i64::from(y))
    }

    pub fn is_line_visible(&self, idx: usize) -> bool {
        self.is_y_visible(self.line_y(idx))
    }

    /// Re-stamp every line's cached `y` for the current `first_line`.
    pub fn restamp(&self, buffer: &mut TextBuffer) {
        buffer.stamp_y(|idx| self.line_y(idx));
    }

    /// Move up one line. False at the top.
    pub fn scroll_up(&mut self, buffer: &mut TextBuffer) -> bool {
        if self.first_line == 0 {
            return false;
        }
        self.first_line -= 1;
        self.restamp(buffer);
        trace!(target: "model.viewport", first = self.first_line, "scroll_up");
        true
    }

    /// Move down one line. False when the last line is already first.
    pub fn scroll_down(&mut self, buffer: &mut TextBuffer) -> bool {
        if self.first_line + 1 >= buffer.line_count() {
            return false;
        }
        self.first_line += 1;
        self.restamp(buffer);
        trace!(target: "model.viewport", first = self.first_line, "scroll_down");
        true
    }

    /// Scroll by `delta` lines (negative is up); returns the lines actually moved.
    pub fn scroll_lines(&mut self, buffer: &mut TextBuffer, delta: isize) -> usize {
        let before = self.first_line;
        let target = if delta < 0 {
            before.saturating_sub(delta.unsigned_abs())
        } else {
            before.saturating_add(delta as usize)
        };
        self.set_first_line(buffer, target);
        before.abs_diff(self.first_line)
    }

    /// Jump so `line` (clamped) is first. Returns true if it changed.
    pub fn set_first_line(&mut self, buffer: &mut TextBuffer, line: usize) -> bool {
        let line = line.min(buffer.line_count().saturating_sub(1));
        if line == self.first_line {
            return false;
        }
        self.first_line = line;
        self.restamp(buffer);
        trace!(target: "model.viewport", first = line, "first_line_set");
        true
    }

    /// Set the horizontal origin, clamped to the widest line.
    pub fn set_x_origin(&mut self, buffer: &TextBuffer, x: u32) -> bool {
        let x = x.min(buffer.max_line_width());
        if x == self.x_origin {
            return false;
        }
        self.x_origin = x;
        trace!(target: "model.viewport", x_origin = x, "x_origin_set");
        true
    }

    /// Scroll until `cursor` is inside the viewport. Vertical steps are one
    /// line each and horizontal steps one `char_step` each; the net result
    /// is applied with a single restamp. Returns true if anything moved.
    pub fn scroll_to_show(&mut self, buffer: &mut TextBuffer, cursor: Position) -> bool {
        let cursor = buffer.clamp(cursor);
        let mut moved = false;

        let visible = self.visible_lines();
        let first = if cursor.line < self.first_line {
            cursor.line
        } else if cursor.line >= self.first_line + visible {
            cursor.line + 1 - visible
        } else {
            self.first_line
        };
        if first != self.first_line {
            self.first_line = first;
            moved = true;
        }
        if moved || buffer.line(cursor.line).is_some_and(|l| l.y() != self.line_y(cursor.line)) {
            self.restamp(buffer);
        }

        if let Some(line) = buffer.line(cursor.line) {
            let x = i64::from(line.x_at(cursor.col)) - i64::from(self.x_origin);
            let step = i64::from(self.char_step);
            let right = i64::from(self.width.saturating_sub(1));
            let origin = i64::from(self.x_origin);
            let new_origin = if x < 0 {
                let steps = (-x + step - 1) / step;
                (origin - steps * step).max(0)
            } else if x > right {
                let steps = (x - right + step - 1) / step;
                origin + steps * step
            } else {
                origin
            };
            let new_origin = u32::try_from(new_origin).unwrap_or(u32::MAX);
            if new_origin != self.x_origin {
                self.x_origin = new_origin;
                moved = true;
            }
        }

        if moved {
            trace!(
                target: "model.viewport",
                first = self.first_line,
                x_origin = self.x_origin,
                line = cursor.line,
                col = cursor.col,
                "scrolled_to_cursor"
            );
        }
        moved
    }

    /// Map a pixel position (widget-relative) to a text position.
    ///
    /// The row picks the line by pitch, clamped to the buffer. Within the
    /// line the result is one past the last cell whose horizontal midpoint
    /// lies left of the click, or column 0 when there is none.
    pub fn hit_test(&self, buffer: &TextBuffer, px: i32, py: i32) -> Position {
        let row = i64::from(py).div_euclid(i64::from(self.line_pitch));
        let last = buffer.line_count().saturating_sub(1) as i64;
        let line = (self.first_line as i64 + row).clamp(0, last) as usize;
        let x = i64::from(px) + i64::from(self.x_origin);
        let col = buffer
            .line(line)
            .and_then(|l| {
                (0..l.len())
                    .rev()
                    .find(|&i| i64::from(l.x_at(i)) + i64::from(l.cell_width(i) / 2) < x)
            })
            .map_or(0, |i| i + 1);
        Position::new(line, col)
    }

    /// Widget-relative x of `pos` after horizontal scroll.
    pub fn cursor_x(&self, buffer: &TextBuffer, pos: Position) -> i64 {
        let x = buffer.line(pos.line).map_or(0, |l| l.x_at(pos.col));
        i64::from(x) - i64::from(self.x_origin)
    }

    pub fn vertical_limits(&self, buffer: &TextBuffer) -> ScrollLimits {
        let max = buffer.line_count().saturating_sub(1) as u32;
        let start = self.first_line as u32;
        ScrollLimits {
            min: 0,
            max,
            visible_start: start,
            visible_end: start.saturating_add(self.visible_lines() as u32 - 1),
        }
    }

    pub fn horizontal_limits(&self, buffer: &TextBuffer) -> ScrollLimits {
        ScrollLimits {
            min: 0,
            max: buffer.max_line_width(),
            visible_start: self.x_origin,
            visible_end: self.x_origin.saturating_add(self.width.saturating_sub(1)),
        }
    }
}

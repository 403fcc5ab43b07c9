//! Edit state: buffer, cursor, sticky column and marked area.
//!
//! `EditState` owns the [`TextBuffer`] together with the logical cursor and
//! the selection so that every mutation path can re-clamp them in the same
//! call. Viewport and pixel concerns live in `core-model`.
//!
//! Cursor rules:
//! * `0 <= cursor.line < line_count` and `0 <= cursor.col <= len(cursor.line)`
//!   after every public call; out-of-range requests are clamped, never errors.
//! * `sticky_col` remembers the last horizontally intended column. Pure
//!   vertical moves read it and leave it alone; any move with a horizontal
//!   component (or an absolute placement) overwrites it.
//!
//! Selection rules:
//! * The span is always normalized (`start <= end` in reading order); empty
//!   when `start == end`.
//! * `pivot` is the anchor fixed when the selection was (re)started. Expanding
//!   spans from the pivot to the new cursor in whichever direction applies.

use core_text::{ColorIndex, Position, TextBuffer};
use tracing::trace;

pub mod blink;
pub use blink::CursorBlink;

/// How a cursor move affects the marked area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkMode {
    /// Leave the selection as it is.
    Keep,
    /// Collapse the selection onto the new cursor and re-anchor the pivot.
    Reset,
    /// Span the selection from the pivot to the new cursor.
    Expand,
}

/// Normalized selection range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionSpan {
    pub start: Position,
    pub end: Position,
}

impl SelectionSpan {
    /// Construct a span normalizing ordering so that start <= end.
    pub fn new(mut a: Position, mut b: Position) -> Self {
        if a > b {
            std::mem::swap(&mut a, &mut b);
        }
        Self { start: a, end: b }
    }

    pub fn collapsed(at: Position) -> Self {
        Self { start: at, end: at }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// True if the cell at `(line, col)` lies inside the span.
    pub fn contains(&self, line: usize, col: usize) -> bool {
        if self.is_empty() || line < self.start.line || line > self.end.line {
            return false;
        }
        let after_start = line > self.start.line || col >= self.start.col;
        let before_end = line < self.end.line || col < self.end.col;
        after_start && before_end
    }

    /// Line range touched by the span (inclusive).
    pub fn lines(&self) -> std::ops::RangeInclusive<usize> {
        self.start.line..=self.end.line
    }
}

/// Selection span plus the pivot it expands from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionModel {
    span: SelectionSpan,
    pivot: Position,
}

impl SelectionModel {
    pub fn span(&self) -> SelectionSpan {
        self.span
    }

    pub fn pivot(&self) -> Position {
        self.pivot
    }

    pub fn is_empty(&self) -> bool {
        self.span.is_empty()
    }

    /// Collapse onto `at` and anchor the pivot there.
    pub fn collapse(&mut self, at: Position) {
        self.span = SelectionSpan::collapsed(at);
        self.pivot = at;
    }

    /// Span from the pivot to `to`.
    pub fn expand(&mut self, to: Position) {
        self.span = SelectionSpan::new(self.pivot, to);
    }

    /// Explicit selection anchored at `from`.
    pub fn set(&mut self, from: Position, to: Position) {
        self.pivot = from;
        self.span = SelectionSpan::new(from, to);
    }

    fn clamp(&mut self, buffer: &TextBuffer) {
        self.pivot = buffer.clamp(self.pivot);
        self.span = SelectionSpan::new(buffer.clamp(self.span.start), buffer.clamp(self.span.end));
    }
}

/// Color indices used when drawing the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Colors {
    pub fg: ColorIndex,
    pub bg: ColorIndex,
    pub selection_fg: ColorIndex,
    pub selection_bg: ColorIndex,
    pub cursor: ColorIndex,
}

impl Default for Colors {
    fn default() -> Self {
        Self {
            fg: 15,
            bg: 0,
            selection_fg: 0,
            selection_bg: 7,
            cursor: 15,
        }
    }
}

/// Buffer plus cursor, sticky column, selection and load status.
#[derive(Debug, Clone)]
pub struct EditState {
    buffer: TextBuffer,
    cursor: Position,
    sticky_col: usize,
    selection: SelectionModel,
    pub colors: Colors,
    /// Last paste or load delivered a truncated sequence.
    pub partially_loaded: bool,
}

fn offset(base: usize, delta: isize) -> usize {
    if delta < 0 {
        base.saturating_sub(delta.unsigned_abs())
    } else {
        base.saturating_add(delta as usize)
    }
}

impl EditState {
    pub fn new(buffer: TextBuffer) -> Self {
        Self {
            buffer,
            cursor: Position::origin(),
            sticky_col: 0,
            selection: SelectionModel::default(),
            colors: Colors::default(),
            partially_loaded: false,
        }
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// Mutable buffer access for the edit layer. Callers that change the
    /// line structure must follow up with [`EditState::reclamp`].
    pub fn buffer_mut(&mut self) -> &mut TextBuffer {
        &mut self.buffer
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    pub fn sticky_col(&self) -> usize {
        self.sticky_col
    }

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    pub fn in_selection(&self, line: usize, col: usize) -> bool {
        self.selection.span.contains(line, col)
    }

    fn place(&mut self, target: Position, mark: MarkMode) -> bool {
        let moved = target != self.cursor;
        self.cursor = target;
        match mark {
            MarkMode::Reset => self.selection.collapse(target),
            MarkMode::Expand => self.selection.expand(target),
            MarkMode::Keep => {}
        }
        if moved {
            trace!(target: "state.cursor", line = target.line, col = target.col, ?mark, "cursor_moved");
        }
        moved
    }

    /// Absolute move (clamped). Returns true if the cursor position changed;
    /// the mark mode is applied either way.
    pub fn move_cursor(&mut self, line: usize, col: usize, mark: MarkMode) -> bool {
        let target = self.buffer.clamp(Position::new(line, col));
        self.sticky_col = target.col;
        self.place(target, mark)
    }

    /// Relative move. Pure vertical moves use the sticky column; pure
    /// horizontal moves roll across line boundaries.
    pub fn move_relative(&mut self, d_line: isize, d_col: isize, mark: MarkMode) -> bool {
        let last_line = self.buffer.line_count() - 1;
        let target = match (d_line, d_col) {
            (0, 0) => self.cursor,
            (_, 0) => {
                let line = offset(self.cursor.line, d_line).min(last_line);
                Position::new(line, self.sticky_col.min(self.buffer.line_len(line)))
            }
            (0, _) => self.roll_horizontal(d_col),
            (_, _) => {
                let line = offset(self.cursor.line, d_line).min(last_line);
                let col = offset(self.cursor.col, d_col).min(self.buffer.line_len(line));
                Position::new(line, col)
            }
        };
        if d_col != 0 {
            self.sticky_col = target.col;
        }
        self.place(target, mark)
    }

    fn roll_horizontal(&self, d_col: isize) -> Position {
        let buf = &self.buffer;
        let mut line = self.cursor.line;
        let mut col = self.cursor.col as isize + d_col;
        while col < 0 && line > 0 {
            line -= 1;
            col += buf.line_len(line) as isize + 1;
        }
        while col > buf.line_len(line) as isize && line + 1 < buf.line_count() {
            col -= buf.line_len(line) as isize + 1;
            line += 1;
        }
        Position::new(line, col.clamp(0, buf.line_len(line) as isize) as usize)
    }

    pub fn line_home(&mut self, mark: MarkMode) -> bool {
        self.move_cursor(self.cursor.line, 0, mark)
    }

    pub fn line_end(&mut self, mark: MarkMode) -> bool {
        let len = self.buffer.line_len(self.cursor.line);
        self.move_cursor(self.cursor.line, len, mark)
    }

    pub fn buffer_home(&mut self, mark: MarkMode) -> bool {
        self.move_cursor(0, 0, mark)
    }

    pub fn buffer_end(&mut self, mark: MarkMode) -> bool {
        let last = self.buffer.line_count() - 1;
        self.move_cursor(last, self.buffer.line_len(last), mark)
    }

    /// Select `from..to` (clamped) with the pivot at `from`; the cursor
    /// lands on `to`.
    pub fn set_selection(&mut self, from: Position, to: Position) {
        let from = self.buffer.clamp(from);
        let to = self.buffer.clamp(to);
        self.selection.set(from, to);
        self.cursor = to;
        self.sticky_col = to.col;
    }

    pub fn select_all(&mut self) {
        let last = self.buffer.line_count() - 1;
        let end = Position::new(last, self.buffer.line_len(last));
        self.set_selection(Position::origin(), end);
    }

    /// Collapse the selection onto the cursor.
    pub fn reset_selection(&mut self) {
        self.selection.collapse(self.cursor);
    }

    /// Re-clamp cursor and selection after a structural change.
    pub fn reclamp(&mut self) {
        self.cursor = self.buffer.clamp(self.cursor);
        self.selection.clamp(&self.buffer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_text::{FontId, Limits, MonospaceMetrics};

    fn state(lines: &[&str]) -> EditState {
        let m = MonospaceMetrics::default();
        let mut b = TextBuffer::new(Limits::default(), FontId(0), true);
        for (i, text) in lines.iter().enumerate() {
            if i > 0 {
                let prev = b.line_len(i - 1);
                b.split_line(i - 1, prev).unwrap();
            }
            for (c, u) in text.encode_utf16().enumerate() {
                b.insert_char(&m, i, c, u, 0).unwrap();
            }
        }
        EditState::new(b)
    }

    #[test]
    fn span_contains_boundaries() {
        let s = SelectionSpan::new(Position::new(2, 1), Position::new(0, 3));
        assert_eq!(s.start, Position::new(0, 3));
        assert!(!s.contains(0, 2));
        assert!(s.contains(0, 3));
        assert!(s.contains(1, 0));
        assert!(s.contains(2, 0));
        assert!(!s.contains(2, 1));
        assert!(!SelectionSpan::collapsed(Position::new(1, 1)).contains(1, 1));
    }

    #[test]
    fn move_cursor_clamps() {
        let mut st = state(&["abc", "de"]);
        st.move_cursor(9, 9, MarkMode::Reset);
        assert_eq!(st.cursor(), Position::new(1, 2));
        assert_eq!(st.sticky_col(), 2);
    }

    #[test]
    fn unchanged_move_still_applies_reset() {
        let mut st = state(&["abc"]);
        st.set_selection(Position::new(0, 0), Position::new(0, 2));
        assert!(!st.move_cursor(0, 2, MarkMode::Reset));
        assert!(st.selection().is_empty());
        assert_eq!(st.selection().pivot(), Position::new(0, 2));
    }

    #[test]
    fn expand_flips_around_pivot() {
        let mut st = state(&["abcdef", "ghijkl"]);
        st.move_cursor(0, 3, MarkMode::Reset);
        st.move_cursor(1, 2, MarkMode::Expand);
        assert_eq!(
            st.selection().span(),
            SelectionSpan::new(Position::new(0, 3), Position::new(1, 2))
        );
        st.move_cursor(0, 1, MarkMode::Expand);
        let span = st.selection().span();
        assert_eq!(span.start, Position::new(0, 1));
        assert_eq!(span.end, Position::new(0, 3));
    }

    #[test]
    fn sticky_column_survives_short_lines() {
        let mut st = state(&["abcdefgh", "ab", "", "abcdefgh"]);
        st.move_cursor(0, 6, MarkMode::Reset);
        st.move_relative(1, 0, MarkMode::Reset);
        assert_eq!(st.cursor(), Position::new(1, 2));
        st.move_relative(1, 0, MarkMode::Reset);
        assert_eq!(st.cursor(), Position::new(2, 0));
        st.move_relative(1, 0, MarkMode::Reset);
        assert_eq!(st.cursor(), Position::new(3, 6));
    }

    #[test]
    fn horizontal_move_resets_sticky() {
        let mut st = state(&["abcdefgh", "ab", "abcdefgh"]);
        st.move_cursor(0, 6, MarkMode::Reset);
        st.move_relative(1, 0, MarkMode::Reset);
        st.move_relative(0, -1, MarkMode::Reset);
        assert_eq!(st.sticky_col(), 1);
        st.move_relative(1, 0, MarkMode::Reset);
        assert_eq!(st.cursor(), Position::new(2, 1));
    }

    #[test]
    fn left_and_right_roll_over_lines() {
        let mut st = state(&["abc", "de"]);
        st.move_cursor(1, 0, MarkMode::Reset);
        st.move_relative(0, -1, MarkMode::Reset);
        assert_eq!(st.cursor(), Position::new(0, 3));
        st.move_relative(0, 1, MarkMode::Reset);
        assert_eq!(st.cursor(), Position::new(1, 0));
        st.buffer_end(MarkMode::Reset);
        st.move_relative(0, 1, MarkMode::Reset);
        assert_eq!(st.cursor(), Position::new(1, 2));
        st.buffer_home(MarkMode::Reset);
        st.move_relative(0, -1, MarkMode::Reset);
        assert_eq!(st.cursor(), Position::origin());
    }

    #[test]
    fn select_all_spans_buffer() {
        let mut st = state(&["ab", "cde"]);
        st.select_all();
        let span = st.selection().span();
        assert_eq!(span.start, Position::origin());
        assert_eq!(span.end, Position::new(1, 3));
        assert_eq!(st.cursor(), Position::new(1, 3));
    }

    #[test]
    fn reclamp_after_line_removal() {
        let mut st = state(&["ab", "cde"]);
        st.move_cursor(1, 3, MarkMode::Reset);
        st.buffer_mut().delete_line(1);
        st.reclamp();
        assert_eq!(st.cursor(), Position::new(0, 2));
        assert_eq!(st.selection().pivot(), Position::new(0, 2));
    }
}

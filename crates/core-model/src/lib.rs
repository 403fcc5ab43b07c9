//! Editor model: edit state plus the viewport it is shown through.
//!
//! `EditorModel` owns the [`EditState`] (buffer, cursor, selection), the
//! [`Viewport`] and the cursor blink clock. Operations that need both halves
//! mutably at once go through [`EditorModel::split`], which hands out the
//! disjoint borrows instead of exposing the fields.
//!
//! Invariants after every public call:
//! * The cursor is a valid position in the buffer.
//! * `view.first_line() < buffer.line_count()`.
//! * Each line's cached `y` matches [`Viewport::line_y`] once the caller has
//!   run [`EditorModel::restamp`] after a structural change.

use core_state::{CursorBlink, EditState};
use core_text::Position;
use tracing::trace;

mod viewport;
pub use viewport::{ScrollLimits, Viewport};

/// Top-left corner of the widget on its surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone)]
pub struct EditorModel {
    state: EditState,
    view: Viewport,
    blink: CursorBlink,
    origin: Point,
}

impl EditorModel {
    pub fn new(state: EditState, view: Viewport, origin: Point) -> Self {
        let mut model = Self {
            state,
            view,
            blink: CursorBlink::default(),
            origin,
        };
        model.restamp();
        model
    }

    pub fn state(&self) -> &EditState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut EditState {
        &mut self.state
    }

    pub fn view(&self) -> &Viewport {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut Viewport {
        &mut self.view
    }

    pub fn blink(&self) -> &CursorBlink {
        &self.blink
    }

    pub fn blink_mut(&mut self) -> &mut CursorBlink {
        &mut self.blink
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    /// Disjoint mutable borrows of state and viewport.
    pub fn split(&mut self) -> (&mut EditState, &mut Viewport) {
        (&mut self.state, &mut self.view)
    }

    /// Re-clamp the cursor and first line after a structural change and
    /// re-stamp every line's `y`.
    pub fn restamp(&mut self) {
        self.state.reclamp();
        let last = self.state.buffer().line_count().saturating_sub(1);
        let (state, view) = self.split();
        if view.first_line() > last {
            view.set_first_line(state.buffer_mut(), last);
        }
        view.restamp(state.buffer_mut());
    }

    /// Scroll so the cursor is visible. Returns true if the view moved.
    pub fn scroll_to_show_cursor(&mut self) -> bool {
        let cursor = self.state.cursor();
        let (state, view) = self.split();
        view.scroll_to_show(state.buffer_mut(), cursor)
    }

    /// Map a surface pixel to a text position.
    pub fn hit_test(&self, x: i32, y: i32) -> Position {
        let pos = self
            .view
            .hit_test(self.state.buffer(), x - self.origin.x, y - self.origin.y);
        trace!(target: "model.viewport", x, y, line = pos.line, col = pos.col, "hit_test");
        pos
    }

    /// Whether the surface pixel lies inside the widget.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        let dx = i64::from(x) - i64::from(self.origin.x);
        let dy = i64::from(y) - i64::from(self.origin.y);
        (0..i64::from(self.view.width())).contains(&dx)
            && (0..i64::from(self.view.height())).contains(&dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_state::MarkMode;
    use core_text::{FontId, Limits, MonospaceMetrics, TextBuffer};

    fn model(lines: usize) -> EditorModel {
        let m = MonospaceMetrics::new(8, 16);
        let mut b = TextBuffer::new(Limits::default(), FontId(0), true);
        for i in 1..lines {
            b.split_line(i - 1, 0).unwrap();
        }
        b.insert_char(&m, 0, 0, u16::from(b'q'), 0).unwrap();
        EditorModel::new(EditState::new(b), Viewport::new(160, 48, 16, 16), Point::new(10, 20))
    }

    #[test]
    fn new_stamps_lines() {
        let m = model(5);
        let ys: Vec<i32> = m.state().buffer().lines().iter().map(|l| l.y()).collect();
        assert_eq!(ys, vec![16, 32, 48, 64, 80]);
    }

    #[test]
    fn cursor_on_line_ten_scrolls_first_to_eight() {
        let mut m = model(20);
        m.state_mut().move_cursor(10, 0, MarkMode::Reset);
        assert!(m.scroll_to_show_cursor());
        assert_eq!(m.view().first_line(), 8);
        assert!(!m.scroll_to_show_cursor());
    }

    #[test]
    fn restamp_pulls_first_line_back_after_shrink() {
        let mut m = model(20);
        let (state, view) = m.split();
        view.set_first_line(state.buffer_mut(), 15);
        for _ in 0..18 {
            m.state_mut().buffer_mut().delete_line(1);
        }
        m.restamp();
        assert_eq!(m.state().buffer().line_count(), 2);
        assert_eq!(m.view().first_line(), 1);
        assert_eq!(m.state().buffer().line(1).unwrap().y(), 16);
    }

    #[test]
    fn hit_test_is_origin_relative() {
        let m = model(3);
        assert_eq!(m.hit_test(10 + 5, 20 + 17), Position::new(1, 0));
        assert_eq!(m.hit_test(10 + 5, 20 + 1), Position::new(0, 1));
        assert!(m.contains(10, 20));
        assert!(!m.contains(170, 20));
        assert!(!m.contains(9, 30));
    }
}

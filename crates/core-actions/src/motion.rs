//! Cursor, selection, scroll and blink changes.
//!
//! None of these touch buffer content, so they work on read-only buffers.
//! Damage is `CursorOnly` when just the cursor moved and a line span when
//! the visible selection changed.

use crate::MotionKind;
use crate::edit::follow_cursor;
use core_model::EditorModel;
use core_render::RenderDelta;
use core_state::{MarkMode, SelectionSpan};
use core_text::Position;
use std::time::Instant;
use tracing::trace;

fn snapshot(model: &EditorModel) -> (Position, SelectionSpan) {
    (model.state().cursor(), model.state().selection().span())
}

/// Damage for a cursor/selection change from `before` to the current state.
fn cursor_damage(model: &mut EditorModel, before: (Position, SelectionSpan)) -> Option<RenderDelta> {
    let (old_cursor, old_span) = before;
    let (cursor, span) = snapshot(model);
    let selection_changed = old_span != span && !(old_span.is_empty() && span.is_empty());
    let delta = if selection_changed {
        let lo = [old_span.start.line, span.start.line, old_cursor.line, cursor.line]
            .into_iter()
            .min()
            .unwrap_or(cursor.line);
        let hi = [old_span.end.line, span.end.line, old_cursor.line, cursor.line]
            .into_iter()
            .max()
            .unwrap_or(cursor.line);
        Some(RenderDelta::span(lo, hi))
    } else if old_cursor != cursor {
        Some(RenderDelta::CursorOnly)
    } else {
        None
    };
    follow_cursor(model, delta)
}

/// Apply a keyboard motion; `extend` grows the selection from its pivot.
pub fn motion(model: &mut EditorModel, kind: MotionKind, extend: bool) -> Option<RenderDelta> {
    let before = snapshot(model);
    let mark = if extend { MarkMode::Expand } else { MarkMode::Reset };
    let page = model.view().visible_lines() as isize;
    let state = model.state_mut();
    match kind {
        MotionKind::Left => state.move_relative(0, -1, mark),
        MotionKind::Right => state.move_relative(0, 1, mark),
        MotionKind::Up => state.move_relative(-1, 0, mark),
        MotionKind::Down => state.move_relative(1, 0, mark),
        MotionKind::PageUp => state.move_relative(-page, 0, mark),
        MotionKind::PageDown => state.move_relative(page, 0, mark),
        MotionKind::LineStart => state.line_home(mark),
        MotionKind::LineEnd => state.line_end(mark),
        MotionKind::BufferStart => state.buffer_home(mark),
        MotionKind::BufferEnd => state.buffer_end(mark),
    };
    trace!(target: "actions.dispatch", op = "motion", ?kind, extend, "motion");
    cursor_damage(model, before)
}

/// Absolute cursor placement (clamped).
pub fn move_to(model: &mut EditorModel, pos: Position, mark: MarkMode) -> Option<RenderDelta> {
    let before = snapshot(model);
    model.state_mut().move_cursor(pos.line, pos.col, mark);
    cursor_damage(model, before)
}

/// Select `from..to` with the cursor on `to`.
pub fn set_selection(model: &mut EditorModel, from: Position, to: Position) -> Option<RenderDelta> {
    let before = snapshot(model);
    model.state_mut().set_selection(from, to);
    cursor_damage(model, before)
}

pub fn select_all(model: &mut EditorModel) -> Option<RenderDelta> {
    let before = snapshot(model);
    model.state_mut().select_all();
    cursor_damage(model, before)
}

/// Wheel scroll; the cursor stays where it is.
pub fn scroll_lines(model: &mut EditorModel, lines: isize) -> Option<RenderDelta> {
    let (state, view) = model.split();
    let old_first = view.first_line();
    if view.scroll_lines(state.buffer_mut(), lines) == 0 {
        return None;
    }
    Some(RenderDelta::Scroll {
        old_first,
        new_first: view.first_line(),
    })
}

/// Vertical scrollbar notification.
pub fn set_first_line(model: &mut EditorModel, line: usize) -> Option<RenderDelta> {
    let (state, view) = model.split();
    view.set_first_line(state.buffer_mut(), line)
        .then_some(RenderDelta::Full)
}

/// Horizontal scrollbar notification.
pub fn set_x_origin(model: &mut EditorModel, x: u32) -> Option<RenderDelta> {
    let (state, view) = model.split();
    view.set_x_origin(state.buffer(), x).then_some(RenderDelta::Full)
}

/// Advance the blink clock.
pub fn tick(model: &mut EditorModel, now: Instant) -> Option<RenderDelta> {
    model
        .blink_mut()
        .tick(now)
        .then_some(RenderDelta::CursorOnly)
}

/// Show or hide the cursor (focus change).
pub fn set_cursor_shown(model: &mut EditorModel, shown: bool) -> Option<RenderDelta> {
    if model.blink().is_shown() == shown {
        return None;
    }
    model.blink_mut().set_shown(shown);
    Some(RenderDelta::CursorOnly)
}

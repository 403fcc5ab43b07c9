//! Text mutation.
//!
//! Every public operation first removes a non-empty selection, then applies
//! its own change, keeps the cursor visible and reports the damage. Rejected
//! growth (capacity, char limit, allocation) leaves the buffer untouched and
//! raises the sticky `full` flag; a read-only buffer ignores mutations
//! silently. The loader-style operations (`set_text`, `clear`) are owner
//! operations and work on read-only buffers too.

use crate::clipboard::Clipboard;
use core_model::EditorModel;
use core_render::RenderDelta;
use core_render::scheduler::merge_opt;
use core_state::MarkMode;
use core_text::{CodeUnit, ColorIndex, GlyphMetrics, LINE_BREAK};
use tracing::{debug, trace};

const CARRIAGE_RETURN: CodeUnit = 0x000D;

/// Result of [`copy`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyOutcome {
    pub copied: bool,
    pub delta: Option<RenderDelta>,
}

fn editable(model: &EditorModel) -> bool {
    model.state().buffer().is_editable()
}

fn writable(model: &EditorModel) -> bool {
    let buffer = model.state().buffer();
    buffer.is_editable() && !buffer.is_full()
}

/// Scroll the cursor into view and fold the resulting damage into `delta`.
pub fn follow_cursor(model: &mut EditorModel, delta: Option<RenderDelta>) -> Option<RenderDelta> {
    let old_first = model.view().first_line();
    let old_x = model.view().x_origin();
    if !model.scroll_to_show_cursor() {
        return delta;
    }
    let new_first = model.view().first_line();
    let scrolled = if model.view().x_origin() != old_x || new_first == old_first {
        RenderDelta::Full
    } else {
        RenderDelta::Scroll {
            old_first,
            new_first,
        }
    };
    merge_opt(delta, Some(scrolled))
}

/// Delete the selection if it is non-empty. The cursor lands on the
/// deletion point and the selection collapses there.
pub fn delete_selection_if_any(model: &mut EditorModel) -> Option<RenderDelta> {
    let span = model.state().selection().span();
    if span.is_empty() || !editable(model) {
        return None;
    }
    let (start, end) = (span.start, span.end);
    let buffer = model.state_mut().buffer_mut();
    let delta = if start.line == end.line {
        buffer.delete_range(start.line, start.col, end.col);
        RenderDelta::line(start.line)
    } else {
        buffer.delete_range(start.line, start.col, usize::MAX);
        buffer.delete_range(end.line, 0, end.col);
        for _ in start.line + 1..end.line {
            buffer.delete_line(start.line + 1);
        }
        if let Err(err) = buffer.join_line(start.line + 1) {
            debug!(target: "actions.edit", %err, line = start.line, "selection_join_rejected");
        }
        RenderDelta::Full
    };
    model.restamp();
    model.state_mut().move_cursor(start.line, start.col, MarkMode::Reset);
    trace!(
        target: "actions.edit",
        op = "delete_selection",
        from_line = start.line,
        from_col = start.col,
        to_line = end.line,
        to_col = end.col,
        "edit"
    );
    follow_cursor(model, Some(delta))
}

/// Store one cell at the cursor and advance. No scrolling, no selection
/// handling.
fn put_char<M: GlyphMetrics + ?Sized>(model: &mut EditorModel, metrics: &M, unit: CodeUnit) -> bool {
    let cursor = model.state().cursor();
    let fg = model.state().colors.fg;
    let inserted = model
        .state_mut()
        .buffer_mut()
        .insert_char(metrics, cursor.line, cursor.col, unit, fg);
    match inserted {
        Ok(()) => {
            model
                .state_mut()
                .move_cursor(cursor.line, cursor.col + 1, MarkMode::Reset);
            true
        }
        Err(err) => {
            debug!(target: "actions.edit", %err, line = cursor.line, col = cursor.col, "insert_rejected");
            false
        }
    }
}

/// Split at the cursor and move to the start of the new line. Line `y`
/// stamps are left for the caller to refresh.
fn split_at_cursor(model: &mut EditorModel) -> bool {
    let cursor = model.state().cursor();
    match model.state_mut().buffer_mut().split_line(cursor.line, cursor.col) {
        Ok(new_line) => {
            model.state_mut().move_cursor(new_line, 0, MarkMode::Reset);
            true
        }
        Err(err) => {
            debug!(target: "actions.edit", %err, line = cursor.line, "split_rejected");
            false
        }
    }
}

struct InsertRun {
    complete: bool,
    lines_added: bool,
}

/// Feed units at the cursor; `\n`, `\r` and `\r\n` start a new line.
/// Stops at the first rejection.
fn insert_units<M: GlyphMetrics + ?Sized>(
    model: &mut EditorModel,
    metrics: &M,
    units: &[CodeUnit],
) -> InsertRun {
    let mut run = InsertRun {
        complete: true,
        lines_added: false,
    };
    let mut iter = units.iter().copied().peekable();
    while let Some(unit) = iter.next() {
        let ok = match unit {
            LINE_BREAK => split_at_cursor(model),
            CARRIAGE_RETURN => {
                let _ = iter.next_if_eq(&LINE_BREAK);
                split_at_cursor(model)
            }
            unit => put_char(model, metrics, unit),
        };
        if !ok {
            run.complete = false;
            break;
        }
        run.lines_added |= matches!(unit, LINE_BREAK | CARRIAGE_RETURN);
    }
    if run.lines_added {
        model.restamp();
    }
    run
}

/// Insert one code unit at the cursor. A line-break unit starts a new line.
pub fn insert_char<M: GlyphMetrics + ?Sized>(
    model: &mut EditorModel,
    metrics: &M,
    unit: CodeUnit,
) -> Option<RenderDelta> {
    if !editable(model) {
        return None;
    }
    if matches!(unit, LINE_BREAK | CARRIAGE_RETURN) {
        return new_line(model);
    }
    let delta = delete_selection_if_any(model);
    if model.state().buffer().is_full() {
        return delta;
    }
    let line = model.state().cursor().line;
    if !put_char(model, metrics, unit) {
        return delta;
    }
    trace!(target: "actions.edit", op = "insert_char", line, col = model.state().cursor().col, "edit");
    follow_cursor(model, merge_opt(delta, Some(RenderDelta::line(line))))
}

/// Insert units one by one as [`insert_char`] would: each `\n` or `\r`
/// starts a new line. Stops quietly at the first rejection.
pub fn insert_string<M: GlyphMetrics + ?Sized>(
    model: &mut EditorModel,
    metrics: &M,
    units: &[CodeUnit],
) -> Option<RenderDelta> {
    if !editable(model) {
        return None;
    }
    let delta = delete_selection_if_any(model);
    if model.state().buffer().is_full() {
        return delta;
    }
    let line = model.state().cursor().line;
    let mut count = 0usize;
    let mut lines_added = false;
    for &unit in units {
        let is_break = matches!(unit, LINE_BREAK | CARRIAGE_RETURN);
        let ok = if is_break {
            split_at_cursor(model)
        } else {
            put_char(model, metrics, unit)
        };
        if !ok {
            break;
        }
        lines_added |= is_break;
        count += 1;
    }
    trace!(target: "actions.edit", op = "insert_string", line, offered = units.len(), inserted = count, "edit");
    if count == 0 {
        return delta;
    }
    let own = if lines_added {
        model.restamp();
        RenderDelta::Full
    } else {
        RenderDelta::line(line)
    };
    follow_cursor(model, merge_opt(delta, Some(own)))
}

/// Insert units, turning embedded line breaks into new lines. Damage is
/// the single line when no line was added, otherwise the whole widget.
pub fn insert_multiline_string<M: GlyphMetrics + ?Sized>(
    model: &mut EditorModel,
    metrics: &M,
    units: &[CodeUnit],
) -> Option<RenderDelta> {
    if !editable(model) {
        return None;
    }
    let delta = delete_selection_if_any(model);
    if model.state().buffer().is_full() {
        return delta;
    }
    let line = model.state().cursor().line;
    let run = insert_units(model, metrics, units);
    trace!(
        target: "actions.edit",
        op = "insert_multiline",
        line,
        offered = units.len(),
        complete = run.complete,
        lines_added = run.lines_added,
        "edit"
    );
    let own = if run.lines_added {
        RenderDelta::Full
    } else {
        RenderDelta::line(line)
    };
    follow_cursor(model, merge_opt(delta, Some(own)))
}

/// Split the line at the cursor; the cursor moves to column 0 of the new
/// line, scrolling down one line if that line is below the viewport.
pub fn new_line(model: &mut EditorModel) -> Option<RenderDelta> {
    if !editable(model) {
        return None;
    }
    let delta = delete_selection_if_any(model);
    if model.state().buffer().is_full() {
        return delta;
    }
    let old_line = model.state().cursor().line;
    if !split_at_cursor(model) {
        return delta;
    }
    model.restamp();
    let new_line = model.state().cursor().line;
    let (state, view) = model.split();
    let old_first = view.first_line();
    let bottom = view.last_visible_exclusive();
    let mut own = RenderDelta::Lines(old_line..bottom.max(new_line + 1));
    if new_line >= bottom && view.scroll_down(state.buffer_mut()) {
        own = RenderDelta::Scroll {
            old_first,
            new_first: view.first_line(),
        };
    }
    trace!(target: "actions.edit", op = "new_line", line = old_line, to_line = new_line, "edit");
    follow_cursor(model, merge_opt(delta, Some(own)))
}

/// Delete the cell before the cursor, joining with the previous line at
/// column 0. A non-empty selection is deleted instead.
pub fn backspace(model: &mut EditorModel) -> Option<RenderDelta> {
    if !editable(model) {
        return None;
    }
    if let Some(delta) = delete_selection_if_any(model) {
        return Some(delta);
    }
    let cursor = model.state().cursor();
    let delta = if cursor.col > 0 {
        model
            .state_mut()
            .buffer_mut()
            .delete_range(cursor.line, cursor.col - 1, cursor.col);
        model
            .state_mut()
            .move_cursor(cursor.line, cursor.col - 1, MarkMode::Reset);
        RenderDelta::line(cursor.line)
    } else if cursor.line > 0 {
        let prev_len = model.state().buffer().line_len(cursor.line - 1);
        if let Err(err) = model.state_mut().buffer_mut().join_line(cursor.line) {
            debug!(target: "actions.edit", %err, line = cursor.line, "join_rejected");
            return None;
        }
        model.restamp();
        model
            .state_mut()
            .move_cursor(cursor.line - 1, prev_len, MarkMode::Reset);
        RenderDelta::Full
    } else {
        return None;
    };
    trace!(target: "actions.edit", op = "backspace", line = cursor.line, col = cursor.col, "edit");
    follow_cursor(model, Some(delta))
}

/// Forward delete: remove the cell under the cursor, joining the next line
/// at end of line. A non-empty selection is deleted instead.
pub fn delete(model: &mut EditorModel) -> Option<RenderDelta> {
    if !editable(model) {
        return None;
    }
    if let Some(delta) = delete_selection_if_any(model) {
        return Some(delta);
    }
    let cursor = model.state().cursor();
    let buffer = model.state_mut().buffer_mut();
    let delta = if cursor.col < buffer.line_len(cursor.line) {
        buffer.delete_range(cursor.line, cursor.col, cursor.col + 1);
        RenderDelta::line(cursor.line)
    } else if cursor.line + 1 < buffer.line_count() {
        if let Err(err) = buffer.join_line(cursor.line + 1) {
            debug!(target: "actions.edit", %err, line = cursor.line + 1, "join_rejected");
            return None;
        }
        model.restamp();
        RenderDelta::Full
    } else {
        return None;
    };
    // A kept selection or pivot may now lie past the shortened line.
    model.state_mut().reclamp();
    trace!(target: "actions.edit", op = "delete", line = cursor.line, col = cursor.col, "edit");
    follow_cursor(model, Some(delta))
}

/// Hand the selected units to `clipboard`; with `clear`, also delete them.
/// Nothing happens when the selection is empty or the clipboard refuses.
pub fn copy(model: &mut EditorModel, clipboard: &mut dyn Clipboard, clear: bool) -> CopyOutcome {
    let span = model.state().selection().span();
    if span.is_empty() {
        return CopyOutcome::default();
    }
    let units = model.state().buffer().extract_range(span.start, span.end);
    if !clipboard.put_sequence(&units) {
        debug!(target: "actions.edit", units = units.len(), "clipboard_rejected");
        return CopyOutcome::default();
    }
    let op = if clear { "cut" } else { "copy" };
    trace!(target: "actions.edit", op, units = units.len(), "edit");
    let delta = if clear {
        delete_selection_if_any(model)
    } else {
        None
    };
    CopyOutcome {
        copied: true,
        delta,
    }
}

/// Insert the clipboard content at the cursor. A truncated transfer still
/// inserts its prefix and raises `partially_loaded`.
pub fn paste<M: GlyphMetrics + ?Sized>(
    model: &mut EditorModel,
    metrics: &M,
    clipboard: &mut dyn Clipboard,
) -> Option<RenderDelta> {
    if !writable(model) {
        return None;
    }
    let content = clipboard.get_sequence()?;
    model.state_mut().partially_loaded = content.truncated;
    trace!(target: "actions.edit", op = "paste", units = content.units.len(), truncated = content.truncated, "edit");
    insert_multiline_string(model, metrics, &content.units)
}

/// Paint `color` over every selected cell. Content and cursor stay put.
pub fn set_foreground_over_range(model: &mut EditorModel, color: ColorIndex) -> Option<RenderDelta> {
    let span = model.state().selection().span();
    if span.is_empty() {
        return None;
    }
    let buffer = model.state_mut().buffer_mut();
    let mut touched = false;
    for line in span.lines() {
        let from = if line == span.start.line { span.start.col } else { 0 };
        let to = if line == span.end.line {
            span.end.col
        } else {
            buffer.line_len(line)
        };
        touched |= buffer.paint_fg(line, from, to, color);
    }
    trace!(target: "actions.edit", op = "set_foreground", color, touched, "edit");
    touched.then(|| RenderDelta::span(span.start.line, span.end.line))
}

/// Drop all content and reset cursor, selection and scroll.
pub fn clear(model: &mut EditorModel) -> RenderDelta {
    model.state_mut().buffer_mut().clear();
    model.state_mut().partially_loaded = false;
    model.state_mut().move_cursor(0, 0, MarkMode::Reset);
    let (state, view) = model.split();
    view.set_first_line(state.buffer_mut(), 0);
    view.set_x_origin(state.buffer(), 0);
    model.restamp();
    trace!(target: "actions.edit", op = "clear", "edit");
    RenderDelta::Full
}

/// Replace the content with `units` and put the cursor at the start.
/// `partially_loaded` reports whether some units did not fit.
pub fn set_text<M: GlyphMetrics + ?Sized>(
    model: &mut EditorModel,
    metrics: &M,
    units: &[CodeUnit],
) -> RenderDelta {
    clear(model);
    let run = insert_units(model, metrics, units);
    model.state_mut().partially_loaded = !run.complete;
    model.state_mut().move_cursor(0, 0, MarkMode::Reset);
    model.restamp();
    let buffer = model.state().buffer();
    trace!(
        target: "actions.edit",
        op = "set_text",
        offered = units.len(),
        lines = buffer.line_count(),
        chars = buffer.char_count(),
        complete = run.complete,
        "edit"
    );
    RenderDelta::Full
}

/// Remove the cursor's line; the cursor moves to column 0 of the line that
/// takes its place.
pub fn delete_line(model: &mut EditorModel) -> Option<RenderDelta> {
    if !editable(model) {
        return None;
    }
    let line = model.state().cursor().line;
    let buffer = model.state_mut().buffer_mut();
    let lines_before = buffer.line_count();
    let removed = buffer.delete_line(line);
    if removed == 0 && buffer.line_count() == lines_before {
        return None;
    }
    model.restamp();
    model.state_mut().move_cursor(line, 0, MarkMode::Reset);
    trace!(target: "actions.edit", op = "delete_line", line, removed, "edit");
    follow_cursor(model, Some(RenderDelta::Full))
}

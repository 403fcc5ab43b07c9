//! Multi-line text-edit widget.
//!
//! [`TextEdit`] owns one buffer, its cursor/selection, the viewport, the
//! blink clock, a clipboard and the attached scrollbars. Every mutator comes
//! in two forms:
//! - silent: performs the logical change and returns the damage as an
//!   optional [`RenderDelta`] (or a plain value for queries-with-effects such
//!   as [`TextEdit::copy`]);
//! - `*_draw`: performs the same change and immediately paints the damage
//!   on the supplied [`RenderSurface`], then refreshes the scrollbars.
//!
//! Hidden widgets and bulk loaders use the silent forms and call
//! [`TextEdit::paint`] (or [`TextEdit::redraw`]) once at the end.

use core_actions::{
    Clipboard, DispatchResult, EditContext, EventRouter, MemoryClipboard, MotionKind, dispatch, edit, motion,
};
use core_config::EffectiveConfig;
use core_events::Event;
use core_model::{EditorModel, Point, Viewport};
use core_render::{Painter, RenderDelta, RenderSurface, Scrollbar};
use core_state::{Colors, CursorBlink, EditState, MarkMode, SelectionSpan};
use core_text::{CodeUnit, ColorIndex, FontId, GlyphMetrics, Limits, Position, TextBuffer, codec};
use std::time::Duration;
use tracing::debug;

/// Snapshot returned by [`TextEdit::status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    pub line_count: usize,
    pub char_count: usize,
    pub cursor_line: usize,
    pub cursor_col: usize,
    /// Approximate number of columns that fit the width.
    pub visible_columns: usize,
    pub selection: SelectionSpan,
    pub full: bool,
    pub partially_loaded: bool,
}

pub struct TextEdit<M: GlyphMetrics> {
    model: EditorModel,
    metrics: M,
    painter: Painter,
    router: EventRouter,
    clipboard: Box<dyn Clipboard>,
    vertical: Option<Box<dyn Scrollbar>>,
    horizontal: Option<Box<dyn Scrollbar>>,
}

impl<M: GlyphMetrics> TextEdit<M> {
    /// Widget at `(x, y)` of `width` x `height` pixels. `max_chars` caps
    /// characters plus line breaks (0 = unlimited).
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        metrics: M,
        font: FontId,
        editable: bool,
        max_chars: usize,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    ) -> Self {
        let config = EffectiveConfig {
            max_chars,
            ..EffectiveConfig::default()
        };
        Self::with_config(metrics, font, editable, Point::new(x, y), (width, height), &config)
    }

    /// Widget whose limits, blink, wheel step and clipboard capacity come
    /// from `config`.
    pub fn with_config(
        metrics: M,
        font: FontId,
        editable: bool,
        origin: Point,
        (width, height): (u32, u32),
        config: &EffectiveConfig,
    ) -> Self {
        let limits = Limits {
            max_line_cells: config.max_line_cells,
            max_lines: config.max_lines,
            char_limit: config.max_chars,
        };
        let buffer = TextBuffer::new(limits, font, editable);
        let view = Viewport::new(
            width,
            height,
            metrics.line_pitch(font),
            metrics.max_advance_width(font),
        );
        let mut model = EditorModel::new(EditState::new(buffer), view, origin);
        let interval = if config.blink {
            config.blink_interval
        } else {
            Duration::MAX
        };
        *model.blink_mut() = CursorBlink::new(interval);
        debug!(
            target: "model.viewport",
            width,
            height,
            visible_lines = model.view().visible_lines(),
            max_chars = config.max_chars,
            editable,
            "text_edit_created"
        );
        Self {
            model,
            metrics,
            painter: Painter::new(),
            router: EventRouter::new(config.wheel_lines),
            clipboard: Box::new(MemoryClipboard::new(config.clipboard_units)),
            vertical: None,
            horizontal: None,
        }
    }

    pub fn model(&self) -> &EditorModel {
        &self.model
    }

    pub fn metrics(&self) -> &M {
        &self.metrics
    }

    pub fn painter(&self) -> &Painter {
        &self.painter
    }

    /// Replace the clipboard transport.
    pub fn set_clipboard(&mut self, clipboard: Box<dyn Clipboard>) {
        self.clipboard = clipboard;
    }

    pub fn clipboard_mut(&mut self) -> &mut dyn Clipboard {
        self.clipboard.as_mut()
    }

    pub fn status(&self) -> Status {
        let state = self.model.state();
        let buffer = state.buffer();
        let cursor = state.cursor();
        Status {
            line_count: buffer.line_count(),
            char_count: buffer.char_count(),
            cursor_line: cursor.line,
            cursor_col: cursor.col,
            visible_columns: self
                .model
                .view()
                .visible_columns_estimate(self.metrics.max_advance_width(buffer.font())),
            selection: state.selection().span(),
            full: buffer.is_full(),
            partially_loaded: state.partially_loaded,
        }
    }

    pub fn changed(&self) -> bool {
        self.model.state().buffer().is_changed()
    }

    pub fn reset_changed(&mut self) {
        self.model.state_mut().buffer_mut().reset_changed();
    }

    /// Units of lines `from..=to` joined by line breaks.
    pub fn extract_text(&self, from: usize, to: usize) -> Vec<CodeUnit> {
        self.model.state().buffer().extract_text(from, to)
    }

    /// Whole buffer as a `String`.
    pub fn text(&self) -> String {
        let buffer = self.model.state().buffer();
        codec::decode(&buffer.extract_text(0, buffer.line_count().saturating_sub(1)))
    }

    pub fn cursor(&self) -> Position {
        self.model.state().cursor()
    }

    /// Paint `delta` and refresh the scrollbars.
    pub fn paint(&mut self, surface: &mut dyn RenderSurface, delta: &RenderDelta) {
        self.painter.paint(&self.model, surface, delta);
        self.sync_scrollbars();
    }

    pub fn redraw(&mut self, surface: &mut dyn RenderSurface) {
        self.paint(surface, &RenderDelta::Full);
    }

    fn present(&mut self, surface: &mut dyn RenderSurface, delta: Option<RenderDelta>) -> Option<RenderDelta> {
        if let Some(d) = &delta {
            self.paint(surface, d);
        }
        delta
    }

    fn sync_scrollbars(&mut self) {
        Painter::sync_scrollbars(
            &self.model,
            self.vertical.as_mut().map(|b| b.as_mut() as &mut dyn Scrollbar),
            self.horizontal.as_mut().map(|b| b.as_mut() as &mut dyn Scrollbar),
        );
    }

    /// Resolve and apply an input event without painting.
    pub fn handle_event(&mut self, event: &Event) -> DispatchResult {
        let Some(action) = self.router.route(event, &self.model) else {
            return DispatchResult::ignored();
        };
        let mut ctx = EditContext {
            metrics: &self.metrics,
            clipboard: self.clipboard.as_mut(),
        };
        dispatch(action, &mut self.model, &mut ctx)
    }

    /// Resolve and apply an input event. Returns true when consumed; the
    /// damage is painted when a surface is supplied.
    pub fn process_event(&mut self, event: &Event, surface: Option<&mut dyn RenderSurface>) -> bool {
        let result = self.handle_event(event);
        if let (Some(surface), Some(delta)) = (surface, &result.delta) {
            self.paint(surface, delta);
        }
        result.consumed
    }

    pub fn insert_char(&mut self, unit: CodeUnit) -> Option<RenderDelta> {
        edit::insert_char(&mut self.model, &self.metrics, unit)
    }

    pub fn insert_char_draw(&mut self, surface: &mut dyn RenderSurface, unit: CodeUnit) -> Option<RenderDelta> {
        let delta = self.insert_char(unit);
        self.present(surface, delta)
    }

    /// Insert unit by unit; `\n` and `\r` each start a new line.
    pub fn insert_string(&mut self, units: &[CodeUnit]) -> Option<RenderDelta> {
        edit::insert_string(&mut self.model, &self.metrics, units)
    }

    pub fn insert_string_draw(&mut self, surface: &mut dyn RenderSurface, units: &[CodeUnit]) -> Option<RenderDelta> {
        let delta = self.insert_string(units);
        self.present(surface, delta)
    }

    pub fn insert_multiline_string(&mut self, units: &[CodeUnit]) -> Option<RenderDelta> {
        edit::insert_multiline_string(&mut self.model, &self.metrics, units)
    }

    pub fn insert_multiline_string_draw(
        &mut self,
        surface: &mut dyn RenderSurface,
        units: &[CodeUnit],
    ) -> Option<RenderDelta> {
        let delta = self.insert_multiline_string(units);
        self.present(surface, delta)
    }

    pub fn new_line(&mut self) -> Option<RenderDelta> {
        edit::new_line(&mut self.model)
    }

    pub fn new_line_draw(&mut self, surface: &mut dyn RenderSurface) -> Option<RenderDelta> {
        let delta = self.new_line();
        self.present(surface, delta)
    }

    pub fn backspace(&mut self) -> Option<RenderDelta> {
        edit::backspace(&mut self.model)
    }

    pub fn backspace_draw(&mut self, surface: &mut dyn RenderSurface) -> Option<RenderDelta> {
        let delta = self.backspace();
        self.present(surface, delta)
    }

    pub fn delete(&mut self) -> Option<RenderDelta> {
        edit::delete(&mut self.model)
    }

    pub fn delete_draw(&mut self, surface: &mut dyn RenderSurface) -> Option<RenderDelta> {
        let delta = self.delete();
        self.present(surface, delta)
    }

    pub fn delete_selection(&mut self) -> Option<RenderDelta> {
        edit::delete_selection_if_any(&mut self.model)
    }

    pub fn delete_selection_draw(&mut self, surface: &mut dyn RenderSurface) -> Option<RenderDelta> {
        let delta = self.delete_selection();
        self.present(surface, delta)
    }

    pub fn delete_line(&mut self) -> Option<RenderDelta> {
        edit::delete_line(&mut self.model)
    }

    pub fn delete_line_draw(&mut self, surface: &mut dyn RenderSurface) -> Option<RenderDelta> {
        let delta = self.delete_line();
        self.present(surface, delta)
    }

    /// Join line `line` onto the previous one, keeping the cursor's
    /// position in reading order.
    pub fn join_line(&mut self, line: usize) -> Option<RenderDelta> {
        if line == 0 || line >= self.model.state().buffer().line_count() {
            return None;
        }
        let cursor = self.model.state().cursor();
        let prev_len = self.model.state().buffer().line_len(line - 1);
        self.model
            .state_mut()
            .move_cursor(line - 1, prev_len, MarkMode::Reset);
        let delta = edit::delete(&mut self.model);
        if delta.is_none() {
            self.model
                .state_mut()
                .move_cursor(cursor.line, cursor.col, MarkMode::Reset);
        }
        delta
    }

    pub fn join_line_draw(&mut self, surface: &mut dyn RenderSurface, line: usize) -> Option<RenderDelta> {
        let delta = self.join_line(line);
        self.present(surface, delta)
    }

    /// Copy (or cut, with `clear`) the selection. Returns whether the
    /// clipboard accepted it.
    pub fn copy(&mut self, clear: bool) -> (bool, Option<RenderDelta>) {
        let out = edit::copy(&mut self.model, self.clipboard.as_mut(), clear);
        (out.copied, out.delta)
    }

    pub fn copy_draw(&mut self, surface: &mut dyn RenderSurface, clear: bool) -> bool {
        let (copied, delta) = self.copy(clear);
        self.present(surface, delta);
        copied
    }

    pub fn paste(&mut self) -> Option<RenderDelta> {
        edit::paste(&mut self.model, &self.metrics, self.clipboard.as_mut())
    }

    pub fn paste_draw(&mut self, surface: &mut dyn RenderSurface) -> Option<RenderDelta> {
        let delta = self.paste();
        self.present(surface, delta)
    }

    pub fn set_foreground(&mut self, color: ColorIndex) -> Option<RenderDelta> {
        edit::set_foreground_over_range(&mut self.model, color)
    }

    pub fn set_foreground_draw(&mut self, surface: &mut dyn RenderSurface, color: ColorIndex) -> Option<RenderDelta> {
        let delta = self.set_foreground(color);
        self.present(surface, delta)
    }

    /// Replace the whole content. Works on read-only widgets.
    pub fn set_text(&mut self, units: &[CodeUnit]) -> RenderDelta {
        edit::set_text(&mut self.model, &self.metrics, units)
    }

    pub fn set_text_draw(&mut self, surface: &mut dyn RenderSurface, units: &[CodeUnit]) -> RenderDelta {
        let delta = self.set_text(units);
        self.paint(surface, &delta);
        delta
    }

    pub fn load_str(&mut self, text: &str) -> RenderDelta {
        self.set_text(&codec::encode(text))
    }

    pub fn clear(&mut self) -> RenderDelta {
        edit::clear(&mut self.model)
    }

    pub fn clear_draw(&mut self, surface: &mut dyn RenderSurface) -> RenderDelta {
        let delta = self.clear();
        self.paint(surface, &delta);
        delta
    }

    pub fn set_editable(&mut self, editable: bool) {
        self.model.state_mut().buffer_mut().set_editable(editable);
    }

    pub fn move_cursor(&mut self, line: usize, col: usize, mark: MarkMode) -> Option<RenderDelta> {
        motion::move_to(&mut self.model, Position::new(line, col), mark)
    }

    pub fn move_cursor_draw(
        &mut self,
        surface: &mut dyn RenderSurface,
        line: usize,
        col: usize,
        mark: MarkMode,
    ) -> Option<RenderDelta> {
        let delta = self.move_cursor(line, col, mark);
        self.present(surface, delta)
    }

    pub fn motion(&mut self, kind: MotionKind, extend: bool) -> Option<RenderDelta> {
        motion::motion(&mut self.model, kind, extend)
    }

    pub fn motion_draw(&mut self, surface: &mut dyn RenderSurface, kind: MotionKind, extend: bool) -> Option<RenderDelta> {
        let delta = self.motion(kind, extend);
        self.present(surface, delta)
    }

    pub fn set_selection(&mut self, from: Position, to: Position) -> Option<RenderDelta> {
        motion::set_selection(&mut self.model, from, to)
    }

    pub fn set_selection_draw(
        &mut self,
        surface: &mut dyn RenderSurface,
        from: Position,
        to: Position,
    ) -> Option<RenderDelta> {
        let delta = self.set_selection(from, to);
        self.present(surface, delta)
    }

    pub fn select_all(&mut self) -> Option<RenderDelta> {
        motion::select_all(&mut self.model)
    }

    pub fn select_all_draw(&mut self, surface: &mut dyn RenderSurface) -> Option<RenderDelta> {
        let delta = self.select_all();
        self.present(surface, delta)
    }

    pub fn scroll_lines(&mut self, lines: isize) -> Option<RenderDelta> {
        motion::scroll_lines(&mut self.model, lines)
    }

    pub fn scroll_lines_draw(&mut self, surface: &mut dyn RenderSurface, lines: isize) -> Option<RenderDelta> {
        let delta = self.scroll_lines(lines);
        self.present(surface, delta)
    }

    pub fn set_first_line(&mut self, line: usize) -> Option<RenderDelta> {
        motion::set_first_line(&mut self.model, line)
    }

    pub fn set_first_line_draw(&mut self, surface: &mut dyn RenderSurface, line: usize) -> Option<RenderDelta> {
        let delta = self.set_first_line(line);
        self.present(surface, delta)
    }

    pub fn set_x_origin(&mut self, x: u32) -> Option<RenderDelta> {
        motion::set_x_origin(&mut self.model, x)
    }

    pub fn set_x_origin_draw(&mut self, surface: &mut dyn RenderSurface, x: u32) -> Option<RenderDelta> {
        let delta = self.set_x_origin(x);
        self.present(surface, delta)
    }

    pub fn set_colors(&mut self, colors: Colors) -> Option<RenderDelta> {
        if self.model.state().colors == colors {
            return None;
        }
        self.model.state_mut().colors = colors;
        Some(RenderDelta::Full)
    }

    pub fn set_colors_draw(&mut self, surface: &mut dyn RenderSurface, colors: Colors) -> Option<RenderDelta> {
        let delta = self.set_colors(colors);
        self.present(surface, delta)
    }

    /// Switch font: every cell is re-measured and the line pitch updated.
    pub fn set_font(&mut self, font: FontId) -> RenderDelta {
        let pitch = self.metrics.line_pitch(font);
        let step = self.metrics.max_advance_width(font);
        self.model
            .state_mut()
            .buffer_mut()
            .relayout(&self.metrics, font);
        self.model.view_mut().set_metrics(pitch, step);
        self.model.restamp();
        self.model.scroll_to_show_cursor();
        RenderDelta::Full
    }

    pub fn set_font_draw(&mut self, surface: &mut dyn RenderSurface, font: FontId) -> RenderDelta {
        let delta = self.set_font(font);
        self.paint(surface, &delta);
        delta
    }

    /// Change the pixel size; the cursor is kept visible.
    pub fn resize(&mut self, width: u32, height: u32) -> RenderDelta {
        self.model.view_mut().resize(width, height);
        self.model.restamp();
        self.model.scroll_to_show_cursor();
        self.painter.invalidate();
        RenderDelta::Full
    }

    pub fn resize_draw(&mut self, surface: &mut dyn RenderSurface, width: u32, height: u32) -> RenderDelta {
        let delta = self.resize(width, height);
        self.paint(surface, &delta);
        delta
    }

    pub fn set_origin(&mut self, x: i32, y: i32) -> RenderDelta {
        self.model.set_origin(Point::new(x, y));
        self.painter.invalidate();
        RenderDelta::Full
    }

    /// Attach (or detach, with `None`) external scrollbars. They are
    /// updated immediately and after every paint.
    pub fn attach_scrollbars(&mut self, vertical: Option<Box<dyn Scrollbar>>, horizontal: Option<Box<dyn Scrollbar>>) {
        self.vertical = vertical;
        self.horizontal = horizontal;
        self.sync_scrollbars();
    }

    pub fn set_wheel_lines(&mut self, lines: usize) {
        self.router.set_wheel_lines(lines);
    }
}

impl<M: GlyphMetrics + Default> Default for TextEdit<M> {
    fn default() -> Self {
        Self::new(M::default(), FontId::default(), true, 0, 0, 0, 640, 480)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_events::{KeyCode, KeyEvent, KeyModifiers};
    use core_render::{DrawCall, RecordingSurface};
    use core_text::MonospaceMetrics;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn widget(text: &str) -> TextEdit<MonospaceMetrics> {
        let mut w = TextEdit::new(MonospaceMetrics::new(8, 16), FontId(0), true, 0, 10, 20, 160, 64);
        w.load_str(text);
        w
    }

    #[derive(Default, Clone)]
    struct SharedBar(Rc<RefCell<Vec<(u32, u32, u32, u32)>>>);

    impl Scrollbar for SharedBar {
        fn set_limits(&mut self, min: u32, max: u32, visible_start: u32, visible_end: u32) {
            self.0.borrow_mut().push((min, max, visible_start, visible_end));
        }
    }

    #[test]
    fn status_reports_counts_and_flags() {
        let mut w = widget("ab\ncde");
        w.move_cursor(1, 2, MarkMode::Reset);
        let s = w.status();
        assert_eq!((s.line_count, s.char_count), (2, 5));
        assert_eq!((s.cursor_line, s.cursor_col), (1, 2));
        assert_eq!(s.visible_columns, 10);
        assert!(!s.full && !s.partially_loaded);
        assert!(w.changed());
        w.reset_changed();
        assert!(!w.changed());
    }

    #[test]
    fn draw_variant_paints_and_updates_scrollbars() {
        let mut w = widget("ab");
        let bar = SharedBar::default();
        w.attach_scrollbars(Some(Box::new(bar.clone())), None);
        assert_eq!(bar.0.borrow().last(), Some(&(0, 0, 0, 3)));
        let mut surface = RecordingSurface::new();
        w.move_cursor(0, 2, MarkMode::Reset);
        let d = w.insert_char_draw(&mut surface, u16::from(b'c'));
        assert_eq!(d, Some(RenderDelta::line(0)));
        assert!(surface.glyphs().count() >= 3);
        assert!(surface.flushes().count() >= 1);
        assert_eq!(bar.0.borrow().len(), 2);
        // silent form leaves the surface alone
        surface.clear();
        w.insert_char(u16::from(b'd'));
        assert!(surface.calls.is_empty());
        assert_eq!(w.text(), "abcd");
    }

    #[test]
    fn process_event_reports_consumption() {
        let mut w = widget("");
        let mut surface = RecordingSurface::new();
        let key = Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::empty()));
        assert!(w.process_event(&key, Some(&mut surface)));
        assert!(!surface.calls.is_empty());
        let esc = Event::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::empty()));
        assert!(!w.process_event(&esc, None));
        assert_eq!(w.text(), "q");
    }

    #[test]
    fn join_line_keeps_content_order() {
        let mut w = widget("ab\ncd\nef");
        assert_eq!(w.join_line(2), Some(RenderDelta::Full));
        assert_eq!(w.text(), "ab\ncdef");
        assert_eq!(w.cursor(), Position::new(1, 2));
        assert_eq!(w.join_line(0), None);
    }

    #[test]
    fn colors_and_resize_force_full() {
        let mut w = widget("x");
        assert_eq!(w.set_colors(Colors::default()), None);
        let colors = Colors { fg: 2, ..Colors::default() };
        assert_eq!(w.set_colors(colors), Some(RenderDelta::Full));
        assert_eq!(w.model().state().colors.fg, 2);
        assert_eq!(w.resize(80, 32), RenderDelta::Full);
        assert_eq!(w.model().view().visible_lines(), 2);
        let mut surface = RecordingSurface::new();
        w.redraw(&mut surface);
        assert!(surface.calls.iter().any(|c| matches!(c, DrawCall::Fill { .. })));
    }

    #[test]
    fn font_switch_relayouts_cells() {
        struct TwoFonts;
        impl GlyphMetrics for TwoFonts {
            fn glyph_id(&self, _font: FontId, unit: CodeUnit) -> core_text::GlyphId {
                core_text::GlyphId(u32::from(unit))
            }
            fn advance_width(&self, font: FontId, _unit: CodeUnit) -> u32 {
                if font.0 == 0 { 8 } else { 10 }
            }
            fn line_pitch(&self, font: FontId) -> u32 {
                if font.0 == 0 { 16 } else { 20 }
            }
            fn max_advance_width(&self, font: FontId) -> u32 {
                self.advance_width(font, 0)
            }
        }
        let mut w = TextEdit::new(TwoFonts, FontId(0), true, 0, 0, 0, 200, 80);
        w.load_str("abc");
        assert_eq!(w.model().state().buffer().line(0).map(|l| l.next_x()), Some(24));
        w.set_font(FontId(1));
        assert_eq!(w.model().state().buffer().line(0).map(|l| l.next_x()), Some(30));
        assert_eq!(w.model().view().visible_lines(), 4);
    }
}

use core_events::{Event, MouseEvent, MouseEventKind, Orientation, ScrollbarEvent};
use core_events::script::parse_key_script;
use core_render::{RecordingSurface, RenderDelta, Scrollbar};
use core_state::MarkMode;
use core_text::{FontId, MonospaceMetrics, Position};
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::rc::Rc;
use text_edit::TextEdit;

#[derive(Default, Clone)]
struct Bar(Rc<RefCell<Option<(u32, u32, u32, u32)>>>);

impl Scrollbar for Bar {
    fn set_limits(&mut self, min: u32, max: u32, visible_start: u32, visible_end: u32) {
        *self.0.borrow_mut() = Some((min, max, visible_start, visible_end));
    }
}

fn widget() -> TextEdit<MonospaceMetrics> {
    // 3 visible lines of 16px, 10 columns of 8px
    TextEdit::new(MonospaceMetrics::new(8, 16), FontId(0), true, 0, 100, 100, 80, 48)
}

fn numbered(n: usize) -> String {
    (0..n).map(|i| format!("row{i}")).collect::<Vec<_>>().join("\n")
}

#[test]
fn wheel_and_scrollbar_events_move_the_view() {
    let mut w = widget();
    w.load_str(&numbered(20));
    let bar = Bar::default();
    w.attach_scrollbars(Some(Box::new(bar.clone())), None);
    assert_eq!(*bar.0.borrow(), Some((0, 19, 0, 2)));

    let mut surface = RecordingSurface::new();
    let wheel = Event::Mouse(MouseEvent::new(MouseEventKind::ScrollDown, 120, 120));
    assert!(w.process_event(&wheel, Some(&mut surface)));
    assert_eq!(w.model().view().first_line(), 3);
    assert_eq!(*bar.0.borrow(), Some((0, 19, 3, 5)));
    assert_eq!(w.cursor(), Position::origin());

    let outside = Event::Mouse(MouseEvent::new(MouseEventKind::ScrollDown, 10, 10));
    assert!(!w.process_event(&outside, Some(&mut surface)));

    let drag_bar = Event::Scrollbar(ScrollbarEvent { orientation: Orientation::Vertical, value: 17 });
    assert!(w.process_event(&drag_bar, Some(&mut surface)));
    assert_eq!(w.model().view().first_line(), 17);
    assert_eq!(*bar.0.borrow(), Some((0, 19, 17, 19)));
}

#[test]
fn typing_past_the_bottom_scrolls() {
    let mut w = widget();
    let mut surface = RecordingSurface::new();
    for key in parse_key_script("a<Enter>b<Enter>c<Enter>d").unwrap() {
        assert!(w.process_event(&Event::Key(key), Some(&mut surface)));
    }
    assert_eq!(w.text(), "a\nb\nc\nd");
    assert_eq!(w.cursor(), Position::new(3, 1));
    assert_eq!(w.model().view().first_line(), 1);
    let status = w.status();
    assert_eq!((status.line_count, status.char_count), (4, 4));
}

#[test]
fn read_only_widget_still_selects_and_copies() {
    let mut w = TextEdit::new(MonospaceMetrics::new(8, 16), FontId(0), false, 0, 0, 0, 80, 48);
    w.load_str("fixed");
    assert_eq!(w.insert_char(u16::from(b'x')), None);
    assert_eq!(w.backspace(), None);
    assert_eq!(w.select_all(), Some(RenderDelta::Lines(0..1)));
    let (copied, delta) = w.copy(true);
    assert!(copied);
    assert_eq!(delta, None);
    assert_eq!(w.text(), "fixed");
    w.set_editable(true);
    w.move_cursor(0, 5, MarkMode::Reset);
    assert!(w.paste().is_some());
    assert_eq!(w.text(), "fixedfixed");
}

#[test]
fn view_setters_paint_when_drawn() {
    let mut w = widget();
    w.load_str(&numbered(20));
    let bar = Bar::default();
    w.attach_scrollbars(Some(Box::new(bar.clone())), None);
    let mut surface = RecordingSurface::new();

    assert_eq!(w.set_first_line_draw(&mut surface, 10), Some(RenderDelta::Full));
    assert!(!surface.calls.is_empty());
    assert_eq!(*bar.0.borrow(), Some((0, 19, 10, 12)));

    surface.clear();
    assert_eq!(
        w.scroll_lines_draw(&mut surface, -4),
        Some(RenderDelta::Scroll { old_first: 10, new_first: 6 })
    );
    assert!(!surface.calls.is_empty());
    assert_eq!(*bar.0.borrow(), Some((0, 19, 6, 8)));

    // short rows never need a horizontal offset
    surface.clear();
    assert_eq!(w.set_x_origin_draw(&mut surface, 0), None);
    assert!(surface.calls.is_empty());

    assert!(w.select_all_draw(&mut surface).is_some());
    assert!(!surface.calls.is_empty());
    let selection = w.status().selection;
    assert_eq!((selection.start, selection.end), (Position::origin(), Position::new(19, 5)));
}

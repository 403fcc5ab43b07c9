//! Pointer, wheel, scrollbar and tick resolution.
//!
//! The router keeps the only cross-event state of the widget: whether the
//! primary button went down inside it, so drags keep extending the
//! selection even when they leave the widget rectangle.

use crate::{Action, translate_key};
use core_events::{Event, KeyModifiers, MouseButton, MouseEventKind, Orientation};
use core_model::EditorModel;
use core_state::MarkMode;

pub const DEFAULT_WHEEL_LINES: usize = 3;

#[derive(Debug, Clone)]
pub struct EventRouter {
    pressed: bool,
    wheel_lines: usize,
}

impl Default for EventRouter {
    fn default() -> Self {
        Self::new(DEFAULT_WHEEL_LINES)
    }
}

impl EventRouter {
    pub fn new(wheel_lines: usize) -> Self {
        Self {
            pressed: false,
            wheel_lines: wheel_lines.max(1),
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn wheel_lines(&self) -> usize {
        self.wheel_lines
    }

    pub fn set_wheel_lines(&mut self, lines: usize) {
        self.wheel_lines = lines.max(1);
    }

    /// Resolve `event` against `model`. `None` means the event is not for
    /// this widget.
    pub fn route(&mut self, event: &Event, model: &EditorModel) -> Option<Action> {
        match event {
            Event::Mouse(m) => {
                let inside = model.contains(m.x, m.y);
                match m.kind {
                    MouseEventKind::Down(MouseButton::Left) if inside => {
                        self.pressed = true;
                        let mark = if m.mods.contains(KeyModifiers::SHIFT) {
                            MarkMode::Expand
                        } else {
                            MarkMode::Reset
                        };
                        Some(Action::MoveTo {
                            pos: model.hit_test(m.x, m.y),
                            mark,
                        })
                    }
                    MouseEventKind::Drag(MouseButton::Left) if self.pressed => Some(Action::MoveTo {
                        pos: model.hit_test(m.x, m.y),
                        mark: MarkMode::Expand,
                    }),
                    MouseEventKind::Up(MouseButton::Left) if self.pressed => {
                        self.pressed = false;
                        Some(Action::PointerRelease)
                    }
                    MouseEventKind::ScrollUp if inside => Some(Action::Scroll(-(self.wheel_lines as isize))),
                    MouseEventKind::ScrollDown if inside => Some(Action::Scroll(self.wheel_lines as isize)),
                    _ => None,
                }
            }
            Event::Key(key) => translate_key(key),
            Event::Scrollbar(bar) => Some(match bar.orientation {
                Orientation::Vertical => Action::SetFirstLine(bar.value as usize),
                Orientation::Horizontal => Action::SetXOrigin(bar.value),
            }),
            Event::Tick(now) => Some(Action::Tick(*now)),
            Event::FocusGained => Some(Action::Focus(true)),
            Event::FocusLost => {
                self.pressed = false;
                Some(Action::Focus(false))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_events::{MouseEvent, ScrollbarEvent};
    use core_model::{Point, Viewport};
    use core_state::EditState;
    use core_text::{Position, TextBuffer};

    fn model() -> EditorModel {
        EditorModel::new(
            EditState::new(TextBuffer::default()),
            Viewport::new(100, 50, 10, 8),
            Point::new(20, 20),
        )
    }

    fn mouse(kind: MouseEventKind, x: i32, y: i32) -> Event {
        Event::Mouse(MouseEvent::new(kind, x, y))
    }

    #[test]
    fn press_drag_release_cycle() {
        let m = model();
        let mut r = EventRouter::default();
        let down = r.route(&mouse(MouseEventKind::Down(MouseButton::Left), 25, 25), &m);
        assert_eq!(down, Some(Action::MoveTo { pos: Position::origin(), mark: MarkMode::Reset }));
        assert!(r.is_pressed());
        let drag = r.route(&mouse(MouseEventKind::Drag(MouseButton::Left), 500, 500), &m);
        assert!(matches!(drag, Some(Action::MoveTo { mark: MarkMode::Expand, .. })));
        assert_eq!(r.route(&mouse(MouseEventKind::Up(MouseButton::Left), 0, 0), &m), Some(Action::PointerRelease));
        assert!(!r.is_pressed());
        assert_eq!(r.route(&mouse(MouseEventKind::Drag(MouseButton::Left), 25, 25), &m), None);
    }

    #[test]
    fn clicks_outside_are_not_consumed() {
        let m = model();
        let mut r = EventRouter::default();
        assert_eq!(r.route(&mouse(MouseEventKind::Down(MouseButton::Left), 5, 5), &m), None);
        assert!(!r.is_pressed());
        assert_eq!(r.route(&mouse(MouseEventKind::ScrollDown, 5, 5), &m), None);
    }

    #[test]
    fn wheel_and_scrollbars() {
        let m = model();
        let mut r = EventRouter::new(0);
        assert_eq!(r.wheel_lines(), 1);
        r.set_wheel_lines(4);
        assert_eq!(r.route(&mouse(MouseEventKind::ScrollUp, 30, 30), &m), Some(Action::Scroll(-4)));
        let v = Event::Scrollbar(ScrollbarEvent { orientation: Orientation::Vertical, value: 7 });
        assert_eq!(r.route(&v, &m), Some(Action::SetFirstLine(7)));
        let h = Event::Scrollbar(ScrollbarEvent { orientation: Orientation::Horizontal, value: 40 });
        assert_eq!(r.route(&h, &m), Some(Action::SetXOrigin(40)));
    }
}

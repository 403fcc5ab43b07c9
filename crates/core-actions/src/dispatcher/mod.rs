//! Dispatcher applying `Action` to an `EditorModel`.
//!
//! Edits are delegated to `crate::edit`, cursor/scroll/blink changes to
//! `crate::motion`. The result reports whether the action was consumed and
//! what needs repainting.

use crate::clipboard::Clipboard;
use crate::{Action, EditKind, edit, motion};
use core_model::EditorModel;
use core_render::RenderDelta;
use core_render::scheduler::merge_opt;
use core_text::GlyphMetrics;

/// Collaborators an action may need.
pub struct EditContext<'a, M: GlyphMetrics + ?Sized> {
    pub metrics: &'a M,
    pub clipboard: &'a mut dyn Clipboard,
}

/// Result of dispatching a single `Action`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResult {
    pub consumed: bool,
    pub delta: Option<RenderDelta>,
}

impl DispatchResult {
    pub fn dirty(delta: RenderDelta) -> Self {
        Self {
            consumed: true,
            delta: Some(delta),
        }
    }

    pub fn clean() -> Self {
        Self {
            consumed: true,
            delta: None,
        }
    }

    pub fn ignored() -> Self {
        Self {
            consumed: false,
            delta: None,
        }
    }

    /// Consumed, with whatever damage the operation reported.
    pub fn from_delta(delta: Option<RenderDelta>) -> Self {
        Self {
            consumed: true,
            delta,
        }
    }
}

/// Keyboard and pointer input that keeps the cursor solid.
fn is_input(action: &Action) -> bool {
    matches!(
        action,
        Action::Motion { .. }
            | Action::Edit(_)
            | Action::Copy
            | Action::Cut
            | Action::Paste
            | Action::SelectAll
            | Action::MoveTo { .. }
    )
}

/// Apply an action to the model. Input actions restart the blink interval
/// so the cursor stays drawn while typing or moving.
pub fn dispatch<M: GlyphMetrics + ?Sized>(
    action: Action,
    model: &mut EditorModel,
    ctx: &mut EditContext<'_, M>,
) -> DispatchResult {
    tracing::trace!(target: "actions.dispatch", ?action, "dispatch");
    let delta = match action {
        Action::Motion { kind, extend } => motion::motion(model, kind, extend),
        Action::Edit(EditKind::InsertChar(unit)) => edit::insert_char(model, ctx.metrics, unit),
        Action::Edit(EditKind::NewLine) => edit::new_line(model),
        Action::Edit(EditKind::Backspace) => edit::backspace(model),
        Action::Edit(EditKind::Delete) => edit::delete(model),
        Action::Copy => edit::copy(model, ctx.clipboard, false).delta,
        Action::Cut => edit::copy(model, ctx.clipboard, true).delta,
        Action::Paste => edit::paste(model, ctx.metrics, ctx.clipboard),
        Action::SelectAll => motion::select_all(model),
        Action::MoveTo { pos, mark } => motion::move_to(model, pos, mark),
        Action::PointerRelease => None,
        Action::Scroll(lines) => motion::scroll_lines(model, lines),
        Action::SetFirstLine(line) => motion::set_first_line(model, line),
        Action::SetXOrigin(x) => motion::set_x_origin(model, x),
        Action::Tick(now) => motion::tick(model, now),
        Action::Focus(shown) => motion::set_cursor_shown(model, shown),
    };
    let revealed = is_input(&action) && model.blink_mut().restart();
    let delta = merge_opt(delta, revealed.then_some(RenderDelta::CursorOnly));
    DispatchResult::from_delta(delta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryClipboard, MotionKind};
    use core_model::{Point, Viewport};
    use core_state::EditState;
    use core_text::{MonospaceMetrics, TextBuffer, codec};

    #[test]
    fn typing_then_cut_round_trips_through_clipboard() {
        let metrics = MonospaceMetrics::default();
        let mut clip = MemoryClipboard::default();
        let mut model = EditorModel::new(
            EditState::new(TextBuffer::default()),
            Viewport::new(160, 64, 16, 16),
            Point::default(),
        );
        let mut ctx = EditContext {
            metrics: &metrics,
            clipboard: &mut clip,
        };
        for u in codec::encode("hi") {
            let r = dispatch(Action::Edit(EditKind::InsertChar(u)), &mut model, &mut ctx);
            assert!(r.consumed);
            assert_eq!(r.delta, Some(RenderDelta::line(0)));
        }
        dispatch(Action::Motion { kind: MotionKind::LineStart, extend: true }, &mut model, &mut ctx);
        let r = dispatch(Action::Cut, &mut model, &mut ctx);
        assert_eq!(r, DispatchResult::dirty(RenderDelta::line(0)));
        assert_eq!(model.state().buffer().char_count(), 0);
        let r = dispatch(Action::Paste, &mut model, &mut ctx);
        assert_eq!(r.delta, Some(RenderDelta::line(0)));
        assert_eq!(codec::decode(&model.state().buffer().units(0)), "hi");
        assert_eq!(dispatch(Action::PointerRelease, &mut model, &mut ctx), DispatchResult::clean());
    }
}

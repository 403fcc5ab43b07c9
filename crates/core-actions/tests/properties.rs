mod common;
use common::*;

use core_actions::{Action, EditContext, EditKind, MemoryClipboard, MotionKind, dispatch, edit};
use core_text::{Limits, codec};
use proptest::prelude::*;

fn action() -> impl Strategy<Value = Action> {
    let motion = prop_oneof![
        Just(MotionKind::Left),
        Just(MotionKind::Right),
        Just(MotionKind::Up),
        Just(MotionKind::Down),
        Just(MotionKind::LineStart),
        Just(MotionKind::LineEnd),
        Just(MotionKind::PageUp),
        Just(MotionKind::PageDown),
        Just(MotionKind::BufferStart),
        Just(MotionKind::BufferEnd),
    ];
    prop_oneof![
        (motion, any::<bool>()).prop_map(|(kind, extend)| Action::Motion { kind, extend }),
        (b'a'..=b'z').prop_map(|c| Action::Edit(EditKind::InsertChar(u16::from(c)))),
        Just(Action::Edit(EditKind::NewLine)),
        Just(Action::Edit(EditKind::Backspace)),
        Just(Action::Edit(EditKind::Delete)),
        Just(Action::Copy),
        Just(Action::Cut),
        Just(Action::Paste),
        Just(Action::SelectAll),
        (-4isize..5).prop_map(Action::Scroll),
    ]
}

proptest! {
    #[test]
    fn cursor_and_offsets_stay_valid(
        seed in "[a-c\n]{0,30}",
        char_limit in 0usize..40,
        actions in prop::collection::vec(action(), 1..80),
    ) {
        let metrics = metrics();
        let mut clip = MemoryClipboard::new(16);
        let mut m = model_with(&seed, 4, Limits::with_char_limit(char_limit));
        let mut ctx = EditContext { metrics: &metrics, clipboard: &mut clip };
        for action in actions {
            let chars_before = m.state().buffer().char_count();
            let lines_before = m.state().buffer().line_count();
            let was_full = m.state().buffer().is_full();
            dispatch(action, &mut m, &mut ctx);
            let buffer = m.state().buffer();
            let c = m.state().cursor();
            prop_assert!(c.line < buffer.line_count());
            prop_assert!(c.col <= buffer.line_len(c.line));
            let span = m.state().selection().span();
            prop_assert!(span.start <= span.end);
            prop_assert!(m.view().first_line() < buffer.line_count());
            for line in buffer.lines() {
                let cells = line.cells();
                for pair in cells.windows(2) {
                    prop_assert!(pair[0].x < pair[1].x);
                }
                if let Some(last) = cells.last() {
                    prop_assert!(last.x < line.next_x());
                } else {
                    prop_assert_eq!(line.next_x(), 0);
                }
            }
            if was_full
                && buffer.char_count() >= chars_before
                && buffer.line_count() >= lines_before
            {
                prop_assert!(buffer.is_full());
            }
        }
    }

    #[test]
    fn extract_then_reinsert_round_trips(seed in "[a-z\n]{0,60}", limit in 0usize..80) {
        let m = model_with(&seed, 10, Limits::with_char_limit(limit));
        let buffer = m.state().buffer();
        let units = buffer.extract_text(0, buffer.line_count() - 1);
        let mut fresh = model_with("", 10, Limits::with_char_limit(limit));
        edit::insert_multiline_string(&mut fresh, &metrics(), &units);
        let copy = fresh.state().buffer();
        prop_assert_eq!(copy.char_count(), buffer.char_count());
        prop_assert_eq!(copy.line_count(), buffer.line_count());
        for i in 0..buffer.line_count() {
            prop_assert_eq!(copy.line_len(i), buffer.line_len(i));
        }
        if m.state().partially_loaded {
            prop_assert!(seed.starts_with(&codec::decode(&units)));
        } else {
            prop_assert_eq!(codec::decode(&units), seed);
        }
    }
}

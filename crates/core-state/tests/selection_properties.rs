use core_state::{EditState, MarkMode};
use core_text::{FontId, Limits, MonospaceMetrics, Position, TextBuffer};
use proptest::prelude::*;

fn seeded(lines: &[usize]) -> EditState {
    let m = MonospaceMetrics::default();
    let mut b = TextBuffer::new(Limits::default(), FontId(0), true);
    for (i, len) in lines.iter().enumerate() {
        if i > 0 {
            let prev = b.line_len(i - 1);
            b.split_line(i - 1, prev).unwrap();
        }
        for c in 0..*len {
            b.insert_char(&m, i, c, u16::from(b'x'), 0).unwrap();
        }
    }
    EditState::new(b)
}

proptest! {
    #[test]
    fn expand_keeps_span_normalized(
        lines in prop::collection::vec(0usize..12, 1..8),
        pivot in (0usize..10, 0usize..15),
        moves in prop::collection::vec((0usize..10, 0usize..15), 1..40),
    ) {
        let mut st = seeded(&lines);
        st.move_cursor(pivot.0, pivot.1, MarkMode::Reset);
        let anchor = st.cursor();
        for (line, col) in moves {
            st.move_cursor(line, col, MarkMode::Expand);
            let span = st.selection().span();
            prop_assert!(span.start <= span.end);
            prop_assert_eq!(st.selection().pivot(), anchor);
            prop_assert!(span.start == anchor || span.end == anchor);
            prop_assert!(span.start == st.cursor() || span.end == st.cursor());
        }
    }

    #[test]
    fn relative_moves_keep_cursor_valid(
        lines in prop::collection::vec(0usize..12, 1..8),
        moves in prop::collection::vec((-3isize..4, -20isize..21), 1..60),
    ) {
        let mut st = seeded(&lines);
        for (dl, dc) in moves {
            st.move_relative(dl, dc, MarkMode::Expand);
            let c = st.cursor();
            prop_assert!(c.line < st.buffer().line_count());
            prop_assert!(c.col <= st.buffer().line_len(c.line));
            let span = st.selection().span();
            prop_assert!(span.start <= span.end);
        }
        prop_assert!(st.cursor() <= Position::new(lines.len(), 0));
    }
}

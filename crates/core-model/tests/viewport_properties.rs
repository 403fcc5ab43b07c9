use core_model::Viewport;
use core_text::{FontId, Limits, MonospaceMetrics, Position, TextBuffer};
use proptest::prelude::*;

fn buffer(lens: &[usize]) -> TextBuffer {
    let m = MonospaceMetrics::new(8, 16);
    let mut b = TextBuffer::new(Limits::default(), FontId(0), true);
    for (i, len) in lens.iter().enumerate() {
        if i > 0 {
            b.split_line(i - 1, b.line_len(i - 1)).unwrap();
        }
        for c in 0..*len {
            b.insert_char(&m, i, c, u16::from(b'w'), 0).unwrap();
        }
    }
    b
}

proptest! {
    #[test]
    fn scroll_to_show_makes_cursor_visible(
        lens in prop::collection::vec(0usize..60, 1..40),
        rows in 1u32..8,
        cols in 1u32..20,
        start_first in 0usize..40,
        targets in prop::collection::vec((0usize..45, 0usize..70), 1..20),
    ) {
        let mut b = buffer(&lens);
        let mut view = Viewport::new(cols * 8, rows * 16, 16, 8);
        view.set_first_line(&mut b, start_first);
        for (line, col) in targets {
            let pos = b.clamp(Position::new(line, col));
            view.scroll_to_show(&mut b, pos);
            prop_assert!(view.is_line_visible(pos.line));
            prop_assert_eq!(b.line(pos.line).map(|l| l.y()), Some(view.line_y(pos.line)));
            let x = view.cursor_x(&b, pos);
            prop_assert!(x >= 0);
            prop_assert!(x < i64::from(view.width()));
            // a second call is a no-op
            prop_assert!(!view.scroll_to_show(&mut b, pos));
        }
    }
}

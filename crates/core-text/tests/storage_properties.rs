//! Property tests for storage invariants under arbitrary mutation sequences.

use core_text::{FontId, GlyphMetrics, Limits, MonospaceMetrics, TextBuffer};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Insert { line: usize, col: usize, unit: u16 },
    DeleteRange { line: usize, from: usize, len: usize },
    Split { line: usize, col: usize },
    Join { line: usize },
    DeleteLine { line: usize },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0usize..8, 0usize..40, prop_oneof![0x20u16..0x7F, 0x4E00u16..0x4E10])
            .prop_map(|(line, col, unit)| Op::Insert { line, col, unit }),
        1 => (0usize..8, 0usize..40, 0usize..5)
            .prop_map(|(line, from, len)| Op::DeleteRange { line, from, len }),
        1 => (0usize..8, 0usize..40).prop_map(|(line, col)| Op::Split { line, col }),
        1 => (0usize..8).prop_map(|line| Op::Join { line }),
        1 => (0usize..8).prop_map(|line| Op::DeleteLine { line }),
    ]
}

fn apply(b: &mut TextBuffer, m: &MonospaceMetrics, op: &Op) {
    match *op {
        Op::Insert { line, col, unit } => {
            let _ = b.insert_char(m, line, col, unit, 0);
        }
        Op::DeleteRange { line, from, len } => {
            b.delete_range(line, from, from + len);
        }
        Op::Split { line, col } => {
            let _ = b.split_line(line.min(b.line_count() - 1), col);
        }
        Op::Join { line } => {
            let _ = b.join_line(line);
        }
        Op::DeleteLine { line } => {
            b.delete_line(line);
        }
    }
}

fn check_offsets(b: &TextBuffer, m: &MonospaceMetrics) {
    let mut total = 0;
    for line in b.lines() {
        total += line.len();
        let mut expected = 0u32;
        for (i, cell) in line.cells().iter().enumerate() {
            assert_eq!(cell.x, expected, "cell {i} offset drifted");
            let w = m.advance_width(FontId(0), cell.unit);
            assert!(w > 0);
            expected += w;
        }
        assert_eq!(line.next_x(), expected, "next_x must equal the trailing offset");
    }
    assert_eq!(total, b.char_count());
    assert!(b.line_count() >= 1);
}

proptest! {
    #[test]
    fn offsets_stay_consistent(ops in prop::collection::vec(op(), 1..120)) {
        let m = MonospaceMetrics::new(6, 12);
        let mut b = TextBuffer::new(Limits::default(), FontId(0), true);
        for op in &ops {
            apply(&mut b, &m, op);
            check_offsets(&b, &m);
        }
    }

    #[test]
    fn full_is_sticky_until_something_shrinks(ops in prop::collection::vec(op(), 1..120), limit in 1usize..12) {
        let m = MonospaceMetrics::new(6, 12);
        let mut b = TextBuffer::new(Limits::with_char_limit(limit), FontId(0), true);
        for op in &ops {
            let was_full = b.is_full();
            let (chars, lines) = (b.char_count(), b.line_count());
            apply(&mut b, &m, op);
            prop_assert!(b.used_units() <= limit);
            if was_full && !b.is_full() {
                prop_assert!(b.char_count() < chars || b.line_count() < lines);
            }
        }
    }

    #[test]
    fn split_then_join_is_identity(text in "[a-z]{0,30}", at in 0usize..40) {
        let m = MonospaceMetrics::new(5, 10);
        let mut b = TextBuffer::new(Limits::default(), FontId(0), true);
        for (i, u) in text.encode_utf16().enumerate() {
            b.insert_char(&m, 0, i, u, 0).unwrap();
        }
        let before = b.line(0).unwrap().clone();
        let new_line = b.split_line(0, at).unwrap();
        b.join_line(new_line).unwrap();
        prop_assert_eq!(b.line(0).unwrap(), &before);
        prop_assert_eq!(b.line_count(), 1);
    }
}

#![allow(dead_code)] // Shared across integration tests; each binary uses a subset.

use core_actions::edit;
use core_model::{EditorModel, Point, Viewport};
use core_state::EditState;
use core_text::{FontId, Limits, MonospaceMetrics, TextBuffer, codec};

pub const CELL: u32 = 8;
pub const PITCH: u32 = 16;

pub fn metrics() -> MonospaceMetrics {
    MonospaceMetrics::new(CELL, PITCH)
}

/// Model with `visible` lines of height, loaded with `text`.
pub fn model_with(text: &str, visible: u32, limits: Limits) -> EditorModel {
    let buffer = TextBuffer::new(limits, FontId(0), true);
    let mut model = EditorModel::new(
        EditState::new(buffer),
        Viewport::new(40 * CELL, visible * PITCH, PITCH, CELL),
        Point::default(),
    );
    edit::set_text(&mut model, &metrics(), &codec::encode(text));
    model
}

pub fn model(text: &str) -> EditorModel {
    model_with(text, 10, Limits::default())
}

/// Buffer content with `\n` between lines.
pub fn text(model: &EditorModel) -> String {
    let buffer = model.state().buffer();
    codec::decode(&buffer.extract_text(0, buffer.line_count() - 1))
}

pub fn numbered(lines: usize) -> String {
    (0..lines).map(|i| format!("line{i}")).collect::<Vec<_>>().join("\n")
}

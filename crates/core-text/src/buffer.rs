//! The text buffer: an ordered, bounded array of lines.

use crate::grow::{Exhausted, reserve_bounded};
use crate::line::{CharCell, Line};
use crate::metrics::{GlyphMetrics, advance};
use crate::{CodeUnit, ColorIndex, FontId, LINE_BREAK, Position, StorageError};
use tracing::{debug, trace};

/// Default absolute ceiling on cells per line.
pub const DEFAULT_MAX_LINE_CELLS: usize = 32_767;
/// Default absolute ceiling on the number of lines.
pub const DEFAULT_MAX_LINES: usize = 65_535;
const INITIAL_LINES: usize = 8;

/// Hard ceilings applied to every growth path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_line_cells: usize,
    pub max_lines: usize,
    /// Cap on characters plus line breaks; 0 means unlimited.
    pub char_limit: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_line_cells: DEFAULT_MAX_LINE_CELLS,
            max_lines: DEFAULT_MAX_LINES,
            char_limit: 0,
        }
    }
}

impl Limits {
    pub fn with_char_limit(char_limit: usize) -> Self {
        Self {
            char_limit,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct TextBuffer {
    lines: Vec<Line>,
    char_count: usize,
    limits: Limits,
    font: FontId,
    full: bool,
    changed: bool,
    editable: bool,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new(Limits::default(), FontId::default(), true)
    }
}

impl TextBuffer {
    /// Create a buffer holding a single empty line.
    pub fn new(limits: Limits, font: FontId, editable: bool) -> Self {
        let limits = Limits {
            max_line_cells: limits.max_line_cells.max(1),
            max_lines: limits.max_lines.max(1),
            char_limit: limits.char_limit,
        };
        Self {
            lines: vec![Line::new()],
            char_count: 0,
            limits,
            font,
            full: false,
            changed: false,
            editable,
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn char_count(&self) -> usize {
        self.char_count
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    pub fn font(&self) -> FontId {
        self.font
    }

    pub fn is_full(&self) -> bool {
        self.full
    }

    pub fn is_changed(&self) -> bool {
        self.changed
    }

    pub fn reset_changed(&mut self) {
        self.changed = false;
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    pub fn set_editable(&mut self, editable: bool) {
        self.editable = editable;
    }

    pub fn line(&self, idx: usize) -> Option<&Line> {
        self.lines.get(idx)
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Length of line `idx` (0 when out of range).
    pub fn line_len(&self, idx: usize) -> usize {
        self.lines.get(idx).map(Line::len).unwrap_or(0)
    }

    /// Characters plus line breaks currently stored.
    pub fn used_units(&self) -> usize {
        self.char_count + self.lines.len() - 1
    }

    /// Units left before the char limit, `None` when unlimited.
    pub fn remaining_units(&self) -> Option<usize> {
        match self.limits.char_limit {
            0 => None,
            limit => Some(limit.saturating_sub(self.used_units())),
        }
    }

    /// Clamp `pos` to a valid buffer coordinate.
    pub fn clamp(&self, mut pos: Position) -> Position {
        pos.clamp_to(self.lines.len(), |l| self.line_len(l));
        pos
    }

    /// Widest line in pixels.
    pub fn max_line_width(&self) -> u32 {
        self.lines.iter().map(Line::next_x).max().unwrap_or(0)
    }

    fn reject(&mut self, err: StorageError) -> StorageError {
        self.full = true;
        debug!(target: "text.storage", %err, chars = self.char_count, lines = self.lines.len(), "growth_rejected");
        err
    }

    fn freed(&mut self) {
        if self.full {
            self.full = false;
            trace!(target: "text.storage", chars = self.char_count, lines = self.lines.len(), "full_cleared");
        }
    }

    fn check_char_limit(&self, extra: usize) -> Result<(), StorageError> {
        match self.limits.char_limit {
            0 => Ok(()),
            limit if self.used_units() + extra > limit => Err(StorageError::CharLimit { limit }),
            _ => Ok(()),
        }
    }

    fn line_growth_error(&self, line: usize, e: Exhausted) -> StorageError {
        match e {
            Exhausted::Ceiling => StorageError::LineCapacity {
                line,
                max: self.limits.max_line_cells,
            },
            Exhausted::Alloc => StorageError::Alloc,
        }
    }

    /// Insert one cell at `(line, col)` (clamped) with foreground `fg`.
    pub fn insert_char<M: GlyphMetrics + ?Sized>(
        &mut self,
        metrics: &M,
        line: usize,
        col: usize,
        unit: CodeUnit,
        fg: ColorIndex,
    ) -> Result<(), StorageError> {
        let pos = self.clamp(Position::new(line, col));
        if let Err(e) = self.check_char_limit(1) {
            return Err(self.reject(e));
        }
        let max = self.limits.max_line_cells;
        if let Err(e) = self.lines[pos.line].reserve(1, max) {
            let err = self.line_growth_error(pos.line, e);
            return Err(self.reject(err));
        }
        let width = advance(metrics, self.font, unit);
        let cell = CharCell {
            glyph: metrics.glyph_id(self.font, unit),
            unit,
            fg,
            font: 0,
            x: 0,
        };
        self.lines[pos.line].insert_cell(pos.col, cell, width);
        self.char_count += 1;
        self.changed = true;
        Ok(())
    }

    /// Remove cells `[from, to)` of `line`. Returns how many were removed.
    pub fn delete_range(&mut self, line: usize, from: usize, to: usize) -> usize {
        let Some(l) = self.lines.get_mut(line) else {
            return 0;
        };
        let to = to.min(l.len());
        if from >= to {
            return 0;
        }
        l.remove_range(from, to);
        let removed = to - from;
        self.char_count -= removed;
        self.changed = true;
        self.freed();
        removed
    }

    /// Split `line` at `col`; the new line (index returned) takes the tail.
    pub fn split_line(&mut self, line: usize, col: usize) -> Result<usize, StorageError> {
        let pos = self.clamp(Position::new(line, col));
        if let Err(e) = self.check_char_limit(1) {
            return Err(self.reject(e));
        }
        if let Err(e) = reserve_bounded(&mut self.lines, 1, self.limits.max_lines, INITIAL_LINES) {
            let err = match e {
                Exhausted::Ceiling => StorageError::LineCeiling {
                    max: self.limits.max_lines,
                },
                Exhausted::Alloc => StorageError::Alloc,
            };
            return Err(self.reject(err));
        }
        let tail = match self.lines[pos.line].try_split_off(pos.col) {
            Ok(tail) => tail,
            Err(_) => return Err(self.reject(StorageError::Alloc)),
        };
        self.lines.insert(pos.line + 1, tail);
        self.changed = true;
        Ok(pos.line + 1)
    }

    /// Append `line` to `line - 1` and remove it. No-op for line 0 or out of range.
    pub fn join_line(&mut self, line: usize) -> Result<(), StorageError> {
        if line == 0 || line >= self.lines.len() {
            return Ok(());
        }
        let extra = self.lines[line].len();
        let max = self.limits.max_line_cells;
        if let Err(e) = self.lines[line - 1].reserve(extra, max) {
            let err = self.line_growth_error(line - 1, e);
            return Err(self.reject(err));
        }
        let tail = self.lines.remove(line);
        self.lines[line - 1].append(&tail);
        self.changed = true;
        self.freed();
        Ok(())
    }

    /// Remove a whole line. The sole remaining line is emptied instead.
    /// Returns the number of cells removed.
    pub fn delete_line(&mut self, line: usize) -> usize {
        if line >= self.lines.len() {
            return 0;
        }
        if self.lines.len() == 1 {
            return self.delete_range(0, 0, usize::MAX);
        }
        let removed = self.lines.remove(line);
        self.char_count -= removed.len();
        self.changed = true;
        self.freed();
        removed.len()
    }

    /// Set the foreground color of cells `[from, to)` on `line`.
    pub fn paint_fg(&mut self, line: usize, from: usize, to: usize, fg: ColorIndex) -> bool {
        match self.lines.get_mut(line) {
            Some(l) => l.paint_fg(from, to, fg),
            None => false,
        }
    }

    /// Code units of one line (no trailing break).
    pub fn units(&self, line: usize) -> Vec<CodeUnit> {
        self.lines
            .get(line)
            .map(|l| l.units().collect())
            .unwrap_or_default()
    }

    /// Lines `from_line..=to_line` (clamped) joined by [`LINE_BREAK`].
    pub fn extract_text(&self, from_line: usize, to_line: usize) -> Vec<CodeUnit> {
        let last = self.lines.len() - 1;
        let from = from_line.min(last);
        let to = to_line.min(last);
        if from > to {
            return Vec::new();
        }
        self.extract_range(Position::new(from, 0), Position::new(to, self.line_len(to)))
    }

    /// Units between two positions in reading order, breaks included.
    pub fn extract_range(&self, start: Position, end: Position) -> Vec<CodeUnit> {
        let (mut a, mut b) = (self.clamp(start), self.clamp(end));
        if b < a {
            std::mem::swap(&mut a, &mut b);
        }
        let mut out = Vec::new();
        for idx in a.line..=b.line {
            let line = &self.lines[idx];
            let from = if idx == a.line { a.col } else { 0 };
            let to = if idx == b.line { b.col } else { line.len() };
            out.extend(line.cells()[from..to].iter().map(|c| c.unit));
            if idx != b.line {
                out.push(LINE_BREAK);
            }
        }
        out
    }

    /// Drop all content, leaving one empty line.
    pub fn clear(&mut self) {
        let had_content = self.char_count > 0 || self.lines.len() > 1;
        self.lines.truncate(1);
        self.lines[0].clear();
        self.char_count = 0;
        if had_content {
            self.changed = true;
            self.freed();
        }
    }

    /// Switch font and recompute every cached glyph handle and offset.
    pub fn relayout<M: GlyphMetrics + ?Sized>(&mut self, metrics: &M, font: FontId) {
        self.font = font;
        for line in &mut self.lines {
            line.relayout(metrics, font);
        }
        trace!(target: "text.storage", font = font.0, lines = self.lines.len(), "relayout");
    }

    /// Stamp every line's viewport-relative `y` from its index.
    pub fn stamp_y<F>(&mut self, mut y_for: F)
    where
        F: FnMut(usize) -> i32,
    {
        for (idx, line) in self.lines.iter_mut().enumerate() {
            line.set_y(y_for(idx));
        }
    }
}

//! A single line of cells with cached x-offsets.

use crate::grow::{Exhausted, reserve_bounded};
use crate::metrics::{GlyphMetrics, advance};
use crate::{CodeUnit, ColorIndex, FontId, GlyphId};

/// Initial cell capacity for a line that starts growing.
pub(crate) const INITIAL_LINE_CELLS: usize = 16;

/// One stored character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharCell {
    pub glyph: GlyphId,
    pub unit: CodeUnit,
    pub fg: ColorIndex,
    /// Reserved per-cell font selector (always 0).
    pub font: u8,
    /// Left edge in pixels relative to the line start.
    pub x: u32,
}

/// Ordered cells of one line plus the cached total width and the
/// viewport-relative vertical position stamped by the viewport.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    cells: Vec<CharCell>,
    next_x: u32,
    y: i32,
}

impl Line {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[CharCell] {
        &self.cells
    }

    pub fn cell(&self, col: usize) -> Option<&CharCell> {
        self.cells.get(col)
    }

    /// Total pixel width (offset of a hypothetical trailing cell).
    pub fn next_x(&self) -> u32 {
        self.next_x
    }

    /// Bottom edge of the line relative to the viewport top.
    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn set_y(&mut self, y: i32) {
        self.y = y;
    }

    /// Pixel offset of column `col`; `col >= len` yields `next_x`.
    pub fn x_at(&self, col: usize) -> u32 {
        self.cells.get(col).map(|c| c.x).unwrap_or(self.next_x)
    }

    /// Advance of the cell at `col` (0 past the end).
    pub fn cell_width(&self, col: usize) -> u32 {
        if col >= self.cells.len() {
            return 0;
        }
        self.x_at(col + 1) - self.cells[col].x
    }

    pub fn units(&self) -> impl Iterator<Item = CodeUnit> + '_ {
        self.cells.iter().map(|c| c.unit)
    }

    pub(crate) fn reserve(&mut self, extra: usize, max_cells: usize) -> Result<(), Exhausted> {
        reserve_bounded(&mut self.cells, extra, max_cells, INITIAL_LINE_CELLS)
    }

    /// Insert `cell` before `col`; later cells move right by `width`.
    /// Capacity must already have been reserved.
    pub(crate) fn insert_cell(&mut self, col: usize, mut cell: CharCell, width: u32) {
        let col = col.min(self.cells.len());
        cell.x = self.x_at(col);
        for later in &mut self.cells[col..] {
            later.x += width;
        }
        self.cells.insert(col, cell);
        self.next_x += width;
    }

    /// Remove `[from, to)` and re-base the tail. Returns the removed width.
    pub(crate) fn remove_range(&mut self, from: usize, to: usize) -> u32 {
        let to = to.min(self.cells.len());
        if from >= to {
            return 0;
        }
        let width = self.x_at(to) - self.x_at(from);
        self.cells.drain(from..to);
        for later in &mut self.cells[from..] {
            later.x -= width;
        }
        self.next_x -= width;
        width
    }

    /// Move `[col, len)` into a new line re-based at 0; this line keeps `[0, col)`.
    pub(crate) fn try_split_off(&mut self, col: usize) -> Result<Line, Exhausted> {
        let col = col.min(self.cells.len());
        let base = self.x_at(col);
        let mut tail_cells = Vec::new();
        tail_cells
            .try_reserve_exact(self.cells.len() - col)
            .map_err(|_| Exhausted::Alloc)?;
        tail_cells.extend(self.cells[col..].iter().map(|c| CharCell {
            x: c.x - base,
            ..*c
        }));
        let tail = Line {
            cells: tail_cells,
            next_x: self.next_x - base,
            y: self.y,
        };
        self.cells.truncate(col);
        self.next_x = base;
        Ok(tail)
    }

    /// Append every cell of `other`, re-based by this line's width.
    /// Capacity must already have been reserved.
    pub(crate) fn append(&mut self, other: &Line) {
        let base = self.next_x;
        self.cells.extend(other.cells.iter().map(|c| CharCell {
            x: c.x + base,
            ..*c
        }));
        self.next_x += other.next_x;
    }

    pub(crate) fn clear(&mut self) {
        self.cells.clear();
        self.next_x = 0;
    }

    /// Set `fg` on `[from, to)`; returns true if any cell changed.
    pub(crate) fn paint_fg(&mut self, from: usize, to: usize, fg: ColorIndex) -> bool {
        let to = to.min(self.cells.len());
        let mut touched = false;
        for cell in self.cells.iter_mut().take(to).skip(from) {
            if cell.fg != fg {
                cell.fg = fg;
                touched = true;
            }
        }
        touched
    }

    /// Recompute glyph handles and offsets for `font`.
    pub(crate) fn relayout<M: GlyphMetrics + ?Sized>(&mut self, metrics: &M, font: FontId) {
        let mut x = 0u32;
        for cell in &mut self.cells {
            cell.glyph = metrics.glyph_id(font, cell.unit);
            cell.x = x;
            x += advance(metrics, font, cell.unit);
        }
        self.next_x = x;
    }
}

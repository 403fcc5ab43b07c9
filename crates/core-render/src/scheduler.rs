//! Render delta merging.
//!
//! Producers report fine-grained invalidation intents (`RenderDelta`) via
//! `mark`; `consume` merges what was queued into one semantic shape and the
//! strategy the painter should execute.
//!
//! Merge semantics:
//! - Any `Full` makes the result `Full`.
//! - Multiple `Lines` merge into `[min(start), max(end))`.
//! - Multiple `Scroll` deltas keep the first `old_first` and the last
//!   `new_first`.
//! - Precedence: `Scroll` > `Lines` > `CursorOnly`.
//!
//! Example: `Lines(5..6) + CursorOnly` => `Lines(5..6)`.
//!
//! The surface contract has no blit, so a `Scroll` always executes as a full
//! repaint; it stays distinct semantically for tracing.

use std::ops::Range;

/// What an operation invalidated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderDelta {
    /// Entire widget must be repainted.
    Full,
    /// Cell contents changed on lines `[start, end)` without moving other lines.
    Lines(Range<usize>),
    /// First visible line changed.
    Scroll { old_first: usize, new_first: usize },
    /// Only the cursor moved or blinked.
    CursorOnly,
}

impl RenderDelta {
    /// Delta for a single line.
    pub fn line(idx: usize) -> Self {
        RenderDelta::Lines(idx..idx + 1)
    }

    /// Delta covering the inclusive line span `a..=b` in either order.
    pub fn span(a: usize, b: usize) -> Self {
        RenderDelta::Lines(a.min(b)..a.max(b) + 1)
    }

    /// Merge two deltas using the scheduler precedence.
    pub fn merge(self, other: RenderDelta) -> RenderDelta {
        use RenderDelta::*;
        match (self, other) {
            (Full, _) | (_, Full) => Full,
            (Scroll { old_first, .. }, Scroll { new_first, .. }) => Scroll {
                old_first,
                new_first,
            },
            (s @ Scroll { .. }, _) | (_, s @ Scroll { .. }) => s,
            (Lines(a), Lines(b)) => Lines(a.start.min(b.start)..a.end.max(b.end)),
            (l @ Lines(_), CursorOnly) | (CursorOnly, l @ Lines(_)) => l,
            (CursorOnly, CursorOnly) => CursorOnly,
        }
    }
}

/// Fold an optional accumulator with another delta.
pub fn merge_opt(acc: Option<RenderDelta>, delta: Option<RenderDelta>) -> Option<RenderDelta> {
    match (acc, delta) {
        (Some(a), Some(b)) => Some(a.merge(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

/// Decision handed to the painter.
///
/// - `semantic`: merged damage kind for the queued marks.
/// - `effective`: what the painter should execute now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub semantic: RenderDelta,
    pub effective: RenderDelta,
}

/// Counts of semantic decisions by kind.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RenderDeltaMetrics {
    pub full: u64,
    pub lines: u64,
    pub scroll: u64,
    pub cursor_only: u64,
    pub collapsed_scroll: u64,
    /// `Lines` dropped because a `Scroll` outranked them.
    pub suppressed_lines: u64,
    pub semantic_frames: u64,
}

impl RenderDeltaMetrics {
    fn incr_semantic(&mut self, delta: &RenderDelta) {
        match delta {
            RenderDelta::Full => self.full += 1,
            RenderDelta::Lines(_) => self.lines += 1,
            RenderDelta::Scroll { .. } => self.scroll += 1,
            RenderDelta::CursorOnly => self.cursor_only += 1,
        }
        self.semantic_frames += 1;
    }
}

#[derive(Debug, Default)]
pub struct RenderScheduler {
    pending: Vec<RenderDelta>,
    metrics: RenderDeltaMetrics,
}

impl RenderScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metrics(&self) -> RenderDeltaMetrics {
        self.metrics
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Record a delta. Multiple calls accumulate until `consume()`.
    pub fn mark(&mut self, delta: RenderDelta) {
        tracing::trace!(target: "render.scheduler", ?delta, "render_mark");
        self.pending.push(delta);
    }

    /// Collapse queued deltas into a `Decision`; `None` when nothing is queued.
    pub fn consume(&mut self) -> Option<Decision> {
        if self.pending.is_empty() {
            return None;
        }
        let merged = self.collapse();
        tracing::trace!(target: "render.scheduler", ?merged, "render_delta_collapse");
        self.pending.clear();
        self.metrics.incr_semantic(&merged);
        let effective = match &merged {
            RenderDelta::Scroll { .. } => RenderDelta::Full,
            other => other.clone(),
        };
        Some(Decision {
            semantic: merged,
            effective,
        })
    }

    fn collapse(&mut self) -> RenderDelta {
        let scrolls = self
            .pending
            .iter()
            .filter(|d| matches!(d, RenderDelta::Scroll { .. }))
            .count();
        let has_lines = self.pending.iter().any(|d| matches!(d, RenderDelta::Lines(_)));
        let has_full = self.pending.iter().any(|d| matches!(d, RenderDelta::Full));
        if !has_full && scrolls > 0 {
            self.metrics.collapsed_scroll += scrolls as u64 - 1;
            if has_lines {
                self.metrics.suppressed_lines += 1;
            }
        }
        self.pending
            .drain(..)
            .reduce(RenderDelta::merge)
            .unwrap_or(RenderDelta::Full)
    }
}

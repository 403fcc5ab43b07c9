//! Clipboard contract.
//!
//! The transport (system clipboard, another widget) lives outside the
//! engine; it exchanges raw code-unit sequences with one code unit per line
//! break.

use core_text::CodeUnit;
use tracing::debug;

/// Sequence handed out by a clipboard.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClipboardContent {
    pub units: Vec<CodeUnit>,
    /// The source held more than could be delivered.
    pub truncated: bool,
}

pub trait Clipboard {
    /// Current content, or `None` when there is nothing to paste.
    fn get_sequence(&mut self) -> Option<ClipboardContent>;
    /// Offer a sequence. Returns false if it was not accepted.
    fn put_sequence(&mut self, units: &[CodeUnit]) -> bool;
}

pub const DEFAULT_CLIPBOARD_UNITS: usize = 65_536;

/// In-process clipboard with a fixed capacity. Oversized sequences keep
/// their prefix and report truncation on the next read.
#[derive(Debug, Clone)]
pub struct MemoryClipboard {
    units: Vec<CodeUnit>,
    max_units: usize,
    truncated: bool,
}

impl Default for MemoryClipboard {
    fn default() -> Self {
        Self::new(DEFAULT_CLIPBOARD_UNITS)
    }
}

impl MemoryClipboard {
    pub fn new(max_units: usize) -> Self {
        Self {
            units: Vec::new(),
            max_units,
            truncated: false,
        }
    }

    pub fn with_content(max_units: usize, units: &[CodeUnit]) -> Self {
        let mut clip = Self::new(max_units);
        clip.put_sequence(units);
        clip
    }

    pub fn units(&self) -> &[CodeUnit] {
        &self.units
    }

    pub fn max_units(&self) -> usize {
        self.max_units
    }
}

impl Clipboard for MemoryClipboard {
    fn get_sequence(&mut self) -> Option<ClipboardContent> {
        if self.units.is_empty() {
            return None;
        }
        Some(ClipboardContent {
            units: self.units.clone(),
            truncated: self.truncated,
        })
    }

    fn put_sequence(&mut self, units: &[CodeUnit]) -> bool {
        if self.max_units == 0 {
            return false;
        }
        let keep = units.len().min(self.max_units);
        self.units.clear();
        self.units.extend_from_slice(&units[..keep]);
        self.truncated = keep < units.len();
        if self.truncated {
            debug!(target: "actions.edit", offered = units.len(), kept = keep, "clipboard_truncated");
        }
        true
    }
}

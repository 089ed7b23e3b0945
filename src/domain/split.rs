//! Splitting editor text into lines for a technical-demand block.

use serde::{Deserialize, Serialize};

use super::{
    classify::{numbered_remainder, starts_new_item, strip_numbering},
    line::{EditableLine, ProcessedLine},
};

/// How numbering is derived from the editor text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberingMode {
    /// Numbering follows the `N. ` prefixes and indentation the user typed.
    #[default]
    Manual,
    /// Numbering is derived from the content of each line; typed numbers
    /// are discarded.
    Auto,
}

impl NumberingMode {
    /// Returns [`NumberingMode::Auto`] when `auto` is set.
    #[must_use]
    pub const fn from_flag(auto: bool) -> Self {
        if auto { Self::Auto } else { Self::Manual }
    }
}

/// Splits an editor buffer into lines to write into a technical-demand block.
///
/// Numbering is carried by [`ProcessedLine::is_numbered`] only; no number is
/// written into the text. A buffer holding a single requirement is never
/// numbered.
#[must_use]
pub fn split(buffer: &str, mode: NumberingMode) -> Vec<ProcessedLine> {
    let lines = EditableLine::split(buffer);
    let mut processed: Vec<_> = match mode {
        NumberingMode::Auto => lines
            .enumerate()
            .map(|(i, line)| {
                let clean = strip_numbering(line.trimmed());
                ProcessedLine::new(clean, starts_new_item(i, clean))
            })
            .collect(),
        NumberingMode::Manual => lines.map(manual).collect(),
    };

    if let [only] = processed.as_mut_slice() {
        only.is_numbered = false;
    }

    tracing::debug!(lines = processed.len(), ?mode, "split editor text");
    processed
}

fn manual(line: EditableLine<'_>) -> ProcessedLine {
    if let Some(rest) = numbered_remainder(line.trimmed()) {
        ProcessedLine::new(rest, true)
    } else if line.is_indented() {
        ProcessedLine::new(line.trimmed(), false)
    } else {
        ProcessedLine::new(line.trimmed(), true)
    }
}

use std::{fmt, num::NonZeroUsize};

use non_empty_string::NonEmptyString;
use serde::{Deserialize, Serialize};

/// A single native line of a technical-demand text block.
///
/// This is the shape the drawing exposes when it is read: the raw text of the
/// line and whether the document marks the line as the start of a new
/// numbered entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementLine {
    /// The text of the line, as stored in the drawing.
    pub text: String,
    /// Whether the drawing numbers this line (starts a new requirement).
    #[serde(rename = "numbered")]
    pub is_new_item: bool,
}

impl RequirementLine {
    /// Creates a line that starts a new numbered requirement.
    #[must_use]
    pub fn numbered(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_new_item: true,
        }
    }

    /// Creates a continuation line.
    #[must_use]
    pub fn continuation(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_new_item: false,
        }
    }
}

impl From<ProcessedLine> for RequirementLine {
    fn from(line: ProcessedLine) -> Self {
        Self {
            text: line.text,
            is_new_item: line.is_numbered,
        }
    }
}

/// A logical requirement assembled from one or more [`RequirementLine`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    ordinal: NonZeroUsize,
    text: NonEmptyString,
}

impl Requirement {
    pub(crate) const fn new(ordinal: NonZeroUsize, text: NonEmptyString) -> Self {
        Self { ordinal, text }
    }

    /// The 1-based position of the requirement among requirements.
    #[must_use]
    pub const fn ordinal(&self) -> NonZeroUsize {
        self.ordinal
    }

    /// The assembled text, without any numbering prefix.
    #[must_use]
    pub fn text(&self) -> &str {
        self.text.as_str()
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}. {}", self.ordinal, self.text)
    }
}

/// One visual line of the editor buffer.
///
/// Borrowed from the buffer; it lives only as long as the call that split the
/// buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditableLine<'a> {
    raw: &'a str,
}

impl<'a> EditableLine<'a> {
    /// Splits an editor buffer into its non-blank lines.
    pub fn split(buffer: &'a str) -> impl Iterator<Item = Self> {
        buffer
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|raw| Self { raw })
    }

    /// The line exactly as typed.
    #[must_use]
    pub const fn raw(&self) -> &'a str {
        self.raw
    }

    /// The line with surrounding whitespace removed.
    #[must_use]
    pub fn trimmed(&self) -> &'a str {
        self.raw.trim()
    }

    /// Whether the line is indented, which marks an explicit continuation.
    #[must_use]
    pub fn is_indented(&self) -> bool {
        self.raw.starts_with(char::is_whitespace)
    }
}

/// A line ready to be written into a technical-demand block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedLine {
    /// The text with numbering and indentation markers stripped.
    pub text: String,
    /// Whether the native numbering flag should be set for this line.
    pub is_numbered: bool,
}

impl ProcessedLine {
    /// Creates a new processed line.
    #[must_use]
    pub fn new(text: impl Into<String>, is_numbered: bool) -> Self {
        Self {
            text: text.into(),
            is_numbered,
        }
    }
}

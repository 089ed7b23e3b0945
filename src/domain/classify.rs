//! Structural classification of requirement lines.
//!
//! A line either starts a new numbered requirement or continues the previous
//! one. The decision is purely syntactic: a line continues its predecessor
//! when it starts with a lower-case letter or with a hyphen/en dash. The first
//! line always starts a new item.
//!
//! This is a heuristic. Legitimate new items that start with a lower-case
//! word (a material grade, a unit) are demoted to continuations.

use std::sync::LazyLock;

use regex::Regex;

/// A leading `<digits>.` marker followed by whitespace (or nothing).
///
/// The whitespace is required so that decimal values such as `1.5 мм` are
/// not mistaken for numbering.
static NUMBERING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d+\.(?:\s+|$)").expect("numbering pattern is valid"));

/// Whether the line at `index` starts a new numbered requirement.
///
/// `clean` is the line's text, already trimmed and stripped of numbering.
#[must_use]
pub fn starts_new_item(index: usize, clean: &str) -> bool {
    if index == 0 {
        return true;
    }
    let lower_first = clean.chars().next().is_some_and(char::is_lowercase);
    !(lower_first || clean.starts_with('-') || clean.starts_with('–'))
}

/// Whether the line at `index` belongs to the requirement above it.
///
/// `text` is the trimmed line, numbering included. An indented line is
/// always a sub-item.
#[must_use]
pub fn is_sub_item(index: usize, text: &str, indented: bool) -> bool {
    indented || !starts_new_item(index, strip_numbering(text))
}

/// Removes a leading `<digits>. ` marker, returning the remainder left-trimmed.
///
/// Text without a marker is returned left-trimmed.
#[must_use]
pub fn strip_numbering(line: &str) -> &str {
    NUMBERING
        .find(line)
        .map_or(line, |marker| &line[marker.end()..])
        .trim_start()
}

/// Splits `<digits>. <rest>` into the remainder, if the line is numbered.
#[must_use]
pub fn numbered_remainder(line: &str) -> Option<&str> {
    NUMBERING
        .find(line)
        .map(|marker| line[marker.end()..].trim())
}

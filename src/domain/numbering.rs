//! Numbering of the editor text itself.
//!
//! [`number`] rewrites the editor text so that every new item carries an
//! `N. ` prefix and every continuation is indented, which is exactly what the
//! manual numbering mode of [`split`](super::split::split) reads back.

use std::sync::LazyLock;

use regex::Regex;

use super::{
    classify::{starts_new_item, strip_numbering},
    line::EditableLine,
};

/// Indentation given to continuation lines.
pub const CONTINUATION_INDENT: &str = "    ";

static LEADING_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.(?:[ \t]+|$)").expect("marker pattern is valid"));

static BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[•\-–—]\s*").expect("bullet pattern is valid"));

/// Renumbers the editor text from the content of each line.
///
/// Existing numbers are discarded. New items are numbered from 1;
/// continuations are indented with [`CONTINUATION_INDENT`]. Blank lines are
/// dropped.
#[must_use]
pub fn number(buffer: &str) -> String {
    let mut counter = 0usize;
    EditableLine::split(buffer)
        .enumerate()
        .map(|(i, line)| {
            let clean = strip_numbering(line.trimmed());
            if starts_new_item(i, clean) {
                counter += 1;
                format!("{counter}. {clean}")
            } else {
                format!("{CONTINUATION_INDENT}{clean}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Removes `N. ` prefixes from unindented lines, keeping everything else.
///
/// Indented lines are continuations and are left exactly as written, even if
/// they start with a number.
#[must_use]
pub fn unnumber(buffer: &str) -> String {
    buffer
        .trim_matches(|c| c == '\n' || c == '\r')
        .lines()
        .map(|line| LEADING_MARKER.find(line).map_or(line, |marker| &line[marker.end()..]))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Strips numbering and a leading bullet from a line.
#[must_use]
pub fn clean_line(line: &str) -> &str {
    let line = strip_numbering(line);
    let bullet_end = BULLET.find(line).map_or(0, |bullet| bullet.end());
    line[bullet_end..].trim()
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test]
    fn numbering_indents_continuations() {
        let buffer = "5. Покрытие\nэмаль ПФ-115 серая.\n\nМаркировать.\n- шрифт 5 по ГОСТ 2.304.";
        assert_eq!(
            number(buffer),
            "1. Покрытие\n    эмаль ПФ-115 серая.\n2. Маркировать.\n    - шрифт 5 по ГОСТ 2.304."
        );
    }

    #[test]
    fn numbering_is_stable() {
        let once = number("Первое.\nвторое\nТретье.");
        assert_eq!(number(&once), once);
    }

    #[test]
    fn unnumber_keeps_indentation_and_plain_lines() {
        let buffer = "1. Первое.\n    уточнение\n2. Второе.";
        assert_eq!(unnumber(buffer), "Первое.\n    уточнение\nВторое.");
    }

    #[test]
    fn unnumber_leaves_indented_lines_alone() {
        let buffer = "1. Отверстия:\n    12 шт. сверлить.\n    1. по разметке";
        let unnumbered = unnumber(buffer);
        assert_eq!(unnumbered, "Отверстия:\n    12 шт. сверлить.\n    1. по разметке");
    }

    #[test]
    fn unnumbered_continuation_survives_manual_split() {
        let unnumbered = unnumber("1. Отверстия:\n    12 шт. сверлить.");
        let lines = crate::domain::split(&unnumbered, crate::domain::NumberingMode::Manual);
        let numbered: Vec<_> = lines.iter().map(|line| line.is_numbered).collect();
        assert_eq!(numbered, [true, false]);
    }

    #[test_case("1.5 мм по контуру", "1.5 мм по контуру"; "decimal")]
    #[test_case("12.", ""; "marker only")]
    #[test_case("3.  Третье", "Третье"; "wide gap")]
    fn unnumber_single_line(line: &str, expected: &str) {
        assert_eq!(unnumber(line), expected);
    }

    #[test_case("1. • Пункт", "Пункт"; "number and bullet")]
    #[test_case("– уточнение ", "уточнение"; "en dash")]
    #[test_case("— тире", "тире"; "em dash")]
    #[test_case("Текст", "Текст"; "plain")]
    fn cleaning(line: &str, expected: &str) {
        assert_eq!(clean_line(line), expected);
    }
}

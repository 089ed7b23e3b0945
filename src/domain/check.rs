//! Validation of requirement order and punctuation.
//!
//! Each line of the editor text is assigned a category (see
//! [`ClassificationRules`]). Categories must not decrease from one line to the
//! next, and every line that is not a sub-item must end with a period. When
//! anything is wrong, a corrected text is suggested; it is never applied
//! automatically.

use std::fmt;

use nonempty::NonEmpty;
use serde::Serialize;

use super::{
    category::{CategoryIndex, ClassificationRules},
    classify::is_sub_item,
    line::EditableLine,
};

/// The result of checking editor text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// There was no text to check.
    Empty,
    /// Every line is in order and correctly punctuated.
    Passed,
    /// At least one violation was found.
    Failed(CheckReport),
}

impl CheckOutcome {
    /// Whether the check found violations.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Violations found in the text, and a suggested correction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    violations: NonEmpty<Violation>,
    corrected: String,
}

impl CheckReport {
    /// The violations, in line order.
    pub fn violations(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter()
    }

    /// The text reordered by category, with missing periods appended.
    #[must_use]
    pub fn corrected(&self) -> &str {
        &self.corrected
    }
}

/// A single finding of the checker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// A line belongs to a category that should come before the previous
    /// line's category.
    Order {
        /// 1-based line number among the checked lines.
        line: usize,
        /// Category of the offending line.
        category: String,
        /// Category of the line before it.
        previous: String,
    },
    /// A requirement does not end with a period.
    MissingPeriod {
        /// 1-based line number among the checked lines.
        line: usize,
        /// The offending text.
        text: String,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Order {
                line,
                category,
                previous,
            } => write!(
                f,
                "line {line}: '{category}' requirements must come before '{previous}'"
            ),
            Self::MissingPeriod { line, text } => {
                write!(f, "line {line}: missing terminal period in '{text}'")
            }
        }
    }
}

struct CheckedLine<'a> {
    text: &'a str,
    category: CategoryIndex,
    indented: bool,
}

impl CheckedLine<'_> {
    fn is_sub_item(&self, index: usize) -> bool {
        is_sub_item(index, self.text, self.indented)
    }

    fn lacks_period(&self, index: usize) -> bool {
        !self.is_sub_item(index) && !self.text.ends_with('.')
    }
}

/// Checks the order and punctuation of the requirements in `buffer`.
#[must_use]
pub fn check(buffer: &str, rules: &ClassificationRules) -> CheckOutcome {
    let lines: Vec<_> = EditableLine::split(buffer)
        .map(|line| CheckedLine {
            text: line.trimmed(),
            category: rules.classify(line.trimmed()),
            indented: line.is_indented(),
        })
        .collect();

    if lines.is_empty() {
        return CheckOutcome::Empty;
    }

    let mut violations = Vec::new();
    let mut last: Option<CategoryIndex> = None;

    for (i, line) in lines.iter().enumerate() {
        if let Some(previous) = last.filter(|previous| line.category < *previous) {
            violations.push(Violation::Order {
                line: i + 1,
                category: rules.category(line.category).name.clone(),
                previous: rules.category(previous).name.clone(),
            });
        }
        last = Some(line.category);

        if line.lacks_period(i) {
            violations.push(Violation::MissingPeriod {
                line: i + 1,
                text: line.text.to_string(),
            });
        }
    }

    tracing::debug!(lines = lines.len(), violations = violations.len(), "checked requirements");

    match NonEmpty::from_vec(violations) {
        None => CheckOutcome::Passed,
        Some(violations) => CheckOutcome::Failed(CheckReport {
            violations,
            corrected: corrected(lines),
        }),
    }
}

fn corrected(mut lines: Vec<CheckedLine<'_>>) -> String {
    lines.sort_by_key(|line| line.category);
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            if line.lacks_period(i) {
                format!("{}.", line.text)
            } else {
                line.text.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::category::Category;

    /// Rules where category `i` is identified by the keyword `kw{i}`.
    fn numbered_rules() -> ClassificationRules {
        let categories = (0..14)
            .map(|i| Category {
                name: format!("cat{i}"),
                keywords: vec![format!("kw{i}x")],
            })
            .collect();
        ClassificationRules::new(categories).unwrap()
    }

    fn violations(outcome: &CheckOutcome) -> Vec<Violation> {
        match outcome {
            CheckOutcome::Failed(report) => report.violations().cloned().collect(),
            _ => Vec::new(),
        }
    }

    #[test]
    fn out_of_order_categories_are_reported_once() {
        let outcome = check("Первое kw3x.\nВторое kw1x.", &numbered_rules());

        assert_eq!(
            violations(&outcome),
            [Violation::Order {
                line: 2,
                category: "cat1".to_string(),
                previous: "cat3".to_string(),
            }]
        );

        let CheckOutcome::Failed(report) = outcome else {
            panic!("expected a failed check");
        };
        assert_eq!(report.corrected(), "Второе kw1x.\nПервое kw3x.");
    }

    #[test]
    fn tracker_follows_the_latest_line() {
        // 3, 1, 2: only the drop from 3 to 1 is a violation.
        let outcome = check("А kw3x.\nБ kw1x.\nВ kw2x.", &numbered_rules());
        assert_eq!(violations(&outcome).len(), 1);
    }

    #[test]
    fn missing_period_is_flagged() {
        let rules = ClassificationRules::default();
        let outcome = check("Материал — сталь", &rules);
        assert_eq!(
            violations(&outcome),
            [Violation::MissingPeriod {
                line: 1,
                text: "Материал — сталь".to_string(),
            }]
        );
        assert_eq!(check("Материал — сталь.", &rules), CheckOutcome::Passed);
    }

    #[test]
    fn sub_items_need_no_period() {
        let rules = ClassificationRules::default();
        let buffer = "1. Покрытие:\n- грунт ГФ-021\n    эмаль ПФ-115 серая\n2. Маркировать краской.";
        let outcome = check(buffer, &rules);
        assert_eq!(
            violations(&outcome),
            [Violation::MissingPeriod {
                line: 1,
                text: "1. Покрытие:".to_string(),
            }]
        );
    }

    #[test]
    fn corrected_text_adds_missing_periods() {
        let outcome = check("Б kw2x\nА kw1x", &numbered_rules());
        let CheckOutcome::Failed(report) = outcome else {
            panic!("expected a failed check");
        };
        assert_eq!(report.corrected(), "А kw1x.\nБ kw2x.");
    }

    #[test]
    fn blank_text_is_reported_as_empty() {
        let rules = ClassificationRules::default();
        assert_eq!(check("", &rules), CheckOutcome::Empty);
        assert_eq!(check("  \n \n", &rules), CheckOutcome::Empty);
        assert!(!check("", &rules).is_failed());
    }

    #[test]
    fn violations_render_readably() {
        let violation = Violation::Order {
            line: 2,
            category: "Материал".to_string(),
            previous: "Покрытие".to_string(),
        };
        assert_eq!(
            violation.to_string(),
            "line 2: 'Материал' requirements must come before 'Покрытие'"
        );
    }
}

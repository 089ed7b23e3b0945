//! Assembly of native technical-demand lines into numbered requirements.

use std::{fmt, num::NonZeroUsize};

use non_empty_string::NonEmptyString;

use super::line::{Requirement, RequirementLine};

/// The requirements assembled from a technical-demand block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregated {
    requirements: Vec<Requirement>,
}

impl Aggregated {
    /// Whether there is nothing to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }

    /// The number of requirements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.requirements.len()
    }

    /// The requirements, in document order.
    pub fn iter(&self) -> impl Iterator<Item = &Requirement> {
        self.requirements.iter()
    }

    /// Renders the requirements as editor text, one `N. text` per line.
    #[must_use]
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Aggregated {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, requirement) in self.requirements.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", requirement.to_string().trim_end())?;
        }
        Ok(())
    }
}

/// Folds native lines into requirements.
///
/// Blank lines are skipped. A line flagged as a new item closes the current
/// requirement and opens the next one; any other line is appended to the
/// current requirement. A continuation with nothing before it opens a new
/// requirement rather than being dropped.
#[must_use]
pub fn aggregate<'a, I>(lines: I) -> Aggregated
where
    I: IntoIterator<Item = &'a RequirementLine>,
{
    let mut requirements = Vec::new();
    let mut current = String::new();

    for line in lines {
        let text = line.text.trim();
        if text.is_empty() {
            continue;
        }

        if line.is_new_item || current.is_empty() {
            close(&mut requirements, &mut current);
            current.push_str(text);
        } else {
            join(&mut current, text);
        }
    }
    close(&mut requirements, &mut current);

    tracing::debug!(requirements = requirements.len(), "aggregated technical requirements");
    Aggregated { requirements }
}

fn close(requirements: &mut Vec<Requirement>, current: &mut String) {
    let text = std::mem::take(current);
    if let Ok(text) = NonEmptyString::new(text) {
        let ordinal = NonZeroUsize::MIN.saturating_add(requirements.len());
        requirements.push(Requirement::new(ordinal, text));
    }
}

/// Appends a fragment, separating it with a single space unless the join
/// already has one or a hyphen sits at the boundary.
fn join(current: &mut String, fragment: &str) {
    if !current.ends_with(' ') && !current.ends_with('-') && !fragment.starts_with('-') {
        current.push(' ');
    }
    current.push_str(fragment);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(lines: &[RequirementLine]) -> String {
        aggregate(lines).to_text()
    }

    #[test]
    fn continuation_joins_previous_item() {
        let lines = [
            RequirementLine::numbered("Первое требование"),
            RequirementLine::continuation("и уточнение."),
        ];
        assert_eq!(text_of(&lines), "1. Первое требование и уточнение.");
    }

    #[test]
    fn new_items_are_numbered_contiguously() {
        let lines = [
            RequirementLine::numbered("*Размеры для справок."),
            RequirementLine::continuation(""),
            RequirementLine::numbered("Неуказанные предельные отклонения размеров: H14, h14,"),
            RequirementLine::continuation("±IT14/2."),
            RequirementLine::numbered("Острые кромки притупить."),
        ];
        assert_eq!(
            text_of(&lines),
            "1. *Размеры для справок.\n\
             2. Неуказанные предельные отклонения размеров: H14, h14, ±IT14/2.\n\
             3. Острые кромки притупить."
        );
    }

    #[test]
    fn hyphen_boundaries_are_not_padded() {
        let lines = [
            RequirementLine::numbered("Покрытие Хим. Окс. прм -"),
            RequirementLine::continuation("по ГОСТ 9.306."),
            RequirementLine::numbered("Допуск"),
            RequirementLine::continuation("-0,1 мм."),
        ];
        assert_eq!(
            text_of(&lines),
            "1. Покрытие Хим. Окс. прм -по ГОСТ 9.306.\n2. Допуск-0,1 мм."
        );
    }

    #[test]
    fn orphan_continuation_starts_a_requirement() {
        let lines = [
            RequirementLine::continuation("без номера"),
            RequirementLine::continuation("и продолжение."),
            RequirementLine::numbered("Второе."),
        ];
        let aggregated = aggregate(&lines);
        assert_eq!(aggregated.len(), 2);
        assert_eq!(aggregated.to_text(), "1. без номера и продолжение.\n2. Второе.");
    }

    #[test]
    fn blank_lines_only_yield_nothing() {
        let lines = [
            RequirementLine::numbered("   "),
            RequirementLine::continuation(""),
        ];
        let aggregated = aggregate(&lines);
        assert!(aggregated.is_empty());
        assert_eq!(aggregated.to_text(), "");
    }

    #[test]
    fn aggregation_is_deterministic() {
        let lines = [
            RequirementLine::numbered("Первое."),
            RequirementLine::continuation("уточнение"),
            RequirementLine::numbered("Второе."),
        ];
        assert_eq!(text_of(&lines), text_of(&lines));
    }

    #[test]
    fn ordinals_are_exposed() {
        let lines = [RequirementLine::numbered("А."), RequirementLine::numbered("Б.")];
        let ordinals: Vec<_> = aggregate(&lines).iter().map(|r| r.ordinal().get()).collect();
        assert_eq!(ordinals, [1, 2]);
    }
}

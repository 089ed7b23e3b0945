//! Reusable requirement texts, grouped by category.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::numbering::clean_line;

/// A reusable requirement text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Template {
    /// A fixed text.
    Plain(String),
    /// A text with alternative wordings.
    WithVariants {
        /// The default wording.
        text: String,
        /// Alternative wordings, selectable by index.
        #[serde(default)]
        variants: Vec<String>,
    },
}

impl Template {
    /// The default wording.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Plain(text) | Self::WithVariants { text, .. } => text,
        }
    }

    /// The alternative wordings.
    #[must_use]
    pub fn variants(&self) -> &[String] {
        match self {
            Self::Plain(_) => &[],
            Self::WithVariants { variants, .. } => variants,
        }
    }

    /// Picks the default wording or, given an index, one of the variants.
    ///
    /// # Errors
    ///
    /// Returns an error if the variant index is out of range.
    pub fn wording(&self, variant: Option<usize>) -> Result<&str, TemplateError> {
        match variant {
            None => Ok(self.text()),
            Some(index) => self
                .variants()
                .get(index)
                .map(String::as_str)
                .ok_or(TemplateError::NoSuchVariant {
                    index,
                    available: self.variants().len(),
                }),
        }
    }

    fn mentions(&self, lowered_query: &str) -> bool {
        std::iter::once(self.text())
            .chain(self.variants().iter().map(String::as_str))
            .any(|text| clean_line(text).to_lowercase().contains(lowered_query))
    }
}

/// Errors raised when looking up templates.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TemplateError {
    /// No category with the given name.
    #[error("unknown template category '{0}'")]
    UnknownCategory(String),

    /// The category has no template at the given position.
    #[error("category '{category}' has no template #{index}")]
    NoSuchTemplate {
        /// The category searched.
        category: String,
        /// The requested position.
        index: usize,
    },

    /// The template has no variant at the given position.
    #[error("template has no variant #{index} ({available} available)")]
    NoSuchVariant {
        /// The requested position.
        index: usize,
        /// How many variants the template has.
        available: usize,
    },
}

/// A template found by [`Templates::search`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateHit<'a> {
    /// The category the template belongs to.
    pub category: &'a str,
    /// Position of the template within its category.
    pub index: usize,
    /// The template.
    pub template: &'a Template,
}

/// Templates grouped by category name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Templates(BTreeMap<String, Vec<Template>>);

impl Default for Templates {
    fn default() -> Self {
        Self(BTreeMap::from([("Общие".to_string(), Vec::new())]))
    }
}

impl Templates {
    /// Total number of templates across all categories.
    #[must_use]
    pub fn count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    /// Category names, in sorted order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Finds templates whose text or category name contains `query`,
    /// ignoring case. An empty query matches everything.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<TemplateHit<'_>> {
        let query = query.trim().to_lowercase();
        let query = query.as_str();
        self.0
            .iter()
            .flat_map(|(category, templates)| {
                let category_matches = category.to_lowercase().contains(query);
                templates
                    .iter()
                    .enumerate()
                    .filter(move |(_, template)| category_matches || template.mentions(query))
                    .map(move |(index, template)| TemplateHit {
                        category,
                        index,
                        template,
                    })
            })
            .collect()
    }

    /// Looks up a template by category and position.
    ///
    /// # Errors
    ///
    /// Returns an error if the category or position does not exist.
    pub fn get(&self, category: &str, index: usize) -> Result<&Template, TemplateError> {
        self.0
            .get(category)
            .ok_or_else(|| TemplateError::UnknownCategory(category.to_string()))?
            .get(index)
            .ok_or_else(|| TemplateError::NoSuchTemplate {
                category: category.to_string(),
                index,
            })
    }

    /// Adds a template, creating the category if needed.
    pub fn add(&mut self, category: impl Into<String>, template: Template) {
        self.0.entry(category.into()).or_default().push(template);
    }

    /// Removes a template by category and position.
    ///
    /// # Errors
    ///
    /// Returns an error if the category or position does not exist.
    pub fn remove(&mut self, category: &str, index: usize) -> Result<Template, TemplateError> {
        let templates = self
            .0
            .get_mut(category)
            .ok_or_else(|| TemplateError::UnknownCategory(category.to_string()))?;
        if index < templates.len() {
            Ok(templates.remove(index))
        } else {
            Err(TemplateError::NoSuchTemplate {
                category: category.to_string(),
                index,
            })
        }
    }
}

/// Appends a template wording to the editor text as a new line.
pub fn insert(buffer: &mut String, wording: &str) {
    if !buffer.is_empty() && !buffer.ends_with('\n') {
        buffer.push('\n');
    }
    buffer.push_str(wording);
    buffer.push('\n');
}

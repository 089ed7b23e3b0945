//! Topic categories of technical requirements.
//!
//! Requirements on a drawing are expected to follow a conventional order
//! (material first, then dimensions, surfaces, assembly, testing, marking…).
//! Each line is assigned the first category whose keyword occurs in it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The number of category slots.
pub const CATEGORY_COUNT: usize = 14;

/// A named topic and the keywords that identify it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Display name of the category.
    pub name: String,
    /// Keywords matched case-insensitively as substrings of a line.
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl Category {
    fn new(name: &str, keywords: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            keywords: keywords.iter().map(ToString::to_string).collect(),
        }
    }

    /// Keywords match as written, surrounding spaces included.
    fn matches(&self, lowered_line: &str) -> bool {
        self.keywords
            .iter()
            .filter(|keyword| !keyword.trim().is_empty())
            .any(|keyword| lowered_line.contains(&keyword.to_lowercase()))
    }
}

/// Position of a category in the canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CategoryIndex(usize);

impl CategoryIndex {
    /// The category assigned to lines that match no keyword.
    pub const FALLBACK: Self = Self(0);

    /// The zero-based position.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for CategoryIndex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a rule set does not have exactly [`CATEGORY_COUNT`]
/// categories.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("expected 14 categories, found {0}")]
pub struct CategoryCountError(usize);

/// The ordered set of categories used to check requirement order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Category>", into = "Vec<Category>")]
pub struct ClassificationRules {
    categories: Vec<Category>,
}

impl ClassificationRules {
    /// Builds a rule set from categories in canonical order.
    ///
    /// # Errors
    ///
    /// Returns an error unless exactly [`CATEGORY_COUNT`] categories are given.
    pub fn new(categories: Vec<Category>) -> Result<Self, CategoryCountError> {
        if categories.len() == CATEGORY_COUNT {
            Ok(Self { categories })
        } else {
            Err(CategoryCountError(categories.len()))
        }
    }

    /// Assigns a line to the first category with a matching keyword.
    ///
    /// Lines matching nothing fall back to the first category.
    #[must_use]
    pub fn classify(&self, line: &str) -> CategoryIndex {
        let lowered = line.to_lowercase();
        self.categories
            .iter()
            .position(|category| category.matches(&lowered))
            .map_or(CategoryIndex::FALLBACK, CategoryIndex)
    }

    /// The category at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` did not come from this rule set.
    #[must_use]
    pub fn category(&self, index: CategoryIndex) -> &Category {
        &self.categories[index.0]
    }

    /// The categories in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (CategoryIndex, &Category)> {
        self.categories
            .iter()
            .enumerate()
            .map(|(i, category)| (CategoryIndex(i), category))
    }

    /// Mutable access to the keywords of a category, looked up by name.
    pub fn keywords_mut(&mut self, name: &str) -> Option<&mut Vec<String>> {
        self.categories
            .iter_mut()
            .find(|category| category.name == name)
            .map(|category| &mut category.keywords)
    }
}

impl TryFrom<Vec<Category>> for ClassificationRules {
    type Error = CategoryCountError;

    fn try_from(categories: Vec<Category>) -> Result<Self, Self::Error> {
        Self::new(categories)
    }
}

impl From<ClassificationRules> for Vec<Category> {
    fn from(rules: ClassificationRules) -> Self {
        rules.categories
    }
}

impl Default for ClassificationRules {
    fn default() -> Self {
        let categories = vec![
            Category::new("Общие указания", &["*размер", "для справок"]),
            Category::new("Материал", &["материал", "заготовк", "сталь", "прокат", "отливк"]),
            Category::new(
                "Термическая обработка",
                &["hrc", "hb ", "твердост", "закалк", "цементац", "отпуск", "термообработ"],
            ),
            Category::new(
                "Размеры и отклонения",
                &["предельные отклонения", "допуск", "it14", "неуказанн", "размер"],
            ),
            Category::new(
                "Форма и расположение",
                &["радиус", "уклон", "отклонение формы", "несоосност", "биени", "неплоскостност"],
            ),
            Category::new("Кромки и поверхности", &["кромк", "заусен", "шероховат", "ra "]),
            Category::new("Покрытие", &["покрыти", "окрас", "эмаль", "грунт", "хим.", "цинк"]),
            Category::new("Сварка", &["свар", "шов", "швы", "электрод"]),
            Category::new("Сборка", &["сборк", "зазор", "затяж", "момент", "посадк"]),
            Category::new("Настройка и регулировка", &["регулир", "настро", "баланс"]),
            Category::new(
                "Испытания",
                &["испыт", "герметич", "давлени", "контрол", "проверк"],
            ),
            Category::new("Маркировка", &["маркир", "клейм", "обозначени"]),
            Category::new(
                "Транспортирование и хранение",
                &["упаков", "транспорт", "хранени", "консерв"],
            ),
            Category::new("Ссылки на документы", &["гост", "ост ", "ту ", "стп", "по документ"]),
        ];
        Self { categories }
    }
}

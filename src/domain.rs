//! Domain models for technical requirements.
//!
//! Everything in this module is a pure text transform: it never talks to a
//! drawing, and the same input always produces the same output.

/// Native lines, assembled requirements and editor lines.
pub mod line;
pub use line::{EditableLine, ProcessedLine, Requirement, RequirementLine};

pub mod classify;

/// Native lines to editor text.
pub mod aggregate;
pub use aggregate::{Aggregated, aggregate};

/// Editor text to native lines.
pub mod split;
pub use split::{NumberingMode, split};

pub mod category;
pub use category::{Category, CategoryIndex, ClassificationRules};

pub mod check;
pub use check::{CheckOutcome, CheckReport, Violation, check};

pub mod numbering;

pub mod template;
pub use template::{Template, TemplateError, Templates};

mod settings;
pub use settings::{Settings, SettingsError};

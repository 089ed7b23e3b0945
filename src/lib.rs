//! Technical Requirements (ТТ) for CAD drawings
//!
//! The technical requirements of a drawing are a numbered list of notes held
//! in a technical-demand block, one native line at a time. This crate turns
//! those lines into editable text and back, checks the order and punctuation
//! of the notes, and manages reusable note templates.

pub mod domain;
pub use domain::{
    Aggregated, CheckOutcome, ClassificationRules, NumberingMode, ProcessedLine, Requirement,
    RequirementLine, Settings, Templates,
};

/// Access to drawings through a technical-demand port.
pub mod storage;
pub use storage::{DocumentFile, MemoryDocument, PortError, TechnicalDemandPort};

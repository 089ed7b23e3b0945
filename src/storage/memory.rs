use std::collections::BTreeSet;

use super::port::{PortError, TechnicalDemandPort};
use crate::domain::{ProcessedLine, RequirementLine};

/// A technical-demand block held in memory.
///
/// Useful for embedding and for tests: individual line texts can be made to
/// fail on write, and the whole document can be made unavailable.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    name: String,
    created: bool,
    available: bool,
    lines: Vec<RequirementLine>,
    failing: BTreeSet<String>,
    commits: usize,
}

impl MemoryDocument {
    /// A drawing without a technical-demand block.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            available: true,
            ..Self::default()
        }
    }

    /// A drawing whose technical-demand block holds `lines`.
    #[must_use]
    pub fn with_lines(name: impl Into<String>, lines: Vec<RequirementLine>) -> Self {
        Self {
            created: true,
            lines,
            ..Self::new(name)
        }
    }

    /// Makes every call fail as if the drawing had been closed.
    #[must_use]
    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    /// Makes writing a line with exactly this text fail.
    #[must_use]
    pub fn failing_on(mut self, text: impl Into<String>) -> Self {
        self.failing.insert(text.into());
        self
    }

    /// The native lines currently held.
    #[must_use]
    pub fn lines(&self) -> &[RequirementLine] {
        &self.lines
    }

    /// How many times changes were committed.
    #[must_use]
    pub const fn commits(&self) -> usize {
        self.commits
    }

    fn ensure_available(&self) -> Result<(), PortError> {
        if self.available {
            Ok(())
        } else {
            Err(PortError::Unavailable(format!("{} is closed", self.name)))
        }
    }
}

impl TechnicalDemandPort for MemoryDocument {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn is_created(&self) -> Result<bool, PortError> {
        self.ensure_available()?;
        Ok(self.created)
    }

    fn create(&mut self) -> Result<(), PortError> {
        self.ensure_available()?;
        self.created = true;
        Ok(())
    }

    fn read(&self) -> Result<Vec<RequirementLine>, PortError> {
        self.ensure_available()?;
        Ok(self.lines.clone())
    }

    fn clear(&mut self) -> Result<(), PortError> {
        self.ensure_available()?;
        self.lines.clear();
        Ok(())
    }

    fn append(&mut self, line: &ProcessedLine) -> Result<(), PortError> {
        self.ensure_available()?;
        if self.failing.contains(&line.text) {
            return Err(PortError::Automation(format!(
                "failed to set line text (0x80020009): {}",
                line.text
            )));
        }
        self.lines.push(line.clone().into());
        Ok(())
    }

    fn commit(&mut self) -> Result<(), PortError> {
        self.ensure_available()?;
        self.commits += 1;
        Ok(())
    }
}

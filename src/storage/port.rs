//! The boundary to a drawing's technical-demand block.
//!
//! A drawing is reached through whatever automation bridge the host CAD
//! application offers. That bridge is wrapped once behind
//! [`TechnicalDemandPort`]; nothing else in the crate knows how the host is
//! reached or which calls it supports.

use std::{io, sync::LazyLock};

use regex::Regex;

use crate::domain::{ProcessedLine, RequirementLine};

/// Access to the technical-demand block of one drawing.
pub trait TechnicalDemandPort {
    /// A name for the drawing, used in messages.
    fn name(&self) -> String;

    /// Whether the drawing has a technical-demand block.
    ///
    /// # Errors
    ///
    /// Returns an error if the drawing cannot be queried.
    fn is_created(&self) -> Result<bool, PortError>;

    /// Creates an empty technical-demand block.
    ///
    /// # Errors
    ///
    /// Returns an error if the block cannot be created.
    fn create(&mut self) -> Result<(), PortError>;

    /// Reads every native line of the block, in order.
    ///
    /// # Errors
    ///
    /// Returns an error if the block cannot be read.
    fn read(&self) -> Result<Vec<RequirementLine>, PortError>;

    /// Deletes every native line of the block.
    ///
    /// # Errors
    ///
    /// Returns an error if the lines cannot be deleted.
    fn clear(&mut self) -> Result<(), PortError>;

    /// Appends one native line, setting its numbering flag.
    ///
    /// # Errors
    ///
    /// Returns an error if this line cannot be written.
    fn append(&mut self, line: &ProcessedLine) -> Result<(), PortError>;

    /// Makes pending changes visible in the drawing.
    ///
    /// # Errors
    ///
    /// Returns an error if the drawing cannot be updated.
    fn commit(&mut self) -> Result<(), PortError>;

    /// Replaces the block's lines with `lines`.
    ///
    /// Lines are written one at a time; a line that fails is recorded and the
    /// remaining lines are still written.
    ///
    /// # Errors
    ///
    /// Returns an error if the existing lines cannot be cleared.
    fn write(&mut self, lines: &[ProcessedLine]) -> Result<Vec<LineFailure>, PortError> {
        self.clear()?;
        let mut failures = Vec::new();
        for (i, line) in lines.iter().enumerate() {
            if let Err(error) = self.append(line) {
                tracing::warn!(line = i + 1, text = %line.text, %error, "failed to write line");
                failures.push(LineFailure {
                    line: i + 1,
                    text: line.text.clone(),
                    error,
                });
            }
        }
        Ok(failures)
    }
}

/// A line that could not be written.
#[derive(Debug)]
pub struct LineFailure {
    /// 1-based position of the line among the lines written.
    pub line: usize,
    /// The text of the line.
    pub text: String,
    /// Why the line could not be written.
    pub error: PortError,
}

/// Errors raised by a [`TechnicalDemandPort`].
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// No drawing is open, or the host cannot be reached.
    #[error("document is not available: {0}")]
    Unavailable(String),

    /// A call into the host's automation interface failed.
    #[error("automation call failed: {0}")]
    Automation(String),

    /// The document file could not be read or written.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The document file is not valid.
    #[error("invalid document file: {0}")]
    Format(#[from] serde_json::Error),
}

static HRESULT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"0x[0-9A-Fa-f]+").expect("HRESULT pattern is valid"));

impl PortError {
    /// The `0x…` status code reported by the host, if any.
    #[must_use]
    pub fn code(&self) -> Option<String> {
        let Self::Automation(message) = self else {
            return None;
        };
        HRESULT
            .find(message)
            .map(|code| format!("0x{}", code.as_str()[2..].to_uppercase()))
    }

    /// A hint for well-known host status codes.
    #[must_use]
    pub fn hint(&self) -> Option<&'static str> {
        let hint = match self.code()?.as_str() {
            "0x80004005" => "unspecified error; the object may not be accessible",
            "0x80020009" => "the CAD host raised an exception; check the state of the document",
            "0x8002000A" => "invalid index or parameter",
            "0x80020006" => "unknown name or method",
            _ => return None,
        };
        Some(hint)
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("(-2147467259, 'Unspecified error', 0x80004005)", Some("0x80004005"); "embedded in a tuple")]
    #[test_case("Exception occurred 0x8002000a", Some("0x8002000A"); "normalised")]
    #[test_case("no code here", None; "no code")]
    fn codes_are_extracted(message: &str, expected: Option<&str>) {
        let error = PortError::Automation(message.to_string());
        assert_eq!(error.code().as_deref(), expected);
    }

    #[test]
    fn known_codes_have_hints() {
        let error = PortError::Automation("call failed: 0x80020006".to_string());
        assert_eq!(error.hint(), Some("unknown name or method"));

        let unknown = PortError::Automation("call failed: 0x80070005".to_string());
        assert_eq!(unknown.hint(), None);
    }

    #[test]
    fn only_automation_errors_carry_codes() {
        let error = PortError::Unavailable("0x80004005".to_string());
        assert_eq!(error.code(), None);
    }
}

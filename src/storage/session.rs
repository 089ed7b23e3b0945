//! Reading and writing technical requirements through a
//! [`TechnicalDemandPort`].

use super::port::{LineFailure, PortError, TechnicalDemandPort};
use crate::domain::{Aggregated, NumberingMode, aggregate, split};

/// Errors raised when fetching requirements from a drawing.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The drawing has no technical-demand block.
    #[error("{0} has no technical requirements")]
    NotCreated(String),

    /// The technical-demand block exists but holds only blank lines.
    #[error("the technical requirements of {0} are empty")]
    Empty(String),

    /// The drawing could not be read.
    #[error(transparent)]
    Port(#[from] PortError),
}

/// Reads the technical-demand block and assembles it into requirements.
///
/// # Errors
///
/// Returns an error if the drawing has no block, the block holds no text, or
/// the drawing cannot be read.
pub fn fetch<P: TechnicalDemandPort + ?Sized>(port: &P) -> Result<Aggregated, FetchError> {
    if !port.is_created()? {
        return Err(FetchError::NotCreated(port.name()));
    }
    let lines = port.read()?;
    let aggregated = aggregate(&lines);
    if aggregated.is_empty() {
        return Err(FetchError::Empty(port.name()));
    }
    tracing::info!(document = %port.name(), lines = lines.len(), "fetched technical requirements");
    Ok(aggregated)
}

/// What [`apply`] did to the drawing.
#[derive(Debug)]
pub enum ApplyOutcome {
    /// The text was empty and the drawing had no block to clear.
    NothingToApply,
    /// The text was empty, so the existing block was emptied.
    Cleared,
    /// Lines were written.
    Written {
        /// How many lines were written successfully.
        written: usize,
        /// Lines that could not be written.
        failures: Vec<LineFailure>,
    },
}

/// Writes editor text into the technical-demand block.
///
/// The block is created if needed and its existing lines are replaced. A line
/// that cannot be written is reported in the outcome and does not stop the
/// others, so the block may end up partially written.
///
/// # Errors
///
/// Returns an error if the drawing cannot be reached, the block cannot be
/// created or cleared, or the changes cannot be committed.
pub fn apply<P: TechnicalDemandPort + ?Sized>(
    port: &mut P,
    buffer: &str,
    mode: NumberingMode,
) -> Result<ApplyOutcome, PortError> {
    let lines = split(buffer, mode);

    if lines.is_empty() {
        if !port.is_created()? {
            return Ok(ApplyOutcome::NothingToApply);
        }
        port.clear()?;
        port.commit()?;
        tracing::info!(document = %port.name(), "cleared technical requirements");
        return Ok(ApplyOutcome::Cleared);
    }

    if !port.is_created()? {
        port.create()?;
    }
    let failures = port.write(&lines)?;
    port.commit()?;

    let written = lines.len() - failures.len();
    tracing::info!(
        document = %port.name(),
        written,
        failed = failures.len(),
        "applied technical requirements"
    );
    Ok(ApplyOutcome::Written { written, failures })
}

/// The state of a drawing, as seen by a periodic probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentStatus {
    /// The drawing could not be reached.
    Unavailable(String),
    /// The drawing has no technical-demand block.
    NoTechnicalDemand {
        /// Name of the drawing.
        name: String,
    },
    /// The drawing has a technical-demand block.
    Ready {
        /// Name of the drawing.
        name: String,
        /// Number of native lines in the block.
        lines: usize,
    },
}

impl DocumentStatus {
    /// The status of a drawing that could not be opened.
    #[must_use]
    pub fn unavailable(error: &PortError) -> Self {
        Self::Unavailable(error.to_string())
    }
}

/// Queries the state of a drawing without failing.
///
/// Any error from the drawing is reported as
/// [`DocumentStatus::Unavailable`]; the next probe simply tries again.
#[must_use]
pub fn probe<P: TechnicalDemandPort + ?Sized>(port: &P) -> DocumentStatus {
    let status = match port.is_created() {
        Ok(false) => Ok(DocumentStatus::NoTechnicalDemand { name: port.name() }),
        Ok(true) => port.read().map(|lines| DocumentStatus::Ready {
            name: port.name(),
            lines: lines.len(),
        }),
        Err(error) => Err(error),
    };
    status.unwrap_or_else(|error| {
        tracing::debug!(%error, "document probe failed");
        DocumentStatus::unavailable(&error)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ProcessedLine, RequirementLine},
        storage::MemoryDocument,
    };

    #[test]
    fn fetch_assembles_requirements() {
        let document = MemoryDocument::with_lines(
            "Вал.cdw",
            vec![
                RequirementLine::numbered("Первое требование"),
                RequirementLine::continuation("и уточнение."),
            ],
        );
        let aggregated = fetch(&document).unwrap();
        assert_eq!(aggregated.to_text(), "1. Первое требование и уточнение.");
    }

    #[test]
    fn blank_only_block_is_empty() {
        let document = MemoryDocument::with_lines(
            "Вал.cdw",
            vec![
                RequirementLine::numbered("  "),
                RequirementLine::continuation(""),
            ],
        );
        assert!(matches!(fetch(&document), Err(FetchError::Empty(_))));
    }

    #[test]
    fn fetch_distinguishes_missing_and_empty_blocks() {
        let missing = MemoryDocument::new("Вал.cdw");
        assert!(matches!(fetch(&missing), Err(FetchError::NotCreated(_))));

        let empty = MemoryDocument::with_lines("Вал.cdw", Vec::new());
        assert!(matches!(fetch(&empty), Err(FetchError::Empty(_))));

        let closed = MemoryDocument::with_lines("Вал.cdw", Vec::new()).unavailable();
        assert!(matches!(
            fetch(&closed),
            Err(FetchError::Port(PortError::Unavailable(_)))
        ));
    }

    #[test]
    fn apply_replaces_existing_lines() {
        let mut document =
            MemoryDocument::with_lines("Вал.cdw", vec![RequirementLine::numbered("Старое.")]);

        let outcome = apply(
            &mut document,
            "1. Первое.\n    уточнение\n2. Второе.",
            NumberingMode::Manual,
        )
        .unwrap();

        assert!(matches!(
            outcome,
            ApplyOutcome::Written { written: 3, ref failures } if failures.is_empty()
        ));
        assert_eq!(
            document.lines(),
            [
                RequirementLine::numbered("Первое."),
                RequirementLine::continuation("уточнение"),
                RequirementLine::numbered("Второе."),
            ]
        );
        assert_eq!(document.commits(), 1);
    }

    #[test]
    fn apply_creates_a_missing_block() {
        let mut document = MemoryDocument::new("Вал.cdw");
        apply(&mut document, "Единственное требование.", NumberingMode::Auto).unwrap();

        assert!(document.is_created().unwrap());
        assert_eq!(
            document.lines(),
            [RequirementLine::continuation("Единственное требование.")]
        );
    }

    #[test]
    fn failed_lines_do_not_stop_the_rest() {
        let mut document = MemoryDocument::new("Вал.cdw").failing_on("Второе.");

        let outcome = apply(
            &mut document,
            "Первое.\nВторое.\nТретье.",
            NumberingMode::Auto,
        )
        .unwrap();

        let ApplyOutcome::Written { written, failures } = outcome else {
            panic!("expected lines to be written");
        };
        assert_eq!(written, 2);
        assert_eq!(failures.len(), 1);
        assert_eq!((failures[0].line, failures[0].text.as_str()), (2, "Второе."));
        assert_eq!(failures[0].error.code().as_deref(), Some("0x80020009"));
        assert_eq!(
            document.lines(),
            [
                RequirementLine::numbered("Первое."),
                RequirementLine::numbered("Третье."),
            ]
        );
    }

    #[test]
    fn empty_text_clears_or_does_nothing() {
        let mut existing =
            MemoryDocument::with_lines("Вал.cdw", vec![RequirementLine::numbered("Старое.")]);
        assert!(matches!(
            apply(&mut existing, "  \n", NumberingMode::Manual).unwrap(),
            ApplyOutcome::Cleared
        ));
        assert!(existing.lines().is_empty());

        let mut missing = MemoryDocument::new("Вал.cdw");
        assert!(matches!(
            apply(&mut missing, "", NumberingMode::Manual).unwrap(),
            ApplyOutcome::NothingToApply
        ));
        assert!(!missing.is_created().unwrap());
        assert_eq!(missing.commits(), 0);
    }

    #[test]
    fn apply_to_a_closed_document_fails_as_a_whole() {
        let mut document = MemoryDocument::new("Вал.cdw").unavailable();
        let error = apply(&mut document, "Первое.", NumberingMode::Manual).unwrap_err();
        assert!(matches!(error, PortError::Unavailable(_)));
    }

    #[test]
    fn probe_reports_every_state() {
        assert_eq!(
            probe(&MemoryDocument::new("Вал.cdw")),
            DocumentStatus::NoTechnicalDemand {
                name: "Вал.cdw".to_string()
            }
        );
        assert_eq!(
            probe(&MemoryDocument::with_lines(
                "Вал.cdw",
                vec![RequirementLine::numbered("Первое.")]
            )),
            DocumentStatus::Ready {
                name: "Вал.cdw".to_string(),
                lines: 1
            }
        );
        assert!(matches!(
            probe(&MemoryDocument::new("Вал.cdw").unavailable()),
            DocumentStatus::Unavailable(_)
        ));
    }

    #[test]
    fn write_reports_failures_per_line() {
        let mut document = MemoryDocument::new("Вал.cdw").failing_on("б");
        let failures = document
            .write(&[ProcessedLine::new("а", true), ProcessedLine::new("б", false)])
            .unwrap();
        assert_eq!(failures.len(), 1);
        assert_eq!(document.lines().len(), 1);
    }
}

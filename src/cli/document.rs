use std::{path::PathBuf, process};

use anyhow::Context;
use clap::Parser;
use techreq::{
    NumberingMode, PortError, TechnicalDemandPort,
    storage::{self, ApplyOutcome, DocumentStatus, FetchError},
};
use tracing::instrument;

use super::{Globals, read_buffer, settings_path, terminal::Colorize};

/// Renders a port error with the host's status code and a hint, when known.
fn describe(error: &PortError, operation: &str) -> String {
    let mut message = format!("failed to {operation}: {error}");
    if let Some(code) = error.code() {
        message.push_str(&format!("\n\nerror code: {code}"));
        if let Some(hint) = error.hint() {
            message.push_str(&format!(" ({hint})"));
        }
        message.push_str(
            "\n\nMake sure the CAD application is running, that the drawing can be edited, \
             and try reconnecting.",
        );
    }
    message
}

#[derive(Debug, Parser, Default)]
pub struct Status {
    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Status {
    #[instrument(level = "debug", skip(globals))]
    pub fn run(self, globals: &Globals) -> anyhow::Result<()> {
        let settings = globals.settings()?;
        let status = globals.document.as_ref().map(|path| {
            storage::DocumentFile::open(path).map_or_else(
                |error| DocumentStatus::unavailable(&error),
                |document| storage::probe(&document),
            )
        });

        match self.output {
            OutputFormat::Json => {
                use serde_json::json;

                let document = status.map(|status| match status {
                    DocumentStatus::Unavailable(reason) => {
                        json!({ "state": "unavailable", "reason": reason })
                    }
                    DocumentStatus::NoTechnicalDemand { name } => {
                        json!({ "state": "no_technical_demand", "name": name })
                    }
                    DocumentStatus::Ready { name, lines } => {
                        json!({ "state": "ready", "name": name, "lines": lines })
                    }
                });
                let output = json!({
                    "settings": settings_path(&globals.root),
                    "numbering": settings.numbering_mode(),
                    "templates": settings.templates.count(),
                    "document": document,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Table => {
                println!("Settings:   {}", settings_path(&globals.root).display());
                println!(
                    "Numbering:  {}",
                    match settings.numbering_mode() {
                        NumberingMode::Auto => "automatic",
                        NumberingMode::Manual => "manual",
                    }
                );
                println!("Templates:  {}", settings.templates.count());
                match status {
                    None => println!("Document:   {}", "none (pass --document <FILE>)".dim()),
                    Some(DocumentStatus::Unavailable(reason)) => {
                        println!("Document:   {}", reason.warning());
                    }
                    Some(DocumentStatus::NoTechnicalDemand { name }) => {
                        println!("Document:   {name} {}", "(no technical requirements)".dim());
                    }
                    Some(DocumentStatus::Ready { name, lines }) => {
                        println!("Document:   {name} ({lines} lines of technical requirements)");
                    }
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug, Parser)]
pub struct Fetch {
    /// Write the text to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl Fetch {
    #[instrument(level = "debug", skip(globals))]
    pub fn run(self, globals: &Globals) -> anyhow::Result<()> {
        let document = globals.open_document()?;

        let aggregated = match storage::fetch(&document) {
            Ok(aggregated) => aggregated,
            Err(FetchError::Port(error)) => {
                anyhow::bail!(describe(&error, "read the technical requirements"))
            }
            Err(error @ (FetchError::NotCreated(_) | FetchError::Empty(_))) => {
                eprintln!("{}", error.to_string().warning());
                process::exit(1);
            }
        };

        let text = aggregated.to_text();
        match &self.output {
            Some(path) => {
                std::fs::write(path, format!("{text}\n"))
                    .with_context(|| format!("failed to write {}", path.display()))?;
                println!(
                    "{}",
                    format!(
                        "Fetched {} requirements from {} into {}",
                        aggregated.len(),
                        document.name(),
                        path.display()
                    )
                    .success()
                );
            }
            None => println!("{text}"),
        }
        Ok(())
    }
}

#[derive(Debug, Parser)]
pub struct Apply {
    /// File holding the edited text (stdin if omitted or '-')
    input: Option<PathBuf>,

    /// Derive numbering from line content, ignoring typed numbers
    #[arg(long, conflicts_with = "manual_numbering")]
    auto_numbering: bool,

    /// Take numbering from typed numbers and indentation
    #[arg(long)]
    manual_numbering: bool,

    /// Replace existing requirements without asking
    #[arg(long, short)]
    yes: bool,
}

impl Apply {
    fn mode(&self, globals: &Globals) -> anyhow::Result<NumberingMode> {
        Ok(if self.auto_numbering {
            NumberingMode::Auto
        } else if self.manual_numbering {
            NumberingMode::Manual
        } else {
            globals.settings()?.numbering_mode()
        })
    }

    fn confirm(&self, document: &storage::DocumentFile) -> anyhow::Result<bool> {
        let existing = document.read()?.len();
        if self.yes || existing == 0 || self.input.is_none() {
            return Ok(true);
        }
        Ok(dialoguer::Confirm::new()
            .with_prompt(format!(
                "Replace {existing} existing lines in {}?",
                document.name()
            ))
            .default(false)
            .interact()?)
    }

    #[instrument(level = "debug", skip(globals))]
    pub fn run(self, globals: &Globals) -> anyhow::Result<()> {
        let mode = self.mode(globals)?;
        let buffer = read_buffer(self.input.as_deref())?;
        let mut document = globals.open_document()?;

        if !self.confirm(&document)? {
            println!("Cancelled");
            process::exit(130);
        }

        let outcome = storage::apply(&mut document, &buffer, mode).map_err(|error| {
            anyhow::anyhow!(describe(&error, "apply the technical requirements"))
        })?;

        match outcome {
            ApplyOutcome::NothingToApply => {
                println!("{}", "No technical requirements to apply".dim());
            }
            ApplyOutcome::Cleared => {
                println!(
                    "{}",
                    format!("Cleared the technical requirements of {}", document.name()).success()
                );
            }
            ApplyOutcome::Written { written, failures } => {
                if failures.is_empty() {
                    println!(
                        "{}",
                        format!("Applied {written} lines to {}", document.name()).success()
                    );
                } else {
                    for failure in &failures {
                        eprintln!(
                            "{}",
                            format!(
                                "✗ line {} '{}': {}",
                                failure.line, failure.text, failure.error
                            )
                            .error()
                        );
                    }
                    println!(
                        "{}",
                        format!(
                            "Applied {written} lines to {}, {} failed",
                            document.name(),
                            failures.len()
                        )
                        .warning()
                    );
                    process::exit(2);
                }
            }
        }
        Ok(())
    }
}

use std::{path::PathBuf, process};

use clap::Parser;
use techreq::{
    CheckOutcome, TechnicalDemandPort,
    domain::{CheckReport, check},
};
use tracing::instrument;

use super::{Globals, read_buffer, terminal::Colorize};

#[derive(Debug, Parser)]
#[command(about = "Check the order and punctuation of technical requirements")]
pub struct Check {
    /// File holding the text to check (stdin if omitted or '-')
    input: Option<PathBuf>,

    /// Check the document's technical requirements instead of a text file
    #[arg(long, conflicts_with = "input")]
    from_document: bool,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Suppress all output except the exit code
    #[arg(long, short)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Check {
    fn buffer(&self, globals: &Globals) -> anyhow::Result<String> {
        if self.from_document {
            let document = globals.open_document()?;
            tracing::debug!(document = %document.name(), "checking document requirements");
            Ok(techreq::storage::fetch(&document)?.to_text())
        } else {
            read_buffer(self.input.as_deref())
        }
    }

    #[instrument(level = "debug", skip(globals))]
    pub fn run(self, globals: &Globals) -> anyhow::Result<()> {
        let settings = globals.settings()?;
        let buffer = self.buffer(globals)?;
        let outcome = check(&buffer, &settings.rules);

        if !self.quiet {
            match self.output {
                OutputFormat::Table => Self::output_table(&outcome),
                OutputFormat::Json => Self::output_json(&outcome)?,
            }
        }

        // Findings are reported, never applied; the exit code flags them.
        if outcome.is_failed() {
            process::exit(2);
        }
        Ok(())
    }

    fn output_table(outcome: &CheckOutcome) {
        match outcome {
            CheckOutcome::Empty => println!("{}", "Nothing to check".dim()),
            CheckOutcome::Passed => {
                println!("{}", "✓ Technical requirements are in order".success());
            }
            CheckOutcome::Failed(report) => Self::output_report(report),
        }
    }

    fn output_report(report: &CheckReport) {
        let count = report.violations().count();
        println!("{}", format!("✗ {count} issues found").warning());
        for violation in report.violations() {
            println!("  • {}", violation.to_string().error());
        }
        println!("\n{}", "Suggested text:".dim());
        for line in report.corrected().lines() {
            println!("  {line}");
        }
    }

    fn output_json(outcome: &CheckOutcome) -> anyhow::Result<()> {
        use serde_json::json;

        let output = match outcome {
            CheckOutcome::Empty => json!({ "status": "empty" }),
            CheckOutcome::Passed => json!({ "status": "passed" }),
            CheckOutcome::Failed(report) => json!({
                "status": "failed",
                "violations": report.violations().collect::<Vec<_>>(),
                "corrected": report.corrected(),
            }),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }
}

use std::{
    io::{self, Read},
    path::{Path, PathBuf},
};

mod check;
mod config;
mod document;
mod number;
mod template;
mod terminal;

use anyhow::Context;
use clap::ArgAction;
use techreq::{DocumentFile, Settings};
use tracing::instrument;

use check::Check;
use document::{Apply, Fetch, Status};
use number::Number;
use terminal::Colorize;

/// Location of the settings file, relative to the root.
const SETTINGS_PATH: &str = ".tt/settings.toml";

fn settings_path(root: &Path) -> PathBuf {
    root.join(SETTINGS_PATH)
}

fn load_settings(root: &Path) -> anyhow::Result<Settings> {
    let path = settings_path(root);
    Settings::load_or_default(&path).with_context(|| format!("loading {}", path.display()))
}

/// Reads editor text from a file, or from stdin when no file (or `-`) is given.
fn read_buffer(input: Option<&Path>) -> anyhow::Result<String> {
    match input {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            Ok(buffer)
        }
    }
}

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The directory holding the `.tt` settings folder
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    /// The drawing's document file
    #[arg(short, long, global = true)]
    document: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let globals = Globals {
            root: self.root,
            document: self.document,
        };
        self.command
            .unwrap_or_else(|| Command::Status(Status::default()))
            .run(&globals)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

/// Global options shared by every command.
#[derive(Debug)]
pub struct Globals {
    root: PathBuf,
    document: Option<PathBuf>,
}

impl Globals {
    fn settings(&self) -> anyhow::Result<Settings> {
        load_settings(&self.root)
    }

    fn document_path(&self) -> anyhow::Result<&Path> {
        self.document
            .as_deref()
            .context("no document given; pass --document <FILE>")
    }

    fn open_document(&self) -> anyhow::Result<DocumentFile> {
        Ok(DocumentFile::open(self.document_path()?)?)
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Show the settings and the state of the document (default)
    Status(Status),

    /// Write default settings, and optionally an empty document file
    Init(Init),

    /// Read the technical requirements of the document as editable text
    Fetch(Fetch),

    /// Write edited text into the technical requirements of the document
    Apply(Apply),

    /// Check the order and punctuation of technical requirements
    Check(Check),

    /// Number the editor text, or remove its numbering
    Number(Number),

    /// Browse, insert and manage requirement templates
    Template(template::Command),

    /// Show or modify settings
    Config(config::Command),
}

impl Command {
    fn run(self, globals: &Globals) -> anyhow::Result<()> {
        match self {
            Self::Status(command) => command.run(globals)?,
            Self::Init(command) => command.run(globals)?,
            Self::Fetch(command) => command.run(globals)?,
            Self::Apply(command) => command.run(globals)?,
            Self::Check(command) => command.run(globals)?,
            Self::Number(command) => command.run()?,
            Self::Template(command) => command.run(&globals.root)?,
            Self::Config(command) => command.run(&globals.root)?,
        }
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Init {
    /// Overwrite existing settings
    #[arg(long)]
    force: bool,

    /// Name recorded in a newly created document file (with --document)
    #[arg(long)]
    name: Option<String>,
}

impl Init {
    #[instrument(skip(globals))]
    fn run(self, globals: &Globals) -> anyhow::Result<()> {
        let path = settings_path(&globals.root);
        if path.exists() && !self.force {
            anyhow::bail!(
                "Settings already exist at {} (use --force to overwrite)",
                path.display()
            );
        }

        Settings::default()
            .save(&path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("{}", format!("Created {}", path.display()).success());

        if let Some(document) = &globals.document {
            DocumentFile::create_new(document, self.name)?;
            println!("{}", format!("Created {}", document.display()).success());
        }

        Ok(())
    }
}

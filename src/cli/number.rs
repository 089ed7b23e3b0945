use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use techreq::domain::numbering;
use tracing::instrument;

use super::read_buffer;

#[derive(Debug, Parser)]
pub struct Number {
    /// File holding the editor text (stdin if omitted or '-')
    input: Option<PathBuf>,

    /// Remove `N. ` prefixes instead of numbering
    #[arg(long)]
    remove: bool,

    /// Rewrite the input file instead of printing the result
    #[arg(long, short, requires = "input")]
    in_place: bool,
}

impl Number {
    #[instrument(level = "debug")]
    pub fn run(self) -> anyhow::Result<()> {
        let buffer = read_buffer(self.input.as_deref())?;
        let text = if self.remove {
            numbering::unnumber(&buffer)
        } else {
            numbering::number(&buffer)
        };

        let in_place = self.in_place;
        match self.input.filter(|_| in_place) {
            Some(path) => std::fs::write(&path, format!("{text}\n"))
                .with_context(|| format!("failed to write {}", path.display()))?,
            None => println!("{text}"),
        }
        Ok(())
    }
}

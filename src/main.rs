//! `tt`: edit and check the technical requirements of CAD drawings.

use clap::Parser;

mod cli;
use cli::Cli;

fn main() -> anyhow::Result<()> {
    Cli::parse().run()
}

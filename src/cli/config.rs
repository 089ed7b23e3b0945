use std::path::Path;

use anyhow::Context;
use tracing::instrument;

use super::{load_settings, settings_path, terminal::Colorize};

#[derive(Debug, clap::Parser)]
/// Show or modify settings
///
/// Settings are stored in .tt/settings.toml.
///
/// Available keys:
///   `auto_numbering`  Derive numbering from line content (default: false)
pub struct Command {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Debug, clap::Parser)]
enum ConfigCommand {
    /// Show the settings and the category rules
    Show,

    /// Set a setting
    ///
    /// Example:
    ///   tt config set `auto_numbering` true
    Set {
        /// Setting to change
        key: String,

        /// Value to set
        value: String,
    },

    /// Add or remove a keyword of a category
    Keyword {
        /// The category's name, as shown by 'tt config show'
        category: String,

        /// The keyword
        keyword: String,

        /// Remove the keyword instead of adding it
        #[arg(long)]
        remove: bool,
    },
}

impl Command {
    #[instrument]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        match self.command {
            ConfigCommand::Show => Self::show(root),
            ConfigCommand::Set { key, value } => Self::set(root, &key, &value),
            ConfigCommand::Keyword {
                category,
                keyword,
                remove,
            } => Self::keyword(root, &category, keyword, remove),
        }
    }

    fn show(root: &Path) -> anyhow::Result<()> {
        let settings = load_settings(root)?;

        println!("Settings:");
        println!("  auto_numbering: {}", settings.auto_numbering);
        println!("  templates: {}", settings.templates.count());
        println!("\nCategories (in required order):");
        for (index, category) in settings.rules.iter() {
            println!("  {:>2}. {}", index.get(), category.name);
            if category.keywords.is_empty() {
                println!("      {}", "(no keywords)".dim());
            } else {
                println!("      {}", category.keywords.join(", ").dim());
            }
        }
        Ok(())
    }

    fn set(root: &Path, key: &str, value: &str) -> anyhow::Result<()> {
        let mut settings = load_settings(root)?;

        match key {
            "auto_numbering" => {
                settings.auto_numbering = value.parse().map_err(|_| {
                    anyhow::anyhow!("Invalid value for auto_numbering: '{value}'. Use true or false")
                })?;
            }
            _ => anyhow::bail!("Unknown setting: {key}"),
        }

        Self::save(root, &settings)?;
        println!("{}", format!("✅ Set {key} = {value}").success());
        Ok(())
    }

    fn keyword(root: &Path, category: &str, keyword: String, remove: bool) -> anyhow::Result<()> {
        let mut settings = load_settings(root)?;
        let keywords = settings
            .rules
            .keywords_mut(category)
            .with_context(|| format!("Unknown category: {category}"))?;

        if remove {
            let before = keywords.len();
            keywords.retain(|k| k != &keyword);
            if keywords.len() == before {
                anyhow::bail!("'{category}' has no keyword '{keyword}'");
            }
        } else if keywords.contains(&keyword) {
            println!("{}", format!("'{category}' already has '{keyword}'").dim());
            return Ok(());
        } else {
            keywords.push(keyword);
        }

        Self::save(root, &settings)?;
        println!("{}", format!("✅ Updated keywords of '{category}'").success());
        Ok(())
    }

    fn save(root: &Path, settings: &techreq::Settings) -> anyhow::Result<()> {
        let path = settings_path(root);
        settings
            .save(&path)
            .with_context(|| format!("failed to write {}", path.display()))
    }
}

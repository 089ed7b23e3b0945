use std::path::{Path, PathBuf};

use anyhow::Context;
use techreq::{
    Settings,
    domain::{Template, template},
};
use tracing::instrument;

use super::{load_settings, settings_path, terminal::Colorize};

#[derive(Debug, clap::Parser)]
pub struct Command {
    #[command(subcommand)]
    command: TemplateCommand,
}

#[derive(Debug, clap::Parser)]
enum TemplateCommand {
    /// List every template, grouped by category
    List,

    /// Find templates whose text or category contains a query (case-insensitive)
    Search {
        /// Text to look for
        query: String,
    },

    /// Insert a template into an editor file, or print it
    Insert {
        /// The template's category
        category: String,

        /// The template's position within the category, as listed
        index: usize,

        /// Use one of the template's alternative wordings
        #[arg(long)]
        variant: Option<usize>,

        /// Append the template to this editor file instead of printing it
        #[arg(long)]
        into: Option<PathBuf>,
    },

    /// Add a template
    Add {
        /// The category to add to (created if missing)
        category: String,

        /// The template text
        text: String,

        /// Alternative wordings (can be given multiple times)
        #[arg(long = "variant")]
        variants: Vec<String>,
    },

    /// Remove a template
    Remove {
        /// The template's category
        category: String,

        /// The template's position within the category, as listed
        index: usize,
    },
}

impl Command {
    #[instrument]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let mut settings = load_settings(root)?;

        match self.command {
            TemplateCommand::List => Self::list(&settings),
            TemplateCommand::Search { query } => Self::search(&settings, &query),
            TemplateCommand::Insert {
                category,
                index,
                variant,
                into,
            } => Self::insert(&settings, &category, index, variant, into.as_deref())?,
            TemplateCommand::Add {
                category,
                text,
                variants,
            } => {
                let template = if variants.is_empty() {
                    Template::Plain(text)
                } else {
                    Template::WithVariants { text, variants }
                };
                settings.templates.add(category.clone(), template);
                Self::save(&settings, root)?;
                println!("{}", format!("Added a template to '{category}'").success());
            }
            TemplateCommand::Remove { category, index } => {
                let removed = settings.templates.remove(&category, index)?;
                Self::save(&settings, root)?;
                println!("{}", format!("Removed '{}'", removed.text()).success());
            }
        }
        Ok(())
    }

    fn save(settings: &Settings, root: &Path) -> anyhow::Result<()> {
        let path = settings_path(root);
        settings
            .save(&path)
            .with_context(|| format!("failed to write {}", path.display()))
    }

    fn print(template: &Template, index: usize) {
        println!("  [{index}] {}", template.text());
        for (i, variant) in template.variants().iter().enumerate() {
            println!("      {}", format!("variant {i}: {variant}").dim());
        }
    }

    fn list(settings: &Settings) {
        let templates = &settings.templates;
        println!("{} templates", templates.count());
        for category in templates.categories() {
            println!("\n{category}");
            for hit in templates.search("").iter().filter(|hit| hit.category == category) {
                Self::print(hit.template, hit.index);
            }
        }
    }

    fn search(settings: &Settings, query: &str) {
        let hits = settings.templates.search(query);
        if hits.is_empty() {
            println!("{}", format!("No templates match '{query}'").dim());
            return;
        }
        let mut current = None;
        for hit in &hits {
            if current != Some(hit.category) {
                println!("{}", hit.category);
                current = Some(hit.category);
            }
            Self::print(hit.template, hit.index);
        }
        println!("\n{}", format!("Found {} templates", hits.len()).dim());
    }

    fn insert(
        settings: &Settings,
        category: &str,
        index: usize,
        variant: Option<usize>,
        into: Option<&Path>,
    ) -> anyhow::Result<()> {
        let wording = settings.templates.get(category, index)?.wording(variant)?;

        let Some(path) = into else {
            println!("{wording}");
            return Ok(());
        };

        let mut buffer = match std::fs::read_to_string(path) {
            Ok(buffer) => buffer,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e).with_context(|| format!("failed to read {}", path.display())),
        };
        template::insert(&mut buffer, wording);
        std::fs::write(path, buffer)
            .with_context(|| format!("failed to write {}", path.display()))?;

        let preview: String = wording.chars().take(30).collect();
        println!("{}", format!("Inserted template: {preview}…").success());
        Ok(())
    }
}

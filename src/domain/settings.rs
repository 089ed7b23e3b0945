use std::{io, path::Path};

use serde::{Deserialize, Serialize};

use super::{category::ClassificationRules, split::NumberingMode, template::Templates};

/// User settings for editing technical requirements.
///
/// Holds the numbering mode, the category rules used by the checker and the
/// template library.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Settings {
    /// Whether numbering is derived from line content rather than typed
    /// numbers.
    pub auto_numbering: bool,

    /// The ordered categories used to check requirement order.
    pub rules: ClassificationRules,

    /// Reusable requirement texts.
    pub templates: Templates,
}

/// Errors raised when reading or writing settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The settings file could not be read or written.
    #[error("failed to access settings file: {0}")]
    Io(#[from] io::Error),

    /// The settings file is not valid.
    #[error("failed to parse settings file: {0}")]
    Parse(#[from] toml::de::Error),

    /// The settings could not be serialized.
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl Settings {
    /// Loads the settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Loads the settings, falling back to defaults if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or is not valid.
    pub fn load_or_default(path: &Path) -> Result<Self, SettingsError> {
        match Self::load(path) {
            Err(SettingsError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no settings file, using defaults");
                Ok(Self::default())
            }
            result => result,
        }
    }

    /// Saves the settings to a TOML file, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be serialized or written.
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// The numbering mode selected by [`Settings::auto_numbering`].
    #[must_use]
    pub const fn numbering_mode(&self) -> NumberingMode {
        NumberingMode::from_flag(self.auto_numbering)
    }
}

/// The serialized versions of the settings.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default)]
        auto_numbering: bool,

        #[serde(default)]
        rules: ClassificationRules,

        #[serde(default)]
        templates: Templates,
    },
}

impl From<Versions> for Settings {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                auto_numbering,
                rules,
                templates,
            } => Self {
                auto_numbering,
                rules,
                templates,
            },
        }
    }
}

impl From<Settings> for Versions {
    fn from(settings: Settings) -> Self {
        Self::V1 {
            auto_numbering: settings.auto_numbering,
            rules: settings.rules,
            templates: settings.templates,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::domain::template::Template;

    #[test]
    fn version_only_file_returns_default() {
        let actual: Settings = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, Settings::default());
    }

    #[test]
    fn load_reads_flag_and_templates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            "_version = \"1\"\nauto_numbering = true\n\n[templates]\n\"Общие\" = [\"Острые кромки притупить.\", { text = \"Покрытие Хим. Окс.\", variants = [\"Покрытие Ц9.\"] }]\n"
                .as_bytes(),
        )
        .unwrap();

        let settings = Settings::load(file.path()).unwrap();

        assert!(settings.auto_numbering);
        assert_eq!(settings.numbering_mode(), NumberingMode::Auto);
        assert_eq!(settings.templates.count(), 2);
        assert!(matches!(
            settings.templates.get("Общие", 1).unwrap(),
            Template::WithVariants { .. }
        ));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = Settings::load_or_default(&tmp.path().join("missing.toml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn wrong_category_count_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            "_version = \"1\"\n\n[[rules]]\nname = \"Материал\"\nkeywords = [\"сталь\"]\n"
                .as_bytes(),
        )
        .unwrap();

        let error = Settings::load(file.path()).unwrap_err();
        assert!(matches!(error, SettingsError::Parse(_)));
    }

    #[test]
    fn saved_settings_load_back() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(".tt/settings.toml");

        let mut settings = Settings::default();
        settings.auto_numbering = true;
        settings
            .templates
            .add("Общие", Template::Plain("*Размеры для справок.".to_string()));
        settings.save(&path).unwrap();

        assert_eq!(Settings::load(&path).unwrap(), settings);
    }
}

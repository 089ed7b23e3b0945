//! A drawing's technical-demand block stored as a JSON file.
//!
//! The file mirrors what a drawing exposes: whether the block exists and its
//! native lines with their numbering flags. It is used to edit requirements
//! away from the CAD host and as a fixture format.
//!
//! ```json
//! {
//!   "name": "Вал.cdw",
//!   "created": true,
//!   "updated": "2026-10-18T10:00:00Z",
//!   "lines": [{ "text": "Сталь 45.", "numbered": true }]
//! }
//! ```

use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::port::{PortError, TechnicalDemandPort};
use crate::domain::{ProcessedLine, RequirementLine};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Contents {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default)]
    created: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated: Option<DateTime<Utc>>,
    #[serde(default)]
    lines: Vec<RequirementLine>,
}

/// A technical-demand block backed by a JSON document file.
///
/// Changes are held in memory until [`TechnicalDemandPort::commit`] writes
/// the file.
#[derive(Debug, Clone)]
pub struct DocumentFile {
    path: PathBuf,
    contents: Contents,
}

impl DocumentFile {
    /// Opens an existing document file.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::Unavailable`] if the file does not exist, or
    /// another error if it cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PortError> {
        let path = path.into();
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(PortError::Unavailable(format!(
                    "no document at {}",
                    path.display()
                )));
            }
            Err(e) => return Err(e.into()),
        };
        let contents = serde_json::from_reader(BufReader::new(file))?;
        tracing::debug!(path = %path.display(), "opened document file");
        Ok(Self { path, contents })
    }

    /// Creates a document file without a technical-demand block.
    ///
    /// # Errors
    ///
    /// Returns an error if the file already exists or cannot be written.
    pub fn create_new(path: impl Into<PathBuf>, name: Option<String>) -> Result<Self, PortError> {
        let path = path.into();
        if path.exists() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} already exists", path.display()),
            )
            .into());
        }
        let mut document = Self {
            path,
            contents: Contents {
                name,
                created: false,
                updated: None,
                lines: Vec::new(),
            },
        };
        document.commit()?;
        Ok(document)
    }

    /// The path of the file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// When the file was last committed, if ever.
    #[must_use]
    pub const fn updated(&self) -> Option<DateTime<Utc>> {
        self.contents.updated
    }
}

impl TechnicalDemandPort for DocumentFile {
    fn name(&self) -> String {
        self.contents.name.clone().unwrap_or_else(|| {
            self.path
                .file_name()
                .map_or_else(
                    || self.path.display().to_string(),
                    |name| name.to_string_lossy().into_owned(),
                )
        })
    }

    fn is_created(&self) -> Result<bool, PortError> {
        Ok(self.contents.created)
    }

    fn create(&mut self) -> Result<(), PortError> {
        self.contents.created = true;
        Ok(())
    }

    fn read(&self) -> Result<Vec<RequirementLine>, PortError> {
        Ok(self.contents.lines.clone())
    }

    fn clear(&mut self) -> Result<(), PortError> {
        self.contents.lines.clear();
        Ok(())
    }

    fn append(&mut self, line: &ProcessedLine) -> Result<(), PortError> {
        self.contents.lines.push(line.clone().into());
        Ok(())
    }

    fn commit(&mut self) -> Result<(), PortError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        self.contents.updated = Some(Utc::now());
        let mut writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(&mut writer, &self.contents)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_unavailable() {
        let tmp = tempfile::tempdir().unwrap();
        let error = DocumentFile::open(tmp.path().join("missing.json")).unwrap_err();
        assert!(matches!(error, PortError::Unavailable(_)));
    }

    #[test]
    fn malformed_file_is_a_format_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let error = DocumentFile::open(&path).unwrap_err();
        assert!(matches!(error, PortError::Format(_)));
    }

    #[test]
    fn committed_lines_are_read_back() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("drawings/Вал.json");

        let mut document = DocumentFile::create_new(&path, Some("Вал.cdw".to_string())).unwrap();
        assert!(!document.is_created().unwrap());

        document.create().unwrap();
        document.append(&ProcessedLine::new("Сталь 45.", true)).unwrap();
        document.append(&ProcessedLine::new("уточнение", false)).unwrap();
        document.commit().unwrap();

        let reopened = DocumentFile::open(&path).unwrap();
        assert_eq!(reopened.name(), "Вал.cdw");
        assert!(reopened.is_created().unwrap());
        assert!(reopened.updated().is_some());
        assert_eq!(
            reopened.read().unwrap(),
            [
                RequirementLine::numbered("Сталь 45."),
                RequirementLine::continuation("уточнение"),
            ]
        );
    }

    #[test]
    fn uncommitted_changes_are_not_written() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("Корпус.json");

        let mut document = DocumentFile::create_new(&path, None).unwrap();
        document.create().unwrap();
        document.append(&ProcessedLine::new("Сталь 45.", true)).unwrap();

        let reopened = DocumentFile::open(&path).unwrap();
        assert_eq!(reopened.name(), "Корпус.json");
        assert!(reopened.read().unwrap().is_empty());
    }

    #[test]
    fn existing_file_is_not_overwritten() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("Вал.json");
        DocumentFile::create_new(&path, None).unwrap();

        let error = DocumentFile::create_new(&path, None).unwrap_err();
        assert!(matches!(error, PortError::Io(e) if e.kind() == io::ErrorKind::AlreadyExists));
    }
}

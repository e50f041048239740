use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use super::StepDataCollector;
use crate::signature::SignatureConfiguration;

/// Why a chosen output path was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OutputPathError {
    #[error("output path is a directory: {0}")]
    IsDirectory(PathBuf),

    #[error("output file already exists: {0}")]
    AlreadyExists(PathBuf),
}

/// The signed document must go to a new file
pub fn validate_output_path(path: &Path) -> Result<(), OutputPathError> {
    if path.is_dir() {
        return Err(OutputPathError::IsDirectory(path.to_path_buf()));
    }
    if path.exists() {
        return Err(OutputPathError::AlreadyExists(path.to_path_buf()));
    }
    Ok(())
}

/// Reason, location and output file
#[derive(Debug, Clone, Default)]
pub struct OutputStep {
    reason: String,
    location: String,
    output_path: Option<PathBuf>,
}

impl OutputStep {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_reason(&mut self, reason: &str) {
        self.reason = reason.to_string();
    }

    pub fn set_location(&mut self, location: &str) {
        self.location = location.to_string();
    }

    pub fn output_path(&self) -> Option<&Path> {
        self.output_path.as_deref()
    }

    /// Accept a path from the file chooser; an invalid path clears the choice
    pub fn choose_output_path(&mut self, path: PathBuf) -> Result<(), OutputPathError> {
        match validate_output_path(&path) {
            Ok(()) => {
                debug!(path = %path.display(), "output path chosen");
                self.output_path = Some(path);
                Ok(())
            }
            Err(e) => {
                debug!("output path rejected: {}", e);
                self.output_path = None;
                Err(e)
            }
        }
    }
}

impl StepDataCollector for OutputStep {
    fn collect_data(&self, config: &mut SignatureConfiguration) {
        config.output.reason.clone_from(&self.reason);
        config.output.location.clone_from(&self.location);
        config.output.path.clone_from(&self.output_path);
    }

    /// Re-validated on every call; the file may have appeared since it was chosen
    fn can_advance(&self) -> bool {
        self.output_path
            .as_deref()
            .is_some_and(|path| validate_output_path(path).is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_new_file_is_valid() {
        let dir = TempDir::new().unwrap();
        let mut step = OutputStep::new();
        assert!(!step.can_advance());

        step.choose_output_path(dir.path().join("signed.pdf")).unwrap();
        assert!(step.can_advance());
    }

    #[test]
    fn test_directory_rejected_and_clears_choice() {
        let dir = TempDir::new().unwrap();
        let mut step = OutputStep::new();
        step.choose_output_path(dir.path().join("signed.pdf")).unwrap();

        let err = step.choose_output_path(dir.path().to_path_buf()).unwrap_err();
        assert!(matches!(err, OutputPathError::IsDirectory(_)));
        assert!(step.output_path().is_none());
        assert!(!step.can_advance());
    }

    #[test]
    fn test_existing_file_rejected() {
        let dir = TempDir::new().unwrap();
        let existing = dir.path().join("taken.pdf");
        std::fs::write(&existing, b"%PDF").unwrap();

        let mut step = OutputStep::new();
        assert_eq!(
            step.choose_output_path(existing.clone()),
            Err(OutputPathError::AlreadyExists(existing))
        );
    }

    #[test]
    fn test_file_created_after_choice_blocks_finish() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("late.pdf");
        let mut step = OutputStep::new();
        step.choose_output_path(path.clone()).unwrap();
        std::fs::write(&path, b"%PDF").unwrap();
        assert!(!step.can_advance());
    }

    #[test]
    fn test_collect_copies_text_fields() {
        let mut step = OutputStep::new();
        step.set_reason("Approved");
        step.set_location("Berlin");

        let mut config = SignatureConfiguration::default();
        step.collect_data(&mut config);
        assert_eq!(config.output.reason, "Approved");
        assert_eq!(config.output.location, "Berlin");
        assert!(config.output.path.is_none());
    }

    #[test]
    fn test_rejected_choice_clears_collected_path() {
        let dir = TempDir::new().unwrap();
        let mut step = OutputStep::new();
        let mut config = SignatureConfiguration::default();

        step.choose_output_path(dir.path().join("a.pdf")).unwrap();
        step.collect_data(&mut config);
        assert_eq!(config.output.path, Some(dir.path().join("a.pdf")));

        step.choose_output_path(dir.path().to_path_buf()).unwrap_err();
        step.collect_data(&mut config);
        assert!(config.output.path.is_none());
    }
}

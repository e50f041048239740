use std::path::{Path, PathBuf};

use super::StepDataCollector;
use crate::signature::SignatureConfiguration;

/// Standalone key file and its passphrase
#[derive(Clone, Default)]
pub struct PfxStep {
    key_file: Option<PathBuf>,
    passphrase: String,
    passphrase_entered: bool,
}

impl PfxStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the file chooser result; `None` (cancelled) keeps the previous choice
    pub fn choose_key_file(&mut self, path: Option<PathBuf>) {
        if let Some(path) = path {
            self.key_file = Some(path);
        }
    }

    pub fn key_file(&self) -> Option<&Path> {
        self.key_file.as_deref()
    }

    /// Current passphrase field contents
    pub fn enter_passphrase(&mut self, text: &str) {
        self.passphrase = text.to_string();
        if !text.is_empty() {
            self.passphrase_entered = true;
        }
    }
}

impl StepDataCollector for PfxStep {
    fn collect_data(&self, config: &mut SignatureConfiguration) {
        if let Some(path) = &self.key_file {
            config.key_file.path = Some(path.clone());
        }
        config.key_file.passphrase.clone_from(&self.passphrase);
    }

    fn can_advance(&self) -> bool {
        self.key_file.is_some() && self.passphrase_entered
    }
}

impl std::fmt::Debug for PfxStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PfxStep")
            .field("key_file", &self.key_file)
            .field("passphrase_entered", &self.passphrase_entered)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_in_either_order() {
        let mut a = PfxStep::new();
        assert!(!a.can_advance());
        a.choose_key_file(Some(PathBuf::from("/keys/me.pfx")));
        assert!(!a.can_advance());
        a.enter_passphrase("s");
        assert!(a.can_advance());

        let mut b = PfxStep::new();
        b.enter_passphrase("s");
        assert!(!b.can_advance());
        b.choose_key_file(Some(PathBuf::from("/keys/me.pfx")));
        assert!(b.can_advance());
    }

    #[test]
    fn test_cancelled_chooser_and_empty_passphrase() {
        let mut step = PfxStep::new();
        step.choose_key_file(None);
        step.enter_passphrase("");
        assert!(!step.can_advance());

        step.choose_key_file(Some(PathBuf::from("a.pfx")));
        step.choose_key_file(None);
        assert_eq!(step.key_file(), Some(Path::new("a.pfx")));
    }

    #[test]
    fn test_collect_copies_file_and_passphrase() {
        let mut step = PfxStep::new();
        step.choose_key_file(Some(PathBuf::from("a.pfx")));
        step.enter_passphrase("pw");

        let mut config = SignatureConfiguration::default();
        step.collect_data(&mut config);
        assert_eq!(config.key_file.path.as_deref(), Some(Path::new("a.pfx")));
        assert_eq!(config.key_file.passphrase, "pw");
    }
}

use std::path::{Path, PathBuf};

use super::StepDataCollector;
use crate::signature::SignatureConfiguration;

/// Keystore file, its passphrase, and the alias used inside it
#[derive(Clone, Default)]
pub struct KeystoreStep {
    keystore: Option<PathBuf>,
    passphrase: String,
    alias: String,
    alias_passphrase: String,
    passphrase_entered: bool,
    alias_entered: bool,
    alias_passphrase_entered: bool,
}

impl KeystoreStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the file chooser result; `None` (cancelled) keeps the previous choice
    pub fn choose_keystore(&mut self, path: Option<PathBuf>) {
        if let Some(path) = path {
            self.keystore = Some(path);
        }
    }

    pub fn keystore(&self) -> Option<&Path> {
        self.keystore.as_deref()
    }

    pub fn enter_passphrase(&mut self, text: &str) {
        self.passphrase = text.to_string();
        self.passphrase_entered |= !text.is_empty();
    }

    pub fn enter_alias(&mut self, text: &str) {
        self.alias = text.to_string();
        self.alias_entered |= !text.is_empty();
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn enter_alias_passphrase(&mut self, text: &str) {
        self.alias_passphrase = text.to_string();
        self.alias_passphrase_entered |= !text.is_empty();
    }
}

impl StepDataCollector for KeystoreStep {
    fn collect_data(&self, config: &mut SignatureConfiguration) {
        if let Some(path) = &self.keystore {
            config.keystore.path = Some(path.clone());
        }
        config.keystore.passphrase.clone_from(&self.passphrase);
        config.keystore.alias.clone_from(&self.alias);
        config.keystore.alias_passphrase.clone_from(&self.alias_passphrase);
    }

    fn can_advance(&self) -> bool {
        self.keystore.is_some()
            && self.passphrase_entered
            && self.alias_entered
            && self.alias_passphrase_entered
    }
}

impl std::fmt::Debug for KeystoreStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeystoreStep")
            .field("keystore", &self.keystore)
            .field("alias", &self.alias)
            .field("passphrase_entered", &self.passphrase_entered)
            .field("alias_entered", &self.alias_entered)
            .field("alias_passphrase_entered", &self.alias_passphrase_entered)
            .finish_non_exhaustive()
    }
}

use tracing::debug;

use super::StepDataCollector;
use crate::signature::{EncryptionPermissions, SignatureConfiguration};

/// Output encryption and flattening
#[derive(Clone, Default)]
pub struct EncryptionStep {
    append_mode: bool,
    enabled: bool,
    flatten: bool,
    permissions: EncryptionPermissions,
    user_passphrase: String,
    owner_passphrase: String,
    user_passphrase_entered: bool,
}

impl EncryptionStep {
    /// Encryption and flatten are unavailable for documents that are already signed
    pub fn new(append_mode: bool) -> Self {
        Self {
            append_mode,
            ..Self::default()
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Returns false when the toggle is unavailable
    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        if self.append_mode && enabled {
            debug!("encryption is unavailable for signed documents");
            return false;
        }
        self.enabled = enabled;
        true
    }

    pub fn flatten(&self) -> bool {
        self.flatten
    }

    /// Returns false when the toggle is unavailable
    pub fn set_flatten(&mut self, flatten: bool) -> bool {
        if self.append_mode && flatten {
            debug!("flatten is unavailable for signed documents");
            return false;
        }
        self.flatten = flatten;
        true
    }

    pub fn permissions(&self) -> EncryptionPermissions {
        self.permissions
    }

    pub fn set_permission(&mut self, permission: EncryptionPermissions, allowed: bool) {
        self.permissions.set(permission, allowed);
    }

    pub fn enter_user_passphrase(&mut self, text: &str) {
        self.user_passphrase = text.to_string();
        self.user_passphrase_entered |= !text.is_empty();
    }

    pub fn enter_owner_passphrase(&mut self, text: &str) {
        self.owner_passphrase = text.to_string();
    }
}

impl StepDataCollector for EncryptionStep {
    fn collect_data(&self, config: &mut SignatureConfiguration) {
        config.set_flatten(self.flatten);
        config.set_encryption_enabled(self.enabled);
        if self.enabled && config.encryption_enabled() {
            config.encryption.user_passphrase.clone_from(&self.user_passphrase);
            config.encryption.owner_passphrase.clone_from(&self.owner_passphrase);
            config.encryption.permissions = self.permissions;
        }
    }

    fn can_advance(&self) -> bool {
        !self.enabled || self.user_passphrase_entered
    }
}

impl std::fmt::Debug for EncryptionStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionStep")
            .field("append_mode", &self.append_mode)
            .field("enabled", &self.enabled)
            .field("flatten", &self.flatten)
            .field("permissions", &self.permissions)
            .field("user_passphrase_entered", &self.user_passphrase_entered)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_is_advanceable() {
        let step = EncryptionStep::new(false);
        assert!(step.can_advance());
    }

    #[test]
    fn test_enabled_requires_user_passphrase() {
        let mut step = EncryptionStep::new(false);
        step.set_enabled(true);
        assert!(!step.can_advance());
        step.enter_owner_passphrase("owner");
        assert!(!step.can_advance());
        step.enter_user_passphrase("u");
        assert!(step.can_advance());
    }

    #[test]
    fn test_collect_copies_permissions_when_enabled() {
        let mut step = EncryptionStep::new(false);
        step.set_enabled(true);
        step.set_permission(EncryptionPermissions::COPY, true);
        step.set_permission(EncryptionPermissions::FILL_IN, true);
        step.set_permission(EncryptionPermissions::COPY, false);
        step.enter_user_passphrase("u");
        step.enter_owner_passphrase("o");
        step.set_flatten(true);

        let mut config = SignatureConfiguration::new(false);
        step.collect_data(&mut config);
        assert!(config.encryption_enabled());
        assert!(config.flatten());
        assert_eq!(config.encryption.permissions, EncryptionPermissions::FILL_IN);
        assert_eq!(config.encryption.owner_passphrase, "o");
    }

    #[test]
    fn test_append_mode_ignores_toggles() {
        let mut step = EncryptionStep::new(true);
        assert!(!step.set_enabled(true));
        assert!(!step.set_flatten(true));
        assert!(step.can_advance());

        let mut config = SignatureConfiguration::new(true);
        step.collect_data(&mut config);
        assert!(!config.encryption_enabled());
        assert!(!config.flatten());
    }
}

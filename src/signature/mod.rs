//! The signature configuration aggregate filled in by the wizard.
//!
//! One `SignatureConfiguration` lives for one wizard session. Each step writes
//! its own slice of it when the wizard leaves that step. The fields that append
//! mode locks down (certify mode, encryption, flatten) are only reachable
//! through setters so the lock cannot be bypassed.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use tracing::debug;

use crate::geometry::DocRect;

/// Placeholder written over passphrases in redacted output
const REDACTED: &str = "********";

/// Author-level certification applied with the signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CertifyMode {
    NotCertified,
    NoChanges,
    FormFilling,
    FormFillingAndAnnotations,
}

impl Default for CertifyMode {
    fn default() -> Self {
        Self::NotCertified
    }
}

impl CertifyMode {
    pub fn all() -> &'static [CertifyMode] {
        &[
            CertifyMode::NotCertified,
            CertifyMode::NoChanges,
            CertifyMode::FormFilling,
            CertifyMode::FormFillingAndAnnotations,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            CertifyMode::NotCertified => "Not certified",
            CertifyMode::NoChanges => "No changes allowed",
            CertifyMode::FormFilling => "Form filling",
            CertifyMode::FormFillingAndAnnotations => "Form filling and annotations",
        }
    }
}

bitflags! {
    /// Permissions granted to users opening an encrypted output document.
    ///
    /// Values follow the PDF standard security handler permission bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct EncryptionPermissions: u32 {
        /// Bits 3 and 12: full-quality printing
        const PRINTING = (1 << 2) | (1 << 11);
        /// Bit 4
        const MODIFY_CONTENTS = 1 << 3;
        /// Bit 5
        const COPY = 1 << 4;
        /// Bit 6
        const MODIFY_ANNOTATIONS = 1 << 5;
        /// Bit 9
        const FILL_IN = 1 << 8;
        /// Bit 10: text extraction for accessibility
        const SCREEN_READERS = 1 << 9;
        /// Bit 11: insert, rotate or delete pages
        const ASSEMBLY = 1 << 10;
        /// Bit 3 only: low-resolution printing
        const DEGRADED_PRINTING = 1 << 2;
    }
}

impl Default for EncryptionPermissions {
    fn default() -> Self {
        Self::empty()
    }
}

/// Standalone key file (PFX) credentials
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyFileCredentials {
    pub path: Option<PathBuf>,
    pub passphrase: String,
}

/// Keystore plus alias credentials
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeystoreCredentials {
    pub path: Option<PathBuf>,
    pub passphrase: String,
    pub alias: String,
    pub alias_passphrase: String,
}

/// Where the visible signature appearance is drawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisibleSignature {
    pub enabled: bool,
    /// 1-based page number
    pub page: u32,
    /// Signature rectangle in document space
    pub rect: Option<DocRect>,
}

impl Default for VisibleSignature {
    fn default() -> Self {
        Self {
            enabled: false,
            page: 1,
            rect: None,
        }
    }
}

/// Output encryption settings; the enabled flag itself lives on the configuration
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptionSettings {
    pub permissions: EncryptionPermissions,
    pub user_passphrase: String,
    pub owner_passphrase: String,
}

/// Reason, location and destination of the signed document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSettings {
    pub reason: String,
    pub location: String,
    pub path: Option<PathBuf>,
}

/// Everything the signing consumer needs, collected over one wizard session
#[derive(Clone, Default, PartialEq, Serialize)]
pub struct SignatureConfiguration {
    /// true: keystore + alias; false: standalone key file
    pub keystore_mode: bool,
    certify_mode: CertifyMode,
    append_mode: bool,
    encryption_enabled: bool,
    flatten: bool,
    pub key_file: KeyFileCredentials,
    pub keystore: KeystoreCredentials,
    pub visible: VisibleSignature,
    pub encryption: EncryptionSettings,
    pub output: OutputSettings,
}

impl SignatureConfiguration {
    /// Fresh configuration for a document; `append_mode` is fixed for the session
    pub fn new(append_mode: bool) -> Self {
        Self {
            append_mode,
            ..Self::default()
        }
    }

    pub fn append_mode(&self) -> bool {
        self.append_mode
    }

    pub fn certify_mode(&self) -> CertifyMode {
        self.certify_mode
    }

    /// Returns whether the mode was applied; append mode pins `NotCertified`
    pub fn set_certify_mode(&mut self, mode: CertifyMode) -> bool {
        if self.append_mode && mode != CertifyMode::NotCertified {
            debug!(?mode, "ignoring certify mode in append mode");
            return false;
        }
        self.certify_mode = mode;
        true
    }

    pub fn encryption_enabled(&self) -> bool {
        self.encryption_enabled
    }

    /// Returns whether the flag was applied; append mode keeps encryption off
    pub fn set_encryption_enabled(&mut self, enabled: bool) -> bool {
        if self.append_mode && enabled {
            debug!("ignoring encryption in append mode");
            return false;
        }
        self.encryption_enabled = enabled;
        true
    }

    pub fn flatten(&self) -> bool {
        self.flatten
    }

    /// Returns whether the flag was applied; append mode keeps flatten off
    pub fn set_flatten(&mut self, flatten: bool) -> bool {
        if self.append_mode && flatten {
            debug!("ignoring flatten in append mode");
            return false;
        }
        self.flatten = flatten;
        true
    }

    /// Encryption may only be finalized with an owner passphrase
    pub fn encryption_finalizable(&self) -> bool {
        !self.encryption_enabled || !self.encryption.owner_passphrase.is_empty()
    }

    /// Copy with every non-empty passphrase masked, for display and logs
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        for secret in [
            &mut copy.key_file.passphrase,
            &mut copy.keystore.passphrase,
            &mut copy.keystore.alias_passphrase,
            &mut copy.encryption.user_passphrase,
            &mut copy.encryption.owner_passphrase,
        ] {
            if !secret.is_empty() {
                *secret = REDACTED.to_string();
            }
        }
        copy
    }
}

fn mask(secret: &str) -> &'static str {
    if secret.is_empty() {
        ""
    } else {
        REDACTED
    }
}

impl fmt::Debug for KeyFileCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyFileCredentials")
            .field("path", &self.path)
            .field("passphrase", &mask(&self.passphrase))
            .finish()
    }
}

impl fmt::Debug for KeystoreCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeystoreCredentials")
            .field("path", &self.path)
            .field("passphrase", &mask(&self.passphrase))
            .field("alias", &self.alias)
            .field("alias_passphrase", &mask(&self.alias_passphrase))
            .finish()
    }
}

impl fmt::Debug for EncryptionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptionSettings")
            .field("permissions", &self.permissions)
            .field("user_passphrase", &mask(&self.user_passphrase))
            .field("owner_passphrase", &mask(&self.owner_passphrase))
            .finish()
    }
}

impl fmt::Debug for SignatureConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignatureConfiguration")
            .field("keystore_mode", &self.keystore_mode)
            .field("certify_mode", &self.certify_mode)
            .field("append_mode", &self.append_mode)
            .field("encryption_enabled", &self.encryption_enabled)
            .field("flatten", &self.flatten)
            .field("key_file", &self.key_file)
            .field("keystore", &self.keystore)
            .field("visible", &self.visible)
            .field("encryption", &self.encryption)
            .field("output", &self.output)
            .finish()
    }
}

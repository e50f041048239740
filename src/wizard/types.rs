//! Type definitions for the signing wizard

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::steps::OutputPathError;

/// Number of progress positions shown to the user; the two credential steps share one
pub const TOTAL_STEPS: u8 = 5;

/// Wizard step identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepId {
    ModeSelect,
    PfxCredentials,
    KeystoreCredentials,
    VisibleSignaturePlacement,
    EncryptionOptions,
    CommonOutputOptions,
}

impl StepId {
    pub fn all() -> &'static [StepId] {
        &[
            StepId::ModeSelect,
            StepId::PfxCredentials,
            StepId::KeystoreCredentials,
            StepId::VisibleSignaturePlacement,
            StepId::EncryptionOptions,
            StepId::CommonOutputOptions,
        ]
    }

    pub fn title(&self) -> &'static str {
        match self {
            StepId::ModeSelect => "Select Signing Mode",
            StepId::PfxCredentials => "PFX Key File",
            StepId::KeystoreCredentials => "Keystore",
            StepId::VisibleSignaturePlacement => "Visible Signature Options",
            StepId::EncryptionOptions => "Encryption Options",
            StepId::CommonOutputOptions => "Reason and Location",
        }
    }

    /// 1-based progress position
    pub fn number(&self) -> u8 {
        match self {
            StepId::ModeSelect => 1,
            StepId::PfxCredentials | StepId::KeystoreCredentials => 2,
            StepId::VisibleSignaturePlacement => 3,
            StepId::EncryptionOptions => 4,
            StepId::CommonOutputOptions => 5,
        }
    }

    pub fn progress_label(&self) -> String {
        format!("Step {} of {}", self.number(), TOTAL_STEPS)
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Recoverable wizard failures; the controller state is unchanged when one is returned
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("step '{0}' is missing required input")]
    NotReady(StepId),

    #[error("cannot finish from step '{0}'")]
    NotAtFinish(StepId),

    #[error("step '{0}' is the last step")]
    NoNextStep(StepId),

    #[error("encryption requires an owner passphrase")]
    MissingOwnerPassphrase,

    #[error(transparent)]
    OutputPath(#[from] OutputPathError),
}

//! Per-step input collectors.
//!
//! Each step owns the raw input for its slice of the configuration and knows
//! whether that input is complete. Data only reaches the shared configuration
//! through `collect_data`, which the controller calls when leaving the step.

mod encryption;
mod keystore;
mod mode_select;
mod output;
mod pfx;
mod visible_signature;

pub use encryption::EncryptionStep;
pub use keystore::KeystoreStep;
pub use mode_select::ModeSelectStep;
pub use output::{validate_output_path, OutputPathError, OutputStep};
pub use pfx::PfxStep;
pub use visible_signature::{PreviewPanel, VisibleSignatureStep};

use crate::signature::SignatureConfiguration;

/// Common contract of every wizard step
pub trait StepDataCollector {
    /// Copy this step's input into the configuration.
    ///
    /// Never fails; incomplete input is simply not copied.
    fn collect_data(&self, config: &mut SignatureConfiguration);

    /// Whether the step holds all of its mandatory input
    fn can_advance(&self) -> bool;
}

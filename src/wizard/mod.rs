//! Signing wizard: step identifiers, per-step collectors and the navigation controller

mod controller;
pub mod steps;
mod types;


pub use controller::WizardController;
pub use steps::{
    validate_output_path, EncryptionStep, KeystoreStep, ModeSelectStep, OutputPathError,
    OutputStep, PfxStep, PreviewPanel, StepDataCollector, VisibleSignatureStep,
};
pub use types::{StepId, WizardError, TOTAL_STEPS};

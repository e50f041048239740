//! signwiz - signing wizard navigation core
//!
//! Step navigation, per-step input collection and the final signature
//! configuration for a document-signing wizard, plus the page-range resolver
//! and preview geometry it relies on. Rendering, signing and document parsing
//! are reached only through the traits in [`collaborators`].

pub mod collaborators;
pub mod config;
pub mod geometry;
pub mod logging;
pub mod pages;
pub mod script;
pub mod signature;
pub mod wizard;

pub use signature::SignatureConfiguration;
pub use wizard::{StepId, WizardController, WizardError};

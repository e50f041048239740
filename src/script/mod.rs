//! Scripted wizard sessions.
//!
//! A script is a TOML file describing a document and the input a user would
//! type into each wizard step. The runner drives a real `WizardController`
//! with it, which is how the CLI exercises the wizard without a UI.

mod runner;
mod scripted;

pub use runner::run_script;
pub use scripted::{ScriptDocument, ScriptRenderer, ScriptedPointer};

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::geometry::{CropBox, ViewPoint};
use crate::signature::CertifyMode;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    #[serde(default)]
    pub document: DocumentScript,
    #[serde(default)]
    pub mode: ModeScript,
    pub pfx: Option<PfxScript>,
    pub keystore: Option<KeystoreScript>,
    #[serde(default)]
    pub visible: VisibleScript,
    #[serde(default)]
    pub encryption: EncryptionScript,
    #[serde(default)]
    pub output: OutputScript,
}

/// The simulated document being signed
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocumentScript {
    #[serde(default = "default_pages")]
    pub pages: u32,
    /// Pages that already carry a signature field
    #[serde(default)]
    pub signed_pages: Vec<u32>,
    /// Pages whose signature probe fails
    #[serde(default)]
    pub unreadable_pages: Vec<u32>,
    /// Rendered page image size in pixels, `[width, height]`
    #[serde(default = "default_page_size")]
    pub page_size: [f64; 2],
    /// Crop box for every page; defaults to the full page image
    pub crop_box: Option<CropBox>,
    /// The document is encrypted and opens only with this password
    pub password: Option<String>,
}

fn default_pages() -> u32 {
    1
}

fn default_page_size() -> [f64; 2] {
    [612.0, 792.0]
}

impl Default for DocumentScript {
    fn default() -> Self {
        Self {
            pages: default_pages(),
            signed_pages: Vec::new(),
            unreadable_pages: Vec::new(),
            page_size: default_page_size(),
            crop_box: None,
            password: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModeScript {
    #[serde(default)]
    pub keystore: bool,
    #[serde(default)]
    pub certify: CertifyMode,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PfxScript {
    pub key_file: Option<PathBuf>,
    #[serde(default)]
    pub passphrase: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeystoreScript {
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub passphrase: String,
    #[serde(default)]
    pub alias: String,
    #[serde(default)]
    pub alias_passphrase: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VisibleScript {
    #[serde(default)]
    pub enabled: bool,
    pub page: Option<u32>,
    pub drag: Option<DragScript>,
}

/// A pointer drag on the preview: press at `from`, move through `path`, release
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DragScript {
    pub from: ViewPoint,
    pub path: Vec<ViewPoint>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EncryptionScript {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub flatten: bool,
    /// Permission names, e.g. `["PRINTING", "COPY"]`
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub user_passphrase: String,
    #[serde(default)]
    pub owner_passphrase: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputScript {
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub location: String,
    pub path: Option<PathBuf>,
}

impl Script {
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse wizard script")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Invalid script {}", path.display()))
    }
}

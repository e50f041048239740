use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::wizard::PreviewPanel;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub drag: DragConfig,
    #[serde(default)]
    pub preview: PreviewConfig,
    #[serde(default)]
    pub document: DocumentConfig,
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct DocumentConfig {
    /// Password for opening encrypted documents before they are probed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl std::fmt::Debug for DocumentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentConfig")
            .field("password", &self.password.as_ref().map(|_| "********"))
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Write logs to a file instead of stderr
    #[serde(default)]
    pub to_file: bool,

    /// Log directory; defaults to the platform data directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            to_file: false,
            dir: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DragConfig {
    /// Pointer sampling interval while dragging the signature rectangle (default: 100)
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_poll_interval_ms() -> u64 {
    100
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl DragConfig {
    /// Sampling interval; never zero
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewConfig {
    #[serde(default = "default_panel_width")]
    pub panel_width: f64,
    #[serde(default = "default_panel_height")]
    pub panel_height: f64,
}

fn default_panel_width() -> f64 {
    PreviewPanel::default().width
}

fn default_panel_height() -> f64 {
    PreviewPanel::default().height
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            panel_width: default_panel_width(),
            panel_height: default_panel_height(),
        }
    }
}

impl PreviewConfig {
    pub fn panel(&self) -> PreviewPanel {
        PreviewPanel {
            width: self.panel_width,
            height: self.panel_height,
        }
    }
}

impl Config {
    /// User config in ~/.config/signwiz/
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("signwiz").join("config.toml"))
    }

    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        // Start with embedded defaults so signwiz works without config files
        let defaults = Config::default();
        let defaults_json =
            serde_json::to_string(&defaults).context("Failed to serialize default config")?;

        let mut builder = config::Config::builder().add_source(config::File::from_str(
            &defaults_json,
            config::FileFormat::Json,
        ));

        if let Some(user_config) = Self::user_config_path() {
            if user_config.exists() {
                builder = builder.add_source(config::File::from(user_config));
            }
        }

        // Explicit config file (CLI override)
        if let Some(path) = config_path {
            builder = builder.add_source(config::File::from(path.to_path_buf()).required(true));
        }

        // Environment variables, e.g. SIGNWIZ__DRAG__POLL_INTERVAL_MS=50
        builder = builder.add_source(
            config::Environment::with_prefix("SIGNWIZ")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to load configuration")?;
        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Directory for log files
    pub fn logs_path(&self) -> PathBuf {
        match &self.logging.dir {
            Some(dir) => dir.clone(),
            None => dirs::data_local_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("signwiz")
                .join("logs"),
        }
    }
}

//! Logging initialization for signwiz.
//!
//! File mode: logs to `{logs_dir}/signwiz-{datetime}.log`
//! Otherwise: logs to stderr, leaving stdout for command output

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

/// Result of logging initialization
pub struct LoggingHandle {
    /// Guard that must be kept alive for the duration of the program.
    /// When dropped, ensures all buffered logs are flushed.
    pub _guard: Option<WorkerGuard>,

    /// Path to the log file (only set with file logging enabled)
    pub log_file_path: Option<PathBuf>,
}

/// Level filter directive; `--debug` wins over the configured level
fn level_directive(config: &Config, debug_override: bool) -> String {
    if debug_override {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    }
}

/// Log file name with an ISO8601 timestamp
fn log_file_name() -> String {
    let timestamp = chrono::Utc::now().format("%Y%m%dT%H%M%SZ");
    format!("signwiz-{}.log", timestamp)
}

/// Initialize logging from configuration.
///
/// `RUST_LOG` overrides the configured level. The returned handle must be kept
/// alive for the duration of the program.
pub fn init_logging(config: &Config, debug_override: bool) -> Result<LoggingHandle> {
    let log_level = level_directive(config, debug_override);
    let filter =
        tracing_subscriber::EnvFilter::new(std::env::var("RUST_LOG").unwrap_or(log_level));

    if config.logging.to_file {
        let logs_dir = config.logs_path();
        std::fs::create_dir_all(&logs_dir)
            .with_context(|| format!("Failed to create log directory {}", logs_dir.display()))?;

        let log_filename = log_file_name();
        let log_file_path = logs_dir.join(&log_filename);

        let file_appender = tracing_appender::rolling::never(&logs_dir, &log_filename);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false) // No ANSI codes in log files
                    .with_writer(non_blocking),
            )
            .init();

        Ok(LoggingHandle {
            _guard: Some(guard),
            log_file_path: Some(log_file_path),
        })
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();

        Ok(LoggingHandle {
            _guard: None,
            log_file_path: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_flag_overrides_level() {
        let mut config = Config::default();
        config.logging.level = "warn".to_string();
        assert_eq!(level_directive(&config, false), "warn");
        assert_eq!(level_directive(&config, true), "debug");
    }

    #[test]
    fn test_log_file_name_format() {
        let name = log_file_name();
        assert!(name.starts_with("signwiz-"));
        assert!(name.ends_with("Z.log"));
    }

    #[test]
    fn test_stderr_mode_has_no_log_file() {
        // init_logging installs a global subscriber, so only the branch condition is checked
        let config = Config::default();
        assert!(!config.logging.to_file);
    }
}

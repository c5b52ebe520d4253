//! Structured logging with tracing
//!
//! Configures the `tracing` subscriber: level filter, plain or JSON
//! output on stderr, and an optional daily-rolling log file.

use std::path::Path;

use studagent_domain::error::{Error, Result};
use tracing::{Level, info, warn};
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

// Re-export LoggingConfig for convenience
pub use crate::config::LoggingConfig;
use crate::constants::{DEFAULT_CONFIG_DIR, LOG_FILTER_ENV};
use crate::error_ext::ErrorContext;

/// Initialize logging with the provided configuration
///
/// `STUDAGENT_LOG` overrides the configured level with a full filter
/// directive. Fails if a global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let level = parse_log_level(&config.level)?;
    let filter =
        EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(&config.level));

    let file_appender = config.file_output.as_ref().map(|path| {
        tracing_appender::rolling::daily(
            path.parent().unwrap_or_else(|| Path::new(".")),
            path.file_stem()
                .unwrap_or_else(|| std::ffi::OsStr::new(DEFAULT_CONFIG_DIR)),
        )
    });

    // Layer types differ between JSON and plain output, hence two branches
    let registry = Registry::default().with(filter);
    if config.json_format {
        let stderr = fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true);
        let file = file_appender.map(|appender| {
            fmt::layer()
                .json()
                .with_writer(appender)
                .with_ansi(false)
                .with_target(true)
        });
        registry
            .with(stderr)
            .with(file)
            .try_init()
            .context("Failed to install log subscriber")?;
    } else {
        let stderr = fmt::layer().with_writer(std::io::stderr).with_target(true);
        let file = file_appender.map(|appender| {
            fmt::layer()
                .with_writer(appender)
                .with_ansi(false)
                .with_target(true)
        });
        registry
            .with(stderr)
            .with(file)
            .try_init()
            .context("Failed to install log subscriber")?;
    }

    info!(%level, json = config.json_format, "Logging initialized");
    Ok(())
}

/// Parse log level string to tracing Level
pub fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" | "warning" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(Error::configuration(format!(
            "Invalid log level: {level}. Use trace, debug, info, warn, or error"
        ))),
    }
}

/// Log configuration loading status
pub fn log_config_loaded(config_path: &Path, success: bool) {
    if success {
        info!("Configuration loaded from {}", config_path.display());
    } else {
        warn!("Configuration file not found: {}", config_path.display());
    }
}

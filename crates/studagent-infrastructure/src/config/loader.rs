//! Configuration loader
//!
//! Handles loading configuration from various sources including
//! TOML files, environment variables, and default values.

use std::collections::HashSet;
use std::env;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use studagent_domain::error::{Error, Result};

use crate::config::AppConfig;
use crate::constants::{
    CONFIG_ENV_PREFIX, CONFIG_ENV_SEPARATOR, DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_FILENAME,
};
use crate::error_ext::ErrorContext;
use crate::logging::log_config_loaded;

/// Configuration loader service
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Configuration file path
    config_path: Option<PathBuf>,

    /// Environment prefix
    env_prefix: String,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader with default settings
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
        }
    }

    /// Set the configuration file path
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load configuration from all sources
    ///
    /// Configuration sources are merged in this order (later sources override earlier):
    /// 1. Default values from `AppConfig::default()`
    /// 2. TOML configuration file (explicit path, else the first default location found)
    /// 3. Environment variables with prefix, `__` between nested keys
    ///    (e.g., `STUDAGENT_BREAKER__FAILURE_THRESHOLD=3`)
    ///
    /// An explicit path that does not exist is an error.
    pub fn load(&self) -> Result<AppConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        if let Some(config_path) = &self.config_path {
            if !config_path.exists() {
                log_config_loaded(config_path, false);
                return Err(Error::configuration(format!(
                    "Configuration file not found: {}",
                    config_path.display()
                )));
            }
            figment = figment.merge(Toml::file(config_path));
            log_config_loaded(config_path, true);
        } else if let Some(default_path) = Self::find_default_config_path() {
            figment = figment.merge(Toml::file(&default_path));
            log_config_loaded(&default_path, true);
        }

        figment = figment
            .merge(Env::prefixed(&format!("{}_", self.env_prefix)).split(CONFIG_ENV_SEPARATOR));

        let app_config: AppConfig = figment
            .extract()
            .config_context("Failed to extract configuration")?;

        validate_app_config(&app_config)?;

        Ok(app_config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, config: &AppConfig, path: P) -> Result<()> {
        let toml_string =
            toml::to_string_pretty(config).config_context("Failed to serialize config to TOML")?;

        std::fs::write(path.as_ref(), toml_string).io_context(format!(
            "Failed to write config file {}",
            path.as_ref().display()
        ))?;

        Ok(())
    }

    /// Get the current configuration file path
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// First existing default configuration file
    fn find_default_config_path() -> Option<PathBuf> {
        let current_dir = env::current_dir().ok()?;

        let candidates = [
            Some(current_dir.join(DEFAULT_CONFIG_FILENAME)),
            Some(
                current_dir
                    .join(DEFAULT_CONFIG_DIR)
                    .join(DEFAULT_CONFIG_FILENAME),
            ),
            dirs::config_dir().map(|d| d.join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILENAME)),
            dirs::home_dir().map(|d| {
                d.join(format!(".{DEFAULT_CONFIG_DIR}"))
                    .join(DEFAULT_CONFIG_FILENAME)
            }),
        ];

        candidates.into_iter().flatten().find(|path| path.exists())
    }
}

/// Validate application configuration
///
/// Performs validation of every configuration section.
pub fn validate_app_config(config: &AppConfig) -> Result<()> {
    validate_logging_config(config)?;
    validate_provider_config(config)?;
    validate_breaker_config(config)?;
    validate_pipeline_config(config)?;
    validate_matching_config(config)?;
    validate_cache_config(config)?;
    Ok(())
}

fn validate_logging_config(config: &AppConfig) -> Result<()> {
    crate::logging::parse_log_level(&config.logging.level).map(|_| ())
}

fn validate_provider_config(config: &AppConfig) -> Result<()> {
    if config.providers.is_empty() {
        return Err(Error::configuration("At least one provider must be configured"));
    }
    let mut names = HashSet::new();
    for provider in &config.providers {
        if provider.name.trim().is_empty() {
            return Err(Error::configuration("Provider name cannot be empty"));
        }
        if !names.insert(provider.name.as_str()) {
            return Err(Error::configuration(format!(
                "Duplicate provider name: {}",
                provider.name
            )));
        }
        if provider.timeout_ms == 0 {
            return Err(Error::configuration(format!(
                "Provider {} timeout cannot be 0",
                provider.name
            )));
        }
        if provider.capabilities.is_empty() {
            return Err(Error::configuration(format!(
                "Provider {} must declare at least one capability",
                provider.name
            )));
        }
        if provider.rate_limit_per_minute == Some(0) {
            return Err(Error::configuration(format!(
                "Provider {} rate limit cannot be 0; omit it for no limit",
                provider.name
            )));
        }
    }
    Ok(())
}

fn validate_breaker_config(config: &AppConfig) -> Result<()> {
    let breaker = &config.breaker;
    if breaker.failure_threshold == 0 {
        return Err(Error::configuration("Breaker failure threshold cannot be 0"));
    }
    if breaker.window_ms == 0 {
        return Err(Error::configuration("Breaker failure window cannot be 0"));
    }
    if !breaker.backoff_factor.is_finite() || breaker.backoff_factor < 1.0 {
        return Err(Error::configuration(format!(
            "Breaker backoff factor must be at least 1.0, got {}",
            breaker.backoff_factor
        )));
    }
    if breaker.max_cooldown_ms < breaker.base_cooldown_ms {
        return Err(Error::configuration(format!(
            "Breaker max cooldown ({} ms) is shorter than the base cooldown ({} ms)",
            breaker.max_cooldown_ms, breaker.base_cooldown_ms
        )));
    }
    Ok(())
}

fn validate_pipeline_config(config: &AppConfig) -> Result<()> {
    let pipeline = &config.pipeline;
    if pipeline.max_chars < pipeline.min_chars {
        return Err(Error::configuration(format!(
            "Pipeline max_chars ({}) is below min_chars ({})",
            pipeline.max_chars, pipeline.min_chars
        )));
    }
    if pipeline.prompt_chars == 0 {
        return Err(Error::configuration("Pipeline prompt_chars cannot be 0"));
    }
    if pipeline.concurrency == 0 {
        return Err(Error::configuration("Pipeline concurrency cannot be 0"));
    }
    Ok(())
}

fn validate_matching_config(config: &AppConfig) -> Result<()> {
    let matching = &config.matching;
    if !(0.0..=1.0).contains(&matching.min_score) {
        return Err(Error::configuration(format!(
            "Matching min_score must be within [0, 1], got {}",
            matching.min_score
        )));
    }
    if matching.limit == Some(0) {
        return Err(Error::configuration("Matching limit cannot be 0; omit it for no limit"));
    }
    Ok(())
}

fn validate_cache_config(config: &AppConfig) -> Result<()> {
    if config.cache.enabled && config.cache.ttl_secs == 0 {
        return Err(Error::configuration(
            "Cache TTL cannot be 0 when cache is enabled",
        ));
    }
    Ok(())
}

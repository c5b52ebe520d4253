//! Circuit breaker configuration types

use serde::{Deserialize, Serialize};
use std::time::Duration;
use studagent_application::resilience::BreakerConfig;
use studagent_application::resilience::circuit_breaker::{
    DEFAULT_BACKOFF_FACTOR, DEFAULT_BASE_COOLDOWN, DEFAULT_FAILURE_THRESHOLD,
    DEFAULT_FAILURE_WINDOW, DEFAULT_MAX_COOLDOWN,
};

/// Breaker settings shared by every provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakerSettings {
    /// Failures within the window that open a circuit
    pub failure_threshold: u32,

    /// Failure counting window in milliseconds
    pub window_ms: u64,

    /// First cooldown in milliseconds
    pub base_cooldown_ms: u64,

    /// Cooldown multiplier applied when a trial fails
    pub backoff_factor: f64,

    /// Cooldown cap in milliseconds
    pub max_cooldown_ms: u64,
}

impl Default for BreakerSettings {
    fn default() -> Self {
        Self {
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            window_ms: millis(DEFAULT_FAILURE_WINDOW),
            base_cooldown_ms: millis(DEFAULT_BASE_COOLDOWN),
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
            max_cooldown_ms: millis(DEFAULT_MAX_COOLDOWN),
        }
    }
}

impl From<&BreakerSettings> for BreakerConfig {
    fn from(settings: &BreakerSettings) -> Self {
        Self {
            failure_threshold: settings.failure_threshold,
            window: Duration::from_millis(settings.window_ms),
            base_cooldown: Duration::from_millis(settings.base_cooldown_ms),
            backoff_factor: settings.backoff_factor,
            max_cooldown: Duration::from_millis(settings.max_cooldown_ms),
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

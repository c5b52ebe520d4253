//! Cache configuration types

use serde::{Deserialize, Serialize};
use std::time::Duration;
use studagent_application::ports::registry::CacheProviderConfig;

use crate::constants::{DEFAULT_CACHE_MAX_ENTRIES, DEFAULT_CACHE_PROVIDER, DEFAULT_CACHE_TTL};

/// Cache configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache match rankings
    pub enabled: bool,

    /// Registered cache provider (`moka`, `null`)
    pub provider: String,

    /// Lifetime of cached entries in seconds
    pub ttl_secs: u64,

    /// Maximum number of cached entries
    pub max_entries: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            provider: DEFAULT_CACHE_PROVIDER.to_string(),
            ttl_secs: DEFAULT_CACHE_TTL.as_secs(),
            max_entries: DEFAULT_CACHE_MAX_ENTRIES,
        }
    }
}

impl CacheConfig {
    /// Entry lifetime
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Registry configuration for the selected provider
    pub fn provider_config(&self) -> CacheProviderConfig {
        CacheProviderConfig::new(self.provider.clone())
            .with_max_entries(self.max_entries)
            .with_ttl_secs(self.ttl_secs)
    }
}

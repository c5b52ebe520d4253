//! Cache Provider Registry
//!
//! Auto-registration system for cache providers using linkme distributed slices.

use std::sync::Arc;

use studagent_domain::ports::providers::CacheProvider;

/// Configuration for cache provider creation
#[derive(Debug, Clone, Default)]
pub struct CacheProviderConfig {
    /// Provider name (e.g., "moka", "null")
    pub provider: String,
    /// Maximum number of entries
    pub max_entries: Option<u64>,
    /// Default TTL in seconds
    pub ttl_secs: Option<u64>,
}

impl CacheProviderConfig {
    /// Create a new config with the given provider name
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            ..Default::default()
        }
    }

    /// Set the max entries
    pub fn with_max_entries(mut self, max_entries: u64) -> Self {
        self.max_entries = Some(max_entries);
        self
    }

    /// Set the TTL in seconds
    pub fn with_ttl_secs(mut self, ttl_secs: u64) -> Self {
        self.ttl_secs = Some(ttl_secs);
        self
    }
}

/// Registry entry for cache providers
pub struct CacheProviderEntry {
    /// Unique provider name (e.g., "moka", "null")
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Factory function to create provider instance
    pub factory: fn(&CacheProviderConfig) -> Result<Arc<dyn CacheProvider>, String>,
}

#[linkme::distributed_slice]
pub static CACHE_PROVIDERS: [CacheProviderEntry] = [..];

/// Resolve a cache provider by name from the registry
pub fn resolve_cache_provider(
    config: &CacheProviderConfig,
) -> Result<Arc<dyn CacheProvider>, String> {
    let provider_name = &config.provider;

    for entry in CACHE_PROVIDERS {
        if entry.name == provider_name {
            return (entry.factory)(config);
        }
    }

    let available: Vec<&str> = CACHE_PROVIDERS.iter().map(|e| e.name).collect();

    Err(format!(
        "Unknown cache provider '{}'. Available providers: {:?}",
        provider_name, available
    ))
}

/// List all registered cache providers as (name, description)
pub fn list_cache_providers() -> Vec<(&'static str, &'static str)> {
    CACHE_PROVIDERS
        .iter()
        .map(|e| (e.name, e.description))
        .collect()
}

//! Null cache provider
//!
//! Stores nothing. Used when caching is disabled.

use std::sync::Arc;

use async_trait::async_trait;
use studagent_application::ports::registry::{
    CACHE_PROVIDERS, CacheProviderConfig, CacheProviderEntry,
};
use studagent_domain::error::Result;
use studagent_domain::ports::providers::{CacheEntryConfig, CacheProvider};

/// Null cache provider that doesn't store anything
///
/// # Example
///
/// ```rust
/// use studagent_providers::cache::NullCacheProvider;
///
/// let provider = NullCacheProvider::new();
/// // All operations succeed but nothing is cached
/// ```
#[derive(Debug, Clone, Default)]
pub struct NullCacheProvider;

impl NullCacheProvider {
    /// Create a new null cache provider
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CacheProvider for NullCacheProvider {
    async fn get_json(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn set_json(&self, _key: &str, _value: &str, _config: CacheEntryConfig) -> Result<()> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> Result<bool> {
        Ok(false)
    }

    async fn clear(&self) -> Result<()> {
        Ok(())
    }

    async fn size(&self) -> Result<usize> {
        Ok(0)
    }

    fn provider_name(&self) -> &str {
        "null"
    }
}

#[linkme::distributed_slice(CACHE_PROVIDERS)]
static NULL_CACHE_PROVIDER: CacheProviderEntry = CacheProviderEntry {
    name: "null",
    description: "No-op cache (caching disabled)",
    factory: |_config: &CacheProviderConfig| Ok(Arc::new(NullCacheProvider::new())),
};

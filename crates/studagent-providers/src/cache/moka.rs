//! Moka in-memory cache provider
//!
//! Concurrent in-memory cache with a capacity bound and a TTL per entry,
//! taken from the `CacheEntryConfig` each value is stored with.
//!
//! ## Example
//!
//! ```ignore
//! use studagent_providers::cache::MokaCacheProvider;
//!
//! let provider = MokaCacheProvider::with_capacity(1000);
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use studagent_application::ports::registry::{
    CACHE_PROVIDERS, CacheProviderConfig, CacheProviderEntry,
};
use studagent_domain::error::Result;
use studagent_domain::ports::providers::{CacheEntryConfig, CacheProvider};

use crate::constants::CACHE_DEFAULT_MAX_ENTRIES;

#[derive(Clone)]
struct CachedJson {
    json: Arc<str>,
    ttl: Duration,
}

struct EntryTtl;

impl Expiry<String, CachedJson> for EntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CachedJson,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CachedJson,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Moka-based in-memory cache provider
#[derive(Clone)]
pub struct MokaCacheProvider {
    cache: Cache<String, CachedJson>,
    max_entries: u64,
}

impl Default for MokaCacheProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MokaCacheProvider {
    /// Create a provider with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(CACHE_DEFAULT_MAX_ENTRIES)
    }

    /// Create a provider holding at most `max_entries` values
    pub fn with_capacity(max_entries: u64) -> Self {
        Self::with_config(max_entries, None)
    }

    /// Create a provider with a capacity and an upper bound on every TTL
    pub fn with_config(max_entries: u64, max_ttl: Option<Duration>) -> Self {
        let mut builder = Cache::builder()
            .max_capacity(max_entries)
            .expire_after(EntryTtl);
        if let Some(ttl) = max_ttl {
            builder = builder.time_to_live(ttl);
        }
        Self {
            cache: builder.build(),
            max_entries,
        }
    }

    /// Maximum number of entries
    pub fn max_entries(&self) -> u64 {
        self.max_entries
    }
}

#[async_trait]
impl CacheProvider for MokaCacheProvider {
    async fn get_json(&self, key: &str) -> Result<Option<String>> {
        Ok(self.cache.get(key).await.map(|v| v.json.to_string()))
    }

    async fn set_json(&self, key: &str, value: &str, config: CacheEntryConfig) -> Result<()> {
        let entry = CachedJson {
            json: Arc::from(value),
            ttl: config.effective_ttl(),
        };
        self.cache.insert(key.to_string(), entry).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.cache.remove(key).await.is_some())
    }

    async fn clear(&self) -> Result<()> {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
        Ok(())
    }

    async fn size(&self) -> Result<usize> {
        // Run pending tasks so entry_count is accurate
        self.cache.run_pending_tasks().await;
        Ok(usize::try_from(self.cache.entry_count()).unwrap_or(usize::MAX))
    }

    fn provider_name(&self) -> &str {
        "moka"
    }
}

impl std::fmt::Debug for MokaCacheProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaCacheProvider")
            .field("max_entries", &self.max_entries)
            .field("entries", &self.cache.entry_count())
            .finish()
    }
}

// ============================================================================
// Auto-registration via linkme
// ============================================================================

#[linkme::distributed_slice(CACHE_PROVIDERS)]
static MOKA_PROVIDER: CacheProviderEntry = CacheProviderEntry {
    name: "moka",
    description: "Moka in-memory cache with per-entry TTL",
    factory: |config: &CacheProviderConfig| {
        let max_entries = config.max_entries.unwrap_or(CACHE_DEFAULT_MAX_ENTRIES);
        let max_ttl = config.ttl_secs.map(Duration::from_secs);
        Ok(Arc::new(MokaCacheProvider::with_config(max_entries, max_ttl)))
    },
};

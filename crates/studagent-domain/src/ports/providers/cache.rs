//! Cache Provider Port
//!
//! Port for cache backends. Match results are cached through it as JSON.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::Result;

/// Default TTL for cache entries (5 minutes)
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Cache Entry Configuration
///
/// Configures how a cache entry should be stored, including TTL
/// and optional namespace isolation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntryConfig {
    /// Time to live for the cache entry
    pub ttl: Option<Duration>,
    /// Namespace for the cache entry
    pub namespace: Option<String>,
}

impl CacheEntryConfig {
    /// Create a new cache entry config with default TTL
    pub fn new() -> Self {
        Self {
            ttl: Some(Duration::from_secs(DEFAULT_CACHE_TTL_SECS)),
            namespace: None,
        }
    }

    /// Set TTL in seconds
    pub fn with_ttl_secs(mut self, secs: u64) -> Self {
        self.ttl = Some(Duration::from_secs(secs));
        self
    }

    /// Set the namespace for the cache entry
    pub fn with_namespace<S: Into<String>>(mut self, namespace: S) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Get the effective TTL, falling back to default
    pub fn effective_ttl(&self) -> Duration {
        self.ttl
            .unwrap_or(Duration::from_secs(DEFAULT_CACHE_TTL_SECS))
    }

    /// Get the effective namespace, falling back to default
    pub fn effective_namespace(&self) -> String {
        self.namespace
            .clone()
            .unwrap_or_else(|| "default".to_string())
    }
}

impl Default for CacheEntryConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache Provider Port
///
/// JSON-based storage with TTL support.
///
/// # Implementations
///
/// - **Moka**: In-memory cache with configurable capacity
/// - **Null**: No-op provider for tests and disabled caching
#[async_trait]
pub trait CacheProvider: Send + Sync + std::fmt::Debug {
    /// Get a value as a JSON string; `None` if absent or expired
    async fn get_json(&self, key: &str) -> Result<Option<String>>;

    /// Store a JSON string
    async fn set_json(&self, key: &str, value: &str, config: CacheEntryConfig) -> Result<()>;

    /// Delete a value, returning whether it existed
    async fn delete(&self, key: &str) -> Result<bool>;

    /// Clear all values
    async fn clear(&self) -> Result<()>;

    /// Number of entries
    async fn size(&self) -> Result<usize>;

    /// Identifier of the implementation (e.g. "moka", "null")
    fn provider_name(&self) -> &str;
}

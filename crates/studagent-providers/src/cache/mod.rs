//! Cache Provider Implementations
//!
//! Backends for match result caching.
//!
//! | Provider | Type | Description |
//! |----------|------|-------------|
//! | [`NullCacheProvider`] | Disabled | Stores nothing |
//! | [`MokaCacheProvider`] | Local | In-memory cache with per-entry TTL |

#[cfg(feature = "cache-moka")]
pub mod moka;
pub mod null;

#[cfg(feature = "cache-moka")]
pub use moka::MokaCacheProvider;
pub use null::NullCacheProvider;

pub use studagent_domain::ports::providers::CacheEntryConfig;

//! Cache provider tests

use std::time::Duration;

use studagent_domain::ports::providers::{CacheEntryConfig, CacheProvider};
use studagent_providers::cache::{MokaCacheProvider, NullCacheProvider};

#[tokio::test]
async fn test_moka_round_trip_and_delete() {
    let cache = MokaCacheProvider::with_capacity(100);
    cache
        .set_json("k", r#"{"a":1}"#, CacheEntryConfig::new())
        .await
        .unwrap();

    assert_eq!(cache.get_json("k").await.unwrap().as_deref(), Some(r#"{"a":1}"#));
    assert_eq!(cache.size().await.unwrap(), 1);
    assert!(cache.delete("k").await.unwrap());
    assert!(!cache.delete("k").await.unwrap());
    assert!(cache.get_json("k").await.unwrap().is_none());
}

#[tokio::test]
async fn test_moka_entry_ttl_expires() {
    let cache = MokaCacheProvider::with_capacity(100);
    let config = CacheEntryConfig {
        ttl: Some(Duration::from_millis(50)),
        namespace: None,
    };
    cache.set_json("k", "1", config).await.unwrap();
    tokio::time::sleep(Duration::from_millis(120)).await;
    assert!(cache.get_json("k").await.unwrap().is_none());
}

#[tokio::test]
async fn test_moka_clear() {
    let cache = MokaCacheProvider::new();
    for key in ["a", "b", "c"] {
        cache.set_json(key, "1", CacheEntryConfig::new()).await.unwrap();
    }
    cache.clear().await.unwrap();
    assert_eq!(cache.size().await.unwrap(), 0);
}

#[tokio::test]
async fn test_null_cache_stores_nothing() {
    let cache = NullCacheProvider::new();
    cache.set_json("k", "1", CacheEntryConfig::new()).await.unwrap();
    assert!(cache.get_json("k").await.unwrap().is_none());
    assert_eq!(cache.size().await.unwrap(), 0);
}

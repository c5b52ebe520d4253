//! Composition root tests, wired with the offline provider

use std::sync::Arc;

use studagent_domain::{
    DocumentStatus, Error, FeatureCategory, FeatureVector, ProviderDescriptor, TaskStatus,
};
use studagent_infrastructure::bootstrap::{build_cache, resolve_providers};
use studagent_infrastructure::config::AppConfig;
use studagent_infrastructure::init_app_with_keys;
use studagent_infrastructure::stores::{InMemoryDocumentStore, InMemoryProfileRepository};

fn offline_config() -> AppConfig {
    AppConfig {
        providers: vec![
            ProviderDescriptor::new("router", "openrouter", "mistralai/mistral-7b-instruct", 1)
                .with_api_key_ref("OPENROUTER_API_KEY"),
            ProviderDescriptor::new("offline", "null", "null", 9),
        ],
        ..AppConfig::default()
    }
}

fn no_keys(_: &str) -> Option<String> {
    None
}

#[test]
fn test_providers_without_keys_are_skipped() {
    let routed = resolve_providers(&offline_config().providers, no_keys).unwrap();
    let names: Vec<&str> = routed.iter().map(|p| p.descriptor.name.as_str()).collect();
    assert_eq!(names, ["offline"]);
}

#[test]
fn test_key_lookup_enables_provider() {
    let routed = resolve_providers(&offline_config().providers, |var| {
        (var == "OPENROUTER_API_KEY").then(|| "sk-or-test".to_string())
    })
    .unwrap();
    assert_eq!(routed.len(), 2);
}

#[test]
fn test_no_buildable_provider_is_configuration_error() {
    let err = resolve_providers(&AppConfig::default().providers, no_keys).unwrap_err();
    match err {
        Error::Configuration { message, .. } => {
            assert!(message.contains("No LLM provider"));
            assert!(message.contains("mistral-7b"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_cache_selection() {
    let mut config = AppConfig::default();
    let cache = build_cache(&config.cache).unwrap().unwrap();
    assert_eq!(cache.provider_name(), "moka");

    config.cache.enabled = false;
    assert!(build_cache(&config.cache).unwrap().is_none());

    config.cache.enabled = true;
    config.cache.provider = "redis".to_string();
    assert!(build_cache(&config.cache).is_err());
}

#[tokio::test]
async fn test_offline_context_runs_pipeline() {
    let store = Arc::new(InMemoryDocumentStore::new());
    store
        .put_document("doc-1", "Photosynthesis converts light into chemical energy.")
        .await;
    let context = init_app_with_keys(
        offline_config(),
        store.clone(),
        Arc::new(InMemoryProfileRepository::new()),
        no_keys,
    )
    .unwrap();

    let result = context.pipeline().run("doc-1").await.unwrap();
    assert_eq!(result.status, DocumentStatus::Complete);
    assert!(
        result
            .tasks
            .iter()
            .all(|t| t.status() == TaskStatus::Succeeded && t.provider() == Some("offline"))
    );

    let status = context.provider_status();
    assert_eq!(status.len(), 1);
    assert_eq!(status[0].health.total_successes, 3);
}

#[tokio::test]
async fn test_offline_context_ranks_with_explanations() {
    let profiles = InMemoryProfileRepository::from_vectors([
        FeatureVector::new("s1").with(FeatureCategory::Interest, ["ml", "chess"]),
        FeatureVector::new("x").with(FeatureCategory::Interest, ["ml", "music"]),
        FeatureVector::new("y").with(FeatureCategory::Interest, ["chess"]),
    ]);
    let context = init_app_with_keys(
        offline_config(),
        Arc::new(InMemoryDocumentStore::new()),
        Arc::new(profiles),
        no_keys,
    )
    .unwrap();

    let results = context
        .matcher()
        .rank_candidates("s1", &["x".to_string(), "y".to_string()], None)
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.explanation.is_some()));
    assert!(context.cache().is_some());
}

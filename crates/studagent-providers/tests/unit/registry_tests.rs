//! Tests for provider registration
//!
//! Uses `extern crate studagent_providers` to force linkme registration of
//! the real adapters, then resolves them by kind.

extern crate studagent_providers;

use studagent_application::ports::registry::{
    CacheProviderConfig, LlmProviderConfig, list_cache_providers, list_llm_providers,
    resolve_cache_provider, resolve_llm_provider,
};
use studagent_domain::ProviderDescriptor;

#[test]
fn test_all_llm_kinds_are_registered() {
    let providers = list_llm_providers();
    for kind in ["openrouter", "groq", "openai", "gemini", "null"] {
        assert!(
            providers.iter().any(|(name, _)| *name == kind),
            "{kind} should be registered. Available: {providers:?}"
        );
    }
}

#[test]
fn test_api_providers_require_a_key() {
    for kind in ["openrouter", "groq", "openai", "gemini"] {
        let descriptor = ProviderDescriptor::new("p", kind, "m", 1);
        let err = resolve_llm_provider(&LlmProviderConfig::new(descriptor))
            .err()
            .unwrap();
        assert!(err.contains("API key required"), "{kind}: {err}");
    }
}

#[test]
fn test_resolved_provider_keeps_configured_name() {
    let descriptor =
        ProviderDescriptor::new("groq-primary", "groq", "mixtral-8x7b-32768", 6);
    let provider =
        resolve_llm_provider(&LlmProviderConfig::new(descriptor).with_api_key("gsk-test"))
            .unwrap();
    assert_eq!(provider.provider_name(), "groq-primary");
    assert_eq!(provider.model(), "mixtral-8x7b-32768");
}

#[test]
fn test_null_provider_needs_no_key() {
    let descriptor = ProviderDescriptor::new("offline", "null", "null", 1);
    let provider = resolve_llm_provider(&LlmProviderConfig::new(descriptor)).unwrap();
    assert_eq!(provider.provider_name(), "offline");
}

#[test]
fn test_cache_providers_are_registered() {
    let providers = list_cache_providers();
    assert!(providers.iter().any(|(name, _)| *name == "moka"));
    assert!(providers.iter().any(|(name, _)| *name == "null"));

    let cache = resolve_cache_provider(&CacheProviderConfig::new("moka").with_max_entries(10))
        .unwrap();
    assert_eq!(cache.provider_name(), "moka");
    assert!(resolve_cache_provider(&CacheProviderConfig::new("redis")).is_err());
}

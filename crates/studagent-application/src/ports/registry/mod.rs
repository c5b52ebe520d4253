//! Provider Registry System
//!
//! Compile-time registration of provider adapters via linkme distributed
//! slices. Provider crates submit entries; infrastructure resolves them by
//! the `kind` of each configured provider.

/// Cache provider registry
pub mod cache;
/// LLM provider registry
pub mod llm;

pub use cache::{
    CACHE_PROVIDERS, CacheProviderConfig, CacheProviderEntry, list_cache_providers,
    resolve_cache_provider,
};
pub use llm::{
    LLM_PROVIDERS, LlmProviderConfig, LlmProviderEntry, list_llm_providers, resolve_llm_provider,
};

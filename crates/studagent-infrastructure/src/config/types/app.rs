//! Main application configuration

use serde::{Deserialize, Serialize};
use studagent_domain::value_objects::ProviderDescriptor;

pub use super::cache::CacheConfig;
pub use super::logging::LoggingConfig;
pub use super::resilience::BreakerSettings;
pub use super::services::{MatchingSettings, PipelineSettings};
use crate::constants::{
    GEMINI_API_KEY_ENV, GROQ_API_KEY_ENV, OPENROUTER_API_KEY_ENV, PROVIDER_MAX_TOKENS_8K,
    PROVIDER_MAX_TOKENS_32K,
};

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Logging configuration
    pub logging: LoggingConfig,

    /// Circuit breaker configuration
    pub breaker: BreakerSettings,

    /// Document pipeline configuration
    pub pipeline: PipelineSettings,

    /// Matching engine configuration
    pub matching: MatchingSettings,

    /// Ranking cache configuration
    pub cache: CacheConfig,

    /// LLM providers, tried in priority order
    pub providers: Vec<ProviderDescriptor>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            breaker: BreakerSettings::default(),
            pipeline: PipelineSettings::default(),
            matching: MatchingSettings::default(),
            cache: CacheConfig::default(),
            providers: default_providers(),
        }
    }
}

/// Hosted models used when the configuration lists none
///
/// OpenRouter models first, then Groq, with Gemini as the last fallback.
pub fn default_providers() -> Vec<ProviderDescriptor> {
    let openrouter = |name: &str, model: &str, priority: u32, max_tokens: u32| {
        let mut descriptor = ProviderDescriptor::new(name, "openrouter", model, priority)
            .with_api_key_ref(OPENROUTER_API_KEY_ENV);
        descriptor.max_tokens = max_tokens;
        descriptor
    };

    let mut groq = ProviderDescriptor::new("groq", "groq", "mixtral-8x7b-32768", 6)
        .with_api_key_ref(GROQ_API_KEY_ENV);
    groq.max_tokens = PROVIDER_MAX_TOKENS_32K;

    let mut gemini = ProviderDescriptor::new("gemini", "gemini", "gemini-pro", 7)
        .with_api_key_ref(GEMINI_API_KEY_ENV);
    gemini.max_tokens = PROVIDER_MAX_TOKENS_32K;

    vec![
        openrouter("mistral-7b", "mistralai/mistral-7b-instruct", 1, PROVIDER_MAX_TOKENS_8K),
        openrouter("mixtral-8x7b", "mistralai/mixtral-8x7b-instruct", 2, PROVIDER_MAX_TOKENS_32K),
        openrouter("llama-3-8b", "meta-llama/llama-3-8b-instruct", 3, PROVIDER_MAX_TOKENS_8K),
        openrouter("mistral-instruct", "mistralai/mistral-7b-instruct", 4, PROVIDER_MAX_TOKENS_8K),
        openrouter("gemma-7b", "google/gemma-7b-it", 5, PROVIDER_MAX_TOKENS_8K),
        groq,
        gemini,
    ]
}

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Duration;

use super::Capability;
use crate::constants::{
    GENERATION_DEFAULT_MAX_TOKENS, GENERATION_DEFAULT_TEMPERATURE, GENERATION_DEFAULT_TIMEOUT_MS,
};

/// Immutable description of a configured LLM provider
///
/// Loaded once from configuration. The orchestrator orders providers by
/// `priority` (lower first) and filters them by `capabilities`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
    /// Unique provider name, used as breaker and log key
    pub name: String,
    /// Adapter registry key (`openrouter`, `groq`, `openai`, `gemini`, `null`)
    pub kind: String,
    /// Model identifier sent to the vendor
    pub model: String,
    /// Priority rank, lower is preferred
    pub priority: u32,
    /// Capabilities this provider may be used for
    #[serde(default = "all_capabilities")]
    pub capabilities: BTreeSet<Capability>,
    /// Local call budget per minute; `None` means unlimited
    #[serde(default)]
    pub rate_limit_per_minute: Option<u32>,
    /// Override of the adapter's default base URL
    #[serde(default)]
    pub base_url: Option<String>,
    /// Name of the environment variable holding the API key
    #[serde(default)]
    pub api_key_ref: Option<String>,
    /// Per-call timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Token limit used when the request does not set one
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Temperature used when the request does not set one
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn all_capabilities() -> BTreeSet<Capability> {
    Capability::ALL.into_iter().collect()
}

fn default_timeout_ms() -> u64 {
    GENERATION_DEFAULT_TIMEOUT_MS
}

fn default_max_tokens() -> u32 {
    GENERATION_DEFAULT_MAX_TOKENS
}

fn default_temperature() -> f32 {
    GENERATION_DEFAULT_TEMPERATURE
}

impl ProviderDescriptor {
    /// Create a descriptor with default limits
    pub fn new<N, K, M>(name: N, kind: K, model: M, priority: u32) -> Self
    where
        N: Into<String>,
        K: Into<String>,
        M: Into<String>,
    {
        Self {
            name: name.into(),
            kind: kind.into(),
            model: model.into(),
            priority,
            capabilities: all_capabilities(),
            rate_limit_per_minute: None,
            base_url: None,
            api_key_ref: None,
            timeout_ms: GENERATION_DEFAULT_TIMEOUT_MS,
            max_tokens: GENERATION_DEFAULT_MAX_TOKENS,
            temperature: GENERATION_DEFAULT_TEMPERATURE,
        }
    }

    /// Replace the capability set
    pub fn with_capabilities<I: IntoIterator<Item = Capability>>(mut self, caps: I) -> Self {
        self.capabilities = caps.into_iter().collect();
        self
    }

    /// Set the API key environment variable name
    pub fn with_api_key_ref<S: Into<String>>(mut self, var: S) -> Self {
        self.api_key_ref = Some(var.into());
        self
    }

    /// Set the per-call timeout
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set the per-minute call budget
    pub fn with_rate_limit(mut self, per_minute: u32) -> Self {
        self.rate_limit_per_minute = Some(per_minute);
        self
    }

    /// Whether this provider declares the capability
    pub fn supports(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// Per-call timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Token limit for a request, capped by this provider's limit
    pub fn effective_max_tokens(&self, requested: Option<u32>) -> u32 {
        requested.map_or(self.max_tokens, |n| n.min(self.max_tokens))
    }

    /// Temperature for a request
    pub fn effective_temperature(&self, requested: Option<f32>) -> f32 {
        requested.unwrap_or(self.temperature)
    }
}

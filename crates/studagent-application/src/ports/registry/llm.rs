//! LLM Provider Registry
//!
//! Auto-registration system for LLM providers using linkme distributed slices.
//! Providers register themselves via `#[linkme::distributed_slice]` and are
//! discovered at runtime.

use std::sync::Arc;

use studagent_domain::ports::providers::LlmProvider;
use studagent_domain::value_objects::ProviderDescriptor;

/// Configuration for LLM provider creation
///
/// Carries the configured descriptor and the resolved API key. Adapters
/// use what they need and ignore the rest.
#[derive(Debug, Clone)]
pub struct LlmProviderConfig {
    /// Configured provider descriptor
    pub descriptor: ProviderDescriptor,
    /// API key resolved from `descriptor.api_key_ref`
    pub api_key: Option<String>,
}

impl LlmProviderConfig {
    /// Create a config for a descriptor
    pub fn new(descriptor: ProviderDescriptor) -> Self {
        Self {
            descriptor,
            api_key: None,
        }
    }

    /// Set the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// API key, or an error message naming the provider
    pub fn require_api_key(&self) -> Result<&str, String> {
        self.api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| format!("{} API key required", self.descriptor.name))
    }
}

/// Registry entry for LLM providers
///
/// Each adapter registers itself with this entry using
/// `#[linkme::distributed_slice(LLM_PROVIDERS)]`.
pub struct LlmProviderEntry {
    /// Adapter kind (e.g., "openrouter", "groq", "gemini", "null")
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Factory function to create provider instance
    pub factory: fn(&LlmProviderConfig) -> Result<Arc<dyn LlmProvider>, String>,
}

// Auto-collection via linkme distributed slices - providers submit entries at compile time
#[linkme::distributed_slice]
pub static LLM_PROVIDERS: [LlmProviderEntry] = [..];

/// Resolve an LLM provider by the descriptor's `kind`
///
/// # Example
///
/// ```ignore
/// let descriptor = ProviderDescriptor::new("groq", "groq", "mixtral-8x7b-32768", 6);
/// let config = LlmProviderConfig::new(descriptor).with_api_key(key);
/// let provider = resolve_llm_provider(&config)?;
/// ```
pub fn resolve_llm_provider(config: &LlmProviderConfig) -> Result<Arc<dyn LlmProvider>, String> {
    let kind = &config.descriptor.kind;

    for entry in LLM_PROVIDERS {
        if entry.name == kind.as_str() {
            return (entry.factory)(config);
        }
    }

    let available: Vec<&str> = LLM_PROVIDERS.iter().map(|e| e.name).collect();

    Err(format!(
        "Unknown LLM provider kind '{}'. Available providers: {:?}",
        kind, available
    ))
}

/// List all registered LLM providers as (name, description)
pub fn list_llm_providers() -> Vec<(&'static str, &'static str)> {
    LLM_PROVIDERS
        .iter()
        .map(|e| (e.name, e.description))
        .collect()
}

use serde::{Deserialize, Serialize};

/// Limits and hints applied to one generation request
///
/// Unset limits fall back to the provider descriptor's defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationConstraints {
    /// Upper bound on generated tokens
    #[serde(default)]
    pub max_tokens: Option<u32>,
    /// Sampling temperature
    #[serde(default)]
    pub temperature: Option<f32>,
    /// Ask the provider for a JSON reply when it supports it
    #[serde(default)]
    pub json_output: bool,
    /// Restrict and reorder candidate providers by name
    #[serde(default)]
    pub preferred_providers: Vec<String>,
}

impl GenerationConstraints {
    /// Constraints without limits or preferences
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the token limit
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Request JSON output
    pub fn json(mut self) -> Self {
        self.json_output = true;
        self
    }

    /// Only use the named providers, in the given order
    pub fn with_preferred_providers<I, S>(mut self, providers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preferred_providers = providers.into_iter().map(Into::into).collect();
        self
    }
}

/// A normalized provider reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationOutput {
    /// Generated text
    pub text: String,
    /// Name of the provider that produced the text
    pub provider: String,
    /// Model identifier reported by the provider
    pub model: String,
    /// Wall-clock latency of the call
    pub latency_ms: u64,
}

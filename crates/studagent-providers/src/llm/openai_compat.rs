//! OpenAI-compatible Chat Completions Provider
//!
//! Implements the `LlmProvider` port for every API speaking the OpenAI
//! chat completions dialect: OpenRouter, Groq and OpenAI itself. Only the
//! base URL differs between them.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use studagent_application::ports::registry::{LLM_PROVIDERS, LlmProviderConfig, LlmProviderEntry};
use studagent_domain::error::ProviderError;
use studagent_domain::ports::providers::LlmProvider;
use studagent_domain::value_objects::{
    Capability, GenerationConstraints, GenerationOutput, ProviderDescriptor,
};
use tokio::time::Instant;
use tracing::debug;

use super::JSON_ONLY_INSTRUCTION;
use crate::constants::{
    CHAT_COMPLETIONS_PATH, CONTENT_TYPE_JSON, GROQ_BASE_URL, OPENAI_BASE_URL, OPENROUTER_BASE_URL,
};
use crate::utils::{HttpResponseUtils, build_http_client, non_blank};

/// Which OpenAI-compatible service an adapter talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenAiFlavor {
    /// openrouter.ai
    OpenRouter,
    /// api.groq.com
    Groq,
    /// api.openai.com
    OpenAi,
}

impl OpenAiFlavor {
    /// Registry kind of this flavor
    pub fn kind(&self) -> &'static str {
        match self {
            Self::OpenRouter => "openrouter",
            Self::Groq => "groq",
            Self::OpenAi => "openai",
        }
    }

    /// Base URL used when the descriptor sets none
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::OpenRouter => OPENROUTER_BASE_URL,
            Self::Groq => GROQ_BASE_URL,
            Self::OpenAi => OPENAI_BASE_URL,
        }
    }
}

/// Chat completions provider
///
/// Receives its HTTP client via constructor injection.
pub struct OpenAiCompatibleProvider {
    descriptor: ProviderDescriptor,
    api_key: String,
    base_url: String,
    http_client: Client,
}

impl OpenAiCompatibleProvider {
    /// Create a provider
    ///
    /// # Arguments
    /// * `descriptor` - Configured provider (model, limits, optional base URL)
    /// * `flavor` - Service the adapter talks to
    /// * `api_key` - Bearer token
    /// * `http_client` - Reqwest client for making API requests
    pub fn new(
        descriptor: ProviderDescriptor,
        flavor: OpenAiFlavor,
        api_key: &str,
        http_client: Client,
    ) -> Self {
        let base_url = non_blank(descriptor.base_url.as_deref())
            .unwrap_or_else(|| flavor.default_base_url().to_string());
        Self {
            descriptor,
            api_key: api_key.trim().to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
        }
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request body for a prompt
    pub fn request_body(&self, prompt: &str, constraints: &GenerationConstraints) -> serde_json::Value {
        let mut messages = Vec::with_capacity(2);
        if constraints.json_output {
            messages.push(json!({"role": "system", "content": JSON_ONLY_INSTRUCTION}));
        }
        messages.push(json!({"role": "user", "content": prompt}));
        json!({
            "model": self.descriptor.model,
            "messages": messages,
            "max_tokens": self.descriptor.effective_max_tokens(constraints.max_tokens),
            "temperature": self.descriptor.effective_temperature(constraints.temperature),
        })
    }

    /// Extract the reply text from a chat completions response
    pub fn parse_reply(&self, body: &serde_json::Value) -> Result<String, ProviderError> {
        body["choices"][0]["message"]["content"]
            .as_str()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                ProviderError::invalid_response(
                    self.descriptor.name.as_str(),
                    "response has no choices[0].message.content",
                )
            })
    }

    fn timeout(&self) -> Duration {
        self.descriptor.timeout()
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    async fn generate(
        &self,
        capability: Capability,
        prompt: &str,
        constraints: &GenerationConstraints,
    ) -> Result<GenerationOutput, ProviderError> {
        let name = self.descriptor.name.as_str();
        let started = Instant::now();
        debug!(provider = name, capability = %capability, "Sending chat completion request");

        let response = self
            .http_client
            .post(format!("{}{}", self.base_url, CHAT_COMPLETIONS_PATH))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", CONTENT_TYPE_JSON)
            .timeout(self.timeout())
            .json(&self.request_body(prompt, constraints))
            .send()
            .await
            .map_err(|e| HttpResponseUtils::send_error(name, &e, self.timeout()))?;

        let body = HttpResponseUtils::check_and_parse(response, name).await?;
        let text = self.parse_reply(&body)?;
        let model = body["model"]
            .as_str()
            .unwrap_or(&self.descriptor.model)
            .to_string();

        Ok(GenerationOutput {
            text,
            provider: self.descriptor.name.clone(),
            model,
            latency_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        })
    }

    fn provider_name(&self) -> &str {
        &self.descriptor.name
    }

    fn model(&self) -> &str {
        &self.descriptor.model
    }
}

impl std::fmt::Debug for OpenAiCompatibleProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatibleProvider")
            .field("name", &self.descriptor.name)
            .field("model", &self.descriptor.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

fn build(
    config: &LlmProviderConfig,
    flavor: OpenAiFlavor,
) -> Result<Arc<dyn LlmProvider>, String> {
    let api_key = config.require_api_key()?;
    let http_client = build_http_client(config.descriptor.timeout())?;
    Ok(Arc::new(OpenAiCompatibleProvider::new(
        config.descriptor.clone(),
        flavor,
        api_key,
        http_client,
    )))
}

// ============================================================================
// Auto-registration via linkme
// ============================================================================

#[linkme::distributed_slice(LLM_PROVIDERS)]
static OPENROUTER_PROVIDER: LlmProviderEntry = LlmProviderEntry {
    name: "openrouter",
    description: "OpenRouter chat completions (Mistral, Mixtral, Llama, Gemma, ...)",
    factory: |config: &LlmProviderConfig| build(config, OpenAiFlavor::OpenRouter),
};

#[linkme::distributed_slice(LLM_PROVIDERS)]
static GROQ_PROVIDER: LlmProviderEntry = LlmProviderEntry {
    name: "groq",
    description: "Groq OpenAI-compatible chat completions",
    factory: |config: &LlmProviderConfig| build(config, OpenAiFlavor::Groq),
};

#[linkme::distributed_slice(LLM_PROVIDERS)]
static OPENAI_PROVIDER: LlmProviderEntry = LlmProviderEntry {
    name: "openai",
    description: "OpenAI chat completions",
    factory: |config: &LlmProviderConfig| build(config, OpenAiFlavor::OpenAi),
};

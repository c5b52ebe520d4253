//! Gemini Provider
//!
//! Implements the `LlmProvider` port using Google's `generateContent` API.

use std::sync::Arc;

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

use crate::constants::{CONTENT_TYPE_JSON, GEMINI_BASE_URL};
use crate::utils::{HttpResponseUtils, build_http_client, non_blank};

/// Gemini generative language provider
pub struct GeminiProvider {
    descriptor: ProviderDescriptor,
    api_key: String,
    base_url: String,
    http_client: Client,
}

impl GeminiProvider {
    /// Create a provider
    pub fn new(descriptor: ProviderDescriptor, api_key: &str, http_client: Client) -> Self {
        let base_url = non_blank(descriptor.base_url.as_deref())
            .unwrap_or_else(|| GEMINI_BASE_URL.to_string());
        Self {
            descriptor,
            api_key: api_key.trim().to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
        }
    }

    /// Model name for API calls (without the `models/` prefix)
    pub fn api_model_name(&self) -> &str {
        self.descriptor
            .model
            .strip_prefix("models/")
            .unwrap_or(&self.descriptor.model)
    }

    /// Endpoint for `generateContent`
    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url,
            self.api_model_name()
        )
    }

    /// Request body for a prompt
    pub fn request_body(&self, prompt: &str, constraints: &GenerationConstraints) -> serde_json::Value {
        let mut generation_config = json!({
            "maxOutputTokens": self.descriptor.effective_max_tokens(constraints.max_tokens),
            "temperature": self.descriptor.effective_temperature(constraints.temperature),
        });
        if constraints.json_output {
            generation_config["responseMimeType"] = json!(CONTENT_TYPE_JSON);
        }
        json!({
            "contents": [{"role": "user", "parts": [{"text": prompt}]}],
            "generationConfig": generation_config,
        })
    }

    /// Concatenated text parts of the first candidate
    pub fn parse_reply(&self, body: &serde_json::Value) -> Result<String, ProviderError> {
        let text: String = body["candidates"][0]["content"]["parts"]
            .as_array()
            .map(|parts| parts.iter().filter_map(|p| p["text"].as_str()).collect())
            .unwrap_or_default();
        let text = text.trim();
        if text.is_empty() {
            let reason = body["candidates"][0]["finishReason"]
                .as_str()
                .or_else(|| body["promptFeedback"]["blockReason"].as_str())
                .unwrap_or("no content");
            return Err(ProviderError::invalid_response(
                self.descriptor.name.as_str(),
                format!("empty candidate ({reason})"),
            ));
        }
        Ok(text.to_string())
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn generate(
        &self,
        capability: Capability,
        prompt: &str,
        constraints: &GenerationConstraints,
    ) -> Result<GenerationOutput, ProviderError> {
        let name = self.descriptor.name.as_str();
        let timeout = self.descriptor.timeout();
        let started = Instant::now();
        debug!(provider = name, capability = %capability, "Sending generateContent request");

        let response = self
            .http_client
            .post(self.endpoint())
            .header("Content-Type", CONTENT_TYPE_JSON)
            .header("x-goog-api-key", &self.api_key)
            .timeout(timeout)
            .json(&self.request_body(prompt, constraints))
            .send()
            .await
            .map_err(|e| HttpResponseUtils::send_error(name, &e, timeout))?;

        let body = HttpResponseUtils::check_and_parse(response, name).await?;
        let text = self.parse_reply(&body)?;
        let model = body["modelVersion"]
            .as_str()
            .unwrap_or(self.api_model_name())
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

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("name", &self.descriptor.name)
            .field("model", &self.descriptor.model)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Auto-registration via linkme
// ============================================================================

#[linkme::distributed_slice(LLM_PROVIDERS)]
static GEMINI_PROVIDER: LlmProviderEntry = LlmProviderEntry {
    name: "gemini",
    description: "Google Gemini generateContent",
    factory: |config: &LlmProviderConfig| {
        let api_key = config.require_api_key()?;
        let http_client = build_http_client(config.descriptor.timeout())?;
        Ok(Arc::new(GeminiProvider::new(
            config.descriptor.clone(),
            api_key,
            http_client,
        )))
    },
};

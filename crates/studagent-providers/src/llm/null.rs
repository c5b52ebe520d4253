//! Null LLM provider for offline use
//!
//! Answers every capability with a deterministic reply built from the
//! prompt, shaped like the JSON a real model is asked for. No network.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use studagent_application::ports::registry::{LLM_PROVIDERS, LlmProviderConfig, LlmProviderEntry};
use studagent_domain::error::ProviderError;
use studagent_domain::ports::providers::LlmProvider;
use studagent_domain::value_objects::{Capability, GenerationConstraints, GenerationOutput};

/// Words of the prompt echoed back in replies
const ECHO_WORDS: usize = 24;

/// Deterministic offline provider
///
/// # Example
///
/// ```rust
/// use studagent_providers::llm::NullLlmProvider;
///
/// let provider = NullLlmProvider::new("offline");
/// ```
#[derive(Debug, Clone)]
pub struct NullLlmProvider {
    name: String,
    model: String,
}

impl NullLlmProvider {
    /// Create a provider with the given name
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            model: "null".to_string(),
        }
    }

    /// Reply for a capability and prompt
    pub fn reply(capability: Capability, prompt: &str) -> String {
        let content = prompt_content(prompt);
        let echo: Vec<&str> = content.split_whitespace().take(ECHO_WORDS).collect();
        let echo = echo.join(" ");
        let value = match capability {
            Capability::Summarize => json!({
                "title": echo.split_whitespace().take(6).collect::<Vec<_>>().join(" "),
                "summary": echo,
                "key_points": [echo.split_whitespace().take(8).collect::<Vec<_>>().join(" ")],
                "recommended_reading": [],
            }),
            Capability::GenerateFlashcards => json!([
                {"q": "What is this material about?", "a": echo},
            ]),
            Capability::GenerateQuiz => json!([{
                "question": "Which statement appears in the material?",
                "options": [echo, "None of the above", "All of the above", "Not covered"],
                "answer": echo,
                "explanation": "Taken verbatim from the material.",
                "difficulty": "easy",
            }]),
            Capability::ExplainMatch => return format!("Offline match explanation. {echo}"),
        };
        value.to_string()
    }
}

/// Text after the last `Text:`, `Content:` or `Facts:` marker
fn prompt_content(prompt: &str) -> &str {
    ["Text:", "Content:", "Facts:"]
        .iter()
        .filter_map(|marker| prompt.rfind(marker).map(|idx| idx + marker.len()))
        .max()
        .map_or(prompt, |start| &prompt[start..])
        .trim()
}

#[async_trait]
impl LlmProvider for NullLlmProvider {
    async fn generate(
        &self,
        capability: Capability,
        prompt: &str,
        _constraints: &GenerationConstraints,
    ) -> Result<GenerationOutput, ProviderError> {
        Ok(GenerationOutput {
            text: Self::reply(capability, prompt),
            provider: self.name.clone(),
            model: self.model.clone(),
            latency_ms: 0,
        })
    }

    fn provider_name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// ============================================================================
// Auto-registration via linkme
// ============================================================================

#[linkme::distributed_slice(LLM_PROVIDERS)]
static NULL_PROVIDER: LlmProviderEntry = LlmProviderEntry {
    name: "null",
    description: "Deterministic offline provider (development and tests)",
    factory: |config: &LlmProviderConfig| {
        Ok(Arc::new(NullLlmProvider::new(config.descriptor.name.clone())))
    },
};

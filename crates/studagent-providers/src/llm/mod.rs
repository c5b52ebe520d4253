//! LLM Provider Implementations
//!
//! ## Available Providers
//!
//! | Provider | Kind | Description |
//! |----------|------|-------------|
//! | [`OpenAiCompatibleProvider`] | `openrouter`, `groq`, `openai` | Chat completions |
//! | [`GeminiProvider`] | `gemini` | Google `generateContent` |
//! | [`NullLlmProvider`] | `null` | Deterministic offline replies |

#[cfg(feature = "llm-gemini")]
pub mod gemini;
pub mod null;
#[cfg(feature = "llm-openai-compat")]
pub mod openai_compat;

#[cfg(feature = "llm-gemini")]
pub use gemini::GeminiProvider;
pub use null::NullLlmProvider;
#[cfg(feature = "llm-openai-compat")]
pub use openai_compat::{OpenAiCompatibleProvider, OpenAiFlavor};

/// System instruction sent when the caller asks for JSON output
#[cfg(feature = "llm-openai-compat")]
pub(crate) const JSON_ONLY_INSTRUCTION: &str =
    "Respond with valid JSON only. Do not add commentary or code fences.";

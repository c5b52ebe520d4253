//! LLM Provider Port
//!
//! Uniform contract over one LLM vendor. Vendor differences (endpoints,
//! payload shapes, auth headers) stay inside each adapter.

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::value_objects::{Capability, GenerationConstraints, GenerationOutput};

/// Text generation through a single LLM vendor
///
/// Implementations make exactly one outbound call per `generate` and
/// classify every failure into a [`ProviderError`] kind. They enforce
/// their own HTTP timeout; the orchestrator adds an outer one.
///
/// # Example
///
/// ```ignore
/// use studagent_domain::ports::providers::LlmProvider;
///
/// let output = provider
///     .generate(Capability::Summarize, &prompt, &GenerationConstraints::default())
///     .await?;
/// println!("{} answered in {}ms", output.provider, output.latency_ms);
/// ```
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate text for a capability
    async fn generate(
        &self,
        capability: Capability,
        prompt: &str,
        constraints: &GenerationConstraints,
    ) -> Result<GenerationOutput, ProviderError>;

    /// Name of the configured provider (the descriptor name)
    fn provider_name(&self) -> &str;

    /// Model identifier sent to the vendor
    fn model(&self) -> &str;
}

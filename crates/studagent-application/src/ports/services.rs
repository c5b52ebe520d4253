//! Application service interfaces

use async_trait::async_trait;
use studagent_domain::error::Result;
use studagent_domain::value_objects::{Capability, GenerationConstraints, GenerationOutput};

/// Generation routed across providers
///
/// Implemented by [`crate::services::LlmOrchestrator`]. The document
/// pipeline and the matching engine depend on this trait so they can be
/// exercised with scripted generators.
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Generate text for a capability using the first healthy provider
    ///
    /// Fails with `Error::AllProvidersExhausted` when no provider succeeds.
    async fn execute(
        &self,
        capability: Capability,
        prompt: &str,
        constraints: &GenerationConstraints,
    ) -> Result<GenerationOutput>;
}

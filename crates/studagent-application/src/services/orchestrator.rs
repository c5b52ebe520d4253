//! LLM Orchestrator
//!
//! Sequential fallback loop over the configured providers. Candidates are
//! the providers declaring the requested capability, ordered by priority
//! rank and then name. Each is tried at most once per call.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use studagent_domain::error::{Error, ProviderError, Result};
use studagent_domain::ports::providers::LlmProvider;
use studagent_domain::value_objects::{
    Capability, GenerationConstraints, GenerationOutput, ProviderDescriptor,
    ProviderHealthSnapshot,
};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::ports::services::GenerationService;
use crate::resilience::{BreakerConfig, CircuitBreakerRegistry, RateBudgetRegistry};

/// A configured provider paired with its adapter
#[derive(Clone)]
pub struct RoutedProvider {
    /// Configuration of the provider
    pub descriptor: ProviderDescriptor,
    /// Adapter performing the calls
    pub adapter: Arc<dyn LlmProvider>,
}

impl RoutedProvider {
    /// Pair a descriptor with its adapter
    pub fn new(descriptor: ProviderDescriptor, adapter: Arc<dyn LlmProvider>) -> Self {
        Self {
            descriptor,
            adapter,
        }
    }
}

impl std::fmt::Debug for RoutedProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoutedProvider")
            .field("descriptor", &self.descriptor)
            .field("adapter", &self.adapter.provider_name())
            .finish()
    }
}

/// Descriptor plus breaker snapshot, for status output
#[derive(Debug, Clone, Serialize)]
pub struct ProviderStatus {
    /// Provider configuration
    pub descriptor: ProviderDescriptor,
    /// Current breaker view
    pub health: ProviderHealthSnapshot,
}

/// Routes generation requests across providers with fallback
#[derive(Debug)]
pub struct LlmOrchestrator {
    providers: Vec<RoutedProvider>,
    breakers: CircuitBreakerRegistry,
    budgets: RateBudgetRegistry,
}

impl LlmOrchestrator {
    /// Create an orchestrator over a set of providers
    ///
    /// Fails when two providers share a name.
    pub fn new(mut providers: Vec<RoutedProvider>, breaker: BreakerConfig) -> Result<Self> {
        let mut seen = HashSet::new();
        for provider in &providers {
            if !seen.insert(provider.descriptor.name.clone()) {
                return Err(Error::configuration(format!(
                    "Duplicate provider name: {}",
                    provider.descriptor.name
                )));
            }
        }
        providers.sort_by(|a, b| {
            a.descriptor
                .priority
                .cmp(&b.descriptor.priority)
                .then_with(|| a.descriptor.name.cmp(&b.descriptor.name))
        });
        Ok(Self {
            providers,
            breakers: CircuitBreakerRegistry::new(breaker),
            budgets: RateBudgetRegistry::new(),
        })
    }

    /// Configured providers in priority order
    pub fn providers(&self) -> impl Iterator<Item = &ProviderDescriptor> {
        self.providers.iter().map(|p| &p.descriptor)
    }

    /// Breaker registry shared by all calls
    pub fn breakers(&self) -> &CircuitBreakerRegistry {
        &self.breakers
    }

    /// Candidates for a capability, in the order they will be tried
    ///
    /// A non-empty `preferred` list restricts the candidates to the named
    /// providers, in that order. Unknown names are ignored.
    pub fn candidates(
        &self,
        capability: Capability,
        preferred: &[String],
    ) -> Vec<&RoutedProvider> {
        let capable = self
            .providers
            .iter()
            .filter(|p| p.descriptor.supports(capability));
        if preferred.is_empty() {
            return capable.collect();
        }
        let capable: Vec<_> = capable.collect();
        let mut seen = HashSet::new();
        preferred
            .iter()
            .filter(|name| seen.insert(name.as_str()))
            .filter_map(|name| capable.iter().find(|p| p.descriptor.name == *name).copied())
            .collect()
    }

    /// Every provider with its breaker snapshot
    pub fn provider_status(&self) -> Vec<ProviderStatus> {
        self.providers
            .iter()
            .map(|p| ProviderStatus {
                descriptor: p.descriptor.clone(),
                health: self.breakers.get(&p.descriptor.name).snapshot(),
            })
            .collect()
    }

    async fn call_provider(
        provider: &RoutedProvider,
        capability: Capability,
        prompt: &str,
        constraints: &GenerationConstraints,
    ) -> std::result::Result<GenerationOutput, ProviderError> {
        let name = &provider.descriptor.name;
        let timeout = provider.descriptor.timeout();
        match tokio::time::timeout(
            timeout,
            provider.adapter.generate(capability, prompt, constraints),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(ProviderError::timeout(
                name.as_str(),
                format!("no response within {}ms", timeout.as_millis()),
            )),
        }
    }
}

#[async_trait]
impl GenerationService for LlmOrchestrator {
    async fn execute(
        &self,
        capability: Capability,
        prompt: &str,
        constraints: &GenerationConstraints,
    ) -> Result<GenerationOutput> {
        let mut attempted = Vec::new();
        let mut skipped = Vec::new();

        for provider in self.candidates(capability, &constraints.preferred_providers) {
            let name = provider.descriptor.name.as_str();
            let breaker = self.breakers.get(name);

            let permit = match breaker.try_acquire() {
                Ok(permit) => permit,
                Err(_) => {
                    skipped.push(name.to_string());
                    continue;
                }
            };
            if !self
                .budgets
                .try_acquire(name, provider.descriptor.rate_limit_per_minute)
            {
                drop(permit);
                skipped.push(name.to_string());
                continue;
            }

            let started = Instant::now();
            let result = Self::call_provider(provider, capability, prompt, constraints).await;
            let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

            match result {
                Ok(mut output) => {
                    permit.record_success();
                    output.provider = name.to_string();
                    info!(
                        provider = name,
                        capability = %capability,
                        latency_ms,
                        fallbacks = attempted.len(),
                        "Generation succeeded"
                    );
                    return Ok(output);
                }
                Err(err) => {
                    permit.record_failure();
                    warn!(
                        provider = name,
                        capability = %capability,
                        latency_ms,
                        kind = %err.kind,
                        error = %err.message,
                        "Provider call failed, falling back"
                    );
                    attempted.push(name.to_string());
                }
            }
        }

        debug!(capability = %capability, ?attempted, ?skipped, "No provider could serve request");
        Err(Error::AllProvidersExhausted {
            capability,
            attempted,
            skipped,
        })
    }
}

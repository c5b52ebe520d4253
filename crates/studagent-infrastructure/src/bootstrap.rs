//! Composition root
//!
//! Resolves configured providers through the linkme registry and wires
//! the orchestrator, document pipeline and match service around the
//! storage and profile collaborators.
//!
//! ```text
//! AppConfig → registry (linkme) → RoutedProvider[] → LlmOrchestrator
//!                                                     ↓            ↓
//!                             DocumentStore → DocumentPipeline   MatchService ← ProfileRepository
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! let config = ConfigLoader::new().load()?;
//! let context = init_app(config, store, profiles)?;
//! let result = context.pipeline().run("doc-1").await?;
//! ```

use std::sync::Arc;

use studagent_application::ports::registry::{
    LlmProviderConfig, resolve_cache_provider, resolve_llm_provider,
};
use studagent_application::ports::services::GenerationService;
use studagent_application::resilience::BreakerConfig;
use studagent_application::services::{
    DocumentPipeline, LlmOrchestrator, MatchService, PipelineConfig, ProviderStatus,
    RoutedProvider,
};
use studagent_domain::error::{Error, Result};
use studagent_domain::ports::providers::{CacheProvider, LlmProvider};
use studagent_domain::repositories::{DocumentStore, ProfileRepository};
use studagent_domain::value_objects::ProviderDescriptor;
use tracing::{info, warn};

use crate::config::{AppConfig, CacheConfig};

/// Application context: every service built from one configuration
pub struct AppContext {
    config: Arc<AppConfig>,
    orchestrator: Arc<LlmOrchestrator>,
    pipeline: Arc<DocumentPipeline>,
    matcher: Arc<MatchService>,
    cache: Option<Arc<dyn CacheProvider>>,
}

impl AppContext {
    /// Configuration the context was built from
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Provider fallback router
    pub fn orchestrator(&self) -> Arc<LlmOrchestrator> {
        Arc::clone(&self.orchestrator)
    }

    /// Document pipeline
    pub fn pipeline(&self) -> Arc<DocumentPipeline> {
        Arc::clone(&self.pipeline)
    }

    /// Matching engine
    pub fn matcher(&self) -> Arc<MatchService> {
        Arc::clone(&self.matcher)
    }

    /// Ranking cache, when enabled
    pub fn cache(&self) -> Option<Arc<dyn CacheProvider>> {
        self.cache.clone()
    }

    /// Providers with their breaker state, in priority order
    pub fn provider_status(&self) -> Vec<ProviderStatus> {
        self.orchestrator.provider_status()
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("providers", &self.orchestrator.providers().count())
            .field("cache", &self.cache.as_ref().map(|c| c.provider_name()))
            .finish_non_exhaustive()
    }
}

/// Build the application context, reading API keys from the environment
pub fn init_app(
    config: AppConfig,
    store: Arc<dyn DocumentStore>,
    profiles: Arc<dyn ProfileRepository>,
) -> Result<AppContext> {
    init_app_with_keys(config, store, profiles, |var| std::env::var(var).ok())
}

/// Build the application context with a custom API key lookup
pub fn init_app_with_keys<F>(
    config: AppConfig,
    store: Arc<dyn DocumentStore>,
    profiles: Arc<dyn ProfileRepository>,
    api_key: F,
) -> Result<AppContext>
where
    F: Fn(&str) -> Option<String>,
{
    let providers = resolve_providers(&config.providers, api_key)?;
    let orchestrator = Arc::new(LlmOrchestrator::new(
        providers,
        BreakerConfig::from(&config.breaker),
    )?);
    let generator: Arc<dyn GenerationService> = orchestrator.clone();

    let pipeline = Arc::new(DocumentPipeline::new(
        Arc::clone(&generator),
        store,
        PipelineConfig::from(&config.pipeline),
    ));

    let cache = build_cache(&config.cache)?;
    let mut matcher = MatchService::new(
        profiles,
        config.matching.to_matching_config(config.cache.ttl()),
    );
    if config.matching.explain {
        matcher = matcher.with_explanations(generator);
    }
    if let Some(cache) = &cache {
        matcher = matcher.with_cache(Arc::clone(cache));
    }

    info!(
        providers = orchestrator.providers().count(),
        cache = cache.as_ref().map_or("disabled", |c| c.provider_name()),
        "Application context initialized"
    );

    Ok(AppContext {
        config: Arc::new(config),
        orchestrator,
        pipeline,
        matcher: Arc::new(matcher),
        cache,
    })
}

/// Build the adapter for one descriptor
///
/// The key is read through `api_key` from the variable named by
/// `api_key_ref`. Blank keys count as missing.
pub fn build_provider<F>(
    descriptor: &ProviderDescriptor,
    api_key: F,
) -> std::result::Result<Arc<dyn LlmProvider>, String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut provider_config = LlmProviderConfig::new(descriptor.clone());
    if let Some(key) = descriptor
        .api_key_ref
        .as_deref()
        .and_then(api_key)
        .filter(|key| !key.trim().is_empty())
    {
        provider_config = provider_config.with_api_key(key);
    }
    resolve_llm_provider(&provider_config)
}

/// Build an adapter for every descriptor that can be built
///
/// A provider whose key is missing or whose kind is unknown is skipped
/// with a warning. Fails only when no provider is left.
pub fn resolve_providers<F>(
    descriptors: &[ProviderDescriptor],
    api_key: F,
) -> Result<Vec<RoutedProvider>>
where
    F: Fn(&str) -> Option<String>,
{
    let mut routed = Vec::with_capacity(descriptors.len());
    let mut skipped = Vec::new();

    for descriptor in descriptors {
        match build_provider(descriptor, &api_key) {
            Ok(adapter) => routed.push(RoutedProvider::new(descriptor.clone(), adapter)),
            Err(reason) => {
                warn!(provider = %descriptor.name, kind = %descriptor.kind, %reason, "Provider skipped");
                skipped.push(format!("{}: {reason}", descriptor.name));
            }
        }
    }

    if routed.is_empty() {
        return Err(Error::configuration(format!(
            "No LLM provider could be initialized ({})",
            skipped.join("; ")
        )));
    }
    Ok(routed)
}

/// Resolve the ranking cache, `None` when disabled
pub fn build_cache(config: &CacheConfig) -> Result<Option<Arc<dyn CacheProvider>>> {
    if !config.enabled {
        return Ok(None);
    }
    resolve_cache_provider(&config.provider_config())
        .map(Some)
        .map_err(Error::configuration)
}

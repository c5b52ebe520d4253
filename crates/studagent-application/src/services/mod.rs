//! Application services

pub mod matching;
pub mod orchestrator;
pub mod pipeline;
pub mod prompts;
pub mod reply;

pub use matching::{
    DEFAULT_MATCH_CACHE_TTL, MatchService, MatchingConfig, RankOptions, jaccard, rank, score_pair,
    shared_tokens,
};
pub use orchestrator::{LlmOrchestrator, ProviderStatus, RoutedProvider};
pub use pipeline::{DEFAULT_PIPELINE_CONCURRENCY, DocumentPipeline, PipelineConfig};

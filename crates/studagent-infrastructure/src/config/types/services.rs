//! Document pipeline and matching configuration types

use serde::{Deserialize, Serialize};
use std::time::Duration;
use studagent_application::services::{MatchingConfig, PipelineConfig, RankOptions};
use studagent_domain::value_objects::MatchWeights;

/// Document pipeline limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Minimum accepted text length, in characters
    pub min_chars: usize,
    /// Maximum accepted text length, in characters
    pub max_chars: usize,
    /// Characters of source text placed in a prompt
    pub prompt_chars: usize,
    /// Flashcards requested per document
    pub flashcard_count: usize,
    /// Quiz questions requested per document
    pub quiz_questions: usize,
    /// Documents processed concurrently in batch runs
    pub concurrency: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        let defaults = PipelineConfig::default();
        Self {
            min_chars: defaults.min_chars,
            max_chars: defaults.max_chars,
            prompt_chars: defaults.prompt_chars,
            flashcard_count: defaults.flashcard_count,
            quiz_questions: defaults.quiz_questions,
            concurrency: defaults.concurrency,
        }
    }
}

impl From<&PipelineSettings> for PipelineConfig {
    fn from(settings: &PipelineSettings) -> Self {
        Self {
            min_chars: settings.min_chars,
            max_chars: settings.max_chars,
            prompt_chars: settings.prompt_chars,
            flashcard_count: settings.flashcard_count,
            quiz_questions: settings.quiz_questions,
            concurrency: settings.concurrency,
        }
    }
}

/// Matching engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingSettings {
    /// Ask the LLM to explain the top results
    pub explain: bool,
    /// Number of top results that get an explanation
    pub explain_top: usize,
    /// Results scoring below this are dropped
    pub min_score: f64,
    /// Maximum number of results
    pub limit: Option<usize>,
    /// Category weights used when a request carries none
    ///
    /// Unset means the built-in interest/skill/availability split. A
    /// configured table replaces it whole.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<MatchWeights>,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        let options = RankOptions::default();
        Self {
            explain: true,
            explain_top: options.explain_top,
            min_score: options.min_score,
            limit: options.limit,
            weights: None,
        }
    }
}

impl MatchingSettings {
    /// Service configuration, caching rankings for `cache_ttl`
    pub fn to_matching_config(&self, cache_ttl: Duration) -> MatchingConfig {
        MatchingConfig {
            weights: self.weights.clone().unwrap_or_default(),
            options: RankOptions {
                limit: self.limit,
                min_score: self.min_score,
                explain_top: if self.explain { self.explain_top } else { 0 },
            },
            cache_ttl,
        }
    }
}

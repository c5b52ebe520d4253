//! Matching Engine
//!
//! Ranks candidates against a subject by weighted Jaccard overlap of their
//! feature tokens. Scoring is pure and deterministic; the LLM is only used
//! for optional explanation text of the top results.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use studagent_domain::constants::{MATCH_EXPLAIN_MAX_TOKENS, MATCH_EXPLAIN_TOP};
use studagent_domain::error::{Error, Result};
use studagent_domain::ports::providers::{CacheEntryConfig, CacheProvider};
use studagent_domain::repositories::ProfileRepository;
use studagent_domain::value_objects::{
    Capability, FeatureCategory, FeatureVector, GenerationConstraints, MatchResult, MatchWeights,
};
use tracing::{debug, warn};

use super::prompts::match_explanation_prompt;
use crate::ports::services::GenerationService;

/// Candidate pools smaller than this are scored on one thread
const PARALLEL_MIN_LEN: usize = 64;

/// Default lifetime of cached rankings (10 minutes)
pub const DEFAULT_MATCH_CACHE_TTL: Duration = Duration::from_secs(600);

/// Result shaping options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankOptions {
    /// Maximum number of results; `None` keeps all
    pub limit: Option<usize>,
    /// Results scoring below this are dropped
    pub min_score: f64,
    /// Number of top results that get an explanation
    pub explain_top: usize,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            limit: None,
            min_score: 0.0,
            explain_top: MATCH_EXPLAIN_TOP,
        }
    }
}

/// Jaccard overlap |A ∩ B| / |A ∪ B|; zero when both are empty
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

/// Composite score and per-category sub-scores of one pair
///
/// A category with data on neither side scores 0 and its weight is left
/// out of the normalization. Zero-weight categories are not scored.
pub fn score_pair(
    subject: &FeatureVector,
    candidate: &FeatureVector,
    weights: &MatchWeights,
) -> (f64, BTreeMap<FeatureCategory, f64>) {
    let empty = BTreeSet::new();
    let mut sub_scores = BTreeMap::new();
    let mut weighted = 0.0;
    let mut used_weight = 0.0;

    for (category, weight) in weights.active() {
        let (a, b) = (subject.tokens(category), candidate.tokens(category));
        if a.is_none() && b.is_none() {
            sub_scores.insert(category, 0.0);
            continue;
        }
        let score = jaccard(a.unwrap_or(&empty), b.unwrap_or(&empty));
        sub_scores.insert(category, score);
        weighted += weight * score;
        used_weight += weight;
    }

    let composite = if used_weight > 0.0 {
        (weighted / used_weight).clamp(0.0, 1.0)
    } else {
        0.0
    };
    (composite, sub_scores)
}

/// Rank candidates against a subject
///
/// Orders by score descending, ties by candidate id ascending. The subject
/// itself is never ranked.
pub fn rank(
    subject: &FeatureVector,
    candidates: &[FeatureVector],
    weights: &MatchWeights,
    options: &RankOptions,
) -> Vec<MatchResult> {
    let mut results: Vec<MatchResult> = candidates
        .par_iter()
        .with_min_len(PARALLEL_MIN_LEN)
        .filter(|candidate| candidate.entity_id != subject.entity_id)
        .map(|candidate| {
            let (score, sub_scores) = score_pair(subject, candidate, weights);
            MatchResult {
                subject_id: subject.entity_id.clone(),
                candidate_id: candidate.entity_id.clone(),
                score,
                sub_scores,
                rank: 0,
                explanation: None,
            }
        })
        .filter(|result| result.score >= options.min_score)
        .collect();

    results.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.candidate_id.cmp(&b.candidate_id))
    });
    if let Some(limit) = options.limit {
        results.truncate(limit);
    }
    for (idx, result) in results.iter_mut().enumerate() {
        result.rank = idx + 1;
    }
    results
}

/// Tokens shared by both sides, per scored category
pub fn shared_tokens(
    subject: &FeatureVector,
    candidate: &FeatureVector,
    weights: &MatchWeights,
) -> Vec<(FeatureCategory, BTreeSet<String>)> {
    weights
        .active()
        .filter_map(|(category, _)| {
            let a = subject.tokens(category)?;
            let b = candidate.tokens(category)?;
            Some((category, a.intersection(b).cloned().collect()))
        })
        .collect()
}

/// Matching configuration
#[derive(Debug, Clone)]
pub struct MatchingConfig {
    /// Weights used when the caller passes none
    pub weights: MatchWeights,
    /// Result shaping options
    pub options: RankOptions,
    /// Lifetime of cached rankings
    pub cache_ttl: Duration,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            weights: MatchWeights::default(),
            options: RankOptions::default(),
            cache_ttl: DEFAULT_MATCH_CACHE_TTL,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CachedRanking {
    expires_at: DateTime<Utc>,
    results: Vec<MatchResult>,
}

/// Ranks stored profiles, with optional explanations and caching
pub struct MatchService {
    profiles: Arc<dyn ProfileRepository>,
    generator: Option<Arc<dyn GenerationService>>,
    cache: Option<Arc<dyn CacheProvider>>,
    config: MatchingConfig,
}

impl MatchService {
    /// Create a service without explanations or caching
    pub fn new(profiles: Arc<dyn ProfileRepository>, config: MatchingConfig) -> Self {
        Self {
            profiles,
            generator: None,
            cache: None,
            config,
        }
    }

    /// Explain top results through a generation service
    pub fn with_explanations(mut self, generator: Arc<dyn GenerationService>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Cache rankings
    pub fn with_cache(mut self, cache: Arc<dyn CacheProvider>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Rank candidates for a subject
    ///
    /// The subject is skipped if listed among the candidates. Candidates
    /// without a profile are skipped; a missing subject profile is
    /// `Error::NotFound`.
    pub async fn rank_candidates(
        &self,
        subject_id: &str,
        candidate_ids: &[String],
        weights: Option<&MatchWeights>,
    ) -> Result<Vec<MatchResult>> {
        let weights = weights.unwrap_or(&self.config.weights);
        let options = &self.config.options;
        let key = cache_key(subject_id, candidate_ids, weights, options)?;

        if let Some(results) = self.cached(&key).await {
            debug!(subject_id, "Match ranking served from cache");
            return Ok(results);
        }

        let subject = self.profiles.feature_vector(subject_id).await?;
        let mut seen = HashSet::new();
        let mut candidates = Vec::with_capacity(candidate_ids.len());
        for id in candidate_ids {
            if id == subject_id || !seen.insert(id.as_str()) {
                continue;
            }
            match self.profiles.feature_vector(id).await {
                Ok(vector) => candidates.push(vector),
                Err(Error::NotFound { .. }) => {
                    warn!(subject_id, candidate_id = %id, "Candidate profile not found, skipping");
                }
                Err(err) => return Err(err),
            }
        }

        let mut results = rank(&subject, &candidates, weights, options);
        self.explain(&subject, &candidates, weights, &mut results)
            .await;
        self.store(&key, &results).await;
        Ok(results)
    }

    async fn explain(
        &self,
        subject: &FeatureVector,
        candidates: &[FeatureVector],
        weights: &MatchWeights,
        results: &mut [MatchResult],
    ) {
        let Some(generator) = &self.generator else {
            return;
        };
        let top = self.config.options.explain_top.min(results.len());
        let constraints = GenerationConstraints::new().with_max_tokens(MATCH_EXPLAIN_MAX_TOKENS);
        let prompts: Vec<String> = results[..top]
            .iter()
            .map(|result| {
                let shared = candidates
                    .iter()
                    .find(|c| c.entity_id == result.candidate_id)
                    .map(|c| shared_tokens(subject, c, weights))
                    .unwrap_or_default();
                match_explanation_prompt(
                    &result.subject_id,
                    &result.candidate_id,
                    result.score,
                    &shared,
                )
            })
            .collect();

        let replies = futures::future::join_all(
            prompts
                .iter()
                .map(|prompt| generator.execute(Capability::ExplainMatch, prompt, &constraints)),
        )
        .await;

        for (result, reply) in results.iter_mut().zip(replies) {
            result.explanation = match reply {
                Ok(output) => Some(output.text.trim().to_string()).filter(|t| !t.is_empty()),
                Err(err) => {
                    debug!(candidate_id = %result.candidate_id, error = %err, "Match explanation unavailable");
                    None
                }
            };
        }
    }

    async fn cached(&self, key: &str) -> Option<Vec<MatchResult>> {
        let cache = self.cache.as_ref()?;
        let json = match cache.get_json(key).await {
            Ok(json) => json?,
            Err(err) => {
                warn!(error = %err, "Match cache read failed");
                return None;
            }
        };
        match serde_json::from_str::<CachedRanking>(&json) {
            Ok(entry) if entry.expires_at > Utc::now() => Some(entry.results),
            _ => {
                if let Err(err) = cache.delete(key).await {
                    warn!(error = %err, "Match cache eviction failed");
                }
                None
            }
        }
    }

    async fn store(&self, key: &str, results: &[MatchResult]) {
        let Some(cache) = &self.cache else {
            return;
        };
        let ttl = chrono::Duration::from_std(self.config.cache_ttl)
            .unwrap_or_else(|_| chrono::Duration::zero());
        let entry = CachedRanking {
            expires_at: Utc::now() + ttl,
            results: results.to_vec(),
        };
        let stored = match serde_json::to_string(&entry) {
            Ok(json) => {
                let config = CacheEntryConfig::new()
                    .with_ttl_secs(self.config.cache_ttl.as_secs())
                    .with_namespace("matches");
                cache.set_json(key, &json, config).await
            }
            Err(err) => Err(err.into()),
        };
        if let Err(err) = stored {
            warn!(error = %err, "Match cache write failed");
        }
    }
}

/// SHA-256 over the inputs that determine a ranking
fn cache_key(
    subject_id: &str,
    candidate_ids: &[String],
    weights: &MatchWeights,
    options: &RankOptions,
) -> Result<String> {
    let material = serde_json::to_vec(&serde_json::json!({
        "subject": subject_id,
        "candidates": candidate_ids,
        "weights": weights,
        "options": options,
    }))?;
    Ok(format!("match:{}", hex::encode(Sha256::digest(&material))))
}

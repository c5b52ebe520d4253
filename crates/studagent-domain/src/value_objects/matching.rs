use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::constants::{
    MATCH_WEIGHT_AVAILABILITY, MATCH_WEIGHT_INTEREST, MATCH_WEIGHT_SKILL,
    MATCH_WEIGHT_SUM_TOLERANCE,
};
use crate::error::{Error, Result};

/// Profile feature category used for similarity scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeatureCategory {
    /// Topics the entity is interested in
    Interest,
    /// Skills the entity has or offers
    Skill,
    /// Time slots the entity is available
    Availability,
    /// Academic level (year, degree)
    AcademicLevel,
}

impl FeatureCategory {
    /// All categories in scoring order
    pub const ALL: [FeatureCategory; 4] = [
        FeatureCategory::Interest,
        FeatureCategory::Skill,
        FeatureCategory::Availability,
        FeatureCategory::AcademicLevel,
    ];

    /// Wire name of the category
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Interest => "interest",
            Self::Skill => "skill",
            Self::Availability => "availability",
            Self::AcademicLevel => "academic-level",
        }
    }
}

impl std::fmt::Display for FeatureCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FeatureCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "interest" | "interests" => Ok(Self::Interest),
            "skill" | "skills" => Ok(Self::Skill),
            "availability" => Ok(Self::Availability),
            "academic-level" => Ok(Self::AcademicLevel),
            other => Err(Error::validation(format!("Unknown feature category: {other}"))),
        }
    }
}

/// Normalize a raw profile token: trim, lowercase, collapse whitespace
///
/// Returns `None` for tokens that are empty after normalization.
pub fn normalize_token(raw: &str) -> Option<String> {
    let joined = raw
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    if joined.is_empty() { None } else { Some(joined) }
}

/// Normalized token set for one category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "FeatureSetRepr")]
pub struct FeatureSet {
    /// Normalized tokens
    pub tokens: BTreeSet<String>,
    /// Optional numeric weight carried from the profile
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl FeatureSet {
    /// Build a set from raw tokens, normalizing each one
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            tokens: tokens
                .into_iter()
                .filter_map(|t| normalize_token(t.as_ref()))
                .collect(),
            weight: None,
        }
    }

    /// Attach a numeric weight
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Whether the set has no tokens
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Accepted input shapes: a bare token list or the full object
#[derive(Deserialize)]
#[serde(untagged)]
enum FeatureSetRepr {
    List(Vec<String>),
    Full {
        tokens: Vec<String>,
        #[serde(default)]
        weight: Option<f64>,
    },
}

impl From<FeatureSetRepr> for FeatureSet {
    fn from(repr: FeatureSetRepr) -> Self {
        match repr {
            FeatureSetRepr::List(tokens) => FeatureSet::from_tokens(tokens),
            FeatureSetRepr::Full { tokens, weight } => FeatureSet {
                weight,
                ..FeatureSet::from_tokens(tokens)
            },
        }
    }
}

/// Per-entity feature representation used by the matching engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Identifier of the profile owner
    pub entity_id: String,
    /// Token sets by category; a missing key means no data
    #[serde(default)]
    pub features: BTreeMap<FeatureCategory, FeatureSet>,
}

impl FeatureVector {
    /// Create an empty vector for an entity
    pub fn new<S: Into<String>>(entity_id: S) -> Self {
        Self {
            entity_id: entity_id.into(),
            features: BTreeMap::new(),
        }
    }

    /// Set the tokens of one category
    pub fn with<I, S>(mut self, category: FeatureCategory, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.features
            .insert(category, FeatureSet::from_tokens(tokens));
        self
    }

    /// Tokens of a category, `None` when the category is absent or empty
    pub fn tokens(&self, category: FeatureCategory) -> Option<&BTreeSet<String>> {
        self.features
            .get(&category)
            .map(|set| &set.tokens)
            .filter(|tokens| !tokens.is_empty())
    }
}

/// Validated per-category weights summing to 1.0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<FeatureCategory, f64>",
    into = "BTreeMap<FeatureCategory, f64>"
)]
pub struct MatchWeights {
    weights: BTreeMap<FeatureCategory, f64>,
}

impl MatchWeights {
    /// Validate weights: finite, non-negative, summing to 1.0
    pub fn new(weights: BTreeMap<FeatureCategory, f64>) -> Result<Self> {
        for (category, weight) in &weights {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(Error::validation(format!(
                    "Weight for {category} must be a finite non-negative number, got {weight}"
                )));
            }
        }
        let sum: f64 = weights.values().sum();
        if (sum - 1.0).abs() > MATCH_WEIGHT_SUM_TOLERANCE {
            return Err(Error::validation(format!(
                "Match weights must sum to 1.0, got {sum}"
            )));
        }
        Ok(Self { weights })
    }

    /// Rescale arbitrary non-negative weights so they sum to 1.0
    pub fn normalized(weights: BTreeMap<FeatureCategory, f64>) -> Result<Self> {
        if weights.values().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(Error::validation(
                "Match weights must be finite non-negative numbers",
            ));
        }
        let sum: f64 = weights.values().sum();
        if sum <= 0.0 {
            return Err(Error::validation("At least one match weight must be positive"));
        }
        Self::new(weights.into_iter().map(|(c, w)| (c, w / sum)).collect())
    }

    /// Single-category weights
    pub fn only(category: FeatureCategory) -> Self {
        Self {
            weights: BTreeMap::from([(category, 1.0)]),
        }
    }

    /// Weight of a category, zero when unset
    pub fn get(&self, category: FeatureCategory) -> f64 {
        self.weights.get(&category).copied().unwrap_or(0.0)
    }

    /// Categories with a positive weight
    pub fn active(&self) -> impl Iterator<Item = (FeatureCategory, f64)> + '_ {
        self.weights
            .iter()
            .filter(|(_, w)| **w > 0.0)
            .map(|(c, w)| (*c, *w))
    }
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            weights: BTreeMap::from([
                (FeatureCategory::Interest, MATCH_WEIGHT_INTEREST),
                (FeatureCategory::Skill, MATCH_WEIGHT_SKILL),
                (FeatureCategory::Availability, MATCH_WEIGHT_AVAILABILITY),
            ]),
        }
    }
}

impl TryFrom<BTreeMap<FeatureCategory, f64>> for MatchWeights {
    type Error = Error;

    fn try_from(weights: BTreeMap<FeatureCategory, f64>) -> Result<Self> {
        Self::new(weights)
    }
}

impl From<MatchWeights> for BTreeMap<FeatureCategory, f64> {
    fn from(weights: MatchWeights) -> Self {
        weights.weights
    }
}

/// One ranked candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Entity the ranking was computed for
    pub subject_id: String,
    /// Ranked candidate
    pub candidate_id: String,
    /// Composite score in `[0.0, 1.0]`
    pub score: f64,
    /// Jaccard overlap per scored category
    pub sub_scores: BTreeMap<FeatureCategory, f64>,
    /// 1-based position in the ranking
    pub rank: usize,
    /// Optional natural-language explanation
    #[serde(default)]
    pub explanation: Option<String>,
}

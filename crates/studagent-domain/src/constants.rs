//! Domain layer constants
//!
//! Contains constants that are part of the domain logic and are used by
//! the application layer. Infrastructure-specific defaults (file names,
//! environment prefixes) live in `studagent-infrastructure`.

// ============================================================================
// GENERATION DOMAIN CONSTANTS
// ============================================================================

/// Default maximum number of tokens requested from a provider
pub const GENERATION_DEFAULT_MAX_TOKENS: u32 = 4096;

/// Default sampling temperature
pub const GENERATION_DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default per-call provider timeout in milliseconds
pub const GENERATION_DEFAULT_TIMEOUT_MS: u64 = 15_000;

// ============================================================================
// DOCUMENT PIPELINE CONSTANTS
// ============================================================================

/// Minimum accepted length of extracted text, in characters
pub const PIPELINE_MIN_CHARS: usize = 1;

/// Maximum accepted length of extracted text, in characters
pub const PIPELINE_MAX_CHARS: usize = 200_000;

/// Number of characters of source text placed in a prompt
pub const PIPELINE_PROMPT_CHARS: usize = 4_000;

/// Number of flashcards requested per document
pub const PIPELINE_FLASHCARD_COUNT: usize = 10;

/// Number of quiz questions requested per document
pub const PIPELINE_QUIZ_QUESTIONS: usize = 5;

// ============================================================================
// MATCHING DOMAIN CONSTANTS
// ============================================================================

/// Default weight of the interest category
pub const MATCH_WEIGHT_INTEREST: f64 = 0.4;

/// Default weight of the skill category
pub const MATCH_WEIGHT_SKILL: f64 = 0.4;

/// Default weight of the availability category
pub const MATCH_WEIGHT_AVAILABILITY: f64 = 0.2;

/// Tolerance used when checking that weights sum to one
pub const MATCH_WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Number of top results that receive an LLM explanation
pub const MATCH_EXPLAIN_TOP: usize = 3;

/// Token limit of one match explanation
pub const MATCH_EXPLAIN_MAX_TOKENS: u32 = 200;

//! Provider Constants
//!
//! Constants specific to provider implementations. Domain defaults (token
//! limits, timeouts) live in `studagent-domain`.

// ============================================================================
// LLM API ENDPOINTS
// ============================================================================

/// OpenRouter OpenAI-compatible API
pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Groq OpenAI-compatible API
pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// OpenAI API
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Gemini generative language API
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Chat completions path shared by OpenAI-compatible APIs
pub const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";

// ============================================================================
// HTTP
// ============================================================================

/// JSON content type
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// User agent sent with every API request
pub const USER_AGENT: &str = concat!("studagent/", env!("CARGO_PKG_VERSION"));

/// Longest error body kept in a provider error message
pub const ERROR_BODY_MAX_CHARS: usize = 300;

// ============================================================================
// CACHE
// ============================================================================

/// Default maximum number of cached entries
pub const CACHE_DEFAULT_MAX_ENTRIES: u64 = 10_000;

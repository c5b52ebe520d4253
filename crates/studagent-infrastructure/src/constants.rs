//! Infrastructure constants
//!
//! File names, environment prefixes and defaults for the configuration
//! sections owned by this layer.

use std::time::Duration;

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "studagent.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "studagent";

/// Environment variable prefix for configuration overrides
pub const CONFIG_ENV_PREFIX: &str = "STUDAGENT";

/// Separator between nested keys in environment overrides
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable holding a `tracing` filter directive
pub const LOG_FILTER_ENV: &str = "STUDAGENT_LOG";

// ============================================================================
// PROVIDER CONSTANTS
// ============================================================================

/// Environment variable holding the OpenRouter key
pub const OPENROUTER_API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Environment variable holding the Groq key
pub const GROQ_API_KEY_ENV: &str = "GROQ_API_KEY";

/// Environment variable holding the Gemini key
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Token limit of 8k-context models
pub const PROVIDER_MAX_TOKENS_8K: u32 = 8_192;

/// Token limit of 32k-context models
pub const PROVIDER_MAX_TOKENS_32K: u32 = 32_768;

// ============================================================================
// CACHE CONSTANTS
// ============================================================================

/// Default cache provider
pub const DEFAULT_CACHE_PROVIDER: &str = "moka";

/// Default cache TTL
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(600);

/// Default maximum number of cache entries
pub const DEFAULT_CACHE_MAX_ENTRIES: u64 = 10_000;

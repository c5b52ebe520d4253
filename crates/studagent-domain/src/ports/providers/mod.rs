//! External Provider Ports
//!
//! | Port | Description |
//! |------|-------------|
//! | LlmProvider | Text generation through one LLM vendor |
//! | CacheProvider | JSON cache backend for match results |

/// Cache provider port
pub mod cache;
/// LLM provider port
pub mod llm;

pub use cache::{CacheEntryConfig, CacheProvider, DEFAULT_CACHE_TTL_SECS};
pub use llm::LlmProvider;

//! # Studagent - Provider Implementations
//!
//! User-selectable adapters behind the ports defined in `studagent-domain`.
//! Each adapter submits an entry to the registries declared in
//! `studagent-application` and is resolved by `kind` at bootstrap.
//!
//! ## Provider Categories
//!
//! | Category | Port | Implementations |
//! |----------|------|-----------------|
//! | LLM | `LlmProvider` | OpenRouter, Groq, OpenAI, Gemini, Null |
//! | Cache | `CacheProvider` | Moka, Null |
//!
//! ## Feature Flags
//!
//! ```toml
//! [dependencies]
//! studagent-providers = { version = "0.1", default-features = false, features = ["llm-gemini"] }
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use studagent_providers::llm::OpenAiCompatibleProvider;
//! use studagent_providers::cache::MokaCacheProvider;
//! ```

pub use studagent_domain::error::{Error, ProviderError, Result};
pub use studagent_domain::ports::providers::{CacheProvider, LlmProvider};

/// Provider-specific constants
pub mod constants;

/// Shared utilities for provider implementations
pub mod utils;

/// LLM provider implementations
///
/// Implements the `LlmProvider` trait for chat completion APIs.
pub mod llm;

/// Cache provider implementations
///
/// Implements the `CacheProvider` trait for caching backends.
pub mod cache;

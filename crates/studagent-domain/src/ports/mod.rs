//! Domain Port Interfaces
//!
//! Boundary contracts implemented by the provider and infrastructure
//! layers. High-level services depend on these traits only.

/// External service provider ports
pub mod providers;

pub use providers::{CacheEntryConfig, CacheProvider, LlmProvider};

//! Configuration
//!
//! Typed configuration sections and the figment-based loader that merges
//! defaults, a TOML file and `STUDAGENT_*` environment overrides.

pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::*;

//! Application Layer - Studagent
//!
//! Orchestrates the domain: provider resilience, the LLM fallback loop,
//! the document pipeline and the matching engine.
//!
//! ## Architecture
//!
//! The application layer:
//! - Owns provider health (circuit breakers, rate budgets)
//! - Routes generation requests across providers in priority order
//! - Turns document text into study material, one task at a time
//! - Ranks candidate profiles against a subject
//!
//! ## Ports
//!
//! - `ports::registry::*`: linkme registry that provider adapters submit to
//! - `ports::services::*`: service interfaces consumed across services
//!
//! ## Dependencies
//!
//! This crate depends only on:
//! - `studagent-domain`: entities, value objects and port traits
//! - Pure Rust libraries for async, concurrency and serialization

pub mod ports;
pub mod resilience;
pub mod services;

pub use ports::*;
pub use resilience::*;
pub use services::*;

//! # Studagent
//!
//! AI core of a student-productivity application: turns documents into
//! summaries, flashcards and quizzes through a set of interchangeable LLM
//! providers, and ranks students, mentors and groups by profile overlap.
//!
//! ## Architecture
//!
//! - `domain` - Errors, value objects, entities and port traits
//! - `application` - Circuit breakers, provider fallback, pipeline, matching
//! - `infrastructure` - Configuration, logging, collaborators and wiring
//! - `cli` - The `studagent` command line
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use studagent::infrastructure::{ConfigLoader, init_app};
//! use studagent::infrastructure::stores::{InMemoryDocumentStore, InMemoryProfileRepository};
//!
//! let config = ConfigLoader::new().load()?;
//! let store = Arc::new(InMemoryDocumentStore::new());
//! store.put_document("doc-1", "Mitochondria produce ATP.").await;
//! let context = init_app(config, store, Arc::new(InMemoryProfileRepository::new()))?;
//! let result = context.pipeline().run("doc-1").await?;
//! ```

// Force-link studagent-providers so its linkme registrations are included
extern crate studagent_providers;

pub mod cli;

/// Domain layer - core types
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use studagent_domain::*;
}

/// Application layer - orchestration services
///
/// Re-exports from the application crate for convenience
pub mod application {
    pub use studagent_application::*;
}

/// Infrastructure layer - config, logging and bootstrap
///
/// Re-exports from the infrastructure crate for convenience
pub mod infrastructure {
    pub use studagent_infrastructure::*;
}

// Re-export commonly used domain types at the crate root
pub use domain::*;

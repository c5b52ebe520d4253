//! In-memory collaborators
//!
//! Reference implementations of the storage and profile ports, used by
//! the CLI and by tests. Production deployments plug in their own.

pub mod document;
pub mod profile;

pub use document::InMemoryDocumentStore;
pub use profile::InMemoryProfileRepository;

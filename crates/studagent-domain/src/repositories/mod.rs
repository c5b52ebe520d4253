//! Repository Interfaces
//!
//! Collaborators that own persistent data outside the AI core.
//!
//! ## Repositories
//!
//! | Repository | Description |
//! |------------|-------------|
//! | [`DocumentStore`] | Extracted document text and generation task state |
//! | [`ProfileRepository`] | Feature vectors of student, mentor and group profiles |

/// Document storage collaborator
pub mod document_store;
/// Profile collaborator
pub mod profile_repository;

pub use document_store::DocumentStore;
pub use profile_repository::ProfileRepository;

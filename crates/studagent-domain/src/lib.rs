//! # Studagent Domain
//!
//! Core types shared by every layer of the Studagent AI core: the error
//! taxonomy, value objects describing providers, generation requests and
//! feature vectors, the generation task entity and the port traits that
//! external collaborators implement.
//!
//! ## Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`error`] | Domain error type and provider error classification |
//! | [`value_objects`] | Capabilities, provider descriptors, matching types |
//! | [`entities`] | Generation tasks and document pipeline results |
//! | [`ports`] | Provider ports (LLM, cache) |
//! | [`repositories`] | Storage and profile collaborator ports |
//! | [`constants`] | Domain-wide defaults |

pub mod constants;
pub mod entities;
pub mod error;
pub mod ports;
pub mod repositories;
pub mod value_objects;

pub use entities::*;
pub use error::{Error, ProviderError, ProviderErrorKind, Result};
pub use value_objects::*;

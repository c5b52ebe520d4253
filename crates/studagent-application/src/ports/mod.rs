//! Application Ports
//!
//! - **registry/** - linkme registries that provider crates submit adapters to
//! - **services** - service interfaces shared between application services

/// Provider registries
pub mod registry;
/// Application service interfaces
pub mod services;

pub use registry::*;
pub use services::*;

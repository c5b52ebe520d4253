//! Configuration types module

pub mod app;
pub mod cache;
pub mod logging;
pub mod resilience;
pub mod services;

// Re-export main types
pub use app::*;

//! # Infrastructure Layer
//!
//! Cross-cutting technical concerns that support the application and
//! domain layers.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | TOML + environment configuration via figment |
//! | [`logging`] | Structured logging with tracing |
//! | [`error_ext`] | Context extensions for foreign errors |
//! | [`stores`] | In-memory document and profile collaborators |
//! | [`bootstrap`] | Composition root wiring every service |
//! | [`constants`] | File names, prefixes and defaults |

// Provider adapters register through linkme; linking the crate is enough.
extern crate studagent_providers;

pub mod bootstrap;
pub mod config;
pub mod constants;
pub mod error_ext;
pub mod logging;
pub mod stores;

pub use bootstrap::{AppContext, init_app, init_app_with_keys};
pub use config::{AppConfig, ConfigLoader};
pub use error_ext::ErrorContext;
pub use logging::init_logging;

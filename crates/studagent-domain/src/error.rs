//! Error handling types

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::value_objects::Capability;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Classification of a failed provider call
///
/// Adapters surface nothing but these five kinds. Every kind is eligible
/// for fallback to the next provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderErrorKind {
    /// The vendor rejected the call because of quota or rate limits
    RateLimited,
    /// The call did not finish within its timeout
    Timeout,
    /// The vendor answered with something that could not be used
    InvalidResponse,
    /// Credentials were missing or rejected
    Unauthorized,
    /// The vendor could not be reached or reported a server error
    Unavailable,
}

impl ProviderErrorKind {
    /// Stable identifier used in logs and status output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RateLimited => "rate_limited",
            Self::Timeout => "timeout",
            Self::InvalidResponse => "invalid_response",
            Self::Unauthorized => "unauthorized",
            Self::Unavailable => "unavailable",
        }
    }
}

impl std::fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by a single provider adapter call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("provider {provider} failed ({kind}): {message}")]
pub struct ProviderError {
    /// Name of the provider that failed
    pub provider: String,
    /// Failure classification
    pub kind: ProviderErrorKind,
    /// Vendor or transport detail
    pub message: String,
}

impl ProviderError {
    /// Create a provider error of the given kind
    pub fn new<P: Into<String>, S: Into<String>>(
        provider: P,
        kind: ProviderErrorKind,
        message: S,
    ) -> Self {
        Self {
            provider: provider.into(),
            kind,
            message: message.into(),
        }
    }

    /// Create a rate-limited error
    pub fn rate_limited<P: Into<String>, S: Into<String>>(provider: P, message: S) -> Self {
        Self::new(provider, ProviderErrorKind::RateLimited, message)
    }

    /// Create a timeout error
    pub fn timeout<P: Into<String>, S: Into<String>>(provider: P, message: S) -> Self {
        Self::new(provider, ProviderErrorKind::Timeout, message)
    }

    /// Create an invalid-response error
    pub fn invalid_response<P: Into<String>, S: Into<String>>(provider: P, message: S) -> Self {
        Self::new(provider, ProviderErrorKind::InvalidResponse, message)
    }

    /// Create an unauthorized error
    pub fn unauthorized<P: Into<String>, S: Into<String>>(provider: P, message: S) -> Self {
        Self::new(provider, ProviderErrorKind::Unauthorized, message)
    }

    /// Create an unavailable error
    pub fn unavailable<P: Into<String>, S: Into<String>>(provider: P, message: S) -> Self {
        Self::new(provider, ProviderErrorKind::Unavailable, message)
    }
}

/// Main error type for the Studagent core
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (simple form)
    #[error("I/O error: {source}")]
    IoSimple {
        /// The underlying I/O error
        #[from]
        source: std::io::Error,
    },

    /// I/O operation error (with context)
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// JSON parsing or serialization error
    #[error("JSON parsing error: {source}")]
    Json {
        /// The underlying JSON error
        #[from]
        source: serde_json::Error,
    },

    /// A single provider call failed
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The provider's circuit breaker refused the call
    #[error("Circuit open for provider {provider}")]
    CircuitOpen {
        /// Provider whose breaker is open
        provider: String,
    },

    /// Every capable provider was skipped or failed
    #[error(
        "All providers exhausted for {capability} (attempted: {attempted:?}, skipped: {skipped:?})"
    )]
    AllProvidersExhausted {
        /// Capability that was requested
        capability: Capability,
        /// Providers that were called and failed, in order
        attempted: Vec<String>,
        /// Providers that were skipped without a call
        skipped: Vec<String>,
    },

    /// Input rejected before any work was done
    #[error("Validation error: {message}")]
    Validation {
        /// Description of the rejected input
        message: String,
    },

    /// A generation task failed; recorded on the task, never fatal to siblings
    #[error("Task {task_id} failed: {message}")]
    TaskFailed {
        /// Identifier of the failed task
        task_id: String,
        /// Failure detail
        message: String,
    },

    /// Resource not found error
    #[error("Not found: {resource}")]
    NotFound {
        /// The resource that was not found
        resource: String,
    },

    /// Configuration-related error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Storage collaborator error
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage error
        message: String,
    },

    /// Cache operation error
    #[error("Cache error: {message}")]
    Cache {
        /// Description of the cache error
        message: String,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },
}

// Basic error creation methods
impl Error {
    /// Create a validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create a circuit-open error
    pub fn circuit_open<S: Into<String>>(provider: S) -> Self {
        Self::CircuitOpen {
            provider: provider.into(),
        }
    }

    /// Create a task failure error
    pub fn task_failed<T: Into<String>, S: Into<String>>(task_id: T, message: S) -> Self {
        Self::TaskFailed {
            task_id: task_id.into(),
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage<S: Into<String>>(message: S) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create a cache error
    pub fn cache<S: Into<String>>(message: S) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

// I/O and configuration error creation methods
impl Error {
    /// Create an I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn configuration_with_source<
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        message: S,
        source: E,
    ) -> Self {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Classification helpers used by the orchestration layer
impl Error {
    /// Provider error kind, if this error came from a provider call
    pub fn provider_kind(&self) -> Option<ProviderErrorKind> {
        match self {
            Self::Provider(err) => Some(err.kind),
            _ => None,
        }
    }

    /// Whether the error is a routing signal rather than a failure
    pub fn is_circuit_open(&self) -> bool {
        matches!(self, Self::CircuitOpen { .. })
    }

    /// Whether the error rejects the caller's input
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

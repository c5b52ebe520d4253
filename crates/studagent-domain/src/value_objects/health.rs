use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Circuit breaker state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CircuitState {
    /// Calls pass through
    Closed,
    /// Calls are rejected until the cooldown expires
    Open,
    /// A single trial call is allowed
    HalfOpen,
}

impl std::fmt::Display for CircuitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Closed => write!(f, "closed"),
            Self::Open => write!(f, "open"),
            Self::HalfOpen => write!(f, "half-open"),
        }
    }
}

/// Read-only view of one provider's breaker, for status reporting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderHealthSnapshot {
    /// Provider name
    pub provider: String,
    /// Current state
    pub state: CircuitState,
    /// Failures of the current streak that fall inside the window
    pub consecutive_failures: u32,
    /// When the state last changed
    pub last_state_change: DateTime<Utc>,
    /// When an open breaker allows a trial
    pub open_until: Option<DateTime<Utc>>,
    /// Cooldown applied on the next trip, in milliseconds
    pub current_cooldown_ms: u64,
    /// Whether a half-open trial is in flight
    pub trial_in_flight: bool,
    /// Total successful calls recorded
    pub total_successes: u64,
    /// Total failed calls recorded
    pub total_failures: u64,
    /// Calls rejected without reaching the provider
    pub total_rejections: u64,
    /// Number of times the breaker opened
    pub times_opened: u64,
}

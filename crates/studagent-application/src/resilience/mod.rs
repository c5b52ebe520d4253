//! Provider Resilience
//!
//! Per-provider circuit breakers and local rate budgets. Both are keyed
//! by provider name and shared by every caller of the orchestrator.

pub mod circuit_breaker;
pub mod rate_budget;

pub use circuit_breaker::{BreakerConfig, BreakerPermit, CircuitBreaker, CircuitBreakerRegistry};
pub use rate_budget::{RateBudget, RateBudgetRegistry};

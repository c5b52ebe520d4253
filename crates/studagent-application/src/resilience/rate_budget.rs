//! Local per-minute call budget per provider
//!
//! Fixed one-minute windows. An exhausted budget makes the orchestrator
//! skip the provider without a network call and without a breaker failure.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use dashmap::DashMap;
use tokio::time::Instant;
use tracing::debug;

const BUDGET_WINDOW: Duration = Duration::from_secs(60);

#[derive(Debug)]
struct Window {
    started: Instant,
    used: u32,
}

/// Call budget of one provider
#[derive(Debug)]
pub struct RateBudget {
    limit: Option<u32>,
    window: Mutex<Window>,
}

impl RateBudget {
    /// Budget of `limit` calls per minute; `None` never runs out
    pub fn new(limit: Option<u32>) -> Self {
        Self {
            limit,
            window: Mutex::new(Window {
                started: Instant::now(),
                used: 0,
            }),
        }
    }

    /// Consume one call if the current window has room
    pub fn try_acquire(&self) -> bool {
        let Some(limit) = self.limit else {
            return true;
        };
        let mut window = self.window.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();
        if now.duration_since(window.started) >= BUDGET_WINDOW {
            window.started = now;
            window.used = 0;
        }
        if window.used < limit {
            window.used += 1;
            true
        } else {
            false
        }
    }
}

/// Budgets keyed by provider name
#[derive(Debug, Default)]
pub struct RateBudgetRegistry {
    budgets: DashMap<String, RateBudget>,
}

impl RateBudgetRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one call from a provider's budget
    pub fn try_acquire(&self, provider: &str, limit: Option<u32>) -> bool {
        let allowed = self
            .budgets
            .entry(provider.to_string())
            .or_insert_with(|| RateBudget::new(limit))
            .try_acquire();
        if !allowed {
            debug!(provider, "Rate budget exhausted for the current minute");
        }
        allowed
    }
}

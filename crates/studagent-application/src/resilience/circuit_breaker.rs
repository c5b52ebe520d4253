//! Circuit Breaker Module
//!
//! Per-provider health tracker that stops calling a failing provider for a
//! cooldown. State lives behind a single mutex so every transition is one
//! critical section; the lock is never held across an `.await`.
//!
//! ```text
//! CLOSED --F failures within W--> OPEN --cooldown elapsed--> HALF_OPEN
//!   ^                               ^                            |
//!   |                               +------- trial fails --------+
//!   +------------------------------- trial succeeds -------------+
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use studagent_domain::error::{Error, Result};
use studagent_domain::value_objects::{CircuitState, ProviderHealthSnapshot};
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Default number of failures that trips a breaker
pub const DEFAULT_FAILURE_THRESHOLD: u32 = 5;
/// Default failure counting window (10 minutes)
pub const DEFAULT_FAILURE_WINDOW: Duration = Duration::from_secs(10 * 60);
/// Default first cooldown (30 minutes)
pub const DEFAULT_BASE_COOLDOWN: Duration = Duration::from_secs(30 * 60);
/// Default cooldown multiplier after a failed trial
pub const DEFAULT_BACKOFF_FACTOR: f64 = 2.0;
/// Default cooldown cap (2 hours)
pub const DEFAULT_MAX_COOLDOWN: Duration = Duration::from_secs(2 * 60 * 60);

/// Circuit breaker configuration, shared by every provider
#[derive(Debug, Clone, PartialEq)]
pub struct BreakerConfig {
    /// Failures within `window` that open the circuit
    pub failure_threshold: u32,
    /// Window in which failures are counted
    pub window: Duration,
    /// Cooldown after the first trip
    pub base_cooldown: Duration,
    /// Cooldown multiplier applied when a trial fails
    pub backoff_factor: f64,
    /// Upper bound on the cooldown
    pub max_cooldown: Duration,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            window: DEFAULT_FAILURE_WINDOW,
            base_cooldown: DEFAULT_BASE_COOLDOWN,
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
            max_cooldown: DEFAULT_MAX_COOLDOWN,
        }
    }
}

impl BreakerConfig {
    /// Next cooldown after a failed trial
    ///
    /// Saturates at `max_cooldown` when the product is not a valid duration.
    fn backoff(&self, current: Duration) -> Duration {
        Duration::try_from_secs_f64(current.as_secs_f64() * self.backoff_factor.max(1.0))
            .unwrap_or(self.max_cooldown)
            .min(self.max_cooldown)
    }
}

/// Mutable health record of one provider
#[derive(Debug)]
struct ProviderHealth {
    state: CircuitState,
    // Failure times of the current streak that still fall inside the window
    recent_failures: VecDeque<Instant>,
    last_state_change: DateTime<Utc>,
    open_until: Option<Instant>,
    current_cooldown: Duration,
    trial_in_flight: bool,
    // Bumped on every transition; outcomes admitted under an older
    // generation are not applied to the state.
    generation: u64,
    total_successes: u64,
    total_failures: u64,
    total_rejections: u64,
    times_opened: u64,
}

impl ProviderHealth {
    fn new(base_cooldown: Duration) -> Self {
        Self {
            state: CircuitState::Closed,
            recent_failures: VecDeque::new(),
            last_state_change: Utc::now(),
            open_until: None,
            current_cooldown: base_cooldown,
            trial_in_flight: false,
            generation: 0,
            total_successes: 0,
            total_failures: 0,
            total_rejections: 0,
            times_opened: 0,
        }
    }

    fn transition(&mut self, to: CircuitState) {
        self.state = to;
        self.last_state_change = Utc::now();
        self.generation += 1;
        self.trial_in_flight = false;
    }

    fn record_failure_at(&mut self, now: Instant, window: Duration) {
        while self
            .recent_failures
            .front()
            .is_some_and(|first| now.duration_since(*first) > window)
        {
            self.recent_failures.pop_front();
        }
        self.recent_failures.push_back(now);
    }

    fn failures_in_window(&self) -> u32 {
        u32::try_from(self.recent_failures.len()).unwrap_or(u32::MAX)
    }

    fn open(&mut self, now: Instant) {
        self.transition(CircuitState::Open);
        // None when the cooldown lies beyond the clock's range: stays open
        self.open_until = now.checked_add(self.current_cooldown);
        self.times_opened += 1;
    }
}

/// Circuit breaker for a single provider
#[derive(Debug)]
pub struct CircuitBreaker {
    provider: String,
    config: BreakerConfig,
    health: Mutex<ProviderHealth>,
}

impl CircuitBreaker {
    /// Create a closed breaker
    pub fn new<S: Into<String>>(provider: S, config: BreakerConfig) -> Self {
        let health = ProviderHealth::new(config.base_cooldown);
        Self {
            provider: provider.into(),
            config,
            health: Mutex::new(health),
        }
    }

    /// Provider this breaker guards
    pub fn provider(&self) -> &str {
        &self.provider
    }

    fn lock(&self) -> MutexGuard<'_, ProviderHealth> {
        self.health.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Promote OPEN to HALF_OPEN once the cooldown has elapsed
    fn refresh(&self, health: &mut ProviderHealth, now: Instant) {
        if health.state == CircuitState::Open
            && health.open_until.is_some_and(|until| now >= until)
        {
            health.transition(CircuitState::HalfOpen);
            info!(provider = %self.provider, "Circuit breaker half-open, allowing one trial call");
        }
    }

    /// Current state, applying any due OPEN to HALF_OPEN promotion
    pub fn state(&self) -> CircuitState {
        let mut health = self.lock();
        self.refresh(&mut health, Instant::now());
        health.state
    }

    /// Ask to make a call
    ///
    /// Returns `Error::CircuitOpen` while the breaker is open, and while a
    /// half-open trial is already in flight. The returned permit must be
    /// settled with [`BreakerPermit::record_success`] or
    /// [`BreakerPermit::record_failure`].
    pub fn try_acquire(&self) -> Result<BreakerPermit<'_>> {
        let mut health = self.lock();
        let now = Instant::now();
        self.refresh(&mut health, now);

        let trial = match health.state {
            CircuitState::Closed => false,
            CircuitState::HalfOpen if !health.trial_in_flight => {
                health.trial_in_flight = true;
                true
            }
            CircuitState::Open | CircuitState::HalfOpen => {
                health.total_rejections += 1;
                debug!(
                    provider = %self.provider,
                    state = %health.state,
                    "Call rejected by circuit breaker"
                );
                return Err(Error::circuit_open(&self.provider));
            }
        };

        Ok(BreakerPermit {
            breaker: self,
            generation: health.generation,
            trial,
            settled: false,
        })
    }

    fn on_success(&self, generation: u64, trial: bool) {
        let mut health = self.lock();
        health.total_successes += 1;
        if health.generation != generation {
            return;
        }
        match health.state {
            CircuitState::Closed => health.recent_failures.clear(),
            CircuitState::HalfOpen if trial => {
                health.transition(CircuitState::Closed);
                health.recent_failures.clear();
                health.open_until = None;
                health.current_cooldown = self.config.base_cooldown;
                info!(provider = %self.provider, "Circuit breaker closed after successful trial");
            }
            _ => {}
        }
    }

    fn on_failure(&self, generation: u64, trial: bool) {
        let mut health = self.lock();
        let now = Instant::now();
        health.total_failures += 1;
        if health.generation != generation {
            return;
        }
        match health.state {
            CircuitState::Closed => {
                health.record_failure_at(now, self.config.window);
                if health.failures_in_window() >= self.config.failure_threshold {
                    health.open(now);
                    warn!(
                        provider = %self.provider,
                        failures = health.failures_in_window(),
                        cooldown_secs = health.current_cooldown.as_secs(),
                        "Circuit breaker opened"
                    );
                }
            }
            CircuitState::HalfOpen if trial => {
                health.record_failure_at(now, self.config.window);
                health.current_cooldown = self.config.backoff(health.current_cooldown);
                health.open(now);
                warn!(
                    provider = %self.provider,
                    cooldown_secs = health.current_cooldown.as_secs(),
                    "Circuit breaker trial failed, reopening"
                );
            }
            _ => {}
        }
    }

    fn release_trial(&self, generation: u64) {
        let mut health = self.lock();
        if health.generation == generation && health.state == CircuitState::HalfOpen {
            health.trial_in_flight = false;
            debug!(provider = %self.provider, "Half-open trial abandoned, slot released");
        }
    }

    /// Read-only view for status reporting
    pub fn snapshot(&self) -> ProviderHealthSnapshot {
        let mut health = self.lock();
        let now = Instant::now();
        self.refresh(&mut health, now);
        let open_until = match (health.state, health.open_until) {
            (CircuitState::Open, Some(until)) => {
                chrono::Duration::from_std(until.saturating_duration_since(now))
                    .ok()
                    .and_then(|remaining| Utc::now().checked_add_signed(remaining))
            }
            _ => None,
        };
        ProviderHealthSnapshot {
            provider: self.provider.clone(),
            state: health.state,
            consecutive_failures: health.failures_in_window(),
            last_state_change: health.last_state_change,
            open_until,
            current_cooldown_ms: u64::try_from(health.current_cooldown.as_millis())
                .unwrap_or(u64::MAX),
            trial_in_flight: health.trial_in_flight,
            total_successes: health.total_successes,
            total_failures: health.total_failures,
            total_rejections: health.total_rejections,
            times_opened: health.times_opened,
        }
    }
}

/// Admission to call a provider, issued by [`CircuitBreaker::try_acquire`]
///
/// Dropping an unsettled trial permit frees the half-open slot without
/// recording an outcome.
#[derive(Debug)]
pub struct BreakerPermit<'a> {
    breaker: &'a CircuitBreaker,
    generation: u64,
    trial: bool,
    settled: bool,
}

impl BreakerPermit<'_> {
    /// Whether this permit is the half-open trial
    pub fn is_trial(&self) -> bool {
        self.trial
    }

    /// Record a successful call
    pub fn record_success(mut self) {
        self.settled = true;
        self.breaker.on_success(self.generation, self.trial);
    }

    /// Record a failed call
    pub fn record_failure(mut self) {
        self.settled = true;
        self.breaker.on_failure(self.generation, self.trial);
    }
}

impl Drop for BreakerPermit<'_> {
    fn drop(&mut self) {
        if !self.settled && self.trial {
            self.breaker.release_trial(self.generation);
        }
    }
}

/// Breakers keyed by provider name, created on first use
#[derive(Debug, Default)]
pub struct CircuitBreakerRegistry {
    config: BreakerConfig,
    breakers: DashMap<String, Arc<CircuitBreaker>>,
}

impl CircuitBreakerRegistry {
    /// Create an empty registry
    pub fn new(config: BreakerConfig) -> Self {
        Self {
            config,
            breakers: DashMap::new(),
        }
    }

    /// Breaker for a provider
    pub fn get(&self, provider: &str) -> Arc<CircuitBreaker> {
        self.breakers
            .entry(provider.to_string())
            .or_insert_with(|| Arc::new(CircuitBreaker::new(provider, self.config.clone())))
            .clone()
    }

    /// Snapshots of every known breaker, sorted by provider name
    pub fn snapshots(&self) -> Vec<ProviderHealthSnapshot> {
        let mut all: Vec<_> = self
            .breakers
            .iter()
            .map(|entry| entry.value().snapshot())
            .collect();
        all.sort_by(|a, b| a.provider.cmp(&b.provider));
        all
    }

    /// Shared configuration
    pub fn config(&self) -> &BreakerConfig {
        &self.config
    }
}

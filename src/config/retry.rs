//! Retry policy for the REST data service.
//!
//! A failed attempt is classified by [`RetryCause`]. Whether it is retried
//! depends on the cause and on whether replaying the request is safe:
//!
//! | Cause          | Reached the server? | Replayed for          |
//! |----------------|---------------------|-----------------------|
//! | `RateLimited`  | refused             | every method          |
//! | `Connect`      | no                  | every method          |
//! | `ServerError`  | maybe applied       | replayable methods    |
//! | `Timeout`      | maybe applied       | replayable methods    |
//!
//! Replayable methods are `GET`, `HEAD`, `PUT`, `PATCH` and `DELETE`. A
//! `PATCH` here always sets fields to absolute values, so sending it twice
//! leaves the record as sending it once. `POST` creates a record (or a
//! session, or an API key) on every delivery and is only replayed when
//! [`RetryConfig::retry_non_idempotent`] is set.

use std::time::Duration;

/// Why an attempt produced no usable response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryCause {
    /// HTTP 429. The server refused the request without handling it.
    RateLimited,
    /// No connection could be established.
    Connect,
    /// HTTP 5xx.
    ServerError,
    /// No response arrived in time.
    Timeout,
}

impl RetryCause {
    /// Returns `true` if the server may already have applied the request.
    pub fn may_have_applied(self) -> bool {
        matches!(self, RetryCause::ServerError | RetryCause::Timeout)
    }
}

/// Returns `true` if sending a request with `method` twice has the same
/// effect on the data service as sending it once.
pub fn is_replayable(method: &str) -> bool {
    matches!(method, "GET" | "HEAD" | "PUT" | "PATCH" | "DELETE" | "OPTIONS")
}

/// Retry behavior of the REST service.
///
/// Delays double from `initial_delay` up to `max_delay`, each spread by
/// `jitter`. A `Retry-After` header on a 429 overrides the computed delay.
///
/// ## Default Values
///
/// - `max_retries`: 2
/// - `initial_delay`: 100ms
/// - `max_delay`: 5s
/// - `jitter`: 0.1 (10%)
/// - `retry_on_timeout`: true
/// - `retry_non_idempotent`: false
///
/// ## Example
///
/// ```rust
/// use staffdesk::RetryConfig;
/// use staffdesk::config::RetryCause;
/// use std::time::Duration;
///
/// let config = RetryConfig::new()
///     .with_max_retries(4)
///     .with_initial_delay(Duration::from_millis(250));
///
/// assert!(config.should_retry("DELETE", RetryCause::ServerError, 1));
/// assert!(!config.should_retry("POST", RetryCause::Timeout, 1));
/// assert!(config.should_retry("POST", RetryCause::RateLimited, 1));
/// ```
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Attempts allowed after the first one.
    pub max_retries: u32,

    /// Delay before the first retry.
    pub initial_delay: Duration,

    /// Upper bound on any single delay.
    pub max_delay: Duration,

    /// Fraction of the delay added or removed at random (0.0 to 1.0).
    pub jitter: f64,

    /// Whether timed-out requests are retried at all.
    pub retry_on_timeout: bool,

    /// Whether `POST` is replayed after a server error or a timeout.
    pub retry_non_idempotent: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(5),
            jitter: 0.1,
            retry_on_timeout: true,
            retry_non_idempotent: false,
        }
    }
}

impl RetryConfig {
    /// Creates a retry policy with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// A policy that never retries.
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Sets the number of attempts allowed after the first one.
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the delay before the first retry.
    #[must_use]
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Sets the upper bound on any single delay.
    #[must_use]
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Sets the jitter fraction, clamped to `0.0..=1.0`.
    #[must_use]
    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter.clamp(0.0, 1.0);
        self
    }

    /// Sets whether timed-out requests are retried.
    #[must_use]
    pub fn with_retry_on_timeout(mut self, retry: bool) -> Self {
        self.retry_on_timeout = retry;
        self
    }

    /// Allows `POST` to be replayed after a server error or a timeout.
    ///
    /// Only safe against a data service that deduplicates creates.
    #[must_use]
    pub fn with_retry_non_idempotent(mut self, retry: bool) -> Self {
        self.retry_non_idempotent = retry;
        self
    }

    /// Decides whether attempt number `attempt` (1-based) of a `method`
    /// request, which failed with `cause`, is followed by another attempt.
    pub fn should_retry(&self, method: &str, cause: RetryCause, attempt: u32) -> bool {
        if attempt > self.max_retries {
            return false;
        }
        if cause == RetryCause::Timeout && !self.retry_on_timeout {
            return false;
        }
        !cause.may_have_applied() || is_replayable(method) || self.retry_non_idempotent
    }

    /// Delay to wait after failed attempt number `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let doublings = attempt.saturating_sub(1).min(31);
        let base = self
            .initial_delay
            .saturating_mul(1u32 << doublings)
            .min(self.max_delay)
            .as_secs_f64();

        let spread = base * self.jitter;
        let jittered = base + (fastrand::f64() * 2.0 - 1.0) * spread;
        Duration::from_secs_f64(jittered.max(0.0))
    }

    /// Returns `true` if any retry is allowed.
    pub fn is_enabled(&self) -> bool {
        self.max_retries > 0
    }
}

//! Retry and backoff policy configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Retry policy for remote service calls
///
/// The policy is immutable per caller instance. Backoff between attempts
/// doubles from `base_backoff_ms` and is capped at `max_backoff_ms`; the
/// caller applies jitter on top of these bounds.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetryPolicy {
    /// Maximum number of retries for a single call
    pub max_retries: u32,

    /// Base backoff before the first retry, in milliseconds
    pub base_backoff_ms: u64,

    /// Upper bound on any single backoff, in milliseconds
    pub max_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_backoff_ms: 100,
            max_backoff_ms: 10_000,
        }
    }
}

impl RetryPolicy {
    /// Create a new retry policy
    pub fn new(max_retries: u32, base_backoff_ms: u64, max_backoff_ms: u64) -> Self {
        Self {
            max_retries,
            base_backoff_ms,
            max_backoff_ms,
        }
    }

    /// Set the maximum number of retries
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Base backoff as a `Duration`
    pub fn base_backoff(&self) -> Duration {
        Duration::from_millis(self.base_backoff_ms)
    }

    /// Maximum backoff as a `Duration`
    pub fn max_backoff(&self) -> Duration {
        Duration::from_millis(self.max_backoff_ms)
    }
}

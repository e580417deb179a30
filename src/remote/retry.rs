//! Retry policy for remote generation calls.
//!
//! `delay` is a pure function of the attempt number so the schedule can be tested
//! without waiting; jitter is layered on top by the caller's RNG.

use crate::error::RemoteServiceError;
use rand::Rng;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub factor: u32,
    pub max_delay_ms: u64,
    /// Upper bound of the uniform random jitter added to each delay
    pub jitter_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay_ms: 1000,
            factor: 2,
            max_delay_ms: 5000,
            jitter_ms: 250,
        }
    }
}

impl RetryPolicy {
    /// Backoff before retry number `attempt` (0-based): `min(base * factor^attempt, cap)`.
    pub fn delay(&self, attempt: u32) -> Duration {
        let multiplier = u64::from(self.factor).saturating_pow(attempt);
        let millis = self
            .base_delay_ms
            .saturating_mul(multiplier)
            .min(self.max_delay_ms);
        Duration::from_millis(millis)
    }

    /// `delay(attempt)` plus uniform jitter in `[0, jitter_ms]`.
    pub fn jittered_delay<R: Rng>(&self, attempt: u32, rng: &mut R) -> Duration {
        let jitter = if self.jitter_ms == 0 {
            0
        } else {
            rng.random_range(0..=self.jitter_ms)
        };
        self.delay(attempt) + Duration::from_millis(jitter)
    }

    /// Whether a failure after `attempts_made` attempts deserves another try.
    pub fn should_retry(&self, attempts_made: u32, error: &RemoteServiceError) -> bool {
        error.is_retryable() && attempts_made <= self.max_retries
    }
}

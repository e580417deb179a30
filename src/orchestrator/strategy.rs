//! Strategy selection and request deadlines.

use crate::types::{GenerationMethod, GenerationOptions};
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    TryRemote,
    Fallback,
}

/// Starting state of a request: remote first unless it is disabled or bypassed.
pub fn select_strategy(options: &GenerationOptions, remote_enabled: bool) -> Strategy {
    if options.force_fallback || options.skip_remote || !remote_enabled {
        Strategy::Fallback
    } else {
        Strategy::TryRemote
    }
}

/// A value tagged with the strategy that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct Generated<T> {
    pub method: GenerationMethod,
    pub value: T,
    pub retries: u32,
    pub model_used: String,
}

impl<T> Generated<T> {
    pub fn remote(value: T, retries: u32, model_used: impl Into<String>) -> Self {
        Self {
            method: GenerationMethod::Remote,
            value,
            retries,
            model_used: model_used.into(),
        }
    }

    pub fn fallback(value: T, retries: u32, model_used: impl Into<String>) -> Self {
        Self {
            method: GenerationMethod::Fallback,
            value,
            retries,
            model_used: model_used.into(),
        }
    }
}

/// Wall-clock budget for one request
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    limit: Option<Duration>,
}

impl Deadline {
    pub fn start(limit: Option<Duration>) -> Self {
        Self {
            started: Instant::now(),
            limit,
        }
    }

    /// Time left, or `None` when the request is unbounded
    pub fn remaining(&self) -> Option<Duration> {
        self.limit
            .map(|limit| limit.saturating_sub(self.started.elapsed()))
    }

    /// Instant the request must finish by, or `None` when unbounded
    pub fn expires_at(&self) -> Option<Instant> {
        self.limit.map(|limit| self.started + limit)
    }

    pub fn limit_ms(&self) -> u64 {
        self.limit.map_or(0, |limit| limit.as_millis() as u64)
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }
}

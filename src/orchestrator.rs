//! Generation Orchestrators
//!
//! Each request runs a small state machine: validate, try the remote service when
//! allowed, fall back to local generation on any remote failure, and stamp the
//! result with [`MetaInfo`]. Remote always finishes before fallback starts.

use crate::error::{
    FallbackGenerationError, IntelligenceError, RemoteErrorCode, RemoteServiceError,
    SolutionGenerationError,
};
use crate::hmw::HmwFallbackGenerator;
use crate::solution::{SolutionBatch, SolutionFallbackGenerator};
use crate::types::{HmwContext, HmwItem, HmwResult, MetaInfo};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

pub mod hmw;
pub mod solution;
pub mod strategy;

pub use hmw::HmwOrchestrator;
pub use solution::SolutionOrchestrator;
pub use strategy::{select_strategy, Deadline, Generated, Strategy};

/// Confidence given to remote items that do not report one
pub const DEFAULT_REMOTE_CONFIDENCE: f64 = 0.8;

/// Model label for remote responses that omit `model_used`
pub const REMOTE_MODEL_LABEL: &str = "remote-service";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestrationConfig {
    /// Smallest remaining deadline budget worth starting a fallback with
    #[serde(default = "default_min_fallback_budget_ms")]
    pub min_fallback_budget_ms: u64,

    /// Largest `count` a single request may ask for
    #[serde(default = "default_max_count")]
    pub max_count: usize,
}

fn default_min_fallback_budget_ms() -> u64 {
    1000
}

fn default_max_count() -> usize {
    50
}

impl Default for OrchestrationConfig {
    fn default() -> Self {
        Self {
            min_fallback_budget_ms: default_min_fallback_budget_ms(),
            max_count: default_max_count(),
        }
    }
}

impl OrchestrationConfig {
    pub fn min_fallback_budget(&self) -> Duration {
        Duration::from_millis(self.min_fallback_budget_ms)
    }
}

/// Local HMW generation seam
#[async_trait]
pub trait HmwGenerator: Send + Sync {
    async fn generate_hmws(
        &self,
        context: &HmwContext,
        count: usize,
        temperature: f32,
    ) -> Result<Vec<HmwResult>, FallbackGenerationError>;

    fn model_name(&self) -> &str;
}

/// Local solution generation seam
#[async_trait]
pub trait SolutionGenerator: Send + Sync {
    async fn generate_solutions(
        &self,
        hmws: &[HmwItem],
        context: &HmwContext,
        count: usize,
        temperature: f32,
    ) -> Result<SolutionBatch, SolutionGenerationError>;

    fn model_name(&self) -> &str;
}

#[async_trait]
impl HmwGenerator for HmwFallbackGenerator {
    async fn generate_hmws(
        &self,
        context: &HmwContext,
        count: usize,
        temperature: f32,
    ) -> Result<Vec<HmwResult>, FallbackGenerationError> {
        HmwFallbackGenerator::generate_hmws(self, context, count, temperature).await
    }

    fn model_name(&self) -> &str {
        HmwFallbackGenerator::model_name(self)
    }
}

#[async_trait]
impl SolutionGenerator for SolutionFallbackGenerator {
    async fn generate_solutions(
        &self,
        hmws: &[HmwItem],
        context: &HmwContext,
        count: usize,
        temperature: f32,
    ) -> Result<SolutionBatch, SolutionGenerationError> {
        SolutionFallbackGenerator::generate_solutions(self, hmws, context, count, temperature).await
    }

    fn model_name(&self) -> &str {
        SolutionFallbackGenerator::model_name(self)
    }
}

/// Run a remote call inside whatever is left of the request deadline.
/// An elapsed deadline reads as a remote `TIMEOUT`; generators that watch the
/// deadline themselves return first with their own attempt count.
pub(crate) async fn remote_within<T, F>(deadline: &Deadline, call: F) -> Result<T, RemoteServiceError>
where
    F: Future<Output = Result<T, RemoteServiceError>>,
{
    match deadline.expires_at() {
        None => call.await,
        Some(expires_at) => match tokio::time::timeout_at(expires_at, call).await {
            Ok(result) => result,
            Err(_) => Err(RemoteServiceError::new(
                RemoteErrorCode::Timeout,
                format!("request deadline of {}ms elapsed", deadline.limit_ms()),
            )),
        },
    }
}

/// Run the fallback, never past the deadline.
///
/// After a failed remote attempt the fallback only starts with at least `min_budget`
/// left. A request that went straight to fallback gets whatever budget it has.
pub(crate) async fn fallback_within<T, E, F>(
    deadline: &Deadline,
    min_budget: Duration,
    attempted_remote: bool,
    operation: &str,
    call: F,
) -> Result<T, IntelligenceError>
where
    F: Future<Output = Result<T, E>>,
    E: Into<IntelligenceError>,
{
    let timeout_error = || IntelligenceError::Timeout {
        operation: operation.to_string(),
        timeout_ms: deadline.limit_ms(),
    };
    match deadline.remaining() {
        None => call.await.map_err(Into::into),
        Some(remaining) if attempted_remote && remaining < min_budget => Err(timeout_error()),
        Some(remaining) => match tokio::time::timeout(remaining, call).await {
            Ok(result) => result.map_err(Into::into),
            Err(_) => Err(timeout_error()),
        },
    }
}

pub(crate) fn meta<T>(generated: &Generated<T>, deadline: &Deadline) -> MetaInfo {
    MetaInfo {
        duration_ms: deadline.elapsed_ms(),
        retries: generated.retries,
        model_used: generated.model_used.clone(),
        generation_method: generated.method,
        timestamp: chrono::Utc::now(),
    }
}

/// Retries a failed remote call spent before giving up
pub(crate) fn retries_spent(error: &RemoteServiceError) -> u32 {
    error.attempts.saturating_sub(1)
}

//! Remote Generation Client
//!
//! Talks to the specialized remote generation service: bounded per-attempt timeout,
//! status classification, and jittered exponential backoff for transient failures.
//! Caller errors (bad request, auth, validation, unknown endpoint) are never retried.

use crate::error::{RemoteErrorCode, RemoteServiceError};
use crate::types::{GenerationOptions, HmwContext, HmwItem};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

pub mod payload;
pub mod retry;
pub mod transport;

pub use payload::{
    HmwGenerationRequest, HmwGenerationResponse, RemoteHmw, RemoteSolution,
    SolutionGenerationRequest, SolutionGenerationResponse,
};
pub use retry::RetryPolicy;
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport, TransportError};

/// Remote service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
    #[serde(default = "default_backoff_factor")]
    pub backoff_factor: u32,
    #[serde(default = "default_backoff_cap_ms")]
    pub backoff_cap_ms: u64,
    #[serde(default = "default_jitter_ms")]
    pub jitter_ms: u64,
    #[serde(default = "default_health_timeout_ms")]
    pub health_timeout_ms: u64,
    #[serde(default = "default_hmw_endpoint")]
    pub hmw_endpoint: String,
    #[serde(default = "default_solution_endpoint")]
    pub solution_endpoint: String,
    #[serde(default = "default_health_endpoint")]
    pub health_endpoint: String,
}

fn default_true() -> bool {
    true
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_max_retries() -> u32 {
    2
}

fn default_backoff_base_ms() -> u64 {
    1000
}

fn default_backoff_factor() -> u32 {
    2
}

fn default_backoff_cap_ms() -> u64 {
    5000
}

fn default_jitter_ms() -> u64 {
    250
}

fn default_health_timeout_ms() -> u64 {
    3000
}

fn default_hmw_endpoint() -> String {
    "/v1/hmw/generate".to_string()
}

fn default_solution_endpoint() -> String {
    "/v1/solutions/generate".to_string()
}

fn default_health_endpoint() -> String {
    "/health".to_string()
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            base_url: default_base_url(),
            api_key: None,
            timeout_ms: default_timeout_ms(),
            max_retries: default_max_retries(),
            backoff_base_ms: default_backoff_base_ms(),
            backoff_factor: default_backoff_factor(),
            backoff_cap_ms: default_backoff_cap_ms(),
            jitter_ms: default_jitter_ms(),
            health_timeout_ms: default_health_timeout_ms(),
            hmw_endpoint: default_hmw_endpoint(),
            solution_endpoint: default_solution_endpoint(),
            health_endpoint: default_health_endpoint(),
        }
    }
}

impl RemoteConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.enabled && self.base_url.trim().is_empty() {
            return Err("Remote base_url cannot be empty while enabled".to_string());
        }
        if self.enabled
            && !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://"))
        {
            return Err(format!("Remote base_url must be an http(s) URL: {}", self.base_url));
        }
        if self.timeout_ms == 0 {
            return Err("Remote timeout_ms must be greater than zero".to_string());
        }
        if self.backoff_cap_ms < self.backoff_base_ms {
            return Err("Remote backoff_cap_ms cannot be below backoff_base_ms".to_string());
        }
        for endpoint in [
            &self.hmw_endpoint,
            &self.solution_endpoint,
            &self.health_endpoint,
        ] {
            if !endpoint.starts_with('/') {
                return Err(format!("Remote endpoint must start with '/': {}", endpoint));
            }
        }
        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            base_delay_ms: self.backoff_base_ms,
            factor: self.backoff_factor,
            max_delay_ms: self.backoff_cap_ms,
            jitter_ms: self.jitter_ms,
        }
    }
}

/// A decoded remote response plus the retries spent getting it
#[derive(Debug, Clone)]
pub struct RemoteOutcome<T> {
    pub value: T,
    pub retries: u32,
}

/// Remote generation seam used by the orchestrators
#[async_trait]
pub trait RemoteGenerator: Send + Sync {
    /// Whether remote generation is configured at all
    fn is_enabled(&self) -> bool;

    /// `deadline` is the instant the whole request must finish by; implementations
    /// should not start an attempt or a backoff they cannot finish before it.
    async fn generate_hmws(
        &self,
        context: &HmwContext,
        options: &GenerationOptions,
        deadline: Option<Instant>,
    ) -> Result<RemoteOutcome<HmwGenerationResponse>, RemoteServiceError>;

    async fn generate_solutions(
        &self,
        hmws: &[HmwItem],
        context: &HmwContext,
        options: &GenerationOptions,
        deadline: Option<Instant>,
    ) -> Result<RemoteOutcome<SolutionGenerationResponse>, RemoteServiceError>;

    /// Best-effort health probe. Never fails; problems read as "unavailable".
    async fn is_available(&self) -> bool;
}

/// HTTP client for the remote generation service
pub struct RemoteClient {
    config: RemoteConfig,
    policy: RetryPolicy,
    transport: Arc<dyn HttpTransport>,
}

impl RemoteClient {
    pub fn new(config: RemoteConfig) -> Result<Self, RemoteServiceError> {
        let transport = ReqwestTransport::new()
            .map_err(|e| RemoteServiceError::new(RemoteErrorCode::ConnectionFailed, e.to_string()))?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: RemoteConfig, transport: Arc<dyn HttpTransport>) -> Self {
        let policy = config.retry_policy();
        Self {
            config,
            policy,
            transport,
        }
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint)
    }

    fn headers(&self) -> Vec<(String, String)> {
        let mut headers = vec![(
            "Content-Type".to_string(),
            "application/json".to_string(),
        )];
        if let Some(api_key) = &self.config.api_key {
            headers.push(("Authorization".to_string(), format!("Bearer {}", api_key)));
        }
        headers
    }

    /// POST `payload` to `endpoint`, retrying transient failures per the retry policy.
    ///
    /// Each attempt is cut off at `deadline`, and a retry whose backoff would run past
    /// it is not taken; the last failure is returned with the attempts actually made.
    pub async fn generate<T>(
        &self,
        endpoint: &str,
        payload: &Value,
        deadline: Option<Instant>,
    ) -> Result<RemoteOutcome<T>, RemoteServiceError>
    where
        T: DeserializeOwned + Send,
    {
        let url = self.url(endpoint);
        let headers = self.headers();
        let mut attempts: u32 = 0;

        loop {
            attempts += 1;
            match self.attempt::<T>(&url, payload, &headers, deadline).await {
                Ok(value) => {
                    if attempts > 1 {
                        info!(endpoint, attempts, "Remote generation succeeded after retry");
                    }
                    return Ok(RemoteOutcome {
                        value,
                        retries: attempts - 1,
                    });
                }
                Err(err) => {
                    let err = err.with_attempts(attempts);
                    if !self.policy.should_retry(attempts, &err) {
                        warn!(
                            endpoint,
                            attempts,
                            code = %err.code,
                            error = %err.message,
                            "Remote generation failed"
                        );
                        return Err(err);
                    }
                    let delay = self.policy.jittered_delay(attempts - 1, &mut rand::rng());
                    if deadline.is_some_and(|d| Instant::now() + delay >= d) {
                        warn!(
                            endpoint,
                            attempts,
                            code = %err.code,
                            delay_ms = delay.as_millis() as u64,
                            "Request deadline leaves no room for another retry"
                        );
                        return Err(err);
                    }
                    warn!(
                        endpoint,
                        attempt = attempts,
                        code = %err.code,
                        delay_ms = delay.as_millis() as u64,
                        "Remote generation attempt failed, retrying after backoff"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    async fn attempt<T>(
        &self,
        url: &str,
        payload: &Value,
        headers: &[(String, String)],
        deadline: Option<Instant>,
    ) -> Result<T, RemoteServiceError>
    where
        T: DeserializeOwned,
    {
        let now = Instant::now();
        let mut cutoff = now + Duration::from_millis(self.config.timeout_ms);
        if let Some(deadline) = deadline {
            cutoff = cutoff.min(deadline);
        }
        let budget = cutoff.saturating_duration_since(now);
        let response = match tokio::time::timeout_at(
            cutoff,
            self.transport.post_json(url, payload, headers, budget),
        )
        .await
        {
            Err(_) | Ok(Err(TransportError::Timeout(_))) => {
                return Err(RemoteServiceError::new(
                    RemoteErrorCode::Timeout,
                    format!("No response within {}ms", budget.as_millis()),
                ));
            }
            Ok(Err(TransportError::Connection(message))) => {
                return Err(RemoteServiceError::new(
                    RemoteErrorCode::ConnectionFailed,
                    message,
                ));
            }
            Ok(Ok(response)) => response,
        };

        if let Some(code) = RemoteErrorCode::from_status(response.status) {
            return Err(RemoteServiceError::new(
                code,
                format!(
                    "HTTP {}: {}",
                    response.status,
                    truncate_chars(&response.body, 200)
                ),
            )
            .with_status(response.status));
        }

        serde_json::from_str::<T>(&response.body).map_err(|e| {
            RemoteServiceError::new(
                RemoteErrorCode::InvalidResponse,
                format!("Failed to decode remote response: {}", e),
            )
            .with_status(response.status)
        })
    }

    pub async fn health_check(&self) -> bool {
        if !self.config.enabled {
            return false;
        }
        let url = self.url(&self.config.health_endpoint);
        let timeout = Duration::from_millis(self.config.health_timeout_ms);
        match tokio::time::timeout(timeout, self.transport.get(&url, &self.headers(), timeout)).await
        {
            Ok(Ok(response)) if (200..300).contains(&response.status) => true,
            Ok(Ok(response)) => {
                debug!(status = response.status, "Remote health probe returned non-success");
                false
            }
            Ok(Err(e)) => {
                debug!(error = %e, "Remote health probe failed");
                false
            }
            Err(_) => {
                debug!(timeout_ms = self.config.health_timeout_ms, "Remote health probe timed out");
                false
            }
        }
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{}…", truncated)
    }
}

fn encode<T: Serialize>(request: &T) -> Result<Value, RemoteServiceError> {
    serde_json::to_value(request).map_err(|e| {
        RemoteServiceError::new(
            RemoteErrorCode::InvalidRequest,
            format!("Failed to encode request: {}", e),
        )
    })
}

#[async_trait]
impl RemoteGenerator for RemoteClient {
    fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    async fn generate_hmws(
        &self,
        context: &HmwContext,
        options: &GenerationOptions,
        deadline: Option<Instant>,
    ) -> Result<RemoteOutcome<HmwGenerationResponse>, RemoteServiceError> {
        let payload = encode(&HmwGenerationRequest {
            context,
            count: options.count,
            temperature: options.temperature,
        })?;
        self.generate(&self.config.hmw_endpoint, &payload, deadline).await
    }

    async fn generate_solutions(
        &self,
        hmws: &[HmwItem],
        context: &HmwContext,
        options: &GenerationOptions,
        deadline: Option<Instant>,
    ) -> Result<RemoteOutcome<SolutionGenerationResponse>, RemoteServiceError> {
        let payload = encode(&SolutionGenerationRequest {
            hmws,
            context,
            count: options.count,
            temperature: options.temperature,
        })?;
        self.generate(&self.config.solution_endpoint, &payload, deadline).await
    }

    async fn is_available(&self) -> bool {
        self.health_check().await
    }
}

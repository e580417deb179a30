//! Error types for the generation orchestration subsystem.
//!
//! `IntelligenceError` is the root every public operation returns. Remote failures
//! are retried or converted into a fallback attempt by the orchestrators; only
//! fallback, timeout and configuration failures normally reach callers.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Classification of a remote generation service failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RemoteErrorCode {
    Timeout,
    ConnectionFailed,
    InvalidRequest,
    Unauthorized,
    Forbidden,
    ValidationError,
    RateLimited,
    ServiceUnavailable,
    EndpointNotFound,
    HttpError,
    InvalidResponse,
}

impl RemoteErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RemoteErrorCode::Timeout => "TIMEOUT",
            RemoteErrorCode::ConnectionFailed => "CONNECTION_FAILED",
            RemoteErrorCode::InvalidRequest => "INVALID_REQUEST",
            RemoteErrorCode::Unauthorized => "UNAUTHORIZED",
            RemoteErrorCode::Forbidden => "FORBIDDEN",
            RemoteErrorCode::ValidationError => "VALIDATION_ERROR",
            RemoteErrorCode::RateLimited => "RATE_LIMITED",
            RemoteErrorCode::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            RemoteErrorCode::EndpointNotFound => "ENDPOINT_NOT_FOUND",
            RemoteErrorCode::HttpError => "HTTP_ERROR",
            RemoteErrorCode::InvalidResponse => "INVALID_RESPONSE",
        }
    }

    /// Map a non-success HTTP status to an error code. Returns `None` for 2xx.
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            200..=299 => None,
            400 => Some(RemoteErrorCode::InvalidRequest),
            401 => Some(RemoteErrorCode::Unauthorized),
            403 => Some(RemoteErrorCode::Forbidden),
            404 => Some(RemoteErrorCode::EndpointNotFound),
            422 => Some(RemoteErrorCode::ValidationError),
            429 => Some(RemoteErrorCode::RateLimited),
            500..=599 => Some(RemoteErrorCode::ServiceUnavailable),
            _ => Some(RemoteErrorCode::HttpError),
        }
    }

    /// Caller errors and undecodable bodies are never retried.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            RemoteErrorCode::InvalidRequest
                | RemoteErrorCode::Unauthorized
                | RemoteErrorCode::Forbidden
                | RemoteErrorCode::ValidationError
                | RemoteErrorCode::EndpointNotFound
                | RemoteErrorCode::InvalidResponse
        )
    }
}

impl fmt::Display for RemoteErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure talking to the remote generation service
#[derive(Debug, Clone, Error)]
#[error("Remote service error [{code}]: {message}")]
pub struct RemoteServiceError {
    pub code: RemoteErrorCode,
    pub message: String,
    /// HTTP status when the failure came from a response
    pub status: Option<u16>,
    /// Total attempts made before giving up
    pub attempts: u32,
}

impl RemoteServiceError {
    pub fn new(code: RemoteErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            status: None,
            attempts: 1,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    pub fn is_retryable(&self) -> bool {
        self.code.is_retryable()
    }
}

/// Codes shared by the HMW and solution fallback generators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GenerationErrorCode {
    InvalidContext,
    InvalidInsight,
    InvalidMetric,
    InvalidJtbd,
    GenerationFailed,
}

impl GenerationErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationErrorCode::InvalidContext => "INVALID_CONTEXT",
            GenerationErrorCode::InvalidInsight => "INVALID_INSIGHT",
            GenerationErrorCode::InvalidMetric => "INVALID_METRIC",
            GenerationErrorCode::InvalidJtbd => "INVALID_JTBD",
            GenerationErrorCode::GenerationFailed => "GENERATION_FAILED",
        }
    }
}

impl fmt::Display for GenerationErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What an opaque completion failure looked like
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionFailure {
    Timeout,
    RateLimited,
    Unauthorized,
    Other,
}

impl CompletionFailure {
    /// Completion errors are opaque; classify them from their message text.
    pub fn classify(message: &str) -> Self {
        let lower = message.to_lowercase();
        if lower.contains("timeout") || lower.contains("timed out") {
            CompletionFailure::Timeout
        } else if lower.contains("rate") {
            CompletionFailure::RateLimited
        } else if lower.contains("unauthorized") || lower.contains("authentication") {
            CompletionFailure::Unauthorized
        } else {
            CompletionFailure::Other
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            CompletionFailure::Timeout => "LLM request timed out",
            CompletionFailure::RateLimited => "LLM rate limit exceeded",
            CompletionFailure::Unauthorized => "LLM credentials rejected",
            CompletionFailure::Other => "LLM request failed",
        }
    }
}

/// Rejected input context. Raised before any network or model call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid context [{code}]: {message}")]
pub struct ContextError {
    pub code: GenerationErrorCode,
    pub message: String,
}

impl ContextError {
    pub fn new(code: GenerationErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Failure of the local HMW generation path
#[derive(Debug, Clone, Error)]
#[error("HMW fallback generation failed [{code}]: {message}")]
pub struct FallbackGenerationError {
    pub code: GenerationErrorCode,
    pub message: String,
    pub failure: Option<CompletionFailure>,
}

impl FallbackGenerationError {
    pub fn new(code: GenerationErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            failure: None,
        }
    }

    pub fn from_completion(err: &ProviderError) -> Self {
        let failure = CompletionFailure::classify(&err.to_string());
        Self {
            code: GenerationErrorCode::GenerationFailed,
            message: format!("{}: {}", failure.describe(), err),
            failure: Some(failure),
        }
    }
}

impl From<ContextError> for FallbackGenerationError {
    fn from(err: ContextError) -> Self {
        Self::new(err.code, err.message)
    }
}

/// Failure of the local solution generation path
#[derive(Debug, Clone, Error)]
#[error("Solution generation failed [{code}]: {message}")]
pub struct SolutionGenerationError {
    pub code: GenerationErrorCode,
    pub message: String,
    pub failure: Option<CompletionFailure>,
}

impl SolutionGenerationError {
    pub fn new(code: GenerationErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            failure: None,
        }
    }

    pub fn from_completion(err: &ProviderError) -> Self {
        let failure = CompletionFailure::classify(&err.to_string());
        Self {
            code: GenerationErrorCode::GenerationFailed,
            message: format!("{}: {}", failure.describe(), err),
            failure: Some(failure),
        }
    }
}

impl From<ContextError> for SolutionGenerationError {
    fn from(err: ContextError) -> Self {
        Self::new(err.code, err.message)
    }
}

/// Completion provider errors
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Provider request failed: {0}")]
    RequestFailed(String),

    #[error("Provider authentication failed: {0}")]
    AuthFailed(String),

    #[error("Provider rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Provider model not found: {0}")]
    ModelNotFound(String),
}

/// Root error for every public generation operation
#[derive(Debug, Error)]
pub enum IntelligenceError {
    #[error(transparent)]
    Remote(#[from] RemoteServiceError),

    #[error(transparent)]
    Fallback(#[from] FallbackGenerationError),

    #[error(transparent)]
    Solution(#[from] SolutionGenerationError),

    #[error("Timeout: {operation} exceeded the {timeout_ms}ms deadline")]
    Timeout { operation: String, timeout_ms: u64 },

    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Unreadable CLI input files or unrenderable output
    #[error("Input error: {message}")]
    Input { message: String },
}

impl IntelligenceError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            IntelligenceError::Remote(e) => e.code.as_str(),
            IntelligenceError::Fallback(e) => e.code.as_str(),
            IntelligenceError::Solution(e) => e.code.as_str(),
            IntelligenceError::Timeout { .. } => "TIMEOUT",
            IntelligenceError::Config { .. } => "CONFIG_ERROR",
            IntelligenceError::Input { .. } => "INPUT_ERROR",
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        IntelligenceError::Config {
            message: message.into(),
        }
    }

    pub fn input(message: impl Into<String>) -> Self {
        IntelligenceError::Input {
            message: message.into(),
        }
    }
}

impl From<ProviderError> for IntelligenceError {
    fn from(err: ProviderError) -> Self {
        IntelligenceError::Config {
            message: err.to_string(),
        }
    }
}

impl From<config::ConfigError> for IntelligenceError {
    fn from(err: config::ConfigError) -> Self {
        IntelligenceError::Config {
            message: err.to_string(),
        }
    }
}

//! Configuration System
//!
//! Hierarchical configuration for the remote service, the local fallback provider,
//! orchestration budgets and logging. Files and environment variables are layered by
//! [`ConfigLoader`]; [`IdeateConfig::validate`] reports every problem at once.

use crate::logging::LoggingConfig;
use crate::orchestrator::OrchestrationConfig;
use crate::remote::RemoteConfig;
use serde::{Deserialize, Serialize};

pub use crate::provider::{ProviderConfig, ProviderType};

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdeateConfig {
    /// Remote generation service
    #[serde(default)]
    pub remote: RemoteConfig,

    /// Local fallback generation
    #[serde(default)]
    pub fallback: FallbackConfig,

    #[serde(default)]
    pub orchestration: OrchestrationConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Local fallback generation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackConfig {
    /// Completion provider used when the remote service cannot answer
    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default = "default_hmw_max_tokens")]
    pub hmw_max_tokens: u32,

    #[serde(default = "default_solution_max_tokens")]
    pub solution_max_tokens: u32,
}

fn default_hmw_max_tokens() -> u32 {
    crate::hmw::DEFAULT_HMW_MAX_TOKENS
}

fn default_solution_max_tokens() -> u32 {
    crate::solution::DEFAULT_SOLUTION_MAX_TOKENS
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            hmw_max_tokens: default_hmw_max_tokens(),
            solution_max_tokens: default_solution_max_tokens(),
        }
    }
}

impl FallbackConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.provider.validate()?;
        if self.hmw_max_tokens == 0 || self.solution_max_tokens == 0 {
            return Err("max_tokens must be greater than zero".to_string());
        }
        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Remote(String),
    Fallback(String),
    Orchestration(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Remote(msg) => write!(f, "Remote: {}", msg),
            ValidationError::Fallback(msg) => write!(f, "Fallback: {}", msg),
            ValidationError::Orchestration(msg) => write!(f, "Orchestration: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl IdeateConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.remote.validate() {
            errors.push(ValidationError::Remote(e));
        }

        if let Err(e) = self.fallback.validate() {
            errors.push(ValidationError::Fallback(e));
        }

        if self.remote.enabled
            && self.orchestration.min_fallback_budget_ms > self.remote.timeout_ms
        {
            errors.push(ValidationError::Orchestration(format!(
                "min_fallback_budget_ms ({}) exceeds remote timeout_ms ({})",
                self.orchestration.min_fallback_budget_ms, self.remote.timeout_ms
            )));
        }

        if self.orchestration.max_count == 0 {
            errors.push(ValidationError::Orchestration(
                "max_count must be greater than zero".to_string(),
            ));
        }

        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

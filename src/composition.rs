//! Composition Root
//!
//! The only place concrete collaborators are chosen: the reqwest-backed remote client,
//! the configured completion provider, and the two fallback generators, wired into
//! both orchestrators. Everything else receives its dependencies.

use crate::config::IdeateConfig;
use crate::error::IntelligenceError;
use crate::hmw::HmwFallbackGenerator;
use crate::orchestrator::{HmwGenerator, HmwOrchestrator, SolutionGenerator, SolutionOrchestrator};
use crate::provider::{CompletionProvider, ProviderFactory};
use crate::remote::{RemoteClient, RemoteGenerator};
use crate::solution::SolutionFallbackGenerator;
use crate::types::{GenerationOptions, HmwContext, HmwItem, HmwResponse, SolutionResponse};
use std::sync::Arc;
use tracing::debug;

/// Both generation pipelines behind one handle
pub struct IntelligenceService {
    hmw: HmwOrchestrator,
    solutions: SolutionOrchestrator,
}

impl IntelligenceService {
    /// Build the default service from configuration.
    pub fn from_config(config: &IdeateConfig) -> Result<Self, IntelligenceError> {
        config.validate().map_err(|errors| {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            IntelligenceError::config(format!(
                "Configuration validation failed:\n{}",
                messages.join("\n")
            ))
        })?;

        let remote: Arc<dyn RemoteGenerator> = Arc::new(RemoteClient::new(config.remote.clone())?);
        let provider = ProviderFactory::create_client(&config.fallback.provider)?;
        debug!(
            remote_enabled = config.remote.enabled,
            base_url = %config.remote.base_url,
            provider = provider.provider_name(),
            model = provider.model_name(),
            "Composing intelligence service"
        );
        Ok(Self::with_components(remote, provider, config))
    }

    /// Wire the service from an explicit remote client and completion provider.
    pub fn with_components(
        remote: Arc<dyn RemoteGenerator>,
        provider: Arc<dyn CompletionProvider>,
        config: &IdeateConfig,
    ) -> Self {
        let hmw_fallback: Arc<dyn HmwGenerator> = Arc::new(
            HmwFallbackGenerator::new(provider.clone())
                .with_max_tokens(config.fallback.hmw_max_tokens),
        );
        let solution_fallback: Arc<dyn SolutionGenerator> = Arc::new(
            SolutionFallbackGenerator::new(provider)
                .with_max_tokens(config.fallback.solution_max_tokens),
        );
        Self {
            hmw: HmwOrchestrator::new(
                remote.clone(),
                hmw_fallback,
                config.orchestration.clone(),
            ),
            solutions: SolutionOrchestrator::new(
                remote,
                solution_fallback,
                config.orchestration.clone(),
            ),
        }
    }

    pub async fn generate_hmw(
        &self,
        context: &HmwContext,
        options: &GenerationOptions,
    ) -> Result<HmwResponse, IntelligenceError> {
        self.hmw.generate_hmw(context, options).await
    }

    pub async fn create_solutions(
        &self,
        hmws: &[HmwItem],
        context: &HmwContext,
        options: &GenerationOptions,
    ) -> Result<SolutionResponse, IntelligenceError> {
        self.solutions.create_solutions(hmws, context, options).await
    }

    pub async fn is_remote_available(&self) -> bool {
        self.hmw.is_remote_available().await
    }

    pub fn hmw_orchestrator(&self) -> &HmwOrchestrator {
        &self.hmw
    }

    pub fn solution_orchestrator(&self) -> &SolutionOrchestrator {
        &self.solutions
    }
}

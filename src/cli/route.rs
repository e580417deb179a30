//! CLI route: single route table and run context. Dispatches to the intelligence
//! service and presentation.

use crate::cli::parse::{Commands, GenerationArgs};
use crate::cli::presentation::{
    format_health_json, format_health_text, format_hmw_json, format_hmw_text,
    format_solutions_json, format_solutions_text, HealthReport,
};
use crate::composition::IntelligenceService;
use crate::config::{ConfigLoader, IdeateConfig};
use crate::error::IntelligenceError;
use crate::types::{GenerationOptions, HmwContext, SolutionContext};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Runtime context for CLI execution: loaded configuration and the composed service.
/// Built from workspace path and optional config path using ConfigLoader only.
pub struct RunContext {
    config: IdeateConfig,
    service: IntelligenceService,
    workspace_root: PathBuf,
}

impl RunContext {
    /// Create run context from workspace root and optional config path.
    pub fn new(
        workspace_root: PathBuf,
        config_path: Option<PathBuf>,
    ) -> Result<Self, IntelligenceError> {
        let config = match config_path {
            Some(ref path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(&workspace_root)?,
        };
        Self::from_config(workspace_root, config)
    }

    pub fn from_config(
        workspace_root: PathBuf,
        config: IdeateConfig,
    ) -> Result<Self, IntelligenceError> {
        let service = IntelligenceService::from_config(&config)?;
        Ok(Self {
            config,
            service,
            workspace_root,
        })
    }

    /// Run context around an already composed service
    pub fn with_service(
        workspace_root: PathBuf,
        config: IdeateConfig,
        service: IntelligenceService,
    ) -> Self {
        Self {
            config,
            service,
            workspace_root,
        }
    }

    pub fn config(&self) -> &IdeateConfig {
        &self.config
    }

    /// Execute a command and return the rendered output.
    pub async fn execute(&self, command: &Commands) -> Result<String, IntelligenceError> {
        info!(command = command_name(command), "Executing command");
        match command {
            Commands::Hmw {
                context,
                generation,
                format,
            } => self.handle_hmw(context, generation, format).await,
            Commands::Solutions {
                input,
                generation,
                format,
            } => self.handle_solutions(input, generation, format).await,
            Commands::Health { format } => self.handle_health(format).await,
        }
    }

    async fn handle_hmw(
        &self,
        context_path: &Path,
        generation: &GenerationArgs,
        format: &str,
    ) -> Result<String, IntelligenceError> {
        let context: HmwContext = self.read_json(context_path)?;
        let response = self
            .service
            .generate_hmw(&context, &generation_options(generation))
            .await?;
        match format {
            "json" => format_hmw_json(&response).map_err(render_error),
            _ => Ok(format_hmw_text(&response)),
        }
    }

    async fn handle_solutions(
        &self,
        input_path: &Path,
        generation: &GenerationArgs,
        format: &str,
    ) -> Result<String, IntelligenceError> {
        let input: SolutionContext = self.read_json(input_path)?;
        let response = self
            .service
            .create_solutions(&input.hmws, &input.context, &generation_options(generation))
            .await?;
        match format {
            "json" => format_solutions_json(&response).map_err(render_error),
            _ => Ok(format_solutions_text(&response)),
        }
    }

    async fn handle_health(&self, format: &str) -> Result<String, IntelligenceError> {
        let report = HealthReport {
            enabled: self.config.remote.enabled,
            available: self.service.is_remote_available().await,
            base_url: self.config.remote.base_url.clone(),
        };
        match format {
            "json" => format_health_json(&report).map_err(render_error),
            _ => Ok(format_health_text(&report)),
        }
    }

    /// Relative input paths resolve against the workspace root.
    fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<T, IntelligenceError> {
        let resolved = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workspace_root.join(path)
        };
        debug!(path = %resolved.display(), "Reading input file");
        let raw = std::fs::read_to_string(&resolved).map_err(|e| {
            IntelligenceError::input(format!("Failed to read {}: {}", resolved.display(), e))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            IntelligenceError::input(format!("Invalid JSON in {}: {}", resolved.display(), e))
        })
    }
}

fn generation_options(args: &GenerationArgs) -> GenerationOptions {
    GenerationOptions {
        count: args.count,
        temperature: args.temperature,
        force_fallback: args.force_fallback,
        skip_remote: args.skip_remote,
        deadline_ms: args.deadline_ms,
    }
}

fn render_error(e: serde_json::Error) -> IntelligenceError {
    IntelligenceError::input(format!("Failed to render output: {}", e))
}

/// Command name for logs (e.g. "hmw", "solutions").
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Hmw { .. } => "hmw",
        Commands::Solutions { .. } => "solutions",
        Commands::Health { .. } => "health",
    }
}

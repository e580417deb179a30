//! CLI parse: clap types for ideate. No behavior; definitions only.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Ideate CLI - How-Might-We and solution generation
#[derive(Parser)]
#[command(name = "ideate")]
#[command(about = "Generate How-Might-We questions and ranked solutions from research context")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory (workspace config lives in <workspace>/config)
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate HMW questions from a research context file
    Hmw {
        /// JSON file holding insights, metrics and jtbds
        #[arg(long)]
        context: PathBuf,

        #[command(flatten)]
        generation: GenerationArgs,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Generate ranked solutions for selected HMW questions
    Solutions {
        /// JSON file holding the HMW context plus the selected hmws
        #[arg(long)]
        input: PathBuf,

        #[command(flatten)]
        generation: GenerationArgs,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Probe the remote generation service
    Health {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

/// Per-request generation knobs shared by `hmw` and `solutions`
#[derive(Args, Debug, Clone)]
pub struct GenerationArgs {
    /// Number of items to return
    #[arg(long, default_value = "5")]
    pub count: usize,

    /// Sampling temperature for the fallback model
    #[arg(long, default_value = "0.7")]
    pub temperature: f32,

    /// Skip the remote service and generate locally
    #[arg(long)]
    pub force_fallback: bool,

    /// Do not contact the remote service for this request
    #[arg(long)]
    pub skip_remote: bool,

    /// Overall deadline in milliseconds
    #[arg(long)]
    pub deadline_ms: Option<u64>,
}

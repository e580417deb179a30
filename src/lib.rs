//! Ideate: Resilient How-Might-We and Solution Generation
//!
//! Turns curated research context (insights, metrics, jobs-to-be-done) into
//! How-Might-We questions and ranked solution candidates. A remote generation service
//! is preferred; a local LLM provider takes over when it is slow, unavailable or
//! returns unusable output.

pub mod cli;
pub mod composition;
pub mod config;
pub mod error;
pub mod hmw;
pub mod logging;
pub mod orchestrator;
pub mod provider;
pub mod remote;
pub mod solution;
pub mod text;
pub mod types;
pub mod validation;

pub use composition::IntelligenceService;
pub use error::{
    FallbackGenerationError, IntelligenceError, RemoteErrorCode, RemoteServiceError,
    SolutionGenerationError,
};
pub use types::{
    GenerationOptions, HmwContext, HmwItem, HmwResponse, SolutionContext, SolutionResponse,
};

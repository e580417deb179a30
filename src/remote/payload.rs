//! Wire shapes exchanged with the remote generation service.
//!
//! Responses are decoded leniently: missing scores or references are tolerated here
//! and repaired or discarded by the orchestrators, which enforce the output invariants.

use crate::types::{HmwContext, HmwItem, SourceReferences};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct HmwGenerationRequest<'a> {
    pub context: &'a HmwContext,
    pub count: usize,
    pub temperature: f32,
}

#[derive(Debug, Serialize)]
pub struct SolutionGenerationRequest<'a> {
    pub hmws: &'a [HmwItem],
    pub context: &'a HmwContext,
    pub count: usize,
    pub temperature: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteHmw {
    pub question: String,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub source_references: Option<SourceReferences>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HmwGenerationResponse {
    pub hmws: Vec<RemoteHmw>,
    #[serde(default)]
    pub model_used: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteSolution {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub impact_score: Option<f64>,
    #[serde(default)]
    pub effort_score: Option<f64>,
    #[serde(default)]
    pub assigned_metrics: Vec<String>,
    #[serde(default)]
    pub source_references: Option<SourceReferences>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub hmw_id: Option<String>,
    #[serde(default)]
    pub reasoning: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SolutionGenerationResponse {
    pub solutions: Vec<RemoteSolution>,
    #[serde(default)]
    pub model_used: Option<String>,
}

//! Request-scoped data model.
//!
//! Everything here is created fresh per call and handed back to the caller;
//! persistence belongs to an external collaborator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Atomic research fact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextItem {
    pub id: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricItem {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_value: Option<f64>,
    pub unit: String,
}

/// Job-to-be-done statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JtbdItem {
    pub id: String,
    pub statement: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
}

/// A previously generated HMW question selected as solution input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HmwItem {
    pub id: String,
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

/// Research context for HMW generation. At least one list must be non-empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HmwContext {
    #[serde(default)]
    pub insights: Vec<ContextItem>,
    #[serde(default)]
    pub metrics: Vec<MetricItem>,
    #[serde(default)]
    pub jtbds: Vec<JtbdItem>,
}

impl HmwContext {
    pub fn is_empty(&self) -> bool {
        self.insights.is_empty() && self.metrics.is_empty() && self.jtbds.is_empty()
    }

    /// Every id in the context, grouped by kind
    pub fn source_references(&self) -> SourceReferences {
        SourceReferences {
            insight_ids: self.insights.iter().map(|i| i.id.clone()).collect(),
            metric_ids: self.metrics.iter().map(|m| m.id.clone()).collect(),
            jtbd_ids: self.jtbds.iter().map(|j| j.id.clone()).collect(),
        }
    }

    /// `references` with unknown and repeated ids removed
    pub fn known_references(&self, references: &SourceReferences) -> SourceReferences {
        SourceReferences {
            insight_ids: known_ids(&references.insight_ids, self.insights.iter().map(|i| &i.id)),
            metric_ids: known_ids(&references.metric_ids, self.metrics.iter().map(|m| &m.id)),
            jtbd_ids: known_ids(&references.jtbd_ids, self.jtbds.iter().map(|j| &j.id)),
        }
    }
}

fn known_ids<'a>(ids: &[String], context_ids: impl Iterator<Item = &'a String> + Clone) -> Vec<String> {
    let mut known: Vec<String> = Vec::new();
    for id in ids {
        if context_ids.clone().any(|c| c == id) && !known.contains(id) {
            known.push(id.clone());
        }
    }
    known
}

/// Context for solution generation: HMW context plus the selected HMWs.
/// Requires at least one metric and at least one HMW.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolutionContext {
    #[serde(flatten)]
    pub context: HmwContext,
    #[serde(default)]
    pub hmws: Vec<HmwItem>,
}

impl SolutionContext {
    pub fn new(hmws: Vec<HmwItem>, context: HmwContext) -> Self {
        Self { context, hmws }
    }
}

/// Ids of the context items an artifact traces back to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceReferences {
    #[serde(default)]
    pub insight_ids: Vec<String>,
    #[serde(default)]
    pub metric_ids: Vec<String>,
    #[serde(default)]
    pub jtbd_ids: Vec<String>,
}

impl SourceReferences {
    pub fn is_empty(&self) -> bool {
        self.insight_ids.is_empty() && self.metric_ids.is_empty() && self.jtbd_ids.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HmwResult {
    pub question: String,
    pub score: f64,
    #[serde(default)]
    pub source_references: SourceReferences,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionResult {
    pub title: String,
    pub description: String,
    pub impact_score: f64,
    pub effort_score: f64,
    pub final_score: f64,
    #[serde(default)]
    pub assigned_metrics: Vec<String>,
    #[serde(default)]
    pub source_references: SourceReferences,
    pub confidence: f64,
    /// HMW this solution answers, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hmw_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

/// Which strategy produced a response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMethod {
    Remote,
    Fallback,
}

impl std::fmt::Display for GenerationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationMethod::Remote => f.write_str("remote"),
            GenerationMethod::Fallback => f.write_str("fallback"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaInfo {
    pub duration_ms: u64,
    pub retries: u32,
    pub model_used: String,
    pub generation_method: GenerationMethod,
    pub timestamp: DateTime<Utc>,
}

/// Per-request generation options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    #[serde(default = "default_count")]
    pub count: usize,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default)]
    pub force_fallback: bool,
    #[serde(default)]
    pub skip_remote: bool,
    /// Overall deadline for the request in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline_ms: Option<u64>,
}

fn default_count() -> usize {
    5
}

fn default_temperature() -> f32 {
    0.7
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            count: default_count(),
            temperature: default_temperature(),
            force_fallback: false,
            skip_remote: false,
            deadline_ms: None,
        }
    }
}

impl GenerationOptions {
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn forced_fallback(mut self) -> Self {
        self.force_fallback = true;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline_ms = Some(deadline.as_millis() as u64);
        self
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HmwResponse {
    pub hmws: Vec<HmwResult>,
    pub meta: MetaInfo,
    pub total_hmws: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionResponse {
    pub solutions: Vec<SolutionResult>,
    pub meta: MetaInfo,
    pub total_solutions: usize,
    /// True when any solution's metric came from the first-metric fallback
    pub fallback_metric_used: bool,
}

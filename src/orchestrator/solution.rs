use super::{
    fallback_within, meta, remote_within, retries_spent, Deadline, Generated,
    OrchestrationConfig, SolutionGenerator, Strategy, DEFAULT_REMOTE_CONFIDENCE,
    REMOTE_MODEL_LABEL,
};
use crate::error::{
    IntelligenceError, RemoteErrorCode, RemoteServiceError, SolutionGenerationError,
};
use crate::remote::{RemoteGenerator, SolutionGenerationResponse};
use crate::solution::parse::{DEFAULT_SCORE, MAX_SCORE, MIN_SCORE};
use crate::solution::{
    assign_metrics, final_score, known_metric_ids, rank_solutions, solution_references,
    SolutionBatch,
};
use crate::types::{
    GenerationOptions, HmwContext, HmwItem, SolutionResponse, SolutionResult, SourceReferences,
};
use crate::validation::{validate_count, validate_solution_inputs};
use std::sync::Arc;
use tracing::{info, warn};

/// Remote-first solution generation with local fallback
pub struct SolutionOrchestrator {
    remote: Arc<dyn RemoteGenerator>,
    fallback: Arc<dyn SolutionGenerator>,
    config: OrchestrationConfig,
}

impl SolutionOrchestrator {
    pub fn new(
        remote: Arc<dyn RemoteGenerator>,
        fallback: Arc<dyn SolutionGenerator>,
        config: OrchestrationConfig,
    ) -> Self {
        Self {
            remote,
            fallback,
            config,
        }
    }

    pub async fn is_remote_available(&self) -> bool {
        self.remote.is_enabled() && self.remote.is_available().await
    }

    pub async fn create_solutions(
        &self,
        hmws: &[HmwItem],
        context: &HmwContext,
        options: &GenerationOptions,
    ) -> Result<SolutionResponse, IntelligenceError> {
        let deadline = Deadline::start(options.deadline());
        validate_solution_inputs(hmws, context).map_err(SolutionGenerationError::from)?;
        validate_count(options.count, self.config.max_count)
            .map_err(SolutionGenerationError::from)?;

        let mut retries = 0;
        let attempted_remote =
            super::select_strategy(options, self.remote.is_enabled()) == Strategy::TryRemote;
        if attempted_remote {
            let attempt = remote_within(&deadline, async {
                let outcome = self
                    .remote
                    .generate_solutions(hmws, context, options, deadline.expires_at())
                    .await?;
                let model = outcome
                    .value
                    .model_used
                    .clone()
                    .unwrap_or_else(|| REMOTE_MODEL_LABEL.to_string());
                let batch = repair_remote_solutions(outcome.value, hmws, context, options.count)
                    .map_err(|e| e.with_attempts(outcome.retries + 1))?;
                Ok(Generated::remote(batch, outcome.retries, model))
            })
            .await;

            match attempt {
                Ok(generated) => return Ok(self.respond(generated, &deadline)),
                Err(err) => {
                    retries = retries_spent(&err);
                    warn!(
                        code = %err.code,
                        attempts = err.attempts,
                        error = %err.message,
                        "Remote solution generation failed, falling back to local generation"
                    );
                }
            }
        }

        let batch = fallback_within(
            &deadline,
            self.config.min_fallback_budget(),
            attempted_remote,
            "solution generation",
            self.fallback
                .generate_solutions(hmws, context, options.count, options.temperature),
        )
        .await?;
        let generated = Generated::fallback(batch, retries, self.fallback.model_name());
        Ok(self.respond(generated, &deadline))
    }

    fn respond(&self, generated: Generated<SolutionBatch>, deadline: &Deadline) -> SolutionResponse {
        let meta = meta(&generated, deadline);
        let batch = generated.value;
        info!(
            method = %meta.generation_method,
            retries = meta.retries,
            duration_ms = meta.duration_ms,
            count = batch.solutions.len(),
            fallback_metric_used = batch.fallback_metric_used,
            "Solution generation completed"
        );
        SolutionResponse {
            total_solutions: batch.solutions.len(),
            solutions: batch.solutions,
            meta,
            fallback_metric_used: batch.fallback_metric_used,
        }
    }
}

fn remote_score(value: Option<f64>) -> f64 {
    value
        .filter(|v| v.is_finite())
        .unwrap_or(DEFAULT_SCORE)
        .clamp(MIN_SCORE, MAX_SCORE)
}

/// Bring remote solutions up to the same invariants as local ones.
///
/// Scores are clamped and `final_score` recomputed; unknown metric ids are dropped and
/// solutions left without a metric go through local metric assignment. Solutions with
/// no title or description are discarded, and no survivors is an `INVALID_RESPONSE`.
pub fn repair_remote_solutions(
    response: SolutionGenerationResponse,
    hmws: &[HmwItem],
    context: &HmwContext,
    count: usize,
) -> Result<SolutionBatch, RemoteServiceError> {
    let mut fallback_metric_used = false;
    let mut solutions: Vec<SolutionResult> = response
        .solutions
        .into_iter()
        .filter_map(|remote| {
            let title = remote.title.trim().to_string();
            let description = remote.description.trim().to_string();
            if title.is_empty() || description.is_empty() {
                return None;
            }

            let mut assigned = known_metric_ids(&remote.assigned_metrics, &context.metrics);
            if assigned.is_empty() {
                let assignment = assign_metrics(&title, &description, &context.metrics);
                fallback_metric_used |= assignment.used_fallback;
                assigned = assignment.metric_ids;
            }

            let impact = remote_score(remote.impact_score);
            let effort = remote_score(remote.effort_score);
            Some(SolutionResult {
                title,
                description,
                impact_score: impact,
                effort_score: effort,
                final_score: final_score(impact, effort),
                source_references: match remote.source_references {
                    Some(refs) => SourceReferences {
                        metric_ids: assigned.clone(),
                        ..context.known_references(&refs)
                    },
                    None => solution_references(context, &assigned),
                },
                assigned_metrics: assigned,
                confidence: remote
                    .confidence
                    .filter(|c| c.is_finite())
                    .map_or(DEFAULT_REMOTE_CONFIDENCE, |c| c.clamp(0.0, 1.0)),
                hmw_id: remote
                    .hmw_id
                    .filter(|id| hmws.iter().any(|hmw| &hmw.id == id)),
                reasoning: remote.reasoning.filter(|r| !r.trim().is_empty()),
            })
        })
        .collect();

    if solutions.is_empty() {
        return Err(RemoteServiceError::new(
            RemoteErrorCode::InvalidResponse,
            "remote response contained no usable solutions",
        ));
    }

    rank_solutions(&mut solutions);
    solutions.truncate(count.max(1));
    Ok(SolutionBatch {
        solutions,
        fallback_metric_used,
    })
}

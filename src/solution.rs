//! Solution Fallback Generator
//!
//! Local solution path: prompt over the selected HMWs and metrics, one completion
//! call, labelled-block parsing, score clamping, guaranteed metric assignment and
//! backfill to exactly the requested count.

use crate::error::SolutionGenerationError;
use crate::provider::CompletionProvider;
use crate::text::round2;
use crate::types::{HmwContext, HmwItem, SolutionResult, SourceReferences};
use crate::validation::validate_solution_inputs;
use std::sync::Arc;
use tracing::{debug, warn};

pub mod backfill;
pub mod metrics;
pub mod parse;
pub mod prompt;

pub use backfill::backfill;
pub use metrics::{assign_metrics, known_metric_ids, MetricAssignment};
pub use parse::{parse_solution_blocks, ParsedSolution};
pub use prompt::build_solution_prompt;

/// Confidence attached to parsed local solutions
pub const FALLBACK_SOLUTION_CONFIDENCE: f64 = 0.6;

pub const DEFAULT_SOLUTION_MAX_TOKENS: u32 = 2000;

/// `impact / effort` rounded to two decimals
pub fn final_score(impact: f64, effort: f64) -> f64 {
    round2(impact / effort)
}

/// Sort best first, keeping input order among equal scores.
pub fn rank_solutions(solutions: &mut [SolutionResult]) {
    solutions.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));
}

/// Solutions plus whether any of them got its metric from a fallback rule
#[derive(Debug, Clone, PartialEq)]
pub struct SolutionBatch {
    pub solutions: Vec<SolutionResult>,
    pub fallback_metric_used: bool,
}

/// Source references for a solution: all insights and JTBDs, only its own metrics
pub fn solution_references(context: &HmwContext, metric_ids: &[String]) -> SourceReferences {
    SourceReferences {
        insight_ids: context.insights.iter().map(|i| i.id.clone()).collect(),
        metric_ids: metric_ids.to_vec(),
        jtbd_ids: context.jtbds.iter().map(|j| j.id.clone()).collect(),
    }
}

fn into_result(
    parsed: ParsedSolution,
    hmws: &[HmwItem],
    context: &HmwContext,
) -> (SolutionResult, bool) {
    let assignment = assign_metrics(&parsed.title, &parsed.description, &context.metrics);
    let hmw_id = parsed
        .hmw_number
        .and_then(|n| n.checked_sub(1))
        .and_then(|index| hmws.get(index))
        .map(|hmw| hmw.id.clone());
    let result = SolutionResult {
        final_score: final_score(parsed.impact, parsed.effort),
        impact_score: parsed.impact,
        effort_score: parsed.effort,
        source_references: solution_references(context, &assignment.metric_ids),
        assigned_metrics: assignment.metric_ids,
        confidence: FALLBACK_SOLUTION_CONFIDENCE,
        hmw_id,
        reasoning: parsed.reasoning,
        title: parsed.title,
        description: parsed.description,
    };
    (result, assignment.used_fallback)
}

pub struct SolutionFallbackGenerator {
    provider: Arc<dyn CompletionProvider>,
    max_tokens: u32,
}

impl SolutionFallbackGenerator {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            provider,
            max_tokens: DEFAULT_SOLUTION_MAX_TOKENS,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn model_name(&self) -> &str {
        self.provider.model_name()
    }

    /// Generate exactly `count` solutions for `hmws`, best first.
    pub async fn generate_solutions(
        &self,
        hmws: &[HmwItem],
        context: &HmwContext,
        count: usize,
        temperature: f32,
    ) -> Result<SolutionBatch, SolutionGenerationError> {
        validate_solution_inputs(hmws, context)?;
        let count = count.max(1);

        let user_prompt = build_solution_prompt(hmws, context, count);
        let completion = self
            .provider
            .complete_text(
                prompt::SOLUTION_SYSTEM_PROMPT,
                &user_prompt,
                temperature,
                self.max_tokens,
            )
            .await
            .map_err(|e| {
                warn!(
                    provider = self.provider.provider_name(),
                    error = %e,
                    "Solution completion failed"
                );
                SolutionGenerationError::from_completion(&e)
            })?;

        let parsed = parse_solution_blocks(&completion.text);
        debug!(
            parsed = parsed.len(),
            requested = count,
            completion_tokens = completion.usage.completion_tokens,
            "Parsed solution blocks from model output"
        );

        let mut scored: Vec<(SolutionResult, bool)> = parsed
            .into_iter()
            .map(|p| into_result(p, hmws, context))
            .collect();
        scored.sort_by(|a, b| b.0.final_score.total_cmp(&a.0.final_score));
        scored.truncate(count);

        let mut fallback_metric_used = scored.iter().any(|(_, used_fallback)| *used_fallback);
        let mut solutions: Vec<SolutionResult> =
            scored.into_iter().map(|(solution, _)| solution).collect();

        let added = backfill(&mut solutions, hmws, context, count);
        if added > 0 {
            warn!(
                added,
                requested = count,
                "Model returned too few solutions, backfilled with placeholders"
            );
            fallback_metric_used = true;
            rank_solutions(&mut solutions);
        }

        Ok(SolutionBatch {
            solutions,
            fallback_metric_used,
        })
    }
}

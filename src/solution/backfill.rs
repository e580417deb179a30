//! Placeholder solutions that top a batch up to the requested count.

use crate::types::{HmwContext, HmwItem, SolutionResult, SourceReferences};
use std::collections::HashMap;

pub const PLACEHOLDER_SCORE: f64 = 5.0;
pub const PLACEHOLDER_CONFIDENCE: f64 = 0.2;

/// The HMW answered by the fewest solutions so far; ties go to input order.
pub fn least_referenced<'a>(hmws: &'a [HmwItem], solutions: &[SolutionResult]) -> Option<&'a HmwItem> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for id in solutions.iter().filter_map(|s| s.hmw_id.as_deref()) {
        *counts.entry(id).or_default() += 1;
    }
    hmws.iter()
        .enumerate()
        .min_by_key(|(index, hmw)| (counts.get(hmw.id.as_str()).copied().unwrap_or(0), *index))
        .map(|(_, hmw)| hmw)
}

fn placeholder(hmw: &HmwItem, context: &HmwContext, metric_id: &str) -> SolutionResult {
    let topic = hmw
        .question
        .trim()
        .strip_prefix("How might we ")
        .unwrap_or(hmw.question.trim())
        .trim_end_matches('?');
    SolutionResult {
        title: format!("Explore: {}", topic),
        description: format!(
            "Open exploration for \"{}\". Run discovery with affected users and prototype \
             the most promising direction before committing to a build.",
            hmw.question.trim()
        ),
        impact_score: PLACEHOLDER_SCORE,
        effort_score: PLACEHOLDER_SCORE,
        final_score: super::final_score(PLACEHOLDER_SCORE, PLACEHOLDER_SCORE),
        assigned_metrics: vec![metric_id.to_string()],
        source_references: SourceReferences {
            insight_ids: context.insights.iter().map(|i| i.id.clone()).collect(),
            metric_ids: vec![metric_id.to_string()],
            jtbd_ids: context.jtbds.iter().map(|j| j.id.clone()).collect(),
        },
        confidence: PLACEHOLDER_CONFIDENCE,
        hmw_id: Some(hmw.id.clone()),
        reasoning: None,
    }
}

/// Append placeholders until `solutions` holds `count` entries. Returns how many were added.
///
/// Needs at least one HMW and one metric; with either missing nothing is added.
pub fn backfill(
    solutions: &mut Vec<SolutionResult>,
    hmws: &[HmwItem],
    context: &HmwContext,
    count: usize,
) -> usize {
    let Some(metric) = context.metrics.first() else {
        return 0;
    };
    let mut added = 0;
    while solutions.len() < count {
        let Some(hmw) = least_referenced(hmws, solutions) else {
            break;
        };
        let filler = placeholder(hmw, context, &metric.id);
        solutions.push(filler);
        added += 1;
    }
    added
}

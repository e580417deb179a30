//! Metric assignment for solutions.
//!
//! Every solution leaves this module with at least one metric id as long as the
//! context carries at least one metric.

use crate::text::significant_tokens;
use crate::types::MetricItem;

/// Bonus for a business term shared by solution text and metric text
const BUSINESS_TERM_BONUS: usize = 2;

const BUSINESS_TERMS: &[&str] = &[
    "engagement",
    "conversion",
    "revenue",
    "retention",
    "churn",
    "activation",
    "acquisition",
    "satisfaction",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricAssignment {
    pub metric_ids: Vec<String>,
    /// True when no metric scored and the first metric was used
    pub used_fallback: bool,
}

fn metric_text(metric: &MetricItem) -> String {
    match &metric.description {
        Some(description) => format!("{} {}", metric.name, description),
        None => metric.name.clone(),
    }
}

/// Relevance of `metric` to a solution's text
pub fn metric_relevance(solution_text: &str, metric: &MetricItem) -> usize {
    let metric_text = metric_text(metric);
    let shared = significant_tokens(solution_text)
        .intersection(&significant_tokens(&metric_text))
        .count();

    let solution_lower = solution_text.to_lowercase();
    let metric_lower = metric_text.to_lowercase();
    let business = BUSINESS_TERMS
        .iter()
        .any(|term| solution_lower.contains(term) && metric_lower.contains(term));

    shared + if business { BUSINESS_TERM_BONUS } else { 0 }
}

/// Assign every metric tied at the top positive relevance; the first metric otherwise.
pub fn assign_metrics(title: &str, description: &str, metrics: &[MetricItem]) -> MetricAssignment {
    let text = format!("{} {}", title, description);
    let scores: Vec<usize> = metrics.iter().map(|m| metric_relevance(&text, m)).collect();
    let best = scores.iter().copied().max().unwrap_or(0);

    if best == 0 {
        return MetricAssignment {
            metric_ids: metrics.first().map(|m| m.id.clone()).into_iter().collect(),
            used_fallback: true,
        };
    }

    MetricAssignment {
        metric_ids: metrics
            .iter()
            .zip(&scores)
            .filter(|(_, score)| **score == best)
            .map(|(metric, _)| metric.id.clone())
            .collect(),
        used_fallback: false,
    }
}

/// Keep only ids that name a metric in `metrics`, preserving order and dropping repeats.
pub fn known_metric_ids(ids: &[String], metrics: &[MetricItem]) -> Vec<String> {
    let mut known: Vec<String> = Vec::new();
    for id in ids {
        if metrics.iter().any(|m| &m.id == id) && !known.contains(id) {
            known.push(id.clone());
        }
    }
    known
}

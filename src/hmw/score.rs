//! Heuristic HMW scoring.
//!
//! Weights are fixed: base 5.0, up to 2.0 for overlap with the context vocabulary,
//! 0.75 per quality indicator capped at 1.5. Scores land in [0, 10] with two decimals.

use crate::text::{round2, significant_tokens};
use crate::types::HmwContext;
use std::collections::BTreeSet;

const BASE_SCORE: f64 = 5.0;
const OVERLAP_WEIGHT: f64 = 2.0;
const QUALITY_BONUS: f64 = 0.75;
const QUALITY_BONUS_CAP: f64 = 1.5;

const QUALITY_INDICATORS: &[&str] = &["improve", "optimize", "streamline", "enhance"];

/// Significant tokens drawn from every text field in the context
pub fn context_vocabulary(context: &HmwContext) -> BTreeSet<String> {
    let mut vocabulary = BTreeSet::new();
    for insight in &context.insights {
        vocabulary.extend(significant_tokens(&insight.content));
    }
    for metric in &context.metrics {
        vocabulary.extend(significant_tokens(&metric.name));
        if let Some(description) = &metric.description {
            vocabulary.extend(significant_tokens(description));
        }
    }
    for jtbd in &context.jtbds {
        vocabulary.extend(significant_tokens(&jtbd.statement));
        if let Some(extra) = &jtbd.context {
            vocabulary.extend(significant_tokens(extra));
        }
    }
    vocabulary
}

pub fn score_question(question: &str, vocabulary: &BTreeSet<String>) -> f64 {
    let candidate = significant_tokens(question);
    let overlap = if candidate.is_empty() {
        0.0
    } else {
        let shared = candidate.intersection(vocabulary).count();
        shared as f64 / candidate.len() as f64
    };

    let lowered = question.to_lowercase();
    let indicators = QUALITY_INDICATORS
        .iter()
        .filter(|term| lowered.contains(*term))
        .count();
    let quality = (indicators as f64 * QUALITY_BONUS).min(QUALITY_BONUS_CAP);

    round2((BASE_SCORE + OVERLAP_WEIGHT * overlap + quality).clamp(0.0, 10.0))
}

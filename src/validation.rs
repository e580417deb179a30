//! Context Validation
//!
//! Shape and cardinality checks that run before any network or model activity.
//! Malformed input is rejected with a coded [`ContextError`]; nothing is coerced.

use crate::error::{ContextError, GenerationErrorCode};
use crate::text::is_hmw_question;
use crate::types::{ContextItem, HmwContext, HmwItem, JtbdItem, MetricItem, SolutionContext};

const MIN_JTBD_STATEMENT_CHARS: usize = 10;
const MIN_HMW_QUESTION_CHARS: usize = 15;

/// Validate context for HMW generation.
pub fn validate_hmw_context(context: &HmwContext) -> Result<(), ContextError> {
    if context.is_empty() {
        return Err(ContextError::new(
            GenerationErrorCode::InvalidContext,
            "at least one insight, metric, or JTBD is required",
        ));
    }
    validate_items(context)
}

/// Reject a requested `count` above the configured maximum.
pub fn validate_count(count: usize, max_count: usize) -> Result<(), ContextError> {
    if count > max_count {
        return Err(ContextError::new(
            GenerationErrorCode::InvalidContext,
            format!("count {} exceeds the maximum of {}", count, max_count),
        ));
    }
    Ok(())
}

/// Validate context for solution generation.
pub fn validate_solution_context(context: &SolutionContext) -> Result<(), ContextError> {
    validate_solution_inputs(&context.hmws, &context.context)
}

/// Same checks as [`validate_solution_context`] over borrowed parts.
pub fn validate_solution_inputs(hmws: &[HmwItem], context: &HmwContext) -> Result<(), ContextError> {
    if context.metrics.is_empty() {
        return Err(ContextError::new(
            GenerationErrorCode::InvalidContext,
            "at least one metric required",
        ));
    }
    if hmws.is_empty() {
        return Err(ContextError::new(
            GenerationErrorCode::InvalidContext,
            "at least one HMW required",
        ));
    }
    for hmw in hmws {
        validate_hmw_item(hmw)?;
    }
    validate_items(context)
}

fn validate_items(context: &HmwContext) -> Result<(), ContextError> {
    for insight in &context.insights {
        validate_insight(insight)?;
    }
    for metric in &context.metrics {
        validate_metric(metric)?;
    }
    for jtbd in &context.jtbds {
        validate_jtbd(jtbd)?;
    }
    Ok(())
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn validate_insight(insight: &ContextItem) -> Result<(), ContextError> {
    if is_blank(&insight.id) {
        return Err(ContextError::new(
            GenerationErrorCode::InvalidInsight,
            "insight id cannot be empty",
        ));
    }
    if is_blank(&insight.content) {
        return Err(ContextError::new(
            GenerationErrorCode::InvalidInsight,
            format!("insight '{}' has empty content", insight.id),
        ));
    }
    Ok(())
}

fn validate_metric(metric: &MetricItem) -> Result<(), ContextError> {
    if is_blank(&metric.id) {
        return Err(ContextError::new(
            GenerationErrorCode::InvalidMetric,
            "metric id cannot be empty",
        ));
    }
    if is_blank(&metric.name) {
        return Err(ContextError::new(
            GenerationErrorCode::InvalidMetric,
            format!("metric '{}' has an empty name", metric.id),
        ));
    }
    if is_blank(&metric.unit) {
        return Err(ContextError::new(
            GenerationErrorCode::InvalidMetric,
            format!("metric '{}' has an empty unit", metric.id),
        ));
    }
    Ok(())
}

fn validate_jtbd(jtbd: &JtbdItem) -> Result<(), ContextError> {
    if is_blank(&jtbd.id) {
        return Err(ContextError::new(
            GenerationErrorCode::InvalidJtbd,
            "JTBD id cannot be empty",
        ));
    }
    if jtbd.statement.trim().chars().count() < MIN_JTBD_STATEMENT_CHARS {
        return Err(ContextError::new(
            GenerationErrorCode::InvalidJtbd,
            format!(
                "JTBD '{}' statement must be at least {} characters",
                jtbd.id, MIN_JTBD_STATEMENT_CHARS
            ),
        ));
    }
    Ok(())
}

fn validate_hmw_item(hmw: &HmwItem) -> Result<(), ContextError> {
    if is_blank(&hmw.id) {
        return Err(ContextError::new(
            GenerationErrorCode::InvalidContext,
            "HMW id cannot be empty",
        ));
    }
    let question = hmw.question.as_str();
    if question.trim().chars().count() < MIN_HMW_QUESTION_CHARS {
        return Err(ContextError::new(
            GenerationErrorCode::InvalidContext,
            format!(
                "HMW '{}' question must be at least {} characters",
                hmw.id, MIN_HMW_QUESTION_CHARS
            ),
        ));
    }
    if !is_hmw_question(question) {
        return Err(ContextError::new(
            GenerationErrorCode::InvalidContext,
            format!(
                "HMW '{}' question must read 'How might we …?': {}",
                hmw.id, question
            ),
        ));
    }
    Ok(())
}

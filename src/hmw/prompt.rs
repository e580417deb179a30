//! Prompt construction for local HMW generation.

use crate::types::HmwContext;
use std::fmt::Write;

pub const HMW_SYSTEM_PROMPT: &str = "You are a product strategist who turns user research into \
\"How might we\" opportunity questions. Each question must be specific, actionable, and \
grounded in the research provided. Respond with the questions only.";

/// Render the user prompt enumerating every context item.
pub fn build_hmw_prompt(context: &HmwContext, count: usize) -> String {
    let mut prompt = String::new();

    if !context.insights.is_empty() {
        prompt.push_str("Research insights:\n");
        for insight in &context.insights {
            let _ = writeln!(prompt, "- [{}] {}", insight.id, insight.content.trim());
        }
        prompt.push('\n');
    }

    if !context.metrics.is_empty() {
        prompt.push_str("Metrics:\n");
        for metric in &context.metrics {
            let _ = write!(prompt, "- [{}] {} ({})", metric.id, metric.name.trim(), metric.unit);
            if let Some(description) = &metric.description {
                let _ = write!(prompt, ": {}", description.trim());
            }
            if let (Some(current), Some(target)) = (metric.current_value, metric.target_value) {
                let _ = write!(prompt, " [current {}, target {}]", current, target);
            }
            prompt.push('\n');
        }
        prompt.push('\n');
    }

    if !context.jtbds.is_empty() {
        prompt.push_str("Jobs to be done:\n");
        for jtbd in &context.jtbds {
            let _ = write!(prompt, "- [{}] {}", jtbd.id, jtbd.statement.trim());
            if let Some(priority) = &jtbd.priority {
                let _ = write!(prompt, " (priority: {})", priority);
            }
            prompt.push('\n');
        }
        prompt.push('\n');
    }

    let _ = write!(
        prompt,
        "Write {count} distinct \"How might we\" questions based on the context above.\n\
         Put each question on its own line, starting with \"How might we\" and ending with \"?\".\n\
         Do not add headings, explanations, or commentary."
    );
    prompt
}

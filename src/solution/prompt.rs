//! Prompt construction for local solution generation.

use crate::types::{HmwContext, HmwItem};
use std::fmt::Write;

pub const SOLUTION_SYSTEM_PROMPT: &str = "You are a product strategist who proposes concrete, \
testable solutions to \"How might we\" questions. Estimate impact and effort honestly on a \
1-10 scale and tie every solution to the business metrics provided.";

pub fn build_solution_prompt(hmws: &[HmwItem], context: &HmwContext, count: usize) -> String {
    let mut prompt = String::from("How might we questions:\n");
    for (index, hmw) in hmws.iter().enumerate() {
        let _ = writeln!(prompt, "{}. {}", index + 1, hmw.question.trim());
    }

    prompt.push_str("\nAvailable metrics:\n");
    for metric in &context.metrics {
        let _ = write!(prompt, "- {} ({})", metric.name.trim(), metric.unit);
        if let Some(description) = &metric.description {
            let _ = write!(prompt, ": {}", description.trim());
        }
        prompt.push('\n');
    }

    if !context.insights.is_empty() {
        prompt.push_str("\nResearch insights:\n");
        for insight in &context.insights {
            let _ = writeln!(prompt, "- {}", insight.content.trim());
        }
    }

    if !context.jtbds.is_empty() {
        prompt.push_str("\nJobs to be done:\n");
        for jtbd in &context.jtbds {
            let _ = writeln!(prompt, "- {}", jtbd.statement.trim());
        }
    }

    let _ = write!(
        prompt,
        "\nPropose {count} solutions. Use exactly this format for each one:\n\n\
         TITLE: <short name>\n\
         HMW: <number of the question it answers>\n\
         DESCRIPTION: <what to build and how it works>\n\
         IMPACT: <1-10>\n\
         EFFORT: <1-10>\n\
         REASONING: <why this moves the metrics>\n"
    );
    prompt
}

//! Labelled-block parsing of solution model output.
//!
//! Blocks start at a `TITLE` label; `DESCRIPTION`, `IMPACT`, `EFFORT`, `REASONING` and
//! `HMW` labels fill fields, and unlabelled lines continue the previous field.
//! Parsing never fails: unusable blocks are skipped.

use crate::text::clean_model_text;
use once_cell::sync::Lazy;
use regex::Regex;

/// Score used when an IMPACT or EFFORT value is missing or unreadable
pub const DEFAULT_SCORE: f64 = 5.0;
pub const MIN_SCORE: f64 = 1.0;
pub const MAX_SCORE: f64 = 10.0;

static LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^[\s#>*\-\d.)]*\**\s*(title|description|impact|effort|reasoning|hmw)\s*(?:\([^)]*\))?\s*\**\s*:\s*\**\s*(.*)$",
    )
    .expect("label regex is valid")
});

static NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("number regex is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Description,
    Impact,
    Effort,
    Reasoning,
    Hmw,
}

impl Field {
    fn from_label(label: &str) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "title" => Field::Title,
            "description" => Field::Description,
            "impact" => Field::Impact,
            "effort" => Field::Effort,
            "reasoning" => Field::Reasoning,
            _ => Field::Hmw,
        }
    }
}

/// One solution as read from model output, before scoring and metric assignment
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSolution {
    pub title: String,
    pub description: String,
    /// Clamped to [1, 10]
    pub impact: f64,
    /// Clamped to [1, 10]
    pub effort: f64,
    pub reasoning: Option<String>,
    /// 1-based HMW number the model said this answers
    pub hmw_number: Option<usize>,
}

#[derive(Default)]
struct RawBlock {
    title: String,
    description: String,
    impact: String,
    effort: String,
    reasoning: String,
    hmw: String,
}

impl RawBlock {
    fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Title => &mut self.title,
            Field::Description => &mut self.description,
            Field::Impact => &mut self.impact,
            Field::Effort => &mut self.effort,
            Field::Reasoning => &mut self.reasoning,
            Field::Hmw => &mut self.hmw,
        }
    }

    fn finish(self) -> Option<ParsedSolution> {
        let title = clean_value(&self.title);
        let description = clean_value(&self.description);
        if title.is_empty() || description.is_empty() {
            return None;
        }
        let reasoning = clean_value(&self.reasoning);
        Some(ParsedSolution {
            title,
            description,
            impact: parse_score(&self.impact),
            effort: parse_score(&self.effort),
            reasoning: (!reasoning.is_empty()).then_some(reasoning),
            hmw_number: NUMBER
                .find(&self.hmw)
                .and_then(|m| m.as_str().parse::<usize>().ok()),
        })
    }
}

fn append(target: &mut String, text: &str) {
    let text = text.trim();
    if text.is_empty() {
        return;
    }
    if !target.is_empty() {
        target.push(' ');
    }
    target.push_str(text);
}

fn clean_value(value: &str) -> String {
    value
        .trim()
        .trim_matches(|c: char| matches!(c, '*' | '"' | '`'))
        .trim()
        .to_string()
}

/// First number in `value`, clamped to [1, 10]; [`DEFAULT_SCORE`] when none parses.
pub fn parse_score(value: &str) -> f64 {
    NUMBER
        .find(value)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|n| n.is_finite())
        .unwrap_or(DEFAULT_SCORE)
        .clamp(MIN_SCORE, MAX_SCORE)
}

pub fn parse_solution_blocks(raw: &str) -> Vec<ParsedSolution> {
    let text = clean_model_text(raw);
    let mut blocks = Vec::new();
    let mut current: Option<RawBlock> = None;
    let mut field = Field::Title;

    for line in text.lines() {
        if let Some(captures) = LABEL.captures(line) {
            let label = Field::from_label(&captures[1]);
            let value = captures.get(2).map_or("", |m| m.as_str());
            if label == Field::Title {
                if let Some(block) = current.take() {
                    blocks.push(block);
                }
                current = Some(RawBlock::default());
            }
            field = label;
            if let Some(block) = current.as_mut() {
                append(block.field_mut(field), value);
            }
        } else if let Some(block) = current.as_mut() {
            append(block.field_mut(field), line);
        }
    }
    if let Some(block) = current {
        blocks.push(block);
    }

    blocks.into_iter().filter_map(RawBlock::finish).collect()
}

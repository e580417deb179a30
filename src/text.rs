//! Text helpers shared by output parsing, HMW scoring and metric assignment.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use unicode_normalization::UnicodeNormalization;

static HMW_QUESTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^How might we .+\?$").expect("HMW pattern is a valid regex"));

/// Words that carry no signal for overlap scoring
const STOPWORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "an", "and", "any", "are", "as", "at", "be", "been",
    "but", "by", "can", "could", "did", "do", "does", "for", "from", "get", "had", "has",
    "have", "how", "into", "its", "just", "make", "may", "might", "more", "most", "not", "of",
    "on", "or", "our", "out", "over", "so", "such", "than", "that", "the", "their", "them",
    "then", "there", "these", "they", "this", "those", "through", "to", "too", "up", "use",
    "was", "we", "were", "what", "when", "where", "which", "while", "who", "why", "will",
    "with", "would", "you", "your",
];

/// True when `question` is in canonical `How might we …?` form.
pub fn is_hmw_question(question: &str) -> bool {
    HMW_QUESTION.is_match(question)
}

/// Compatibility-normalize model output and unify line endings.
pub fn clean_model_text(raw: &str) -> String {
    raw.nfkc().collect::<String>().replace("\r\n", "\n")
}

/// Lowercased alphanumeric tokens in order of appearance
pub fn tokens(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Distinct tokens of at least three characters that are not stopwords
pub fn significant_tokens(text: &str) -> BTreeSet<String> {
    tokens(text)
        .into_iter()
        .filter(|t| t.chars().count() >= 3 && !STOPWORDS.contains(&t.as_str()))
        .collect()
}

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

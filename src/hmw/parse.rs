//! Raw model output to canonical HMW questions.
//!
//! Every function here is total: malformed lines are dropped, never reported.

use crate::text::clean_model_text;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Shortest candidate line kept after list markers are stripped
pub const MIN_CANDIDATE_CHARS: usize = 15;

const CANONICAL_PREFIX: &str = "How might we ";

/// Leading phrasings models use instead of (or stacked on) "How might we"
const SOFT_PHRASES: &[&str] = &["how might we", "what if we", "we could", "might we", "could we"];

static LIST_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:#{1,6}\s*)?(?:(?:\d+\s*[.):]|[-*•+])\s*)?").expect("list marker regex is valid")
});

/// Split model output into candidate lines: list markers, quotes and emphasis
/// stripped, headings and short fragments dropped.
pub fn candidate_lines(raw: &str) -> Vec<String> {
    clean_model_text(raw)
        .lines()
        .map(strip_decoration)
        .filter(|line| line.chars().count() >= MIN_CANDIDATE_CHARS)
        .filter(|line| !line.ends_with(':'))
        .collect()
}

fn strip_decoration(line: &str) -> String {
    let unmarked = LIST_MARKER.replace(line, "");
    unmarked
        .trim()
        .trim_matches(|c: char| matches!(c, '"' | '\'' | '“' | '”' | '‘' | '’' | '*' | '_' | '`'))
        .trim()
        .to_string()
}

fn is_leading_noise(c: char) -> bool {
    c.is_whitespace() || matches!(c, ',' | ':' | ';' | '-' | '.' | '…' | '?' | '!')
}

fn is_trailing_noise(c: char) -> bool {
    c.is_whitespace() || matches!(c, '?' | '.' | '!')
}

/// Remove one soft phrase from the start of `text`, matched case-insensitively
/// on a word boundary.
fn strip_soft_phrase(text: &str) -> Option<&str> {
    SOFT_PHRASES.iter().find_map(|phrase| {
        let head = text.get(..phrase.len())?;
        if !head.eq_ignore_ascii_case(phrase) {
            return None;
        }
        let rest = &text[phrase.len()..];
        match rest.chars().next() {
            Some(c) if c.is_alphanumeric() => None,
            _ => Some(rest),
        }
    })
}

/// Canonicalize a candidate into `How might we <remainder>?`.
///
/// Soft phrasing is stripped repeatedly before the canonical prefix is re-applied, and
/// trailing punctuation collapses to a single `?`. Returns `None` when nothing remains.
/// Idempotent: `normalize_question(&q) == Some(q)` for any `q` this returns.
pub fn normalize_question(candidate: &str) -> Option<String> {
    let collapsed = candidate.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut rest = collapsed.as_str();
    loop {
        let trimmed = rest.trim_start_matches(is_leading_noise);
        match strip_soft_phrase(trimmed) {
            Some(remainder) => rest = remainder,
            None => {
                rest = trimmed;
                break;
            }
        }
    }

    let remainder = rest.trim_end_matches(is_trailing_noise);
    if remainder.is_empty() {
        return None;
    }
    Some(format!("{}{}?", CANONICAL_PREFIX, remainder))
}

/// Full parse: candidate lines, normalized, case-insensitive duplicates removed
/// (first occurrence wins).
pub fn parse_hmw_output(raw: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    candidate_lines(raw)
        .iter()
        .filter_map(|line| normalize_question(line))
        .filter(|question| seen.insert(question.to_lowercase()))
        .collect()
}

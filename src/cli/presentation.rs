//! CLI presentation: response envelopes as pretty JSON or comfy-table text.

use crate::types::{HmwResponse, MetaInfo, SolutionResponse};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde::Serialize;

fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

fn to_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

fn format_meta(meta: &MetaInfo) -> String {
    format!(
        "  Method: {}\n  Model: {}\n  Retries: {}\n  Duration: {}ms\n  Generated: {}",
        meta.generation_method,
        meta.model_used,
        meta.retries,
        meta.duration_ms,
        meta.timestamp.to_rfc3339()
    )
}

pub fn format_hmw_json(response: &HmwResponse) -> Result<String, serde_json::Error> {
    to_json(response)
}

pub fn format_hmw_text(response: &HmwResponse) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}\n\n",
        format_section_heading(&format!("How Might We ({})", response.total_hmws))
    ));
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["#", "Question", "Score", "Confidence", "Sources"]);
    for (index, hmw) in response.hmws.iter().enumerate() {
        let refs = &hmw.source_references;
        table.add_row(vec![
            (index + 1).to_string(),
            hmw.question.clone(),
            format!("{:.2}", hmw.score),
            format!("{:.2}", hmw.confidence),
            format!(
                "{}i / {}m / {}j",
                refs.insight_ids.len(),
                refs.metric_ids.len(),
                refs.jtbd_ids.len()
            ),
        ]);
    }
    out.push_str(&format!("{}\n\n", table));
    out.push_str(&format_meta(&response.meta));
    out
}

pub fn format_solutions_json(response: &SolutionResponse) -> Result<String, serde_json::Error> {
    to_json(response)
}

pub fn format_solutions_text(response: &SolutionResponse) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}\n\n",
        format_section_heading(&format!("Solutions ({})", response.total_solutions))
    ));
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["#", "Title", "Impact", "Effort", "Final", "Metrics"]);
    for (index, solution) in response.solutions.iter().enumerate() {
        table.add_row(vec![
            (index + 1).to_string(),
            solution.title.clone(),
            format!("{:.0}", solution.impact_score),
            format!("{:.0}", solution.effort_score),
            format!("{:.2}", solution.final_score),
            solution.assigned_metrics.join(", "),
        ]);
    }
    out.push_str(&format!("{}\n\n", table));
    out.push_str(&format_meta(&response.meta));
    if response.fallback_metric_used {
        out.push_str("\n  Note: some metrics were assigned by fallback");
    }
    out
}

/// Remote health probe result
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub enabled: bool,
    pub available: bool,
    pub base_url: String,
}

pub fn format_health_json(report: &HealthReport) -> Result<String, serde_json::Error> {
    to_json(report)
}

pub fn format_health_text(report: &HealthReport) -> String {
    let status = match (report.enabled, report.available) {
        (false, _) => "disabled",
        (true, true) => "available",
        (true, false) => "unavailable",
    };
    format!("Remote service: {}\n  URL: {}", status, report.base_url)
}

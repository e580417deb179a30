//! CLI domain: parse, route, output, and presentation only.
//! No generation logic; the route table dispatches to the intelligence service.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands, GenerationArgs};
pub use presentation::{
    format_health_json, format_health_text, format_hmw_json, format_hmw_text,
    format_solutions_json, format_solutions_text, HealthReport,
};
pub use route::RunContext;

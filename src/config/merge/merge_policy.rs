//! Merge rules: defaults, override order, conflict handling.
//!
//! Later sources win key by key: defaults, global file, workspace files, environment.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
///
/// Keys without a serde default must be seeded here so a single overriding key in a
/// later source (e.g. `IDEATE__FALLBACK__PROVIDER__API_KEY`) still deserializes.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("remote.enabled", true)?
        .set_default("remote.base_url", "http://localhost:8000")?
        .set_default("fallback.provider.provider_type", "ollama")?
        .set_default("fallback.provider.model", "llama3.1")?
        .set_default("orchestration.min_fallback_budget_ms", 1000)?
        .set_default("logging.level", "info")
}

//! HMW Fallback Generator
//!
//! Local generation path: one completion call, then total parsing, normalization and
//! heuristic scoring of the raw model text into validated [`HmwResult`]s.

use crate::error::{FallbackGenerationError, GenerationErrorCode};
use crate::provider::CompletionProvider;
use crate::types::{HmwContext, HmwResult};
use crate::validation::validate_hmw_context;
use std::sync::Arc;
use tracing::{debug, warn};

pub mod parse;
pub mod prompt;
pub mod score;

pub use parse::{normalize_question, parse_hmw_output};
pub use prompt::build_hmw_prompt;
pub use score::{context_vocabulary, score_question};

/// Confidence attached to every locally generated HMW
pub const FALLBACK_HMW_CONFIDENCE: f64 = 0.6;

pub const DEFAULT_HMW_MAX_TOKENS: u32 = 1000;

pub struct HmwFallbackGenerator {
    provider: Arc<dyn CompletionProvider>,
    max_tokens: u32,
}

impl HmwFallbackGenerator {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            provider,
            max_tokens: DEFAULT_HMW_MAX_TOKENS,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn model_name(&self) -> &str {
        self.provider.model_name()
    }

    /// Generate up to `count` HMW questions from `context`, best first.
    pub async fn generate_hmws(
        &self,
        context: &HmwContext,
        count: usize,
        temperature: f32,
    ) -> Result<Vec<HmwResult>, FallbackGenerationError> {
        validate_hmw_context(context)?;
        let count = count.max(1);

        let user_prompt = build_hmw_prompt(context, count);
        let completion = self
            .provider
            .complete_text(
                prompt::HMW_SYSTEM_PROMPT,
                &user_prompt,
                temperature,
                self.max_tokens,
            )
            .await
            .map_err(|e| {
                warn!(
                    provider = self.provider.provider_name(),
                    error = %e,
                    "HMW completion failed"
                );
                FallbackGenerationError::from_completion(&e)
            })?;

        let questions = parse_hmw_output(&completion.text);
        debug!(
            candidates = questions.len(),
            requested = count,
            completion_tokens = completion.usage.completion_tokens,
            "Parsed HMW candidates from model output"
        );
        if questions.is_empty() {
            return Err(FallbackGenerationError::new(
                GenerationErrorCode::GenerationFailed,
                "model output contained no usable HMW questions",
            ));
        }

        let vocabulary = context_vocabulary(context);
        let references = context.source_references();
        let mut results: Vec<HmwResult> = questions
            .into_iter()
            .map(|question| HmwResult {
                score: score_question(&question, &vocabulary),
                question,
                source_references: references.clone(),
                confidence: FALLBACK_HMW_CONFIDENCE,
            })
            .collect();

        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results.truncate(count);
        Ok(results)
    }
}

use super::{
    fallback_within, meta, remote_within, retries_spent, Deadline, Generated, HmwGenerator,
    OrchestrationConfig, Strategy, DEFAULT_REMOTE_CONFIDENCE, REMOTE_MODEL_LABEL,
};
use crate::error::{FallbackGenerationError, IntelligenceError, RemoteErrorCode, RemoteServiceError};
use crate::hmw::{context_vocabulary, normalize_question, score_question};
use crate::remote::{HmwGenerationResponse, RemoteGenerator};
use crate::text::round2;
use crate::types::{GenerationOptions, HmwContext, HmwResponse, HmwResult};
use crate::validation::{validate_count, validate_hmw_context};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

/// Remote-first HMW generation with local fallback
pub struct HmwOrchestrator {
    remote: Arc<dyn RemoteGenerator>,
    fallback: Arc<dyn HmwGenerator>,
    config: OrchestrationConfig,
}

impl HmwOrchestrator {
    pub fn new(
        remote: Arc<dyn RemoteGenerator>,
        fallback: Arc<dyn HmwGenerator>,
        config: OrchestrationConfig,
    ) -> Self {
        Self {
            remote,
            fallback,
            config,
        }
    }

    pub async fn is_remote_available(&self) -> bool {
        self.remote.is_enabled() && self.remote.is_available().await
    }

    pub async fn generate_hmw(
        &self,
        context: &HmwContext,
        options: &GenerationOptions,
    ) -> Result<HmwResponse, IntelligenceError> {
        let deadline = Deadline::start(options.deadline());
        validate_hmw_context(context).map_err(FallbackGenerationError::from)?;
        validate_count(options.count, self.config.max_count)
            .map_err(FallbackGenerationError::from)?;

        let mut retries = 0;
        let attempted_remote =
            super::select_strategy(options, self.remote.is_enabled()) == Strategy::TryRemote;
        if attempted_remote {
            let attempt = remote_within(&deadline, async {
                let outcome = self
                    .remote
                    .generate_hmws(context, options, deadline.expires_at())
                    .await?;
                let model = outcome
                    .value
                    .model_used
                    .clone()
                    .unwrap_or_else(|| REMOTE_MODEL_LABEL.to_string());
                let hmws = repair_remote_hmws(outcome.value, context, options.count)
                    .map_err(|e| e.with_attempts(outcome.retries + 1))?;
                Ok(Generated::remote(hmws, outcome.retries, model))
            })
            .await;

            match attempt {
                Ok(generated) => return Ok(self.respond(generated, &deadline)),
                Err(err) => {
                    retries = retries_spent(&err);
                    warn!(
                        code = %err.code,
                        attempts = err.attempts,
                        error = %err.message,
                        "Remote HMW generation failed, falling back to local generation"
                    );
                }
            }
        }

        let hmws = fallback_within(
            &deadline,
            self.config.min_fallback_budget(),
            attempted_remote,
            "hmw generation",
            self.fallback
                .generate_hmws(context, options.count, options.temperature),
        )
        .await?;
        let generated = Generated::fallback(hmws, retries, self.fallback.model_name());
        Ok(self.respond(generated, &deadline))
    }

    fn respond(&self, generated: Generated<Vec<HmwResult>>, deadline: &Deadline) -> HmwResponse {
        let meta = meta(&generated, deadline);
        info!(
            method = %meta.generation_method,
            retries = meta.retries,
            duration_ms = meta.duration_ms,
            count = generated.value.len(),
            "HMW generation completed"
        );
        HmwResponse {
            total_hmws: generated.value.len(),
            hmws: generated.value,
            meta,
        }
    }
}

/// Bring remote HMWs up to the same invariants as local ones.
///
/// Questions are normalized (unusable ones dropped, duplicates removed), scores clamped
/// or computed, missing references filled from the context. No survivors is an
/// `INVALID_RESPONSE`.
pub fn repair_remote_hmws(
    response: HmwGenerationResponse,
    context: &HmwContext,
    count: usize,
) -> Result<Vec<HmwResult>, RemoteServiceError> {
    let vocabulary = context_vocabulary(context);
    let mut seen = HashSet::new();
    let mut hmws: Vec<HmwResult> = response
        .hmws
        .into_iter()
        .filter_map(|remote| {
            let question = normalize_question(&remote.question)?;
            if !seen.insert(question.to_lowercase()) {
                return None;
            }
            let score = match remote.score.filter(|s| s.is_finite()) {
                Some(score) => round2(score.clamp(0.0, 10.0)),
                None => score_question(&question, &vocabulary),
            };
            Some(HmwResult {
                score,
                source_references: remote
                    .source_references
                    .map(|refs| context.known_references(&refs))
                    .filter(|refs| !refs.is_empty())
                    .unwrap_or_else(|| context.source_references()),
                confidence: remote
                    .confidence
                    .filter(|c| c.is_finite())
                    .map_or(DEFAULT_REMOTE_CONFIDENCE, |c| c.clamp(0.0, 1.0)),
                question,
            })
        })
        .collect();

    if hmws.is_empty() {
        return Err(RemoteServiceError::new(
            RemoteErrorCode::InvalidResponse,
            "remote response contained no usable HMW questions",
        ));
    }

    hmws.sort_by(|a, b| b.score.total_cmp(&a.score));
    hmws.truncate(count.max(1));
    Ok(hmws)
}

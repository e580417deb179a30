//! Property-based tests for solution scoring, metric assignment and backfill

use async_trait::async_trait;
use ideate::error::ProviderError;
use ideate::provider::{Completion, CompletionProvider, TokenUsage};
use ideate::solution::{parse::parse_score, SolutionFallbackGenerator};
use ideate::text::round2;
use ideate::types::{HmwContext, HmwItem, MetricItem};
use proptest::prelude::*;
use std::sync::Arc;

struct FixedProvider(String);

#[async_trait]
impl CompletionProvider for FixedProvider {
    async fn complete_text(
        &self,
        _system_prompt: &str,
        _user_prompt: &str,
        _temperature: f32,
        _max_tokens: u32,
    ) -> Result<Completion, ProviderError> {
        Ok(Completion {
            text: self.0.clone(),
            model: "fixed".to_string(),
            usage: TokenUsage::default(),
        })
    }

    fn provider_name(&self) -> &str {
        "fixed"
    }

    fn model_name(&self) -> &str {
        "fixed"
    }
}

fn metric(id: &str, name: &str) -> MetricItem {
    MetricItem {
        id: id.to_string(),
        name: name.to_string(),
        description: None,
        current_value: None,
        target_value: None,
        unit: "%".to_string(),
    }
}

fn context() -> HmwContext {
    HmwContext {
        metrics: vec![metric("m1", "Conversion Rate"), metric("m2", "Weekly Retention")],
        ..Default::default()
    }
}

fn hmws() -> Vec<HmwItem> {
    vec![
        HmwItem {
            id: "h1".to_string(),
            question: "How might we reduce cart abandonment?".to_string(),
            score: None,
        },
        HmwItem {
            id: "h2".to_string(),
            question: "How might we bring lapsed users back?".to_string(),
            score: None,
        },
    ]
}

fn block(title: &str, impact: i32, effort: i32) -> String {
    format!(
        "TITLE: {}\nDESCRIPTION: {} for returning users\nIMPACT: {}\nEFFORT: {}\n",
        title, title, impact, effort
    )
}

/// Any score text lands in [1, 10]
#[test]
fn test_parse_score_is_always_in_range() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&any::<String>(), |raw| {
            let score = parse_score(&raw);
            prop_assert!((1.0..=10.0).contains(&score));
            Ok(())
        })
        .unwrap();
}

/// Exact count, at least one metric each, consistent final scores, best first
#[test]
fn test_fallback_solutions_hold_invariants() {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let mut runner = proptest::test_runner::TestRunner::default();

    let scores = prop::collection::vec((-5i32..20, -5i32..20), 0..6);
    runner
        .run(&(scores, 1usize..8), |(scores, count)| {
            let raw = scores
                .iter()
                .enumerate()
                .map(|(i, (impact, effort))| block(&format!("Idea {}", i + 1), *impact, *effort))
                .collect::<Vec<_>>()
                .join("\n");
            let generator = SolutionFallbackGenerator::new(Arc::new(FixedProvider(raw)));
            let batch = runtime
                .block_on(generator.generate_solutions(&hmws(), &context(), count, 0.7))
                .unwrap();

            prop_assert_eq!(batch.solutions.len(), count);
            for solution in &batch.solutions {
                prop_assert!(!solution.assigned_metrics.is_empty());
                prop_assert!((1.0..=10.0).contains(&solution.impact_score));
                prop_assert!((1.0..=10.0).contains(&solution.effort_score));
                prop_assert_eq!(
                    solution.final_score,
                    round2(solution.impact_score / solution.effort_score)
                );
            }
            for pair in batch.solutions.windows(2) {
                prop_assert!(pair[0].final_score >= pair[1].final_score);
            }
            if scores.len() < count {
                prop_assert!(batch.fallback_metric_used);
            }
            Ok(())
        })
        .unwrap();
}

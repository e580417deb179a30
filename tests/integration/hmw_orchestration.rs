//! Integration tests for remote-first HMW generation with local fallback

use crate::integration::test_utils::{
    checkout_context, remote_hmw, FakeRemote, ScriptedProvider, ScriptedTransport,
};
use ideate::error::{ProviderError, RemoteErrorCode, RemoteServiceError};
use ideate::hmw::HmwFallbackGenerator;
use ideate::orchestrator::{HmwOrchestrator, OrchestrationConfig};
use ideate::remote::{HmwGenerationResponse, RemoteClient, RemoteConfig};
use ideate::text::is_hmw_question;
use ideate::types::{GenerationMethod, GenerationOptions, HmwContext};
use ideate::IntelligenceError;
use std::sync::Arc;
use std::time::Duration;

const MODEL_OUTPUT: &str = "Here are some ideas:\n\
                            1. How might we make payment feel effortless for returning users?\n\
                            2. How might we reduce cart abandonment at payment?\n\
                            3. We could show trust badges during checkout\n";

fn orchestrator(
    remote: Arc<dyn ideate::remote::RemoteGenerator>,
    provider: Arc<ScriptedProvider>,
) -> HmwOrchestrator {
    let fallback = Arc::new(HmwFallbackGenerator::new(provider));
    HmwOrchestrator::new(remote, fallback, OrchestrationConfig::default())
}

fn quick_remote_config() -> RemoteConfig {
    RemoteConfig {
        jitter_ms: 0,
        ..RemoteConfig::default()
    }
}

#[tokio::test]
async fn test_single_insight_and_metric_with_remote_disabled() {
    let remote = Arc::new(FakeRemote::disabled());
    let provider = Arc::new(ScriptedProvider::new(vec![MODEL_OUTPUT]));
    let hmw = orchestrator(remote.clone(), provider.clone());

    let response = hmw
        .generate_hmw(&checkout_context(), &GenerationOptions::default().with_count(1))
        .await
        .unwrap();

    assert_eq!(response.total_hmws, 1);
    assert_eq!(response.hmws.len(), 1);
    let item = &response.hmws[0];
    assert!(item.question.starts_with("How might we"));
    assert!(is_hmw_question(&item.question));
    assert_eq!(item.source_references.insight_ids, vec!["i1"]);
    assert_eq!(item.source_references.metric_ids, vec!["m1"]);
    assert!(item.source_references.jtbd_ids.is_empty());

    assert_eq!(response.meta.generation_method, GenerationMethod::Fallback);
    assert_eq!(response.meta.retries, 0);
    assert_eq!(response.meta.model_used, "scripted-model");
    assert_eq!(remote.hmw_calls(), 0);
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_remote_success_never_invokes_fallback() {
    let remote = Arc::new(FakeRemote::hmws(
        HmwGenerationResponse {
            hmws: vec![
                remote_hmw("How might we simplify payment for mobile users?", 7.5),
                remote_hmw("what if we removed account creation from checkout", 8.0),
            ],
            model_used: Some("hmw-service-v3".to_string()),
        },
        1,
    ));
    let provider = Arc::new(ScriptedProvider::new(vec![MODEL_OUTPUT]));
    let hmw = orchestrator(remote.clone(), provider.clone());

    let response = hmw
        .generate_hmw(&checkout_context(), &GenerationOptions::default())
        .await
        .unwrap();

    assert_eq!(provider.calls(), 0);
    assert_eq!(remote.hmw_calls(), 1);
    assert_eq!(response.meta.generation_method, GenerationMethod::Remote);
    assert_eq!(response.meta.retries, 1);
    assert_eq!(response.meta.model_used, "hmw-service-v3");
    assert_eq!(response.total_hmws, 2);
    assert_eq!(
        response.hmws[0].question,
        "How might we removed account creation from checkout?"
    );
    for item in &response.hmws {
        assert!(is_hmw_question(&item.question));
    }
}

#[tokio::test]
async fn test_invalid_request_makes_one_attempt_then_falls_back() {
    let transport = Arc::new(ScriptedTransport::new(vec![
        ScriptedTransport::status(400, r#"{"detail":"bad context"}"#),
        ScriptedTransport::status(200, r#"{"hmws":[]}"#),
    ]));
    let remote = Arc::new(RemoteClient::with_transport(
        quick_remote_config(),
        transport.clone(),
    ));
    let provider = Arc::new(ScriptedProvider::new(vec![MODEL_OUTPUT]));
    let hmw = orchestrator(remote, provider.clone());

    let response = hmw
        .generate_hmw(&checkout_context(), &GenerationOptions::default())
        .await
        .unwrap();

    assert_eq!(transport.calls(), 1);
    assert_eq!(provider.calls(), 1);
    assert_eq!(response.meta.generation_method, GenerationMethod::Fallback);
    assert_eq!(response.meta.retries, 0);
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_retries_are_reported_on_fallback() {
    let transport = Arc::new(ScriptedTransport::new(vec![
        ScriptedTransport::status(503, "down"),
        ScriptedTransport::status(503, "down"),
        ScriptedTransport::status(502, "still down"),
    ]));
    let remote = Arc::new(RemoteClient::with_transport(
        quick_remote_config(),
        transport.clone(),
    ));
    let provider = Arc::new(ScriptedProvider::new(vec![MODEL_OUTPUT]));
    let hmw = orchestrator(remote, provider.clone());

    let response = hmw
        .generate_hmw(&checkout_context(), &GenerationOptions::default())
        .await
        .unwrap();

    assert_eq!(transport.calls(), 3);
    assert_eq!(response.meta.generation_method, GenerationMethod::Fallback);
    assert_eq!(response.meta.retries, 2);
    assert_eq!(response.total_hmws, 3);
}

#[tokio::test]
async fn test_unusable_remote_output_falls_back() {
    let remote = Arc::new(FakeRemote::hmws(
        HmwGenerationResponse {
            hmws: vec![remote_hmw("?", 9.0)],
            model_used: None,
        },
        0,
    ));
    let provider = Arc::new(ScriptedProvider::new(vec![MODEL_OUTPUT]));
    let hmw = orchestrator(remote.clone(), provider.clone());

    let response = hmw
        .generate_hmw(&checkout_context(), &GenerationOptions::default())
        .await
        .unwrap();

    assert_eq!(remote.hmw_calls(), 1);
    assert_eq!(provider.calls(), 1);
    assert_eq!(response.meta.generation_method, GenerationMethod::Fallback);
}

#[tokio::test]
async fn test_empty_context_fails_before_any_call() {
    let remote = Arc::new(FakeRemote::failing(RemoteServiceError::new(
        RemoteErrorCode::ServiceUnavailable,
        "down",
    )));
    let provider = Arc::new(ScriptedProvider::new(vec![MODEL_OUTPUT]));
    let hmw = orchestrator(remote.clone(), provider.clone());

    let err = hmw
        .generate_hmw(&HmwContext::default(), &GenerationOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.code(), "INVALID_CONTEXT");
    assert_eq!(remote.hmw_calls(), 0);
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_forced_fallback_skips_remote() {
    let remote = Arc::new(FakeRemote::hmws(
        HmwGenerationResponse {
            hmws: vec![remote_hmw("How might we simplify payment?", 7.5)],
            model_used: None,
        },
        0,
    ));
    let provider = Arc::new(ScriptedProvider::new(vec![MODEL_OUTPUT]));
    let hmw = orchestrator(remote.clone(), provider.clone());

    let response = hmw
        .generate_hmw(
            &checkout_context(),
            &GenerationOptions::default().forced_fallback(),
        )
        .await
        .unwrap();

    assert_eq!(remote.hmw_calls(), 0);
    assert_eq!(response.meta.generation_method, GenerationMethod::Fallback);
}

#[tokio::test]
async fn test_fallback_failure_reaches_caller() {
    let remote = Arc::new(FakeRemote::failing(RemoteServiceError::new(
        RemoteErrorCode::ConnectionFailed,
        "refused",
    )));
    let provider = Arc::new(ScriptedProvider::failing(ProviderError::RequestFailed(
        "Connection error: refused".to_string(),
    )));
    let hmw = orchestrator(remote, provider);

    let err = hmw
        .generate_hmw(&checkout_context(), &GenerationOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, IntelligenceError::Fallback(_)));
    assert_eq!(err.code(), "GENERATION_FAILED");
}

#[tokio::test(start_paused = true)]
async fn test_slow_remote_exhausts_deadline() {
    let remote = Arc::new(
        FakeRemote::hmws(
            HmwGenerationResponse {
                hmws: vec![remote_hmw("How might we simplify payment?", 7.5)],
                model_used: None,
            },
            0,
        )
        .with_delay(Duration::from_secs(30)),
    );
    let provider = Arc::new(ScriptedProvider::new(vec![MODEL_OUTPUT]));
    let hmw = orchestrator(remote.clone(), provider.clone());

    let err = hmw
        .generate_hmw(
            &checkout_context(),
            &GenerationOptions::default().with_deadline(Duration::from_millis(1500)),
        )
        .await
        .unwrap_err();

    match err {
        IntelligenceError::Timeout { timeout_ms, .. } => assert_eq!(timeout_ms, 1500),
        other => panic!("expected timeout, got {:?}", other),
    }
    assert_eq!(remote.hmw_calls(), 1);
    assert_eq!(provider.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_fallback_runs_inside_remaining_deadline() {
    let remote = Arc::new(FakeRemote::failing(RemoteServiceError::new(
        RemoteErrorCode::ConnectionFailed,
        "refused",
    )));
    let provider =
        Arc::new(ScriptedProvider::new(vec![MODEL_OUTPUT]).with_delay(Duration::from_millis(200)));
    let hmw = orchestrator(remote, provider.clone());

    let response = hmw
        .generate_hmw(
            &checkout_context(),
            &GenerationOptions::default().with_deadline(Duration::from_secs(5)),
        )
        .await
        .unwrap();
    assert_eq!(response.meta.generation_method, GenerationMethod::Fallback);
    assert!(response.meta.duration_ms >= 200);
}

#[tokio::test(start_paused = true)]
async fn test_slow_fallback_is_cut_off_at_deadline() {
    let remote = Arc::new(FakeRemote::disabled());
    let provider =
        Arc::new(ScriptedProvider::new(vec![MODEL_OUTPUT]).with_delay(Duration::from_secs(60)));
    let hmw = orchestrator(remote, provider.clone());

    let err = hmw
        .generate_hmw(
            &checkout_context(),
            &GenerationOptions::default().with_deadline(Duration::from_secs(2)),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "TIMEOUT");
    assert_eq!(provider.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_forced_fallback_under_a_short_deadline_still_runs() {
    let remote = Arc::new(FakeRemote::disabled());
    let provider = Arc::new(ScriptedProvider::new(vec![MODEL_OUTPUT]));
    let hmw = orchestrator(remote.clone(), provider.clone());

    let response = hmw
        .generate_hmw(
            &checkout_context(),
            &GenerationOptions::default()
                .forced_fallback()
                .with_deadline(Duration::from_millis(800)),
        )
        .await
        .unwrap();

    assert_eq!(provider.calls(), 1);
    assert_eq!(remote.hmw_calls(), 0);
    assert_eq!(response.meta.generation_method, GenerationMethod::Fallback);
    assert_eq!(response.total_hmws, 3);
}

#[tokio::test(start_paused = true)]
async fn test_retries_cut_short_by_deadline_are_still_counted() {
    let transport = Arc::new(ScriptedTransport::new(vec![
        ScriptedTransport::status(503, "down"),
        ScriptedTransport::status(503, "down"),
        ScriptedTransport::status(503, "down"),
    ]));
    let remote = Arc::new(RemoteClient::with_transport(
        quick_remote_config(),
        transport.clone(),
    ));
    let provider = Arc::new(ScriptedProvider::new(vec![MODEL_OUTPUT]));
    let hmw = orchestrator(remote, provider.clone());

    // Second failure lands at 1000ms; the 2000ms backoff after it would overrun 2500ms
    let response = hmw
        .generate_hmw(
            &checkout_context(),
            &GenerationOptions::default().with_deadline(Duration::from_millis(2500)),
        )
        .await
        .unwrap();

    assert_eq!(transport.calls(), 2);
    assert_eq!(provider.calls(), 1);
    assert_eq!(response.meta.generation_method, GenerationMethod::Fallback);
    assert_eq!(response.meta.retries, 1);
}

#[tokio::test]
async fn test_count_limit_comes_from_configuration() {
    let remote = Arc::new(FakeRemote::disabled());
    let provider = Arc::new(ScriptedProvider::new(vec![MODEL_OUTPUT]));
    let fallback = Arc::new(HmwFallbackGenerator::new(provider.clone()));
    let config = OrchestrationConfig {
        max_count: 2,
        ..OrchestrationConfig::default()
    };
    let hmw = HmwOrchestrator::new(remote, fallback, config);

    let err = hmw
        .generate_hmw(&checkout_context(), &GenerationOptions::default().with_count(3))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "INVALID_CONTEXT");
    assert_eq!(provider.calls(), 0);

    let response = hmw
        .generate_hmw(&checkout_context(), &GenerationOptions::default().with_count(2))
        .await
        .unwrap();
    assert_eq!(response.total_hmws, 2);
}

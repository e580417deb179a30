//! Integration tests for the remote generation client over a scripted transport

use crate::integration::test_utils::{checkout_context, hmw_item, ScriptedTransport};
use ideate::error::RemoteErrorCode;
use ideate::remote::transport::TransportError;
use ideate::remote::{RemoteClient, RemoteConfig, RemoteGenerator};
use ideate::types::GenerationOptions;
use std::sync::Arc;

fn config() -> RemoteConfig {
    RemoteConfig {
        base_url: "http://gen.internal:8000/".to_string(),
        api_key: Some("secret-token".to_string()),
        jitter_ms: 0,
        ..RemoteConfig::default()
    }
}

const HMW_BODY: &str = r#"{
    "hmws": [{"question": "How might we simplify payment?", "score": 7.0}],
    "model_used": "hmw-service-v3"
}"#;

#[tokio::test]
async fn test_hmw_request_shape_and_headers() {
    let transport = Arc::new(ScriptedTransport::new(vec![ScriptedTransport::status(
        200, HMW_BODY,
    )]));
    let client = RemoteClient::with_transport(config(), transport.clone());

    let outcome = client
        .generate_hmws(
            &checkout_context(),
            &GenerationOptions::default().with_count(3),
            None,
        )
        .await
        .unwrap();
    assert_eq!(outcome.retries, 0);
    assert_eq!(outcome.value.hmws.len(), 1);
    assert_eq!(outcome.value.model_used.as_deref(), Some("hmw-service-v3"));

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.url, "http://gen.internal:8000/v1/hmw/generate");
    assert!(request
        .headers
        .contains(&("Content-Type".to_string(), "application/json".to_string())));
    assert!(request
        .headers
        .contains(&("Authorization".to_string(), "Bearer secret-token".to_string())));

    let payload = request.payload.as_ref().unwrap();
    assert_eq!(payload["count"], 3);
    assert_eq!(payload["context"]["insights"][0]["id"], "i1");
    assert_eq!(payload["context"]["metrics"][0]["id"], "m1");
}

#[tokio::test]
async fn test_solution_request_carries_hmws() {
    let transport = Arc::new(ScriptedTransport::new(vec![ScriptedTransport::status(
        200,
        r#"{"solutions": []}"#,
    )]));
    let client = RemoteClient::with_transport(config(), transport.clone());
    let hmws = vec![hmw_item("h1", "How might we reduce cart abandonment?")];

    let outcome = client
        .generate_solutions(&hmws, &checkout_context(), &GenerationOptions::default(), None)
        .await
        .unwrap();
    assert!(outcome.value.solutions.is_empty());

    let request = &transport.requests()[0];
    assert_eq!(request.url, "http://gen.internal:8000/v1/solutions/generate");
    let payload = request.payload.as_ref().unwrap();
    assert_eq!(payload["hmws"][0]["id"], "h1");
    assert_eq!(payload["count"], 5);
}

#[tokio::test(start_paused = true)]
async fn test_rate_limit_then_success_counts_one_retry() {
    let transport = Arc::new(ScriptedTransport::new(vec![
        ScriptedTransport::status(429, "slow down"),
        ScriptedTransport::status(200, HMW_BODY),
    ]));
    let client = RemoteClient::with_transport(config(), transport.clone());

    let outcome = client
        .generate_hmws(&checkout_context(), &GenerationOptions::default(), None)
        .await
        .unwrap();
    assert_eq!(outcome.retries, 1);
    assert_eq!(transport.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_connection_failures_exhaust_retry_budget() {
    let transport = Arc::new(ScriptedTransport::new(vec![
        Err(TransportError::Connection("refused".to_string())),
        Err(TransportError::Connection("refused".to_string())),
        Err(TransportError::Connection("refused".to_string())),
        ScriptedTransport::status(200, HMW_BODY),
    ]));
    let client = RemoteClient::with_transport(config(), transport.clone());

    let err = client
        .generate_hmws(&checkout_context(), &GenerationOptions::default(), None)
        .await
        .unwrap_err();
    assert_eq!(err.code, RemoteErrorCode::ConnectionFailed);
    assert_eq!(err.attempts, 3);
    assert_eq!(transport.calls(), 3);
}

#[tokio::test]
async fn test_status_codes_map_to_error_codes() {
    let cases = [
        (401, RemoteErrorCode::Unauthorized),
        (403, RemoteErrorCode::Forbidden),
        (404, RemoteErrorCode::EndpointNotFound),
        (422, RemoteErrorCode::ValidationError),
    ];
    for (status, expected) in cases {
        let transport = Arc::new(ScriptedTransport::new(vec![ScriptedTransport::status(
            status, "nope",
        )]));
        let client = RemoteClient::with_transport(config(), transport.clone());
        let err = client
            .generate_hmws(&checkout_context(), &GenerationOptions::default(), None)
            .await
            .unwrap_err();
        assert_eq!(err.code, expected, "status {}", status);
        assert_eq!(err.status, Some(status));
        assert_eq!(transport.calls(), 1, "status {} must not be retried", status);
    }
}

#[tokio::test(start_paused = true)]
async fn test_unexpected_status_is_retried_as_http_error() {
    let transport = Arc::new(ScriptedTransport::new(vec![
        ScriptedTransport::status(418, "teapot"),
        ScriptedTransport::status(418, "teapot"),
        ScriptedTransport::status(418, "teapot"),
    ]));
    let client = RemoteClient::with_transport(config(), transport.clone());
    let err = client
        .generate_hmws(&checkout_context(), &GenerationOptions::default(), None)
        .await
        .unwrap_err();
    assert_eq!(err.code, RemoteErrorCode::HttpError);
    assert_eq!(err.attempts, 3);
}

#[tokio::test]
async fn test_health_probe_uses_health_endpoint() {
    let transport = Arc::new(ScriptedTransport::new(vec![
        ScriptedTransport::status(200, "ok"),
        ScriptedTransport::status(503, "down"),
    ]));
    let client = RemoteClient::with_transport(config(), transport.clone());

    assert!(client.is_available().await);
    assert!(!client.is_available().await);
    assert_eq!(transport.requests()[0].url, "http://gen.internal:8000/health");
    assert!(transport.requests()[0].payload.is_none());
}

//! Integration tests for the ideate binary.
//!
//! The remote service is disabled and the fallback provider points at a closed local
//! port, so no test reaches the network.

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const OFFLINE_CONFIG: &str = r#"
[remote]
enabled = false

[fallback.provider]
provider_type = "local"
model = "offline-model"
endpoint = "http://127.0.0.1:9/v1"

[logging]
level = "off"
"#;

fn run(workspace: &Path, args: &[&str]) -> Output {
    let config_path = workspace.join("ideate.toml");
    std::fs::write(&config_path, OFFLINE_CONFIG).unwrap();
    Command::new(env!("CARGO_BIN_EXE_ideate"))
        .env_remove("IDEATE_LOG")
        .env_remove("IDEATE_ENV")
        .env_remove("IDEATE__REMOTE__MAX_RETRIES")
        .env("XDG_CONFIG_HOME", workspace.join("xdg"))
        .arg("--workspace")
        .arg(workspace)
        .arg("--config")
        .arg(&config_path)
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn test_health_json_reports_disabled_remote() {
    let temp = TempDir::new().unwrap();
    let output = run(temp.path(), &["health", "--format", "json"]);

    assert!(
        output.status.success(),
        "health should succeed: stderr={:?}",
        String::from_utf8_lossy(&output.stderr)
    );
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["enabled"], false);
    assert_eq!(report["available"], false);
}

#[test]
fn test_empty_context_is_rejected_with_code() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("context.json"), "{}").unwrap();

    let output = run(temp.path(), &["hmw", "--context", "context.json"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[INVALID_CONTEXT]"), "stderr: {}", stderr);
    assert!(output.stdout.is_empty());
}

#[test]
fn test_unreachable_fallback_model_is_generation_failure() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("context.json"),
        r#"{"insights": [{"id": "i1", "content": "Users abandon cart at payment"}]}"#,
    )
    .unwrap();

    let output = run(temp.path(), &["hmw", "--context", "context.json", "--count", "1"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[GENERATION_FAILED]"), "stderr: {}", stderr);
}

#[test]
fn test_solutions_without_metrics_fail_before_generation() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("input.json"),
        r#"{
            "insights": [{"id": "i1", "content": "Users abandon cart at payment"}],
            "hmws": [{"id": "h1", "question": "How might we reduce cart abandonment?"}]
        }"#,
    )
    .unwrap();

    let output = run(temp.path(), &["solutions", "--input", "input.json"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[INVALID_CONTEXT]"), "stderr: {}", stderr);
}

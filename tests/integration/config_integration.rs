//! Integration tests for configuration loading and service composition

use ideate::config::{ConfigLoader, IdeateConfig, ProviderType};
use ideate::{IntelligenceError, IntelligenceService};
use std::sync::Mutex;
use tempfile::TempDir;

// Serializes environment access across config tests
static ENV_MUTEX: Mutex<()> = Mutex::new(());

struct EnvGuard {
    saved: Vec<(&'static str, Option<std::ffi::OsString>)>,
}

impl EnvGuard {
    fn set(vars: &[(&'static str, &str)]) -> Self {
        let saved = vars
            .iter()
            .map(|(key, _)| (*key, std::env::var_os(key)))
            .collect();
        for (key, value) in vars {
            std::env::set_var(key, value);
        }
        Self { saved }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &self.saved {
            match value {
                Some(value) => std::env::set_var(key, value),
                None => std::env::remove_var(key),
            }
        }
    }
}

#[test]
fn test_environment_overrides_workspace_file() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let temp = TempDir::new().unwrap();
    let xdg = temp.path().join("xdg");
    std::fs::create_dir_all(temp.path().join("config")).unwrap();
    std::fs::write(
        temp.path().join("config").join("config.toml"),
        r#"
[remote]
base_url = "http://workspace.example.com"
max_retries = 1
"#,
    )
    .unwrap();
    let _env = EnvGuard::set(&[
        ("XDG_CONFIG_HOME", xdg.to_str().unwrap()),
        ("IDEATE__REMOTE__MAX_RETRIES", "4"),
    ]);

    let config = ConfigLoader::load(temp.path()).unwrap();
    assert_eq!(config.remote.base_url, "http://workspace.example.com");
    assert_eq!(config.remote.max_retries, 4);
}

#[test]
fn test_environment_specific_workspace_file() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let temp = TempDir::new().unwrap();
    let xdg = temp.path().join("xdg");
    std::fs::create_dir_all(temp.path().join("config")).unwrap();
    std::fs::write(
        temp.path().join("config").join("staging.toml"),
        r#"
[remote]
enabled = false

[fallback.provider]
provider_type = "local"
model = "qwen2.5"
endpoint = "http://127.0.0.1:8080/v1"
"#,
    )
    .unwrap();
    let _env = EnvGuard::set(&[
        ("XDG_CONFIG_HOME", xdg.to_str().unwrap()),
        ("IDEATE_ENV", "staging"),
    ]);

    let config = ConfigLoader::load(temp.path()).unwrap();
    assert!(!config.remote.enabled);
    assert_eq!(config.fallback.provider.provider_type, ProviderType::Local);
    assert!(config.validate().is_ok());
    assert!(IntelligenceService::from_config(&config).is_ok());
}

#[test]
fn test_malformed_file_is_config_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("broken.toml");
    std::fs::write(&path, "[remote\nbase_url = ").unwrap();

    let err = IntelligenceError::from(ConfigLoader::load_from_file(&path).unwrap_err());
    assert_eq!(err.code(), "CONFIG_ERROR");
}

#[test]
fn test_invalid_values_block_composition() {
    let mut config = IdeateConfig::default();
    config.remote.backoff_cap_ms = 10;
    let err = match IntelligenceService::from_config(&config) {
        Err(err) => err,
        Ok(_) => panic!("composition should reject invalid config"),
    };
    assert_eq!(err.code(), "CONFIG_ERROR");
    assert!(err.to_string().contains("Remote:"));
}

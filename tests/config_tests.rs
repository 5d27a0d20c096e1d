use ai_summary::core::config::{AppConfig, DEFAULT_MODEL, DEFAULT_THEME};
use ai_summary::errors::ConfigError;
use serde_json::{Map, json};
use std::collections::HashMap;
use std::path::Path;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_defaults_with_api_key_only() {
    let config = AppConfig::load(Path::new("/nonexistent/config.json"), env(&[("LLM_API_KEY", "k")]))
        .unwrap();

    assert_eq!(config.model, DEFAULT_MODEL);
    assert_eq!(config.theme, DEFAULT_THEME);
    assert!(config.allows_any_origin());
    assert!(config.admin_token.is_none());
}

#[test]
fn test_missing_api_key_is_rejected() {
    let err = AppConfig::load(Path::new("/nonexistent/config.json"), env(&[])).unwrap_err();
    assert!(matches!(err, ConfigError::Missing("LLM_API_KEY")));
}

#[test]
fn test_legacy_key_variable_is_accepted() {
    let config = AppConfig::load(
        Path::new("/nonexistent/config.json"),
        env(&[("DASHSCOPE_API_KEY", "legacy")]),
    )
    .unwrap();
    assert_eq!(config.api_key, "legacy");
}

#[test]
fn test_file_with_legacy_field_names() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{
            "DASHSCOPE_API_KEY": "from-file",
            "SYSTEM_CONTENT": "一句话总结。",
            "THEME": "dark",
            "CORS_ORIGIN": "https://a.example, https://b.example"
        }"#,
    )
    .unwrap();

    let config = AppConfig::load(&path, env(&[])).unwrap();

    assert_eq!(config.api_key, "from-file");
    assert_eq!(config.system_content, "一句话总结。");
    assert_eq!(config.theme, "dark");
    assert_eq!(config.cors_origin, vec!["https://a.example", "https://b.example"]);
    assert!(!config.allows_any_origin());
    assert_eq!(config.config_path, path);
}

#[test]
fn test_environment_overrides_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{ "api_key": "file", "model": "qwen-turbo" }"#).unwrap();

    let config = AppConfig::load(
        &path,
        env(&[
            ("LLM_MODEL", "qwen-max"),
            ("UPSTREAM_TIMEOUT_SECS", "5"),
            ("ADMIN_TOKEN", "t"),
        ]),
    )
    .unwrap();

    assert_eq!(config.api_key, "file");
    assert_eq!(config.model, "qwen-max");
    assert_eq!(config.upstream_timeout().as_secs(), 5);
    assert_eq!(config.admin_token.as_deref(), Some("t"));
}

#[test]
fn test_invalid_values_are_rejected() {
    let missing = Path::new("/nonexistent/config.json");

    let err = AppConfig::load(missing, env(&[("LLM_API_KEY", "k"), ("LLM_BASE_URL", "nope")]))
        .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid("LLM_BASE_URL", _)));

    let err = AppConfig::load(
        missing,
        env(&[("LLM_API_KEY", "k"), ("UPSTREAM_TIMEOUT_SECS", "0")]),
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid("UPSTREAM_TIMEOUT_SECS", _)));

    let err = AppConfig::load(missing, env(&[("LLM_API_KEY", "k"), ("BIND_ADDR", "localhost")]))
        .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid("BIND_ADDR", _)));
}

#[test]
fn test_malformed_file_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = AppConfig::load(&path, env(&[("LLM_API_KEY", "k")])).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn test_persist_never_writes_environment_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    let config = AppConfig::load(
        &path,
        env(&[
            ("LLM_API_KEY", "sk-from-env"),
            ("ADMIN_TOKEN", "admin-from-env"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("THEMES_DIR", "/srv/themes"),
        ]),
    )
    .unwrap();

    let mut changes = Map::new();
    changes.insert("model".to_string(), json!("qwen-max"));
    config.persist(&changes).await.unwrap();

    let saved = read_json(&path);
    assert_eq!(saved, json!({ "model": "qwen-max" }));
    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(!raw.contains("sk-from-env"));
    assert!(!raw.contains("admin-from-env"));
}

#[tokio::test]
async fn test_persist_keeps_file_keys_and_replaces_legacy_spelling() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{ "DASHSCOPE_API_KEY": "old", "THEME": "light", "bind_addr": "127.0.0.1:9000" }"#,
    )
    .unwrap();
    let config = AppConfig::load(&path, env(&[])).unwrap();

    let mut changes = Map::new();
    changes.insert("api_key".to_string(), json!("new"));
    config.persist(&changes).await.unwrap();

    let saved = read_json(&path);
    assert_eq!(saved["api_key"], "new");
    assert!(saved.get("DASHSCOPE_API_KEY").is_none());
    assert_eq!(saved["THEME"], "light");
    assert_eq!(saved["bind_addr"], "127.0.0.1:9000");

    // The rewritten file still loads.
    let reloaded = AppConfig::load(&path, env(&[])).unwrap();
    assert_eq!(reloaded.api_key, "new");
}

#[test]
fn test_admin_token_is_never_serialized() {
    let config = AppConfig {
        admin_token: Some("secret".to_string()),
        ..AppConfig::default()
    };
    let body = serde_json::to_string(&config).unwrap();
    assert!(!body.contains("secret"));
}

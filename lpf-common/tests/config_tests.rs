//! Unit tests for configuration loading and setting resolution
//!
//! Note: Uses serial_test to prevent ENV variable race conditions.
//! Tests that manipulate LPF_* variables are marked with #[serial] so
//! they run sequentially, not in parallel.

use lpf_common::config::{load_toml_config, resolve_setting, TomlConfig};
use serial_test::serial;
use std::env;

#[test]
fn toml_parses_all_fields() {
    let content = r#"
bind = "0.0.0.0:9000"
google_api_key = "g-key"
newsapi_key = "n-key"
supabase_url = "https://project.supabase.co"
supabase_key = "s-key"
storage_bucket = "media"
cors_origins = ["http://localhost:3000", "http://192.168.1.10:3000"]
"#;
    let config: TomlConfig = toml::from_str(content).unwrap();
    assert_eq!(config.bind.as_deref(), Some("0.0.0.0:9000"));
    assert_eq!(config.google_api_key.as_deref(), Some("g-key"));
    assert_eq!(config.newsapi_key.as_deref(), Some("n-key"));
    assert_eq!(
        config.supabase_url.as_deref(),
        Some("https://project.supabase.co")
    );
    assert_eq!(config.storage_bucket.as_deref(), Some("media"));
    assert_eq!(config.cors_origins.as_ref().unwrap().len(), 2);
}

#[test]
fn toml_partial_file_leaves_rest_unset() {
    let config: TomlConfig = toml::from_str("bind = \"127.0.0.1:8000\"").unwrap();
    assert_eq!(config.bind.as_deref(), Some("127.0.0.1:8000"));
    assert!(config.google_api_key.is_none());
    assert!(config.cors_origins.is_none());
}

#[test]
fn missing_config_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_toml_config(&dir.path().join("lpf-gen.toml")).unwrap();
    assert!(config.bind.is_none());
}

#[test]
fn config_file_on_disk_is_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lpf-gen.toml");
    std::fs::write(&path, "newsapi_key = \"from-disk\"").unwrap();

    let config = load_toml_config(&path).unwrap();
    assert_eq!(config.newsapi_key.as_deref(), Some("from-disk"));
}

#[test]
#[serial]
fn env_wins_over_toml() {
    env::set_var("LPF_TEST_KEY", "from-env");
    let resolved = resolve_setting("test key", "LPF_TEST_KEY", Some("from-toml"));
    env::remove_var("LPF_TEST_KEY");
    assert_eq!(resolved.as_deref(), Some("from-env"));
}

#[test]
#[serial]
fn toml_used_when_env_absent() {
    env::remove_var("LPF_TEST_KEY");
    let resolved = resolve_setting("test key", "LPF_TEST_KEY", Some("from-toml"));
    assert_eq!(resolved.as_deref(), Some("from-toml"));
}

#[test]
#[serial]
fn whitespace_values_do_not_resolve() {
    env::set_var("LPF_TEST_KEY", "   ");
    let resolved = resolve_setting("test key", "LPF_TEST_KEY", None);
    env::remove_var("LPF_TEST_KEY");
    assert!(resolved.is_none());
}

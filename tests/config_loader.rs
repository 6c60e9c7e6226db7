use postboard::config::{Config, ConfigError, UpdateFailurePolicy};
use postboard::posts::FetchPolicy;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_config_default_values() {
    let config = Config::default();

    assert_eq!(config.api.base_url, "https://jsonplaceholder.typicode.com");
    assert_eq!(config.api.timeout_seconds, 30);
    assert_eq!(config.api.connect_timeout_seconds, 5);
    assert_eq!(config.store.update_failure, UpdateFailurePolicy::Optimistic);
    assert_eq!(config.store.fetch_policy, FetchPolicy::Reconcile);
    assert_eq!(config.store.command_buffer, 64);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_path_ends_with_expected() {
    let path = Config::config_path();
    assert!(path.ends_with("postboard/config.toml"));
}

#[test]
fn test_missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_load_full_config() {
    let file = write_config(
        r#"
[api]
base_url = "http://localhost:3500/"
timeout_seconds = 10
connect_timeout_seconds = 2

[store]
update_failure = "reject"
fetch_policy = "replace"
command_buffer = 8
"#,
    );

    let config = Config::load_from(file.path()).unwrap();
    assert_eq!(config.api.base_url, "http://localhost:3500/");
    assert_eq!(config.api.timeout_seconds, 10);
    assert_eq!(config.api.connect_timeout_seconds, 2);
    assert_eq!(config.store.update_failure, UpdateFailurePolicy::Reject);
    assert_eq!(config.store.fetch_policy, FetchPolicy::Replace);
    assert_eq!(config.store.command_buffer, 8);
}

#[test]
fn test_partial_config_fills_defaults() {
    let file = write_config(
        r#"
[store]
fetch_policy = "replace"
"#,
    );

    let config = Config::load_from(file.path()).unwrap();
    assert_eq!(config.api, Config::default().api);
    assert_eq!(config.store.fetch_policy, FetchPolicy::Replace);
    assert_eq!(config.store.update_failure, UpdateFailurePolicy::Optimistic);
    assert_eq!(config.store.command_buffer, 64);
}

#[test]
fn test_invalid_toml_is_parse_error() {
    let file = write_config("[api\nbase_url = ");
    let err = Config::load_from(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}

#[test]
fn test_unknown_policy_is_parse_error() {
    let file = write_config(
        r#"
[store]
update_failure = "sometimes"
"#,
    );
    let err = Config::load_from(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}

#[test]
fn test_non_http_base_url_fails_validation() {
    let file = write_config(
        r#"
[api]
base_url = "ftp://example.com"
"#,
    );
    let err = Config::load_from(file.path()).unwrap_err();
    match err {
        ConfigError::ValidationError { message } => assert!(message.contains("api.base_url")),
        other => panic!("expected ValidationError, got {:?}", other),
    }
}

#[test]
fn test_zero_timeout_fails_validation() {
    let mut config = Config::default();
    config.api.timeout_seconds = 0;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ValidationError { .. })
    ));

    let mut config = Config::default();
    config.api.connect_timeout_seconds = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_zero_command_buffer_fails_validation() {
    let mut config = Config::default();
    config.store.command_buffer = 0;
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("store.command_buffer"));
}

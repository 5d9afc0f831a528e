//! Tests for config functionality.

use crate::config::{CONFIG_ENV_VAR, Config};
use crate::error::ShpFilesError;
use serial_test::serial;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_default_config() {
    let config = Config::default();

    assert!(config.advisory_write_locks);
    assert!(config.capture_traces);
    assert_eq!(config.stale_locker_secs, 300);
    assert_eq!(config.audit_interval_secs, 30);
    assert_eq!(config.http_timeout_secs, 30);
    assert!(config.staging_dir.is_none());
    assert_eq!(config.stale_after(), Duration::from_secs(300));
}

#[test]
fn test_parse_minimal_yaml() {
    let config = Config::from_yaml("").unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_parse_partial_yaml() {
    let yaml = r#"
advisory_write_locks: false
staging_dir: /var/tmp/shp
"#;
    let config = Config::from_yaml(yaml).unwrap();

    assert!(!config.advisory_write_locks);
    assert_eq!(config.staging_dir, Some(PathBuf::from("/var/tmp/shp")));
    // Untouched fields keep their defaults
    assert!(config.capture_traces);
    assert_eq!(config.audit_interval_secs, 30);
}

#[test]
fn test_unknown_fields_are_ignored() {
    let yaml = r#"
stale_locker_secs: 60
some_future_option: true
"#;
    let config = Config::from_yaml(yaml).unwrap();
    assert_eq!(config.stale_locker_secs, 60);
}

#[test]
fn test_invalid_yaml_is_config_error() {
    let result = Config::from_yaml("stale_locker_secs: [not, a, number]");
    assert!(matches!(result, Err(ShpFilesError::Config(_))));
}

#[test]
fn test_zero_values_fail_validation() {
    for field in ["stale_locker_secs", "audit_interval_secs", "http_timeout_secs"] {
        let yaml = format!("{}: 0", field);
        let err = Config::from_yaml(&yaml).unwrap_err();
        assert!(err.to_string().contains(field), "{}", err);
    }
}

#[test]
fn test_empty_staging_dir_fails_validation() {
    let config = Config {
        staging_dir: Some(PathBuf::new()),
        ..Config::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_yaml_roundtrip_preserves_values() {
    let config = Config {
        advisory_write_locks: false,
        staging_dir: Some(PathBuf::from("/scratch")),
        ..Config::default()
    };
    let yaml = config.to_yaml().unwrap();
    assert_eq!(Config::from_yaml(&yaml).unwrap(), config);
}

#[test]
fn test_load_missing_file() {
    let result = Config::load("/definitely/not/here/shpfiles.yaml");
    let err = result.unwrap_err();
    assert!(matches!(err, ShpFilesError::Config(_)));
    assert!(err.to_string().contains("failed to read config file"));
}

#[test]
#[serial]
fn test_from_env_uses_named_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("shpfiles.yaml");
    std::fs::write(&path, "capture_traces: false\n").unwrap();

    // SAFETY: serialized with other env-touching tests.
    unsafe { std::env::set_var(CONFIG_ENV_VAR, &path) };
    let config = Config::from_env();
    unsafe { std::env::remove_var(CONFIG_ENV_VAR) };

    assert!(!config.unwrap().capture_traces);
}

#[test]
#[serial]
fn test_from_env_defaults_when_unset() {
    // SAFETY: serialized with other env-touching tests.
    unsafe { std::env::remove_var(CONFIG_ENV_VAR) };
    assert_eq!(Config::from_env().unwrap(), Config::default());
}

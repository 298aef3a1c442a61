//! Config loading: defaults, partial TOML, file round-trip, parse errors.

use hsse_core::config::{defaults, HsseConfig};
use hsse_core::errors::ConfigError;

#[test]
fn empty_document_yields_defaults() {
    let config = HsseConfig::from_toml_str("").unwrap();
    assert_eq!(config.offline.namespace, defaults::DEFAULT_QUEUE_NAMESPACE);
    assert_eq!(config.offline.retention_secs, 7 * 24 * 3600);
    assert_eq!(config.offline.form_retention_secs, 24 * 3600);
    assert!(config.offline.auto_sync);
    assert_eq!(config.storage.db_path, defaults::DEFAULT_DB_FILENAME);
    assert!(config.remote.send_idempotency_key);
}

#[test]
fn partial_sections_keep_remaining_defaults() {
    let config = HsseConfig::from_toml_str(
        r#"
        [offline]
        namespace = "incidents"

        [remote]
        base_url = "https://api.example.test/"
        max_retries = 0
        "#,
    )
    .unwrap();

    assert_eq!(config.offline.namespace, "incidents");
    assert_eq!(config.offline.queue_key, defaults::DEFAULT_QUEUE_KEY);
    assert_eq!(config.remote.max_retries, 0);
    assert_eq!(
        config.remote.submit_url(),
        format!("https://api.example.test{}", defaults::DEFAULT_SUBMIT_PATH)
    );
    assert_eq!(config.observability.log_level, "info");
}

#[test]
fn load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hsse.toml");
    std::fs::write(
        &path,
        "[storage]\ndb_path = \"/var/lib/hsse/queue.db\"\n[observability]\njson_logs = true\n",
    )
    .unwrap();

    let config = HsseConfig::load(&path).unwrap();
    assert_eq!(config.storage.db_path, "/var/lib/hsse/queue.db");
    assert!(config.observability.json_logs);
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = HsseConfig::load(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn wrong_type_is_parse_error() {
    let err = HsseConfig::from_toml_str("[offline]\nretention_secs = \"a week\"").unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

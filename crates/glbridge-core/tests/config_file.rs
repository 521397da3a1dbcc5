//! Loading `BridgeConfig` from disk.

use std::io::Write;

use glbridge_core::config::{BridgeConfig, ConfigError, SizeLimits};

#[test]
fn test_load_full_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[window.size_limits]
min_width = 32
max_width = 1024
min_height = 32
max_height = 1024

[handshake]
attempt_timeout_ms = 20
max_attempts = 3

[logging]
filter = "warn"

[profiling]
enabled = true
address = "127.0.0.1:9000"
"#
    )
    .unwrap();

    let config = BridgeConfig::load_from_file(file.path()).unwrap();
    assert_eq!(config.window.size_limits, Some(SizeLimits::new(32, 1024, 32, 1024)));
    assert_eq!(config.handshake.attempt_timeout_ms, 20);
    assert_eq!(config.handshake.max_attempts, 3);
    assert_eq!(config.logging.filter.as_deref(), Some("warn"));
    assert!(config.profiling.enabled);
    assert_eq!(config.profiling.address, "127.0.0.1:9000");
}

#[test]
fn test_partial_config_keeps_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[handshake]\nmax_attempts = 7").unwrap();

    let config = BridgeConfig::load_from_file(file.path()).unwrap();
    assert_eq!(config.handshake.max_attempts, 7);
    assert_eq!(config.handshake.attempt_timeout_ms, 100);
    assert!(config.window.size_limits.is_none());
    assert!(!config.profiling.enabled);
}

#[test]
fn test_missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let err = BridgeConfig::load_from_file(&path).unwrap_err();
    match err {
        ConfigError::Io { path: reported, .. } => assert!(reported.ends_with("absent.toml")),
        other => panic!("expected Io error, got {other:?}"),
    }
}

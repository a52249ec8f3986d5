use hazel_profiler::config::{Config, SourceKind};
use hazel_profiler::ConfigError;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::NamedTempFile;

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.sampling.interval_seconds, 1.0);
    assert_eq!(config.sampling.source, SourceKind::Live);
    assert_eq!(config.history.capacity, 100);
    assert_eq!(config.export.path, PathBuf::from("profile.json"));
    assert!(config.validate().is_ok());
}

#[test]
fn test_load_from_toml() {
    let toml_content = r#"
[general]
tick_interval_ms = 50
log_level = "debug"
notify_on_export = false

[sampling]
interval_seconds = 0.5
source = "fixed"
target_pid = 4242

[history]
capacity = 20

[export]
path = "/tmp/trace.json"
"#;
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(toml_content.as_bytes()).unwrap();
    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.sampling.source, SourceKind::Fixed);
    assert_eq!(config.sampling.target_pid, Some(4242));
    assert_eq!(config.sample_interval(), Duration::from_millis(500));
    assert_eq!(config.tick_interval(), Duration::from_millis(50));
    assert_eq!(config.history.capacity, 20);
    assert!(!config.general.notify_on_export);
}

#[test]
fn test_missing_sections_use_defaults() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"[history]\ncapacity = 5\n").unwrap();
    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.history.capacity, 5);
    assert_eq!(config.sampling.interval_seconds, 1.0);
}

#[test]
fn test_rejects_zero_capacity() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"[history]\ncapacity = 0\n").unwrap();
    let err = Config::load(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_rejects_non_positive_interval() {
    let mut config = Config::default();
    config.sampling.interval_seconds = 0.0;
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_save_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");
    let mut config = Config::default();
    config.sampling.target_pid = Some(7);
    config.save(&path).unwrap();
    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.sampling.target_pid, Some(7));
    assert_eq!(loaded.export.path, config.export.path);
}

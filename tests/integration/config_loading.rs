use cloudshelf::config::{ConfigLoader, StorageBackend};
use cloudshelf::error::ApiError;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, body: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, body).unwrap();
    path
}

#[test]
fn missing_global_file_yields_defaults() {
    let temp = TempDir::new().unwrap();
    let config =
        ConfigLoader::load_with_global(Some(temp.path().join("absent.toml").as_path()), None).unwrap();
    assert_eq!(config.storage.root_prefix, "projects");
    assert_eq!(config.storage.backend, StorageBackend::Local);
    assert!(config.admin.password_hash.is_none());
}

#[test]
fn explicit_file_overrides_global() {
    let temp = TempDir::new().unwrap();
    let global = write(
        &temp,
        "global.toml",
        r#"
[storage]
root_prefix = "shelf"

[cache]
ttl_ms = 5000

[admin]
password_hash = "letmein"
"#,
    );
    let explicit = write(
        &temp,
        "explicit.toml",
        r#"
[storage]
backend = "memory"
root_prefix = "work"

[[auth.accounts]]
email = "ana@example.com"
password = "pw"
"#,
    );

    let config = ConfigLoader::load_with_global(Some(global.as_path()), Some(explicit.as_path())).unwrap();
    assert_eq!(config.storage.root_prefix, "work");
    assert_eq!(config.storage.backend, StorageBackend::Memory);
    assert_eq!(config.cache.ttl_ms, 5000);
    assert_eq!(config.admin.password_hash.as_deref(), Some("letmein"));
    assert_eq!(config.auth.accounts.len(), 1);
    assert_eq!(config.auth.accounts[0].email, "ana@example.com");
}

#[test]
fn missing_explicit_file_is_an_error() {
    let temp = TempDir::new().unwrap();
    let result = ConfigLoader::load_with_global(None, Some(temp.path().join("nope.toml").as_path()));
    assert!(matches!(result, Err(ApiError::ConfigError(_))));
}

#[test]
fn loaded_values_are_validated() {
    let temp = TempDir::new().unwrap();
    let explicit = write(&temp, "bad.toml", "[cache]\nttl_ms = 0\n");
    assert!(matches!(
        ConfigLoader::load_with_global(None, Some(explicit.as_path())),
        Err(ApiError::ConfigError(_))
    ));
}

#[test]
fn logging_section_is_read() {
    let temp = TempDir::new().unwrap();
    let explicit = write(
        &temp,
        "logging.toml",
        "[logging]\nlevel = \"debug\"\noutput = \"stderr\"\n",
    );
    let config = ConfigLoader::load_with_global(None, Some(explicit.as_path())).unwrap();
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.output, "stderr");
    assert_eq!(config.logging.format, "text");
}

//! Unit tests for configuration and graceful degradation
//!
//! Tests that touch MEMORIES_ROOT_FOLDER or MEMORIES_CONFIG are marked
//! #[serial] so they never run in parallel with each other.

use memories_common::config::{
    CompiledDefaults, LoggingConfig, RootFolderInitializer, RootFolderResolver, TomlConfig,
    CONFIG_FILE_ENV, ROOT_FOLDER_ENV,
};
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_compiled_defaults_for_current_platform() {
    let defaults = CompiledDefaults::for_current_platform();

    assert!(!defaults.root_folder.as_os_str().is_empty());
    assert!(defaults.root_folder.to_string_lossy().contains("memories"));
    assert_eq!(defaults.log_level, "info");
    assert_eq!(defaults.max_upload_bytes, 50 * 1024 * 1024);
    assert!(defaults.cache_capacity >= 1);
}

#[test]
#[serial]
fn test_resolver_with_no_overrides_uses_default() {
    env::remove_var(ROOT_FOLDER_ENV);

    let root_folder = RootFolderResolver::new().resolve();
    assert_eq!(root_folder, CompiledDefaults::for_current_platform().root_folder);
}

#[test]
#[serial]
fn test_resolver_priority_order() {
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/memories-from-toml")),
        ..TomlConfig::default()
    };

    env::remove_var(ROOT_FOLDER_ENV);
    let resolver = RootFolderResolver::new().with_config(&config);
    assert_eq!(resolver.resolve(), PathBuf::from("/tmp/memories-from-toml"));

    env::set_var(ROOT_FOLDER_ENV, "/tmp/memories-from-env");
    assert_eq!(resolver.resolve(), PathBuf::from("/tmp/memories-from-env"));

    let resolver = resolver.with_cli_arg(Some(PathBuf::from("/tmp/memories-from-cli")));
    assert_eq!(resolver.resolve(), PathBuf::from("/tmp/memories-from-cli"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_empty_env_var_is_ignored() {
    env::set_var(ROOT_FOLDER_ENV, "");
    let root_folder = RootFolderResolver::new().resolve();
    assert_eq!(root_folder, CompiledDefaults::for_current_platform().root_folder);
    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
fn test_toml_config_parses_all_keys() {
    let config = TomlConfig::parse(
        r#"
        root_folder = "/srv/memories"
        access_code = "sunflower"
        bind_address = "0.0.0.0"
        port = 8080
        max_upload_bytes = 1048576
        cache_capacity = 2

        [logging]
        level = "debug"
        file = "/var/log/memories.log"
        "#,
    )
    .unwrap();

    assert_eq!(config.root_folder, Some(PathBuf::from("/srv/memories")));
    assert_eq!(config.access_code.as_deref(), Some("sunflower"));
    assert_eq!(config.bind_address.as_deref(), Some("0.0.0.0"));
    assert_eq!(config.port, Some(8080));
    assert_eq!(config.max_upload_bytes, Some(1_048_576));
    assert_eq!(config.cache_capacity, Some(2));
    assert_eq!(
        config.logging,
        LoggingConfig {
            level: Some("debug".to_string()),
            file: Some(PathBuf::from("/var/log/memories.log")),
        }
    );
}

#[test]
fn test_toml_config_empty_file_is_default() {
    assert_eq!(TomlConfig::parse("").unwrap(), TomlConfig::default());
}

#[test]
fn test_toml_config_rejects_wrong_types() {
    assert!(TomlConfig::parse("port = \"not a port\"").is_err());
}

#[test]
#[serial]
fn test_load_or_default_reads_env_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "port = 6001\n").unwrap();

    env::set_var(CONFIG_FILE_ENV, &path);
    let config = TomlConfig::load_or_default();
    env::remove_var(CONFIG_FILE_ENV);

    assert_eq!(config.port, Some(6001));
}

#[test]
#[serial]
fn test_load_or_default_survives_broken_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "port = [unclosed").unwrap();

    env::set_var(CONFIG_FILE_ENV, &path);
    let config = TomlConfig::load_or_default();
    env::remove_var(CONFIG_FILE_ENV);

    assert_eq!(config, TomlConfig::default());
}

#[test]
#[serial]
fn test_load_or_default_survives_missing_file() {
    env::set_var(CONFIG_FILE_ENV, "/nonexistent/memories/config.toml");
    let config = TomlConfig::load_or_default();
    env::remove_var(CONFIG_FILE_ENV);

    assert_eq!(config, TomlConfig::default());
}

#[test]
fn test_initializer_creates_layout() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("nested").join("root");
    let initializer = RootFolderInitializer::new(root.clone());

    initializer.ensure_directories().unwrap();
    assert!(root.join("uploads").is_dir());
    assert!(root.join("uploads").join("media").is_dir());

    // Idempotent
    initializer.ensure_directories().unwrap();
    assert_eq!(initializer.media_dir(), root.join("uploads").join("media"));
}

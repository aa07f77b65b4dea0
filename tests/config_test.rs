//! Tests for config loading

use docharvest::config::Config;
use serial_test::serial;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[test]
#[serial]
fn test_bundled_config_parses() {
    let config = Config::from_file(Path::new("config.toml")).expect("config.toml should parse");

    assert!(config.validate().is_ok());
    assert_eq!(config.host().unwrap(), "docs.yjs.dev");
    assert_eq!(config.seed_urls().unwrap().len(), 7);
    assert_eq!(config.output.dir, PathBuf::from("docs/yjs"));
}

#[test]
fn test_from_file_overrides_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("docharvest.toml");
    fs::write(
        &path,
        r#"
        [crawler]
        base_url = "https://docs.example.dev/"
        seed_paths = ["/guide"]
        delay_ms = 0

        [converter]
        code_language = "rust"
        "#,
    )
    .unwrap();

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.crawler.delay_ms, 0);
    assert_eq!(config.crawler.max_pages, 50);
    assert_eq!(config.converter.code_language, "rust");
    assert_eq!(
        config.seed_urls().unwrap(),
        vec!["https://docs.example.dev/guide".to_string()]
    );
}

#[test]
fn test_missing_file_is_error() {
    let temp_dir = TempDir::new().unwrap();
    let err = Config::from_file(&temp_dir.path().join("absent.toml")).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to read config file"));
}

#[test]
fn test_malformed_file_is_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bad.toml");
    fs::write(&path, "[crawler\nmax_pages = ").unwrap();

    let err = Config::from_file(&path).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to parse TOML"));
}

#[test]
fn test_wrong_type_is_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("typed.toml");
    fs::write(&path, "[crawler]\nmax_pages = \"many\"\n").unwrap();

    assert!(Config::from_file(&path).is_err());
}

#[test]
#[serial]
fn test_env_overrides_file_values() {
    std::env::set_var("DOCHARVEST_MAX_PAGES", "7");
    std::env::set_var("DOCHARVEST_OUTPUT_DIR", "env/out");
    std::env::set_var("DOCHARVEST_DELAY_MS", "not-a-number");

    let mut config = Config::from_file(Path::new("config.toml")).unwrap();
    config.apply_env();

    std::env::remove_var("DOCHARVEST_MAX_PAGES");
    std::env::remove_var("DOCHARVEST_OUTPUT_DIR");
    std::env::remove_var("DOCHARVEST_DELAY_MS");

    assert_eq!(config.crawler.max_pages, 7);
    assert_eq!(config.output.dir, PathBuf::from("env/out"));
    // unparseable values are ignored
    assert_eq!(config.crawler.delay_ms, 1000);
}

#[test]
#[serial]
fn test_from_env_starts_from_defaults() {
    std::env::set_var("DOCHARVEST_BASE_URL", "https://docs.example.dev/");
    let config = Config::from_env().unwrap();
    std::env::remove_var("DOCHARVEST_BASE_URL");

    assert_eq!(config.host().unwrap(), "docs.example.dev");
    assert_eq!(config.crawler.max_pages, 50);
}

//! Common test utilities

#![allow(dead_code)]

use rcall::config::{parse_document, resolve_config, validate_config, Config, Properties};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a temporary directory with a Taskfile
pub fn create_test_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("Taskfile");
    fs::write(&config_path, content).unwrap();
    (temp_dir, config_path)
}

/// Create a test Taskfile with an empty subdirectory next to it
pub fn create_test_config_in_subdir(content: &str) -> (TempDir, PathBuf, PathBuf) {
    let (temp_dir, config_path) = create_test_config(content);
    let sub_dir = temp_dir.path().join("subdir");
    fs::create_dir(&sub_dir).unwrap();
    (temp_dir, config_path, sub_dir)
}

/// Parse, resolve and validate Taskfile source
pub fn load(source: &str, overrides: &[(&str, &str)]) -> Config {
    let document = parse_document(source).unwrap();
    let overrides: Properties = overrides
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let config = resolve_config(&document, overrides).config;
    validate_config(&config).unwrap();
    config
}

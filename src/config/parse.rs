//! Taskfile discovery and loading

use crate::config::document::{parse_document, Document};
use crate::error::{ConfigError, ConfigResult, RcallError};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default Taskfile names to search for
const CONFIG_FILE_NAMES: &[&str] = &["Taskfile"];

/// Find the Taskfile by searching current and parent directories
pub fn find_config_file() -> ConfigResult<PathBuf> {
    let cwd = env::current_dir().map_err(|e| ConfigError::Read {
        path: PathBuf::from("."),
        error: e.to_string(),
    })?;
    find_config_file_from(cwd)
}

/// Find the Taskfile starting from a specific directory
pub fn find_config_file_from(start_dir: PathBuf) -> ConfigResult<PathBuf> {
    let mut current_dir = start_dir;
    let mut searched_paths = Vec::new();

    loop {
        for file_name in CONFIG_FILE_NAMES {
            let config_path = current_dir.join(file_name);
            searched_paths.push(config_path.display().to_string());

            if config_path.is_file() {
                return Ok(config_path);
            }
        }

        match current_dir.parent() {
            Some(parent) => current_dir = parent.to_path_buf(),
            None => return Err(ConfigError::NotFound(searched_paths.join(", "))),
        }
    }
}

/// Read and parse a Taskfile
pub fn parse_config_file(path: &Path) -> Result<Document, RcallError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;

    Ok(parse_document(&contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const TASKFILE: &str = "[test]\ncmd = echo test\n";

    #[test]
    fn test_find_config_in_current_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("Taskfile");
        fs::write(&config_path, TASKFILE).unwrap();

        let found = find_config_file_from(temp_dir.path().to_path_buf()).unwrap();
        assert_eq!(found, config_path);
    }

    #[test]
    fn test_find_config_in_parent_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("Taskfile");
        let sub_dir = temp_dir.path().join("subdir");

        fs::create_dir(&sub_dir).unwrap();
        fs::write(&config_path, TASKFILE).unwrap();

        let found = find_config_file_from(sub_dir).unwrap();
        assert_eq!(found, config_path);
    }

    #[test]
    fn test_config_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let result = find_config_file_from(temp_dir.path().to_path_buf());
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_parse_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("Taskfile");
        fs::write(&config_path, TASKFILE).unwrap();

        let document = parse_config_file(&config_path).unwrap();
        assert!(document.sections.contains_key("test"));
    }

    #[test]
    fn test_parse_config_file_missing() {
        let temp_dir = TempDir::new().unwrap();
        let result = parse_config_file(&temp_dir.path().join("Taskfile"));
        assert!(matches!(
            result,
            Err(RcallError::Config(ConfigError::Read { .. }))
        ));
    }

    #[test]
    fn test_parse_config_file_syntax_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("Taskfile");
        fs::write(&config_path, "[broken\n").unwrap();

        let result = parse_config_file(&config_path);
        assert!(matches!(result, Err(RcallError::Syntax(_))));
    }
}

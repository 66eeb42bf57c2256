//! Build file parsing and discovery

use crate::config::types::{Config, RuleConfig};
use crate::error::{BuildError, ConfigError, ConfigResult};
use directories::ProjectDirs;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Build file names to search for
const CONFIG_FILE_NAMES: &[&str] = &["build.yml", "build.yaml"];

/// File holding user-wide override rules, inside the platform config dir
const USER_OVERRIDES_FILE: &str = "overrides.yml";

/// Find the build file by searching current and parent directories
pub fn find_config_file() -> ConfigResult<PathBuf> {
    find_config_file_from(env::current_dir().map_err(|e| {
        ConfigError::Invalid(format!("Failed to get current directory: {}", e))
    })?)
}

/// Find the build file starting from a specific directory
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

/// Parse a build file from a path
pub fn parse_config_file(path: &Path) -> Result<Config, BuildError> {
    let contents = fs::read_to_string(path)
        .map_err(|e| ConfigError::Invalid(format!("Failed to read {}: {}", path.display(), e)))?;

    parse_config(&contents)
}

/// Parse a build file from a string
pub fn parse_config(yaml: &str) -> Result<Config, BuildError> {
    let config: Config = serde_yaml::from_str(yaml)?;
    Ok(config)
}

/// Parse the build file with automatic discovery
pub fn parse_config_auto() -> Result<(Config, PathBuf), BuildError> {
    let config_path = find_config_file()?;
    let config = parse_config_file(&config_path)?;
    Ok((config, config_path))
}

/// Read `KEY=value` pairs from an env file
pub fn load_env_file(path: &Path) -> ConfigResult<HashMap<String, String>> {
    let env_error = |error: String| ConfigError::EnvFile {
        path: path.to_path_buf(),
        error,
    };

    dotenvy::from_path_iter(path)
        .map_err(|e| env_error(e.to_string()))?
        .map(|item| item.map_err(|e| env_error(e.to_string())))
        .collect()
}

/// Location of the user-wide overrides file, if the platform has a config dir
pub fn user_overrides_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "buildgraph").map(|dirs| dirs.config_dir().join(USER_OVERRIDES_FILE))
}

/// Load user-wide override rules
///
/// A missing file yields no rules.
pub fn load_user_overrides() -> Result<Vec<RuleConfig>, BuildError> {
    match user_overrides_path() {
        Some(path) if path.is_file() => load_overrides_file(&path),
        _ => Ok(Vec::new()),
    }
}

/// Load a YAML list of override rules
pub fn load_overrides_file(path: &Path) -> Result<Vec<RuleConfig>, BuildError> {
    let contents = fs::read_to_string(path)?;
    let rules: Option<Vec<RuleConfig>> = serde_yaml::from_str(&contents)?;
    Ok(rules.unwrap_or_default())
}

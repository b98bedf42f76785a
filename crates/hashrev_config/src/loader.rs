//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::ProjectConfig;
use std::path::Path;

/// Name of the configuration file looked up in a source directory.
pub const CONFIG_FILE: &str = "hashrev.toml";

/// Loads `<dir>/hashrev.toml`, falling back to defaults when it is absent.
pub fn load_config(dir: &Path) -> Result<ProjectConfig, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
    if !config_path.is_file() {
        return Ok(ProjectConfig::default());
    }
    load_config_file(&config_path)
}

/// Loads and validates an explicitly named configuration file.
pub fn load_config_file(path: &Path) -> Result<ProjectConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `hashrev.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that configuration values are consistent.
fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    let path = config.manifest.path.trim();
    if path.is_empty() {
        return Err(ConfigError::ValidationError(
            "manifest.path must not be empty".to_string(),
        ));
    }
    if Path::new(path).is_absolute() {
        return Err(ConfigError::ValidationError(format!(
            "manifest.path must be relative to the output directory, got '{path}'"
        )));
    }
    Ok(())
}

//! Configuration file loading and validation.

use crate::env::apply_env;
use crate::error::ConfigError;
use crate::types::FerruleConfig;
use std::path::Path;

/// Name of the configuration file looked up in the project directory.
pub const CONFIG_FILE_NAME: &str = "ferrule.toml";

/// Loads the configuration for a project directory.
///
/// Reads `<project_dir>/ferrule.toml` if it exists, falls back to defaults
/// otherwise, then applies `FERRULE_*` environment overrides.
pub fn load_config(project_dir: &Path) -> Result<FerruleConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE_NAME);
    let config = if config_path.is_file() {
        let content = std::fs::read_to_string(&config_path)?;
        load_config_from_str(&content)?
    } else {
        log::debug!("no {} found, using defaults", config_path.display());
        FerruleConfig::default()
    };
    let config = apply_env(config);
    validate_config(&config)?;
    Ok(config)
}

/// Parses and validates a `ferrule.toml` configuration from a string.
///
/// No environment overrides are applied.
pub fn load_config_from_str(content: &str) -> Result<FerruleConfig, ConfigError> {
    let config: FerruleConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that required settings are present and consistent.
fn validate_config(config: &FerruleConfig) -> Result<(), ConfigError> {
    if config.extmodule_root.as_os_str().is_empty() {
        return Err(ConfigError::MissingField("extmodule_root".to_string()));
    }
    if config.python.trim().is_empty() {
        return Err(ConfigError::MissingField("python".to_string()));
    }
    if config.compiler.trim().is_empty() {
        return Err(ConfigError::MissingField("compiler".to_string()));
    }
    if !config.ext_suffix.starts_with('.') {
        return Err(ConfigError::ValidationError(format!(
            "ext_suffix '{}' must start with '.'",
            config.ext_suffix
        )));
    }
    Ok(())
}

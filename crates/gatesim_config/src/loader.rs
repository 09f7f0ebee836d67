//! Configuration file loading and validation.

use std::path::Path;

use tracing::debug;

use crate::error::ConfigError;
use crate::types::GatesimConfig;

/// File name looked up in a directory.
pub const CONFIG_FILE_NAME: &str = "gatesim.toml";

/// Loads and validates `gatesim.toml` from a directory.
pub fn load_config(dir: &Path) -> Result<GatesimConfig, ConfigError> {
    load_config_from_path(&dir.join(CONFIG_FILE_NAME))
}

/// Loads and validates a configuration file at an explicit path.
pub fn load_config_from_path(path: &Path) -> Result<GatesimConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "loading configuration");
    load_config_from_str(&content)
}

/// Loads `gatesim.toml` from a directory, or returns the defaults if the
/// directory has none.
pub fn load_config_or_default(dir: &Path) -> Result<GatesimConfig, ConfigError> {
    let path = dir.join(CONFIG_FILE_NAME);
    if path.is_file() {
        load_config_from_path(&path)
    } else {
        Ok(GatesimConfig::default())
    }
}

/// Parses and validates a configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<GatesimConfig, ConfigError> {
    let config: GatesimConfig = toml::from_str(content)?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that budget and output values are usable.
fn validate_config(config: &GatesimConfig) -> Result<(), ConfigError> {
    if config.simulation.max_events_per_step == Some(0) {
        return Err(ConfigError::Invalid(
            "simulation.max_events_per_step must be at least 1".to_string(),
        ));
    }
    if config.simulation.max_events == Some(0) {
        return Err(ConfigError::Invalid(
            "simulation.max_events must be at least 1".to_string(),
        ));
    }
    let ext = &config.output.extension;
    if ext.is_empty() {
        return Err(ConfigError::Invalid(
            "output.extension must not be empty".to_string(),
        ));
    }
    if ext.starts_with('.') || ext.contains(['/', '\\']) {
        return Err(ConfigError::Invalid(format!(
            "output.extension '{ext}' must be a bare extension such as \"sim\""
        )));
    }
    Ok(())
}

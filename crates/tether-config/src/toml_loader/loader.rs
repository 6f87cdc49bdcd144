//! Core TOML config loading: read from path or platform default.

use std::path::Path;

use tether_common::ConfigError;
use tracing::{info, warn};

use crate::schema::TetherConfig;
use crate::validation;

use super::paths::{create_default_config, default_config_path};

/// Load config from a specific TOML file path.
///
/// Deserializes the file using serde defaults for any missing fields.
/// After loading, the config is validated; if validation fails, a warning
/// is logged and the default config is returned.
pub fn load_from_path(path: &Path) -> Result<TetherConfig, ConfigError> {
    let config = read_config(path)?;

    if let Err(e) = validation::validate(&config) {
        warn!("config validation warning: {e}");
        warn!("falling back to default config");
        return Ok(TetherConfig::default());
    }

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Like [`load_from_path`], but a config that fails validation is an error
/// instead of a silent fallback.
pub fn load_strict(path: &Path) -> Result<TetherConfig, ConfigError> {
    let config = read_config(path)?;
    validation::validate(&config)?;
    Ok(config)
}

fn read_config(path: &Path) -> Result<TetherConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError(format!("failed to read {}: {e}", path.display())))?;

    toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))
}

/// Load config from `$TETHER_CONFIG`, or else the platform-specific path.
///
/// On macOS: `~/Library/Application Support/tether/config.toml`
/// On Linux: `~/.config/tether/config.toml`
///
/// If the file does not exist, creates a default config file and returns defaults.
pub fn load_default() -> Result<TetherConfig, ConfigError> {
    let path = default_config_path()?;

    match load_from_path(&path) {
        Ok(config) => Ok(config),
        Err(ConfigError::FileNotFound(_)) => {
            info!("no config found at {}, creating default", path.display());
            create_default_config(&path)?;
            Ok(TetherConfig::default())
        }
        Err(e) => Err(e),
    }
}

//! Tether configuration system.
//!
//! TOML-based configuration for content surfaces: bridge naming, injected
//! scripts, permission policy, optional events and logging. All sections
//! use sensible defaults so partial configs work out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use tether_config::{load_config, config_to_json};
//!
//! let config = load_config().expect("failed to load config");
//! let json = config_to_json(&config);
//! println!("{json}");
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{TetherConfig, CONFIG_SCHEMA_VERSION};
pub use toml_loader::{load_default, load_from_path, load_strict};

use std::path::Path;

use tether_common::ConfigError;

/// Load config from the platform default path, or from `path` when given.
pub fn load_config_from(path: Option<&Path>) -> Result<TetherConfig, ConfigError> {
    match path {
        Some(p) => toml_loader::load_from_path(p),
        None => toml_loader::load_default(),
    }
}

/// Convenience function to load config from the platform default path.
///
/// Creates a commented default file if none exists.
pub fn load_config() -> Result<TetherConfig, ConfigError> {
    load_config_from(None)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &TetherConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_to_json_contains_all_sections() {
        let json = config_to_json(&TetherConfig::default());
        assert!(json.contains("\"bridge\""));
        assert!(json.contains("\"scripts\""));
        assert!(json.contains("\"permissions\""));
        assert!(json.contains("\"events\""));
        assert!(json.contains("\"logging\""));
    }

    #[test]
    fn config_schema_version_is_1() {
        assert_eq!(CONFIG_SCHEMA_VERSION, 1);
    }

    #[test]
    fn load_config_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("surface.toml");
        std::fs::write(&path, "[permissions]\nallows_protected_media = true\n").unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        assert!(config.permissions.allows_protected_media);
    }

    #[test]
    fn default_config_round_trips_through_json() {
        let json = config_to_json(&TetherConfig::default());
        let parsed: TetherConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.bridge.global_name, "TetherBridge");
        assert!(parsed.scripts.javascript_enabled);
    }
}

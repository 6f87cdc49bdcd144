//! Where the tether config lives, and writing the commented template there.

use std::ffi::OsString;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tether_common::ConfigError;
use tracing::{debug, info};

use super::template::default_config_toml;

/// Environment variable naming a config file to use instead of the
/// platform default.
pub const CONFIG_ENV_VAR: &str = "TETHER_CONFIG";

/// The config file `load_default` reads: `$TETHER_CONFIG` when set and
/// non-empty, else `<platform config dir>/tether/config.toml`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    resolve_config_path(std::env::var_os(CONFIG_ENV_VAR), dirs::config_dir())
}

fn resolve_config_path(
    env_override: Option<OsString>,
    config_dir: Option<PathBuf>,
) -> Result<PathBuf, ConfigError> {
    if let Some(path) = env_override.filter(|p| !p.is_empty()) {
        debug!(var = CONFIG_ENV_VAR, "config path taken from environment");
        return Ok(PathBuf::from(path));
    }
    config_dir
        .map(|dir| dir.join("tether").join("config.toml"))
        .ok_or_else(|| ConfigError::ParseError("could not determine config directory".into()))
}

/// Write the commented template to `path`, creating parent directories.
/// An existing file is left untouched.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    let write_error = |e: std::io::Error| {
        ConfigError::ParseError(format!(
            "failed to write default config to {}: {e}",
            path.display()
        ))
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            ConfigError::ParseError(format!(
                "failed to create config directory {}: {e}",
                parent.display()
            ))
        })?;
    }

    let mut file = match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
    {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            debug!("config already present at {}, not overwriting", path.display());
            return Ok(());
        }
        Err(e) => return Err(write_error(e)),
    };
    file.write_all(default_config_toml().as_bytes())
        .map_err(write_error)?;

    info!("created default config at {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_override_wins_over_platform_dir() {
        let path = resolve_config_path(
            Some(OsString::from("/srv/tether/site.toml")),
            Some(PathBuf::from("/home/u/.config")),
        )
        .unwrap();
        assert_eq!(path, PathBuf::from("/srv/tether/site.toml"));
    }

    #[test]
    fn empty_override_falls_back_to_platform_dir() {
        let path =
            resolve_config_path(Some(OsString::new()), Some(PathBuf::from("/home/u/.config")))
                .unwrap();
        assert_eq!(path, PathBuf::from("/home/u/.config/tether/config.toml"));
    }

    #[test]
    fn no_config_dir_is_an_error() {
        let err = resolve_config_path(None, None).unwrap_err();
        assert!(err.to_string().contains("could not determine config directory"));
    }

    #[test]
    fn existing_file_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[bridge]\nmessaging_enabled = true\n").unwrap();

        create_default_config(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "[bridge]\nmessaging_enabled = true\n");
    }
}

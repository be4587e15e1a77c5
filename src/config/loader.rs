//! Configuration file loader.
//!
//! An explicitly requested file must exist; the default location is
//! optional and silently falls back to built-in defaults when absent.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::error::ConfigError;
use crate::config::schema::Config;

/// Returns the default configuration file path:
/// `$XDG_CONFIG_HOME/wireline/config.toml` (or the platform equivalent).
///
/// Returns `None` when no config directory can be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("wireline").join("config.toml"))
}

/// Loads and parses the configuration file at `path`.
///
/// # Errors
///
/// * [`ConfigError::NotFound`] - the file does not exist.
/// * [`ConfigError::ReadError`] - the file exists but could not be read.
/// * [`ConfigError::ParseError`] - the file is not valid TOML for [`Config`].
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    toml::from_str(&content).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Loads configuration from an explicit path or the default location.
///
/// With `Some(path)` the file must exist - a missing explicit file is an
/// error, since the user asked for it. With `None` the default location is
/// tried, and a missing file falls back to [`Config::default`].
pub fn load_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => load(path),
        None => match default_config_path() {
            Some(default_path) if default_path.exists() => {
                tracing::debug!("Loading configuration from {}", default_path.display());
                load(&default_path)
            }
            _ => {
                tracing::debug!("No configuration file found, using defaults");
                Ok(Config::default())
            }
        },
    }
}

//! Config and data path resolution, default file creation.

use nova_common::ConfigError;
use std::path::{Path, PathBuf};
use tracing::info;

use super::template::default_config_toml;

const APP_NAME: &str = "nova";

/// Get the platform-specific default config file path.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::ParseError("could not determine config directory".into()))?;
    Ok(config_dir.join(APP_NAME).join("config.toml"))
}

/// Get the platform-specific default session file path.
///
/// - macOS: `~/Library/Application Support/nova/session.json`
/// - Linux: `$XDG_DATA_HOME/nova/session.json`
pub fn default_session_file() -> Result<PathBuf, ConfigError> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| ConfigError::ParseError("could not determine data directory".into()))?;
    Ok(data_dir.join(APP_NAME).join("session.json"))
}

/// Create a default TOML config file with documentation comments.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ConfigError::ParseError(format!(
                "failed to create config directory {}: {e}",
                parent.display()
            ))
        })?;
    }

    std::fs::write(path, default_config_toml()).map_err(|e| {
        ConfigError::ParseError(format!(
            "failed to write default config to {}: {e}",
            path.display()
        ))
    })?;

    info!("created default config at {}", path.display());
    Ok(())
}

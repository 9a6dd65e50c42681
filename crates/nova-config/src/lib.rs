//! Nova widget configuration.
//!
//! TOML-based configuration for the chat/build client. Every section uses
//! serde defaults so a partial file (or no file at all) works.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use nova_config::{load_config, config_to_json};
//!
//! let config = load_config(None).expect("failed to load config");
//! println!("{}", config_to_json(&config));
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::NovaConfig;
pub use toml_loader::{default_config_path, default_session_file};

use std::path::Path;

use nova_common::ConfigError;

/// Load config from an explicit path, or from the platform default path
/// (creating a commented default file there if none exists).
pub fn load_config(path: Option<&Path>) -> Result<NovaConfig, ConfigError> {
    match path {
        Some(path) => {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.to_path_buf()));
            }
            toml_loader::load_from_path(path)
        }
        None => toml_loader::load_default(),
    }
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &NovaConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}

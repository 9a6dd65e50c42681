//! Session persistence settings.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Overrides the platform data-dir location of the session file.
    pub session_file: Option<PathBuf>,
    /// Key the session id is stored under inside the session file.
    pub session_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            session_file: None,
            session_key: "nova_session".into(),
        }
    }
}

//! Configuration schema types for Nova.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod build;
mod chat;
mod service;
mod storage;
mod system;

pub use build::*;
pub use chat::*;
pub use service::*;
pub use storage::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Root configuration for the Nova widget client.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct NovaConfig {
    pub service: ServiceConfig,
    pub storage: StorageConfig,
    pub chat: ChatConfig,
    pub build: BuildConfig,
    pub logging: LoggingConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_service_endpoints() {
        let config = NovaConfig::default();
        assert_eq!(config.service.base_url, "http://localhost:8001");
        assert_eq!(config.service.chat_path, "/api/chat");
        assert_eq!(config.service.chat_stream_path, "/api/chat-stream");
        assert_eq!(config.service.build_path, "/api/build");
        assert_eq!(config.service.chat_timeout_secs, 60);
        assert_eq!(config.service.build_timeout_secs, 600);
    }

    #[test]
    fn default_storage() {
        let config = NovaConfig::default();
        assert!(config.storage.session_file.is_none());
        assert_eq!(config.storage.session_key, "nova_session");
    }

    #[test]
    fn default_chat_and_build() {
        let config = NovaConfig::default();
        assert!(config.chat.serialize_sends);
        assert!(!config.chat.streaming);
        assert_eq!(config.build.default_prompt, "Build me a site");
    }

    #[test]
    fn default_logging() {
        let config = NovaConfig::default();
        assert_eq!(config.logging.level, LogLevel::Info);
        assert_eq!(config.logging.level.as_directive(), "info");
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let config: NovaConfig = toml::from_str("").unwrap();
        assert_eq!(config.service.base_url, "http://localhost:8001");
        assert_eq!(config.build.default_prompt, "Build me a site");
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config: NovaConfig = toml::from_str(
            r#"
[service]
base_url = "https://nova.example.com"

[chat]
streaming = true
"#,
        )
        .unwrap();
        assert_eq!(config.service.base_url, "https://nova.example.com");
        assert_eq!(config.service.chat_path, "/api/chat");
        assert!(config.chat.streaming);
        assert!(config.chat.serialize_sends);
    }

    #[test]
    fn log_level_parses_lowercase() {
        let config: NovaConfig = toml::from_str("[logging]\nlevel = \"debug\"\n").unwrap();
        assert_eq!(config.logging.level, LogLevel::Debug);
    }
}

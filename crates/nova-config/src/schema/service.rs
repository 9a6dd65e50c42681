//! Remote chat/build service endpoints.

use serde::{Deserialize, Serialize};

/// Where the chat and build endpoints live and how long to wait for them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub base_url: String,
    pub chat_path: String,
    pub chat_stream_path: String,
    pub build_path: String,
    /// Seconds (valid range: 1-600).
    pub chat_timeout_secs: u32,
    /// Seconds (valid range: 1-3600). Site generation is slow.
    pub build_timeout_secs: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8001".into(),
            chat_path: "/api/chat".into(),
            chat_stream_path: "/api/chat-stream".into(),
            build_path: "/api/build".into(),
            chat_timeout_secs: 60,
            build_timeout_secs: 600,
        }
    }
}

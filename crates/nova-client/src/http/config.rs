//! HTTP transport configuration.

use std::time::Duration;

use reqwest::Url;

use crate::TransportError;

#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub base_url: Url,
    pub chat_path: String,
    pub chat_stream_path: String,
    pub build_path: String,
    pub chat_timeout: Duration,
    /// Site generation takes far longer than a chat turn.
    pub build_timeout: Duration,
}

impl HttpConfig {
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| TransportError::Network(format!("invalid base url {base_url:?}: {e}")))?;
        Ok(Self {
            base_url,
            chat_path: "/api/chat".to_string(),
            chat_stream_path: "/api/chat-stream".to_string(),
            build_path: "/api/build".to_string(),
            chat_timeout: Duration::from_secs(60),
            build_timeout: Duration::from_secs(600),
        })
    }

    pub fn with_chat_path(mut self, path: impl Into<String>) -> Self {
        self.chat_path = path.into();
        self
    }

    pub fn with_chat_stream_path(mut self, path: impl Into<String>) -> Self {
        self.chat_stream_path = path.into();
        self
    }

    pub fn with_build_path(mut self, path: impl Into<String>) -> Self {
        self.build_path = path.into();
        self
    }

    pub fn with_chat_timeout(mut self, timeout: Duration) -> Self {
        self.chat_timeout = timeout;
        self
    }

    pub fn with_build_timeout(mut self, timeout: Duration) -> Self {
        self.build_timeout = timeout;
        self
    }

    /// `base_url` + `path`, keeping any path prefix on the base.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Url::parse(&format!("{base}/{path}"))
            .map_err(|e| TransportError::Network(format!("invalid endpoint {path:?}: {e}")))
    }

    /// Resolve a preview link the way a browser on the service origin would:
    /// absolute links pass through, relative ones join the base url.
    pub(crate) fn resolve_preview(&self, preview: &str) -> String {
        match self.base_url.join(preview) {
            Ok(url) => url.to_string(),
            Err(_) => preview.to_string(),
        }
    }
}

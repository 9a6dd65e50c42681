//! HttpTransport struct, request plumbing and response decoding.

use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{BuildResponse, ChatResponse, SessionId, TransportError};

use super::config::HttpConfig;

pub(super) const REQUEST_ID_HEADER: &str = "x-request-id";
const MAX_ERROR_BODY_CHARS: usize = 200;

/// reqwest-backed transport for the Nova chat/build service.
pub struct HttpTransport {
    pub(super) config: HttpConfig,
    pub(super) http: reqwest::Client,
}

#[derive(Deserialize)]
struct ChatWire {
    #[serde(default)]
    reply: Option<String>,
    #[serde(default)]
    session_id: Option<String>,
}

#[derive(Deserialize)]
struct BuildWire {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    preview: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl HttpTransport {
    pub fn new(config: HttpConfig) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("nova-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::Network(format!("failed to build http client: {e}")))?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    /// POST `body` as JSON and return the response once its status is a success.
    pub(super) async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: Url,
        body: &B,
        timeout: Duration,
        request_id: &str,
    ) -> Result<reqwest::Response, TransportError> {
        debug!(%url, request_id, "POST");

        let mut request = self.http.post(url).timeout(timeout).json(body);
        if !request_id.is_empty() {
            request = request.header(REQUEST_ID_HEADER, request_id);
        }
        let response = request.send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: error_body(&text),
            });
        }
        Ok(response)
    }

    pub(super) async fn read_body(response: reqwest::Response) -> Result<String, TransportError> {
        response.text().await.map_err(map_reqwest_error)
    }

    pub(super) fn decode_chat(&self, body: &str) -> Result<ChatResponse, TransportError> {
        let wire: ChatWire = serde_json::from_str(body)
            .map_err(|e| TransportError::MalformedResponse(format!("chat response: {e}")))?;

        let reply = wire
            .reply
            .filter(|r| !r.is_empty())
            .ok_or_else(|| TransportError::MalformedResponse("missing field `reply`".into()))?;
        let session_id = wire
            .session_id
            .and_then(SessionId::parse)
            .ok_or_else(|| {
                TransportError::MalformedResponse("missing field `session_id`".into())
            })?;

        Ok(ChatResponse { reply, session_id })
    }

    pub(super) fn decode_build(&self, body: &str) -> Result<BuildResponse, TransportError> {
        let wire: BuildWire = serde_json::from_str(body)
            .map_err(|e| TransportError::MalformedResponse(format!("build response: {e}")))?;

        let success = wire
            .success
            .ok_or_else(|| TransportError::MalformedResponse("missing field `success`".into()))?;
        let preview = if success {
            wire.preview
                .filter(|p| !p.trim().is_empty())
                .map(|p| self.config.resolve_preview(&p))
        } else {
            None
        };

        Ok(BuildResponse {
            success,
            preview,
            error: wire.error,
        })
    }
}

pub(super) fn map_reqwest_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else if e.is_decode() {
        TransportError::MalformedResponse(e.to_string())
    } else {
        TransportError::Network(e.to_string())
    }
}

/// Prefer the service's `{"error": "..."}` message; otherwise a truncated body.
fn error_body(text: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorWire {
        error: String,
    }

    match serde_json::from_str::<ErrorWire>(text) {
        Ok(wire) => wire.error,
        Err(_) => text.chars().take(MAX_ERROR_BODY_CHARS).collect(),
    }
}

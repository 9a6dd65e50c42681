//! Client core for the Nova chat widget.
//!
//! Holds the state a chat widget needs and drives the two remote calls it
//! makes:
//! - `chat`: one user turn in, one assistant turn out, with server-issued
//!   session ids persisted through a [`SessionStore`]
//! - `build`: a long-running site build tracked as a small state machine
//!
//! Rendering is somebody else's job; it subscribes to [`WidgetEvent`]s or
//! reads the controllers' current values.

pub mod build;
pub mod conversation;
pub mod http;
pub mod session;
pub mod session_store;
pub mod streaming;
pub mod widget;

#[cfg(test)]
pub(crate) mod testing;

use async_trait::async_trait;
use serde::Serialize;

pub use build::{BuildError, BuildJob, BuildOrchestrator, PendingBuild, DEFAULT_BUILD_PROMPT};
pub use conversation::{ConversationController, Message, PendingTurn, SendPolicy};
pub use http::{HttpConfig, HttpTransport};
pub use nova_common::{BuildState, EventBus, Role, SessionId, WidgetEvent};
pub use session::Session;
pub use session_store::{FileSessionStore, MemorySessionStore, SessionStore};
pub use widget::{ChatWidget, WidgetOptions};

/// Receives reply text as it streams in.
pub type ChunkCallback = Box<dyn Fn(String) + Send + Sync>;

/// The two remote calls the widget depends on.
#[async_trait]
pub trait TransportClient: Send + Sync {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, TransportError>;

    async fn build(&self, request: &BuildRequest) -> Result<BuildResponse, TransportError>;

    /// Streaming variant of [`chat`](Self::chat). Transports that cannot
    /// stream deliver the whole reply as a single chunk.
    async fn chat_stream(
        &self,
        request: &ChatRequest,
        on_chunk: ChunkCallback,
    ) -> Result<StreamedReply, TransportError> {
        let response = self.chat(request).await?;
        on_chunk(response.reply.clone());
        Ok(StreamedReply {
            reply: response.reply,
            session_id: Some(response.session_id),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// Absent on the very first turn of a fresh widget.
    pub session_id: Option<SessionId>,
    pub message: String,
    /// Sent as `x-request-id`, not part of the body.
    #[serde(skip)]
    pub request_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatResponse {
    pub reply: String,
    pub session_id: SessionId,
}

/// Result of a streamed chat turn. The stream protocol does not always
/// report which session it used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamedReply {
    pub reply: String,
    pub session_id: Option<SessionId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildRequest {
    pub prompt: String,
    #[serde(skip)]
    pub request_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildResponse {
    pub success: bool,
    pub preview: Option<String>,
    /// Server-provided reason when `success` is false.
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out")]
    Timeout,
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl TransportError {
    /// Network failure, timeout, or non-success status.
    pub fn is_transport_failure(&self) -> bool {
        !self.is_malformed()
    }

    /// The call succeeded but the payload was missing required fields.
    pub fn is_malformed(&self) -> bool {
        matches!(self, TransportError::MalformedResponse(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_request_serializes_null_session_on_first_turn() {
        let request = ChatRequest {
            session_id: None,
            message: "hi".into(),
            request_id: "abcd1234".into(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({"session_id": null, "message": "hi"}));
    }

    #[test]
    fn chat_request_carries_session_id_as_string() {
        let request = ChatRequest {
            session_id: SessionId::parse("s1"),
            message: "again".into(),
            request_id: String::new(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["session_id"], "s1");
    }

    #[test]
    fn build_request_body_is_prompt_only() {
        let request = BuildRequest {
            prompt: "Build me a blog".into(),
            request_id: "ffff0000".into(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({"prompt": "Build me a blog"}));
    }

    #[test]
    fn error_classification() {
        assert!(TransportError::Timeout.is_transport_failure());
        assert!(TransportError::Network("reset".into()).is_transport_failure());
        assert!(TransportError::Status {
            status: 500,
            body: "boom".into()
        }
        .is_transport_failure());

        let malformed = TransportError::MalformedResponse("missing field `reply`".into());
        assert!(malformed.is_malformed());
        assert!(!malformed.is_transport_failure());
    }

    #[test]
    fn error_display() {
        let err = TransportError::Status {
            status: 502,
            body: "bad gateway".into(),
        };
        assert_eq!(err.to_string(), "HTTP 502: bad gateway");
        assert_eq!(TransportError::Timeout.to_string(), "request timed out");
    }

    #[tokio::test]
    async fn default_chat_stream_emits_whole_reply_once() {
        let transport = testing::ScriptedTransport::new();
        transport.reply_to("hi", "hello", "s1");

        let chunks = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = chunks.clone();
        let request = ChatRequest {
            session_id: None,
            message: "hi".into(),
            request_id: String::new(),
        };
        let streamed = transport
            .chat_stream(&request, Box::new(move |c: String| sink.lock().unwrap().push(c)))
            .await
            .unwrap();

        assert_eq!(streamed.reply, "hello");
        assert_eq!(streamed.session_id, SessionId::parse("s1"));
        assert_eq!(*chunks.lock().unwrap(), vec!["hello".to_string()]);
    }
}

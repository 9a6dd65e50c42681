//! Server-Sent Events (SSE) parsing for the streaming chat endpoint.
//!
//! The chat service frames each event as a `data:` line holding a JSON
//! object tagged by `type`: `start`, `delta`, `end` or `error`.

use futures_util::StreamExt;
use serde::Deserialize;
use tokio::io::AsyncBufReadExt;
use tokio_util::io::StreamReader;

use crate::TransportError;

/// A single SSE event parsed from the stream. The chat service tags events
/// inside the JSON payload, so only `data:` is kept.
#[derive(Debug, Clone)]
pub struct SseEvent {
    /// The event data (JSON string).
    pub data: String,
}

/// Payload of one chat-stream event.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChatStreamEvent {
    Start {
        #[serde(default)]
        session_id: Option<String>,
    },
    Delta {
        #[serde(default)]
        content: String,
    },
    End,
    Error {
        #[serde(default)]
        message: String,
    },
    #[serde(other)]
    Unknown,
}

impl ChatStreamEvent {
    pub fn parse(data: &str) -> Result<Self, TransportError> {
        serde_json::from_str(data)
            .map_err(|e| TransportError::MalformedResponse(format!("bad stream event: {e}")))
    }
}

/// Parse an SSE stream from a reqwest response, calling `on_event` for each
/// event. An `Err` from `on_event` stops the stream and is returned.
pub async fn parse_sse_stream(
    response: reqwest::Response,
    mut on_event: impl FnMut(SseEvent) -> Result<(), TransportError>,
) -> Result<(), TransportError> {
    let byte_stream = response
        .bytes_stream()
        .map(|result| result.map_err(std::io::Error::other));
    let reader = tokio::io::BufReader::new(StreamReader::new(byte_stream));
    let mut lines = reader.lines();

    let mut current_data = String::new();

    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| TransportError::Network(e.to_string()))?
    {
        if line.is_empty() {
            // Empty line = end of event
            if !current_data.is_empty() {
                on_event(SseEvent {
                    data: std::mem::take(&mut current_data),
                })?;
            }
            continue;
        }

        if let Some(data) = line.strip_prefix("data:") {
            if !current_data.is_empty() {
                current_data.push('\n');
            }
            current_data.push_str(data.strip_prefix(' ').unwrap_or(data));
        }
        // Ignore other fields (event:, id:, retry:, comments)
    }

    // Flush any remaining event
    if !current_data.is_empty() {
        on_event(SseEvent { data: current_data })?;
    }

    Ok(())
}

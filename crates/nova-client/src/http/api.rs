//! TransportClient implementation for HttpTransport (chat, build, chat stream).

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::streaming::{parse_sse_stream, ChatStreamEvent, SseEvent};
use crate::{
    BuildRequest, BuildResponse, ChatRequest, ChatResponse, ChunkCallback, SessionId,
    StreamedReply, TransportClient, TransportError,
};

use super::client::HttpTransport;

#[async_trait]
impl TransportClient for HttpTransport {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, TransportError> {
        let url = self.config.endpoint(&self.config.chat_path)?;
        let response = self
            .post_json(url, request, self.config.chat_timeout, &request.request_id)
            .await?;
        let body = Self::read_body(response).await?;
        self.decode_chat(&body)
    }

    async fn build(&self, request: &BuildRequest) -> Result<BuildResponse, TransportError> {
        let url = self.config.endpoint(&self.config.build_path)?;
        let response = self
            .post_json(url, request, self.config.build_timeout, &request.request_id)
            .await?;
        let body = Self::read_body(response).await?;
        self.decode_build(&body)
    }

    async fn chat_stream(
        &self,
        request: &ChatRequest,
        on_chunk: ChunkCallback,
    ) -> Result<StreamedReply, TransportError> {
        let url = self.config.endpoint(&self.config.chat_stream_path)?;
        let response = self
            .post_json(url, request, self.config.chat_timeout, &request.request_id)
            .await?;

        let mut reply = String::new();
        let mut session_id: Option<SessionId> = None;
        let mut ended = false;

        parse_sse_stream(response, |event: SseEvent| {
            match ChatStreamEvent::parse(&event.data)? {
                ChatStreamEvent::Start { session_id: sid } => {
                    session_id = sid.and_then(SessionId::parse);
                }
                ChatStreamEvent::Delta { content } => {
                    if !content.is_empty() {
                        reply.push_str(&content);
                        on_chunk(content);
                    }
                }
                ChatStreamEvent::End => ended = true,
                ChatStreamEvent::Error { message } => {
                    return Err(TransportError::Network(message));
                }
                ChatStreamEvent::Unknown => {
                    debug!(data = %event.data, "ignoring unknown stream event");
                }
            }
            Ok(())
        })
        .await?;

        if !ended {
            warn!(request_id = %request.request_id, "chat stream closed without an end event");
        }

        Ok(StreamedReply { reply, session_id })
    }
}

//! ConversationController: history ownership and the send protocol.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use nova_common::{EventBus, WidgetEvent};
use tracing::{debug, info, warn};

use crate::session::Session;
use crate::{ChatRequest, ChunkCallback, TransportClient, TransportError};

use super::pending::PendingTurn;
use super::types::{Message, SendPolicy};

pub struct ConversationController {
    transport: Arc<dyn TransportClient>,
    session: Arc<Session>,
    /// Never held across an await.
    history: Mutex<Vec<Message>>,
    /// Taken for the whole network exchange under `SendPolicy::Serialized`.
    /// tokio's mutex is fair, so waiters dispatch in arrival order.
    send_lane: tokio::sync::Mutex<()>,
    policy: SendPolicy,
    next_seq: AtomicU64,
    events: Option<Arc<EventBus>>,
}

impl ConversationController {
    pub fn new(transport: Arc<dyn TransportClient>, session: Arc<Session>) -> Self {
        Self {
            transport,
            session,
            history: Mutex::new(Vec::new()),
            send_lane: tokio::sync::Mutex::new(()),
            policy: SendPolicy::default(),
            next_seq: AtomicU64::new(0),
            events: None,
        }
    }

    pub fn with_policy(mut self, policy: SendPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_events(mut self, events: Arc<EventBus>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn policy(&self) -> SendPolicy {
        self.policy
    }

    /// Send one user turn and wait for the assistant's reply.
    ///
    /// Blank input is ignored: `Ok(None)`, nothing appended, no request.
    /// On failure the user turn stays in history and the error is returned
    /// so the caller can offer a retry.
    pub async fn send_message(&self, text: &str) -> Result<Option<Message>, TransportError> {
        match self.submit(text) {
            Some(pending) => self.resolve(pending).await.map(Some),
            None => Ok(None),
        }
    }

    /// Streaming variant of [`send_message`](Self::send_message).
    pub async fn send_message_streaming(
        &self,
        text: &str,
        on_chunk: ChunkCallback,
    ) -> Result<Option<Message>, TransportError> {
        match self.submit(text) {
            Some(pending) => self.resolve_streaming(pending, on_chunk).await.map(Some),
            None => Ok(None),
        }
    }

    /// Synchronous half of a send: validate and append the user turn.
    ///
    /// The turn is visible in [`history`](Self::history) as soon as this
    /// returns. Returns `None` for blank input.
    pub fn submit(&self, text: &str) -> Option<PendingTurn> {
        if text.trim().is_empty() {
            debug!("ignoring blank message");
            return None;
        }
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        self.append(Message::user(text));
        Some(PendingTurn::new(seq, text))
    }

    /// Network half of a send: dispatch, reconcile the session, append the reply.
    ///
    /// Under `SendPolicy::Serialized` turns queue in the order `resolve` is
    /// first polled, not in [`PendingTurn::seq`] order. `send_message` does
    /// both halves in one call and so keeps submit order; callers driving
    /// `submit`/`resolve` separately must resolve in seq order to get it.
    pub async fn resolve(&self, pending: PendingTurn) -> Result<Message, TransportError> {
        let _lane = self.acquire_lane().await;
        let request = self.request_for(&pending);

        match self.transport.chat(&request).await {
            Ok(response) => {
                self.session.reconcile(&response.session_id);
                Ok(self.complete(&pending, response.reply))
            }
            Err(e) => Err(self.fail(&pending, e)),
        }
    }

    /// Streaming network half. The session is reconciled only when the
    /// stream reports which session it used.
    pub async fn resolve_streaming(
        &self,
        pending: PendingTurn,
        on_chunk: ChunkCallback,
    ) -> Result<Message, TransportError> {
        let _lane = self.acquire_lane().await;
        let request = self.request_for(&pending);

        match self.transport.chat_stream(&request, on_chunk).await {
            Ok(streamed) => {
                if let Some(session_id) = &streamed.session_id {
                    self.session.reconcile(session_id);
                }
                Ok(self.complete(&pending, streamed.reply))
            }
            Err(e) => Err(self.fail(&pending, e)),
        }
    }

    /// Snapshot of the conversation, oldest first.
    pub fn history(&self) -> Vec<Message> {
        self.lock_history().clone()
    }

    pub fn last(&self) -> Option<Message> {
        self.lock_history().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.lock_history().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_history().is_empty()
    }

    async fn acquire_lane(&self) -> Option<tokio::sync::MutexGuard<'_, ()>> {
        match self.policy {
            SendPolicy::Serialized => Some(self.send_lane.lock().await),
            SendPolicy::Concurrent => None,
        }
    }

    /// Reads the session id at dispatch time, so a queued send picks up an
    /// id issued while it was waiting.
    fn request_for(&self, pending: &PendingTurn) -> ChatRequest {
        let session_id = self.session.current();
        debug!(
            seq = pending.seq(),
            request_id = pending.request_id(),
            has_session = session_id.is_some(),
            "dispatching chat turn"
        );
        ChatRequest {
            session_id,
            message: pending.text().to_string(),
            request_id: pending.request_id().to_string(),
        }
    }

    fn complete(&self, pending: &PendingTurn, reply: String) -> Message {
        let message = Message::assistant(reply);
        self.append(message.clone());
        info!(
            seq = pending.seq(),
            request_id = pending.request_id(),
            "assistant turn received"
        );
        message
    }

    fn fail(&self, pending: &PendingTurn, error: TransportError) -> TransportError {
        warn!(
            seq = pending.seq(),
            request_id = pending.request_id(),
            "chat turn failed: {error}"
        );
        self.publish(WidgetEvent::ChatFailed {
            error: error.to_string(),
        });
        error
    }

    fn append(&self, message: Message) {
        let event = WidgetEvent::MessageAppended {
            role: message.role(),
            text: message.text().to_string(),
        };
        self.lock_history().push(message);
        self.publish(event);
    }

    fn publish(&self, event: WidgetEvent) {
        if let Some(events) = &self.events {
            events.publish(event);
        }
    }

    fn lock_history(&self) -> std::sync::MutexGuard<'_, Vec<Message>> {
        self.history.lock().unwrap_or_else(|e| e.into_inner())
    }
}

//! In-process transport fake for controller tests.
//!
//! Chat replies are scripted per message text so concurrent sends pick up
//! the right reply regardless of poll order. Gated replies resolve only when
//! the test sends on the returned channel, which lets a test decide the
//! order responses arrive in.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::{
    BuildRequest, BuildResponse, ChatRequest, ChatResponse, SessionId, TransportClient,
    TransportError,
};

pub(crate) type Gate<T> = oneshot::Sender<Result<T, TransportError>>;

enum Scripted<T> {
    Ready(Result<T, TransportError>),
    Gated(oneshot::Receiver<Result<T, TransportError>>),
}

impl<T> Scripted<T> {
    async fn resolve(self) -> Result<T, TransportError> {
        match self {
            Scripted::Ready(result) => result,
            Scripted::Gated(rx) => rx
                .await
                .unwrap_or_else(|_| Err(TransportError::Network("gate dropped".into()))),
        }
    }
}

pub(crate) fn chat_ok(reply: &str, session_id: &str) -> Result<ChatResponse, TransportError> {
    Ok(ChatResponse {
        reply: reply.to_string(),
        session_id: SessionId::parse(session_id).unwrap(),
    })
}

pub(crate) fn build_ok(preview: &str) -> Result<BuildResponse, TransportError> {
    Ok(BuildResponse {
        success: true,
        preview: Some(preview.to_string()),
        error: None,
    })
}

#[derive(Default)]
pub(crate) struct ScriptedTransport {
    chats: Mutex<HashMap<String, VecDeque<Scripted<ChatResponse>>>>,
    builds: Mutex<VecDeque<Scripted<BuildResponse>>>,
    chat_log: Mutex<Vec<ChatRequest>>,
    build_log: Mutex<Vec<BuildRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reply_to(&self, message: &str, reply: &str, session_id: &str) {
        self.push_chat(message, Scripted::Ready(chat_ok(reply, session_id)));
    }

    pub(crate) fn fail_chat(&self, message: &str, error: TransportError) {
        self.push_chat(message, Scripted::Ready(Err(error)));
    }

    pub(crate) fn gate_chat(&self, message: &str) -> Gate<ChatResponse> {
        let (tx, rx) = oneshot::channel();
        self.push_chat(message, Scripted::Gated(rx));
        tx
    }

    pub(crate) fn build_result(&self, result: Result<BuildResponse, TransportError>) {
        self.builds.lock().unwrap().push_back(Scripted::Ready(result));
    }

    pub(crate) fn gate_build(&self) -> Gate<BuildResponse> {
        let (tx, rx) = oneshot::channel();
        self.builds.lock().unwrap().push_back(Scripted::Gated(rx));
        tx
    }

    pub(crate) fn chat_requests(&self) -> Vec<ChatRequest> {
        self.chat_log.lock().unwrap().clone()
    }

    pub(crate) fn build_requests(&self) -> Vec<BuildRequest> {
        self.build_log.lock().unwrap().clone()
    }

    fn push_chat(&self, message: &str, script: Scripted<ChatResponse>) {
        self.chats
            .lock()
            .unwrap()
            .entry(message.to_string())
            .or_default()
            .push_back(script);
    }
}

#[async_trait]
impl TransportClient for ScriptedTransport {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, TransportError> {
        self.chat_log.lock().unwrap().push(request.clone());
        let script = self
            .chats
            .lock()
            .unwrap()
            .get_mut(&request.message)
            .and_then(VecDeque::pop_front);
        match script {
            Some(script) => script.resolve().await,
            None => Err(TransportError::Network(format!(
                "no scripted reply for {:?}",
                request.message
            ))),
        }
    }

    async fn build(&self, request: &BuildRequest) -> Result<BuildResponse, TransportError> {
        self.build_log.lock().unwrap().push(request.clone());
        let script = self.builds.lock().unwrap().pop_front();
        match script {
            Some(script) => script.resolve().await,
            None => Err(TransportError::Network("no scripted build".into())),
        }
    }
}

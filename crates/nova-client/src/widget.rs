//! ChatWidget: one session, one conversation and one build tracker sharing
//! a transport and an event bus.

use std::sync::Arc;

use nova_common::{EventBus, SessionId, WidgetEvent};
use tokio::sync::broadcast;

use crate::build::{BuildError, BuildJob, BuildOrchestrator, DEFAULT_BUILD_PROMPT};
use crate::conversation::{ConversationController, Message, SendPolicy};
use crate::session::Session;
use crate::session_store::SessionStore;
use crate::{TransportClient, TransportError};

#[derive(Debug, Clone)]
pub struct WidgetOptions {
    pub send_policy: SendPolicy,
    /// Used when a build is started with a blank prompt.
    pub default_prompt: String,
    pub event_capacity: usize,
}

impl Default for WidgetOptions {
    fn default() -> Self {
        Self {
            send_policy: SendPolicy::default(),
            default_prompt: DEFAULT_BUILD_PROMPT.to_string(),
            event_capacity: 64,
        }
    }
}

pub struct ChatWidget {
    session: Arc<Session>,
    conversation: ConversationController,
    builder: BuildOrchestrator,
    events: Arc<EventBus>,
}

impl ChatWidget {
    /// Load the stored session and wire both controllers to `transport`.
    pub fn new(
        transport: Arc<dyn TransportClient>,
        store: Arc<dyn SessionStore>,
        options: WidgetOptions,
    ) -> Self {
        let events = Arc::new(EventBus::new(options.event_capacity));
        let session = Arc::new(Session::load(store).with_events(events.clone()));

        let conversation = ConversationController::new(transport.clone(), session.clone())
            .with_policy(options.send_policy)
            .with_events(events.clone());
        let builder = BuildOrchestrator::new(transport, session.clone())
            .with_default_prompt(options.default_prompt)
            .with_events(events.clone());

        Self {
            session,
            conversation,
            builder,
            events,
        }
    }

    pub fn conversation(&self) -> &ConversationController {
        &self.conversation
    }

    pub fn builder(&self) -> &BuildOrchestrator {
        &self.builder
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.session.current()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WidgetEvent> {
        self.events.subscribe()
    }

    pub async fn send_message(&self, text: &str) -> Result<Option<Message>, TransportError> {
        self.conversation.send_message(text).await
    }

    pub async fn start_build(&self, prompt: &str) -> Result<BuildJob, BuildError> {
        self.builder.start(prompt).await
    }
}

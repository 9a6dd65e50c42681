use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::types::{BuildState, Role};

/// State changes published by the widget controllers. A render layer
/// subscribes to these instead of owning the state itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum WidgetEvent {
    MessageAppended { role: Role, text: String },
    SessionChanged { session_id: String },
    ChatFailed { error: String },
    BuildStateChanged {
        state: BuildState,
        preview_url: Option<String>,
    },
    #[serde(other)]
    Unknown,
}

pub struct EventBus {
    sender: broadcast::Sender<WidgetEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WidgetEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: WidgetEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}

//! The widget's session identity.
//!
//! One `Session` exists per widget. It starts from whatever the store holds
//! and only ever changes when the chat service hands back a different id;
//! every change is persisted before anyone can observe it.

use std::sync::{Arc, Mutex};

use nova_common::{EventBus, SessionId, WidgetEvent};
use tracing::info;

use crate::session_store::SessionStore;

pub struct Session {
    store: Arc<dyn SessionStore>,
    current: Mutex<Option<SessionId>>,
    events: Option<Arc<EventBus>>,
}

impl Session {
    /// Populate from the store. An empty or unreadable store means no session yet.
    pub fn load(store: Arc<dyn SessionStore>) -> Self {
        let current = store.load();
        match &current {
            Some(id) => info!(session_id = %id, "restored session"),
            None => info!("no stored session, starting fresh"),
        }
        Self {
            store,
            current: Mutex::new(current),
            events: None,
        }
    }

    pub fn with_events(mut self, events: Arc<EventBus>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn current(&self) -> Option<SessionId> {
        self.current.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Adopt `server_id` if it differs from the held id (including the
    /// absent -> present case) and persist it. Returns whether it changed.
    pub fn reconcile(&self, server_id: &SessionId) -> bool {
        {
            let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
            if current.as_ref() == Some(server_id) {
                return false;
            }
            let previous = current.replace(server_id.clone());
            // Saved under the lock so the stored id never lags the held one.
            self.store.save(server_id);
            match previous {
                Some(previous) => {
                    info!(from = %previous, to = %server_id, "server rotated session")
                }
                None => info!(session_id = %server_id, "session established"),
            }
        }

        if let Some(events) = &self.events {
            events.publish(WidgetEvent::SessionChanged {
                session_id: server_id.to_string(),
            });
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session_store::MemorySessionStore;

    fn sid(raw: &str) -> SessionId {
        SessionId::parse(raw).unwrap()
    }

    #[test]
    fn loads_absent_from_empty_store() {
        let session = Session::load(Arc::new(MemorySessionStore::new()));
        assert!(session.current().is_none());
    }

    #[test]
    fn loads_stored_id() {
        let store = Arc::new(MemorySessionStore::with_session(sid("s1")));
        let session = Session::load(store);
        assert_eq!(session.current(), Some(sid("s1")));
    }

    #[test]
    fn first_id_is_adopted_and_saved() {
        let store = Arc::new(MemorySessionStore::new());
        let session = Session::load(store.clone());

        assert!(session.reconcile(&sid("s1")));
        assert_eq!(session.current(), Some(sid("s1")));
        assert_eq!(store.saved_ids(), vec![sid("s1")]);
        assert_eq!(store.load(), Some(sid("s1")));
    }

    #[test]
    fn same_id_is_not_saved_again() {
        let store = Arc::new(MemorySessionStore::with_session(sid("s1")));
        let session = Session::load(store.clone());

        assert!(!session.reconcile(&sid("s1")));
        assert!(store.saved_ids().is_empty());
    }

    #[test]
    fn rotated_id_replaces_and_saves() {
        let store = Arc::new(MemorySessionStore::with_session(sid("s1")));
        let session = Session::load(store.clone());

        assert!(session.reconcile(&sid("s2")));
        assert_eq!(session.current(), Some(sid("s2")));
        assert_eq!(store.saved_ids(), vec![sid("s2")]);
    }

    #[tokio::test]
    async fn change_is_published() {
        let bus = Arc::new(EventBus::new(8));
        let mut rx = bus.subscribe();
        let session = Session::load(Arc::new(MemorySessionStore::new())).with_events(bus);

        session.reconcile(&sid("s1"));
        session.reconcile(&sid("s1"));

        let event = rx.recv().await.unwrap();
        assert!(matches!(event, WidgetEvent::SessionChanged { ref session_id } if session_id == "s1"));
        assert!(rx.try_recv().is_err());
    }
}

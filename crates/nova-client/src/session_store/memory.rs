use std::sync::Mutex;

use nova_common::SessionId;

use super::SessionStore;

#[derive(Default)]
struct MemoryState {
    current: Option<SessionId>,
    saved: Vec<SessionId>,
}

/// Process-local store. Remembers every id it was asked to save.
#[derive(Default)]
pub struct MemorySessionStore {
    state: Mutex<MemoryState>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `id`, as if saved by an earlier run.
    pub fn with_session(id: SessionId) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                current: Some(id),
                saved: Vec::new(),
            }),
        }
    }

    /// Every id passed to `save`, oldest first.
    pub fn saved_ids(&self) -> Vec<SessionId> {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .saved
            .clone()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Option<SessionId> {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .current
            .clone()
    }

    fn save(&self, id: &SessionId) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.current = Some(id.clone());
        state.saved.push(id.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sid(raw: &str) -> SessionId {
        SessionId::parse(raw).unwrap()
    }

    #[test]
    fn empty_store_loads_nothing() {
        let store = MemorySessionStore::new();
        assert!(store.load().is_none());
        assert!(store.saved_ids().is_empty());
    }

    #[test]
    fn save_then_load() {
        let store = MemorySessionStore::new();
        store.save(&sid("s1"));
        assert_eq!(store.load(), Some(sid("s1")));
    }

    #[test]
    fn save_overwrites_and_records_history() {
        let store = MemorySessionStore::with_session(sid("old"));
        assert_eq!(store.load(), Some(sid("old")));

        store.save(&sid("s1"));
        store.save(&sid("s2"));
        assert_eq!(store.load(), Some(sid("s2")));
        assert_eq!(store.saved_ids(), vec![sid("s1"), sid("s2")]);
    }
}

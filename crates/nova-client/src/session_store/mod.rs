//! Durable storage for the single session id a widget carries.
//!
//! Storage is best-effort: `load` degrades to "no session" and `save`
//! failures are logged, never surfaced to the conversation flow.

mod file;
mod memory;

pub use file::{FileSessionStore, DEFAULT_SESSION_KEY};
pub use memory::MemorySessionStore;

use nova_common::SessionId;

/// Key/value persistence of one session identifier.
pub trait SessionStore: Send + Sync {
    /// The previously saved id, or `None` when nothing usable is stored.
    fn load(&self) -> Option<SessionId>;

    /// Persist `id`, replacing any previous value.
    fn save(&self, id: &SessionId);
}

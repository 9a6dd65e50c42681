//! Turn-based conversation with the remote assistant.
//!
//! A `ConversationController` owns the ordered history and exchanges one
//! user turn for one assistant turn per send. The user turn is appended
//! before the network call starts and survives a failed call.

mod controller;
mod pending;
mod types;


pub use controller::ConversationController;
pub use pending::PendingTurn;
pub use types::{Message, SendPolicy};

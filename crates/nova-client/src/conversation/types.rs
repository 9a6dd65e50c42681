//! Conversation value types.

use nova_common::Role;
use serde::{Deserialize, Serialize};

/// One turn of the conversation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    role: Role,
    text: String,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// How overlapping sends are dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SendPolicy {
    /// One chat request in flight at a time, dispatched in submit order.
    /// Assistant turns land in call order and each request carries the
    /// session id issued by the previous reply.
    #[default]
    Serialized,
    /// Requests go out immediately. Replies may resolve in any order, so
    /// assistant turns of different sends can interleave; only each send's
    /// own user/assistant order is kept.
    Concurrent,
}

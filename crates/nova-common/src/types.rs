//! Small enums shared between the client core and whatever renders it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Who authored a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// Lifecycle of a site build request.
///
/// `Idle -> Building -> Succeeded | Failed`, and a terminal state may go
/// back to `Building` when a new build starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BuildState {
    #[default]
    Idle,
    Building,
    Succeeded,
    Failed,
}

impl BuildState {
    pub fn is_terminal(self) -> bool {
        matches!(self, BuildState::Succeeded | BuildState::Failed)
    }
}

impl fmt::Display for BuildState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BuildState::Idle => "idle",
            BuildState::Building => "building",
            BuildState::Succeeded => "succeeded",
            BuildState::Failed => "failed",
        };
        f.write_str(label)
    }
}

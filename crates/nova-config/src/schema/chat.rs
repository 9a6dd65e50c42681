use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Queue overlapping sends so replies land in call order.
    pub serialize_sends: bool,
    /// Use the SSE chat endpoint and print replies as they arrive.
    pub streaming: bool,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            serialize_sends: true,
            streaming: false,
        }
    }
}

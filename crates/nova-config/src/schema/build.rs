use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Sent instead of an empty prompt.
    pub default_prompt: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            default_prompt: "Build me a site".into(),
        }
    }
}

//! Session manager tunables.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Number of prior messages sent as context with each turn (valid range: 0-50).
    pub context_window: u32,
    /// Maximum title length in characters before an ellipsis (valid range: 8-200).
    pub title_max_chars: u32,
    /// Title given to fresh and cleared sessions.
    pub placeholder_title: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            context_window: 5,
            title_max_chars: 30,
            placeholder_title: "New Chat".into(),
        }
    }
}

//! Answer service endpoint configuration.

use serde::{Deserialize, Serialize};

/// Where and how to reach the answer-generation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL of the backend, without a trailing path.
    pub base_url: String,
    /// Path of the chat endpoint, appended to `base_url`.
    pub chat_path: String,
    /// TCP connect timeout in seconds (valid range: 1-60).
    pub connect_timeout_secs: u32,
    /// Whole-request timeout in seconds (valid range: 5-600).
    pub request_timeout_secs: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".into(),
            chat_path: "/api/chat".into(),
            connect_timeout_secs: 10,
            request_timeout_secs: 120,
        }
    }
}

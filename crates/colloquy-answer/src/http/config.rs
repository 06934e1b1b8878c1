//! HTTP answer client configuration.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpAnswerConfig {
    pub base_url: String,
    pub chat_path: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl HttpAnswerConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            chat_path: "/api/chat".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(120),
        }
    }

    pub fn with_chat_path(mut self, path: impl Into<String>) -> Self {
        self.chat_path = path.into();
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Join `base_url` and an absolute endpoint path.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

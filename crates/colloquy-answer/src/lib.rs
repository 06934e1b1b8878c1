//! Answer service client for Colloquy.
//!
//! One request per conversational turn: the user message plus a bounded
//! window of prior messages. The service either answers or fails with a
//! classified [`AnswerError`].

pub mod http;

use async_trait::async_trait;
use colloquy_common::{ColloquyError, FailureKind, Role};

pub use http::{HttpAnswerClient, HttpAnswerConfig, ServiceStatus};

#[async_trait]
pub trait AnswerClient: Send + Sync {
    async fn ask(&self, request: &AnswerRequest) -> Result<AnswerResponse, AnswerError>;
}

/// One prior message, stripped to what the service needs.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ContextEntry {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AnswerRequest {
    pub message: String,
    pub context: Vec<ContextEntry>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AnswerResponse {
    pub answer: String,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub sources: Option<Vec<Source>>,
}

impl AnswerResponse {
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            success: Some(true),
            sources: None,
        }
    }
}

/// A document excerpt the answer was grounded on.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Source {
    #[serde(default)]
    pub page: serde_json::Value,
    pub text: String,
}

impl Source {
    /// Page label as text; the backend sends either a number or `"?"`.
    pub fn page_label(&self) -> String {
        match &self.page {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => "?".to_string(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnswerError {
    #[error("service unavailable (HTTP {status})")]
    ServiceUnavailable { status: u16 },
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),
    #[error("request failed: {0}")]
    Unclassified(String),
}

impl AnswerError {
    pub fn kind(&self) -> FailureKind {
        match self {
            AnswerError::ServiceUnavailable { .. } => FailureKind::ServiceUnavailable,
            AnswerError::NetworkUnreachable(_) => FailureKind::NetworkUnreachable,
            AnswerError::Unclassified(_) => FailureKind::Unclassified,
        }
    }
}

impl From<AnswerError> for ColloquyError {
    fn from(err: AnswerError) -> Self {
        ColloquyError::Answer(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_in_wire_shape() {
        let request = AnswerRequest {
            message: "How to control pink bollworm?".into(),
            context: vec![
                ContextEntry {
                    role: Role::User,
                    content: "Hi".into(),
                },
                ContextEntry {
                    role: Role::Assistant,
                    content: "Hello".into(),
                },
            ],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["message"], "How to control pink bollworm?");
        assert_eq!(json["context"][0]["role"], "user");
        assert_eq!(json["context"][1]["role"], "assistant");
        assert_eq!(json["context"][1]["content"], "Hello");
    }

    #[test]
    fn response_tolerates_missing_optional_fields() {
        let response: AnswerResponse = serde_json::from_str(r#"{"answer":"42"}"#).unwrap();
        assert_eq!(response.answer, "42");
        assert!(response.success.is_none());
        assert!(response.sources.is_none());
    }

    #[test]
    fn response_with_sources() {
        let response: AnswerResponse = serde_json::from_str(
            r#"{"answer":"Use pheromone traps","success":true,
                "sources":[{"page":12,"text":"Pheromone traps..."},{"page":"?","text":"..."}]}"#,
        )
        .unwrap();
        let sources = response.sources.unwrap();
        assert_eq!(sources[0].page_label(), "12");
        assert_eq!(sources[1].page_label(), "?");
    }

    #[test]
    fn error_kinds() {
        assert_eq!(
            AnswerError::ServiceUnavailable { status: 503 }.kind(),
            FailureKind::ServiceUnavailable
        );
        assert_eq!(
            AnswerError::NetworkUnreachable("refused".into()).kind(),
            FailureKind::NetworkUnreachable
        );
        assert_eq!(
            AnswerError::Unclassified("HTTP 500".into()).kind(),
            FailureKind::Unclassified
        );
    }

    #[test]
    fn error_display() {
        assert_eq!(
            AnswerError::ServiceUnavailable { status: 404 }.to_string(),
            "service unavailable (HTTP 404)"
        );
        assert_eq!(
            AnswerError::NetworkUnreachable("connection refused".into()).to_string(),
            "network unreachable: connection refused"
        );
    }

    #[test]
    fn converts_into_program_error() {
        let err: ColloquyError = AnswerError::Unclassified("invalid TLS backend".into()).into();
        assert!(matches!(err, ColloquyError::Answer(ref m) if m == "request failed: invalid TLS backend"));
    }
}

use colloquy_common::{MessageId, SessionId};

/// Rejections raised before any state is touched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("session {0} is still waiting for an answer")]
    Busy(SessionId),

    #[error("message {0} is not a user message")]
    InvalidRole(MessageId),
}

impl SessionError {
    pub(crate) fn session_not_found(id: &SessionId) -> Self {
        Self::NotFound(format!("session {id}"))
    }

    pub(crate) fn message_not_found(id: &MessageId) -> Self {
        Self::NotFound(format!("message {id}"))
    }
}

use tokio::sync::broadcast;

use crate::id::{MessageId, SessionId};
use crate::types::{FailureKind, Role};

/// Per-operation notifications for the presentation layer.
#[derive(Debug, Clone)]
pub enum Event {
    SessionCreated(SessionId),
    SessionDeleted(SessionId),
    SessionSelected(SessionId),
    SessionCleared(SessionId),
    MessageAppended {
        session_id: SessionId,
        message_id: MessageId,
        role: Role,
    },
    HistoryTruncated {
        session_id: SessionId,
        remaining: usize,
    },
    AnswerReceived {
        session_id: SessionId,
        message_id: MessageId,
    },
    AnswerFailed {
        session_id: SessionId,
        kind: FailureKind,
        reason: String,
    },
    StaleAnswerDiscarded(SessionId),
    PersistenceFailed(String),
}

pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: Event) -> usize {
        self.sender.send(event).unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}

//! Version-1 snapshots: a bare array of sessions whose messages carry a
//! `timestamp` field, with dates as ISO-8601 text or epoch milliseconds.

use chrono::{DateTime, Utc};
use colloquy_common::{MessageId, Role, SessionId, StoreError};
use serde::Deserialize;
use tracing::info;

use crate::model::{Message, Session};

#[derive(Deserialize)]
#[serde(untagged)]
enum LegacyTimestamp {
    Millis(i64),
    Text(String),
}

impl LegacyTimestamp {
    fn to_utc(&self) -> Result<DateTime<Utc>, StoreError> {
        match self {
            Self::Millis(ms) => DateTime::from_timestamp_millis(*ms)
                .ok_or_else(|| StoreError::Decode(format!("timestamp {ms} out of range"))),
            Self::Text(s) => DateTime::parse_from_rfc3339(s)
                .map(|t| t.with_timezone(&Utc))
                .map_err(|e| StoreError::Decode(format!("invalid timestamp {s:?}: {e}"))),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyMessage {
    id: String,
    role: Role,
    content: String,
    #[serde(alias = "createdAt")]
    timestamp: LegacyTimestamp,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacySession {
    id: String,
    title: String,
    #[serde(default)]
    messages: Vec<LegacyMessage>,
    created_at: LegacyTimestamp,
    #[serde(default)]
    updated_at: Option<LegacyTimestamp>,
}

impl LegacySession {
    fn upgrade(self) -> Result<Session, StoreError> {
        let created_at = self.created_at.to_utc()?;
        let updated_at = match &self.updated_at {
            Some(t) => t.to_utc()?.max(created_at),
            None => created_at,
        };
        let messages = self
            .messages
            .into_iter()
            .map(|m| {
                Ok(Message {
                    id: MessageId::from(m.id),
                    role: m.role,
                    content: m.content,
                    created_at: m.timestamp.to_utc()?,
                })
            })
            .collect::<Result<Vec<_>, StoreError>>()?;

        Ok(Session {
            id: SessionId::from(self.id),
            title: self.title,
            messages,
            created_at,
            updated_at,
        })
    }
}

/// Convert a version-1 array into current sessions, preserving order.
pub(super) fn migrate(value: serde_json::Value) -> Result<Vec<Session>, StoreError> {
    let legacy: Vec<LegacySession> =
        serde_json::from_value(value).map_err(|e| StoreError::Decode(format!("legacy snapshot: {e}")))?;
    let sessions = legacy
        .into_iter()
        .map(LegacySession::upgrade)
        .collect::<Result<Vec<_>, _>>()?;
    info!(sessions = sessions.len(), "migrated version-1 session snapshot");
    Ok(sessions)
}

//! Serialized form of the session collection.
//!
//! The current format is a versioned JSON envelope:
//!
//! ```json
//! { "version": 2, "activeSessionId": "...", "sessions": [ ... ] }
//! ```
//!
//! A bare JSON array is the version-1 format and is migrated on load
//! (see [`legacy`]).

mod legacy;

#[cfg(test)]
mod tests;

use colloquy_common::{SessionId, StoreError};
use serde::{Deserialize, Serialize};

use crate::model::{Session, SessionCollection};

pub const SNAPSHOT_VERSION: u32 = 2;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EnvelopeRef<'a> {
    version: u32,
    active_session_id: Option<&'a SessionId>,
    sessions: &'a [Session],
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    version: u32,
    #[serde(default)]
    active_session_id: Option<SessionId>,
    sessions: Vec<Session>,
}

/// Serialize the whole collection.
pub fn encode(collection: &SessionCollection) -> Result<Vec<u8>, StoreError> {
    let envelope = EnvelopeRef {
        version: SNAPSHOT_VERSION,
        active_session_id: collection.active_id(),
        sessions: collection.sessions(),
    };
    serde_json::to_vec_pretty(&envelope).map_err(|e| StoreError::Encode(e.to_string()))
}

/// Parse a blob in either the current or the legacy format.
///
/// Fails on malformed JSON, unknown versions, and duplicate ids. An empty
/// session list is returned as an empty collection.
pub fn decode(bytes: &[u8]) -> Result<SessionCollection, StoreError> {
    let value: serde_json::Value =
        serde_json::from_slice(bytes).map_err(|e| StoreError::Decode(e.to_string()))?;

    let collection = match value {
        serde_json::Value::Array(_) => {
            let sessions = legacy::migrate(value)?;
            SessionCollection::from_parts(sessions, None)
        }
        serde_json::Value::Object(_) => {
            let envelope: Envelope =
                serde_json::from_value(value).map_err(|e| StoreError::Decode(e.to_string()))?;
            if envelope.version != SNAPSHOT_VERSION {
                return Err(StoreError::Decode(format!(
                    "unsupported snapshot version {}",
                    envelope.version
                )));
            }
            SessionCollection::from_parts(envelope.sessions, envelope.active_session_id)
        }
        other => {
            return Err(StoreError::Decode(format!(
                "expected an object or array, found {}",
                json_kind(&other)
            )))
        }
    };

    collection.check_unique_ids().map_err(StoreError::Decode)?;
    Ok(collection)
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

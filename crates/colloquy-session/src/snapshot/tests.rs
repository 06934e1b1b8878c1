use chrono::{TimeZone, Utc};
use colloquy_common::{MessageId, Role};

use super::*;
use crate::model::Message;

fn sample_collection() -> SessionCollection {
    let mut older = Session::new("Pest control");
    older.messages.push(Message::new(Role::User, "What pests attack cotton?"));
    older
        .messages
        .push(Message::new(Role::Assistant, "Bollworms and whitefly."));

    let newer = Session::new("New Chat");
    let active = newer.id.clone();
    SessionCollection::from_parts(vec![newer, older], Some(active))
}

#[test]
fn round_trip_preserves_everything() {
    let original = sample_collection();
    let bytes = encode(&original).unwrap();
    let decoded = decode(&bytes).unwrap();
    assert_eq!(decoded, original);
}

#[test]
fn envelope_uses_camel_case_names() {
    let bytes = encode(&sample_collection()).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(value["version"], 2);
    assert!(value["activeSessionId"].is_string());
    let session = &value["sessions"][1];
    assert!(session["createdAt"].is_string());
    assert!(session["updatedAt"].is_string());
    assert_eq!(session["messages"][0]["role"], "user");
    assert!(session["messages"][0]["createdAt"].is_string());
}

#[test]
fn empty_session_list_decodes_to_empty_collection() {
    let decoded = decode(br#"{"version":2,"activeSessionId":null,"sessions":[]}"#).unwrap();
    assert!(decoded.is_empty());
    assert!(decoded.active_id().is_none());
}

#[test]
fn dangling_active_id_selects_first_session() {
    let collection = sample_collection();
    let first = collection.sessions()[0].id.clone();
    let mut value: serde_json::Value = serde_json::from_slice(&encode(&collection).unwrap()).unwrap();
    value["activeSessionId"] = serde_json::json!("no-such-session");

    let decoded = decode(&serde_json::to_vec(&value).unwrap()).unwrap();
    assert_eq!(decoded.active_id(), Some(&first));
}

#[test]
fn garbage_is_a_decode_error() {
    assert!(matches!(decode(b"not json"), Err(StoreError::Decode(_))));
    assert!(matches!(decode(b"42"), Err(StoreError::Decode(_))));
}

#[test]
fn future_version_is_rejected() {
    let err = decode(br#"{"version":3,"sessions":[]}"#).unwrap_err();
    assert!(err.to_string().contains("unsupported snapshot version 3"));
}

#[test]
fn duplicate_session_ids_are_rejected() {
    let session = Session::new("dup");
    let collection = SessionCollection::from_parts(vec![session.clone(), session], None);
    let bytes = encode(&collection).unwrap();
    assert!(matches!(decode(&bytes), Err(StoreError::Decode(_))));
}

#[test]
fn legacy_array_is_migrated() {
    let legacy = br#"[
        {
            "id": "1718000000000",
            "title": "How to control pink bollworm...",
            "messages": [
                {"id": "1718000000001", "role": "user", "content": "How to control pink bollworm in cotton?", "timestamp": "2024-06-10T06:13:20.001Z"},
                {"id": "1718000000002", "role": "assistant", "content": "Use pheromone traps.", "timestamp": 1718000005000}
            ],
            "createdAt": "2024-06-10T06:13:20.000Z",
            "updatedAt": "2024-06-10T06:13:25.000Z"
        },
        {
            "id": "1717000000000",
            "title": "New Chat",
            "messages": [],
            "createdAt": 1717000000000
        }
    ]"#;

    let collection = decode(legacy).unwrap();
    assert_eq!(collection.len(), 2);
    assert_eq!(collection.active_id().unwrap().as_str(), "1718000000000");

    let first = &collection.sessions()[0];
    assert_eq!(first.messages.len(), 2);
    assert_eq!(first.messages[0].id, MessageId::from("1718000000001"));
    assert_eq!(first.messages[1].role, Role::Assistant);
    assert_eq!(
        first.messages[1].created_at,
        Utc.timestamp_millis_opt(1_718_000_005_000).unwrap()
    );

    let second = &collection.sessions()[1];
    assert_eq!(second.updated_at, second.created_at);
}

#[test]
fn legacy_with_bad_timestamp_is_rejected() {
    let legacy = br#"[{"id":"1","title":"t","messages":[],"createdAt":"yesterday"}]"#;
    assert!(matches!(decode(legacy), Err(StoreError::Decode(_))));
}

#[test]
fn migrated_snapshot_reencodes_as_current_version() {
    let legacy = br#"[{"id":"1","title":"t","messages":[],"createdAt":"2024-01-01T00:00:00Z"}]"#;
    let collection = decode(legacy).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&encode(&collection).unwrap()).unwrap();
    assert_eq!(value["version"], SNAPSHOT_VERSION);
    assert_eq!(value["activeSessionId"], "1");
}

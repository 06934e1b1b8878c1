//! Sessions, messages, and the collection that holds them.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use colloquy_common::{MessageId, Role, SessionId};
use serde::{Deserialize, Serialize};

/// Placeholder title for a session with no user message yet.
pub const DEFAULT_PLACEHOLDER_TITLE: &str = "New Chat";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}

/// One conversation: a title plus an ordered, gap-free message sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: SessionId,
    pub title: String,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: SessionId::new(),
            title: title.into(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Index of a message in the sequence.
    pub fn position(&self, id: &MessageId) -> Option<usize> {
        self.messages.iter().position(|m| &m.id == id)
    }

    pub fn message(&self, id: &MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| &m.id == id)
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Refresh `updated_at` without ever moving it backwards.
    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now().max(self.updated_at);
    }

    pub fn summary(&self, active: bool) -> SessionSummary {
        SessionSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            message_count: self.messages.len(),
            updated_at: self.updated_at,
            active,
        }
    }

    fn has_unique_message_ids(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.messages.len());
        self.messages.iter().all(|m| seen.insert(&m.id))
    }
}

/// A row in the session list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub id: SessionId,
    pub title: String,
    pub message_count: usize,
    pub updated_at: DateTime<Utc>,
    pub active: bool,
}

/// Ordered sessions plus the active pointer.
///
/// New sessions go to the front. The active pointer is `None` only while the
/// collection is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionCollection {
    sessions: Vec<Session>,
    active: Option<SessionId>,
}

impl SessionCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection from loaded parts. A missing or dangling active
    /// pointer falls back to the first session.
    pub fn from_parts(sessions: Vec<Session>, active: Option<SessionId>) -> Self {
        let active = match active {
            Some(id) if sessions.iter().any(|s| s.id == id) => Some(id),
            _ => sessions.first().map(|s| s.id.clone()),
        };
        Self { sessions, active }
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn active_id(&self) -> Option<&SessionId> {
        self.active.as_ref()
    }

    pub fn active(&self) -> Option<&Session> {
        self.active.as_ref().and_then(|id| self.get(id))
    }

    pub fn get(&self, id: &SessionId) -> Option<&Session> {
        self.sessions.iter().find(|s| &s.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: &SessionId) -> Option<&mut Session> {
        self.sessions.iter_mut().find(|s| &s.id == id)
    }

    pub fn contains(&self, id: &SessionId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Insert at the front and make it active.
    pub(crate) fn push_front(&mut self, session: Session) {
        self.active = Some(session.id.clone());
        self.sessions.insert(0, session);
    }

    /// Remove a session. If it was active, the new first session (if any)
    /// becomes active.
    pub(crate) fn remove(&mut self, id: &SessionId) -> Option<Session> {
        let index = self.sessions.iter().position(|s| &s.id == id)?;
        let removed = self.sessions.remove(index);
        if self.active.as_ref() == Some(id) {
            self.active = self.sessions.first().map(|s| s.id.clone());
        }
        Some(removed)
    }

    pub(crate) fn set_active(&mut self, id: &SessionId) -> bool {
        if self.contains(id) {
            self.active = Some(id.clone());
            true
        } else {
            false
        }
    }

    /// Check that session ids are unique and message ids are unique within
    /// each session.
    pub fn check_unique_ids(&self) -> Result<(), String> {
        let mut seen = HashSet::with_capacity(self.sessions.len());
        for session in &self.sessions {
            if !seen.insert(&session.id) {
                return Err(format!("duplicate session id {}", session.id));
            }
            if !session.has_unique_message_ids() {
                return Err(format!("duplicate message id in session {}", session.id));
            }
        }
        Ok(())
    }

    pub fn summaries(&self) -> Vec<SessionSummary> {
        self.sessions
            .iter()
            .map(|s| s.summary(self.active.as_ref() == Some(&s.id)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_titled(title: &str) -> Session {
        Session::new(title)
    }

    #[test]
    fn new_session_is_empty_with_equal_timestamps() {
        let s = Session::new(DEFAULT_PLACEHOLDER_TITLE);
        assert!(s.is_empty());
        assert_eq!(s.title, "New Chat");
        assert_eq!(s.created_at, s.updated_at);
    }

    #[test]
    fn touch_never_goes_backwards() {
        let mut s = Session::new("t");
        let future = Utc::now() + chrono::Duration::hours(1);
        s.updated_at = future;
        s.touch();
        assert_eq!(s.updated_at, future);
    }

    #[test]
    fn push_front_activates_newest() {
        let mut c = SessionCollection::new();
        let a = session_titled("a");
        let b = session_titled("b");
        let b_id = b.id.clone();
        c.push_front(a);
        c.push_front(b);
        assert_eq!(c.sessions()[0].title, "b");
        assert_eq!(c.active_id(), Some(&b_id));
    }

    #[test]
    fn removing_active_activates_first_remaining() {
        let mut c = SessionCollection::new();
        let a = session_titled("a");
        let a_id = a.id.clone();
        let b = session_titled("b");
        let b_id = b.id.clone();
        c.push_front(a);
        c.push_front(b);

        c.remove(&b_id).unwrap();
        assert_eq!(c.active_id(), Some(&a_id));

        c.remove(&a_id).unwrap();
        assert!(c.is_empty());
        assert!(c.active_id().is_none());
    }

    #[test]
    fn removing_inactive_keeps_pointer() {
        let mut c = SessionCollection::new();
        let a = session_titled("a");
        let a_id = a.id.clone();
        c.push_front(a);
        let b = session_titled("b");
        let b_id = b.id.clone();
        c.push_front(b);

        c.remove(&a_id).unwrap();
        assert_eq!(c.active_id(), Some(&b_id));
    }

    #[test]
    fn dangling_active_falls_back_to_first() {
        let a = session_titled("a");
        let a_id = a.id.clone();
        let c = SessionCollection::from_parts(vec![a], Some(SessionId::from("gone")));
        assert_eq!(c.active_id(), Some(&a_id));
    }

    #[test]
    fn duplicate_session_ids_are_detected() {
        let a = session_titled("a");
        let dup = a.clone();
        let c = SessionCollection::from_parts(vec![a, dup], None);
        assert!(c.check_unique_ids().is_err());
    }

    #[test]
    fn duplicate_message_ids_are_detected() {
        let mut a = session_titled("a");
        let m = Message::new(Role::User, "hi");
        a.messages.push(m.clone());
        a.messages.push(m);
        let c = SessionCollection::from_parts(vec![a], None);
        let err = c.check_unique_ids().unwrap_err();
        assert!(err.contains("duplicate message id"));
    }

    #[test]
    fn summaries_flag_the_active_session() {
        let mut c = SessionCollection::new();
        c.push_front(session_titled("a"));
        c.push_front(session_titled("b"));
        let rows = c.summaries();
        assert!(rows[0].active);
        assert!(!rows[1].active);
    }
}

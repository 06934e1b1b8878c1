use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use colloquy_common::SessionId;

use crate::error::SessionError;

/// Per-session busy marker, released on drop so it is cleared even when the
/// awaiting future is cancelled.
pub(crate) struct BusyGuard<'a> {
    busy: &'a Mutex<HashSet<SessionId>>,
    session_id: SessionId,
}

impl<'a> BusyGuard<'a> {
    /// Mark the session busy. Returns `Busy` if it already is.
    pub(crate) fn acquire(
        busy: &'a Mutex<HashSet<SessionId>>,
        session_id: &SessionId,
    ) -> Result<Self, SessionError> {
        let mut set = busy.lock().unwrap_or_else(PoisonError::into_inner);
        if !set.insert(session_id.clone()) {
            return Err(SessionError::Busy(session_id.clone()));
        }
        Ok(Self {
            busy,
            session_id: session_id.clone(),
        })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        let mut set = self.busy.lock().unwrap_or_else(PoisonError::into_inner);
        set.remove(&self.session_id);
    }
}

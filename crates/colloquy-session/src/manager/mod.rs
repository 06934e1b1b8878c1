//! The session manager: lifecycle operations, accessors, and persistence.
//!
//! All state sits behind one mutex that is never held across an await. The
//! only asynchronous step is the answer-service call made by the turn
//! operations in [`turns`].

mod guard;
mod turns;


use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use colloquy_answer::{AnswerClient, AnswerError, Source};
use colloquy_common::{Event, EventBus, SessionId};
use tracing::{error, info, warn};

use crate::context::DEFAULT_CONTEXT_WINDOW;
use crate::error::SessionError;
use crate::model::{Message, Session, SessionCollection, SessionSummary, DEFAULT_PLACEHOLDER_TITLE};
use crate::snapshot;
use crate::store::SessionStore;

/// Tunables for the manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerOptions {
    /// Prior messages sent with each turn.
    pub context_window: usize,
    /// Title length before truncation, in characters.
    pub title_max_chars: usize,
    pub placeholder_title: String,
}

impl Default for ManagerOptions {
    fn default() -> Self {
        Self {
            context_window: DEFAULT_CONTEXT_WINDOW,
            title_max_chars: 30,
            placeholder_title: DEFAULT_PLACEHOLDER_TITLE.to_string(),
        }
    }
}

/// How a turn that reached the answer service ended.
#[derive(Debug, Clone)]
pub enum TurnOutcome {
    /// The answer was appended to the session.
    Answered { message: Message, sources: Vec<Source> },
    /// The service failed; nothing was appended.
    Failed(AnswerError),
    /// The session changed while the request was in flight; the response
    /// was dropped.
    Stale,
}

pub(crate) struct State {
    pub(crate) collection: SessionCollection,
    generations: HashMap<SessionId, u64>,
}

impl State {
    fn new(collection: SessionCollection) -> Self {
        Self {
            collection,
            generations: HashMap::new(),
        }
    }

    pub(crate) fn generation(&self, id: &SessionId) -> u64 {
        self.generations.get(id).copied().unwrap_or(0)
    }

    /// Record a change to a session's message sequence. Any response issued
    /// before the change becomes stale.
    pub(crate) fn bump(&mut self, id: &SessionId) -> u64 {
        let generation = self.generations.entry(id.clone()).or_insert(0);
        *generation += 1;
        *generation
    }

    fn forget(&mut self, id: &SessionId) {
        self.generations.remove(id);
    }
}

pub struct SessionManager {
    state: Mutex<State>,
    busy: Mutex<HashSet<SessionId>>,
    store: Arc<dyn SessionStore>,
    client: Arc<dyn AnswerClient>,
    events: Arc<EventBus>,
    options: ManagerOptions,
}

impl SessionManager {
    /// Load the saved collection, or start with one fresh session if nothing
    /// usable was saved.
    pub fn open(
        store: Arc<dyn SessionStore>,
        client: Arc<dyn AnswerClient>,
        events: Arc<EventBus>,
        options: ManagerOptions,
    ) -> Self {
        let (collection, fresh) = match load_collection(store.as_ref()) {
            Some(collection) => (collection, false),
            None => (SessionCollection::new(), true),
        };
        let manager = Self {
            state: Mutex::new(State::new(collection)),
            busy: Mutex::new(HashSet::new()),
            store,
            client,
            events,
            options,
        };

        if fresh {
            let mut state = manager.lock();
            let id = manager.insert_fresh(&mut state);
            info!(session = %id, "started with a fresh session");
            manager.commit(&state);
        }
        manager
    }

    pub fn options(&self) -> &ManagerOptions {
        &self.options
    }

    pub fn events(&self) -> Arc<EventBus> {
        Arc::clone(&self.events)
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    pub fn active_session_id(&self) -> Option<SessionId> {
        self.lock().collection.active_id().cloned()
    }

    /// Snapshot of the active session.
    pub fn active_session(&self) -> Option<Session> {
        self.lock().collection.active().cloned()
    }

    pub fn session(&self, id: &SessionId) -> Option<Session> {
        self.lock().collection.get(id).cloned()
    }

    /// List rows in collection order, newest first.
    pub fn sessions(&self) -> Vec<SessionSummary> {
        self.lock().collection.summaries()
    }

    pub fn session_count(&self) -> usize {
        self.lock().collection.len()
    }

    /// Whether a request is outstanding for the session.
    pub fn is_busy(&self, id: &SessionId) -> bool {
        self.busy
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(id)
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// Add an empty session at the front and make it active.
    pub fn create_session(&self) -> SessionId {
        let mut state = self.lock();
        let id = self.insert_fresh(&mut state);
        info!(session = %id, "session created");
        self.commit(&state);
        id
    }

    /// Remove a session. Deleting the last one creates a replacement.
    ///
    /// Allowed while a request is outstanding; its response will be
    /// discarded.
    pub fn delete_session(&self, id: &SessionId) -> Result<(), SessionError> {
        let mut state = self.lock();
        let was_active = state.collection.active_id() == Some(id);
        state
            .collection
            .remove(id)
            .ok_or_else(|| SessionError::session_not_found(id))?;
        state.forget(id);
        info!(session = %id, "session deleted");
        self.events.publish(Event::SessionDeleted(id.clone()));

        if state.collection.is_empty() {
            self.insert_fresh(&mut state);
        } else if was_active {
            if let Some(next) = state.collection.active_id() {
                self.events.publish(Event::SessionSelected(next.clone()));
            }
        }

        self.commit(&state);
        Ok(())
    }

    pub fn select_session(&self, id: &SessionId) -> Result<(), SessionError> {
        let mut state = self.lock();
        if !state.collection.set_active(id) {
            return Err(SessionError::session_not_found(id));
        }
        self.events.publish(Event::SessionSelected(id.clone()));
        self.commit(&state);
        Ok(())
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    pub(crate) fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn insert_fresh(&self, state: &mut State) -> SessionId {
        let session = Session::new(self.options.placeholder_title.clone());
        let id = session.id.clone();
        state.collection.push_front(session);
        self.events.publish(Event::SessionCreated(id.clone()));
        id
    }

    /// Serialize and save the whole collection. Failures are reported but
    /// never undo the in-memory change.
    pub(crate) fn commit(&self, state: &State) {
        let result = snapshot::encode(&state.collection).and_then(|bytes| self.store.save(&bytes));
        if let Err(e) = result {
            error!(error = %e, "failed to save sessions");
            self.events.publish(Event::PersistenceFailed(e.to_string()));
        }
    }
}

/// The saved collection, or `None` when a fresh one is needed.
fn load_collection(store: &dyn SessionStore) -> Option<SessionCollection> {
    let bytes = match store.load() {
        Ok(Some(bytes)) => bytes,
        Ok(None) => {
            info!("no saved sessions");
            return None;
        }
        Err(e) => {
            warn!(error = %e, "could not read saved sessions, starting fresh");
            return None;
        }
    };

    match snapshot::decode(&bytes) {
        Ok(collection) if collection.is_empty() => {
            info!("saved snapshot has no sessions");
            None
        }
        Ok(collection) => {
            info!(sessions = collection.len(), "sessions loaded");
            Some(collection)
        }
        Err(e) => {
            warn!(error = %e, "saved sessions are corrupt, starting fresh");
            None
        }
    }
}

//! Message operations and the answer-service turn.
//!
//! Every call path (append, regenerate, edit of a user message) funnels into
//! the same sequence: mutate and mark busy under the lock, await the service
//! without the lock, then reconcile under the lock again.

use colloquy_answer::{AnswerError, AnswerRequest, AnswerResponse};
use colloquy_common::{Event, MessageId, Role, SessionId};
use tracing::{debug, info, warn};

use crate::context::context_window;
use crate::error::SessionError;
use crate::model::{Message, Session};
use crate::title::derive_title;

use super::guard::BusyGuard;
use super::{SessionManager, State, TurnOutcome};

/// A request ready to send, holding the session's busy marker.
struct PendingTurn<'a> {
    _guard: BusyGuard<'a>,
    session_id: SessionId,
    message_id: MessageId,
    generation: u64,
    request: AnswerRequest,
}

/// Reject blank text. Accepted text is kept exactly as typed.
fn validate_text(text: &str) -> Result<&str, SessionError> {
    if text.trim().is_empty() {
        return Err(SessionError::Validation("message text is empty".into()));
    }
    Ok(text)
}

fn session_mut<'s>(state: &'s mut State, id: &SessionId) -> Result<&'s mut Session, SessionError> {
    state
        .collection
        .get_mut(id)
        .ok_or_else(|| SessionError::session_not_found(id))
}

impl SessionManager {
    /// Append a user message and ask the service for an answer.
    pub async fn append_user_message(
        &self,
        session_id: &SessionId,
        text: &str,
    ) -> Result<TurnOutcome, SessionError> {
        let text = validate_text(text)?;
        let pending = {
            let mut state = self.lock();
            if !state.collection.contains(session_id) {
                return Err(SessionError::session_not_found(session_id));
            }
            let guard = BusyGuard::acquire(&self.busy, session_id)?;

            let max_chars = self.options.title_max_chars;
            let session = session_mut(&mut state, session_id)?;
            if session.is_empty() {
                session.title = derive_title(text, max_chars);
            }
            let message = Message::new(Role::User, text);
            let message_id = message.id.clone();
            session.messages.push(message);
            session.touch();
            let cut = session.messages.len() - 1;
            state.bump(session_id);

            self.events.publish(Event::MessageAppended {
                session_id: session_id.clone(),
                message_id,
                role: Role::User,
            });
            let pending = self.prepare_turn(&state, guard, session_id, cut)?;
            self.commit(&state);
            pending
        };
        Ok(self.run_turn(pending).await)
    }

    /// Overwrite a message and drop everything after it.
    ///
    /// Editing a user message re-asks the service and returns its outcome;
    /// editing an assistant message returns `None`.
    pub async fn edit_message(
        &self,
        session_id: &SessionId,
        message_id: &MessageId,
        new_text: &str,
    ) -> Result<Option<TurnOutcome>, SessionError> {
        let text = validate_text(new_text)?;
        let pending = {
            let mut state = self.lock();
            let session = session_mut(&mut state, session_id)?;
            let index = session
                .position(message_id)
                .ok_or_else(|| SessionError::message_not_found(message_id))?;
            let role = session.messages[index].role;

            let guard = match role {
                Role::User => Some(BusyGuard::acquire(&self.busy, session_id)?),
                Role::Assistant => None,
            };

            let session = session_mut(&mut state, session_id)?;
            session.messages[index].content = text.to_string();
            session.messages.truncate(index + 1);
            session.touch();
            let remaining = session.messages.len();
            state.bump(session_id);
            debug!(session = %session_id, message = %message_id, remaining, "message edited");

            self.events.publish(Event::HistoryTruncated {
                session_id: session_id.clone(),
                remaining,
            });
            let pending = match guard {
                Some(guard) => Some(self.prepare_turn(&state, guard, session_id, index)?),
                None => None,
            };
            self.commit(&state);
            pending
        };

        match pending {
            Some(pending) => Ok(Some(self.run_turn(pending).await)),
            None => Ok(None),
        }
    }

    /// Drop a message and everything after it.
    pub fn delete_message(
        &self,
        session_id: &SessionId,
        message_id: &MessageId,
    ) -> Result<(), SessionError> {
        let mut state = self.lock();
        let session = session_mut(&mut state, session_id)?;
        let index = session
            .position(message_id)
            .ok_or_else(|| SessionError::message_not_found(message_id))?;
        session.messages.truncate(index);
        session.touch();
        state.bump(session_id);

        self.events.publish(Event::HistoryTruncated {
            session_id: session_id.clone(),
            remaining: index,
        });
        self.commit(&state);
        Ok(())
    }

    /// Drop everything after a user message and ask for a fresh answer to it.
    pub async fn regenerate(
        &self,
        session_id: &SessionId,
        user_message_id: &MessageId,
    ) -> Result<TurnOutcome, SessionError> {
        let pending = {
            let mut state = self.lock();
            let session = session_mut(&mut state, session_id)?;
            let index = session
                .position(user_message_id)
                .ok_or_else(|| SessionError::message_not_found(user_message_id))?;
            if !session.messages[index].is_user() {
                return Err(SessionError::InvalidRole(user_message_id.clone()));
            }
            let guard = BusyGuard::acquire(&self.busy, session_id)?;

            let session = session_mut(&mut state, session_id)?;
            session.messages.truncate(index + 1);
            session.touch();
            state.bump(session_id);

            self.events.publish(Event::HistoryTruncated {
                session_id: session_id.clone(),
                remaining: index + 1,
            });
            let pending = self.prepare_turn(&state, guard, session_id, index)?;
            self.commit(&state);
            pending
        };
        Ok(self.run_turn(pending).await)
    }

    /// Empty the session and reset its title. The session itself stays.
    pub fn clear_session(&self, session_id: &SessionId) -> Result<(), SessionError> {
        let mut state = self.lock();
        let placeholder = self.options.placeholder_title.clone();
        let session = session_mut(&mut state, session_id)?;
        session.messages.clear();
        session.title = placeholder;
        session.touch();
        state.bump(session_id);

        info!(session = %session_id, "session cleared");
        self.events.publish(Event::SessionCleared(session_id.clone()));
        self.commit(&state);
        Ok(())
    }

    // =========================================================================
    // TURN
    // =========================================================================

    /// Build the request for the message at `cut`, which must be the last
    /// message of the session.
    fn prepare_turn<'a>(
        &self,
        state: &State,
        guard: BusyGuard<'a>,
        session_id: &SessionId,
        cut: usize,
    ) -> Result<PendingTurn<'a>, SessionError> {
        let session = state
            .collection
            .get(session_id)
            .ok_or_else(|| SessionError::session_not_found(session_id))?;
        let message = session
            .messages
            .get(cut)
            .ok_or_else(|| SessionError::NotFound(format!("message at position {cut}")))?;

        Ok(PendingTurn {
            _guard: guard,
            session_id: session_id.clone(),
            message_id: message.id.clone(),
            generation: state.generation(session_id),
            request: AnswerRequest {
                message: message.content.clone(),
                context: context_window(&session.messages, cut, self.options.context_window),
            },
        })
    }

    async fn run_turn(&self, pending: PendingTurn<'_>) -> TurnOutcome {
        debug!(
            session = %pending.session_id,
            context = pending.request.context.len(),
            "asking answer service"
        );
        let result = self.client.ask(&pending.request).await;
        self.finish_turn(pending, result)
    }

    fn finish_turn(
        &self,
        pending: PendingTurn<'_>,
        result: Result<AnswerResponse, AnswerError>,
    ) -> TurnOutcome {
        let mut state = self.lock();
        let session_id = &pending.session_id;

        let current = state.collection.get(session_id).is_some_and(|s| {
            s.last_message().is_some_and(|m| m.id == pending.message_id)
        }) && state.generation(session_id) == pending.generation;

        if !current {
            warn!(session = %session_id, "session changed while waiting, answer discarded");
            self.events
                .publish(Event::StaleAnswerDiscarded(session_id.clone()));
            return TurnOutcome::Stale;
        }

        match result {
            Ok(response) => {
                let message = Message::new(Role::Assistant, response.answer);
                let Some(session) = state.collection.get_mut(session_id) else {
                    return TurnOutcome::Stale;
                };
                session.messages.push(message.clone());
                session.touch();
                state.bump(session_id);

                self.events.publish(Event::MessageAppended {
                    session_id: session_id.clone(),
                    message_id: message.id.clone(),
                    role: Role::Assistant,
                });
                self.events.publish(Event::AnswerReceived {
                    session_id: session_id.clone(),
                    message_id: message.id.clone(),
                });
                self.commit(&state);
                TurnOutcome::Answered {
                    message,
                    sources: response.sources.unwrap_or_default(),
                }
            }
            Err(err) => {
                warn!(session = %session_id, kind = %err.kind(), error = %err, "answer service failed");
                self.events.publish(Event::AnswerFailed {
                    session_id: session_id.clone(),
                    kind: err.kind(),
                    reason: err.to_string(),
                });
                TurnOutcome::Failed(err)
            }
        }
    }
}

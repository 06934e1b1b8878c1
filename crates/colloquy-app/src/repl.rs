//! Interactive loop: reads lines from stdin, drives the session manager, and
//! prints the resulting state.

use std::io::Write;
use std::path::{Path, PathBuf};

use colloquy_answer::HttpAnswerClient;
use colloquy_common::{Event, MessageId, SessionId};
use colloquy_session::{export_file_name, export_transcript, SessionError, SessionManager, TurnOutcome};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::commands::{self, Command};
use crate::render;

/// Log every manager event and surface save failures to the user.
pub fn spawn_event_listener(mut rx: broadcast::Receiver<Event>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(Event::PersistenceFailed(reason)) => {
                    eprintln!("Warning: conversations could not be saved ({reason})");
                }
                Ok(event) => debug!(?event, "session event"),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!("event listener lagged, {n} events skipped");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

pub struct Repl<'a> {
    manager: &'a SessionManager,
    client: &'a HttpAnswerClient,
}

impl<'a> Repl<'a> {
    pub fn new(manager: &'a SessionManager, client: &'a HttpAnswerClient) -> Self {
        Self { manager, client }
    }

    pub async fn run(&self) -> colloquy_common::Result<()> {
        println!("Colloquy v{}. Type /help for commands.", env!("CARGO_PKG_VERSION"));
        self.show_active();

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            print!("> ");
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                println!();
                break;
            };
            match commands::parse(&line) {
                Command::Quit => break,
                command => self.execute(command).await,
            }
        }
        Ok(())
    }

    async fn execute(&self, command: Command) {
        match command {
            Command::Empty | Command::Quit => {}
            Command::Send(text) => self.send(&text).await,
            Command::New => {
                self.manager.create_session();
                self.show_active();
            }
            Command::List => println!("{}", render::session_list(&self.manager.sessions())),
            Command::Select(target) => match self.find_session(&target) {
                Some(id) => {
                    self.report(self.manager.select_session(&id));
                    self.show_active();
                }
                None => println!("No chat {target:?}. Use /list to see chats."),
            },
            Command::Delete(target) => {
                let id = match target {
                    Some(target) => self.find_session(&target),
                    None => self.manager.active_session_id(),
                };
                match id {
                    Some(id) => match self.manager.delete_session(&id) {
                        Ok(()) => {
                            println!("Chat deleted.");
                            self.show_active();
                        }
                        Err(e) => self.show_error(&e),
                    },
                    None => println!("No such chat. Use /list to see chats."),
                }
            }
            Command::Edit { target, text } => self.edit(&target, &text).await,
            Command::Remove(target) => {
                let Some((sid, mid)) = self.find_message(&target) else {
                    return;
                };
                self.report(self.manager.delete_message(&sid, &mid));
                self.show_active();
            }
            Command::Regenerate(target) => self.regenerate(target.as_deref()).await,
            Command::Clear => {
                if let Some(sid) = self.manager.active_session_id() {
                    match self.manager.clear_session(&sid) {
                        Ok(()) => println!("Chat cleared."),
                        Err(e) => self.show_error(&e),
                    }
                }
            }
            Command::Show => self.show_active(),
            Command::Export(path) => self.export(path).await,
            Command::Examples(pick) => self.examples(pick).await,
            Command::Status => match self.client.status().await {
                Ok(status) => println!("{}", render::status_report(&status)),
                Err(e) => {
                    warn!(error = %e, "status request failed");
                    println!("{}", render::failure_banner(e.kind(), false));
                }
            },
            Command::Help => println!("{}", render::HELP),
            Command::Usage(usage) => println!("Usage: {usage}"),
            Command::Unknown(name) => println!("Unknown command /{name}. Type /help."),
        }
    }

    async fn send(&self, text: &str) {
        let Some(sid) = self.manager.active_session_id() else {
            return;
        };
        println!("Thinking...");
        let result = self.manager.append_user_message(&sid, text).await;
        self.show_turn(result, false);
    }

    async fn edit(&self, target: &str, text: &str) {
        let Some((sid, mid)) = self.find_message(target) else {
            return;
        };
        match self.manager.edit_message(&sid, &mid, text).await {
            Ok(Some(outcome)) => self.show_turn(Ok(outcome), false),
            Ok(None) => self.show_active(),
            Err(e) => self.show_error(&e),
        }
    }

    async fn regenerate(&self, target: Option<&str>) {
        let found = match target {
            Some(target) => self.find_message(target),
            None => {
                let session = self.manager.active_session();
                let found = session
                    .as_ref()
                    .and_then(|s| commands::last_user_message(s).map(|m| (s.id.clone(), m)));
                if found.is_none() {
                    println!("Nothing to regenerate yet.");
                }
                found
            }
        };
        let Some((sid, mid)) = found else {
            return;
        };
        println!("Thinking...");
        let result = self.manager.regenerate(&sid, &mid).await;
        self.show_turn(result, true);
    }

    async fn export(&self, path: Option<PathBuf>) {
        let Some(session) = self.manager.active_session() else {
            return;
        };
        let file_name = export_file_name(&session, chrono::Local::now().date_naive());
        let path = export_path(path.as_deref(), &file_name);

        match tokio::fs::write(&path, export_transcript(&session)).await {
            Ok(()) => println!("Exported to {}", path.display()),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "export failed");
                println!("Could not write {}: {e}", path.display());
            }
        }
    }

    async fn examples(&self, pick: Option<usize>) {
        let examples = match self.client.examples().await {
            Ok(list) if !list.is_empty() => list,
            Ok(_) => render::FALLBACK_EXAMPLES.iter().map(|s| s.to_string()).collect(),
            Err(e) => {
                debug!(error = %e, "examples unavailable, using built-in list");
                render::FALLBACK_EXAMPLES.iter().map(|s| s.to_string()).collect()
            }
        };

        match pick {
            None => println!("{}", render::examples_list(&examples)),
            Some(n) => match examples.get(n - 1) {
                Some(question) => {
                    println!("> {question}");
                    self.send(question).await;
                }
                None => println!("There are only {} examples.", examples.len()),
            },
        }
    }

    // =========================================================================
    // HELPERS
    // =========================================================================

    fn find_session(&self, target: &str) -> Option<SessionId> {
        commands::resolve_session(&self.manager.sessions(), target)
    }

    /// Resolve a message in the active session, printing a hint if absent.
    fn find_message(&self, target: &str) -> Option<(SessionId, MessageId)> {
        let session = self.manager.active_session()?;
        match commands::resolve_message(&session, target) {
            Some(mid) => Some((session.id, mid)),
            None => {
                println!("No message {target:?}. Use /show to see message numbers.");
                None
            }
        }
    }

    fn show_active(&self) {
        if let Some(session) = self.manager.active_session() {
            println!("{}", render::session_view(&session));
        }
    }

    fn show_turn(&self, result: Result<TurnOutcome, SessionError>, regenerating: bool) {
        match result {
            Ok(TurnOutcome::Answered { message, sources }) => {
                let position = self
                    .manager
                    .active_session()
                    .and_then(|s| s.position(&message.id))
                    .map_or(0, |i| i + 1);
                println!("{}", render::message_line(position, &message));
                if let Some(line) = render::sources_line(&sources) {
                    println!("{line}");
                }
            }
            Ok(TurnOutcome::Failed(e)) => {
                println!("{}", render::failure_banner(e.kind(), regenerating));
            }
            Ok(TurnOutcome::Stale) => println!("The chat changed before the answer arrived."),
            Err(e) => self.show_error(&e),
        }
    }

    fn report(&self, result: Result<(), SessionError>) {
        if let Err(e) = result {
            self.show_error(&e);
        }
    }

    fn show_error(&self, err: &SessionError) {
        match err {
            SessionError::Busy(_) => println!("Still waiting for the previous answer."),
            SessionError::Validation(_) => println!("Please enter a message."),
            SessionError::InvalidRole(_) => println!("Only your own messages can be regenerated."),
            SessionError::NotFound(what) => println!("Not found: {what}."),
        }
    }
}

/// Resolve the export destination: a directory gets the generated file name,
/// anything else is used as given.
fn export_path(requested: Option<&Path>, file_name: &str) -> PathBuf {
    match requested {
        Some(path) if path.is_dir() => path.join(file_name),
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(file_name),
    }
}

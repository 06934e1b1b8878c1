//! Parsing of REPL input lines.
//!
//! Plain text is a message to send; a leading `/` starts a command. Sessions
//! and messages are referred to by their 1-based position in the last
//! listing or by id.

use std::path::PathBuf;

use colloquy_common::{MessageId, SessionId};
use colloquy_session::{Session, SessionSummary};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Send(String),
    New,
    List,
    Select(String),
    Delete(Option<String>),
    Edit { target: String, text: String },
    Remove(String),
    Regenerate(Option<String>),
    Clear,
    Show,
    Export(Option<PathBuf>),
    Examples(Option<usize>),
    Status,
    Help,
    Quit,
    Empty,
    /// A known command with missing arguments; carries the usage line.
    Usage(&'static str),
    Unknown(String),
}

pub fn parse(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Empty;
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Command::Send(line.to_string());
    };

    let (name, args) = match rest.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (rest, ""),
    };
    let arg = (!args.is_empty()).then(|| args.to_string());

    match name {
        "new" => Command::New,
        "list" | "ls" => Command::List,
        "select" | "s" => match arg {
            Some(target) => Command::Select(target),
            None => Command::Usage("/select <n|id>"),
        },
        "delete" => Command::Delete(arg),
        "edit" => match args.split_once(char::is_whitespace) {
            Some((target, text)) if !text.trim().is_empty() => Command::Edit {
                target: target.to_string(),
                text: text.trim().to_string(),
            },
            _ => Command::Usage("/edit <msg> <text>"),
        },
        "rm" => match arg {
            Some(target) => Command::Remove(target),
            None => Command::Usage("/rm <msg>"),
        },
        "regen" | "retry" => Command::Regenerate(arg),
        "clear" => Command::Clear,
        "show" => Command::Show,
        "export" => Command::Export(arg.map(PathBuf::from)),
        "examples" => match arg {
            None => Command::Examples(None),
            Some(n) => match n.parse::<usize>() {
                Ok(n) if n > 0 => Command::Examples(Some(n)),
                _ => Command::Usage("/examples [n]"),
            },
        },
        "status" => Command::Status,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => Command::Unknown(other.to_string()),
    }
}

/// Resolve a session reference against the current listing.
pub fn resolve_session(rows: &[SessionSummary], target: &str) -> Option<SessionId> {
    if let Ok(n) = target.parse::<usize>() {
        if let Some(row) = n.checked_sub(1).and_then(|i| rows.get(i)) {
            return Some(row.id.clone());
        }
    }
    rows.iter()
        .find(|row| row.id.as_str() == target)
        .map(|row| row.id.clone())
}

/// Resolve a message reference within a session.
pub fn resolve_message(session: &Session, target: &str) -> Option<MessageId> {
    if let Ok(n) = target.parse::<usize>() {
        if let Some(message) = n.checked_sub(1).and_then(|i| session.messages.get(i)) {
            return Some(message.id.clone());
        }
    }
    session
        .messages
        .iter()
        .find(|m| m.id.as_str() == target)
        .map(|m| m.id.clone())
}

/// The most recent user message, the default target of `/regen`.
pub fn last_user_message(session: &Session) -> Option<MessageId> {
    session
        .messages
        .iter()
        .rev()
        .find(|m| m.is_user())
        .map(|m| m.id.clone())
}

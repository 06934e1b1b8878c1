//! Text rendering for the terminal front-end.

use chrono::{DateTime, Local, Utc};
use colloquy_answer::{ServiceStatus, Source};
use colloquy_common::{FailureKind, Role};
use colloquy_session::{Message, Session, SessionSummary};

/// Suggested questions shown when the service cannot provide its own.
pub const FALLBACK_EXAMPLES: &[&str] = &[
    "What are the main pests affecting cotton crops?",
    "How to control pink bollworm in cotton?",
    "What is the recommended dosage for whitefly control?",
    "What preventive measures can reduce pest infestation?",
    "What are the symptoms of cotton leaf curl disease?",
    "How to identify early signs of pest infestation?",
];

pub const HELP: &str = "\
Type a message to ask a question. Commands:
  /new                 start a new chat
  /list                list chats
  /select <n|id>       switch to a chat
  /delete [n|id]       delete a chat (default: current)
  /show                show the current chat
  /edit <msg> <text>   rewrite a message and drop everything after it
  /rm <msg>            delete a message and everything after it
  /regen [msg]         ask again for a user message (default: last)
  /clear               empty the current chat
  /export [path]       save the current chat as text
  /examples [n]        list example questions, or ask example n
  /status              show the answer service status
  /help                this help
  /quit                exit";

/// User-facing text for a failed turn.
pub fn failure_banner(kind: FailureKind, regenerating: bool) -> &'static str {
    match kind {
        FailureKind::ServiceUnavailable => {
            "AI service temporarily unavailable. Please try again later."
        }
        FailureKind::NetworkUnreachable => {
            "Unable to connect to the server. Please check your connection."
        }
        FailureKind::Unclassified if regenerating => {
            "Failed to regenerate response. Please try again."
        }
        FailureKind::Unclassified => {
            "Something went wrong. Please try asking a different question."
        }
    }
}

fn speaker(role: Role) -> &'static str {
    match role {
        Role::User => "You",
        Role::Assistant => "AI",
    }
}

fn local_time(at: DateTime<Utc>, format: &str) -> String {
    at.with_timezone(&Local).format(format).to_string()
}

pub fn message_line(position: usize, message: &Message) -> String {
    format!(
        "[{position}] {} ({}):\n{}",
        speaker(message.role),
        local_time(message.created_at, "%H:%M:%S"),
        message.content
    )
}

pub fn session_view(session: &Session) -> String {
    let mut out = format!("== {} ==", session.title);
    if session.is_empty() {
        out.push_str("\n(no messages yet)");
    }
    for (i, message) in session.messages.iter().enumerate() {
        out.push_str("\n\n");
        out.push_str(&message_line(i + 1, message));
    }
    out
}

pub fn session_list(rows: &[SessionSummary]) -> String {
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            format!(
                "{} {:>2}. {} ({} messages, {})",
                if row.active { "*" } else { " " },
                i + 1,
                row.title,
                row.message_count,
                local_time(row.updated_at, "%Y-%m-%d %H:%M")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn sources_line(sources: &[Source]) -> Option<String> {
    if sources.is_empty() {
        return None;
    }
    let pages: Vec<String> = sources.iter().map(|s| format!("p.{}", s.page_label())).collect();
    Some(format!("Sources: {}", pages.join(", ")))
}

pub fn examples_list<S: AsRef<str>>(examples: &[S]) -> String {
    examples
        .iter()
        .enumerate()
        .map(|(i, q)| format!("  {}. {}", i + 1, q.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn status_report(status: &ServiceStatus) -> String {
    format!(
        "Service: {} ({})\n  model loaded: {}\n  index loaded: {}\n  chunks: {}",
        status.status,
        status.message,
        yes_no(status.model_loaded),
        yes_no(status.index_loaded),
        status.chunks_count
    )
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

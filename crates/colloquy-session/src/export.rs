//! Plain-text transcript export.

use chrono::NaiveDate;

use crate::model::Session;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Render a session as plain text: the title, an `=` underline, then one
/// `ROLE [timestamp]:` block per message separated by `---`.
pub fn export_transcript(session: &Session) -> String {
    let underline = "=".repeat(session.title.chars().count());
    let blocks: Vec<String> = session
        .messages
        .iter()
        .map(|m| {
            format!(
                "{} [{}]:\n{}\n\n",
                m.role.as_str().to_uppercase(),
                m.created_at.format(TIMESTAMP_FORMAT),
                m.content
            )
        })
        .collect();

    format!("{}\n{underline}\n\n{}", session.title, blocks.join("---\n\n"))
}

/// File name for an exported transcript: the title with every character
/// other than ASCII letters and digits replaced by `_`, then the date.
pub fn export_file_name(session: &Session, date: NaiveDate) -> String {
    let stem: String = session
        .title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{stem}-{}.txt", date.format("%Y-%m-%d"))
}

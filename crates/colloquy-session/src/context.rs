use colloquy_answer::ContextEntry;

use crate::model::Message;

/// Default number of prior messages sent with each turn.
pub const DEFAULT_CONTEXT_WINDOW: usize = 5;

/// The most recent `len` messages strictly before index `cut`, reduced to
/// role and content, in their original order.
pub fn context_window(messages: &[Message], cut: usize, len: usize) -> Vec<ContextEntry> {
    let cut = cut.min(messages.len());
    let start = cut.saturating_sub(len);
    messages[start..cut]
        .iter()
        .map(|m| ContextEntry {
            role: m.role,
            content: m.content.clone(),
        })
        .collect()
}

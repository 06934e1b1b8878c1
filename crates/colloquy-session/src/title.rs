/// Suffix appended to a truncated title.
pub const ELLIPSIS: &str = "...";

/// Derive a session title from the first user message.
///
/// The text is trimmed and cut to `max_chars` Unicode scalar values; an
/// ellipsis is appended only when something was cut.
pub fn derive_title(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    match trimmed.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}

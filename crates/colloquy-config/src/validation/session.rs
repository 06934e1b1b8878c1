//! Validation for the `[session]` section.

use crate::schema::ColloquyConfig;

use super::helpers::{validate_not_blank, validate_range};

pub(crate) fn validate_session(errors: &mut Vec<String>, config: &ColloquyConfig) {
    let session = &config.session;

    if session.context_window > 50 {
        errors.push(format!(
            "session.context_window = {} is out of range [0, 50]",
            session.context_window
        ));
    }
    validate_range(
        errors,
        "session.title_max_chars",
        session.title_max_chars,
        8,
        200,
    );
    validate_not_blank(
        errors,
        "session.placeholder_title",
        &session.placeholder_title,
    );
}

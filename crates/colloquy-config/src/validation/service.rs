//! Validation for the `[service]` section.

use crate::schema::ColloquyConfig;

use super::helpers::{validate_not_blank, validate_range};

pub(crate) fn validate_service(errors: &mut Vec<String>, config: &ColloquyConfig) {
    let service = &config.service;

    validate_not_blank(errors, "service.base_url", &service.base_url);
    if !service.base_url.trim().is_empty()
        && !service.base_url.starts_with("http://")
        && !service.base_url.starts_with("https://")
    {
        errors.push(format!(
            "service.base_url = {:?} must start with http:// or https://",
            service.base_url
        ));
    }

    if !service.chat_path.starts_with('/') {
        errors.push(format!(
            "service.chat_path = {:?} must start with '/'",
            service.chat_path
        ));
    }

    validate_range(
        errors,
        "service.connect_timeout_secs",
        service.connect_timeout_secs,
        1,
        60,
    );
    validate_range(
        errors,
        "service.request_timeout_secs",
        service.request_timeout_secs,
        5,
        600,
    );
}

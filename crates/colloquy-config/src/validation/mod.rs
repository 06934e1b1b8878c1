//! Full configuration validation.
//!
//! Each section has its own submodule; this orchestrator calls them all
//! and collects errors into a single `ConfigError`.

mod helpers;
mod service;
mod session;


use crate::schema::ColloquyConfig;
use colloquy_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &ColloquyConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    service::validate_service(&mut errors, config);
    session::validate_session(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

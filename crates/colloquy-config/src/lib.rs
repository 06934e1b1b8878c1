//! Colloquy configuration system.
//!
//! Provides TOML-based configuration with validation and environment
//! overrides. All config sections use sensible defaults so partial configs
//! work out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use colloquy_config::load_config;
//!
//! let config = load_config(None).expect("failed to load config");
//! println!("{}", config.service.base_url);
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{ColloquyConfig, LogLevel, CONFIG_SCHEMA_VERSION};

use colloquy_common::ConfigError;
use std::path::Path;

/// Environment variable that overrides `service.base_url`.
pub const API_URL_ENV: &str = "COLLOQUY_API_URL";

/// Load config from `path`, or from the platform default path when `None`.
///
/// The default path gets a commented template on first run. Environment
/// overrides are applied last.
pub fn load_config(path: Option<&Path>) -> Result<ColloquyConfig, ConfigError> {
    let mut config = match path {
        Some(path) => toml_loader::load_from_path(path)?,
        None => toml_loader::load_default()?,
    };
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

/// Apply environment overrides using the given lookup.
pub fn apply_env_overrides<F>(config: &mut ColloquyConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(API_URL_ENV) {
        let url = url.trim().trim_end_matches('/');
        if !url.is_empty() {
            tracing::info!("service.base_url overridden by {API_URL_ENV}");
            config.service.base_url = url.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_override_replaces_base_url() {
        let mut config = ColloquyConfig::default();
        apply_env_overrides(&mut config, |key| {
            (key == API_URL_ENV).then(|| "https://api.example.org/".to_string())
        });
        assert_eq!(config.service.base_url, "https://api.example.org");
    }

    #[test]
    fn blank_env_override_is_ignored() {
        let mut config = ColloquyConfig::default();
        apply_env_overrides(&mut config, |_| Some("   ".to_string()));
        assert_eq!(config.service.base_url, "http://localhost:8000");
    }

    #[test]
    fn missing_env_leaves_config_untouched() {
        let mut config = ColloquyConfig::default();
        apply_env_overrides(&mut config, |_| None);
        assert_eq!(config.service.base_url, "http://localhost:8000");
    }

    #[test]
    fn load_config_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[session]\nplaceholder_title = \"Untitled\"\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.session.placeholder_title, "Untitled");
    }

    #[test]
    fn config_schema_version_is_1() {
        assert_eq!(CONFIG_SCHEMA_VERSION, 1);
    }
}

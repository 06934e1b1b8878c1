//! Wiring from configuration to the running components.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use colloquy_answer::HttpAnswerConfig;
use colloquy_common::ConfigError;
use colloquy_config::schema::{ServiceConfig, SessionConfig, StorageConfig};
use colloquy_config::ColloquyConfig;
use colloquy_session::{FileStore, ManagerOptions, MemoryStore, SessionStore};
use tracing::{info, warn};

use crate::cli::Args;

/// A config file named with `--config` must load. The default location
/// falls back to built-in defaults.
pub fn resolve_config(
    explicit: Option<&Path>,
    loaded: Result<ColloquyConfig, ConfigError>,
) -> colloquy_common::Result<ColloquyConfig> {
    match loaded {
        Ok(config) => Ok(config),
        Err(e) if explicit.is_some() => Err(e.into()),
        Err(e) => {
            warn!("Config load failed, using defaults: {e}");
            Ok(ColloquyConfig::default())
        }
    }
}

pub fn manager_options(config: &SessionConfig) -> ManagerOptions {
    ManagerOptions {
        context_window: config.context_window as usize,
        title_max_chars: config.title_max_chars as usize,
        placeholder_title: config.placeholder_title.clone(),
    }
}

pub fn answer_config(config: &ServiceConfig) -> HttpAnswerConfig {
    HttpAnswerConfig::new(config.base_url.clone())
        .with_chat_path(config.chat_path.clone())
        .with_connect_timeout(Duration::from_secs(config.connect_timeout_secs.into()))
        .with_request_timeout(Duration::from_secs(config.request_timeout_secs.into()))
}

/// Where sessions will be kept, in order of precedence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreChoice {
    Memory,
    File(PathBuf),
}

pub fn store_choice(args: &Args, storage: &StorageConfig) -> StoreChoice {
    if args.ephemeral {
        return StoreChoice::Memory;
    }
    if let Some(path) = &args.store {
        return StoreChoice::File(path.clone());
    }
    match storage.resolved_path() {
        Some(path) => StoreChoice::File(path),
        None => {
            warn!("no data directory available, sessions will not be saved");
            StoreChoice::Memory
        }
    }
}

pub fn build_store(choice: &StoreChoice) -> Arc<dyn SessionStore> {
    match choice {
        StoreChoice::Memory => {
            info!("using in-memory session store");
            Arc::new(MemoryStore::new())
        }
        StoreChoice::File(path) => {
            info!(path = %path.display(), "using session file");
            Arc::new(FileStore::new(path))
        }
    }
}

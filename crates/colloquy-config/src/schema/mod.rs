//! Configuration schema types for Colloquy.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod logging;
mod service;
mod session;
mod storage;

pub use logging::*;
pub use service::*;
pub use session::*;
pub use storage::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for Colloquy.
///
/// Only override what you want to change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct ColloquyConfig {
    pub service: ServiceConfig,
    pub session: SessionConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

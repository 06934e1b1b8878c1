//! Session persistence location.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// Snapshot file path. Empty means `<data dir>/colloquy/sessions.json`.
    pub path: String,
}

impl StorageConfig {
    /// Resolve the snapshot path, falling back to the platform data directory.
    pub fn resolved_path(&self) -> Option<PathBuf> {
        if !self.path.trim().is_empty() {
            return Some(PathBuf::from(self.path.trim()));
        }
        dirs::data_dir().map(|dir| dir.join("colloquy").join("sessions.json"))
    }
}

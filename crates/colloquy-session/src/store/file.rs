use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use colloquy_common::StoreError;
use tracing::{debug, warn};

use super::SessionStore;

/// Stores the snapshot in a single file, written atomically.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileStore {
    fn load(&self) -> Result<Option<Vec<u8>>, StoreError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    fn save(&self, bytes: &[u8]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        // Write to .tmp, then rename over the real file
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, bytes)?;

        if let Err(e) = std::fs::rename(&tmp_path, &self.path) {
            warn!("atomic rename failed ({}), falling back to direct write", e);
            std::fs::write(&self.path, bytes)?;
            let _ = std::fs::remove_file(&tmp_path);
        }

        debug!(path = %self.path.display(), bytes = bytes.len(), "sessions saved");
        Ok(())
    }
}

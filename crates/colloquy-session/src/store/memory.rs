use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use colloquy_common::StoreError;

use super::SessionStore;

/// In-process store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<Option<Vec<u8>>>,
    fail_saves: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that starts out holding `bytes`.
    pub fn with_data(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            data: Mutex::new(Some(bytes.into())),
            fail_saves: AtomicBool::new(false),
        }
    }

    /// Make every subsequent `save` fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.fail_saves.store(failing, Ordering::SeqCst);
    }

    /// Copy of the last saved blob.
    pub fn contents(&self) -> Option<Vec<u8>> {
        self.data.lock().ok().and_then(|d| d.clone())
    }
}

impl SessionStore for MemoryStore {
    fn load(&self) -> Result<Option<Vec<u8>>, StoreError> {
        let data = self
            .data
            .lock()
            .map_err(|_| StoreError::Io(io::Error::other("memory store lock poisoned")))?;
        Ok(data.clone())
    }

    fn save(&self, bytes: &[u8]) -> Result<(), StoreError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError::Io(io::Error::other("store is read-only")));
        }
        let mut data = self
            .data
            .lock()
            .map_err(|_| StoreError::Io(io::Error::other("memory store lock poisoned")))?;
        *data = Some(bytes.to_vec());
        Ok(())
    }
}

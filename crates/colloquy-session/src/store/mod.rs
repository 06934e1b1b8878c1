//! Byte-oriented persistence for the session snapshot.

mod file;
mod memory;

use colloquy_common::StoreError;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Synchronous load/save of one opaque blob.
pub trait SessionStore: Send + Sync {
    /// The last saved blob, or `None` if nothing was ever saved.
    fn load(&self) -> Result<Option<Vec<u8>>, StoreError>;

    fn save(&self, bytes: &[u8]) -> Result<(), StoreError>;
}

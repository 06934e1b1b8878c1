//! Conversation session manager for Colloquy.
//!
//! Owns the session collection and the active-session pointer, applies every
//! message-sequence mutation (append, edit, delete, regenerate, clear), drives
//! one answer-service call per turn, and persists the whole collection after
//! each change.

pub mod context;
pub mod error;
pub mod export;
pub mod manager;
pub mod model;
pub mod snapshot;
pub mod store;
pub mod title;

pub use context::context_window;
pub use error::SessionError;
pub use export::{export_file_name, export_transcript};
pub use manager::{ManagerOptions, SessionManager, TurnOutcome};
pub use model::{Message, Session, SessionCollection, SessionSummary};
pub use store::{FileStore, MemoryStore, SessionStore};
pub use title::derive_title;

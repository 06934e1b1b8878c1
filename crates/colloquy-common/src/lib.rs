pub mod errors;
pub mod events;
pub mod id;
pub mod types;

pub use errors::{ColloquyError, ConfigError, StoreError};
pub use events::{Event, EventBus};
pub use id::{new_id, MessageId, SessionId};
pub use types::{FailureKind, Role};

pub type Result<T> = std::result::Result<T, ColloquyError>;

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Failures of the byte-oriented persistence medium and the snapshot codec.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot encode error: {0}")]
    Encode(String),

    #[error("snapshot decode error: {0}")]
    Decode(String),
}

/// Failures that end the program: startup wiring and terminal I/O.
#[derive(Debug, thiserror::Error)]
pub enum ColloquyError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("terminal io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("answer service error: {0}")]
    Answer(String),
}

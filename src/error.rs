// src/error.rs
use std::path::PathBuf;

/// Crate-wide result type.
pub type Result<T, E = PhoneticError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum PhoneticError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Bincode(#[from] bincode::Error),

    #[error(transparent)]
    Persist(#[from] tempfile::PersistError),

    /// The accented-wordform dictionary could not be found. Fatal at startup.
    #[error("dictionary resource not found: {0}")]
    DictionaryMissing(PathBuf),

    /// The external tagger could not be run or produced unusable output.
    #[error("tagger failed: {0}")]
    Tagger(String),

    /// A custom phoneme group declaration was rejected.
    #[error("invalid group declaration '{declaration}': {reason}")]
    InvalidGroup { declaration: String, reason: String },

    #[error("window of {requested} words exceeds the {available} words available")]
    WindowOutOfRange { requested: usize, available: usize },

    #[error("invalid configuration value for {key}: {value}")]
    InvalidConfig { key: &'static str, value: String },
}

impl PhoneticError {
    pub fn invalid_group(declaration: &str, reason: impl Into<String>) -> Self {
        PhoneticError::InvalidGroup {
            declaration: declaration.to_string(),
            reason: reason.into(),
        }
    }
}

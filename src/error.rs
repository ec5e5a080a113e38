use thiserror::Error;

/// Errors surfaced by the tracking engine and its storage adapters.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("challenge cannot end ({end}) before it starts ({start})")]
    InvalidRange { start: String, end: String },

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TrackerError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        TrackerError::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, TrackerError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;

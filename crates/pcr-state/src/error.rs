/// Errors from world state operations.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// Keys must be non-empty.
    #[error("state key must not be empty")]
    EmptyKey,

    /// A key read by the transaction was changed by a concurrent commit.
    #[error("read conflict on key '{key}': modified by a concurrent transaction")]
    Conflict { key: String },

    /// The selector query string could not be parsed.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A lock guarding committed state was poisoned by a panicking writer.
    #[error("state lock poisoned")]
    Poisoned,

    /// I/O error while loading or saving a snapshot.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failure reported by an external backend.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Result alias for state operations.
pub type StateResult<T> = Result<T, StateError>;

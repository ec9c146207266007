//! Error types for the kv module.

use thiserror::Error;

/// Errors that can occur during key-value operations.
#[derive(Debug, Error)]
pub enum KvError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A blocking storage task failed to run to completion.
    #[error("storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The store's internal lock was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    Poisoned,
}

/// Result type for kv operations.
pub type Result<T> = std::result::Result<T, KvError>;

//! Error types for gocart-core.

use thiserror::Error;

/// Errors raised by the cart domain model and its persisted codec.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An item id was empty. Ids are the merge key and must be non-empty.
    #[error("item id must not be empty")]
    EmptyItemId,

    /// A decoded cart contained two entries with the same id.
    #[error("duplicate item id in stored cart: {0}")]
    DuplicateItem(String),

    /// A decoded entry carried a zero quantity. Entries at zero are
    /// removed, never stored, so this only appears in corrupt data.
    #[error("stored item {0} has zero quantity")]
    ZeroQuantity(String),

    /// The cart failed to encode, or stored bytes did not parse as a
    /// cart at all.
    #[error("cart serialization: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

//! Error types for the cart store.

use thiserror::Error;

use gocart_core::CoreError;
use gocart_kv::KvError;

/// Errors surfaced by [`CartStore`](crate::CartStore) operations.
///
/// Data-shape and storage errors degrade gracefully (the in-memory cart
/// stays usable); only wiring bugs panic. See the crate docs.
#[derive(Debug, Error)]
pub enum CartError {
    /// Invalid input to a cart operation.
    #[error("invalid cart input: {0}")]
    Core(#[from] CoreError),

    /// The storage engine failed.
    #[error("storage error: {0}")]
    Storage(#[from] KvError),

    /// The persisted blob did not decode into a valid cart. The store
    /// starts empty when this happens; the stale blob is overwritten by
    /// the next mutation.
    #[error("stored cart is corrupt: {0}")]
    CorruptState(#[source] CoreError),

    /// The most recent persistence write failed. The in-memory cart is
    /// still the source of truth; only the durable copy is stale.
    #[error("cart persistence write failed: {0}")]
    WriteFailed(String),
}

/// Result type for cart operations.
pub type Result<T> = std::result::Result<T, CartError>;

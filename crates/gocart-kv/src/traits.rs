//! KvStore trait: the abstract interface for blob persistence.
//!
//! This trait is the full contract the cart store requires of its
//! storage engine: an asynchronous get/set/remove over opaque bytes.
//! No atomicity, multi-key transactions, or cross-key ordering are
//! assumed. Implementations include SQLite (primary) and in-memory
//! (for tests).

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;

/// Asynchronous key-value storage over opaque byte blobs.
///
/// # Design Notes
///
/// - `get` on an unknown key returns `Ok(None)`, never an error: a fresh
///   install has no stored cart and that is a normal state.
/// - `set` is a full overwrite of the value under `key`.
/// - `remove` on an unknown key is a successful no-op.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<Bytes>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: Bytes) -> Result<()>;

    /// Delete the value under `key`, if present.
    async fn remove(&self, key: &str) -> Result<()>;
}

#[async_trait]
impl<S: KvStore + ?Sized> KvStore for std::sync::Arc<S> {
    async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: Bytes) -> Result<()> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key).await
    }
}

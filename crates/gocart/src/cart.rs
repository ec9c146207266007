//! The CartStore: lifecycle, serialized mutations, and write-behind
//! persistence.
//!
//! One store instance per running app, constructed explicitly and passed
//! by handle (cloning is cheap). The store owns the canonical in-memory
//! [`CartState`]; consumers get `Arc` snapshots, never a mutable view.
//!
//! Every mutation is a serialized read-modify-write: a `tokio` mutex
//! guarantees each operation computes from the most recently computed
//! state, and its FIFO queueing doubles as the buffer for mutations
//! issued while the startup load is still in flight. The new state is
//! published to readers before the persistence suspension, so reads see
//! it immediately while the durable copy catches up (write-behind).
//!
//! Persistence is single-flight: a background writer task serializes the
//! newest pending snapshot and issues one `set` at a time, newest-wins.
//! A stale write can therefore never complete after a newer one and
//! silently revert durable state.

use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::{watch, Mutex};

use gocart_core::{CartState, ItemId, LineItem, Product};
use gocart_kv::KvStore;

use crate::error::{CartError, Result};

/// Default storage key for the serialized cart. The store owns this key
/// exclusively; no other component may write it.
pub const DEFAULT_CART_KEY: &str = "@gocart:cart";

/// Configuration for a [`CartStore`].
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// The single, versionless key the serialized cart lives under.
    pub key: String,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            key: DEFAULT_CART_KEY.to_string(),
        }
    }
}

/// Store lifecycle. Only `Ready` applies mutations directly; anything
/// issued earlier is buffered and replayed once the load completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Uninitialized,
    Loading,
    Ready,
}

/// A buffered mutation, replayed in issue order after load.
enum Op {
    Add(Product),
    Increment(ItemId),
    Decrement(ItemId),
}

/// State behind the mutation mutex.
struct MutState {
    phase: Phase,
    cart: CartState,
    pending: Vec<Op>,
    /// Bumped on every publish; the writer and `flush` speak in revisions.
    revision: u64,
}

/// A snapshot handed to the writer task. Revision 0 is the placeholder
/// initial value and is never written.
#[derive(Clone)]
struct WriteJob {
    revision: u64,
    cart: Arc<CartState>,
}

/// What the writer reports back after each completed `set`.
#[derive(Clone)]
struct PersistMark {
    revision: u64,
    error: Option<String>,
}

struct Shared<S> {
    adapter: Arc<S>,
    config: CartConfig,
    state: Mutex<MutState>,
    published_tx: watch::Sender<Arc<CartState>>,
    write_tx: watch::Sender<WriteJob>,
    persisted_rx: watch::Receiver<PersistMark>,
}

/// The persistent cart store.
///
/// Cheaply cloneable; all clones share one cart. Must be created inside
/// a tokio runtime (construction spawns the persistence writer task).
///
/// Call [`load`](Self::load) exactly once at startup before relying on
/// the cart's contents. Mutations issued earlier are not lost: they are
/// buffered and replayed, in issue order, on top of the loaded state.
pub struct CartStore<S> {
    shared: Arc<Shared<S>>,
}

impl<S> Clone for CartStore<S> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<S: KvStore + 'static> CartStore<S> {
    /// Create a store over `adapter` with the default config.
    pub fn new(adapter: S) -> Self {
        Self::with_config(adapter, CartConfig::default())
    }

    /// Create a store over `adapter` with an explicit config.
    pub fn with_config(adapter: S, config: CartConfig) -> Self {
        let adapter = Arc::new(adapter);
        let empty = Arc::new(CartState::new());

        let (published_tx, _) = watch::channel(Arc::clone(&empty));
        let (write_tx, write_rx) = watch::channel(WriteJob {
            revision: 0,
            cart: empty,
        });
        let (persisted_tx, persisted_rx) = watch::channel(PersistMark {
            revision: 0,
            error: None,
        });

        tokio::spawn(run_writer(
            Arc::clone(&adapter),
            config.key.clone(),
            write_rx,
            persisted_tx,
        ));

        Self {
            shared: Arc::new(Shared {
                adapter,
                config,
                state: Mutex::new(MutState {
                    phase: Phase::Uninitialized,
                    cart: CartState::new(),
                    pending: Vec::new(),
                    revision: 0,
                }),
                published_tx,
                write_tx,
                persisted_rx,
            }),
        }
    }

    /// Restore the cart from storage. Called exactly once, at startup.
    ///
    /// An absent blob leaves the cart empty and is not an error (fresh
    /// install). A blob that fails to decode is a corruption condition:
    /// the cart stays empty and usable, and the error is surfaced to the
    /// caller instead of propagating into consumer code. A storage read
    /// failure degrades the same way.
    ///
    /// # Panics
    ///
    /// Panics if called a second time: loading twice would clobber live
    /// mutations and indicates mis-wired startup code.
    pub async fn load(&self) -> Result<()> {
        let mut st = self.shared.state.lock().await;
        assert_eq!(
            st.phase,
            Phase::Uninitialized,
            "CartStore::load() called twice; the store loads once at startup"
        );
        st.phase = Phase::Loading;
        tracing::debug!(key = %self.shared.config.key, "loading cart from storage");

        let outcome = match self.shared.adapter.get(&self.shared.config.key).await {
            Ok(Some(bytes)) => match CartState::from_bytes(&bytes) {
                Ok(cart) => {
                    tracing::debug!(items = cart.len(), "cart restored");
                    st.cart = cart;
                    Ok(())
                }
                Err(e) => {
                    tracing::error!(error = %e, "stored cart is corrupt; starting empty");
                    Err(CartError::CorruptState(e))
                }
            },
            Ok(None) => Ok(()),
            Err(e) => {
                tracing::error!(error = %e, "failed to read stored cart; starting empty");
                Err(CartError::Storage(e))
            }
        };

        st.phase = Phase::Ready;

        let pending = std::mem::take(&mut st.pending);
        let replayed = !pending.is_empty();
        for op in pending {
            apply(&mut st.cart, op);
        }

        // Publish the restored state so early subscribers catch up. Only
        // a replayed mutation makes the durable copy stale, so only that
        // case schedules a write.
        let snapshot = Arc::new(st.cart.clone());
        self.shared.published_tx.send_replace(Arc::clone(&snapshot));
        if replayed {
            st.revision += 1;
            self.shared.write_tx.send_replace(WriteJob {
                revision: st.revision,
                cart: snapshot,
            });
        }

        outcome
    }

    /// Add a product to the cart.
    ///
    /// Merges by id: an existing entry gains one unit and keeps its
    /// stored title/price/image; an unknown id is appended with a
    /// quantity of 1. The updated state is visible to readers before the
    /// persistence write completes.
    pub async fn add_to_cart(&self, product: Product) {
        self.mutate(Op::Add(product)).await;
    }

    /// Add one unit of an existing item. An absent id is a no-op, not an
    /// error: the item may have been removed concurrently.
    ///
    /// A no-op still schedules a persistence write, matching the store's
    /// unconditional-persist behavior; the single-flight writer coalesces
    /// the redundancy away under load.
    pub async fn increment(&self, id: &ItemId) {
        self.mutate(Op::Increment(id.clone())).await;
    }

    /// Remove one unit of an existing item. At quantity 1 the entry is
    /// removed entirely: exactly that entry, all others keep their
    /// relative order. An absent id is a no-op.
    pub async fn decrement(&self, id: &ItemId) {
        self.mutate(Op::Decrement(id.clone())).await;
    }

    /// The last published cart state. O(1): a reference to the snapshot,
    /// never a live handle into the store's own sequence.
    pub fn snapshot(&self) -> Arc<CartState> {
        Arc::clone(&self.shared.published_tx.borrow())
    }

    /// Convenience copy of the current line items, in insertion order.
    pub fn items(&self) -> Vec<LineItem> {
        self.snapshot().items().to_vec()
    }

    /// Observe cart changes. The receiver yields a new snapshot whenever
    /// a mutation completes its in-memory step.
    pub fn subscribe(&self) -> watch::Receiver<Arc<CartState>> {
        self.shared.published_tx.subscribe()
    }

    /// Wait until the writer has durably persisted the current revision,
    /// then report how that write went.
    ///
    /// Mutations are fire-and-forget; this is the observation point for
    /// persistence failures. A failed write leaves the in-memory cart
    /// authoritative and returns [`CartError::WriteFailed`].
    pub async fn flush(&self) -> Result<()> {
        let target = self.shared.state.lock().await.revision;
        let mut rx = self.shared.persisted_rx.clone();
        loop {
            {
                let mark = rx.borrow_and_update();
                if mark.revision >= target {
                    return match &mark.error {
                        None => Ok(()),
                        Some(msg) => Err(CartError::WriteFailed(msg.clone())),
                    };
                }
            }
            // The writer task lives as long as any store clone does.
            rx.changed()
                .await
                .expect("cart writer task stopped while the store is alive");
        }
    }

    async fn mutate(&self, op: Op) {
        let mut st = self.shared.state.lock().await;
        if st.phase != Phase::Ready {
            // Startup race: load() has not finished. Buffer and replay.
            st.pending.push(op);
            return;
        }

        apply(&mut st.cart, op);
        st.revision += 1;

        let snapshot = Arc::new(st.cart.clone());
        self.shared.published_tx.send_replace(Arc::clone(&snapshot));
        self.shared.write_tx.send_replace(WriteJob {
            revision: st.revision,
            cart: snapshot,
        });
    }
}

fn apply(cart: &mut CartState, op: Op) {
    match op {
        Op::Add(product) => cart.add(product),
        Op::Increment(id) => {
            cart.increment(&id);
        }
        Op::Decrement(id) => {
            cart.decrement(&id);
        }
    }
}

/// The single-flight persistence writer.
///
/// At most one `set` is in flight at a time; while it runs, newer jobs
/// overwrite each other in the watch channel and only the newest is
/// written next. The loop exits when every store clone has been dropped.
async fn run_writer<S: KvStore>(
    adapter: Arc<S>,
    key: String,
    mut jobs: watch::Receiver<WriteJob>,
    marks: watch::Sender<PersistMark>,
) {
    let mut last_written = 0u64;
    loop {
        let job = jobs.borrow_and_update().clone();
        if job.revision > last_written {
            last_written = job.revision;
            let error = match persist(adapter.as_ref(), &key, &job.cart).await {
                Ok(()) => None,
                Err(e) => {
                    tracing::warn!(
                        revision = job.revision,
                        error = %e,
                        "cart persistence write failed; in-memory state remains authoritative"
                    );
                    Some(e.to_string())
                }
            };
            let _ = marks.send(PersistMark {
                revision: job.revision,
                error,
            });
            // Re-check immediately: a newer job may have landed while
            // the write was in flight.
            continue;
        }
        if jobs.changed().await.is_err() {
            break;
        }
    }
}

async fn persist<S: KvStore>(adapter: &S, key: &str, cart: &CartState) -> Result<()> {
    let bytes = cart.to_bytes()?;
    adapter.set(key, Bytes::from(bytes)).await?;
    Ok(())
}

//! Instrumented KvStore doubles.
//!
//! For exercising the store's failure tolerance and write scheduling:
//! a backend whose writes always fail, a wrapper that counts operations,
//! and a wrapper that delays reads so load-time races are reachable in
//! tests.

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use gocart_kv::{KvError, KvStore, Result};

/// A store whose `set` and `remove` always fail with an I/O error.
/// Reads succeed against nothing (always absent).
#[derive(Default)]
pub struct FailingKv;

impl FailingKv {
    pub fn new() -> Self {
        Self
    }

    fn write_error() -> KvError {
        KvError::Io(io::Error::new(io::ErrorKind::Other, "injected write failure"))
    }
}

#[async_trait]
impl KvStore for FailingKv {
    async fn get(&self, _key: &str) -> Result<Option<Bytes>> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: Bytes) -> Result<()> {
        Err(Self::write_error())
    }

    async fn remove(&self, _key: &str) -> Result<()> {
        Err(Self::write_error())
    }
}

/// Wraps an inner store and counts every operation. Handy for asserting
/// write amplification (or the lack of it, with a coalescing writer).
pub struct RecordingKv<S> {
    inner: S,
    gets: AtomicUsize,
    sets: AtomicUsize,
    removes: AtomicUsize,
}

impl<S> RecordingKv<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            gets: AtomicUsize::new(0),
            sets: AtomicUsize::new(0),
            removes: AtomicUsize::new(0),
        }
    }

    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn sets(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }

    pub fn removes(&self) -> usize {
        self.removes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<S: KvStore> KvStore for RecordingKv<S> {
    async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: Bytes) -> Result<()> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.removes.fetch_add(1, Ordering::SeqCst);
        self.inner.remove(key).await
    }
}

/// Wraps an inner store and delays every `get`, making the window
/// between load start and load completion wide enough to race against.
pub struct SlowReadKv<S> {
    inner: S,
    delay: Duration,
}

impl<S> SlowReadKv<S> {
    pub fn new(inner: S, delay: Duration) -> Self {
        Self { inner, delay }
    }
}

#[async_trait]
impl<S: KvStore> KvStore for SlowReadKv<S> {
    async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        tokio::time::sleep(self.delay).await;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: Bytes) -> Result<()> {
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.inner.remove(key).await
    }
}

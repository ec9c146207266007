//! # gocart-kv
//!
//! Key-value storage abstraction for the gocart cart store. Provides a
//! trait-based interface for blob persistence with SQLite and in-memory
//! implementations.
//!
//! ## Overview
//!
//! The cart store treats its storage engine as an opaque asynchronous
//! get/set/remove primitive. This crate defines that contract as the
//! [`KvStore`] trait. The primary implementation is [`SqliteKv`], with
//! [`MemoryKv`] for tests.
//!
//! ## Key Types
//!
//! - [`KvStore`] - the async trait for all storage operations
//! - [`SqliteKv`] - SQLite-based persistent storage
//! - [`MemoryKv`] - in-memory storage for tests
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bytes::Bytes;
//! use gocart_kv::{KvStore, SqliteKv};
//!
//! async fn example() {
//!     let kv = SqliteKv::open("cart.db").unwrap();
//!     kv.set("greeting", Bytes::from_static(b"hello")).await.unwrap();
//!     let value = kv.get("greeting").await.unwrap();
//!     assert!(value.is_some());
//! }
//! ```

pub mod error;
pub mod memory;
pub mod sqlite;
pub mod traits;

pub use error::{KvError, Result};
pub use memory::MemoryKv;
pub use sqlite::SqliteKv;
pub use traits::KvStore;

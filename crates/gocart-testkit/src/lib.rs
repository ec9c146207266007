//! # gocart-testkit
//!
//! Testing utilities for the gocart cart store.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Generators**: proptest strategies for products, ids, and mutation
//!   sequences, tuned so generated runs actually exercise the merge and
//!   removal paths
//! - **Fixtures**: pre-seeded and pre-corrupted `MemoryKv` instances
//! - **Adapters**: instrumented `KvStore` doubles (failing, recording,
//!   slow-read) for driving the store's failure and scheduling paths
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use gocart_testkit::generators::{op_sequence, run_ops};
//!
//! proptest! {
//!     #[test]
//!     fn ids_stay_unique(ops in op_sequence(64)) {
//!         let cart = run_ops(&ops);
//!         // ...
//!     }
//! }
//! ```

pub mod adapters;
pub mod fixtures;
pub mod generators;

pub use adapters::{FailingKv, RecordingKv, SlowReadKv};
pub use fixtures::{corrupt_memory_kv, sample_item, sample_product, seeded_memory_kv};
pub use generators::{cart_op, item_id, op_sequence, product, run_ops, CartOp};

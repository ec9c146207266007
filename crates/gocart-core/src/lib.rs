//! # gocart-core
//!
//! Core domain types for the gocart cart store: item identifiers,
//! product descriptors, line items, and the [`CartState`] sequence with
//! its mutation algebra and persisted JSON codec.
//!
//! This crate is pure: no async, no I/O, no logging. Persistence and
//! scheduling live in `gocart` and `gocart-kv`.
//!
//! ## Key Types
//!
//! - [`ItemId`] - non-empty item identifier, the merge key
//! - [`Product`] - an add-to-cart descriptor (no quantity)
//! - [`LineItem`] - a product plus a unit count, always `>= 1`
//! - [`CartState`] - insertion-ordered, id-unique sequence of line items

pub mod error;
pub mod item;
pub mod state;

pub use error::{CoreError, Result};
pub use item::{ItemId, LineItem, Product};
pub use state::CartState;

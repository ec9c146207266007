//! # gocart
//!
//! A persistent client-side cart store: an in-memory, insertion-ordered
//! collection of line items, mirrored to a local key-value store on
//! every mutation and restored from it on startup.
//!
//! ## Overview
//!
//! - **Merge-on-add**: adding a product that is already in the cart
//!   bumps its quantity instead of duplicating the entry; its stored
//!   display attributes win over the incoming ones.
//! - **Quantity floor**: decrementing an entry at quantity 1 removes
//!   exactly that entry; a quantity of 0 is unrepresentable.
//! - **Write-behind**: readers observe a mutation immediately; a
//!   single-flight background writer mirrors the whole cart to storage,
//!   newest snapshot wins, so durable state can never be reverted by a
//!   stale in-flight write.
//! - **Fail-safe load**: a missing blob means a fresh install (empty
//!   cart, no error); a corrupt blob means an empty cart plus a
//!   diagnosable [`CartError::CorruptState`], never a panic into UI
//!   code.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use gocart::{CartConfig, CartStore};
//! use gocart::core::Product;
//! use gocart::kv::SqliteKv;
//!
//! async fn example() {
//!     let kv = SqliteKv::open("cart.db").unwrap();
//!     let cart = CartStore::new(kv);
//!
//!     // Restore whatever the last session left behind.
//!     cart.load().await.unwrap();
//!
//!     let shirt = Product::new("sku-1", "Shirt", "https://img/1", 10.0).unwrap();
//!     cart.add_to_cart(shirt).await;
//!
//!     for item in cart.items() {
//!         println!("{} x{}", item.title, item.quantity);
//!     }
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `gocart::core` - domain types ([`CartState`], [`LineItem`], ...)
//! - `gocart::kv` - the storage contract and its backends

pub mod cart;
pub mod error;

// Re-export component crates
pub use gocart_core as core;
pub use gocart_kv as kv;

// Re-export main types for convenience
pub use cart::{CartConfig, CartStore, DEFAULT_CART_KEY};
pub use error::{CartError, Result};

// Re-export commonly used component types
pub use gocart_core::{CartState, CoreError, ItemId, LineItem, Product};
pub use gocart_kv::{KvError, KvStore, MemoryKv, SqliteKv};

//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use bytes::Bytes;

use gocart_core::{CartState, LineItem, Product};
use gocart_kv::MemoryKv;

/// A sample product with attributes derived from its id.
pub fn sample_product(id: &str) -> Product {
    Product::new(id, format!("title-{id}"), format!("https://img/{id}"), 9.99)
        .expect("fixture ids are non-empty")
}

/// A sample line item with an explicit quantity.
pub fn sample_item(id: &str, quantity: u32) -> LineItem {
    let mut item = LineItem::first(sample_product(id));
    item.quantity = quantity;
    item
}

/// A `MemoryKv` whose `key` holds the given items, serialized exactly as
/// the store persists them.
pub fn seeded_memory_kv(key: &str, items: Vec<LineItem>) -> MemoryKv {
    let cart = CartState::from_items(items).expect("fixture items satisfy the cart invariants");
    let bytes = cart.to_bytes().expect("fixture cart serializes");
    MemoryKv::with_entries([(key.to_string(), Bytes::from(bytes))])
}

/// A `MemoryKv` whose `key` holds bytes that do not decode into a cart.
pub fn corrupt_memory_kv(key: &str) -> MemoryKv {
    MemoryKv::with_entries([(key.to_string(), Bytes::from_static(b"{ not a cart"))])
}

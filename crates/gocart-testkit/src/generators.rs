//! Proptest generators for property-based testing.
//!
//! Ops draw ids from a small alphabet so generated sequences actually
//! hit the merge, increment, and removal paths instead of touching each
//! id once.

use proptest::prelude::*;

use gocart_core::{CartState, ItemId, Product};

/// A single cart mutation, as issued by a consumer.
#[derive(Debug, Clone)]
pub enum CartOp {
    Add(Product),
    Increment(ItemId),
    Decrement(ItemId),
}

impl CartOp {
    /// Apply this op to a state, the way the store would.
    pub fn apply(&self, cart: &mut CartState) {
        match self {
            CartOp::Add(product) => cart.add(product.clone()),
            CartOp::Increment(id) => {
                cart.increment(id);
            }
            CartOp::Decrement(id) => {
                cart.decrement(id);
            }
        }
    }
}

/// Generate an id from a deliberately small alphabet.
pub fn item_id() -> impl Strategy<Value = ItemId> {
    "[a-f]".prop_map(|s| ItemId::new(s).expect("generated id is non-empty"))
}

/// Generate a product whose attributes are derived from its id, so two
/// products with the same id are distinguishable only if the store
/// wrongly overwrote stored attributes.
pub fn product() -> impl Strategy<Value = Product> {
    (item_id(), 0.01f64..1000.0).prop_map(|(id, price)| {
        Product::new(
            id.as_str(),
            format!("title-{id}"),
            format!("https://img/{id}"),
            price,
        )
        .expect("generated product id is non-empty")
    })
}

/// Generate one mutation.
pub fn cart_op() -> impl Strategy<Value = CartOp> {
    prop_oneof![
        3 => product().prop_map(CartOp::Add),
        1 => item_id().prop_map(CartOp::Increment),
        2 => item_id().prop_map(CartOp::Decrement),
    ]
}

/// Generate a sequence of mutations.
pub fn op_sequence(max_len: usize) -> impl Strategy<Value = Vec<CartOp>> {
    prop::collection::vec(cart_op(), 0..=max_len)
}

/// Fold a sequence of ops into the state they produce.
pub fn run_ops(ops: &[CartOp]) -> CartState {
    let mut cart = CartState::new();
    for op in ops {
        op.apply(&mut cart);
    }
    cart
}

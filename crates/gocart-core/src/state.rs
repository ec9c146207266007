//! The cart state: an insertion-ordered, id-unique sequence of line items.
//!
//! This module is the pure mutation algebra. It knows nothing about
//! persistence or scheduling; `gocart` layers those on top. All methods
//! preserve two invariants:
//!
//! - no two entries share an id
//! - every entry has `quantity >= 1`
//!
//! The persisted form is a JSON array of entries under a single key,
//! decoded with full shape validation so corrupt storage surfaces as an
//! error instead of an invalid state.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::item::{ItemId, LineItem, Product};

/// The full cart at a point in time.
///
/// Ordering is insertion order. It carries no meaning but is kept stable
/// so serialize/deserialize round-trips are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartState {
    items: Vec<LineItem>,
}

impl CartState {
    /// An empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a state from items, validating the invariants.
    pub fn from_items(items: Vec<LineItem>) -> Result<Self> {
        let state = Self { items };
        state.validate()?;
        Ok(state)
    }

    /// The entries, in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Look up an entry by id.
    pub fn get(&self, id: &ItemId) -> Option<&LineItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Number of distinct items (not units).
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Merge a product into the cart.
    ///
    /// If an entry with the same id exists, its quantity goes up by one
    /// and its stored title/price/image win over the incoming descriptor
    /// (first write for attributes). Otherwise the product is appended as
    /// a new entry with quantity 1.
    pub fn add(&mut self, product: Product) {
        match self.position(&product.id) {
            Some(i) => self.items[i].quantity += 1,
            None => self.items.push(LineItem::first(product)),
        }
    }

    /// Add one unit to an existing entry.
    ///
    /// Returns `false` without touching the state when the id is absent;
    /// that is a no-op, not an error, so callers racing against a removal
    /// stay well-defined.
    pub fn increment(&mut self, id: &ItemId) -> bool {
        match self.position(id) {
            Some(i) => {
                self.items[i].quantity += 1;
                true
            }
            None => false,
        }
    }

    /// Remove one unit from an existing entry.
    ///
    /// At quantity 1 the entry itself is removed, and only that one
    /// entry; every other entry keeps its position. Returns `false` on an
    /// absent id.
    pub fn decrement(&mut self, id: &ItemId) -> bool {
        match self.position(id) {
            Some(i) if self.items[i].quantity == 1 => {
                self.items.remove(i);
                true
            }
            Some(i) => {
                self.items[i].quantity -= 1;
                true
            }
            None => false,
        }
    }

    /// Serialize to the persisted JSON layout.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&self.items)?)
    }

    /// Decode a persisted blob, validating the cart invariants.
    ///
    /// Any shape violation (unparsable JSON, duplicate ids, empty ids,
    /// zero quantities) is a decode error; the caller decides how to
    /// degrade.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let items: Vec<LineItem> = serde_json::from_slice(bytes)?;
        Self::from_items(items)
    }

    fn position(&self, id: &ItemId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }

    fn validate(&self) -> Result<()> {
        for (i, item) in self.items.iter().enumerate() {
            if item.id.as_str().is_empty() {
                return Err(CoreError::EmptyItemId);
            }
            if item.quantity == 0 {
                return Err(CoreError::ZeroQuantity(item.id.to_string()));
            }
            if self.items[..i].iter().any(|other| other.id == item.id) {
                return Err(CoreError::DuplicateItem(item.id.to_string()));
            }
        }
        Ok(())
    }
}

//! Item types: identifiers, product descriptors, and cart entries.
//!
//! `ItemId` is a newtype so an id can never be confused with a title or
//! an image URL at a call site.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// A unique, opaque item identifier. Stable across sessions; the merge
/// key for [`add`](crate::CartState::add).
///
/// Always non-empty: construction through [`ItemId::new`] rejects `""`.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Create an id from a string, rejecting the empty string.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(CoreError::EmptyItemId);
        }
        Ok(Self(id))
    }

    /// View the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ItemId({})", self.0)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ItemId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for ItemId {
    type Error = CoreError;

    fn try_from(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for ItemId {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self> {
        Self::new(s)
    }
}

/// A product descriptor as handed to `add_to_cart`: everything about an
/// item except its quantity.
///
/// Title, image URL, and price are opaque to the store; they are never
/// interpreted, summed, or validated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ItemId,
    pub title: String,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    pub price: f64,
}

impl Product {
    /// Convenience constructor; fails only on an empty id.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        image_url: impl Into<String>,
        price: f64,
    ) -> Result<Self> {
        Ok(Self {
            id: ItemId::new(id)?,
            title: title.into(),
            image_url: image_url.into(),
            price,
        })
    }
}

/// One entry in the cart: a product plus how many units are held.
///
/// Invariant: `quantity >= 1`. An entry whose count would reach zero is
/// removed from the cart instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: ItemId,
    pub title: String,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    pub price: f64,
    pub quantity: u32,
}

impl LineItem {
    /// Build the first entry for a product, with a single unit.
    pub fn first(product: Product) -> Self {
        Self {
            id: product.id,
            title: product.title,
            image_url: product.image_url,
            price: product.price,
            quantity: 1,
        }
    }
}

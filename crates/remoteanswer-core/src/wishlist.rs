//! Wishlist set.

use serde::{Deserialize, Serialize};

use crate::ProductId;

/// A deduplicated set of wishlisted products.
///
/// Membership is what matters; insertion order is kept only for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<ProductId>", into = "Vec<ProductId>")]
pub struct Wishlist {
    items: Vec<ProductId>,
}

impl Wishlist {
    /// Create an empty wishlist.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the product is wishlisted.
    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.items.contains(product_id)
    }

    /// Add the product if absent, remove it if present.
    ///
    /// Returns `true` if the product is wishlisted afterwards.
    pub fn toggle(&mut self, product_id: &ProductId) -> bool {
        if self.remove(product_id) {
            false
        } else {
            self.items.push(product_id.clone());
            true
        }
    }

    /// Remove the product. Returns `true` if it was present.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|id| id != product_id);
        self.items.len() != before
    }

    /// Number of wishlisted products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the wishlist is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Wishlisted products in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ProductId> {
        self.items.iter()
    }
}

impl From<Vec<ProductId>> for Wishlist {
    fn from(ids: Vec<ProductId>) -> Self {
        let mut items: Vec<ProductId> = Vec::with_capacity(ids.len());
        for id in ids {
            if !items.contains(&id) {
                items.push(id);
            }
        }
        Self { items }
    }
}

impl From<Wishlist> for Vec<ProductId> {
    fn from(wishlist: Wishlist) -> Self {
        wishlist.items
    }
}

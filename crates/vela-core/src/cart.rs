//! # Cart Line Algebra
//!
//! The one mutation/derivation implementation behind every cart in the
//! system. The storefront Cart Store and the POS terminal each embed a
//! [`CartLines`] - same merge rules, same derived totals, different policy
//! layered on top (remote sync for the storefront, stock ceilings for POS).
//!
//! ## Mutation Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add(product, qty)        qty < 1        → no-op                        │
//! │                           id in cart     → quantities summed            │
//! │                           id not in cart → appended (insertion order    │
//! │                                            is display order)            │
//! │                                                                         │
//! │  remove(id)               id absent      → no-op (idempotent)           │
//! │                                                                         │
//! │  set_quantity(id, qty)    qty < 1        → no-op (silently rejected)    │
//! │                           id absent      → no-op                        │
//! │                           otherwise      → exactly that quantity        │
//! │                                                                         │
//! │  INVARIANT: no stored line ever has quantity < 1.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::pricing;
use crate::types::{LineItem, Product};

/// An ordered collection of cart line items, unique by product id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CartLines {
    items: Vec<LineItem>,
}

impl CartLines {
    /// Creates an empty line collection.
    pub fn new() -> Self {
        CartLines { items: Vec::new() }
    }

    /// Rebuilds the collection from a deserialized or remotely fetched list.
    ///
    /// Lines with quantity < 1 are dropped so the no-zero-quantity invariant
    /// holds even against a malformed payload.
    pub fn from_items(items: Vec<LineItem>) -> Self {
        CartLines {
            items: items.into_iter().filter(|i| i.quantity >= 1).collect(),
        }
    }

    /// Replaces the entire list (authoritative remote read wins).
    pub fn replace(&mut self, items: Vec<LineItem>) {
        *self = CartLines::from_items(items);
    }

    /// Adds a product, merging into an existing line for the same id.
    ///
    /// Returns `false` (no-op) when `quantity < 1`.
    pub fn add(&mut self, product: &Product, quantity: i64) -> bool {
        if quantity < 1 {
            return false;
        }

        if let Some(line) = self.items.iter_mut().find(|i| i.product_id == product.id) {
            line.quantity += quantity;
        } else {
            self.items.push(LineItem::from_product(product, quantity));
        }
        true
    }

    /// Removes a line by product id. Removing an absent id is a no-op.
    ///
    /// Returns whether a line was actually removed.
    pub fn remove(&mut self, product_id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.product_id != product_id);
        self.items.len() < before
    }

    /// Sets a line to exactly the given quantity.
    ///
    /// Quantities below 1 are silently rejected - a caller that wants the
    /// line gone calls [`remove`](Self::remove). Returns whether a line
    /// changed.
    pub fn set_quantity(&mut self, product_id: &str, quantity: i64) -> bool {
        if quantity < 1 {
            return false;
        }

        if let Some(line) = self.items.iter_mut().find(|i| i.product_id == product_id) {
            line.quantity = quantity;
            true
        } else {
            false
        }
    }

    /// Empties the collection.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// The lines in insertion (display) order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Finds a line by product id.
    pub fn get(&self, product_id: &str) -> Option<&LineItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }

    /// Current quantity for a product (0 when absent).
    pub fn quantity_of(&self, product_id: &str) -> i64 {
        self.get(product_id).map(|i| i.quantity).unwrap_or(0)
    }

    /// Total quantity across all lines.
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Number of distinct products.
    pub fn unique_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of line totals. Computed on read, never cached.
    pub fn subtotal(&self) -> Money {
        pricing::subtotal(&self.items)
    }

    /// Checks if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

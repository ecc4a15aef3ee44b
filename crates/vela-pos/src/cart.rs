//! # POS Cart
//!
//! The terminal's cart: always local, never persisted, never shared.
//!
//! ## Differences From the Storefront Cart
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Storefront          POS                                │
//! │                  ──────────          ───                                │
//! │  Persistence     mirror + remote     none (dies with the session)       │
//! │  Stock limit     none                per-product ceiling on add/set     │
//! │  Discount        promo code          manual operator entry              │
//! │  Tax             computed at order   computed here, after discount      │
//! │                                                                         │
//! │  Same line algebra, same pricing functions - only the policy differs.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ownership
//! One instance per terminal session, cleared on every new sale and on
//! logout. Fully isolated from any storefront cart.

use serde::{Deserialize, Serialize};
use tracing::debug;

use vela_core::types::TaxRate;
use vela_core::validation::validate_quantity;
use vela_core::{pricing, CartLines, DiscountValue, LineItem, Money, Product};

use crate::error::{PosError, PosResult};

/// The in-store cart for one terminal session.
#[derive(Debug, Default)]
pub struct PosCart {
    lines: CartLines,
    discount: Option<DiscountValue>,
    tax_rate: TaxRate,
}

impl PosCart {
    /// Creates an empty POS cart taxed at the given rate.
    pub fn new(tax_rate: TaxRate) -> Self {
        PosCart {
            lines: CartLines::new(),
            discount: None,
            tax_rate,
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Rings up a product.
    ///
    /// ## Behavior
    /// - Merges into an existing line for the same product
    /// - Rejects the add when the requested total quantity would exceed the
    ///   product's known stock - no silent clamping, no state change
    pub fn add_item(&mut self, product: &Product, quantity: i64) -> PosResult<()> {
        debug!(product_id = %product.id, quantity, "pos add_item");
        validate_quantity(quantity)?;

        let requested = self.lines.quantity_of(&product.id) + quantity;
        if requested > product.stock_quantity {
            return Err(PosError::InsufficientStock {
                sku: product.sku.clone(),
                available: product.stock_quantity,
                requested,
            });
        }

        self.lines.add(product, quantity);
        Ok(())
    }

    /// Sets a line to an exact quantity, against the same stock ceiling
    /// as [`add_item`](Self::add_item).
    ///
    /// Quantities below 1 are silently rejected; an absent id is a no-op.
    pub fn set_quantity(&mut self, product_id: &str, quantity: i64) -> PosResult<()> {
        debug!(%product_id, quantity, "pos set_quantity");

        if quantity < 1 {
            return Ok(());
        }

        if let Some(line) = self.lines.get(product_id) {
            if quantity > line.stock_quantity {
                return Err(PosError::InsufficientStock {
                    sku: line.sku.clone(),
                    available: line.stock_quantity,
                    requested: quantity,
                });
            }
            self.lines.set_quantity(product_id, quantity);
        }

        Ok(())
    }

    /// Removes a line. Removing an absent id is a no-op.
    pub fn remove_item(&mut self, product_id: &str) {
        debug!(%product_id, "pos remove_item");
        self.lines.remove(product_id);
    }

    /// Empties items and discount together (new sale, void, logout).
    pub fn clear(&mut self) {
        debug!("pos clear");
        self.lines.clear();
        self.discount = None;
    }

    /// Sets the manual operator discount (percentage or fixed).
    ///
    /// Distinct from promo codes; no external validation is involved. The
    /// applied amount follows the same `[0, subtotal]` clamp as everywhere
    /// else.
    pub fn set_discount(&mut self, value: DiscountValue) {
        debug!(?value, "pos set_discount");
        self.discount = Some(value);
    }

    /// Clears the manual discount.
    pub fn clear_discount(&mut self) {
        self.discount = None;
    }

    // =========================================================================
    // Derived Values (computed on read - never cached)
    // =========================================================================

    /// The lines in ring-up order.
    pub fn items(&self) -> &[LineItem] {
        self.lines.items()
    }

    /// Total quantity across all lines.
    pub fn item_count(&self) -> i64 {
        self.lines.item_count()
    }

    /// Number of distinct products.
    pub fn unique_count(&self) -> usize {
        self.lines.unique_count()
    }

    /// Checks if nothing has been rung up.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The manual discount, if one is set.
    pub fn discount(&self) -> Option<&DiscountValue> {
        self.discount.as_ref()
    }

    /// The terminal's tax rate.
    pub fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    /// Sum of line totals.
    pub fn subtotal(&self) -> Money {
        self.lines.subtotal()
    }

    /// Manual discount against the current subtotal, clamped to
    /// `[0, subtotal]`.
    pub fn discount_amount(&self) -> Money {
        match &self.discount {
            Some(value) => pricing::discount_amount(self.subtotal(), value),
            None => Money::zero(),
        }
    }

    /// Tax on the discounted subtotal: `(subtotal − discount) × rate`.
    pub fn tax(&self) -> Money {
        pricing::tax_amount(self.subtotal() - self.discount_amount(), self.tax_rate)
    }

    /// Payable total: `max(0, subtotal − discount + tax)`.
    pub fn total(&self) -> Money {
        pricing::total(self.subtotal(), self.discount_amount(), &[self.tax()])
    }

    /// Totals summary for the terminal UI.
    pub fn totals(&self) -> PosTotals {
        PosTotals::from(self)
    }
}

/// POS totals summary for UI responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PosTotals {
    pub item_count: i64,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
}

impl From<&PosCart> for PosTotals {
    fn from(cart: &PosCart) -> Self {
        PosTotals {
            item_count: cart.item_count(),
            subtotal_cents: cart.subtotal().cents(),
            discount_cents: cart.discount_amount().cents(),
            tax_cents: cart.tax().cents(),
            total_cents: cart.total().cents(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(id: &str, price: i64, stock: i64) -> Product {
        Product {
            id: id.to_string(),
            sku: format!("SKU-{}", id),
            name: format!("Product {}", id),
            price_cents: price,
            sale_price_cents: None,
            is_on_sale: false,
            stock_quantity: stock,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_add_within_stock() {
        let mut cart = PosCart::new(TaxRate::zero());
        cart.add_item(&product("1", 999, 5), 3).unwrap();
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_second_add_exceeding_stock_is_rejected() {
        // Stock of 1: the first add succeeds, the second is refused and
        // the cart keeps quantity 1
        let mut cart = PosCart::new(TaxRate::zero());
        let p = product("1", 999, 1);

        cart.add_item(&p, 1).unwrap();
        let err = cart.add_item(&p, 1).unwrap_err();

        assert!(matches!(
            err,
            PosError::InsufficientStock {
                available: 1,
                requested: 2,
                ..
            }
        ));
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_set_quantity_respects_stock_ceiling() {
        let mut cart = PosCart::new(TaxRate::zero());
        cart.add_item(&product("1", 999, 4), 1).unwrap();

        assert!(cart.set_quantity("1", 4).is_ok());
        assert!(cart.set_quantity("1", 5).is_err());
        assert_eq!(cart.item_count(), 4);
    }

    #[test]
    fn test_manual_discount_clamped() {
        let mut cart = PosCart::new(TaxRate::zero());
        cart.add_item(&product("1", 1000, 10), 2).unwrap();

        cart.set_discount(DiscountValue::Fixed(Money::from_cents(9999)));
        assert_eq!(cart.discount_amount().cents(), 2000);
        assert_eq!(cart.total().cents(), 0);
    }

    #[test]
    fn test_tax_applies_after_discount() {
        // Subtotal 10000, 10% discount → taxable 9000, 8.25% tax = 742.5 → 743
        let mut cart = PosCart::new(TaxRate::from_bps(825));
        cart.add_item(&product("1", 5000, 10), 2).unwrap();
        cart.set_discount(DiscountValue::Percentage(1000));

        assert_eq!(cart.discount_amount().cents(), 1000);
        assert_eq!(cart.tax().cents(), 743);
        assert_eq!(cart.total().cents(), 9743);
    }

    #[test]
    fn test_clear_drops_items_and_discount() {
        let mut cart = PosCart::new(TaxRate::zero());
        cart.add_item(&product("1", 1000, 10), 1).unwrap();
        cart.set_discount(DiscountValue::Percentage(500));

        cart.clear();

        assert!(cart.is_empty());
        assert!(cart.discount().is_none());
        assert_eq!(cart.total().cents(), 0);
    }

    #[test]
    fn test_totals_summary() {
        let mut cart = PosCart::new(TaxRate::from_bps(1000));
        cart.add_item(&product("1", 1000, 10), 1).unwrap();

        let totals = cart.totals();
        assert_eq!(totals.subtotal_cents, 1000);
        assert_eq!(totals.tax_cents, 100);
        assert_eq!(totals.total_cents, 1100);
    }
}

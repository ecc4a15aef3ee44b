//! # Pricing Utilities
//!
//! Pure pricing arithmetic, shared verbatim by both sales channels.
//!
//! ## One Arithmetic, Two Channels
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Pricing Flow                                        │
//! │                                                                         │
//! │  unit_price ──► line_total ──► subtotal ──► discount_amount            │
//! │                                    │             │                      │
//! │                                    ▼             ▼                      │
//! │                              tax_amount(subtotal − discount)            │
//! │                                    │                                    │
//! │                                    ▼                                    │
//! │  total = max(0, subtotal − discount + tax + shipping + …)              │
//! │                                                                         │
//! │  The storefront checkout and the POS terminal both call exactly these  │
//! │  functions - there is no second copy of this arithmetic anywhere.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rounding
//! All values are integer cents; accumulation is exact. Rounding happens
//! only inside [`Money::rate_portion`] when a basis-point rate is applied.

use crate::money::Money;
use crate::types::{DiscountValue, LineItem, Product, TaxRate};

/// Resolves the effective unit price from snapshot fields.
///
/// Sale price wins iff the sale flag is set AND a sale price exists.
/// This is the single copy of the sale-resolution rule; `Product` and
/// `LineItem` both delegate here.
pub(crate) fn resolve_unit_price(
    price_cents: i64,
    sale_price_cents: Option<i64>,
    is_on_sale: bool,
) -> Money {
    match sale_price_cents {
        Some(sale) if is_on_sale => Money::from_cents(sale),
        _ => Money::from_cents(price_cents),
    }
}

/// The price a buyer pays for one unit of a product right now.
#[inline]
pub fn unit_price(product: &Product) -> Money {
    product.unit_price()
}

/// Line total for a cart item (frozen unit price × quantity).
#[inline]
pub fn line_total(item: &LineItem) -> Money {
    item.line_total()
}

/// Sum of line totals over a set of items.
///
/// A commutative integer sum - reordering the same multiset of items can
/// never change the result.
pub fn subtotal(items: &[LineItem]) -> Money {
    items
        .iter()
        .fold(Money::zero(), |acc, item| acc + item.line_total())
}

/// The amount a discount takes off a subtotal.
///
/// ## Behavior
/// - Percentage: `subtotal × bps / 10000`, rounded half-up
/// - Fixed: the configured amount
/// - Either way the result is clamped to `[0, subtotal]` - never negative,
///   never more than the amount it reduces
pub fn discount_amount(subtotal: Money, value: &DiscountValue) -> Money {
    let raw = match value {
        DiscountValue::Percentage(bps) => subtotal.rate_portion(*bps),
        DiscountValue::Fixed(amount) => *amount,
    };
    raw.clamp(Money::zero(), subtotal.floor_at_zero())
}

/// Tax on the discounted subtotal.
///
/// Tax applies *after* the discount: `(subtotal − discount) × rate`.
pub fn tax_amount(taxable: Money, rate: TaxRate) -> Money {
    taxable.floor_at_zero().rate_portion(rate.bps())
}

/// Final payable total.
///
/// `max(0, subtotal − discount + Σextras)` where extras are tax and
/// shipping. Each extra is expected non-negative; the floor guards the
/// subtraction side.
pub fn total(subtotal: Money, discount: Money, extras: &[Money]) -> Money {
    let extras_sum = extras.iter().fold(Money::zero(), |acc, e| acc + *e);
    (subtotal - discount + extras_sum).floor_at_zero()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(id: &str, price: i64) -> Product {
        Product {
            id: id.to_string(),
            sku: format!("SKU-{}", id),
            name: format!("Product {}", id),
            price_cents: price,
            sale_price_cents: None,
            is_on_sale: false,
            stock_quantity: 100,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn line(id: &str, price: i64, qty: i64) -> LineItem {
        LineItem::from_product(&product(id, price), qty)
    }

    #[test]
    fn test_subtotal_sums_line_totals() {
        let items = vec![line("1", 1000, 2), line("2", 250, 3)];
        assert_eq!(subtotal(&items).cents(), 2750);
    }

    #[test]
    fn test_subtotal_commutative() {
        let forward = vec![line("1", 999, 1), line("2", 500, 4), line("3", 125, 2)];
        let mut reversed = forward.clone();
        reversed.reverse();
        assert_eq!(subtotal(&forward), subtotal(&reversed));
    }

    #[test]
    fn test_percentage_discount() {
        let amount = discount_amount(
            Money::from_cents(10000),
            &DiscountValue::Percentage(1000), // 10%
        );
        assert_eq!(amount.cents(), 1000);
    }

    #[test]
    fn test_fixed_discount_clamped_to_subtotal() {
        // Subtotal 2000, fixed discount 3000 → clamps to 2000, total 0
        let sub = Money::from_cents(2000);
        let amount = discount_amount(sub, &DiscountValue::Fixed(Money::from_cents(3000)));
        assert_eq!(amount.cents(), 2000);
        assert_eq!(total(sub, amount, &[]).cents(), 0);
    }

    #[test]
    fn test_discount_never_negative() {
        // A zero-value discount takes nothing off
        let sub = Money::from_cents(5000);
        assert_eq!(
            discount_amount(sub, &DiscountValue::Percentage(0)).cents(),
            0
        );
        assert_eq!(
            discount_amount(sub, &DiscountValue::Fixed(Money::zero())).cents(),
            0
        );
        // Even a 100%+ percentage clamps at the subtotal
        assert_eq!(
            discount_amount(sub, &DiscountValue::Percentage(25000)).cents(),
            5000
        );
    }

    #[test]
    fn test_discount_on_empty_subtotal() {
        assert_eq!(
            discount_amount(Money::zero(), &DiscountValue::Fixed(Money::from_cents(500))).cents(),
            0
        );
    }

    #[test]
    fn test_tax_after_discount() {
        // (10000 − 1000) × 8.25% = 742.5 → 743
        let taxable = Money::from_cents(10000) - Money::from_cents(1000);
        assert_eq!(tax_amount(taxable, TaxRate::from_bps(825)).cents(), 743);
    }

    #[test]
    fn test_total_with_extras() {
        let t = total(
            Money::from_cents(2000),
            Money::from_cents(500),
            &[Money::from_cents(124), Money::from_cents(599)],
        );
        assert_eq!(t.cents(), 2223);
    }

    #[test]
    fn test_total_floors_at_zero() {
        let t = total(Money::from_cents(2000), Money::from_cents(2000), &[]);
        assert_eq!(t.cents(), 0);
    }
}

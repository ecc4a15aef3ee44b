//! # Returns Flow
//!
//! Post-sale refunds against a historical order.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Return Flow                                        │
//! │                                                                         │
//! │  operator enters order id                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  begin_return ──► lookup_order ──► ReturnDraft (original lines shown)   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  select(product, qty) ... each bounded by the originally sold quantity  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  confirm_return ──► ReturnRecord (refund at the order's FROZEN unit     │
//! │                     prices) ──► record_return (stock reconciles upward  │
//! │                     by the returned quantities, collaborator-side)      │
//! │                                                                         │
//! │  The original order's totals are NEVER mutated.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use vela_core::validation::validate_quantity;
use vela_core::{Money, Order, ReturnLine, ReturnRecord};

use crate::error::{PosError, PosResult};

/// An in-progress return: the historical order plus the operator's
/// selection of lines to refund.
#[derive(Debug, Clone)]
pub struct ReturnDraft {
    order: Order,
    /// (product_id, quantity) pairs; one entry per selected product.
    selections: Vec<(String, i64)>,
}

impl ReturnDraft {
    /// Starts a draft against a loaded order.
    pub fn new(order: Order) -> Self {
        ReturnDraft {
            order,
            selections: Vec::new(),
        }
    }

    /// The order being returned against.
    pub fn order(&self) -> &Order {
        &self.order
    }

    /// Selects a quantity of one original line for refund.
    ///
    /// ## Behavior
    /// - The product must be on the order
    /// - The quantity is bounded by the originally sold quantity
    /// - Re-selecting a product replaces its previous selection
    pub fn select(&mut self, product_id: &str, quantity: i64) -> PosResult<()> {
        debug!(%product_id, quantity, "return select");
        validate_quantity(quantity)?;

        let sold = match self.order.item(product_id) {
            Some(item) => item.quantity,
            None => {
                return Err(PosError::NotOnOrder {
                    product_id: product_id.to_string(),
                    order_id: self.order.id.clone(),
                })
            }
        };

        if quantity > sold {
            return Err(PosError::ExceedsSoldQuantity {
                product_id: product_id.to_string(),
                requested: quantity,
                sold,
            });
        }

        self.selections.retain(|(id, _)| id != product_id);
        self.selections.push((product_id.to_string(), quantity));
        Ok(())
    }

    /// Drops a product from the selection.
    pub fn deselect(&mut self, product_id: &str) {
        self.selections.retain(|(id, _)| id != product_id);
    }

    /// The current selection.
    pub fn selections(&self) -> &[(String, i64)] {
        &self.selections
    }

    /// Checks if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    /// Refund owed for the current selection, at the order's frozen
    /// unit prices.
    pub fn refund_total(&self) -> Money {
        self.selections
            .iter()
            .filter_map(|(id, qty)| {
                self.order
                    .item(id)
                    .map(|item| item.unit_price() * *qty)
            })
            .fold(Money::zero(), |acc, m| acc + m)
    }

    /// Builds the immutable return record for the current selection.
    ///
    /// The record's line quantities are what the stock reconciliation
    /// restocks; its refund is priced entirely from the original order.
    pub fn build_record(&self) -> ReturnRecord {
        let lines: Vec<ReturnLine> = self
            .selections
            .iter()
            .filter_map(|(id, qty)| {
                self.order.item(id).map(|item| ReturnLine {
                    product_id: item.product_id.clone(),
                    name: item.name.clone(),
                    unit_price_cents: item.unit_price_cents,
                    quantity: *qty,
                })
            })
            .collect();

        ReturnRecord {
            id: Uuid::new_v4().to_string(),
            order_id: self.order.id.clone(),
            refund_cents: self.refund_total().cents(),
            lines,
            created_at: Utc::now(),
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
    use vela_core::{OrderItem, PaymentMethod, SaleChannel};

    fn historical_order() -> Order {
        Order {
            id: "ord-1001".to_string(),
            channel: SaleChannel::Pos,
            items: vec![
                OrderItem {
                    product_id: "a".to_string(),
                    sku: "SKU-a".to_string(),
                    name: "Widget".to_string(),
                    unit_price_cents: 750,
                    quantity: 2,
                    line_total_cents: 1500,
                },
                OrderItem {
                    product_id: "b".to_string(),
                    sku: "SKU-b".to_string(),
                    name: "Gadget".to_string(),
                    unit_price_cents: 1200,
                    quantity: 1,
                    line_total_cents: 1200,
                },
            ],
            subtotal_cents: 2700,
            discount_cents: 0,
            tax_cents: 0,
            shipping_cents: 0,
            total_cents: 2700,
            payment: PaymentMethod::Cash,
            tendered_cents: Some(3000),
            change_cents: Some(300),
            cashier: Some("amari".to_string()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_select_within_sold_quantity() {
        let mut draft = ReturnDraft::new(historical_order());
        draft.select("a", 2).unwrap();
        assert_eq!(draft.refund_total().cents(), 1500);
    }

    #[test]
    fn test_select_exceeding_sold_quantity_is_rejected() {
        let mut draft = ReturnDraft::new(historical_order());
        let err = draft.select("a", 3).unwrap_err();
        assert!(matches!(
            err,
            PosError::ExceedsSoldQuantity {
                requested: 3,
                sold: 2,
                ..
            }
        ));
        assert!(draft.is_empty());
    }

    #[test]
    fn test_select_product_not_on_order() {
        let mut draft = ReturnDraft::new(historical_order());
        assert!(matches!(
            draft.select("zzz", 1),
            Err(PosError::NotOnOrder { .. })
        ));
    }

    #[test]
    fn test_reselect_replaces_previous_selection() {
        let mut draft = ReturnDraft::new(historical_order());
        draft.select("a", 2).unwrap();
        draft.select("a", 1).unwrap();
        assert_eq!(draft.selections().len(), 1);
        assert_eq!(draft.refund_total().cents(), 750);
    }

    #[test]
    fn test_build_record_prices_from_original_order() {
        let mut draft = ReturnDraft::new(historical_order());
        draft.select("a", 1).unwrap();
        draft.select("b", 1).unwrap();

        let record = draft.build_record();

        assert_eq!(record.order_id, "ord-1001");
        assert_eq!(record.refund_cents, 1950);
        assert_eq!(record.lines.len(), 2);
        // Quantities on the record drive the upward stock reconciliation
        assert!(record.lines.iter().all(|l| l.quantity == 1));
        // The original order is untouched
        assert_eq!(draft.order().total_cents, 2700);
    }
}

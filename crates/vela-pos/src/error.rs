//! # POS Error Types
//!
//! Error types for the point-of-sale transaction engine.
//!
//! ## Design Principles
//! 1. Every variant is caught at the terminal boundary and rendered to the
//!    operator; an in-progress sale is never abandoned by an error
//! 2. Include context in messages (sku, amounts, quantities)
//! 3. Nothing here triggers an automatic retry - the operator re-initiates

use thiserror::Error;

use vela_core::{Money, ValidationError};

/// Result type alias for POS operations.
pub type PosResult<T> = Result<T, PosError>;

/// POS transaction errors.
#[derive(Debug, Error)]
pub enum PosError {
    /// Adding (or raising) a line would exceed the product's known stock.
    /// The cart is unchanged.
    #[error("Insufficient stock for {sku}: available {available}, requested {requested}")]
    InsufficientStock {
        sku: String,
        available: i64,
        requested: i64,
    },

    /// Tendered cash does not cover the total. The sale stays open.
    #[error("Insufficient tender: total {total}, tendered {tendered}")]
    InsufficientTender { total: Money, tendered: Money },

    /// The card/e-wallet authorization ended in a non-approved state.
    /// The sale stays open; the operator may retry with the same or a
    /// different method.
    #[error("Payment {outcome}; sale not completed")]
    PaymentDeclined { outcome: String },

    /// The payment terminal never answered. Distinct from a decline so the
    /// operator knows the card was not necessarily refused.
    #[error("Payment terminal unavailable: {0}")]
    TerminalUnavailable(String),

    /// The sale was not recorded. The cart remains intact for a
    /// resubmission.
    #[error("Order creation failed: {0}")]
    OrderCreation(String),

    /// Completion was attempted with no items rung up.
    #[error("Sale has no items")]
    EmptySale,

    /// No order exists under the id entered for a return.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// The order lookup call failed before an answer.
    #[error("Order lookup failed: {0}")]
    OrderLookup(String),

    /// The selected product is not on the order being returned.
    #[error("Product {product_id} is not on order {order_id}")]
    NotOnOrder {
        product_id: String,
        order_id: String,
    },

    /// A return selection exceeds the originally sold quantity.
    #[error("Return quantity {requested} exceeds sold quantity {sold} for {product_id}")]
    ExceedsSoldQuantity {
        product_id: String,
        requested: i64,
        sold: i64,
    },

    /// A return was confirmed with nothing selected.
    #[error("Nothing selected for return")]
    EmptyReturn,

    /// The confirmed return could not be recorded. Stock is reconciled
    /// only when recording succeeds.
    #[error("Return could not be recorded: {0}")]
    ReturnNotRecorded(String),

    /// Input validation failed before any state change.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = PosError::InsufficientStock {
            sku: "COLA-330".to_string(),
            available: 1,
            requested: 2,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for COLA-330: available 1, requested 2"
        );

        let err = PosError::InsufficientTender {
            total: Money::from_cents(450),
            tendered: Money::from_cents(400),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient tender: total $4.50, tendered $4.00"
        );
    }
}

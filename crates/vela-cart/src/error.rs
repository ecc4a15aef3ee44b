//! # Cart Error Types
//!
//! Error types for storefront cart operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in vela-cart                              │
//! │                                                                         │
//! │  Remote mutation fails                                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Mutation still applied locally ── SyncFailure flag on the store ──►   │
//! │  (returns Ok - the user's intent        UI renders a non-blocking      │
//! │   is honored either way)                warning banner                  │
//! │                                                                         │
//! │  Discount code rejected ──► DiscountError::InvalidCode ──► inline msg  │
//! │  Order creation fails   ──► CartError::OrderCreation   ──► retry CTA   │
//! │                                                                         │
//! │  Nothing here is retried automatically - every retry is a fresh,       │
//! │  explicit user action.                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use vela_core::ValidationError;

use crate::discount::DiscountError;

/// Result type alias for cart operations.
pub type CartResult<T> = Result<T, CartError>;

/// Storefront cart error type.
///
/// Every variant is caught at the component boundary and rendered by the
/// UI; none may abandon the buyer's in-progress cart.
#[derive(Debug, Error)]
pub enum CartError {
    /// A remote cart call failed while no local fallback applies
    /// (currently only the one-time read at login). Recoverable - the
    /// caller may re-issue the operation.
    #[error("Remote cart {operation} failed: {message}")]
    Sync {
        operation: &'static str,
        message: String,
    },

    /// The discount validation collaborator rejected the code (or was
    /// unreachable). The cart's current discount is left untouched.
    #[error(transparent)]
    Discount(#[from] DiscountError),

    /// Order creation failed. The cart remains intact so the buyer can
    /// resubmit.
    #[error("Order creation failed: {0}")]
    OrderCreation(String),

    /// Checkout was attempted on an empty cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Input validation failed before any state change or outbound call.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CartError {
    /// Returns true when the operation may simply be re-issued by the user.
    ///
    /// Recoverable errors render as a non-blocking warning; the rest as an
    /// inline form error.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CartError::Sync { .. } | CartError::OrderCreation(_)
        )
    }
}

// =============================================================================
// Mirror Error
// =============================================================================

/// Durable local mirror failures.
///
/// The store never propagates these: a lost mirror write is tolerated and
/// self-heals on the next mutation, a corrupt mirror payload cold-starts an
/// empty cart. Both are logged.
#[derive(Debug, Error)]
pub enum MirrorError {
    /// Reading from the underlying key-value store failed.
    #[error("Mirror read failed: {0}")]
    Read(String),

    /// Writing to the underlying key-value store failed.
    #[error("Mirror write failed: {0}")]
    Write(String),

    /// The stored payload did not deserialize to a line list.
    #[error("Mirror payload corrupt: {0}")]
    Corrupt(String),
}

// =============================================================================
// Unit Tests
// =============================================================================

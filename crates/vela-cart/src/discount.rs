//! # Discount Resolver
//!
//! Resolves a promo code against a subtotal via the external validation
//! collaborator.
//!
//! ## Contract
//! `validate(code, subtotal)` either returns a resolved
//! [`DiscountDescriptor`] or fails. No retry logic lives here, and a failed
//! resolution never partially applies anything - the store only touches its
//! discount field on success.

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use vela_core::{DiscountDescriptor, Money};

/// Why the validation collaborator refused a code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// No such code exists.
    NotFound,
    /// The code exists but its window has closed.
    Expired,
    /// The cart subtotal is below the code's minimum.
    MinimumSubtotal {
        /// The subtotal the code requires.
        required: Money,
    },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::NotFound => write!(f, "code not found"),
            RejectReason::Expired => write!(f, "code has expired"),
            RejectReason::MinimumSubtotal { required } => {
                write!(f, "subtotal below the required minimum of {}", required)
            }
        }
    }
}

/// Discount resolution failures.
#[derive(Debug, Error)]
pub enum DiscountError {
    /// The collaborator rejected the code. The cart's current discount is
    /// left at its previous value.
    #[error("Discount code {code} was rejected: {reason}")]
    InvalidCode { code: String, reason: RejectReason },

    /// The collaborator could not be reached. Distinct from rejection so
    /// the UI can suggest trying again rather than discarding the code.
    #[error("Discount validation unavailable: {0}")]
    Unavailable(String),
}

/// The external promo-code validation collaborator.
///
/// One outbound call per resolution, nothing else - expiry windows, usage
/// limits and minimum-subtotal rules all live on the collaborator side.
#[async_trait]
pub trait DiscountValidator: Send + Sync {
    /// Validates a (pre-normalized) code against the current subtotal.
    async fn validate(
        &self,
        code: &str,
        subtotal: Money,
    ) -> Result<DiscountDescriptor, DiscountError>;
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reject_reason_display() {
        let err = DiscountError::InvalidCode {
            code: "SAVE10".to_string(),
            reason: RejectReason::MinimumSubtotal {
                required: Money::from_cents(5000),
            },
        };
        assert_eq!(
            err.to_string(),
            "Discount code SAVE10 was rejected: subtotal below the required minimum of $50.00"
        );
    }
}

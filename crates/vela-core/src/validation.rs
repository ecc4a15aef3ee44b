//! # Validation Module
//!
//! Input validation run before business logic or an outbound call.
//!
//! ## Usage
//! ```rust
//! use vela_core::validation::{validate_discount_code, validate_quantity};
//!
//! // Validate a promo code before the outbound validation call
//! validate_discount_code("SAVE10").unwrap();
//!
//! // Validate a quantity before a cart operation
//! validate_quantity(5).unwrap();
//! ```

use crate::error::ValidationError;
use crate::MAX_DISCOUNT_CODE_LEN;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a discount code before it is sent to the validator collaborator.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most [`MAX_DISCOUNT_CODE_LEN`] characters
/// - Only alphanumeric characters, hyphens, underscores
///
/// A code that fails here never generates an outbound validation call.
///
/// ## Returns
/// The trimmed, uppercased code.
pub fn validate_discount_code(code: &str) -> ValidationResult<String> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "discount code".to_string(),
        });
    }

    if code.len() > MAX_DISCOUNT_CODE_LEN {
        return Err(ValidationError::TooLong {
            field: "discount code".to_string(),
            max: MAX_DISCOUNT_CODE_LEN,
        });
    }

    if !code
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "discount code".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(code.to_uppercase())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
///
/// The storefront carries no upper cap; the POS ceiling is stock-based and
/// enforced where the stock snapshot lives.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a tendered cash amount in cents.
///
/// ## Rules
/// - Must be positive (> 0)
pub fn validate_tender_cents(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "tendered amount".to_string(),
        });
    }

    Ok(())
}

/// Validates a tax rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Integer Cents Only
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A cart sums many line totals before a single display rounding step.   │
//! │  Accumulating floats compounds the error across items; accumulating    │
//! │  integer cents is exact.                                                │
//! │                                                                         │
//! │  Rounding happens in exactly one place: rate_portion(), when a basis-  │
//! │  point rate (discount percentage, tax) is applied.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use vela_core::money::Money;
//!
//! // Create from cents (preferred)
//! let price = Money::from_cents(1099); // $10.99
//!
//! // Arithmetic operations
//! let doubled = price * 2;             // $21.98
//! let with_fee = price + Money::from_cents(500); // $15.99
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents for USD).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for refunds and change-due math
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use vela_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Clamps the value into `[lo, hi]`.
    ///
    /// Used by discount application: the applied amount is clamped to
    /// `[0, subtotal]` so a discount can never go negative or exceed the
    /// amount it reduces.
    #[inline]
    pub fn clamp(self, lo: Money, hi: Money) -> Money {
        Money(self.0.clamp(lo.0, hi.0))
    }

    /// Returns `max(self, zero)`.
    ///
    /// Totals are floored at zero: a fixed discount larger than the
    /// subtotal produces a free order, never a negative one.
    #[inline]
    pub fn floor_at_zero(self) -> Money {
        Money(self.0.max(0))
    }

    /// Applies a basis-point rate and returns the resulting portion.
    ///
    /// This is the single rounding point in the engine. Both tax rates and
    /// percentage discounts flow through it.
    ///
    /// ## Implementation
    /// Integer math: `(amount × bps + 5000) / 10000`. The +5000 rounds the
    /// half-cent up (5000/10000 = 0.5). i128 intermediate prevents overflow
    /// on large amounts.
    ///
    /// ## Example
    /// ```rust
    /// use vela_core::money::Money;
    ///
    /// let subtotal = Money::from_cents(1000); // $10.00
    /// // 8.25% of $10.00 = $0.825 → rounds to $0.83
    /// assert_eq!(subtotal.rate_portion(825).cents(), 83);
    /// ```
    pub fn rate_portion(&self, bps: u32) -> Money {
        let portion = (self.0 as i128 * bps as i128 + 5000) / 10000;
        Money::from_cents(portion as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for debugging and receipt text. UI display goes through the
/// frontend formatter to handle localization.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);
    }

    #[test]
    fn test_rate_portion_exact() {
        // $10.00 at 10% = $1.00
        assert_eq!(Money::from_cents(1000).rate_portion(1000).cents(), 100);
    }

    #[test]
    fn test_rate_portion_rounds_half_up() {
        // $10.00 at 8.25% = $0.825 → $0.83
        assert_eq!(Money::from_cents(1000).rate_portion(825).cents(), 83);
        // $0.01 at 25% = $0.0025 → $0.00
        assert_eq!(Money::from_cents(1).rate_portion(2500).cents(), 0);
    }

    #[test]
    fn test_rate_portion_large_amount_no_overflow() {
        // Near-max cart value times 100% stays exact
        let huge = Money::from_cents(i64::MAX / 2);
        assert_eq!(huge.rate_portion(10000).cents(), i64::MAX / 2);
    }

    #[test]
    fn test_clamp_and_floor() {
        let subtotal = Money::from_cents(2000);
        let oversize = Money::from_cents(3000);
        assert_eq!(
            oversize.clamp(Money::zero(), subtotal).cents(),
            2000
        );
        assert_eq!(Money::from_cents(-500).floor_at_zero().cents(), 0);
        assert_eq!(Money::from_cents(500).floor_at_zero().cents(), 500);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        assert!(Money::from_cents(100).is_positive());
        assert!(Money::from_cents(-100).is_negative());
    }
}

//! # vela-core: Pure Business Logic for Vela
//!
//! This crate is the **heart** of the Vela pricing engine. It contains the
//! cart and transaction arithmetic as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Vela Architecture                                │
//! │                                                                         │
//! │  ┌──────────────────────────┐    ┌──────────────────────────────────┐  │
//! │  │   Storefront UI (TS)     │    │   POS Terminal UI (TS)           │  │
//! │  └────────────┬─────────────┘    └────────────────┬─────────────────┘  │
//! │               │                                   │                     │
//! │  ┌────────────▼─────────────┐    ┌────────────────▼─────────────────┐  │
//! │  │        vela-cart         │    │            vela-pos              │  │
//! │  │  CartStore, Checkout,    │    │  PosCart, tender/authorize,      │  │
//! │  │  mirror, remote sync     │    │  returns, receipts               │  │
//! │  └────────────┬─────────────┘    └────────────────┬─────────────────┘  │
//! │               │                                   │                     │
//! │  ┌────────────▼───────────────────────────────────▼─────────────────┐  │
//! │  │               ★ vela-core (THIS CRATE) ★                         │  │
//! │  │                                                                  │  │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐   │  │
//! │  │   │   types   │  │   money   │  │  pricing  │  │   cart    │   │  │
//! │  │   │  Product  │  │   Money   │  │ subtotal  │  │ CartLines │   │  │
//! │  │   │   Order   │  │  rounding │  │ discount  │  │  merging  │   │  │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘   │  │
//! │  │                                                                  │  │
//! │  │   NO I/O • NO NETWORK • NO STORAGE • PURE FUNCTIONS             │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, LineItem, Order, ReturnRecord, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`pricing`] - The single copy of the pricing arithmetic
//! - [`cart`] - Line-item mutation algebra shared by both sales channels
//! - [`error`] - Validation error types
//! - [`validation`] - Input validation rules
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Network, storage, and clock-driven decisions are FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use vela_core::Money` instead of
// `use vela_core::money::Money`

pub use cart::CartLines;
pub use error::ValidationError;
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a discount code accepted for validation.
///
/// A longer string is rejected locally and never generates an outbound
/// validation call.
pub const MAX_DISCOUNT_CODE_LEN: usize = 32;

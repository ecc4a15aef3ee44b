//! # vela-cart: Storefront Cart Store & Checkout
//!
//! The buyer-facing half of the Vela pricing engine.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       vela-cart                                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  CartStore (store.rs)                                           │   │
//! │  │  LOCAL/REMOTE regime, mutations, derived totals                 │   │
//! │  └──────┬──────────────────┬──────────────────┬────────────────────┘   │
//! │         │                  │                  │                         │
//! │         ▼                  ▼                  ▼                         │
//! │  ┌────────────┐    ┌──────────────┐   ┌──────────────┐                 │
//! │  │ CartMirror │    │  RemoteCart  │   │  Discount    │                 │
//! │  │ (local KV) │    │  (per-user   │   │  Validator   │                 │
//! │  │            │    │   server     │   │  (promo      │                 │
//! │  │ mirror.rs  │    │   cart)      │   │   codes)     │                 │
//! │  └────────────┘    └──────────────┘   └──────────────┘                 │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  Checkout (checkout.rs) ──► OrderGateway (gateway.rs)           │   │
//! │  │  one create_order call per user-initiated submission            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  The traits are the collaborator contracts; the host application       │
//! │  supplies the transport implementations.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod discount;
pub mod error;
pub mod gateway;
pub mod mirror;
pub mod remote;
pub mod store;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use checkout::{shipping_cost, Checkout, CheckoutConfig, ShippingMethod};
pub use discount::{DiscountError, DiscountValidator, RejectReason};
pub use error::{CartError, CartResult, MirrorError};
pub use gateway::{GatewayError, OrderGateway};
pub use mirror::{CartMirror, MemoryMirror, CART_MIRROR_KEY};
pub use remote::{RemoteCart, RemoteCartError};
pub use store::{CartStore, SharedCartStore, SourceOfTruth, SyncFailure};

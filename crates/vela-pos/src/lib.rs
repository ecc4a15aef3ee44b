//! # vela-pos: Point-of-Sale Transaction Engine
//!
//! The in-store half of the Vela pricing engine.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        vela-pos                                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  PosTerminal (sale.rs)                                          │   │
//! │  │  ring up → tender/authorize → record order → receipt            │   │
//! │  └──────┬──────────────────┬──────────────────┬────────────────────┘   │
//! │         │                  │                  │                         │
//! │         ▼                  ▼                  ▼                         │
//! │  ┌────────────┐    ┌──────────────┐   ┌──────────────┐                 │
//! │  │  PosCart   │    │ Payment      │   │ OrderGateway │                 │
//! │  │ (cart.rs)  │    │ Authorizer   │   │ (vela-cart)  │                 │
//! │  │ stock      │    │ (payment.rs) │   │ create /     │                 │
//! │  │ ceilings,  │    │ AWAITING →   │   │ lookup /     │                 │
//! │  │ manual     │    │ APPROVED /   │   │ record       │                 │
//! │  │ discount,  │    │ DECLINED /   │   │ return       │                 │
//! │  │ tax        │    │ CANCELLED    │   │              │                 │
//! │  └────────────┘    └──────────────┘   └──────────────┘                 │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  ReturnDraft (returns.rs)                                       │   │
//! │  │  lookup order → select bounded quantities → confirm refund      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  The POS cart is always local: it never touches the remote per-user    │
//! │  cart or the durable mirror, and dies with the terminal session.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod config;
pub mod error;
pub mod payment;
pub mod returns;
pub mod sale;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{PosCart, PosTotals};
pub use config::PosConfig;
pub use error::{PosError, PosResult};
pub use payment::{
    change_due, AuthorizationError, AuthorizationOutcome, AuthorizationState, CardPayment,
    PaymentAuthorizer,
};
pub use returns::ReturnDraft;
pub use sale::{PosTerminal, Receipt, ReceiptItem};

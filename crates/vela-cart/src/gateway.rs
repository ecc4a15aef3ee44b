//! # Order Gateway Contract
//!
//! The order service, as seen from checkout and the POS terminal.
//!
//! ## Contract Shape
//! - `create_order` is issued **exactly once** per user-initiated
//!   submission; this engine never retries it (a silent retry risks a
//!   duplicate charge/order).
//! - `lookup_order` serves only the POS returns flow.
//! - `record_return` persists a return record and reconciles stock upward
//!   by the returned quantities on the collaborator side.

use async_trait::async_trait;
use thiserror::Error;

use vela_core::{Order, OrderDraft, ReturnRecord};

/// Order service failures.
///
/// Validation failures and backend failures arrive uniformly as
/// [`GatewayError::Creation`] at this layer - the split is the
/// collaborator's concern.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The order was not recorded. The submitting cart stays intact.
    #[error("Order creation failed: {0}")]
    Creation(String),

    /// No order exists under the given id.
    #[error("Order not found: {0}")]
    NotFound(String),

    /// The service never answered (network, timeout).
    #[error("Order service unavailable: {0}")]
    Unavailable(String),
}

/// The external order-creation / order-lookup collaborator.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Creates an immutable order from a price-resolved draft.
    ///
    /// The collaborator assigns `id` and `created_at`.
    async fn create_order(&self, draft: OrderDraft) -> Result<Order, GatewayError>;

    /// Loads a historical order (POS returns flow only).
    async fn lookup_order(&self, order_id: &str) -> Result<Order, GatewayError>;

    /// Records a confirmed return against a historical order.
    async fn record_return(&self, record: &ReturnRecord) -> Result<(), GatewayError>;
}

//! # Remote Cart Contract
//!
//! The per-user server-side cart, as seen from this engine.
//!
//! ## Contract Shape
//! Request/response only - transport is the host's concern. Each mutation
//! call returns success or failure; a failure carries **no** guaranteed
//! partial-state information, which is why the store always follows a
//! successful mutation with one authoritative [`RemoteCart::fetch`] rather
//! than patching its local copy.

use async_trait::async_trait;
use thiserror::Error;

use vela_core::LineItem;

/// Remote cart call failures.
///
/// The store treats every variant the same way - degrade to local-only
/// application and surface the failure - so the taxonomy stays small.
#[derive(Debug, Error)]
pub enum RemoteCartError {
    /// The call never completed (network, timeout, server unreachable).
    #[error("Remote cart call failed: {0}")]
    Network(String),

    /// The server answered and refused (unknown product, bad identity).
    #[error("Remote cart rejected the request: {0}")]
    Rejected(String),
}

/// The authenticated per-user cart service.
///
/// `identity` is the authenticated customer id bound at login. These are
/// the only suspension points of the storefront store besides discount
/// validation and order creation.
#[async_trait]
pub trait RemoteCart: Send + Sync {
    /// Reads the full authoritative line list.
    async fn fetch(&self, identity: &str) -> Result<Vec<LineItem>, RemoteCartError>;

    /// Adds quantity of a product to the remote cart.
    async fn add_item(
        &self,
        identity: &str,
        product_id: &str,
        quantity: i64,
    ) -> Result<(), RemoteCartError>;

    /// Removes a product from the remote cart.
    async fn remove_item(&self, identity: &str, product_id: &str) -> Result<(), RemoteCartError>;

    /// Sets a product to an exact quantity in the remote cart.
    async fn set_quantity(
        &self,
        identity: &str,
        product_id: &str,
        quantity: i64,
    ) -> Result<(), RemoteCartError>;

    /// Empties the remote cart.
    async fn clear(&self, identity: &str) -> Result<(), RemoteCartError>;
}

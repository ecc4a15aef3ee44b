//! # Cart Store
//!
//! The stateful core of the storefront: owns the buyer's line items,
//! mediates between the durable local mirror and the remote per-user cart,
//! and derives totals on read.
//!
//! ## Two Regimes, One Store
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Cart Store Regimes                                 │
//! │                                                                         │
//! │  LOCAL (no identity bound)                                              │
//! │  ────────────────────────                                               │
//! │  mutate ──► apply to in-memory lines ──► write-through mirror           │
//! │                                          (a lost write self-heals on    │
//! │                                           the next mutation)            │
//! │                                                                         │
//! │  REMOTE (identity bound at login)                                       │
//! │  ────────────────────────────────                                       │
//! │  mutate ──► optimistic local apply ──► remote call                      │
//! │                                            │                            │
//! │             ┌──────────────────────────────┤                            │
//! │             ▼ ok                           ▼ fail                       │
//! │  authoritative fetch overwrites    local application stands +           │
//! │  the local list                    SyncFailure flag (the mutation       │
//! │                                    still succeeds - the user's          │
//! │                                    intent is honored)                   │
//! │                                                                         │
//! │  LOCAL ──► REMOTE happens exactly once, at bind_identity():             │
//! │  one remote read OVERWRITES the local list - never a merge.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ordering
//! Mutations take `&mut self`, so they are FIFO against one store by
//! construction. When two remote calls from rapid successive mutations
//! race server-side, the last successfully completed fetch wins as
//! authoritative (documented weak-consistency trade-off; there is no
//! cancellation - a superseded call simply has its effect discarded by the
//! next successful synchronization).

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use vela_core::validation::validate_discount_code;
use vela_core::{pricing, CartLines, DiscountDescriptor, LineItem, Money, Product};

use crate::discount::DiscountValidator;
use crate::error::{CartError, CartResult};
use crate::mirror::{self, CartMirror, CART_MIRROR_KEY};
use crate::remote::{RemoteCart, RemoteCartError};

// =============================================================================
// Source of Truth
// =============================================================================

/// Which storage is authoritative for this store instance.
///
/// A tagged variant, deliberately not a boolean: `Remote` cannot exist
/// without the identity it is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOfTruth {
    /// Unauthenticated: in-memory list mirrored to durable local storage.
    Local,
    /// Authenticated: the server-side per-user cart is authoritative.
    Remote { identity: String },
}

// =============================================================================
// Sync Failure
// =============================================================================

/// A recoverable remote-sync discrepancy.
///
/// Set when a remote mutation fails and the store falls back to local
/// application; cleared by the next successful remote synchronization.
/// The UI renders it as a non-blocking warning - the mutation itself
/// already succeeded locally.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncFailure {
    /// Which remote operation failed ("add-item", "set-quantity", ...).
    pub operation: &'static str,

    /// Collaborator error message.
    pub message: String,

    /// When the failure happened.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub at: DateTime<Utc>,
}

// =============================================================================
// Cart Store
// =============================================================================

/// The storefront cart.
///
/// ## Ownership
/// One instance per buyer session, exclusively owning its line list.
/// UI layers and the checkout orchestrator read derived values or invoke
/// the documented mutations - nothing else mutates the list.
pub struct CartStore {
    lines: CartLines,
    discount: Option<DiscountDescriptor>,
    source: SourceOfTruth,
    last_sync_error: Option<SyncFailure>,
    remote: Arc<dyn RemoteCart>,
    mirror: Arc<dyn CartMirror>,
    validator: Arc<dyn DiscountValidator>,
}

impl CartStore {
    /// Creates a LOCAL-regime store, cold-starting from the durable mirror.
    ///
    /// An unreadable or corrupt mirror payload starts an empty cart (and is
    /// overwritten by the next mutation's write-through).
    pub fn new(
        remote: Arc<dyn RemoteCart>,
        mirror: Arc<dyn CartMirror>,
        validator: Arc<dyn DiscountValidator>,
    ) -> Self {
        let lines = match mirror.get(CART_MIRROR_KEY) {
            Ok(Some(payload)) => match mirror::decode_lines(&payload) {
                Ok(items) => CartLines::from_items(items),
                Err(err) => {
                    warn!(%err, "cart mirror payload corrupt; starting empty");
                    CartLines::new()
                }
            },
            Ok(None) => CartLines::new(),
            Err(err) => {
                warn!(%err, "cart mirror unreadable; starting empty");
                CartLines::new()
            }
        };

        CartStore {
            lines,
            discount: None,
            source: SourceOfTruth::Local,
            last_sync_error: None,
            remote,
            mirror,
            validator,
        }
    }

    // =========================================================================
    // Regime Transition
    // =========================================================================

    /// Binds an authenticated identity, switching the store to the REMOTE
    /// regime.
    ///
    /// ## Behavior
    /// - Performs exactly one remote read; the fetched list **overwrites**
    ///   the local list. Items added while unauthenticated are not migrated.
    /// - Calling this on an already-remote store is a logged no-op (the
    ///   transition happens exactly once).
    /// - If the read fails, the store stays LOCAL and the (recoverable)
    ///   error is returned; the caller may re-issue the bind.
    pub async fn bind_identity(&mut self, identity: impl Into<String>) -> CartResult<()> {
        let identity = identity.into();

        if let SourceOfTruth::Remote { identity: existing } = &self.source {
            warn!(%existing, "bind_identity on an already remote-backed cart; ignoring");
            return Ok(());
        }

        debug!(%identity, "bind_identity");

        match self.remote.fetch(&identity).await {
            Ok(items) => {
                if !self.lines.is_empty() {
                    info!(
                        dropped = self.lines.unique_count(),
                        "discarding unauthenticated cart lines; remote cart is authoritative"
                    );
                }
                self.lines.replace(items);
                self.source = SourceOfTruth::Remote { identity };
                self.last_sync_error = None;
                info!("cart is now remote-backed");
                Ok(())
            }
            Err(err) => Err(CartError::Sync {
                operation: "fetch",
                message: err.to_string(),
            }),
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds a product to the cart (callers pass quantity 1 for a plain
    /// "add to cart" click).
    ///
    /// Merges into an existing line for the same product id or appends a
    /// new line. A quantity below 1 is a silent no-op.
    pub async fn add_to_cart(&mut self, product: &Product, quantity: i64) -> CartResult<()> {
        debug!(product_id = %product.id, quantity, "add_to_cart");

        if quantity < 1 {
            debug!("ignoring add with quantity < 1");
            return Ok(());
        }

        match self.source.clone() {
            SourceOfTruth::Local => {
                self.lines.add(product, quantity);
                self.write_mirror();
                Ok(())
            }
            SourceOfTruth::Remote { identity } => {
                // Optimistic local apply keeps the UI responsive; the
                // authoritative fetch after a successful call overwrites it.
                self.lines.add(product, quantity);
                let result = self
                    .remote
                    .add_item(&identity, &product.id, quantity)
                    .await;
                self.settle_remote(&identity, "add-item", result).await
            }
        }
    }

    /// Removes a line by product id. Removing an absent id is a no-op,
    /// not an error.
    pub async fn remove_from_cart(&mut self, product_id: &str) -> CartResult<()> {
        debug!(%product_id, "remove_from_cart");

        match self.source.clone() {
            SourceOfTruth::Local => {
                self.lines.remove(product_id);
                self.write_mirror();
                Ok(())
            }
            SourceOfTruth::Remote { identity } => {
                self.lines.remove(product_id);
                let result = self.remote.remove_item(&identity, product_id).await;
                self.settle_remote(&identity, "remove-item", result).await
            }
        }
    }

    /// Sets a line to exactly the given quantity.
    ///
    /// A quantity below 1 is silently rejected - no state change, no error,
    /// no outbound call.
    pub async fn update_quantity(&mut self, product_id: &str, quantity: i64) -> CartResult<()> {
        debug!(%product_id, quantity, "update_quantity");

        if quantity < 1 {
            debug!("ignoring update_quantity below 1");
            return Ok(());
        }

        match self.source.clone() {
            SourceOfTruth::Local => {
                self.lines.set_quantity(product_id, quantity);
                self.write_mirror();
                Ok(())
            }
            SourceOfTruth::Remote { identity } => {
                self.lines.set_quantity(product_id, quantity);
                let result = self
                    .remote
                    .set_quantity(&identity, product_id, quantity)
                    .await;
                self.settle_remote(&identity, "set-quantity", result).await
            }
        }
    }

    /// Empties items and discount together - atomic from the caller's
    /// perspective.
    pub async fn clear_cart(&mut self) -> CartResult<()> {
        debug!("clear_cart");

        self.discount = None;

        match self.source.clone() {
            SourceOfTruth::Local => {
                self.lines.clear();
                self.write_mirror();
                Ok(())
            }
            SourceOfTruth::Remote { identity } => {
                self.lines.clear();
                let result = self.remote.clear(&identity).await;
                self.settle_remote(&identity, "clear", result).await
            }
        }
    }

    /// Resolves a promo code against the current subtotal and applies it.
    ///
    /// On rejection the cart's discount stays at its previous value
    /// (absent on a first attempt) - a failed resolution never partially
    /// applies.
    pub async fn apply_discount_code(&mut self, code: &str) -> CartResult<DiscountDescriptor> {
        let code = validate_discount_code(code)?;
        debug!(%code, "apply_discount_code");

        let subtotal = self.lines.subtotal();
        match self.validator.validate(&code, subtotal).await {
            Ok(descriptor) => {
                info!(code = %descriptor.code, "discount applied");
                self.discount = Some(descriptor.clone());
                Ok(descriptor)
            }
            Err(err) => {
                debug!(%err, "discount resolution failed; keeping previous discount");
                Err(err.into())
            }
        }
    }

    /// Drops the applied discount, if any.
    pub fn remove_discount(&mut self) {
        debug!("remove_discount");
        self.discount = None;
    }

    // =========================================================================
    // Derived Values (computed on read - never cached)
    // =========================================================================

    /// The lines in display order.
    pub fn items(&self) -> &[LineItem] {
        self.lines.items()
    }

    /// Total quantity across all lines.
    pub fn item_count(&self) -> i64 {
        self.lines.item_count()
    }

    /// Number of distinct products.
    pub fn unique_count(&self) -> usize {
        self.lines.unique_count()
    }

    /// Sum of line totals.
    pub fn subtotal(&self) -> Money {
        self.lines.subtotal()
    }

    /// The currently applied discount descriptor, if any.
    pub fn discount(&self) -> Option<&DiscountDescriptor> {
        self.discount.as_ref()
    }

    /// The discount amount against the current subtotal, clamped to
    /// `[0, subtotal]`.
    pub fn discount_amount(&self) -> Money {
        match &self.discount {
            Some(d) => pricing::discount_amount(self.subtotal(), &d.value),
            None => Money::zero(),
        }
    }

    /// Payable total before shipping (tax and shipping are added by the
    /// checkout orchestrator).
    pub fn total(&self) -> Money {
        pricing::total(self.subtotal(), self.discount_amount(), &[])
    }

    /// Checks if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The current storage regime.
    pub fn source(&self) -> &SourceOfTruth {
        &self.source
    }

    /// Whether an authenticated identity is bound.
    pub fn is_authenticated(&self) -> bool {
        matches!(self.source, SourceOfTruth::Remote { .. })
    }

    /// The outstanding recoverable sync discrepancy, if any.
    pub fn sync_error(&self) -> Option<&SyncFailure> {
        self.last_sync_error.as_ref()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Settles a remote mutation that has already been applied locally:
    /// re-synchronize from the authoritative read on success, keep the
    /// local application and flag the discrepancy on failure.
    async fn settle_remote(
        &mut self,
        identity: &str,
        operation: &'static str,
        result: Result<(), RemoteCartError>,
    ) -> CartResult<()> {
        match result {
            Ok(()) => match self.remote.fetch(identity).await {
                Ok(items) => {
                    self.adopt_authoritative(items);
                    Ok(())
                }
                Err(err) => {
                    self.note_sync_failure(operation, err);
                    Ok(())
                }
            },
            Err(err) => {
                self.note_sync_failure(operation, err);
                Ok(())
            }
        }
    }

    /// Overwrites the local list with a successful remote read and clears
    /// the sync flag.
    ///
    /// A local fallback line the remote never received gets dropped here -
    /// last synchronization wins. The drop is logged rather than silent.
    fn adopt_authoritative(&mut self, items: Vec<LineItem>) {
        let dropped: Vec<String> = self
            .lines
            .items()
            .iter()
            .filter(|local| !items.iter().any(|r| r.product_id == local.product_id))
            .map(|local| local.product_id.clone())
            .collect();
        if !dropped.is_empty() {
            warn!(
                ?dropped,
                "local fallback lines absent from authoritative remote cart; dropping"
            );
        }

        self.lines.replace(items);
        self.last_sync_error = None;
    }

    /// Records a degraded-fallback failure. The mutation has already been
    /// applied locally; the user's intent is honored.
    fn note_sync_failure(&mut self, operation: &'static str, err: RemoteCartError) {
        warn!(operation, %err, "remote cart call failed; applied locally only");
        self.last_sync_error = Some(SyncFailure {
            operation,
            message: err.to_string(),
            at: Utc::now(),
        });
    }

    /// Write-through to the durable mirror (LOCAL regime only).
    ///
    /// A failed write is logged and tolerated: the next mutation rewrites
    /// the full list.
    fn write_mirror(&self) {
        match mirror::encode_lines(self.lines.items()) {
            Ok(payload) => {
                if let Err(err) = self.mirror.put(CART_MIRROR_KEY, &payload) {
                    warn!(%err, "cart mirror write lost; will self-heal on next mutation");
                }
            }
            Err(err) => warn!(%err, "cart mirror encode failed"),
        }
    }
}

// =============================================================================
// Shared Store Handle
// =============================================================================

/// A clonable handle sharing one [`CartStore`] across UI consumers.
///
/// ## Ordering Guarantee
/// The async mutex admits one mutation at a time and holds the lock across
/// the mutation's suspension points, so mutations stay FIFO even when the
/// UI fires them from concurrent tasks.
#[derive(Clone)]
pub struct SharedCartStore {
    inner: Arc<tokio::sync::Mutex<CartStore>>,
}

impl SharedCartStore {
    /// Wraps a store for shared access.
    pub fn new(store: CartStore) -> Self {
        SharedCartStore {
            inner: Arc::new(tokio::sync::Mutex::new(store)),
        }
    }

    /// Executes a function with read access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let count = shared.with_cart(|cart| cart.item_count()).await;
    /// ```
    pub async fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&CartStore) -> R,
    {
        let cart = self.inner.lock().await;
        f(&cart)
    }

    /// Acquires exclusive access for a mutation.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// shared.lock().await.add_to_cart(&product, 1).await?;
    /// ```
    pub async fn lock(&self) -> tokio::sync::MutexGuard<'_, CartStore> {
        self.inner.lock().await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

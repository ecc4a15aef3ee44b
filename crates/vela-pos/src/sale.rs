//! # POS Terminal
//!
//! Orchestrates one in-person sale at a time: ring up, tender or
//! authorize, record the order, hand back a receipt.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Sale Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌───────────┐     ┌──────────┐      │
//! │  │  Empty   │────►│ Ringing  │────►│  Tender / │────►│ Completed│      │
//! │  │  Cart    │     │   Up     │     │ Authorize │     │ + Receipt│      │
//! │  └──────────┘     └──────────┘     └───────────┘     └──────────┘      │
//! │       ▲                │                 │                  │           │
//! │       │           add_item          cash: change ≥ 0        │           │
//! │       │           set_quantity      card: APPROVED          │           │
//! │       │           set_discount          │                   │           │
//! │       │                │                │                   │           │
//! │       └── new_sale ◄───┴────────────────┴───────────────────┘           │
//! │                                                                         │
//! │  A failed tender/authorization/order-creation leaves the sale OPEN -   │
//! │  the operator retries explicitly; nothing retries on its own.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use vela_cart::gateway::{GatewayError, OrderGateway};
use vela_core::validation::validate_tender_cents;
use vela_core::{
    Money, Order, OrderDraft, OrderItem, PaymentMethod, ReturnRecord, SaleChannel,
    ValidationError,
};

use crate::cart::PosCart;
use crate::config::PosConfig;
use crate::error::{PosError, PosResult};
use crate::payment::{
    change_due, AuthorizationError, AuthorizationState, CardPayment, PaymentAuthorizer,
};
use crate::returns::ReturnDraft;

// =============================================================================
// Receipt
// =============================================================================

/// One printed line on a receipt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptItem {
    pub name: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub line_total_cents: i64,
}

/// The completion record handed to the terminal UI and the printer.
///
/// Carries the same totals as the recorded [`Order`] it references.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub order_id: String,
    pub receipt_number: String,
    pub store_name: String,
    pub register_id: String,
    pub timestamp: String,
    pub items: Vec<ReceiptItem>,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
    pub payment: PaymentMethod,
    pub tendered_cents: Option<i64>,
    pub change_cents: Option<i64>,
    /// Provider reference for card/e-wallet payments.
    pub reference: Option<String>,
}

impl Receipt {
    fn build(order: &Order, config: &PosConfig, reference: Option<String>) -> Self {
        Receipt {
            order_id: order.id.clone(),
            receipt_number: generate_receipt_number(),
            store_name: config.store_name.clone(),
            register_id: config.register_id.clone(),
            timestamp: order.created_at.to_rfc3339(),
            items: order
                .items
                .iter()
                .map(|i| ReceiptItem {
                    name: i.name.clone(),
                    quantity: i.quantity,
                    unit_price_cents: i.unit_price_cents,
                    line_total_cents: i.line_total_cents,
                })
                .collect(),
            subtotal_cents: order.subtotal_cents,
            discount_cents: order.discount_cents,
            tax_cents: order.tax_cents,
            total_cents: order.total_cents,
            payment: order.payment,
            tendered_cents: order.tendered_cents,
            change_cents: order.change_cents,
            reference,
        }
    }
}

fn generate_receipt_number() -> String {
    let now = Utc::now();
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    let random: u16 = (nanos % 10000) as u16;
    format!("{}-{:04}", now.format("%y%m%d-%H%M%S"), random)
}

// =============================================================================
// POS Terminal
// =============================================================================

/// One terminal session: an always-local cart plus the collaborators
/// needed to complete a sale.
pub struct PosTerminal {
    cart: PosCart,
    config: PosConfig,
    gateway: Arc<dyn OrderGateway>,
    authorizer: Arc<dyn PaymentAuthorizer>,
}

impl PosTerminal {
    /// Creates a terminal with an empty cart taxed at the configured rate.
    pub fn new(
        config: PosConfig,
        gateway: Arc<dyn OrderGateway>,
        authorizer: Arc<dyn PaymentAuthorizer>,
    ) -> Self {
        let cart = PosCart::new(config.tax_rate());
        PosTerminal {
            cart,
            config,
            gateway,
            authorizer,
        }
    }

    /// Read access to the in-progress sale.
    pub fn cart(&self) -> &PosCart {
        &self.cart
    }

    /// Mutation access to the in-progress sale (ring up, discounts).
    pub fn cart_mut(&mut self) -> &mut PosCart {
        &mut self.cart
    }

    /// Clears the cart. Called on every new sale and on operator logout.
    pub fn new_sale(&mut self) {
        debug!("new_sale");
        self.cart.clear();
    }

    // =========================================================================
    // Cash Completion
    // =========================================================================

    /// Completes the sale as a cash payment.
    ///
    /// ## Behavior
    /// - `change_due = tendered − total`; completion is only permitted when
    ///   `change_due ≥ 0`, otherwise [`PosError::InsufficientTender`] and
    ///   the sale stays open
    /// - Exactly one order-creation call; on failure the cart stays intact
    ///   for an operator-initiated resubmission
    /// - On success the cart is cleared and a receipt returned
    pub async fn complete_cash_sale(&mut self, tendered: Money) -> PosResult<Receipt> {
        debug!(%tendered, "complete_cash_sale");

        if self.cart.is_empty() {
            return Err(PosError::EmptySale);
        }
        validate_tender_cents(tendered.cents())?;

        let total = self.cart.total();
        let change = change_due(total, tendered);
        if change.is_negative() {
            return Err(PosError::InsufficientTender { total, tendered });
        }

        let draft = self.draft(PaymentMethod::Cash, Some(tendered), Some(change));
        let order = self.record_order(draft).await?;

        info!(order_id = %order.id, total = %order.total(), change = %change, "cash sale completed");
        self.cart.clear();
        Ok(Receipt::build(&order, &self.config, None))
    }

    // =========================================================================
    // Card / E-Wallet Completion
    // =========================================================================

    /// Completes the sale through the external card/e-wallet authorization.
    ///
    /// ## Behavior
    /// - The attempt starts AWAITING and resolves through the authorizer
    /// - Completion proceeds only from APPROVED; a DECLINED or CANCELLED
    ///   outcome leaves the sale open for the operator to retry with the
    ///   same or a different method
    pub async fn complete_card_sale(&mut self, method: PaymentMethod) -> PosResult<Receipt> {
        debug!(?method, "complete_card_sale");

        if self.cart.is_empty() {
            return Err(PosError::EmptySale);
        }
        if method == PaymentMethod::Cash {
            return Err(PosError::Validation(ValidationError::InvalidFormat {
                field: "payment method".to_string(),
                reason: "cash tender goes through complete_cash_sale".to_string(),
            }));
        }

        let total = self.cart.total();
        let mut payment = CardPayment::new(method, total);
        debug!(state = ?payment.state, "authorization started");

        match self.authorizer.authorize(method, total).await {
            Ok(outcome) => payment.resolve(outcome),
            Err(AuthorizationError::Unavailable(msg)) => {
                return Err(PosError::TerminalUnavailable(msg))
            }
        }

        if !payment.is_approved() {
            let outcome = match payment.state {
                AuthorizationState::Cancelled => "cancelled",
                _ => "declined",
            };
            debug!(outcome, "authorization not approved; sale stays open");
            return Err(PosError::PaymentDeclined {
                outcome: outcome.to_string(),
            });
        }

        let draft = self.draft(method, None, None);
        let order = self.record_order(draft).await?;

        info!(order_id = %order.id, total = %order.total(), "card sale completed");
        self.cart.clear();
        Ok(Receipt::build(&order, &self.config, payment.reference))
    }

    // =========================================================================
    // Returns
    // =========================================================================

    /// Loads a historical order and opens a return draft against it.
    pub async fn begin_return(&self, order_id: &str) -> PosResult<ReturnDraft> {
        debug!(%order_id, "begin_return");

        match self.gateway.lookup_order(order_id).await {
            Ok(order) => Ok(ReturnDraft::new(order)),
            Err(GatewayError::NotFound(id)) => Err(PosError::OrderNotFound(id)),
            Err(err) => Err(PosError::OrderLookup(err.to_string())),
        }
    }

    /// Confirms a return selection.
    ///
    /// Produces the immutable return record and hands it to the order
    /// service, which reconciles stock upward by the returned quantities.
    /// The original order is never mutated.
    pub async fn confirm_return(&self, draft: &ReturnDraft) -> PosResult<ReturnRecord> {
        debug!(order_id = %draft.order().id, "confirm_return");

        if draft.is_empty() {
            return Err(PosError::EmptyReturn);
        }

        let record = draft.build_record();
        match self.gateway.record_return(&record).await {
            Ok(()) => {
                info!(
                    return_id = %record.id,
                    order_id = %record.order_id,
                    refund = record.refund_cents,
                    "return recorded"
                );
                Ok(record)
            }
            Err(err) => Err(PosError::ReturnNotRecorded(err.to_string())),
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Snapshots the cart into an order draft with resolved prices.
    fn draft(
        &self,
        payment: PaymentMethod,
        tendered: Option<Money>,
        change: Option<Money>,
    ) -> OrderDraft {
        OrderDraft {
            channel: SaleChannel::Pos,
            items: self.cart.items().iter().map(OrderItem::from_line).collect(),
            subtotal_cents: self.cart.subtotal().cents(),
            discount_cents: self.cart.discount_amount().cents(),
            tax_cents: self.cart.tax().cents(),
            shipping_cents: 0,
            total_cents: self.cart.total().cents(),
            payment,
            tendered_cents: tendered.map(|m| m.cents()),
            change_cents: change.map(|m| m.cents()),
            cashier: self.config.cashier.clone(),
        }
    }

    /// The single order-creation call of a completion attempt.
    async fn record_order(&self, draft: OrderDraft) -> PosResult<Order> {
        self.gateway
            .create_order(draft)
            .await
            .map_err(|err| PosError::OrderCreation(err.to_string()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

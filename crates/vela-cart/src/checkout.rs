//! # Checkout Orchestrator
//!
//! Converts a settled cart into exactly one order-creation call.
//!
//! ## Single-Shot Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Checkout Flow                                        │
//! │                                                                         │
//! │  settled CartStore + shipping selection + payment selection             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  grand_total = total(subtotal, discount) + shipping_cost(method)        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ONE create_order call with a price-resolved item snapshot              │
//! │       │                                                                 │
//! │       ├── success ──► local cart cleared, Order returned (caller        │
//! │       │               reads the created order's id from it)             │
//! │       │                                                                 │
//! │       └── failure ──► cart untouched, error surfaced - retry is a       │
//! │                       fresh user-initiated resubmission, never          │
//! │                       automatic (a silent retry risks a duplicate       │
//! │                       order)                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use vela_core::{pricing, Money, Order, OrderDraft, OrderItem, PaymentMethod, SaleChannel};

use crate::error::{CartError, CartResult};
use crate::gateway::OrderGateway;
use crate::store::CartStore;

// =============================================================================
// Shipping
// =============================================================================

/// How the buyer wants the order delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingMethod {
    /// Flat-rate carrier delivery.
    Standard,
    /// Faster carrier delivery at a higher rate.
    Expedited,
    /// In-store pickup - always free.
    Pickup,
}

/// Shipping rates and the free-shipping threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutConfig {
    /// Subtotals at or above this ship free (Pickup is free regardless).
    pub free_shipping_threshold: Money,

    /// Flat rate for [`ShippingMethod::Standard`].
    pub standard_rate: Money,

    /// Rate for [`ShippingMethod::Expedited`].
    pub expedited_rate: Money,
}

impl Default for CheckoutConfig {
    /// Development defaults: free shipping from $50.00, $5.99 standard,
    /// $14.99 expedited.
    fn default() -> Self {
        CheckoutConfig {
            free_shipping_threshold: Money::from_cents(5000),
            standard_rate: Money::from_cents(599),
            expedited_rate: Money::from_cents(1499),
        }
    }
}

/// Shipping cost for a method against a subtotal.
///
/// ## Rules
/// - Pickup always costs zero
/// - At or above the free-shipping threshold, carrier delivery is free
/// - Below it, the configured rate for the chosen method applies
pub fn shipping_cost(method: ShippingMethod, subtotal: Money, config: &CheckoutConfig) -> Money {
    match method {
        ShippingMethod::Pickup => Money::zero(),
        _ if subtotal >= config.free_shipping_threshold => Money::zero(),
        ShippingMethod::Standard => config.standard_rate,
        ShippingMethod::Expedited => config.expedited_rate,
    }
}

// =============================================================================
// Checkout
// =============================================================================

/// The checkout orchestrator.
///
/// Holds no cart state of its own - it reads the settled [`CartStore`]
/// once per submission.
pub struct Checkout {
    config: CheckoutConfig,
    gateway: Arc<dyn OrderGateway>,
}

impl Checkout {
    /// Creates an orchestrator against an order gateway.
    pub fn new(config: CheckoutConfig, gateway: Arc<dyn OrderGateway>) -> Self {
        Checkout { config, gateway }
    }

    /// Places an order from the current cart state.
    ///
    /// ## Behavior
    /// - An empty cart is rejected before anything else happens.
    /// - The draft snapshots price-resolved items, so later catalog price
    ///   changes cannot retroactively alter the placed order.
    /// - Exactly one `create_order` call is issued. On success the cart is
    ///   cleared and the created [`Order`] returned; on failure the cart is
    ///   left untouched for a user-initiated resubmission.
    pub async fn place_order(
        &self,
        cart: &mut CartStore,
        shipping: ShippingMethod,
        payment: PaymentMethod,
    ) -> CartResult<Order> {
        debug!(?shipping, ?payment, "place_order");

        if cart.is_empty() {
            return Err(CartError::EmptyCart);
        }

        let subtotal = cart.subtotal();
        let discount = cart.discount_amount();
        let shipping_cents = shipping_cost(shipping, subtotal, &self.config);
        let grand_total = pricing::total(subtotal, discount, &[shipping_cents]);

        let draft = OrderDraft {
            channel: SaleChannel::Storefront,
            items: cart.items().iter().map(OrderItem::from_line).collect(),
            subtotal_cents: subtotal.cents(),
            discount_cents: discount.cents(),
            tax_cents: 0,
            shipping_cents: shipping_cents.cents(),
            total_cents: grand_total.cents(),
            payment,
            tendered_cents: None,
            change_cents: None,
            cashier: None,
        };

        match self.gateway.create_order(draft).await {
            Ok(order) => {
                info!(order_id = %order.id, total = %order.total(), "order placed");
                cart.clear_cart().await?;
                Ok(order)
            }
            Err(err) => {
                debug!(%err, "order creation failed; cart left intact");
                Err(CartError::OrderCreation(err.to_string()))
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex as StdMutex;

    use async_trait::async_trait;
    use chrono::Utc;

    use crate::discount::{DiscountError, DiscountValidator, RejectReason};
    use crate::gateway::GatewayError;
    use crate::mirror::MemoryMirror;
    use crate::remote::{RemoteCart, RemoteCartError};
    use vela_core::{DiscountDescriptor, LineItem, Product, ReturnRecord};

    fn product(id: &str, price: i64) -> Product {
        Product {
            id: id.to_string(),
            sku: format!("SKU-{}", id),
            name: format!("Product {}", id),
            price_cents: price,
            sale_price_cents: None,
            is_on_sale: false,
            stock_quantity: 100,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    struct NoRemote;

    #[async_trait]
    impl RemoteCart for NoRemote {
        async fn fetch(&self, _: &str) -> Result<Vec<LineItem>, RemoteCartError> {
            Ok(Vec::new())
        }
        async fn add_item(&self, _: &str, _: &str, _: i64) -> Result<(), RemoteCartError> {
            Ok(())
        }
        async fn remove_item(&self, _: &str, _: &str) -> Result<(), RemoteCartError> {
            Ok(())
        }
        async fn set_quantity(&self, _: &str, _: &str, _: i64) -> Result<(), RemoteCartError> {
            Ok(())
        }
        async fn clear(&self, _: &str) -> Result<(), RemoteCartError> {
            Ok(())
        }
    }

    struct NoDiscounts;

    #[async_trait]
    impl DiscountValidator for NoDiscounts {
        async fn validate(
            &self,
            code: &str,
            _subtotal: Money,
        ) -> Result<DiscountDescriptor, DiscountError> {
            Err(DiscountError::InvalidCode {
                code: code.to_string(),
                reason: RejectReason::NotFound,
            })
        }
    }

    /// Gateway double recording every draft it receives.
    struct StubGateway {
        fail: AtomicBool,
        calls: AtomicUsize,
        drafts: StdMutex<Vec<OrderDraft>>,
    }

    impl StubGateway {
        fn new() -> Arc<Self> {
            Arc::new(StubGateway {
                fail: AtomicBool::new(false),
                calls: AtomicUsize::new(0),
                drafts: StdMutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            let g = StubGateway::new();
            g.fail.store(true, Ordering::SeqCst);
            g
        }
    }

    #[async_trait]
    impl OrderGateway for StubGateway {
        async fn create_order(&self, draft: OrderDraft) -> Result<Order, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(GatewayError::Creation("backend unavailable".into()));
            }
            let order = Order {
                id: "ord-0001".to_string(),
                channel: draft.channel,
                items: draft.items.clone(),
                subtotal_cents: draft.subtotal_cents,
                discount_cents: draft.discount_cents,
                tax_cents: draft.tax_cents,
                shipping_cents: draft.shipping_cents,
                total_cents: draft.total_cents,
                payment: draft.payment,
                tendered_cents: draft.tendered_cents,
                change_cents: draft.change_cents,
                cashier: draft.cashier.clone(),
                created_at: Utc::now(),
            };
            self.drafts.lock().unwrap().push(draft);
            Ok(order)
        }

        async fn lookup_order(&self, order_id: &str) -> Result<Order, GatewayError> {
            Err(GatewayError::NotFound(order_id.to_string()))
        }

        async fn record_return(&self, _record: &ReturnRecord) -> Result<(), GatewayError> {
            Ok(())
        }
    }

    fn empty_cart() -> CartStore {
        CartStore::new(
            Arc::new(NoRemote),
            Arc::new(MemoryMirror::new()),
            Arc::new(NoDiscounts),
        )
    }

    #[test]
    fn test_shipping_cost_below_and_above_threshold() {
        let config = CheckoutConfig {
            free_shipping_threshold: Money::from_cents(2500),
            standard_rate: Money::from_cents(599),
            expedited_rate: Money::from_cents(1499),
        };

        // Subtotal 2000 below threshold 2500 → flat rate applies
        assert_eq!(
            shipping_cost(ShippingMethod::Standard, Money::from_cents(2000), &config).cents(),
            599
        );
        // Subtotal 3000 above threshold → free
        assert_eq!(
            shipping_cost(ShippingMethod::Standard, Money::from_cents(3000), &config).cents(),
            0
        );
        assert_eq!(
            shipping_cost(ShippingMethod::Expedited, Money::from_cents(2000), &config).cents(),
            1499
        );
        // Pickup is free regardless of subtotal
        assert_eq!(
            shipping_cost(ShippingMethod::Pickup, Money::from_cents(100), &config).cents(),
            0
        );
    }

    #[tokio::test]
    async fn test_place_order_success_clears_cart() {
        let gateway = StubGateway::new();
        let checkout = Checkout::new(CheckoutConfig::default(), gateway.clone());
        let mut cart = empty_cart();
        cart.add_to_cart(&product("1", 2000), 2).await.unwrap();

        let order = checkout
            .place_order(&mut cart, ShippingMethod::Standard, PaymentMethod::Card)
            .await
            .unwrap();

        assert_eq!(order.id, "ord-0001");
        assert_eq!(order.channel, SaleChannel::Storefront);
        assert_eq!(order.subtotal_cents, 4000);
        // Subtotal 4000 < threshold 5000 → standard rate 599 applies
        assert_eq!(order.shipping_cents, 599);
        assert_eq!(order.total_cents, 4599);
        assert!(cart.is_empty());
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_place_order_snapshots_resolved_prices() {
        let gateway = StubGateway::new();
        let checkout = Checkout::new(CheckoutConfig::default(), gateway.clone());
        let mut cart = empty_cart();

        let mut p = product("1", 1000);
        p.sale_price_cents = Some(750);
        p.is_on_sale = true;
        cart.add_to_cart(&p, 2).await.unwrap();

        checkout
            .place_order(&mut cart, ShippingMethod::Pickup, PaymentMethod::Card)
            .await
            .unwrap();

        let drafts = gateway.drafts.lock().unwrap();
        assert_eq!(drafts[0].items[0].unit_price_cents, 750);
        assert_eq!(drafts[0].items[0].line_total_cents, 1500);
    }

    #[tokio::test]
    async fn test_place_order_failure_leaves_cart_intact() {
        let checkout = Checkout::new(CheckoutConfig::default(), StubGateway::failing());
        let mut cart = empty_cart();
        cart.add_to_cart(&product("1", 2000), 1).await.unwrap();

        let err = checkout
            .place_order(&mut cart, ShippingMethod::Standard, PaymentMethod::Card)
            .await
            .unwrap_err();

        assert!(matches!(err, CartError::OrderCreation(_)));
        assert!(err.is_recoverable());
        // Cart untouched, ready for a user-initiated resubmission
        assert_eq!(cart.item_count(), 1);
    }

    #[tokio::test]
    async fn test_place_order_rejects_empty_cart() {
        let gateway = StubGateway::new();
        let checkout = Checkout::new(CheckoutConfig::default(), gateway.clone());
        let mut cart = empty_cart();

        let err = checkout
            .place_order(&mut cart, ShippingMethod::Standard, PaymentMethod::Card)
            .await
            .unwrap_err();

        assert!(matches!(err, CartError::EmptyCart));
        // No outbound call was made
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    }
}

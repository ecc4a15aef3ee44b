//! # Domain Types
//!
//! Core domain types shared by the storefront cart and the POS terminal.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    LineItem     │   │     Order       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  product_id     │   │  id             │       │
//! │  │  sku (business) │   │  frozen price   │   │  frozen items   │       │
//! │  │  price_cents    │   │  quantity       │   │  totals         │       │
//! │  │  sale_price     │   │  added_at       │   │  channel        │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    TaxRate      │   │  DiscountValue  │   │  ReturnRecord   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  Percentage     │   │  order_id       │       │
//! │  │  825 = 8.25%    │   │  Fixed          │   │  refund lines   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A `LineItem` freezes the product data at the moment it enters a cart, and
//! an `Order` freezes the resolved unit prices at the moment of sale. A
//! catalog price change after either point never alters what the buyer sees
//! in the cart or what a placed order totals to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::pricing;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01% = 1/10000. 825 bps = 8.25%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Stock Keeping Unit - business identifier.
    pub sku: String,

    /// Display name shown in the cart and on receipts.
    pub name: String,

    /// Regular price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Promotional price in cents, when one is configured.
    pub sale_price_cents: Option<i64>,

    /// Whether the promotional price is currently in effect.
    /// The sale price only applies when this is set AND a sale price exists.
    pub is_on_sale: bool,

    /// Known stock level. The POS add-to-cart ceiling checks against this.
    pub stock_quantity: i64,

    /// Whether product is active (soft delete).
    pub is_active: bool,

    /// When the product was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price a buyer actually pays right now.
    ///
    /// Sale price wins iff the product is flagged on sale and a sale price
    /// is set; otherwise the regular price.
    #[inline]
    pub fn unit_price(&self) -> Money {
        pricing::resolve_unit_price(self.price_cents, self.sale_price_cents, self.is_on_sale)
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One product + quantity entry within a cart.
///
/// ## Price Freezing
/// All product fields are captured at the moment the item is added. If the
/// catalog changes afterwards, this item keeps displaying and pricing with
/// the values the buyer saw.
///
/// ## Invariants
/// - `quantity >= 1` - an item that would reach 0 is removed, never stored
/// - at most one LineItem per `product_id` in any one cart
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    /// Product ID (UUID) for catalog lookup.
    pub product_id: String,

    /// SKU at time of adding (frozen).
    pub sku: String,

    /// Product name at time of adding (frozen).
    pub name: String,

    /// Regular price in cents at time of adding (frozen).
    pub price_cents: i64,

    /// Sale price in cents at time of adding (frozen).
    pub sale_price_cents: Option<i64>,

    /// Sale flag at time of adding (frozen).
    pub is_on_sale: bool,

    /// Stock level at time of adding (frozen). The POS ceiling check reads
    /// this snapshot rather than re-querying the catalog mid-sale.
    pub stock_quantity: i64,

    /// Quantity in cart.
    pub quantity: i64,

    /// When this item was added to the cart.
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl LineItem {
    /// Creates a new line item by snapshotting a product.
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        LineItem {
            product_id: product.id.clone(),
            sku: product.sku.clone(),
            name: product.name.clone(),
            price_cents: product.price_cents,
            sale_price_cents: product.sale_price_cents,
            is_on_sale: product.is_on_sale,
            stock_quantity: product.stock_quantity,
            quantity,
            added_at: Utc::now(),
        }
    }

    /// The frozen unit price (sale price iff on sale at add time).
    #[inline]
    pub fn unit_price(&self) -> Money {
        pricing::resolve_unit_price(self.price_cents, self.sale_price_cents, self.is_on_sale)
    }

    /// Line total (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price() * self.quantity
    }
}

// =============================================================================
// Discounts
// =============================================================================

/// The value of a discount - a percentage of the subtotal or a fixed amount.
///
/// Whatever the value, the *applied* amount is clamped to `[0, subtotal]`
/// by [`pricing::discount_amount`](crate::pricing::discount_amount).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum DiscountValue {
    /// Percentage off the subtotal, in basis points (1000 = 10%).
    Percentage(u32),
    /// Fixed amount off the subtotal.
    Fixed(Money),
}

/// A resolved, applicable promotional discount.
///
/// Produced by the discount validation collaborator; the engine never
/// decides on its own whether a code is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiscountDescriptor {
    /// The code the buyer entered (normalized by the validator).
    pub code: String,

    /// What the code is worth.
    pub value: DiscountValue,
}

// =============================================================================
// Payment Method & Sale Channel
// =============================================================================

/// How a transaction is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash at the POS terminal.
    Cash,
    /// Card, authorized through the external payment terminal.
    Card,
    /// E-wallet, authorized through the external payment provider.
    EWallet,
}

/// Which sales channel produced an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SaleChannel {
    /// Online storefront checkout.
    Storefront,
    /// In-person point-of-sale terminal.
    Pos,
}

// =============================================================================
// Order
// =============================================================================

/// A line item inside a placed order.
/// Carries the *resolved* unit price at time of sale - later catalog price
/// changes cannot retroactively alter a placed order.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderItem {
    pub product_id: String,
    /// SKU at time of sale (frozen).
    pub sku: String,
    /// Product name at time of sale (frozen).
    pub name: String,
    /// Resolved unit price in cents at time of sale (frozen).
    pub unit_price_cents: i64,
    /// Quantity sold.
    pub quantity: i64,
    /// Line total (unit price × quantity).
    pub line_total_cents: i64,
}

impl OrderItem {
    /// Builds an order item from a cart line, resolving the unit price.
    pub fn from_line(item: &LineItem) -> Self {
        OrderItem {
            product_id: item.product_id.clone(),
            sku: item.sku.clone(),
            name: item.name.clone(),
            unit_price_cents: item.unit_price().cents(),
            quantity: item.quantity,
            line_total_cents: item.line_total().cents(),
        }
    }

    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }
}

/// The payload handed to the order-creation collaborator.
///
/// Same shape as [`Order`] minus the fields the collaborator assigns
/// (`id`, `created_at`).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderDraft {
    pub channel: SaleChannel,
    pub items: Vec<OrderItem>,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub tax_cents: i64,
    pub shipping_cents: i64,
    pub total_cents: i64,
    pub payment: PaymentMethod,
    /// For cash: amount the customer handed over.
    pub tendered_cents: Option<i64>,
    /// For cash: change returned to the customer.
    pub change_cents: Option<i64>,
    /// Operator tag for POS sales.
    pub cashier: Option<String>,
}

/// An immutable record of a completed transaction.
///
/// Created exactly once by the order-creation collaborator. The pricing
/// engine never mutates it afterward - a return produces a separate
/// [`ReturnRecord`] referencing it.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Order {
    pub id: String,
    pub channel: SaleChannel,
    pub items: Vec<OrderItem>,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub tax_cents: i64,
    pub shipping_cents: i64,
    pub total_cents: i64,
    pub payment: PaymentMethod,
    pub tendered_cents: Option<i64>,
    pub change_cents: Option<i64>,
    pub cashier: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Finds an original line by product id (used by the returns flow).
    pub fn item(&self, product_id: &str) -> Option<&OrderItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }

    /// Returns the order total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Returns
// =============================================================================

/// One returned line within a return record.
/// Priced at the order's frozen unit price, never at today's catalog price.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReturnLine {
    pub product_id: String,
    pub name: String,
    /// Unit price frozen from the original order.
    pub unit_price_cents: i64,
    /// Quantity returned (bounded by the original line's quantity).
    pub quantity: i64,
}

impl ReturnLine {
    /// Refund amount for this line.
    #[inline]
    pub fn refund(&self) -> Money {
        Money::from_cents(self.unit_price_cents) * self.quantity
    }
}

/// A confirmed return against a historical order.
///
/// Recording it reconciles stock upward by the returned quantities on the
/// collaborator side. The referenced order's totals are never touched.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReturnRecord {
    pub id: String,
    /// The order this return refunds against.
    pub order_id: String,
    pub lines: Vec<ReturnLine>,
    /// Total refunded to the customer.
    pub refund_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

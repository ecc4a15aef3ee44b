//! # Durable Cart Mirror
//!
//! Write-through persistence for the unauthenticated (LOCAL-regime) cart.
//!
//! ## Contract
//! The mirror is an opaque key-value store keyed by a fixed cart key - the
//! host application backs it with whatever it has (browser storage, an app
//! data file, a table). The store writes the serialized line list after
//! every successful local mutation and reads it once on cold start when no
//! authenticated identity is bound.
//!
//! Write-through, not write-back: losing a single mirror write is tolerated
//! because the next mutation rewrites the full list.

use std::collections::HashMap;
use std::sync::Mutex;

use vela_core::LineItem;

use crate::error::MirrorError;

/// The fixed key the serialized cart line list lives under.
pub const CART_MIRROR_KEY: &str = "vela.cart.lines.v1";

/// A durable key-value mirror for the local cart.
///
/// Implementations must be cheap and synchronous - this is local storage,
/// not a network call, and mutations never suspend on it.
pub trait CartMirror: Send + Sync {
    /// Stores a payload under a key, replacing any previous value.
    fn put(&self, key: &str, payload: &str) -> Result<(), MirrorError>;

    /// Loads the payload stored under a key, if any.
    fn get(&self, key: &str) -> Result<Option<String>, MirrorError>;
}

/// Serializes a line list for the mirror.
pub fn encode_lines(items: &[LineItem]) -> Result<String, MirrorError> {
    serde_json::to_string(items).map_err(|e| MirrorError::Write(e.to_string()))
}

/// Deserializes a mirror payload back into a line list.
pub fn decode_lines(payload: &str) -> Result<Vec<LineItem>, MirrorError> {
    serde_json::from_str(payload).map_err(|e| MirrorError::Corrupt(e.to_string()))
}

// =============================================================================
// In-Memory Mirror
// =============================================================================

/// An in-memory [`CartMirror`].
///
/// Used by tests and by hosts that opt out of durability (the cart then
/// simply starts empty on every launch).
#[derive(Debug, Default)]
pub struct MemoryMirror {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryMirror {
    /// Creates an empty in-memory mirror.
    pub fn new() -> Self {
        MemoryMirror::default()
    }
}

impl CartMirror for MemoryMirror {
    fn put(&self, key: &str, payload: &str) -> Result<(), MirrorError> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|_| MirrorError::Write("mirror lock poisoned".to_string()))?;
        slots.insert(key.to_string(), payload.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>, MirrorError> {
        let slots = self
            .slots
            .lock()
            .map_err(|_| MirrorError::Read("mirror lock poisoned".to_string()))?;
        Ok(slots.get(key).cloned())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use vela_core::Product;

    fn line(id: &str, price: i64, qty: i64) -> LineItem {
        let product = Product {
            id: id.to_string(),
            sku: format!("SKU-{}", id),
            name: format!("Product {}", id),
            price_cents: price,
            sale_price_cents: None,
            is_on_sale: false,
            stock_quantity: 50,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        LineItem::from_product(&product, qty)
    }

    #[test]
    fn test_round_trip_preserves_items_and_quantities() {
        let items = vec![line("1", 999, 2), line("2", 1500, 1)];

        let mirror = MemoryMirror::new();
        mirror
            .put(CART_MIRROR_KEY, &encode_lines(&items).unwrap())
            .unwrap();

        let payload = mirror.get(CART_MIRROR_KEY).unwrap().unwrap();
        let restored = decode_lines(&payload).unwrap();

        assert_eq!(restored.len(), 2);
        assert_eq!(restored[0].product_id, "1");
        assert_eq!(restored[0].quantity, 2);
        assert_eq!(restored[0].price_cents, 999);
        assert_eq!(restored[1].product_id, "2");
        assert_eq!(restored[1].quantity, 1);
    }

    #[test]
    fn test_get_missing_key() {
        let mirror = MemoryMirror::new();
        assert!(mirror.get(CART_MIRROR_KEY).unwrap().is_none());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode_lines("not json"),
            Err(MirrorError::Corrupt(_))
        ));
    }
}

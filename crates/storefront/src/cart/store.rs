//! Cart persistence.

use std::sync::Arc;

use mi_catalogo_core::Cart;

use crate::storage::{LocalStorage, StorageError};

/// Storage key holding the JSON-encoded cart.
pub const CART_KEY: &str = "mi_catalogo_cart_v1";

/// Loads and saves the cart as a JSON array under [`CART_KEY`].
#[derive(Clone)]
pub struct CartStore {
    storage: Arc<dyn LocalStorage>,
}

impl CartStore {
    #[must_use]
    pub fn new(storage: Arc<dyn LocalStorage>) -> Self {
        Self { storage }
    }

    /// Read the persisted cart.
    ///
    /// A missing key, an unreadable backend, or content that does not parse
    /// all yield an empty cart. Corruption is logged, never surfaced.
    #[must_use]
    pub fn load(&self) -> Cart {
        let raw = match self.storage.get_item(CART_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Cart::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stored cart, starting empty");
                return Cart::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Stored cart is not valid JSON, starting empty");
            Cart::new()
        })
    }

    /// Overwrite the persisted cart with `cart`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value could not be written.
    pub fn save(&self, cart: &Cart) -> Result<(), StorageError> {
        let json = serde_json::to_string(cart)
            .map_err(|e| StorageError::Unavailable(format!("cart serialization failed: {e}")))?;
        self.storage.set_item(CART_KEY, &json)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use mi_catalogo_core::{NewLineItem, UnitPrice};
    use rust_decimal::Decimal;

    use super::*;
    use crate::storage::MemoryStorage;

    fn sample_cart() -> Cart {
        let mut cart = Cart::new();
        for (name, cents) in [("Mug", 950), ("Pen", 120), ("Mug", 950)] {
            cart.add_or_increment(NewLineItem {
                name: name.to_string(),
                unit_price: UnitPrice::from_amount(Decimal::new(cents, 2)),
                image_url: String::new(),
            });
        }
        cart
    }

    #[test]
    fn test_load_missing_is_empty() {
        let store = CartStore::new(Arc::new(MemoryStorage::new()));
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_load_invalid_json_is_empty() {
        let storage = MemoryStorage::new().with_item(CART_KEY, "{not json at all");
        let store = CartStore::new(Arc::new(storage));
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_load_wrong_shape_is_empty() {
        let storage = MemoryStorage::new().with_item(CART_KEY, r#"{"items": 3}"#);
        let store = CartStore::new(Arc::new(storage));
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let store = CartStore::new(Arc::new(MemoryStorage::new()));
        let cart = sample_cart();

        store.save(&cart).unwrap();
        assert_eq!(store.load(), cart);
    }

    #[test]
    fn test_save_overwrites_whole_value() {
        let storage = Arc::new(MemoryStorage::new());
        let store = CartStore::new(storage.clone());

        store.save(&sample_cart()).unwrap();
        store.save(&Cart::new()).unwrap();

        assert_eq!(storage.get_item(CART_KEY).unwrap().as_deref(), Some("[]"));
        assert_eq!(storage.writes(), 2);
    }

    #[test]
    fn test_save_reports_storage_failure() {
        let store = CartStore::new(Arc::new(MemoryStorage::read_only()));
        assert!(store.save(&sample_cart()).is_err());
    }
}

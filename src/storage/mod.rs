//! Key-value blob storage and the persisted cart mirror built on top of it.

pub mod file;
pub mod memory;

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{Cart, CartEntry};
use crate::error::StorageError;

pub use file::FileStore;
pub use memory::MemoryStore;

pub const DEFAULT_CART_KEY: &str = "@RocketShoes:cart";

/// Synchronous key-value store holding opaque text blobs.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// The persisted copy of the cart, stored as a JSON array under a fixed key.
#[derive(Clone)]
pub struct CartMirror {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl std::fmt::Debug for CartMirror {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartMirror").field("key", &self.key).finish()
    }
}

impl CartMirror {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self { store, key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reads the stored cart, falling back to an empty cart when nothing usable is stored.
    ///
    /// Only a failing store is an error. An unparsable blob or invalid entries are
    /// logged and skipped.
    pub fn load(&self) -> Result<Cart, StorageError> {
        let Some(raw) = self.store.get(&self.key)? else {
            debug!(key = %self.key, "No stored cart");
            return Ok(Cart::default());
        };

        let entries: Vec<CartEntry> = match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Stored cart is unreadable, starting empty");
                return Ok(Cart::default());
            }
        };

        let (cart, dropped) = Cart::sanitized(entries);
        if dropped > 0 {
            warn!(key = %self.key, dropped, "Dropped invalid entries from stored cart");
        }
        debug!(key = %self.key, entries = cart.len(), "Loaded stored cart");
        Ok(cart)
    }

    pub fn save(&self, cart: &Cart) -> Result<(), StorageError> {
        let raw = serde_json::to_string(cart)?;
        self.store.set(&self.key, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Product;

    fn mirror() -> (Arc<MemoryStore>, CartMirror) {
        let store = Arc::new(MemoryStore::new());
        let mirror = CartMirror::new(store.clone(), DEFAULT_CART_KEY);
        (store, mirror)
    }

    #[test]
    fn load_without_blob_is_empty() {
        let (_store, mirror) = mirror();
        assert!(mirror.load().unwrap().is_empty());
    }

    #[test]
    fn save_then_load_returns_same_cart() {
        let (store, mirror) = mirror();
        let cart = Cart::new(vec![CartEntry { product: Product::new(1, "Boot", 200.0, "b.png"), amount: 2 }]);

        mirror.save(&cart).unwrap();
        assert_eq!(mirror.load().unwrap(), cart);
        assert!(store.get(DEFAULT_CART_KEY).unwrap().unwrap().starts_with('['));
    }

    #[test]
    fn unreadable_blob_loads_empty() {
        let (store, mirror) = mirror();
        store.set(DEFAULT_CART_KEY, "{broken").unwrap();
        assert!(mirror.load().unwrap().is_empty());
    }

    #[test]
    fn invalid_entries_are_dropped_on_load() {
        let (store, mirror) = mirror();
        store
            .set(
                DEFAULT_CART_KEY,
                r#"[{"id":1,"title":"A","price":1.0,"image":"","amount":0},
                    {"id":2,"title":"B","price":1.0,"image":"","amount":3},
                    {"id":2,"title":"B","price":1.0,"image":"","amount":1}]"#,
            )
            .unwrap();

        let cart = mirror.load().unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.amount_of(2), 3);
    }
}

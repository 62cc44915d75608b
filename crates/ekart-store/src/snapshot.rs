//! # Persisted Cart Snapshot
//!
//! The versioned record the cart is saved as.
//!
//! ## Layout
//! ```text
//! key: "ekart-cart-storage"
//! {
//!   "version": 1,
//!   "state": {
//!     "cart": {
//!       "id": "…", "items": [ { "id", "productId", "product", "quantity",
//!                               "addedAt" } ],
//!       "totalItems", "subtotal", "tax", "shipping", "total",
//!       "currency": "USD", "updatedAt": "2026-03-01T12:00:00Z"
//!     }
//!   }
//! }
//! ```
//! Timestamps are RFC 3339 strings and come back as `DateTime<Utc>`.
//! Aggregates are stored for readers of the raw record; loaders must not trust
//! them (see `Cart::reconcile`).

use ekart_core::Cart;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::storage::CartStorage;

/// Storage key of the cart record.
pub const CART_STORAGE_KEY: &str = "ekart-cart-storage";

/// Bump when the cart layout changes; older records are discarded.
pub const CART_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Envelope<S> {
    version: u32,
    state: S,
}

#[derive(Debug, Serialize)]
struct StateRef<'a> {
    cart: &'a Cart,
}

#[derive(Debug, Deserialize)]
struct StateOwned {
    cart: Cart,
}

/// Encodes `cart` as a versioned record.
pub fn encode_cart(cart: &Cart) -> StoreResult<String> {
    let envelope = Envelope {
        version: CART_SCHEMA_VERSION,
        state: StateRef { cart },
    };
    serde_json::to_string(&envelope).map_err(|e| StoreError::Serialization(e.to_string()))
}

/// Decodes a versioned record.
///
/// ## Errors
/// - `Corrupt` if `raw` is not JSON, has no numeric `version`, or the cart
///   does not parse
/// - `VersionMismatch` if the version is not `CART_SCHEMA_VERSION`
pub fn decode_cart(raw: &str) -> StoreResult<Cart> {
    let value: Value = serde_json::from_str(raw).map_err(|e| StoreError::corrupt(e.to_string()))?;

    let found = value
        .get("version")
        .and_then(Value::as_u64)
        .ok_or_else(|| StoreError::corrupt("missing schema version"))?;
    if found != u64::from(CART_SCHEMA_VERSION) {
        return Err(StoreError::VersionMismatch {
            found,
            expected: CART_SCHEMA_VERSION,
        });
    }

    let envelope: Envelope<StateOwned> =
        serde_json::from_value(value).map_err(|e| StoreError::corrupt(e.to_string()))?;
    Ok(envelope.state.cart)
}

/// Loads the persisted cart. `Ok(None)` when nothing was saved yet.
pub fn load_cart(storage: &dyn CartStorage) -> StoreResult<Option<Cart>> {
    match storage.get(CART_STORAGE_KEY)? {
        Some(raw) => {
            let cart = decode_cart(&raw)?;
            debug!(cart_id = %cart.id(), items = cart.items().len(), "Loaded persisted cart");
            Ok(Some(cart))
        }
        None => Ok(None),
    }
}

/// Persists `cart`, replacing the previous record.
pub fn save_cart(storage: &dyn CartStorage, cart: &Cart) -> StoreResult<()> {
    let raw = encode_cart(cart)?;
    storage.set(CART_STORAGE_KEY, &raw)
}

/// Deletes the persisted cart record.
pub fn discard_cart(storage: &dyn CartStorage) -> StoreResult<()> {
    storage.remove(CART_STORAGE_KEY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use ekart_core::{PricingPolicy, Product};

    fn sample_cart() -> Cart {
        let policy = PricingPolicy::default();
        let mut cart = Cart::new(policy.currency.clone());
        cart.add_item(&Product::new("p-1", "Desk Lamp", 4999), 2, &policy)
            .unwrap();
        cart
    }

    #[test]
    fn test_roundtrip_keeps_timestamps_and_items() {
        let storage = MemoryStorage::new();
        let cart = sample_cart();

        save_cart(&storage, &cart).unwrap();
        let loaded = load_cart(&storage).unwrap().unwrap();

        assert_eq!(loaded, cart);
        assert_eq!(loaded.items()[0].added_at, cart.items()[0].added_at);
    }

    #[test]
    fn test_layout_is_versioned_envelope() {
        let raw = encode_cart(&sample_cart()).unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();

        assert_eq!(value["version"], 1);
        assert_eq!(value["state"]["cart"]["items"][0]["productId"], "p-1");
        assert_eq!(value["state"]["cart"]["currency"], "USD");
        assert!(value["state"]["cart"]["updatedAt"].is_string());
    }

    #[test]
    fn test_missing_record_is_none() {
        assert!(load_cart(&MemoryStorage::new()).unwrap().is_none());
    }

    #[test]
    fn test_other_version_is_rejected() {
        let raw = encode_cart(&sample_cart()).unwrap();
        let mut value: Value = serde_json::from_str(&raw).unwrap();
        value["version"] = serde_json::json!(2);

        let err = decode_cart(&value.to_string()).unwrap_err();
        assert!(matches!(
            err,
            StoreError::VersionMismatch {
                found: 2,
                expected: 1
            }
        ));
    }

    #[test]
    fn test_garbage_is_corrupt() {
        for raw in ["not json", "{}", r#"{"version":1,"state":{}}"#, r#"{"version":"1"}"#] {
            let err = decode_cart(raw).unwrap_err();
            assert!(matches!(err, StoreError::Corrupt(_)), "{raw}: {err:?}");
        }
    }

    #[test]
    fn test_discard_removes_record() {
        let storage = MemoryStorage::new();
        save_cart(&storage, &sample_cart()).unwrap();
        discard_cart(&storage).unwrap();
        assert!(storage.is_empty());
    }
}

//! End-to-end behavior of the cart engine against real storage backends.

use std::sync::{Arc, Mutex};
use std::thread;

use ekart_core::{Money, PricingPolicy, Product};
use ekart_storefront::state::{CartChange, CartEngine, CatalogState};
use ekart_store::{
    load_cart, CartStorage, FileStorage, MemoryStorage, StoreError, StoreResult, CART_STORAGE_KEY,
};
use tempfile::tempdir;

fn engine_on(storage: Arc<dyn CartStorage>) -> CartEngine {
    CartEngine::init(storage, PricingPolicy::default())
}

fn headphones() -> Product {
    let mut product = Product::new("1", "Wireless Bluetooth Headphones", 9999);
    product.original_price_cents = Some(12999);
    product
}

fn yoga_mat() -> Product {
    Product::new("5", "Yoga Mat Pro", 5000)
}

/// Accepts reads, rejects every write.
struct ReadOnlyStorage;

impl CartStorage for ReadOnlyStorage {
    fn get(&self, _key: &str) -> StoreResult<Option<String>> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> StoreResult<()> {
        Err(StoreError::unavailable("storage is read-only"))
    }

    fn remove(&self, _key: &str) -> StoreResult<()> {
        Err(StoreError::unavailable("storage is read-only"))
    }
}

// =============================================================================
// Pricing scenarios
// =============================================================================

#[test]
fn scenario_single_item_over_free_shipping_threshold() {
    let engine = engine_on(Arc::new(MemoryStorage::new()));
    engine.add_item(&headphones(), 1).unwrap();

    let cart = engine.cart();
    assert_eq!(cart.subtotal(), Money::from_cents(9999));
    assert_eq!(cart.tax(), Money::from_cents(800));
    assert_eq!(cart.shipping(), Money::zero());
    assert_eq!(cart.total(), Money::from_cents(10799));
}

#[test]
fn scenario_single_item_below_threshold_pays_shipping() {
    let engine = engine_on(Arc::new(MemoryStorage::new()));
    engine.add_item(&yoga_mat(), 1).unwrap();

    let cart = engine.cart();
    assert_eq!(cart.subtotal(), Money::from_cents(5000));
    assert_eq!(cart.tax(), Money::from_cents(400));
    assert_eq!(cart.shipping(), Money::from_cents(1000));
    assert_eq!(cart.total(), Money::from_cents(6400));
}

#[test]
fn scenario_merge_update_remove() {
    let engine = engine_on(Arc::new(MemoryStorage::new()));
    let mat = yoga_mat();

    engine.add_item(&mat, 1).unwrap();
    engine.add_item(&mat, 2).unwrap();
    assert_eq!(engine.cart().items().len(), 1);
    assert_eq!(engine.get_item_quantity("5"), 3);

    engine.update_item_quantity("5", 5).unwrap();
    assert_eq!(engine.get_item_quantity("5"), 5);

    assert!(engine.remove_item("5"));
    let cart = engine.cart();
    assert!(cart.items().is_empty());
    assert_eq!(cart.total_items(), 0);
    assert_eq!(cart.subtotal(), Money::zero());
    assert_eq!(cart.shipping(), Money::zero());
    assert_eq!(cart.total(), Money::zero());
}

// =============================================================================
// Persistence
// =============================================================================

#[test]
fn cart_survives_restart_with_file_storage() {
    let dir = tempdir().unwrap();

    {
        let engine = engine_on(Arc::new(FileStorage::open(dir.path()).unwrap()));
        engine.add_item(&headphones(), 2).unwrap();
        engine.add_item(&yoga_mat(), 1).unwrap();
    }

    let engine = engine_on(Arc::new(FileStorage::open(dir.path()).unwrap()));
    let cart = engine.cart();
    let ids: Vec<&str> = cart.items().iter().map(|i| i.product_id.as_str()).collect();
    assert_eq!(ids, vec!["1", "5"]);
    assert_eq!(cart.total_items(), 3);
    assert_eq!(cart.subtotal(), Money::from_cents(2 * 9999 + 5000));
    assert_eq!(cart.items()[0].product.original_price_cents, Some(12999));
}

#[test]
fn restored_totals_are_recomputed() {
    let storage = Arc::new(MemoryStorage::new());
    {
        let engine = engine_on(storage.clone());
        engine.add_item(&yoga_mat(), 1).unwrap();
    }

    // Tamper with the stored aggregates; the line items are the source of truth.
    let raw = storage.get(CART_STORAGE_KEY).unwrap().unwrap();
    let mut value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    value["state"]["cart"]["total"] = serde_json::json!(1);
    value["state"]["cart"]["subtotal"] = serde_json::json!(1);
    storage
        .set(CART_STORAGE_KEY, &value.to_string())
        .unwrap();

    let engine = engine_on(storage);
    assert_eq!(engine.cart().total(), Money::from_cents(6400));
}

#[test]
fn corrupt_record_is_discarded() {
    let dir = tempdir().unwrap();
    let file = dir.path().join(format!("{}.json", CART_STORAGE_KEY));
    std::fs::write(&file, "{ not json").unwrap();

    let storage = Arc::new(FileStorage::open(dir.path()).unwrap());
    let engine = engine_on(storage.clone());

    assert!(engine.cart().is_empty());
    assert!(!file.exists());
    assert!(load_cart(storage.as_ref()).unwrap().is_none());
}

#[test]
fn other_schema_version_is_discarded() {
    let storage = Arc::new(MemoryStorage::new());
    storage
        .set(
            CART_STORAGE_KEY,
            r#"{"version":2,"state":{"cart":{"items":[]}}}"#,
        )
        .unwrap();

    let engine = engine_on(storage.clone());

    assert!(engine.cart().is_empty());
    assert!(storage.get(CART_STORAGE_KEY).unwrap().is_none());
}

#[test]
fn inconsistent_record_is_discarded() {
    let tampers: [fn(&mut serde_json::Value); 2] = [
        |cart| cart["items"][0]["quantity"] = serde_json::json!(0),
        |cart| {
            let line = cart["items"][0].clone();
            cart["items"].as_array_mut().unwrap().push(line);
        },
    ];

    for tamper in tampers {
        let storage = Arc::new(MemoryStorage::new());
        {
            let engine = engine_on(storage.clone());
            engine.add_item(&yoga_mat(), 2).unwrap();
        }

        let raw = storage.get(CART_STORAGE_KEY).unwrap().unwrap();
        let mut value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        tamper(&mut value["state"]["cart"]);
        storage
            .set(CART_STORAGE_KEY, &value.to_string())
            .unwrap();

        let engine = engine_on(storage.clone());

        assert!(engine.cart().is_empty());
        assert!(storage.get(CART_STORAGE_KEY).unwrap().is_none());
    }
}

#[test]
fn write_failures_do_not_roll_back_mutations() {
    let engine = engine_on(Arc::new(ReadOnlyStorage));

    engine.add_item(&yoga_mat(), 2).unwrap();
    assert_eq!(engine.get_item_quantity("5"), 2);
    assert!(matches!(engine.flush(), Err(StoreError::Unavailable(_))));
}

#[test]
fn quota_exceeded_keeps_previous_record() {
    let storage = Arc::new(MemoryStorage::with_quota(1));
    let engine = engine_on(storage.clone());

    engine.add_item(&yoga_mat(), 1).unwrap();
    assert_eq!(engine.get_item_quantity("5"), 1);
    assert!(storage.get(CART_STORAGE_KEY).unwrap().is_none());
}

#[test]
fn rejected_mutation_persists_nothing() {
    let storage = Arc::new(MemoryStorage::new());
    let engine = engine_on(storage.clone());

    assert!(engine.add_item(&yoga_mat(), 0).is_err());
    assert!(storage.get(CART_STORAGE_KEY).unwrap().is_none());
}

// =============================================================================
// Concurrency and listeners
// =============================================================================

#[test]
fn concurrent_adds_lose_no_updates() {
    let engine = engine_on(Arc::new(MemoryStorage::new()));
    let mat = yoga_mat();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let engine = engine.clone();
            let mat = mat.clone();
            thread::spawn(move || {
                for _ in 0..25 {
                    engine.add_item(&mat, 1).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let cart = engine.cart();
    assert_eq!(cart.total_items(), 200);
    assert_eq!(cart.subtotal(), Money::from_cents(200 * 5000));
}

#[test]
fn listeners_see_every_mutation_in_order() {
    let engine = engine_on(Arc::new(MemoryStorage::new()));
    let seen: Arc<Mutex<Vec<(CartChange, i64)>>> = Arc::new(Mutex::new(Vec::new()));

    let sink = seen.clone();
    let id = engine.subscribe(move |change, cart| {
        sink.lock().unwrap().push((change.clone(), cart.total_items()));
    });

    let mat = yoga_mat();
    engine.add_item(&mat, 2).unwrap();
    engine.update_item_quantity("5", 4).unwrap();
    engine.remove_item("5");
    engine.clear_cart();
    let _ = engine.add_item(&mat, -1);

    let seen = seen.lock().unwrap().clone();
    assert_eq!(
        seen,
        vec![
            (
                CartChange::ItemAdded {
                    product_id: "5".into(),
                    quantity: 2
                },
                2
            ),
            (
                CartChange::QuantityUpdated {
                    product_id: "5".into(),
                    quantity: 4
                },
                4
            ),
            (
                CartChange::ItemRemoved {
                    product_id: "5".into()
                },
                0
            ),
            (CartChange::Cleared, 0),
        ]
    );

    assert!(engine.unsubscribe(id));
    assert!(!engine.unsubscribe(id));
}

#[test]
fn checkout_through_commands_empties_persisted_cart() {
    use ekart_core::{CardDetails, CheckoutForm, PaymentMethodKind, ShippingAddress};
    use ekart_storefront::commands::{cart, checkout};

    let dir = tempdir().unwrap();
    let storage = Arc::new(FileStorage::open(dir.path()).unwrap());
    let engine = engine_on(storage.clone());
    let catalog = CatalogState::sample();

    cart::add_to_cart(&engine, &catalog, "4", Some(2)).unwrap();

    let form = CheckoutForm {
        email: "lin@example.com".to_string(),
        first_name: "Lin".to_string(),
        last_name: "Wu".to_string(),
        phone: None,
        address: ShippingAddress {
            first_name: "Lin".to_string(),
            last_name: "Wu".to_string(),
            address_line1: "9 Elm St".to_string(),
            city: "Portland".to_string(),
            state: "OR".to_string(),
            postal_code: "97201".to_string(),
            country: "US".to_string(),
            ..ShippingAddress::default()
        },
        payment_method: PaymentMethodKind::DebitCard,
        card: Some(CardDetails {
            card_number: "5555 5555 5555 4444".to_string(),
            expiry_date: "01/29".to_string(),
            cvv: "321".to_string(),
            cardholder_name: "Lin Wu".to_string(),
        }),
    };

    let confirmation = checkout::place_order(&engine, &form).unwrap();
    // 2 x $49.99 = $99.98, tax $8.00, free shipping
    assert_eq!(confirmation.formatted_total, "$107.98");

    let restored = load_cart(storage.as_ref()).unwrap().unwrap();
    assert!(restored.is_empty());

    let err = checkout::place_order(&engine, &form).unwrap_err();
    assert_eq!(err.code, ekart_storefront::error::ErrorCode::CartError);
}

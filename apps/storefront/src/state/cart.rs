//! # Cart Engine
//!
//! The single owner and mutator of the shopping cart.
//!
//! ## Thread Safety
//! The cart is wrapped in `Arc<Mutex<T>>` because:
//! 1. The UI, CLI and checkout flow all hold handles to the same engine
//! 2. Every mutation is one read-modify-write that must not interleave
//!    (two `add_item` calls on the same product must both count)
//!
//! ## Mutation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Engine Mutation                                 │
//! │                                                                         │
//! │  add_item / remove_item / update_item_quantity / clear_cart / checkout  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌──────────────── cart lock held ────────────────┐                    │
//! │  │  1. mutate Cart (ekart-core recomputes totals) │                    │
//! │  │  2. save_cart(storage)   best-effort, warn!    │                    │
//! │  │  3. snapshot = cart.clone()                    │                    │
//! │  └────────────────────────────────────────────────┘                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  4. listeners(change, &snapshot)   lock released, so listeners may     │
//! │                                    call back into the engine           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  5. return to caller                                                    │
//! │                                                                         │
//! │  NOTE: a rejected mutation (bad quantity, overflow) changes nothing,   │
//! │        persists nothing and notifies no one.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Notifications from two threads may reach a listener in either order. Each
//! one carries the full cart as it was right after its own mutation.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use ekart_core::{Cart, CheckoutForm, CoreResult, Order, PricingPolicy, Product};
use ekart_store::{discard_cart, load_cart, save_cart, CartStorage, StoreResult};
use serde::Serialize;
use tracing::{debug, info, warn};

// =============================================================================
// Change Notifications
// =============================================================================

/// What a mutation did, delivered to listeners with the new cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CartChange {
    #[serde(rename_all = "camelCase")]
    ItemAdded { product_id: String, quantity: i64 },

    #[serde(rename_all = "camelCase")]
    ItemRemoved { product_id: String },

    #[serde(rename_all = "camelCase")]
    QuantityUpdated { product_id: String, quantity: i64 },

    Cleared,

    #[serde(rename_all = "camelCase")]
    CheckedOut { order_number: String },

    /// A remove or update named a product that is not in the cart. Only
    /// `updated_at` moved.
    #[serde(rename_all = "camelCase")]
    Touched { product_id: String },
}

/// Handle returned by [`CartEngine::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(&CartChange, &Cart) + Send + Sync>;

// =============================================================================
// Cart Engine
// =============================================================================

/// Cart state shared by every consumer of the storefront.
///
/// Cloning is cheap and yields a handle to the same cart.
#[derive(Clone)]
pub struct CartEngine {
    cart: Arc<Mutex<Cart>>,
    storage: Arc<dyn CartStorage>,
    policy: PricingPolicy,
    listeners: Arc<Mutex<Vec<(SubscriptionId, Listener)>>>,
    next_subscription: Arc<AtomicU64>,
}

impl CartEngine {
    /// Restores the persisted cart, or starts an empty one.
    ///
    /// ## Restore Rules
    /// ```text
    /// nothing stored ─────────────────────► fresh cart
    /// corrupt / other schema version ─────► discard record, fresh cart
    /// storage unreadable ─────────────────► fresh cart (record kept)
    /// cart breaks an invariant ───────────► discard record, fresh cart
    /// valid cart ─────────────────────────► restored, totals recomputed
    /// ```
    /// Never fails: the storefront always opens with a usable cart.
    pub fn init(storage: Arc<dyn CartStorage>, policy: PricingPolicy) -> Self {
        let cart = Self::restore(storage.as_ref(), &policy);

        CartEngine {
            cart: Arc::new(Mutex::new(cart)),
            storage,
            policy,
            listeners: Arc::new(Mutex::new(Vec::new())),
            next_subscription: Arc::new(AtomicU64::new(1)),
        }
    }

    fn restore(storage: &dyn CartStorage, policy: &PricingPolicy) -> Cart {
        match load_cart(storage) {
            Ok(Some(mut cart)) => match cart.reconcile(policy) {
                Ok(()) => {
                    info!(
                        cart_id = %cart.id(),
                        items = cart.items().len(),
                        total = %cart.total(),
                        "Restored persisted cart"
                    );
                    cart
                }
                Err(e) => {
                    warn!(error = %e, "Persisted cart is inconsistent, starting fresh");
                    if let Err(e) = discard_cart(storage) {
                        warn!(error = %e, "Failed to discard persisted cart");
                    }
                    Cart::new(policy.currency.clone())
                }
            },
            Ok(None) => {
                debug!("No persisted cart, starting fresh");
                Cart::new(policy.currency.clone())
            }
            Err(e) if e.is_discardable() => {
                warn!(error = %e, "Discarding unusable persisted cart");
                if let Err(e) = discard_cart(storage) {
                    warn!(error = %e, "Failed to discard persisted cart");
                }
                Cart::new(policy.currency.clone())
            }
            Err(e) => {
                warn!(error = %e, "Could not read persisted cart, starting fresh");
                Cart::new(policy.currency.clone())
            }
        }
    }

    pub fn policy(&self) -> &PricingPolicy {
        &self.policy
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds `quantity` of `product`, merging with an existing line item.
    ///
    /// The product snapshot of an existing line item is kept as is.
    pub fn add_item(&self, product: &Product, quantity: i64) -> CoreResult<()> {
        debug!(product_id = %product.id, quantity, "add_item");
        self.mutate(|cart, policy| {
            cart.add_item(product, quantity, policy)?;
            Ok((
                (),
                CartChange::ItemAdded {
                    product_id: product.id.clone(),
                    quantity,
                },
            ))
        })
    }

    /// `add_item(product, 1)`.
    pub fn add_one(&self, product: &Product) -> CoreResult<()> {
        self.add_item(product, 1)
    }

    /// Removes the line item for `product_id`. Returns whether one existed.
    pub fn remove_item(&self, product_id: &str) -> bool {
        debug!(product_id = %product_id, "remove_item");
        let removed = self.mutate(|cart, policy| {
            let removed = cart.remove_item(product_id, policy);
            let product_id = product_id.to_string();
            let change = if removed {
                CartChange::ItemRemoved { product_id }
            } else {
                CartChange::Touched { product_id }
            };
            Ok((removed, change))
        });
        // Removal has no failure path.
        removed.unwrap_or(false)
    }

    /// Sets the quantity of `product_id` exactly; ≤ 0 removes it.
    ///
    /// Only fails with `QuantityOverflow`.
    pub fn update_item_quantity(&self, product_id: &str, quantity: i64) -> CoreResult<()> {
        debug!(product_id = %product_id, quantity, "update_item_quantity");
        self.mutate(|cart, policy| {
            let matched = cart.update_quantity(product_id, quantity, policy)?;
            let product_id = product_id.to_string();
            let change = if !matched {
                CartChange::Touched { product_id }
            } else if quantity <= 0 {
                CartChange::ItemRemoved { product_id }
            } else {
                CartChange::QuantityUpdated {
                    product_id,
                    quantity,
                }
            };
            Ok(((), change))
        })
    }

    /// Resets to an empty cart with a new identifier.
    pub fn clear_cart(&self) {
        debug!("clear_cart");
        if let Err(e) = self.mutate(|cart, policy| {
            cart.clear(policy);
            Ok(((), CartChange::Cleared))
        }) {
            warn!(error = %e, "clear_cart failed");
        }
    }

    /// Turns the cart into an order and empties it, as one step.
    ///
    /// ## Errors
    /// - `CoreError::EmptyCart` when there is nothing to order
    /// - `CoreError::Checkout` listing every invalid form field
    ///
    /// On error the cart is left as it was.
    pub fn checkout(&self, form: &CheckoutForm) -> CoreResult<Order> {
        debug!("checkout");
        self.mutate(|cart, policy| {
            let order = Order::from_cart(cart, form)?;
            cart.clear(policy);
            let change = CartChange::CheckedOut {
                order_number: order.order_number.clone(),
            };
            Ok((order, change))
        })
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Quantity of `product_id`, 0 when absent.
    pub fn get_item_quantity(&self, product_id: &str) -> i64 {
        self.lock().item_quantity(product_id)
    }

    pub fn is_item_in_cart(&self, product_id: &str) -> bool {
        self.lock().contains(product_id)
    }

    /// Snapshot of the current cart.
    pub fn cart(&self) -> Cart {
        self.lock().clone()
    }

    /// Runs `f` against the current cart without cloning it.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let total = engine.with_cart(|cart| cart.total());
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.lock();
        f(&cart)
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    /// Registers `listener` for every subsequent successful mutation.
    ///
    /// Listeners run on the mutating thread after the cart lock is released,
    /// before the mutating call returns.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&CartChange, &Cart) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.lock_listeners().push((id, Arc::new(listener)));
        debug!(subscription = id.0, "Cart listener subscribed");
        id
    }

    /// Removes a listener. Returns whether it was registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.lock_listeners();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    // =========================================================================
    // Teardown
    // =========================================================================

    /// Persists the current cart, reporting failure to the caller.
    pub fn flush(&self) -> StoreResult<()> {
        let cart = self.lock();
        save_cart(self.storage.as_ref(), &cart)?;
        debug!(cart_id = %cart.id(), "Cart flushed");
        Ok(())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn mutate<R, F>(&self, f: F) -> CoreResult<R>
    where
        F: FnOnce(&mut Cart, &PricingPolicy) -> CoreResult<(R, CartChange)>,
    {
        let (result, change, snapshot) = {
            let mut cart = self.lock();
            let (result, change) = f(&mut cart, &self.policy)?;
            self.persist(&cart);
            (result, change, cart.clone())
        };

        self.notify(&change, &snapshot);
        Ok(result)
    }

    fn persist(&self, cart: &Cart) {
        if let Err(e) = save_cart(self.storage.as_ref(), cart) {
            warn!(
                cart_id = %cart.id(),
                error = %e,
                "Failed to persist cart, keeping in-memory state"
            );
        }
    }

    fn notify(&self, change: &CartChange, cart: &Cart) {
        let listeners: Vec<Listener> = self
            .lock_listeners()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in listeners {
            listener(change, cart);
        }
    }

    fn lock(&self) -> MutexGuard<'_, Cart> {
        self.cart.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_listeners(&self) -> MutexGuard<'_, Vec<(SubscriptionId, Listener)>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for CartEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartEngine")
            .field("cart", &*self.lock())
            .field("policy", &self.policy)
            .field("listeners", &self.lock_listeners().len())
            .finish()
    }
}

//! # Cart
//!
//! The cart entity, its line items, and the totals algorithm.
//!
//! ## Cart Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cart Operations                                  │
//! │                                                                         │
//! │  Operation                 Line Items                 Aggregates        │
//! │  ─────────                 ──────────                 ──────────        │
//! │                                                                         │
//! │  add_item(p, q) ─────────► merge by product_id ─────► recompute         │
//! │                            or append new line                           │
//! │                                                                         │
//! │  update_quantity(id, n) ─► set qty = n  (n ≤ 0 ──► remove) ─► recompute │
//! │                                                                         │
//! │  remove_item(id) ────────► retain others ───────────► recompute         │
//! │                                                                         │
//! │  clear() ────────────────► new cart id, no lines ───► all zero          │
//! │                                                                         │
//! │  NOTE: aggregate fields are private. Only `CartTotals::compute` ever    │
//! │        writes them, so they cannot go stale.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Totals
//! ```text
//!   total_items = Σ quantity            (0 ──► every aggregate is 0)
//!   subtotal    = Σ unit price × qty     exact cents
//!   tax         = subtotal × tax rate    rounded half away from zero
//!   shipping    = 0 if subtotal ≥ threshold, else flat fee
//!   total       = subtotal + tax + shipping
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::{Currency, Money};
use crate::types::{Product, TaxRate};
use crate::validation::{validate_product, validate_quantity};

// =============================================================================
// Pricing Policy
// =============================================================================

/// Rates and thresholds the totals algorithm runs with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PricingPolicy {
    pub tax_rate: TaxRate,
    pub shipping_fee: Money,
    /// Subtotals at or above this amount ship free.
    pub free_shipping_threshold: Money,
    pub currency: Currency,
}

impl PricingPolicy {
    /// Shipping charged for `subtotal`. The threshold comparison is inclusive.
    pub fn shipping_for(&self, subtotal: Money) -> Money {
        if subtotal >= self.free_shipping_threshold {
            Money::zero()
        } else {
            self.shipping_fee
        }
    }

    /// How much more the customer must add to qualify for free shipping.
    ///
    /// ```rust
    /// use ekart_core::{Money, PricingPolicy};
    ///
    /// let policy = PricingPolicy::default();
    /// assert_eq!(policy.amount_until_free_shipping(Money::from_cents(5000)).cents(), 2500);
    /// assert!(policy.amount_until_free_shipping(Money::from_cents(9000)).is_zero());
    /// ```
    pub fn amount_until_free_shipping(&self, subtotal: Money) -> Money {
        if subtotal >= self.free_shipping_threshold {
            Money::zero()
        } else {
            self.free_shipping_threshold - subtotal
        }
    }
}

impl Default for PricingPolicy {
    fn default() -> Self {
        PricingPolicy {
            tax_rate: TaxRate::from_bps(crate::DEFAULT_TAX_RATE_BPS),
            shipping_fee: Money::from_cents(crate::DEFAULT_SHIPPING_FEE_CENTS),
            free_shipping_threshold: Money::from_cents(crate::FREE_SHIPPING_THRESHOLD_CENTS),
            currency: Currency::new(crate::DEFAULT_CURRENCY),
        }
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One product entry in the cart.
///
/// `product` is a snapshot taken the first time the product was added. Adding
/// the same product again only bumps `quantity`; the snapshot, and therefore
/// the unit price, stays as it was.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartLineItem {
    pub id: String,
    pub product_id: String,
    pub product: Product,
    pub quantity: i64,
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl CartLineItem {
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        CartLineItem {
            id: Uuid::new_v4().to_string(),
            product_id: product.id.clone(),
            product: product.clone(),
            quantity,
            added_at: Utc::now(),
        }
    }

    #[inline]
    pub fn unit_price(&self) -> Money {
        self.product.price()
    }

    /// Unit price × quantity, `None` on overflow.
    pub fn line_total(&self) -> Option<Money> {
        self.unit_price().checked_mul_quantity(self.quantity)
    }
}

// =============================================================================
// Totals
// =============================================================================

/// Aggregates derived from a cart's line items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartTotals {
    pub total_items: i64,
    pub subtotal: Money,
    pub tax: Money,
    pub shipping: Money,
    pub total: Money,
}

impl CartTotals {
    /// Runs the totals algorithm over `items`.
    ///
    /// Returns `None` if any amount does not fit in an i64.
    ///
    /// ```rust
    /// use ekart_core::{CartLineItem, CartTotals, PricingPolicy, Product};
    ///
    /// let lamp = Product::new("p-1", "Desk Lamp", 5000);
    /// let items = vec![CartLineItem::from_product(&lamp, 1)];
    ///
    /// let totals = CartTotals::compute(&items, &PricingPolicy::default()).unwrap();
    /// assert_eq!(totals.tax.cents(), 400);
    /// assert_eq!(totals.shipping.cents(), 1000);
    /// assert_eq!(totals.total.cents(), 6400);
    /// ```
    pub fn compute(items: &[CartLineItem], policy: &PricingPolicy) -> Option<CartTotals> {
        let mut total_items: i64 = 0;
        let mut subtotal: i64 = 0;
        for item in items {
            total_items = total_items.checked_add(item.quantity)?;
            subtotal = subtotal.checked_add(item.line_total()?.cents())?;
        }

        if total_items == 0 {
            return Some(CartTotals::default());
        }

        let subtotal = Money::from_cents(subtotal);
        let tax = subtotal.calculate_tax(policy.tax_rate)?;
        let shipping = policy.shipping_for(subtotal);
        let total = subtotal
            .cents()
            .checked_add(tax.cents())?
            .checked_add(shipping.cents())?;

        Some(CartTotals {
            total_items,
            subtotal,
            tax,
            shipping,
            total: Money::from_cents(total),
        })
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
///
/// ## Invariants
/// - At most one line item per product id
/// - Every quantity is ≥ 1
/// - Aggregates always equal `CartTotals::compute(items)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Cart {
    id: String,
    items: Vec<CartLineItem>,
    total_items: i64,
    subtotal: Money,
    tax: Money,
    shipping: Money,
    total: Money,
    currency: Currency,
    #[ts(as = "String")]
    updated_at: DateTime<Utc>,
}

impl Cart {
    /// Creates an empty cart with a fresh identifier.
    pub fn new(currency: Currency) -> Self {
        Cart {
            id: Uuid::new_v4().to_string(),
            items: Vec::new(),
            total_items: 0,
            subtotal: Money::zero(),
            tax: Money::zero(),
            shipping: Money::zero(),
            total: Money::zero(),
            currency,
            updated_at: Utc::now(),
        }
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Adds `quantity` of `product`, merging into an existing line item.
    ///
    /// ## Errors
    /// - `InvalidQuantity` if `quantity` ≤ 0
    /// - `InvalidProduct` for an empty id or negative price
    /// - `QuantityOverflow` if the new quantity or any total overflows
    ///
    /// On error the cart is unchanged.
    pub fn add_item(
        &mut self,
        product: &Product,
        quantity: i64,
        policy: &PricingPolicy,
    ) -> CoreResult<()> {
        validate_quantity(quantity).map_err(|_| CoreError::InvalidQuantity { quantity })?;
        validate_product(product).map_err(|e| CoreError::InvalidProduct {
            reason: e.to_string(),
        })?;

        let overflow = || CoreError::QuantityOverflow {
            product_id: product.id.clone(),
        };

        match self.position(&product.id) {
            Some(index) => {
                let previous = self.items[index].quantity;
                let merged = previous.checked_add(quantity).ok_or_else(overflow)?;
                self.items[index].quantity = merged;
                if !self.refresh(policy) {
                    self.items[index].quantity = previous;
                    return Err(overflow());
                }
            }
            None => {
                self.items.push(CartLineItem::from_product(product, quantity));
                if !self.refresh(policy) {
                    self.items.pop();
                    return Err(overflow());
                }
            }
        }

        Ok(())
    }

    /// Sets the quantity of `product_id` to exactly `quantity`.
    ///
    /// A quantity ≤ 0 removes the line item. Unknown ids are a no-op.
    /// Returns whether a line item matched `product_id`.
    pub fn update_quantity(
        &mut self,
        product_id: &str,
        quantity: i64,
        policy: &PricingPolicy,
    ) -> CoreResult<bool> {
        if quantity <= 0 {
            return Ok(self.remove_item(product_id, policy));
        }

        if let Some(index) = self.position(product_id) {
            let previous = self.items[index].quantity;
            self.items[index].quantity = quantity;
            if !self.refresh(policy) {
                self.items[index].quantity = previous;
                return Err(CoreError::QuantityOverflow {
                    product_id: product_id.to_string(),
                });
            }
            Ok(true)
        } else {
            self.touch();
            Ok(false)
        }
    }

    /// Removes the line item for `product_id`. Returns whether one existed.
    pub fn remove_item(&mut self, product_id: &str, policy: &PricingPolicy) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.product_id != product_id);
        let removed = self.items.len() != before;

        // A subset of lines that already summed cannot overflow.
        if !self.refresh(policy) {
            self.apply(CartTotals::default());
        }
        removed
    }

    /// Resets to an empty cart with a new identifier.
    pub fn clear(&mut self, policy: &PricingPolicy) {
        *self = Cart::new(policy.currency.clone());
    }

    /// Checks a cart that came from outside (storage) and recomputes its
    /// aggregates under `policy`.
    ///
    /// Stored aggregates are never trusted. `updated_at` is kept.
    pub fn reconcile(&mut self, policy: &PricingPolicy) -> CoreResult<()> {
        if self.id.trim().is_empty() {
            return Err(CoreError::InconsistentCart("cart has no id".to_string()));
        }

        let mut seen = HashSet::with_capacity(self.items.len());
        for item in &self.items {
            if item.quantity <= 0 {
                return Err(CoreError::InconsistentCart(format!(
                    "line item {} has quantity {}",
                    item.id, item.quantity
                )));
            }
            if item.product_id != item.product.id {
                return Err(CoreError::InconsistentCart(format!(
                    "line item {} points at {} but embeds {}",
                    item.id, item.product_id, item.product.id
                )));
            }
            validate_product(&item.product)
                .map_err(|e| CoreError::InconsistentCart(e.to_string()))?;
            if !seen.insert(item.product_id.as_str()) {
                return Err(CoreError::InconsistentCart(format!(
                    "product {} appears more than once",
                    item.product_id
                )));
            }
        }

        let totals = CartTotals::compute(&self.items, policy).ok_or_else(|| {
            CoreError::InconsistentCart("cart totals overflow".to_string())
        })?;
        self.currency = policy.currency.clone();
        self.apply(totals);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Quantity of `product_id` in the cart, 0 when absent.
    pub fn item_quantity(&self, product_id: &str) -> i64 {
        self.items
            .iter()
            .find(|item| item.product_id == product_id)
            .map(|item| item.quantity)
            .unwrap_or(0)
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.position(product_id).is_some()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Line items in insertion order.
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all quantities.
    pub fn total_items(&self) -> i64 {
        self.total_items
    }

    pub fn subtotal(&self) -> Money {
        self.subtotal
    }

    pub fn tax(&self) -> Money {
        self.tax
    }

    pub fn shipping(&self) -> Money {
        self.shipping
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn totals(&self) -> CartTotals {
        CartTotals {
            total_items: self.total_items,
            subtotal: self.subtotal,
            tax: self.tax,
            shipping: self.shipping,
            total: self.total,
        }
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn position(&self, product_id: &str) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.product_id == product_id)
    }

    /// Recomputes aggregates and touches `updated_at`. Leaves the cart alone
    /// and returns false on overflow.
    fn refresh(&mut self, policy: &PricingPolicy) -> bool {
        match CartTotals::compute(&self.items, policy) {
            Some(totals) => {
                self.apply(totals);
                self.touch();
                true
            }
            None => false,
        }
    }

    fn apply(&mut self, totals: CartTotals) {
        self.total_items = totals.total_items;
        self.subtotal = totals.subtotal;
        self.tax = totals.tax;
        self.shipping = totals.shipping;
        self.total = totals.total;
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for Cart {
    fn default() -> Self {
        Cart::new(Currency::default())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Cart Commands
//!
//! Cart manipulation for the UI layer.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│ Checkout │────►│  Order   │       │
//! │  │  Cart    │     │          │     │   Form   │     │ Placed   │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │       ▲                │                                  │             │
//! │       │           add_to_cart                        place_order        │
//! │       │           update_cart_item                   (checkout.rs)      │
//! │       │           remove_from_cart                        │             │
//! │       │                │                                  │             │
//! │       │                ▼                                  │             │
//! │       └──────────  clear_cart  ◄──────────────────────────┘             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use ekart_core::{Cart, CartLineItem, CartTotals, Money, PricingPolicy};
use serde::Serialize;
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::state::{CartEngine, CatalogState};

/// Display strings for the cart summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedTotals {
    pub subtotal: String,
    pub tax: String,
    pub shipping: String,
    pub total: String,
}

/// Cart response including items and totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub cart_id: String,
    pub items: Vec<CartLineItem>,
    pub totals: CartTotals,
    pub formatted: FormattedTotals,
    pub currency: String,

    /// What is still missing to ship free; zero once it applies.
    pub amount_until_free_shipping: Money,

    /// e.g. "Add $25.00 more for free shipping"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_shipping_hint: Option<String>,

    pub updated_at: DateTime<Utc>,
}

impl CartResponse {
    pub fn new(cart: &Cart, policy: &PricingPolicy) -> Self {
        let currency = cart.currency();
        let remaining = if cart.is_empty() {
            Money::zero()
        } else {
            policy.amount_until_free_shipping(cart.subtotal())
        };

        CartResponse {
            cart_id: cart.id().to_string(),
            items: cart.items().to_vec(),
            totals: cart.totals(),
            formatted: FormattedTotals {
                subtotal: cart.subtotal().format(currency),
                tax: cart.tax().format(currency),
                shipping: if cart.shipping().is_zero() && !cart.is_empty() {
                    "FREE".to_string()
                } else {
                    cart.shipping().format(currency)
                },
                total: cart.total().format(currency),
            },
            currency: currency.code().to_string(),
            amount_until_free_shipping: remaining,
            free_shipping_hint: remaining
                .is_positive()
                .then(|| format!("Add {} more for free shipping", remaining.format(currency))),
            updated_at: cart.updated_at(),
        }
    }
}

/// Whether a product is in the cart, and how many.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemStatus {
    pub product_id: String,
    pub quantity: i64,
    pub in_cart: bool,
}

/// Gets the current cart contents.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  ┌────────────────────────────────────────────────────────────────┐    │
/// │  │  SHOPPING CART                                     2 items     │    │
/// │  ├────────────────────────────────────────────────────────────────┤    │
/// │  │  Ceramic Plant Pot Set    x1             $49.99               │    │
/// │  │  Organic Cotton T-Shirt   x1             $29.99               │    │
/// │  ├────────────────────────────────────────────────────────────────┤    │
/// │  │  Subtotal                                $79.98               │    │
/// │  │  Shipping                                  FREE               │    │
/// │  │  Tax                                      $6.40               │    │
/// │  │  ──────────────────────────────────────────────────          │    │
/// │  │  TOTAL                                   $86.38               │    │
/// │  └────────────────────────────────────────────────────────────────┘    │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn get_cart(engine: &CartEngine) -> CartResponse {
    debug!("get_cart command");
    engine.with_cart(|cart| CartResponse::new(cart, engine.policy()))
}

/// Adds a catalog product to the cart.
///
/// ## Behavior
/// - Unknown product id: `NOT_FOUND`
/// - Out-of-stock product: `VALIDATION_ERROR`, cart untouched
/// - Already in cart: quantity increases, price snapshot kept
///
/// ## Arguments
/// * `product_id` - Catalog id to add
/// * `quantity` - Quantity to add (default: 1)
pub fn add_to_cart(
    engine: &CartEngine,
    catalog: &CatalogState,
    product_id: &str,
    quantity: Option<i64>,
) -> ApiResult<CartResponse> {
    let quantity = quantity.unwrap_or(1);
    debug!(product_id = %product_id, quantity = %quantity, "add_to_cart command");

    let product = catalog.require(product_id)?;
    if !product.in_stock {
        return Err(ApiError::validation(format!(
            "{} is out of stock",
            product.name
        )));
    }

    engine.add_item(product, quantity)?;
    Ok(get_cart(engine))
}

/// Sets the quantity of a cart line. Quantity 0 (or less) removes it.
pub fn update_cart_item(
    engine: &CartEngine,
    product_id: &str,
    quantity: i64,
) -> ApiResult<CartResponse> {
    debug!(product_id = %product_id, quantity = %quantity, "update_cart_item command");

    engine.update_item_quantity(product_id, quantity)?;
    Ok(get_cart(engine))
}

/// Removes a product from the cart. Unknown ids are ignored.
pub fn remove_from_cart(engine: &CartEngine, product_id: &str) -> CartResponse {
    debug!(product_id = %product_id, "remove_from_cart command");

    engine.remove_item(product_id);
    get_cart(engine)
}

/// Empties the cart.
pub fn clear_cart(engine: &CartEngine) -> CartResponse {
    debug!("clear_cart command");

    engine.clear_cart();
    get_cart(engine)
}

pub fn get_item_status(engine: &CartEngine, product_id: &str) -> CartItemStatus {
    let quantity = engine.get_item_quantity(product_id);
    CartItemStatus {
        product_id: product_id.to_string(),
        quantity,
        in_cart: quantity > 0,
    }
}

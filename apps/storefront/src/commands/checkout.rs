//! # Checkout Commands
//!
//! Form validation and order placement.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CheckoutForm ──► validate_checkout_form ──► field errors (live)        │
//! │       │                                                                 │
//! │       └─────────► place_order                                           │
//! │                      │  CartEngine::checkout (one lock)                 │
//! │                      │    Order::from_cart ─► clear cart                │
//! │                      ▼                                                  │
//! │                 OrderConfirmation                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No payment is taken; the order is confirmed as soon as the form is valid.

use ekart_core::validation::validate_checkout;
use ekart_core::{CheckoutForm, Order};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::ApiResult;
use crate::state::CartEngine;

/// What the confirmation page shows after a successful checkout.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    pub order: Order,
    pub formatted_subtotal: String,
    pub formatted_tax: String,
    pub formatted_shipping: String,
    pub formatted_total: String,
    pub message: String,
}

impl From<Order> for OrderConfirmation {
    fn from(order: Order) -> Self {
        let currency = &order.currency;
        OrderConfirmation {
            formatted_subtotal: order.subtotal.format(currency),
            formatted_tax: order.tax.format(currency),
            formatted_shipping: order.shipping.format(currency),
            formatted_total: order.total.format(currency),
            message: format!(
                "Thank you for your order! A confirmation has been sent to {}.",
                order.email
            ),
            order,
        }
    }
}

/// Validates the checkout form without touching the cart.
///
/// Fails with `CHECKOUT_INVALID`, one detail entry per bad field.
pub fn validate_checkout_form(form: &CheckoutForm) -> ApiResult<()> {
    debug!("validate_checkout_form command");
    validate_checkout(form)?;
    Ok(())
}

/// Places an order for everything in the cart and empties it.
///
/// ## Errors
/// - `CART_ERROR` when the cart is empty
/// - `CHECKOUT_INVALID` when the form has invalid fields
pub fn place_order(engine: &CartEngine, form: &CheckoutForm) -> ApiResult<OrderConfirmation> {
    debug!("place_order command");

    let order = engine.checkout(form)?;

    info!(
        order_number = %order.order_number,
        items = order.items.len(),
        total = %order.total,
        "Order placed"
    );

    Ok(OrderConfirmation::from(order))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::CatalogState;
    use ekart_core::{CardDetails, PaymentMethodKind, PricingPolicy, ShippingAddress};
    use ekart_store::MemoryStorage;
    use std::sync::Arc;

    fn form() -> CheckoutForm {
        CheckoutForm {
            email: "grace@example.com".to_string(),
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            phone: None,
            address: ShippingAddress {
                first_name: "Grace".to_string(),
                last_name: "Hopper".to_string(),
                address_line1: "1 Navy Way".to_string(),
                city: "Arlington".to_string(),
                state: "VA".to_string(),
                postal_code: "22202".to_string(),
                country: "US".to_string(),
                ..ShippingAddress::default()
            },
            payment_method: PaymentMethodKind::CreditCard,
            card: Some(CardDetails {
                card_number: "4111 1111 1111 1111".to_string(),
                expiry_date: "12/30".to_string(),
                cvv: "123".to_string(),
                cardholder_name: "Grace Hopper".to_string(),
            }),
        }
    }

    fn engine_with_headphones() -> CartEngine {
        let engine = CartEngine::init(Arc::new(MemoryStorage::new()), PricingPolicy::default());
        let catalog = CatalogState::sample();
        engine.add_item(catalog.require("1").unwrap(), 1).unwrap();
        engine
    }

    #[test]
    fn test_place_order_clears_cart() {
        let engine = engine_with_headphones();

        let confirmation = place_order(&engine, &form()).unwrap();

        assert_eq!(confirmation.formatted_total, "$107.99");
        assert_eq!(confirmation.order.card_last4.as_deref(), Some("1111"));
        assert!(confirmation.order.order_number.starts_with("EK-"));
        assert!(engine.cart().is_empty());
    }

    #[test]
    fn test_place_order_empty_cart() {
        let engine = CartEngine::init(Arc::new(MemoryStorage::new()), PricingPolicy::default());
        let err = place_order(&engine, &form()).unwrap_err();
        assert_eq!(err.code, ErrorCode::CartError);
    }

    #[test]
    fn test_invalid_form_keeps_cart() {
        let engine = engine_with_headphones();
        let mut bad = form();
        bad.email = "not-an-email".to_string();
        bad.address.postal_code = String::new();

        let err = place_order(&engine, &bad).unwrap_err();
        assert_eq!(err.code, ErrorCode::CheckoutInvalid);
        let details = err.details.unwrap();
        assert!(details.contains_key("email"));
        assert_eq!(engine.cart().total_items(), 1);

        assert!(validate_checkout_form(&form()).is_ok());
        assert!(validate_checkout_form(&bad).is_err());
    }
}

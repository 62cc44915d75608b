//! # Checkout
//!
//! Checkout form types and the order record produced from a cart.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CheckoutForm ──► validate_checkout() ──► Order::from_cart() ──► Order │
//! │                          │                       │                      │
//! │                          ▼                       ▼                      │
//! │                  CheckoutErrors           CoreError::EmptyCart          │
//! │                  (field → message)                                      │
//! │                                                                         │
//! │  No payment is captured here. The order is a local confirmation that   │
//! │  freezes the cart's line items and totals.                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::cart::{Cart, CartLineItem};
use crate::error::{CoreError, CoreResult};
use crate::money::{Currency, Money};
use crate::validation::validate_checkout;

/// How the customer intends to pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum PaymentMethodKind {
    #[default]
    CreditCard,
    DebitCard,
    Paypal,
    ApplePay,
    GooglePay,
}

impl PaymentMethodKind {
    /// Card methods need the card fields filled in.
    pub fn is_card(&self) -> bool {
        matches!(self, PaymentMethodKind::CreditCard | PaymentMethodKind::DebitCard)
    }
}

/// Card fields of the checkout form. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CardDetails {
    pub card_number: String,
    pub expiry_date: String,
    pub cvv: String,
    pub cardholder_name: String,
}

impl CardDetails {
    /// Last four digits of the card number, ignoring separators.
    pub fn last4(&self) -> Option<String> {
        let digits: Vec<char> = self
            .card_number
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        if digits.len() < 4 {
            return None;
        }
        Some(digits[digits.len() - 4..].iter().collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ShippingAddress {
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub address_line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    #[serde(default = "default_country")]
    pub country: String,
}

fn default_country() -> String {
    "US".to_string()
}

/// Everything the checkout page collects.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CheckoutForm {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub address: ShippingAddress,
    #[serde(default)]
    pub payment_method: PaymentMethodKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<CardDetails>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum OrderStatus {
    Pending,
    Confirmed,
}

/// A placed order: the cart's line items and totals frozen at checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Order {
    pub id: String,
    /// Human-readable reference, e.g. `EK-20260301-1A2B3C4D`.
    pub order_number: String,
    pub items: Vec<CartLineItem>,
    pub email: String,
    pub customer_name: String,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethodKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_last4: Option<String>,
    pub status: OrderStatus,
    pub subtotal: Money,
    pub tax: Money,
    pub shipping: Money,
    pub total: Money,
    pub currency: Currency,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Builds a confirmed order from `cart` after validating `form`.
    ///
    /// ## Errors
    /// - `CoreError::EmptyCart` when the cart has no line items
    /// - `CoreError::Checkout` with every invalid field otherwise
    pub fn from_cart(cart: &Cart, form: &CheckoutForm) -> CoreResult<Order> {
        if cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }
        validate_checkout(form)?;

        let id = Uuid::new_v4();
        let created_at = Utc::now();
        let short = id.simple().to_string()[..8].to_ascii_uppercase();

        Ok(Order {
            id: id.to_string(),
            order_number: format!("EK-{}-{}", created_at.format("%Y%m%d"), short),
            items: cart.items().to_vec(),
            email: form.email.trim().to_string(),
            customer_name: format!("{} {}", form.first_name.trim(), form.last_name.trim()),
            shipping_address: form.address.clone(),
            payment_method: form.payment_method,
            card_last4: form
                .card
                .as_ref()
                .filter(|_| form.payment_method.is_card())
                .and_then(CardDetails::last4),
            status: OrderStatus::Confirmed,
            subtotal: cart.subtotal(),
            tax: cart.tax(),
            shipping: cart.shipping(),
            total: cart.total(),
            currency: cart.currency().clone(),
            created_at,
        })
    }
}

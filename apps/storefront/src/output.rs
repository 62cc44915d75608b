//! Terminal rendering of command responses.
//!
//! With `--json` every response is printed as pretty JSON (the same camelCase
//! shape the UI receives); otherwise as plain text tables.

use std::fmt::Write as _;

use ekart_core::Currency;
use serde::Serialize;

use crate::commands::cart::CartResponse;
use crate::commands::checkout::OrderConfirmation;
use crate::commands::product::{ProductDto, ProductListResponse};
use crate::error::{ApiError, ApiResult};

#[derive(Debug, Clone, Copy)]
pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Output { json }
    }

    /// Prints `value` as JSON, or `text` in plain mode.
    pub fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce(&T) -> String) -> ApiResult<()> {
        if self.json {
            let json = serde_json::to_string_pretty(value)
                .map_err(|e| ApiError::internal(format!("Failed to encode response: {}", e)))?;
            println!("{}", json);
        } else {
            print!("{}", text(value));
        }
        Ok(())
    }

    pub fn error(&self, err: &ApiError) {
        if self.json {
            match serde_json::to_string_pretty(err) {
                Ok(json) => eprintln!("{}", json),
                Err(_) => eprintln!("{}", err),
            }
        } else {
            eprintln!("error: {}", err.message);
            if let Some(details) = &err.details {
                for (field, message) in details {
                    eprintln!("  {}: {}", field, message);
                }
            }
        }
    }
}

pub fn cart_text(cart: &CartResponse) -> String {
    let mut out = String::new();
    if cart.items.is_empty() {
        out.push_str("Your cart is empty\n");
        return out;
    }

    let currency = Currency::new(&cart.currency);
    let _ = writeln!(out, "Cart ({} items)", cart.totals.total_items);
    for item in &cart.items {
        let line = item
            .line_total()
            .map(|m| m.format(&currency))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "  {:<4} {:<34} x{:<4} {:>12}",
            item.product_id, item.product.name, item.quantity, line
        );
    }
    let _ = writeln!(out, "  {:<44} {:>12}", "Subtotal", cart.formatted.subtotal);
    let _ = writeln!(out, "  {:<44} {:>12}", "Shipping", cart.formatted.shipping);
    let _ = writeln!(out, "  {:<44} {:>12}", "Tax", cart.formatted.tax);
    let _ = writeln!(out, "  {:<44} {:>12}", "TOTAL", cart.formatted.total);
    if let Some(hint) = &cart.free_shipping_hint {
        let _ = writeln!(out, "{}", hint);
    }
    out
}

pub fn products_text(list: &ProductListResponse) -> String {
    let mut out = String::new();
    for product in &list.products {
        out.push_str(&product_line(product));
    }
    let _ = writeln!(out, "{} product(s)", list.total);
    out
}

pub fn product_text(product: &ProductDto) -> String {
    let p = &product.product;
    let mut out = product_line(product);
    if !p.description.is_empty() {
        let _ = writeln!(out, "  {}", p.description);
    }
    let _ = writeln!(
        out,
        "  {} | rated {:.1} ({} reviews)",
        p.category.name, p.rating, p.review_count
    );
    if product.quantity_in_cart > 0 {
        let _ = writeln!(out, "  {} in cart", product.quantity_in_cart);
    }
    out
}

pub fn order_text(confirmation: &OrderConfirmation) -> String {
    let order = &confirmation.order;
    let mut out = String::new();
    let _ = writeln!(out, "Order {} confirmed", order.order_number);
    let _ = writeln!(out, "  Items     {}", order.items.len());
    let _ = writeln!(out, "  Subtotal  {}", confirmation.formatted_subtotal);
    let _ = writeln!(out, "  Shipping  {}", confirmation.formatted_shipping);
    let _ = writeln!(out, "  Tax       {}", confirmation.formatted_tax);
    let _ = writeln!(out, "  Total     {}", confirmation.formatted_total);
    let _ = writeln!(out, "{}", confirmation.message);
    out
}

fn product_line(product: &ProductDto) -> String {
    let p = &product.product;
    let price = match (&product.formatted_original_price, product.discount_percentage) {
        (Some(original), Some(pct)) => {
            format!("{} (was {}, -{}%)", product.formatted_price, original, pct)
        }
        _ => product.formatted_price.clone(),
    };
    let stock = if p.in_stock { "" } else { "  [out of stock]" };
    format!("{:<4} {:<34} {}{}\n", p.id, p.name, price, stock)
}

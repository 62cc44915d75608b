//! # Domain Types
//!
//! Catalog-side types consumed by the cart engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │ ProductCategory │   │    TaxRate      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │──►│  id             │   │  bps (u32)      │       │
//! │  │  name           │   │  name           │   │  800 = 8%       │       │
//! │  │  price_cents    │   │  slug           │   └─────────────────┘       │
//! │  │  in_stock       │   └─────────────────┘                              │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  Products are READ-ONLY to the cart engine: a line item embeds a        │
//! │  snapshot taken when the product was first added.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000, so 800 bps = 8% and every rate the
/// storefront can be configured with stays an exact integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::from_bps(crate::DEFAULT_TAX_RATE_BPS)
    }
}

// =============================================================================
// Product Category
// =============================================================================

/// A catalog category.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductCategory {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl ProductCategory {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        ProductCategory {
            id: id.into(),
            slug: slugify(&name),
            name,
            description: None,
            parent_id: None,
        }
    }
}

/// Lower-cases `text`, drops punctuation and joins words with single hyphens.
///
/// ```rust
/// use ekart_core::types::slugify;
///
/// assert_eq!(slugify("Hello World"), "hello-world");
/// assert_eq!(slugify("Product Name 123!"), "product-name-123");
/// ```
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for ch in text.to_lowercase().chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else if ch.is_whitespace() || ch == '-' || ch == '_' {
            pending_dash = true;
        }
    }

    slug
}

// =============================================================================
// Product
// =============================================================================

/// A product in the storefront catalog.
///
/// The catalog owns products; the cart only ever stores clones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Catalog identifier. Line items are keyed by this value.
    pub id: String,

    /// Display name shown on cards and in the cart.
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Unit price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Pre-sale price in cents, when the product is discounted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price_cents: Option<i64>,

    #[serde(default)]
    pub category: ProductCategory,

    #[serde(default)]
    pub image_url: String,

    /// Average review score, 0.0 - 5.0.
    #[serde(default)]
    pub rating: f64,

    #[serde(default)]
    pub review_count: u32,

    /// Whether the product can currently be bought.
    pub in_stock: bool,

    #[serde(default)]
    pub stock_quantity: u32,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Creates an in-stock product with the given id, name and price.
    ///
    /// Remaining fields take empty defaults; catalogs loaded from JSON fill
    /// them in.
    pub fn new(id: impl Into<String>, name: impl Into<String>, price_cents: i64) -> Self {
        let now = Utc::now();
        Product {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            price_cents,
            original_price_cents: None,
            category: ProductCategory::default(),
            image_url: String::new(),
            rating: 0.0,
            review_count: 0,
            in_stock: true,
            stock_quantity: 0,
            tags: Vec::new(),
            brand: None,
            sku: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Whether the product is listed below its original price.
    pub fn is_on_sale(&self) -> bool {
        matches!(self.original_price_cents, Some(original) if original > self.price_cents)
    }

    /// Discount off the original price as a whole percentage, rounded.
    ///
    /// ```rust
    /// use ekart_core::Product;
    ///
    /// let mut product = Product::new("p-1", "Headphones", 7999);
    /// product.original_price_cents = Some(9999);
    /// assert_eq!(product.discount_percentage(), Some(20));
    /// ```
    pub fn discount_percentage(&self) -> Option<u32> {
        let original = self.original_price_cents.filter(|o| *o > 0)?;
        if original <= self.price_cents {
            return None;
        }
        let off = (original - self.price_cents) as f64 / original as f64 * 100.0;
        Some(off.round() as u32)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_from_bps() {
        let rate = TaxRate::from_bps(800);
        assert_eq!(rate.bps(), 800);
    }

    #[test]
    fn test_tax_rate_default_is_storefront_rate() {
        assert_eq!(TaxRate::default().bps(), 800);
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("Special@Characters#Test"), "specialcharacterstest");
        assert_eq!(slugify("  Home & Kitchen  "), "home-kitchen");
    }

    #[test]
    fn test_product_json_uses_camel_case() {
        let product = Product::new("p-1", "Wireless Headphones", 9999);
        let json = serde_json::to_value(&product).unwrap();

        assert_eq!(json["priceCents"], 9999);
        assert_eq!(json["inStock"], true);
        assert!(json.get("createdAt").is_some());
        assert!(json.get("originalPriceCents").is_none());
    }

    #[test]
    fn test_discount_percentage() {
        let mut product = Product::new("p-1", "Lamp", 5000);
        assert_eq!(product.discount_percentage(), None);
        assert!(!product.is_on_sale());

        product.original_price_cents = Some(7500);
        assert_eq!(product.discount_percentage(), Some(33));
        assert!(product.is_on_sale());

        product.original_price_cents = Some(4000);
        assert_eq!(product.discount_percentage(), None);
    }
}

//! # Product Commands
//!
//! Catalog browsing: listing with filters and sorting, and product lookup.
//!
//! ## Browse Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Category chips ──┐                                                     │
//! │  Price slider ────┤                                                     │
//! │  "In stock" box ──┼──► ProductFilters ──► list_products ──► cards       │
//! │  Search box ──────┤          +                                          │
//! │  Sort dropdown ───┘      SortOption                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use ekart_core::{Money, Product, ProductCategory, ProductFilters, SortOption};
use serde::Serialize;
use tracing::debug;

use crate::error::ApiResult;
use crate::state::{CartEngine, CatalogState};

// =============================================================================
// Response Types
// =============================================================================

/// Product card data, with display strings and the cart badge count.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    #[serde(flatten)]
    pub product: Product,
    pub formatted_price: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted_original_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<u32>,
    pub quantity_in_cart: i64,
}

impl ProductDto {
    fn new(product: &Product, engine: &CartEngine) -> Self {
        let currency = engine.policy().currency.clone();
        ProductDto {
            formatted_price: product.price().format(&currency),
            formatted_original_price: product
                .original_price_cents
                .filter(|_| product.is_on_sale())
                .map(|cents| Money::from_cents(cents).format(&currency)),
            discount_percentage: product.discount_percentage(),
            quantity_in_cart: engine.get_item_quantity(&product.id),
            product: product.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListResponse {
    pub products: Vec<ProductDto>,
    pub total: usize,
    pub categories: Vec<ProductCategory>,
    pub sort: SortOption,
}

// =============================================================================
// Commands
// =============================================================================

/// Lists catalog products matching `filters`, ordered by `sort`.
///
/// An empty filter set returns the whole catalog.
pub fn list_products(
    catalog: &CatalogState,
    engine: &CartEngine,
    filters: &ProductFilters,
    sort: SortOption,
) -> ApiResult<ProductListResponse> {
    debug!(?sort, filtered = !filters.is_empty(), "list_products command");

    let products: Vec<ProductDto> = catalog
        .browse(filters, sort)?
        .iter()
        .map(|p| ProductDto::new(p, engine))
        .collect();

    Ok(ProductListResponse {
        total: products.len(),
        products,
        categories: catalog.categories(),
        sort,
    })
}

/// Gets a single product by id.
pub fn get_product(
    catalog: &CatalogState,
    engine: &CartEngine,
    product_id: &str,
) -> ApiResult<ProductDto> {
    debug!(product_id = %product_id, "get_product command");

    let product = catalog.require(product_id)?;
    Ok(ProductDto::new(product, engine))
}

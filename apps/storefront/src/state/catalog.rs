//! # Catalog State
//!
//! The read-only product list the cart engine draws products from.
//!
//! Loaded once at startup, either from a JSON file (an array of products in
//! the same camelCase layout the UI uses) or from the built-in sample
//! catalog.

use std::path::Path;

use chrono::{Duration, Utc};
use ekart_core::catalog::{self, ProductFilters, SortOption};
use ekart_core::validation::validate_search_query;
use ekart_core::{Product, ProductCategory};
use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};

#[derive(Debug, Clone, Default)]
pub struct CatalogState {
    products: Vec<Product>,
}

impl CatalogState {
    pub fn new(products: Vec<Product>) -> Self {
        CatalogState { products }
    }

    /// Reads a JSON array of products.
    pub fn from_file(path: &Path) -> ApiResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ApiError::internal(format!("Failed to read catalog {}: {}", path.display(), e))
        })?;
        let products: Vec<Product> = serde_json::from_str(&contents).map_err(|e| {
            ApiError::validation(format!("Catalog {} is invalid: {}", path.display(), e))
        })?;

        info!(path = %path.display(), count = products.len(), "Loaded catalog");
        Ok(CatalogState::new(products))
    }

    /// The built-in demo catalog.
    pub fn sample() -> Self {
        let electronics = category("1", "Electronics", "electronics");
        let clothing = category("2", "Clothing", "clothing");
        let home = category("3", "Home & Garden", "home-garden");
        let sports = category("4", "Sports & Outdoors", "sports");
        let books = category("5", "Books", "books");

        let products = vec![
            product("1", "Wireless Bluetooth Headphones", 9999, &electronics)
                .description("Over-ear headphones with active noise cancellation")
                .original(12999)
                .rated(4.5, 328)
                .brand("AudioMax")
                .tags(&["audio", "wireless"])
                .age_days(40)
                .build(),
            product("2", "Smart Fitness Watch", 19999, &electronics)
                .description("Heart rate, GPS and sleep tracking")
                .rated(4.3, 156)
                .brand("FitTech")
                .tags(&["wearable", "fitness"])
                .age_days(12)
                .build(),
            product("3", "Organic Cotton T-Shirt", 2999, &clothing)
                .description("Soft, breathable everyday tee")
                .original(3999)
                .rated(4.7, 89)
                .brand("EcoWear")
                .tags(&["organic"])
                .age_days(60)
                .build(),
            product("4", "Ceramic Plant Pot Set", 4999, &home)
                .description("Three glazed pots with drainage trays")
                .rated(4.6, 203)
                .tags(&["garden", "decor"])
                .age_days(25)
                .build(),
            product("5", "Yoga Mat Pro", 5000, &sports)
                .description("Non-slip 6mm mat with carry strap")
                .rated(4.4, 412)
                .brand("ZenFit")
                .tags(&["fitness"])
                .age_days(5)
                .build(),
            product("6", "The Art of Programming", 3999, &books)
                .description("A practical guide to writing clear code")
                .rated(4.8, 1024)
                .tags(&["software"])
                .age_days(90)
                .build(),
            product("7", "Portable Bluetooth Speaker", 7999, &electronics)
                .description("Waterproof speaker with 12-hour battery")
                .rated(4.2, 178)
                .brand("AudioMax")
                .tags(&["audio", "wireless", "outdoor"])
                .age_days(18)
                .out_of_stock()
                .build(),
            product("8", "Running Shoes", 8999, &sports)
                .description("Lightweight cushioned trainers")
                .original(11999)
                .rated(4.5, 267)
                .brand("SwiftRun")
                .tags(&["running"])
                .age_days(2)
                .build(),
        ];

        debug!(count = products.len(), "Using built-in sample catalog");
        CatalogState::new(products)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, product_id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == product_id)
    }

    /// Looks up a product or fails with `NOT_FOUND`.
    pub fn require(&self, product_id: &str) -> ApiResult<&Product> {
        self.get(product_id)
            .ok_or_else(|| ApiError::not_found("Product", product_id))
    }

    /// Distinct categories in catalog order.
    pub fn categories(&self) -> Vec<ProductCategory> {
        let mut seen: Vec<ProductCategory> = Vec::new();
        for product in &self.products {
            if !product.category.id.is_empty()
                && !seen.iter().any(|c| c.id == product.category.id)
            {
                seen.push(product.category.clone());
            }
        }
        seen
    }

    /// Filters and sorts the catalog.
    pub fn browse(&self, filters: &ProductFilters, sort: SortOption) -> ApiResult<Vec<Product>> {
        let mut filters = filters.clone();
        if let Some(search) = filters.search.as_deref() {
            let trimmed = validate_search_query(search).map_err(|e| ApiError::validation(e.to_string()))?;
            filters.search = Some(trimmed).filter(|s| !s.is_empty());
        }
        Ok(catalog::apply(&self.products, &filters, sort))
    }
}

fn category(id: &str, name: &str, slug: &str) -> ProductCategory {
    let mut category = ProductCategory::new(id, name);
    category.slug = slug.to_string();
    category
}

fn product(id: &str, name: &str, price_cents: i64, category: &ProductCategory) -> SampleProduct {
    let mut product = Product::new(id, name, price_cents);
    product.category = category.clone();
    product.image_url = format!("/images/products/{}.jpg", id);
    product.sku = Some(format!("EK-{:04}", id.parse::<u32>().unwrap_or_default()));
    product.stock_quantity = 25;
    SampleProduct(product)
}

struct SampleProduct(Product);

impl SampleProduct {
    fn description(mut self, text: &str) -> Self {
        self.0.description = text.to_string();
        self
    }

    fn original(mut self, cents: i64) -> Self {
        self.0.original_price_cents = Some(cents);
        self
    }

    fn rated(mut self, rating: f64, reviews: u32) -> Self {
        self.0.rating = rating;
        self.0.review_count = reviews;
        self
    }

    fn brand(mut self, brand: &str) -> Self {
        self.0.brand = Some(brand.to_string());
        self
    }

    fn tags(mut self, tags: &[&str]) -> Self {
        self.0.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    fn age_days(mut self, days: i64) -> Self {
        let created = Utc::now() - Duration::days(days);
        self.0.created_at = created;
        self.0.updated_at = created;
        self
    }

    fn out_of_stock(mut self) -> Self {
        self.0.in_stock = false;
        self.0.stock_quantity = 0;
        self
    }

    fn build(self) -> Product {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_catalog_ids_are_unique() {
        let catalog = CatalogState::sample();
        let mut ids: Vec<&str> = catalog.products().iter().map(|p| p.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), catalog.products().len());
        assert_eq!(catalog.categories().len(), 5);
    }

    #[test]
    fn test_require_unknown_product() {
        let catalog = CatalogState::sample();
        assert!(catalog.require("1").is_ok());
        let err = catalog.require("nope").unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::NotFound);
    }

    #[test]
    fn test_browse_trims_search_and_rejects_long_queries() {
        let catalog = CatalogState::sample();
        let filters = ProductFilters {
            search: Some("  bluetooth ".to_string()),
            ..ProductFilters::default()
        };
        let found = catalog.browse(&filters, SortOption::PriceLowToHigh).unwrap();
        let ids: Vec<&str> = found.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["7", "1"]);

        let filters = ProductFilters {
            search: Some("x".repeat(101)),
            ..ProductFilters::default()
        };
        assert!(catalog.browse(&filters, SortOption::Relevance).is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        let products = vec![Product::new("a", "Alpha", 100)];
        std::fs::write(&path, serde_json::to_string(&products).unwrap()).unwrap();

        let catalog = CatalogState::from_file(&path).unwrap();
        assert_eq!(catalog.products().len(), 1);

        std::fs::write(&path, "[{").unwrap();
        assert!(CatalogState::from_file(&path).is_err());
    }
}

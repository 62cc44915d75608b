//! # Catalog Browsing
//!
//! In-memory filtering and sorting of a product list.
//!
//! ```text
//!   products ──► ProductFilters::matches (AND of every set filter)
//!                        │
//!                        ▼
//!                SortOption::sort (stable)
//!                        │
//!                        ▼
//!                  visible products
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use ts_rs::TS;

use crate::types::Product;

/// Inclusive price bounds in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PriceRange {
    pub min_cents: i64,
    pub max_cents: i64,
}

impl PriceRange {
    pub fn new(min_cents: i64, max_cents: i64) -> Self {
        PriceRange {
            min_cents,
            max_cents,
        }
    }

    #[inline]
    pub fn contains(&self, cents: i64) -> bool {
        cents >= self.min_cents && cents <= self.max_cents
    }
}

/// Catalog filters. Unset (empty / `None` / `false`) filters match everything.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct ProductFilters {
    /// Category ids; a product matches if its category is any of them.
    pub categories: Vec<String>,
    pub price_range: Option<PriceRange>,
    pub min_rating: Option<f64>,
    pub in_stock_only: bool,
    /// Brands; a product matches if its brand is any of them.
    pub brands: Vec<String>,
    /// Tags; a product matches if it carries any of them.
    pub tags: Vec<String>,
    /// Case-insensitive substring of name, description or category name.
    pub search: Option<String>,
}

impl ProductFilters {
    pub fn matches(&self, product: &Product) -> bool {
        if !self.categories.is_empty() && !self.categories.contains(&product.category.id) {
            return false;
        }

        if let Some(range) = self.price_range {
            if !range.contains(product.price_cents) {
                return false;
            }
        }

        if let Some(min_rating) = self.min_rating {
            if product.rating < min_rating {
                return false;
            }
        }

        if self.in_stock_only && !product.in_stock {
            return false;
        }

        if !self.brands.is_empty() {
            let brand_matches = product
                .brand
                .as_ref()
                .map(|brand| self.brands.iter().any(|b| b.eq_ignore_ascii_case(brand)))
                .unwrap_or(false);
            if !brand_matches {
                return false;
            }
        }

        if !self.tags.is_empty() && !product.tags.iter().any(|t| self.tags.contains(t)) {
            return false;
        }

        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                product.name.to_lowercase().contains(&term)
                    || product.description.to_lowercase().contains(&term)
                    || product.category.name.to_lowercase().contains(&term)
            }
            _ => true,
        }
    }

    /// Whether every filter is unset.
    pub fn is_empty(&self) -> bool {
        *self == ProductFilters::default()
    }
}

/// Catalog ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SortOption {
    /// Catalog order.
    #[default]
    Relevance,
    PriceLowToHigh,
    PriceHighToLow,
    /// Highest rated first.
    Rating,
    /// Most recently created first.
    Newest,
    /// Most reviewed first.
    Popularity,
}

impl SortOption {
    /// Sorts in place. Ties keep their catalog order.
    pub fn sort(&self, products: &mut [Product]) {
        match self {
            SortOption::Relevance => {}
            SortOption::PriceLowToHigh => products.sort_by_key(|p| p.price_cents),
            SortOption::PriceHighToLow => {
                products.sort_by(|a, b| b.price_cents.cmp(&a.price_cents))
            }
            SortOption::Rating => products.sort_by(|a, b| {
                b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal)
            }),
            SortOption::Newest => products.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SortOption::Popularity => products.sort_by(|a, b| b.review_count.cmp(&a.review_count)),
        }
    }
}

impl std::str::FromStr for SortOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "relevance" => Ok(SortOption::Relevance),
            "price_low_to_high" => Ok(SortOption::PriceLowToHigh),
            "price_high_to_low" => Ok(SortOption::PriceHighToLow),
            "rating" => Ok(SortOption::Rating),
            "newest" => Ok(SortOption::Newest),
            "popularity" => Ok(SortOption::Popularity),
            other => Err(format!("unknown sort option: {}", other)),
        }
    }
}

/// Filters then sorts `products`, returning the visible list.
///
/// ```rust
/// use ekart_core::catalog::{apply, ProductFilters, SortOption};
/// use ekart_core::Product;
///
/// let products = vec![
///     Product::new("p-1", "Desk Lamp", 4999),
///     Product::new("p-2", "Floor Lamp", 8999),
///     Product::new("p-3", "Notebook", 599),
/// ];
/// let filters = ProductFilters {
///     search: Some("lamp".to_string()),
///     ..ProductFilters::default()
/// };
///
/// let visible = apply(&products, &filters, SortOption::PriceHighToLow);
/// let ids: Vec<&str> = visible.iter().map(|p| p.id.as_str()).collect();
/// assert_eq!(ids, vec!["p-2", "p-1"]);
/// ```
pub fn apply(products: &[Product], filters: &ProductFilters, sort: SortOption) -> Vec<Product> {
    let mut visible: Vec<Product> = products
        .iter()
        .filter(|p| filters.matches(p))
        .cloned()
        .collect();
    sort.sort(&mut visible);
    visible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProductCategory;
    use chrono::{Duration, Utc};

    fn catalog() -> Vec<Product> {
        let audio = ProductCategory::new("electronics", "Electronics");
        let home = ProductCategory::new("home", "Home & Kitchen");
        let now = Utc::now();

        let mut headphones = Product::new("1", "Wireless Headphones", 7999);
        headphones.description = "Noise cancelling over-ear".to_string();
        headphones.category = audio.clone();
        headphones.rating = 4.5;
        headphones.review_count = 1200;
        headphones.brand = Some("Sonic".to_string());
        headphones.created_at = now - Duration::days(30);

        let mut watch = Product::new("2", "Smart Watch", 19999);
        watch.category = audio;
        watch.rating = 4.8;
        watch.review_count = 300;
        watch.in_stock = false;
        watch.tags = vec!["wearable".to_string()];
        watch.created_at = now - Duration::days(2);

        let mut kettle = Product::new("3", "Electric Kettle", 3499);
        kettle.category = home;
        kettle.rating = 4.5;
        kettle.review_count = 800;
        kettle.created_at = now - Duration::days(10);

        vec![headphones, watch, kettle]
    }

    fn ids(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_no_filters_keeps_catalog_order() {
        let products = catalog();
        let visible = apply(&products, &ProductFilters::default(), SortOption::Relevance);
        assert_eq!(ids(&visible), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_category_and_stock_filters_combine() {
        let products = catalog();
        let filters = ProductFilters {
            categories: vec!["electronics".to_string()],
            in_stock_only: true,
            ..ProductFilters::default()
        };
        assert_eq!(ids(&apply(&products, &filters, SortOption::Relevance)), vec!["1"]);
    }

    #[test]
    fn test_price_range_is_inclusive() {
        let products = catalog();
        let filters = ProductFilters {
            price_range: Some(PriceRange::new(3499, 7999)),
            ..ProductFilters::default()
        };
        assert_eq!(ids(&apply(&products, &filters, SortOption::Relevance)), vec!["1", "3"]);
    }

    #[test]
    fn test_search_covers_description_and_category() {
        let products = catalog();
        let by_description = ProductFilters {
            search: Some("NOISE".to_string()),
            ..ProductFilters::default()
        };
        assert_eq!(ids(&apply(&products, &by_description, SortOption::Relevance)), vec!["1"]);

        let by_category = ProductFilters {
            search: Some("kitchen".to_string()),
            ..ProductFilters::default()
        };
        assert_eq!(ids(&apply(&products, &by_category, SortOption::Relevance)), vec!["3"]);
    }

    #[test]
    fn test_brand_tag_and_rating_filters() {
        let products = catalog();
        let brand = ProductFilters {
            brands: vec!["sonic".to_string()],
            ..ProductFilters::default()
        };
        assert_eq!(ids(&apply(&products, &brand, SortOption::Relevance)), vec!["1"]);

        let tag = ProductFilters {
            tags: vec!["wearable".to_string()],
            ..ProductFilters::default()
        };
        assert_eq!(ids(&apply(&products, &tag, SortOption::Relevance)), vec!["2"]);

        let rating = ProductFilters {
            min_rating: Some(4.6),
            ..ProductFilters::default()
        };
        assert_eq!(ids(&apply(&products, &rating, SortOption::Relevance)), vec!["2"]);
    }

    #[test]
    fn test_sort_options() {
        let products = catalog();
        let none = ProductFilters::default();

        assert_eq!(ids(&apply(&products, &none, SortOption::PriceLowToHigh)), vec!["3", "1", "2"]);
        assert_eq!(ids(&apply(&products, &none, SortOption::PriceHighToLow)), vec!["2", "1", "3"]);
        assert_eq!(ids(&apply(&products, &none, SortOption::Newest)), vec!["2", "3", "1"]);
        assert_eq!(ids(&apply(&products, &none, SortOption::Popularity)), vec!["1", "3", "2"]);
        // 1 and 3 tie on rating and keep catalog order.
        assert_eq!(ids(&apply(&products, &none, SortOption::Rating)), vec!["2", "1", "3"]);
    }

    #[test]
    fn test_sort_option_from_str() {
        assert_eq!("price-low-to-high".parse::<SortOption>(), Ok(SortOption::PriceLowToHigh));
        assert_eq!("Newest".parse::<SortOption>(), Ok(SortOption::Newest));
        assert!("cheapest".parse::<SortOption>().is_err());
    }

    #[test]
    fn test_filters_deserialize_with_defaults() {
        let filters: ProductFilters =
            serde_json::from_str(r#"{"inStockOnly": true}"#).unwrap();
        assert!(filters.in_stock_only);
        assert!(filters.categories.is_empty());
        assert!(!filters.is_empty());
        assert!(ProductFilters::default().is_empty());
    }
}

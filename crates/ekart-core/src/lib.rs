//! # ekart-core: Pure Storefront Logic
//!
//! Everything the storefront computes lives here as plain data and pure
//! functions: the cart and its totals, catalog filtering, checkout rules.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        eKart Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    UI layer (TypeScript)                        │   │
//! │  │    Catalog ──► Product ──► Cart ──► Checkout ──► Confirmation   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │           ekart-storefront (CartEngine, commands, CLI)          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ ekart-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │   Cart    │  │  checkout │  │   │
//! │  │   │  TaxRate  │  │ Currency  │  │  Totals   │  │   rules   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   ┌───────────┐  ┌───────────┐                                 │   │
//! │  │   │  catalog  │  │ checkout  │   NO I/O • NO STORAGE • PURE    │   │
//! │  │   └───────────┘  └───────────┘                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                ekart-store (local persistence)                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Product, ProductCategory, TaxRate
//! - [`money`] - Integer-cent Money and Currency
//! - [`cart`] - Cart, line items, totals algorithm, pricing policy
//! - [`catalog`] - Product filters and sort options
//! - [`checkout`] - Checkout form and placed orders
//! - [`error`] - Domain error types
//! - [`validation`] - Cart preconditions and checkout field rules
//!
//! ## Example Usage
//!
//! ```rust
//! use ekart_core::{Cart, PricingPolicy, Product};
//!
//! let policy = PricingPolicy::default();
//! let mut cart = Cart::new(policy.currency.clone());
//!
//! cart.add_item(&Product::new("p-1", "Headphones", 9999), 1, &policy).unwrap();
//!
//! assert_eq!(cart.tax().cents(), 800);      // 7.9992 → 8.00
//! assert_eq!(cart.shipping().cents(), 0);   // over the free-shipping line
//! assert_eq!(cart.total().cents(), 10799);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartLineItem, CartTotals, PricingPolicy};
pub use catalog::{PriceRange, ProductFilters, SortOption};
pub use checkout::{CardDetails, CheckoutForm, Order, OrderStatus, PaymentMethodKind, ShippingAddress};
pub use error::{CheckoutErrors, CoreError, CoreResult, ValidationError};
pub use money::{Currency, Money};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Sales tax applied to every cart, in basis points (8%).
pub const DEFAULT_TAX_RATE_BPS: u32 = 800;

/// Flat shipping fee below the free-shipping threshold ($10.00).
pub const DEFAULT_SHIPPING_FEE_CENTS: i64 = 1000;

/// Subtotal at which shipping becomes free ($75.00, inclusive).
pub const FREE_SHIPPING_THRESHOLD_CENTS: i64 = 7500;

pub const DEFAULT_CURRENCY: &str = "USD";

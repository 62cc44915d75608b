//! # Commands Module
//!
//! Everything the UI layer (and the `ekart` CLI) can ask the storefront to do.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (exports)
//! ├── product.rs   ◄─── Catalog browsing
//! ├── cart.rs      ◄─── Cart manipulation
//! └── checkout.rs  ◄─── Form validation and order placement
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  UI / CLI                                                               │
//! │  add_to_cart(engine, catalog, "1", Some(2))                             │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  fn add_to_cart(                                                        │
//! │      engine: &CartEngine,    ◄── only the state it needs               │
//! │      catalog: &CatalogState,                                            │
//! │      product_id: &str,                                                  │
//! │      quantity: Option<i64>,                                             │
//! │  ) -> ApiResult<CartResponse>                                           │
//! │         │                                                               │
//! │         │ (serde, camelCase)                                            │
//! │         ▼                                                               │
//! │  { "cartId": "...", "items": [...], "totals": {...} }                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cart;
pub mod checkout;
pub mod product;

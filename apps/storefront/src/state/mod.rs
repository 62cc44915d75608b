//! # State Module
//!
//! Long-lived state of the storefront process.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌──────────────────────┐  │
//! │  │   CartEngine     │  │  CatalogState    │  │  StorefrontConfig    │  │
//! │  │                  │  │                  │  │                      │  │
//! │  │  Arc<Mutex<      │  │  Vec<Product>    │  │  pricing policy      │  │
//! │  │    Cart>>        │  │  (read-only)     │  │  storage backend     │  │
//! │  │  + storage       │  │                  │  │  catalog path        │  │
//! │  │  + listeners     │  │                  │  │                      │  │
//! │  └──────────────────┘  └──────────────────┘  └──────────────────────┘  │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • CartEngine: every mutation runs under its Mutex                     │
//! │  • CatalogState / StorefrontConfig: read-only after startup            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod catalog;
mod config;

pub use cart::{CartChange, CartEngine, SubscriptionId};
pub use catalog::CatalogState;
pub use config::{
    CatalogSection, ConfigError, ConfigResult, PricingSection, StorageBackend, StorageSection,
    StoreSection, StorefrontConfig,
};

//! # ekart-store: Local Persistence for eKart
//!
//! Saves the cart in client-local storage so it survives restarts.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        eKart Data Flow                                  │
//! │                                                                         │
//! │  CartEngine mutation (add_item, clear_cart, ...)                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    ekart-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   snapshot    │    │    storage    │    │     file     │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ {version,     │───►│ CartStorage   │◄───│ FileStorage  │  │   │
//! │  │   │  state.cart}  │    │ MemoryStorage │    │ temp+rename  │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ~/.local/share/ekart/ekart-cart-storage.json                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use ekart_core::{Cart, Currency};
//! use ekart_store::{load_cart, save_cart, MemoryStorage};
//!
//! let storage = MemoryStorage::new();
//! let cart = Cart::new(Currency::usd());
//!
//! save_cart(&storage, &cart).unwrap();
//! let restored = load_cart(&storage).unwrap().unwrap();
//! assert_eq!(restored.id(), cart.id());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod file;
pub mod snapshot;
pub mod storage;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use file::FileStorage;
pub use snapshot::{
    decode_cart, discard_cart, encode_cart, load_cart, save_cart, CART_SCHEMA_VERSION,
    CART_STORAGE_KEY,
};
pub use storage::{CartStorage, MemoryStorage};

//! # Error Types
//!
//! Domain-specific error types for ekart-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  ekart-core errors (this file)                                         │
//! │  ├── CoreError        - Cart precondition violations                   │
//! │  ├── ValidationError  - Single-field validation failures               │
//! │  └── CheckoutErrors   - Every invalid checkout field at once           │
//! │                                                                         │
//! │  ekart-store errors (separate crate)                                   │
//! │  └── StoreError       - Local persistence failures                     │
//! │                                                                         │
//! │  storefront errors (in app)                                            │
//! │  └── ApiError         - What the UI layer sees (serialized)            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → UI                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! "Not in cart" is deliberately absent: removing or updating a product that
//! is not in the cart is a no-op, never an error.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Cart and checkout rule violations.
///
/// Every operation that returns one of these has left the cart untouched.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Quantity passed to an add operation was zero or negative.
    ///
    /// ## User Workflow
    /// ```text
    /// add_item(product, 0)
    ///      │
    ///      ▼
    /// InvalidQuantity { quantity: 0 }   ← cart unchanged, aggregates intact
    /// ```
    #[error("Quantity must be at least 1, got {quantity}")]
    InvalidQuantity { quantity: i64 },

    /// Quantity or line total would not fit in an i64.
    #[error("Quantity for product {product_id} is too large")]
    QuantityOverflow { product_id: String },

    /// Product cannot be placed in a cart (empty id, negative price).
    #[error("Invalid product: {reason}")]
    InvalidProduct { reason: String },

    /// A checkout was attempted with no line items.
    #[error("Cannot check out an empty cart")]
    EmptyCart,

    /// A deserialized cart breaks a cart invariant.
    #[error("Inconsistent cart state: {0}")]
    InconsistentCart(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Checkout form has one or more invalid fields.
    #[error(transparent)]
    Checkout(#[from] CheckoutErrors),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors for a single field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., email, postal code).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Checkout Errors
// =============================================================================

/// All field errors of a checkout form, keyed by form field name.
///
/// The checkout page shows every message next to its input, so validation
/// collects them all instead of stopping at the first one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[error("Checkout form has {} invalid field(s)", .fields.len())]
pub struct CheckoutErrors {
    pub fields: BTreeMap<String, String>,
}

impl CheckoutErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `message` for `field`; the first message per field wins.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// `Ok(())` when no field failed, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), CheckoutErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InvalidQuantity { quantity: -2 };
        assert_eq!(err.to_string(), "Quantity must be at least 1, got -2");

        let err = CoreError::QuantityOverflow {
            product_id: "p-1".to_string(),
        };
        assert_eq!(err.to_string(), "Quantity for product p-1 is too large");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::required("id").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(core_err.to_string(), "Validation error: id is required");
    }

    #[test]
    fn test_checkout_errors_keep_first_message() {
        let mut errors = CheckoutErrors::new();
        errors.insert("email", "Email is required");
        errors.insert("email", "Please enter a valid email address");
        errors.insert("city", "City is required");

        assert_eq!(errors.get("email"), Some("Email is required"));
        assert_eq!(errors.to_string(), "Checkout form has 2 invalid field(s)");
        assert!(errors.into_result().is_err());
        assert!(CheckoutErrors::new().into_result().is_ok());
    }
}

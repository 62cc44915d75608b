//! # API Error Type
//!
//! Unified error type for storefront commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in eKart                                  │
//! │                                                                         │
//! │  UI / CLI                    Rust Backend                               │
//! │  ────────                    ────────────                               │
//! │                                                                         │
//! │  add_to_cart(id, 0)                                                     │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Unknown product? ──── ApiError::not_found ────────┐            │  │
//! │  │         │                                          │            │  │
//! │  │         ▼                                          ▼            │  │
//! │  │  Cart rule broken? ─── CoreError::InvalidQuantity ─ ApiError ──►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  { "code": "VALIDATION_ERROR", "message": "...", "details": {...} }    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use ekart_core::{CheckoutErrors, CoreError};
use ekart_store::StoreError;
use serde::Serialize;

use crate::state::ConfigError;

/// Error returned from storefront commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "CHECKOUT_INVALID",
///   "message": "Checkout form has 2 invalid field(s)",
///   "details": { "email": "Email is required", "city": "City is required" }
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// Per-field messages, for form errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Product id not in the catalog
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Cart rule violated (overflow, empty cart at checkout)
    CartError,

    /// Checkout form has invalid fields; see `details`
    CheckoutInvalid,

    /// Local storage failed
    StorageError,

    /// Configuration could not be loaded or saved
    ConfigError,

    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    pub fn cart(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::CartError, message)
    }
}

impl From<CheckoutErrors> for ApiError {
    fn from(errors: CheckoutErrors) -> Self {
        ApiError {
            code: ErrorCode::CheckoutInvalid,
            message: errors.to_string(),
            details: Some(errors.fields),
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidQuantity { .. } | CoreError::InvalidProduct { .. } => {
                ApiError::validation(err.to_string())
            }
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
            CoreError::QuantityOverflow { .. } | CoreError::EmptyCart => {
                ApiError::cart(err.to_string())
            }
            CoreError::InconsistentCart(reason) => {
                tracing::error!(%reason, "Inconsistent cart reached the command layer");
                ApiError::internal("Cart state is inconsistent")
            }
            CoreError::Checkout(errors) => errors.into(),
        }
    }
}

/// Converts storage errors to API errors.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        tracing::error!(error = %err, "Storage operation failed");
        match err {
            StoreError::Unavailable(reason) => ApiError::new(
                ErrorCode::StorageError,
                format!("Local storage unavailable: {}", reason),
            ),
            other => ApiError::new(ErrorCode::StorageError, other.to_string()),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for command functions.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkout_errors_carry_details() {
        let mut errors = CheckoutErrors::new();
        errors.insert("email", "Email is required");

        let api: ApiError = CoreError::Checkout(errors).into();
        assert_eq!(api.code, ErrorCode::CheckoutInvalid);

        let json = serde_json::to_value(&api).unwrap();
        assert_eq!(json["code"], "CHECKOUT_INVALID");
        assert_eq!(json["details"]["email"], "Email is required");
    }

    #[test]
    fn test_core_error_codes() {
        let api: ApiError = CoreError::InvalidQuantity { quantity: 0 }.into();
        assert_eq!(api.code, ErrorCode::ValidationError);

        let api: ApiError = CoreError::EmptyCart.into();
        assert_eq!(api.code, ErrorCode::CartError);

        let json = serde_json::to_value(&api).unwrap();
        assert!(json.get("details").is_none());
    }

    #[test]
    fn test_storage_error_code() {
        let api: ApiError = StoreError::unavailable("quota exceeded").into();
        assert_eq!(api.code, ErrorCode::StorageError);
        assert_eq!(api.to_string(), "[StorageError] Local storage unavailable: quota exceeded");
    }
}

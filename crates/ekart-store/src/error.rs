//! # Storage Error Types
//!
//! Error types for local persistence.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  std::io::Error / serde_json::Error                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds context and categorization            │
//! │       │                                                                 │
//! │       ├── at startup  ──► CartEngine logs it, starts a fresh cart      │
//! │       ├── on mutation ──► CartEngine logs it, keeps in-memory state    │
//! │       └── on flush    ──► returned to the caller (ApiError)            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Local persistence errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    ///
    /// ## When This Occurs
    /// - Data directory cannot be created
    /// - File permissions issue
    /// - Disk full
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The cart could not be encoded.
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// The stored record is not a valid cart envelope.
    ///
    /// ## When This Occurs
    /// - Truncated or hand-edited file
    /// - Record written by an unrelated program under the same key
    #[error("Stored data is corrupt: {0}")]
    Corrupt(String),

    /// The stored record was written with a different schema version.
    #[error("Stored schema version {found} does not match expected {expected}")]
    VersionMismatch { found: u64, expected: u32 },

    /// The backend refused the operation (quota exceeded, disabled storage).
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// The key cannot be mapped onto the backend.
    #[error("Invalid storage key: '{0}'")]
    InvalidKey(String),
}

impl StoreError {
    pub fn corrupt(message: impl Into<String>) -> Self {
        StoreError::Corrupt(message.into())
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        StoreError::Unavailable(message.into())
    }

    /// Whether the stored record should simply be discarded.
    pub fn is_discardable(&self) -> bool {
        matches!(
            self,
            StoreError::Corrupt(_) | StoreError::VersionMismatch { .. }
        )
    }
}

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

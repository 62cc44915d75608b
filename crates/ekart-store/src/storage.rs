//! # Key/Value Storage
//!
//! The `CartStorage` trait is the only thing the engine knows about where
//! carts live. Values are opaque strings, the way browser local storage
//! holds them.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use crate::error::{StoreError, StoreResult};

/// A string key/value store scoped to one client.
///
/// Implementations must be safe to share between threads; the engine calls
/// them while holding its cart lock.
pub trait CartStorage: Send + Sync {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Deletes `key`. Deleting a missing key is not an error.
    fn remove(&self, key: &str) -> StoreResult<()>;
}

// =============================================================================
// Memory Storage
// =============================================================================

/// Process-local storage for tests and ephemeral sessions.
///
/// An optional byte quota mimics browser storage limits: a `set` that would
/// push the total size of keys and values past it fails with
/// `StoreError::Unavailable` and leaves the previous value in place.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota_bytes: usize) -> Self {
        MemoryStorage {
            entries: Mutex::new(HashMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CartStorage for MemoryStorage {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut entries = self.lock();

        if let Some(quota) = self.quota_bytes {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > quota {
                return Err(StoreError::unavailable(format!(
                    "quota of {} bytes exceeded ({} needed)",
                    quota, needed
                )));
            }
        }

        debug!(key = %key, bytes = value.len(), "Stored value in memory");
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.lock().remove(key);
        Ok(())
    }
}

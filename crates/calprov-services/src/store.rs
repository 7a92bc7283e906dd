//! Secure key-value store.

use crate::BoxFuture;
use crate::error::ServiceResult;

/// Persistent, access-restricted string store keyed by caller-chosen names.
///
/// Keys and values are opaque strings. Deleting a missing key is not an
/// error.
pub trait SecureStore: Send + Sync {
    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> BoxFuture<'_, ServiceResult<()>>;

    /// Returns the value under `key`, if any.
    fn get(&self, key: &str) -> BoxFuture<'_, ServiceResult<Option<String>>>;

    /// Removes the value under `key`.
    fn delete(&self, key: &str) -> BoxFuture<'_, ServiceResult<()>>;
}

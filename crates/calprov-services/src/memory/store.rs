//! In-memory secure store.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::BoxFuture;
use crate::error::{ServiceError, ServiceResult};
use crate::store::SecureStore;

const SERVICE: &str = "memory-store";

/// Operations of [`MemoryStore`] that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    /// `set`
    Set,
    /// `get`
    Get,
    /// `delete`
    Delete,
}

#[derive(Debug, Default)]
struct State {
    entries: HashMap<String, String>,
    failures: HashMap<StoreOperation, String>,
}

/// [`SecureStore`] held in process memory. Nothing survives a restart.
///
/// Individual operations can be switched to fail with [`MemoryStore::fail`];
/// a failed call leaves the entries untouched.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to seed an entry.
    pub fn with_entry(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.entries.insert(key.into(), value.into());
        }
        self
    }

    /// Makes every later call to `op` fail with a storage error.
    pub fn fail(&self, op: StoreOperation, message: impl Into<String>) {
        if let Ok(mut state) = self.state.lock() {
            state.failures.insert(op, message.into());
        }
    }

    /// Clears all injected failures.
    pub fn clear_failures(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.failures.clear();
        }
    }

    /// Returns a copy of every entry.
    pub fn entries(&self) -> HashMap<String, String> {
        self.state
            .lock()
            .map(|s| s.entries.clone())
            .unwrap_or_default()
    }

    fn with_entries<T>(
        &self,
        op: StoreOperation,
        f: impl FnOnce(&mut HashMap<String, String>) -> T,
    ) -> ServiceResult<T> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| ServiceError::internal("store lock poisoned").with_service(SERVICE))?;
        if let Some(message) = state.failures.get(&op) {
            return Err(ServiceError::storage(message.clone()).with_service(SERVICE));
        }
        Ok(f(&mut state.entries))
    }
}

impl SecureStore for MemoryStore {
    fn set(&self, key: &str, value: &str) -> BoxFuture<'_, ServiceResult<()>> {
        let result = self.with_entries(StoreOperation::Set, |e| {
            e.insert(key.to_string(), value.to_string());
        });
        Box::pin(async move { result })
    }

    fn get(&self, key: &str) -> BoxFuture<'_, ServiceResult<Option<String>>> {
        let result = self.with_entries(StoreOperation::Get, |e| e.get(key).cloned());
        Box::pin(async move { result })
    }

    fn delete(&self, key: &str) -> BoxFuture<'_, ServiceResult<()>> {
        let result = self.with_entries(StoreOperation::Delete, |e| {
            e.remove(key);
        });
        Box::pin(async move { result })
    }
}

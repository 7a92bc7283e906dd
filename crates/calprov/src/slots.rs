//! Per-slot mutual exclusion.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Hands out one async lock per store slot.
///
/// Operations on the same slot run one at a time; different slots never
/// block each other. Entries nobody holds or waits on are pruned on the next
/// acquire, so the table only grows with the number of busy slots.
#[derive(Debug, Default)]
pub struct SlotLocks {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl SlotLocks {
    /// Creates an empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `slot`.
    pub async fn acquire(&self, slot: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks
                .entry(slot.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.lock().map(|l| l.len()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn same_slot_is_exclusive() {
        let locks = SlotLocks::new();
        let guard = locks.acquire("a").await;

        let second = tokio::time::timeout(Duration::from_millis(20), locks.acquire("a")).await;
        assert!(second.is_err());

        drop(guard);
        let third = tokio::time::timeout(Duration::from_millis(20), locks.acquire("a")).await;
        assert!(third.is_ok());
    }

    #[tokio::test]
    async fn idle_slots_are_pruned() {
        let locks = SlotLocks::new();
        drop(locks.acquire("a").await);
        drop(locks.acquire("b").await);
        let held = locks.acquire("c").await;

        assert_eq!(locks.len(), 1);
        drop(held);
        let _d = locks.acquire("d").await;
        assert_eq!(locks.len(), 1);
    }

    #[tokio::test]
    async fn different_slots_do_not_block() {
        let locks = SlotLocks::new();
        let _a = locks.acquire("a").await;
        let b = tokio::time::timeout(Duration::from_millis(20), locks.acquire("b")).await;
        assert!(b.is_ok());
    }
}

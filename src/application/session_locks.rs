//! Per-conversation serialization.
//!
//! Two turns for the same (customer, intent) pair must not interleave:
//! both would read the same collected data, race their extractions, and
//! one merge would overwrite the other. Each pair gets one async mutex,
//! held for the whole turn; turns on distinct pairs run in parallel.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::OwnedMutexGuard;

use crate::domain::foundation::{CustomerId, Intent};

/// Registry of per-conversation mutexes, populated lazily.
#[derive(Debug, Clone, Default)]
pub struct SessionLocks {
    locks: Arc<Mutex<HashMap<(CustomerId, Intent), Arc<tokio::sync::Mutex<()>>>>>,
}

impl SessionLocks {
    /// Creates an empty lock registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the mutex for one conversation, waiting if another turn
    /// holds it. The guard releases on drop.
    pub async fn acquire(
        &self,
        customer_id: &CustomerId,
        intent: &Intent,
    ) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap();
            locks
                .entry((customer_id.clone(), intent.clone()))
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }

    /// Number of conversations that have ever been locked.
    pub fn len(&self) -> usize {
        self.locks.lock().unwrap().len()
    }

    /// Returns true if no conversation has been locked yet.
    pub fn is_empty(&self) -> bool {
        self.locks.lock().unwrap().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn customer(name: &str) -> CustomerId {
        CustomerId::new(name).unwrap()
    }

    fn intent() -> Intent {
        Intent::new("find_hospital").unwrap()
    }

    #[tokio::test]
    async fn same_pair_serializes() {
        let locks = SessionLocks::new();
        let counter = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..4 {
            let locks = locks.clone();
            let counter = counter.clone();
            handles.push(tokio::spawn(async move {
                let _guard = locks.acquire(&customer("cust-1"), &intent()).await;
                // Read-modify-write with a suspension in between; without
                // the lock, increments would be lost.
                let read = counter.load(Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(10)).await;
                counter.store(read + 1, Ordering::SeqCst);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(counter.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn distinct_pairs_do_not_block_each_other() {
        let locks = SessionLocks::new();

        let _held = locks.acquire(&customer("cust-1"), &intent()).await;

        // A different customer acquires immediately.
        let acquired = tokio::time::timeout(
            Duration::from_millis(100),
            locks.acquire(&customer("cust-2"), &intent()),
        )
        .await;
        assert!(acquired.is_ok());
    }

    #[tokio::test]
    async fn reuses_the_same_mutex_per_pair() {
        let locks = SessionLocks::new();

        drop(locks.acquire(&customer("cust-1"), &intent()).await);
        drop(locks.acquire(&customer("cust-1"), &intent()).await);

        assert_eq!(locks.len(), 1);
    }
}

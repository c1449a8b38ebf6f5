use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per key, created on demand and dropped once nobody holds or waits on it.
#[derive(Debug, Default)]
pub struct KeyedLock {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl KeyedLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, key: &str) -> KeyedLockGuard<'_> {
        // The shard guard must be released before awaiting the mutex.
        let mutex = Arc::clone(&*self.locks.entry(key.to_string()).or_default());
        let guard = mutex.lock_owned().await;

        KeyedLockGuard {
            locks: &self.locks,
            key: key.to_string(),
            guard: Some(guard),
        }
    }

    /// Keys currently held or waited on.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

pub struct KeyedLockGuard<'a> {
    locks: &'a DashMap<String, Arc<Mutex<()>>>,
    key: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for KeyedLockGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        self.locks
            .remove_if(&self.key, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}

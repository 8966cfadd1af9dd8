//! Per-app-name locking

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::debug;

/// Serializes deploy invocations that target the same app name
#[derive(Debug, Default)]
pub struct NameLocks {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

/// Held for the duration of one deploy invocation
pub type NameGuard = OwnedMutexGuard<()>;

impl NameLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until no other invocation holds `name`, then hold it
    pub async fn acquire(&self, name: &str) -> NameGuard {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());

            // Drop entries nobody holds or waits on
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);

            locks
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };

        debug!("Acquiring deploy lock for {}", name);
        lock.lock_owned().await
    }

    /// Whether an invocation currently holds `name`
    pub fn is_locked(&self, name: &str) -> bool {
        let locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        locks
            .get(name)
            .map(|lock| lock.try_lock().is_err())
            .unwrap_or(false)
    }
}

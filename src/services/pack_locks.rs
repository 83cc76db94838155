//! Per-pack async mutexes.
//!
//! Order mutations on the same pack run one at a time inside this process so the
//! duplicate-order check and the writes that follow it cannot interleave.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

#[derive(Clone, Default)]
pub struct PackLocks {
    inner: Arc<Mutex<HashMap<Uuid, Arc<AsyncMutex<()>>>>>,
}

impl PackLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, orders_pack_id: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock();
            // Only entries nobody holds or waits on have a single owner
            map.retain(|_, lock| Arc::strong_count(lock) > 1);
            map.entry(orders_pack_id).or_default().clone()
        };
        lock.lock_owned().await
    }

    pub fn tracked(&self) -> usize {
        self.inner.lock().len()
    }
}

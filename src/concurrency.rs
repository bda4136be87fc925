//! Per-folder serialization of marker updates
//!
//! Marker edits are read-modify-write cycles against storage. Two edits of the
//! same folder issued from one session (a rename and a cover change, say) must
//! not interleave, or one of them drops the other's field. Edits of different
//! folders proceed independently.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

pub struct MarkerLocks {
    /// Folder id to its marker lock.
    locks: RwLock<HashMap<String, Arc<Mutex<()>>>>,
}

impl MarkerLocks {
    pub fn new() -> Self {
        Self {
            locks: RwLock::new(HashMap::new()),
        }
    }

    fn folder_lock(&self, folder_id: &str) -> Arc<Mutex<()>> {
        {
            let map = self.locks.read();
            if let Some(lock) = map.get(folder_id) {
                return lock.clone();
            }
        }

        // Re-check under the write lock; another task may have inserted it.
        let mut map = self.locks.write();
        map.entry(folder_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Wait for exclusive access to `folder_id`'s marker.
    ///
    /// The guard is owned so it can be held across storage calls.
    pub async fn lock(&self, folder_id: &str) -> OwnedMutexGuard<()> {
        self.folder_lock(folder_id).lock_owned().await
    }

    /// Forget the lock of a purged folder. Holders keep their guard.
    pub fn forget(&self, folder_id: &str) {
        self.locks.write().remove(folder_id);
    }

    pub fn len(&self) -> usize {
        self.locks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MarkerLocks {
    fn default() -> Self {
        Self::new()
    }
}

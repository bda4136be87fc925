//! Storage double that returns scripted listings, optionally held back
//! until the test releases them, so completions can be reordered.

use async_trait::async_trait;
use cloudshelf::error::StorageError;
use cloudshelf::storage::{
    Listing, MemoryStorage, ObjectEntry, ObjectMetadata, ObjectStorage, ProgressFn,
};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::oneshot;

struct Script {
    result: Result<Listing, String>,
    gate: Option<oneshot::Receiver<()>>,
}

/// Delegates to a [`MemoryStorage`] except for `list` calls that have a
/// scripted response queued for their prefix.
pub struct ScriptedStorage {
    inner: Arc<MemoryStorage>,
    scripts: Mutex<HashMap<String, VecDeque<Script>>>,
    list_calls: AtomicUsize,
}

impl ScriptedStorage {
    pub fn new() -> Self {
        Self::over(Arc::new(MemoryStorage::new()))
    }

    pub fn over(inner: Arc<MemoryStorage>) -> Self {
        Self {
            inner,
            scripts: Mutex::new(HashMap::new()),
            list_calls: AtomicUsize::new(0),
        }
    }

    fn push(&self, prefix: &str, script: Script) {
        self.scripts
            .lock()
            .entry(prefix.to_string())
            .or_default()
            .push_back(script);
    }

    /// Answer the next `list(prefix)` immediately.
    pub fn script(&self, prefix: &str, listing: Listing) {
        self.push(
            prefix,
            Script {
                result: Ok(listing),
                gate: None,
            },
        );
    }

    /// Answer the next `list(prefix)` once the returned sender fires.
    pub fn script_gated(&self, prefix: &str, listing: Listing) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.push(
            prefix,
            Script {
                result: Ok(listing),
                gate: Some(rx),
            },
        );
        tx
    }

    /// Fail the next `list(prefix)` once the returned sender fires.
    pub fn script_gated_failure(&self, prefix: &str, reason: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.push(
            prefix,
            Script {
                result: Err(reason.to_string()),
                gate: Some(rx),
            },
        );
        tx
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

pub fn folders(names: &[&str]) -> Listing {
    Listing {
        folders: names.iter().map(|n| n.to_string()).collect(),
        files: Vec::new(),
    }
}

pub fn files(prefix: &str, names: &[&str]) -> Listing {
    Listing {
        folders: Vec::new(),
        files: names
            .iter()
            .map(|n| ObjectEntry {
                name: n.to_string(),
                path: format!("{}/{}", prefix, n),
            })
            .collect(),
    }
}

#[async_trait]
impl ObjectStorage for ScriptedStorage {
    async fn list(&self, prefix: &str) -> Result<Listing, StorageError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let script = self
            .scripts
            .lock()
            .get_mut(prefix)
            .and_then(VecDeque::pop_front);
        match script {
            Some(script) => {
                if let Some(gate) = script.gate {
                    let _ = gate.await;
                }
                script.result.map_err(StorageError::Provider)
            }
            None => self.inner.list(prefix).await,
        }
    }

    async fn upload(
        &self,
        path: &str,
        data: Vec<u8>,
        progress: ProgressFn<'_>,
    ) -> Result<ObjectMetadata, StorageError> {
        self.inner.upload(path, data, progress).await
    }

    async fn download_url(&self, path: &str) -> Result<String, StorageError> {
        self.inner.download_url(path).await
    }

    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        self.inner.delete(path).await
    }

    async fn metadata(&self, path: &str) -> Result<ObjectMetadata, StorageError> {
        self.inner.metadata(path).await
    }

    async fn upload_text(
        &self,
        path: &str,
        content: &str,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.inner.upload_text(path, content, content_type).await
    }

    async fn read_text(&self, path: &str) -> Result<String, StorageError> {
        self.inner.read_text(path).await
    }
}

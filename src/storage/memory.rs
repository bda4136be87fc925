//! In-process object store with fault injection.

use super::contract::{Listing, ObjectEntry, ObjectMetadata, ObjectStorage, ProgressFn};
use crate::clock::{Clock, SystemClock};
use crate::error::StorageError;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;

#[derive(Debug, Clone)]
struct StoredObject {
    data: Vec<u8>,
    content_type: Option<String>,
    updated_ms: u64,
}

#[derive(Debug, Default)]
struct Faults {
    list_prefixes: HashSet<String>,
    upload_suffixes: HashSet<String>,
    delete_paths: HashSet<String>,
}

/// Number of calls received per operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub list: usize,
    pub upload: usize,
    pub delete: usize,
    pub metadata: usize,
    pub read_text: usize,
    pub upload_text: usize,
}

pub struct MemoryStorage {
    objects: RwLock<BTreeMap<String, StoredObject>>,
    faults: RwLock<Faults>,
    calls: RwLock<CallCounts>,
    chunk_size: usize,
    clock: Arc<dyn Clock>,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize(path: &str) -> String {
    path.trim_matches('/').to_string()
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            objects: RwLock::new(BTreeMap::new()),
            faults: RwLock::new(Faults::default()),
            calls: RwLock::new(CallCounts::default()),
            chunk_size: usize::MAX,
            clock,
        }
    }

    /// Report upload progress every `chunk_size` bytes instead of once.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn insert(&self, path: &str, data: impl Into<Vec<u8>>) {
        self.store(path, data.into(), None);
    }

    pub fn insert_text(&self, path: &str, content: &str, content_type: &str) {
        self.store(
            path,
            content.as_bytes().to_vec(),
            Some(content_type.to_string()),
        );
    }

    fn store(&self, path: &str, data: Vec<u8>, content_type: Option<String>) {
        let updated_ms = self.clock.now_ms();
        self.objects.write().insert(
            normalize(path),
            StoredObject {
                data,
                content_type,
                updated_ms,
            },
        );
    }

    pub fn contains(&self, path: &str) -> bool {
        self.objects.read().contains_key(&normalize(path))
    }

    pub fn read(&self, path: &str) -> Option<Vec<u8>> {
        self.objects
            .read()
            .get(&normalize(path))
            .map(|o| o.data.clone())
    }

    pub fn paths(&self) -> Vec<String> {
        self.objects.read().keys().cloned().collect()
    }

    pub fn fail_list(&self, prefix: &str) {
        self.faults.write().list_prefixes.insert(normalize(prefix));
    }

    /// Fail uploads whose path ends with `suffix`.
    pub fn fail_uploads_ending_with(&self, suffix: &str) {
        self.faults.write().upload_suffixes.insert(suffix.to_string());
    }

    pub fn fail_delete(&self, path: &str) {
        self.faults.write().delete_paths.insert(normalize(path));
    }

    pub fn clear_faults(&self) {
        *self.faults.write() = Faults::default();
    }

    pub fn calls(&self) -> CallCounts {
        self.calls.read().clone()
    }

    fn metadata_of(path: &str, object: &StoredObject) -> ObjectMetadata {
        ObjectMetadata {
            path: path.to_string(),
            size: object.data.len() as u64,
            content_type: object.content_type.clone(),
            updated_ms: Some(object.updated_ms),
        }
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn list(&self, prefix: &str) -> Result<Listing, StorageError> {
        self.calls.write().list += 1;
        let prefix = normalize(prefix);
        if self.faults.read().list_prefixes.contains(&prefix) {
            return Err(StorageError::Injected(format!("list {}", prefix)));
        }

        let base = format!("{}/", prefix);
        let mut folders = BTreeSet::new();
        let mut files = Vec::new();
        for path in self.objects.read().keys() {
            let Some(rest) = path.strip_prefix(&base) else {
                continue;
            };
            match rest.split_once('/') {
                Some((folder, _)) => {
                    folders.insert(folder.to_string());
                }
                None => files.push(ObjectEntry {
                    name: rest.to_string(),
                    path: path.clone(),
                }),
            }
        }

        Ok(Listing {
            folders: folders.into_iter().collect(),
            files,
        })
    }

    async fn upload(
        &self,
        path: &str,
        data: Vec<u8>,
        progress: ProgressFn<'_>,
    ) -> Result<ObjectMetadata, StorageError> {
        self.calls.write().upload += 1;
        let path = normalize(path);
        let failing = self
            .faults
            .read()
            .upload_suffixes
            .iter()
            .any(|suffix| path.ends_with(suffix.as_str()));
        if failing {
            return Err(StorageError::Injected(format!("upload {}", path)));
        }

        let total = data.len();
        if total == 0 {
            progress(0);
        }
        let mut sent = 0usize;
        while sent < total {
            sent = sent.saturating_add(self.chunk_size).min(total);
            progress(sent as u64);
        }

        let size = data.len() as u64;
        self.store(&path, data, None);
        Ok(ObjectMetadata {
            path,
            size,
            content_type: None,
            updated_ms: Some(self.clock.now_ms()),
        })
    }

    async fn download_url(&self, path: &str) -> Result<String, StorageError> {
        let path = normalize(path);
        if !self.objects.read().contains_key(&path) {
            return Err(StorageError::NotFound(path));
        }
        Ok(format!("memory://{}", path))
    }

    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        self.calls.write().delete += 1;
        let path = normalize(path);
        if self.faults.read().delete_paths.contains(&path) {
            return Err(StorageError::Injected(format!("delete {}", path)));
        }
        self.objects
            .write()
            .remove(&path)
            .map(|_| ())
            .ok_or(StorageError::NotFound(path))
    }

    async fn metadata(&self, path: &str) -> Result<ObjectMetadata, StorageError> {
        self.calls.write().metadata += 1;
        let path = normalize(path);
        let found = self
            .objects
            .read()
            .get(&path)
            .map(|o| Self::metadata_of(&path, o));
        found.ok_or(StorageError::NotFound(path))
    }

    async fn upload_text(
        &self,
        path: &str,
        content: &str,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.calls.write().upload_text += 1;
        self.insert_text(path, content, content_type);
        Ok(())
    }

    async fn read_text(&self, path: &str) -> Result<String, StorageError> {
        self.calls.write().read_text += 1;
        let path = normalize(path);
        let data = self
            .read(&path)
            .ok_or_else(|| StorageError::NotFound(path.clone()))?;
        String::from_utf8(data).map_err(|e| StorageError::Provider(e.to_string()))
    }
}

use crate::error::StorageError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Object directly under a listed prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectEntry {
    /// Last path segment.
    pub name: String,
    /// Full storage path.
    pub path: String,
}

/// One level of a hierarchical listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    /// Child prefix names (no separators).
    pub folders: Vec<String>,
    pub files: Vec<ObjectEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMetadata {
    pub path: String,
    pub size: u64,
    pub content_type: Option<String>,
    pub updated_ms: Option<u64>,
}

/// Byte-progress callback for uploads; receives bytes transferred so far.
pub type ProgressFn<'a> = &'a (dyn Fn(u64) + Send + Sync);

/// Blob storage collaborator.
///
/// Every call is a suspension point; callers must not assume ordering between
/// independently issued calls.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// List the folders and objects directly under `prefix`.
    async fn list(&self, prefix: &str) -> Result<Listing, StorageError>;

    /// Store `data` at `path`, reporting transferred bytes in order.
    async fn upload(
        &self,
        path: &str,
        data: Vec<u8>,
        progress: ProgressFn<'_>,
    ) -> Result<ObjectMetadata, StorageError>;

    async fn download_url(&self, path: &str) -> Result<String, StorageError>;

    async fn delete(&self, path: &str) -> Result<(), StorageError>;

    /// Fails with [`StorageError::NotFound`] when the object is absent.
    async fn metadata(&self, path: &str) -> Result<ObjectMetadata, StorageError>;

    async fn upload_text(
        &self,
        path: &str,
        content: &str,
        content_type: &str,
    ) -> Result<(), StorageError>;

    async fn read_text(&self, path: &str) -> Result<String, StorageError>;
}

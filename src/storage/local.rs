//! Directory-backed object store.
//!
//! Object paths map onto files below a base directory. Prefixes are plain
//! directories and disappear once their last object is deleted.

use super::contract::{Listing, ObjectEntry, ObjectMetadata, ObjectStorage, ProgressFn};
use crate::error::StorageError;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::time::UNIX_EPOCH;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use walkdir::WalkDir;

const WRITE_CHUNK: usize = 64 * 1024;

pub struct LocalStorage {
    base: PathBuf,
}

impl LocalStorage {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(path.trim_matches('/'));
        let mut resolved = self.base.clone();
        for component in relative.components() {
            match component {
                Component::Normal(segment) => resolved.push(segment),
                Component::CurDir => {}
                _ => return Err(StorageError::InvalidPath(path.to_string())),
            }
        }
        Ok(resolved)
    }

    fn map_io(path: &str, err: std::io::Error) -> StorageError {
        if err.kind() == ErrorKind::NotFound {
            StorageError::NotFound(path.to_string())
        } else {
            StorageError::Io(err)
        }
    }

    async fn ensure_parent(file: &Path) -> Result<(), StorageError> {
        if let Some(parent) = file.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Remove now-empty directories between `file` and the base directory.
    fn prune_empty_parents(&self, file: &Path) {
        let mut current = file.parent();
        while let Some(dir) = current {
            if dir == self.base || !dir.starts_with(&self.base) {
                break;
            }
            if std::fs::remove_dir(dir).is_err() {
                break;
            }
            current = dir.parent();
        }
    }
}

#[async_trait]
impl ObjectStorage for LocalStorage {
    async fn list(&self, prefix: &str) -> Result<Listing, StorageError> {
        let dir = self.resolve(prefix)?;
        let prefix = prefix.trim_matches('/').to_string();
        debug!(prefix = %prefix, dir = %dir.display(), "Listing local prefix");

        tokio::task::spawn_blocking(move || {
            let mut listing = Listing::default();
            if !dir.is_dir() {
                return Ok(listing);
            }
            for entry in WalkDir::new(&dir)
                .min_depth(1)
                .max_depth(1)
                .sort_by_file_name()
            {
                let entry = match entry {
                    Ok(e) => e,
                    Err(e) => {
                        warn!("Failed to read entry under {}: {}", dir.display(), e);
                        continue;
                    }
                };
                let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                    warn!("Skipping non UTF8 object name: {:?}", entry.path());
                    continue;
                };
                if entry.file_type().is_dir() {
                    listing.folders.push(name);
                } else if entry.file_type().is_file() {
                    let path = if prefix.is_empty() {
                        name.clone()
                    } else {
                        format!("{}/{}", prefix, name)
                    };
                    listing.files.push(ObjectEntry { name, path });
                }
            }
            Ok(listing)
        })
        .await
        .map_err(|e| StorageError::Provider(format!("listing task failed: {}", e)))?
    }

    async fn upload(
        &self,
        path: &str,
        data: Vec<u8>,
        progress: ProgressFn<'_>,
    ) -> Result<ObjectMetadata, StorageError> {
        let target = self.resolve(path)?;
        Self::ensure_parent(&target).await?;

        let mut file = tokio::fs::File::create(&target).await?;
        let mut written = 0usize;
        if data.is_empty() {
            progress(0);
        }
        for chunk in data.chunks(WRITE_CHUNK) {
            file.write_all(chunk).await?;
            written += chunk.len();
            progress(written as u64);
        }
        file.flush().await?;

        self.metadata(path).await
    }

    async fn download_url(&self, path: &str) -> Result<String, StorageError> {
        let target = self.resolve(path)?;
        let absolute = tokio::fs::canonicalize(&target)
            .await
            .map_err(|e| Self::map_io(path, e))?;
        Ok(format!("file://{}", absolute.display()))
    }

    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        let target = self.resolve(path)?;
        tokio::fs::remove_file(&target)
            .await
            .map_err(|e| Self::map_io(path, e))?;
        self.prune_empty_parents(&target);
        Ok(())
    }

    async fn metadata(&self, path: &str) -> Result<ObjectMetadata, StorageError> {
        let target = self.resolve(path)?;
        let meta = tokio::fs::metadata(&target)
            .await
            .map_err(|e| Self::map_io(path, e))?;
        if !meta.is_file() {
            return Err(StorageError::NotFound(path.to_string()));
        }
        let updated_ms = meta
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_millis() as u64);
        Ok(ObjectMetadata {
            path: path.trim_matches('/').to_string(),
            size: meta.len(),
            content_type: None,
            updated_ms,
        })
    }

    async fn upload_text(
        &self,
        path: &str,
        content: &str,
        _content_type: &str,
    ) -> Result<(), StorageError> {
        let target = self.resolve(path)?;
        Self::ensure_parent(&target).await?;
        tokio::fs::write(&target, content.as_bytes()).await?;
        Ok(())
    }

    async fn read_text(&self, path: &str) -> Result<String, StorageError> {
        let target = self.resolve(path)?;
        tokio::fs::read_to_string(&target)
            .await
            .map_err(|e| Self::map_io(path, e))
    }
}

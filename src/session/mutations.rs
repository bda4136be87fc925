//! Admin-gated mutations
//!
//! Every mutation needs an [`AdminCapability`]. After it touches storage it
//! invalidates exactly the cache entries whose contents changed, then
//! refreshes the current context.

use super::Session;
use crate::auth::AdminCapability;
use crate::error::{ApiError, StorageError};
use crate::listing::normalize_folder_key;
use crate::marker::{read_marker, write_marker, FolderMarker};
use crate::storage::layout::validate_folder_id;
use crate::types::ListingContext;
use crate::upload::{UploadFile, UploadReport, UploadTracker};
use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, info, warn};

/// A mutation requested by the UI.
#[derive(Debug, Clone)]
pub enum Mutation {
    CreateFolder { name: String },
    RenameFolder { id: String, name: String },
    SetFolderCover { id: String, file: UploadFile },
    DeleteFolder { id: String },
    DeleteFile { path: String },
    /// Upload into `folder_id`, or into the current folder when `None`.
    Upload {
        folder_id: Option<String>,
        files: Vec<UploadFile>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    FolderCreated { id: String },
    /// `changed` is false when the rename was a no-op.
    FolderRenamed { id: String, changed: bool },
    CoverSet { id: String, path: String },
    FolderPurged(PurgeReport),
    FileDeleted { path: String },
    Uploaded(UploadReport),
}

/// Result of deleting every object under a folder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PurgeReport {
    pub deleted: Vec<String>,
    /// Objects that could not be deleted, with the reason.
    pub failed: Vec<(String, String)>,
    /// Set when the folder could not be listed at all.
    pub listing_error: Option<String>,
}

impl PurgeReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && self.listing_error.is_none()
    }
}

impl Session {
    /// Dispatch a mutation. Fails closed with `AdminRequired` when the gate
    /// is locked, without contacting storage.
    pub async fn on_mutate(&self, mutation: Mutation) -> Result<MutationOutcome, ApiError> {
        let cap = self.require_admin()?;
        match mutation {
            Mutation::CreateFolder { name } => self
                .create_folder(&cap, &name)
                .await
                .map(|id| MutationOutcome::FolderCreated { id }),
            Mutation::RenameFolder { id, name } => {
                let changed = self.rename_folder(&cap, &id, &name).await?;
                Ok(MutationOutcome::FolderRenamed { id, changed })
            }
            Mutation::SetFolderCover { id, file } => {
                let path = self.set_folder_cover(&cap, &id, file).await?;
                Ok(MutationOutcome::CoverSet { id, path })
            }
            Mutation::DeleteFolder { id } => self
                .delete_folder(&cap, &id)
                .await
                .map(MutationOutcome::FolderPurged),
            Mutation::DeleteFile { path } => {
                self.delete_file(&cap, &path).await?;
                Ok(MutationOutcome::FileDeleted { path })
            }
            Mutation::Upload { folder_id, files } => {
                let report = match folder_id {
                    Some(id) => self.upload_files(&cap, &id, files).await?,
                    None => self.upload_to_current(&cap, files).await?,
                };
                Ok(MutationOutcome::Uploaded(report))
            }
        }
    }

    /// Create a folder from a display name. Returns the derived id.
    pub async fn create_folder(&self, _cap: &AdminCapability, name: &str) -> Result<String, ApiError> {
        let display_name = name.trim();
        let id = normalize_folder_key(display_name);
        validate_folder_id(&id)?;

        let _guard = self.markers.lock(&id).await;
        let marker_path = self.layout.marker_path(&id);
        match self.storage.metadata(&marker_path).await {
            Ok(_) => return Err(ApiError::AlreadyExists(id)),
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e.into()),
        }

        write_marker(
            self.storage.as_ref(),
            &self.layout,
            &id,
            &FolderMarker::named(display_name),
        )
        .await?;
        info!(folder = %id, name = %display_name, "Folder created");

        self.cache.invalidate(&ListingContext::Root);
        self.refresh().await;
        Ok(id)
    }

    /// Change a folder's display name. The storage id never changes.
    ///
    /// Returns `false` without writing when the trimmed name is empty or equal
    /// to the current display name.
    pub async fn rename_folder(
        &self,
        _cap: &AdminCapability,
        id: &str,
        new_name: &str,
    ) -> Result<bool, ApiError> {
        let name = new_name.trim();
        if name.is_empty() {
            return Ok(false);
        }

        let _guard = self.markers.lock(id).await;
        let mut marker = read_marker(self.storage.as_ref(), &self.layout, id)
            .await?
            .unwrap_or_default();
        if marker.display_name().unwrap_or(id) == name {
            debug!(folder = id, "Rename to the same name ignored");
            return Ok(false);
        }

        marker.name = Some(name.to_string());
        marker.updated_at = i64::try_from(self.clock.now_ms()).ok();
        write_marker(self.storage.as_ref(), &self.layout, id, &marker).await?;
        info!(folder = id, name = %name, "Folder renamed");

        self.cache.invalidate(&ListingContext::Root);
        self.refresh().await;
        Ok(true)
    }

    /// Upload a cover image and point the folder marker at it.
    ///
    /// A marker that cannot be updated after a successful upload is logged
    /// and ignored. Returns the cover's storage path.
    pub async fn set_folder_cover(
        &self,
        _cap: &AdminCapability,
        id: &str,
        file: UploadFile,
    ) -> Result<String, ApiError> {
        validate_folder_id(id)?;
        let path = self.layout.cover_path(id, self.clock.now_ms(), &file.name);
        let tracker = UploadTracker::new(std::slice::from_ref(&file));

        debug!(path = %path, size = file.size(), "Uploading cover");
        let progress = |bytes: u64| self.sink.upload_progress(&tracker.record(0, bytes));
        self.storage
            .upload(&path, file.data, &progress)
            .await
            .map_err(|source| ApiError::UploadFailure {
                path: path.clone(),
                source,
            })?;

        if let Err(e) = self.point_marker_at_cover(id, &path).await {
            warn!(folder = id, error = %e, "Cover uploaded but marker update failed");
        }
        info!(folder = id, cover = %path, "Folder cover set");

        self.cache.invalidate(&ListingContext::Root);
        self.refresh().await;
        Ok(path)
    }

    async fn point_marker_at_cover(&self, id: &str, cover: &str) -> Result<(), ApiError> {
        let _guard = self.markers.lock(id).await;
        let mut marker = read_marker(self.storage.as_ref(), &self.layout, id)
            .await?
            .unwrap_or_default();
        marker.cover = Some(cover.to_string());
        write_marker(self.storage.as_ref(), &self.layout, id, &marker).await
    }

    /// Delete every object under a folder, concurrently and best-effort.
    ///
    /// Individual failures are collected in the report instead of aborting
    /// the batch; the folder and root caches are invalidated regardless.
    pub async fn delete_folder(&self, _cap: &AdminCapability, id: &str) -> Result<PurgeReport, ApiError> {
        validate_folder_id(id)?;
        let prefix = self.layout.folder_prefix(id);
        let mut report = PurgeReport::default();

        debug!(prefix = %prefix, "Purging folder");
        match self.storage.list(&prefix).await {
            Ok(listing) => {
                let storage = self.storage.as_ref();
                let results = join_all(listing.files.into_iter().map(|entry| async move {
                    let result = storage.delete(&entry.path).await;
                    (entry.path, result)
                }))
                .await;

                for (path, result) in results {
                    match result {
                        Ok(()) => report.deleted.push(path),
                        Err(e) => {
                            warn!(path = %path, error = %e, "Delete failed during purge");
                            report.failed.push((path, e.to_string()));
                        }
                    }
                }
            }
            Err(e) => {
                warn!(prefix = %prefix, error = %e, "Could not list folder for purge");
                report.listing_error = Some(e.to_string());
            }
        }
        info!(
            folder = id,
            deleted = report.deleted.len(),
            failed = report.failed.len(),
            "Folder purged"
        );

        self.cache.invalidate(&ListingContext::Folder(id.to_string()));
        self.cache.invalidate(&ListingContext::Root);
        self.markers.forget(id);
        self.refresh().await;
        Ok(report)
    }

    /// Delete a single object. Caches are invalidated and the listing
    /// refreshed even when the delete fails.
    pub async fn delete_file(&self, _cap: &AdminCapability, path: &str) -> Result<(), ApiError> {
        debug!(path = %path, "Deleting file");
        let result = self.storage.delete(path).await;

        if let Some(folder) = self.layout.owning_folder(path) {
            self.cache.invalidate(&ListingContext::Folder(folder));
        }
        self.cache.invalidate(&ListingContext::Root);
        self.refresh().await;

        match result {
            Ok(()) => {
                info!(path = %path, "File deleted");
                Ok(())
            }
            Err(source) => {
                warn!(path = %path, error = %source, "File delete failed");
                Err(ApiError::DeleteFailure {
                    path: path.to_string(),
                    source,
                })
            }
        }
    }

    /// Upload into the folder currently open.
    pub async fn upload_to_current(
        &self,
        cap: &AdminCapability,
        files: Vec<UploadFile>,
    ) -> Result<UploadReport, ApiError> {
        let folder = self
            .context()
            .folder_id()
            .map(str::to_string)
            .ok_or(ApiError::NoFolderSelected)?;
        self.upload_files(cap, &folder, files).await
    }

    /// Upload `files` one after another into `folder_id`.
    ///
    /// Progress is reported per chunk as the aggregate over the whole batch.
    /// Caches are invalidated once, after the last file.
    pub async fn upload_files(
        &self,
        _cap: &AdminCapability,
        folder_id: &str,
        files: Vec<UploadFile>,
    ) -> Result<UploadReport, ApiError> {
        validate_folder_id(folder_id)?;
        let tracker = UploadTracker::new(&files);
        let mut report = UploadReport {
            paths: Vec::with_capacity(files.len()),
            total_bytes: tracker.total_bytes(),
        };

        for (index, file) in files.into_iter().enumerate() {
            let path = self
                .layout
                .upload_path(folder_id, self.clock.now_ms(), &file.name);
            debug!(path = %path, size = file.size(), "Uploading file");

            let progress = |bytes: u64| self.sink.upload_progress(&tracker.record(index, bytes));
            if let Err(source) = self.storage.upload(&path, file.data, &progress).await {
                warn!(path = %path, error = %source, "Upload failed");
                if !report.paths.is_empty() {
                    self.invalidate_after_upload(folder_id).await;
                }
                return Err(upload_failure(path, source));
            }
            report.paths.push(path);
        }

        info!(folder = folder_id, files = report.paths.len(), bytes = report.total_bytes, "Upload finished");
        self.invalidate_after_upload(folder_id).await;
        Ok(report)
    }

    async fn invalidate_after_upload(&self, folder_id: &str) {
        self.cache
            .invalidate(&ListingContext::Folder(folder_id.to_string()));
        self.cache.invalidate(&ListingContext::Root);
        self.refresh().await;
    }
}

fn upload_failure(path: String, source: StorageError) -> ApiError {
    ApiError::UploadFailure { path, source }
}

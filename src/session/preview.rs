//! Read-only helpers that need no admin capability.

use super::Session;
use crate::error::ApiError;
use crate::listing::infer_file_type;
use crate::marker::read_marker;
use crate::storage::{ObjectEntry, StorageLayout};
use crate::types::Item;
use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, warn};

/// Image shown on a folder card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FolderPreview {
    /// Cover set through the folder marker.
    Cover { path: String, url: String },
    /// First image in the folder.
    Image { path: String, url: String },
    /// First PDF in the folder.
    Pdf { path: String, url: String },
    None,
}

impl FolderPreview {
    pub fn url(&self) -> Option<&str> {
        match self {
            FolderPreview::Cover { url, .. }
            | FolderPreview::Image { url, .. }
            | FolderPreview::Pdf { url, .. } => Some(url),
            FolderPreview::None => None,
        }
    }
}

impl Session {
    pub async fn download_url(&self, path: &str) -> Result<String, ApiError> {
        Ok(self.storage.download_url(path).await?)
    }

    /// Resolve a folder card preview: marker cover, else the first image,
    /// else the first PDF. Lookup failures degrade to the next candidate.
    pub async fn folder_preview(&self, folder_id: &str) -> FolderPreview {
        match read_marker(self.storage.as_ref(), &self.layout, folder_id).await {
            Ok(Some(marker)) => {
                if let Some(cover) = marker.cover {
                    match self.storage.download_url(&cover).await {
                        Ok(url) => return FolderPreview::Cover { path: cover, url },
                        Err(e) => debug!(folder = folder_id, error = %e, "Cover not available"),
                    }
                }
            }
            Ok(None) => {}
            Err(e) => debug!(folder = folder_id, error = %e, "Marker not readable"),
        }

        let prefix = self.layout.folder_prefix(folder_id);
        let listing = match self.storage.list(&prefix).await {
            Ok(listing) => listing,
            Err(e) => {
                warn!(folder = folder_id, error = %e, "Folder preview unavailable");
                return FolderPreview::None;
            }
        };

        let first_of = |wanted: &str| -> Option<ObjectEntry> {
            listing
                .files
                .iter()
                .find(|entry| {
                    !StorageLayout::is_marker(&entry.name) && infer_file_type(&entry.name) == wanted
                })
                .cloned()
        };

        if let Some(entry) = first_of("image/*") {
            return match self.storage.download_url(&entry.path).await {
                Ok(url) => FolderPreview::Image {
                    path: entry.path,
                    url,
                },
                Err(e) => {
                    warn!(path = %entry.path, error = %e, "Folder preview unavailable");
                    FolderPreview::None
                }
            };
        }
        if let Some(entry) = first_of("application/pdf") {
            return match self.storage.download_url(&entry.path).await {
                Ok(url) => FolderPreview::Pdf {
                    path: entry.path,
                    url,
                },
                Err(e) => {
                    warn!(path = %entry.path, error = %e, "Folder preview unavailable");
                    FolderPreview::None
                }
            };
        }
        FolderPreview::None
    }

    /// Fill `thumbnail_url` on every folder in `items` from its card preview.
    /// Folders without a preview are left at `None`.
    pub async fn resolve_thumbnails(&self, items: &mut [Item]) {
        let urls = join_all(items.iter().map(|item| async move {
            let folder = item.as_folder()?;
            self.folder_preview(&folder.id).await.url().map(str::to_string)
        }))
        .await;

        for (item, url) in items.iter_mut().zip(urls) {
            if let Item::Folder(folder) = item {
                folder.thumbnail_url = url;
            }
        }
    }

    /// Load a folder's files for an inline panel, without navigating.
    pub async fn open_folder_panel(&self, folder_id: &str) -> Result<Vec<Item>, ApiError> {
        self.fetcher
            .load_folder_files(folder_id)
            .await
            .map_err(ApiError::ListingFailure)
    }
}

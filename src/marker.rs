//! Folder metadata marker
//!
//! A small JSON object stored next to a folder's files. It is the only source
//! of the folder's display name and cover image. Unknown fields are ignored and
//! missing fields default to `None`, so older and newer writers interoperate.

use crate::error::{ApiError, StorageError};
use crate::storage::{ObjectStorage, StorageLayout};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const MARKER_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderMarker {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Storage path of the cover image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    #[serde(
        default,
        rename = "updatedAt",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<i64>,
}

impl FolderMarker {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Display name, if the marker carries a non-empty one.
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }

    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Read the marker of `folder_id`.
///
/// Absent and unparsable markers both read as `None`; only other storage
/// failures are returned.
pub async fn read_marker(
    storage: &dyn ObjectStorage,
    layout: &StorageLayout,
    folder_id: &str,
) -> Result<Option<FolderMarker>, StorageError> {
    let path = layout.marker_path(folder_id);
    let raw = match storage.read_text(&path).await {
        Ok(raw) => raw,
        Err(e) if e.is_not_found() => {
            debug!(folder = folder_id, "No folder marker");
            return Ok(None);
        }
        Err(e) => return Err(e),
    };

    match FolderMarker::parse(&raw) {
        Ok(marker) => Ok(Some(marker)),
        Err(e) => {
            warn!(path = %path, error = %e, "Ignoring unparsable folder marker");
            Ok(None)
        }
    }
}

/// Overwrite the marker of `folder_id`. Last writer wins.
pub async fn write_marker(
    storage: &dyn ObjectStorage,
    layout: &StorageLayout,
    folder_id: &str,
    marker: &FolderMarker,
) -> Result<(), ApiError> {
    let path = layout.marker_path(folder_id);
    let body = marker.to_json().map_err(|e| ApiError::Marker {
        path: path.clone(),
        reason: e.to_string(),
    })?;
    storage
        .upload_text(&path, &body, MARKER_CONTENT_TYPE)
        .await
        .map_err(|e| ApiError::Marker {
            path,
            reason: e.to_string(),
        })
}

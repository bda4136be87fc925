//! Path conventions inside the storage tree.

use crate::error::ApiError;

pub const DEFAULT_ROOT_PREFIX: &str = "projects";

/// Marker object holding a folder's display name and cover.
pub const MARKER_FILE: &str = "__folder__.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLayout {
    root: String,
}

impl Default for StorageLayout {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT_PREFIX)
    }
}

impl StorageLayout {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into().trim_matches('/').to_string(),
        }
    }

    pub fn root_prefix(&self) -> &str {
        &self.root
    }

    pub fn folder_prefix(&self, folder_id: &str) -> String {
        format!("{}/{}", self.root, folder_id)
    }

    pub fn marker_path(&self, folder_id: &str) -> String {
        format!("{}/{}/{}", self.root, folder_id, MARKER_FILE)
    }

    pub fn file_path(&self, folder_id: &str, name: &str) -> String {
        format!("{}/{}/{}", self.root, folder_id, name)
    }

    /// `<root>/<folder>/<ts>_<name>`
    pub fn upload_path(&self, folder_id: &str, timestamp_ms: u64, name: &str) -> String {
        self.file_path(
            folder_id,
            &format!("{}_{}", timestamp_ms, sanitize_object_name(name)),
        )
    }

    /// `<root>/<folder>/cover_<ts>_<name>`
    pub fn cover_path(&self, folder_id: &str, timestamp_ms: u64, name: &str) -> String {
        self.file_path(
            folder_id,
            &format!("cover_{}_{}", timestamp_ms, sanitize_object_name(name)),
        )
    }

    /// Folder id that owns `path`, when `path` sits inside this layout.
    pub fn owning_folder(&self, path: &str) -> Option<String> {
        let rest = path.strip_prefix(&self.root)?.strip_prefix('/')?;
        let (folder, _) = rest.split_once('/')?;
        if folder.is_empty() {
            None
        } else {
            Some(folder.to_string())
        }
    }

    pub fn is_marker(name: &str) -> bool {
        name == MARKER_FILE
    }
}

/// Replace path separators so an uploaded name stays a single segment.
pub fn sanitize_object_name(name: &str) -> String {
    name.trim().replace(|c: char| c == '/' || c == '\\', "_")
}

/// Reject folder ids that would escape their prefix.
pub fn validate_folder_id(id: &str) -> Result<(), ApiError> {
    if id.is_empty() {
        return Err(ApiError::InvalidName("folder name cannot be empty".to_string()));
    }
    if id == "." || id == ".." || id.contains('/') || id.contains('\\') {
        return Err(ApiError::InvalidName(format!(
            "folder name cannot contain path separators: {}",
            id
        )));
    }
    Ok(())
}

//! Core types shared by the listing pipeline and the session.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Folder entry of a root listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderItem {
    /// Storage identifier (the prefix segment under the storage root).
    pub id: String,
    /// Display name, taken from the folder marker when one exists.
    pub name: String,
    /// Card preview URL; set by `Session::resolve_thumbnails`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

/// File entry of a folder listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileItem {
    /// `<folderId>/<name>`
    pub id: String,
    pub name: String,
    /// MIME-like hint inferred from the extension. Empty when unknown.
    pub file_type: String,
    /// Full storage address; the dedup key for files.
    pub file_path: String,
}

/// A listed entry: either a folder or a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Item {
    Folder(FolderItem),
    File(FileItem),
}

impl Item {
    pub fn folder(id: impl Into<String>, name: impl Into<String>) -> Self {
        Item::Folder(FolderItem {
            id: id.into(),
            name: name.into(),
            thumbnail_url: None,
        })
    }

    pub fn file(
        id: impl Into<String>,
        name: impl Into<String>,
        file_type: impl Into<String>,
        file_path: impl Into<String>,
    ) -> Self {
        Item::File(FileItem {
            id: id.into(),
            name: name.into(),
            file_type: file_type.into(),
            file_path: file_path.into(),
        })
    }

    pub fn id(&self) -> &str {
        match self {
            Item::Folder(f) => &f.id,
            Item::File(f) => &f.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Item::Folder(f) => &f.name,
            Item::File(f) => &f.name,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Item::Folder(_))
    }

    pub fn as_folder(&self) -> Option<&FolderItem> {
        match self {
            Item::Folder(f) => Some(f),
            Item::File(_) => None,
        }
    }

    pub fn as_file(&self) -> Option<&FileItem> {
        match self {
            Item::File(f) => Some(f),
            Item::Folder(_) => None,
        }
    }
}

/// Unit of cache keying and query targeting: the root, or one folder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListingContext {
    Root,
    Folder(String),
}

impl ListingContext {
    pub fn is_root(&self) -> bool {
        matches!(self, ListingContext::Root)
    }

    pub fn folder_id(&self) -> Option<&str> {
        match self {
            ListingContext::Root => None,
            ListingContext::Folder(id) => Some(id),
        }
    }
}

impl fmt::Display for ListingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListingContext::Root => write!(f, "root"),
            ListingContext::Folder(id) => write!(f, "folder:{}", id),
        }
    }
}

/// Grid or list presentation of the current listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Grid => ViewMode::List,
            ViewMode::List => ViewMode::Grid,
        }
    }
}

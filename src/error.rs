//! Error types
//!
//! `StorageError` covers failures reported by the object storage collaborator.
//! `ApiError` is the taxonomy surfaced by the session, the admin gate and the CLI.

use thiserror::Error;

/// Failures reported by an [`ObjectStorage`](crate::storage::ObjectStorage) backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object not found: {0}")]
    NotFound(String),

    #[error("invalid storage path: {0}")]
    InvalidPath(String),

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage provider error: {0}")]
    Provider(String),

    /// Fault injected by a test backend.
    #[error("injected failure: {0}")]
    Injected(String),
}

impl StorageError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound(_))
    }
}

/// Errors surfaced by session operations.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("sign-in rejected: {0}")]
    AuthFailure(String),

    #[error("admin password is not configured")]
    NotConfigured,

    #[error("wrong admin password")]
    WrongPassword,

    /// A mutation was refused because the admin gate is locked.
    #[error("admin authorization required")]
    AdminRequired { not_configured: bool },

    #[error("a folder with this name already exists: {0}")]
    AlreadyExists(String),

    #[error("invalid name: {0}")]
    InvalidName(String),

    #[error("open a folder before uploading files")]
    NoFolderSelected,

    #[error("listing failed: {0}")]
    ListingFailure(StorageError),

    #[error("upload of {path} failed: {source}")]
    UploadFailure {
        path: String,
        #[source]
        source: StorageError,
    },

    #[error("delete of {path} failed: {source}")]
    DeleteFailure {
        path: String,
        #[source]
        source: StorageError,
    },

    #[error("folder marker {path} could not be written: {reason}")]
    Marker { path: String, reason: String },

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    StorageError(#[from] StorageError),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

//! Configuration
//!
//! Layered with the `config` crate: built-in defaults, the global file
//! `$XDG_CONFIG_HOME/cloudshelf/config.toml`, an explicit `--config` file, then
//! `CLOUDSHELF_<SECTION>__<KEY>` environment variables.

pub mod facade;
pub mod merge;
pub mod paths;
pub mod sources;

pub use facade::ConfigLoader;

use crate::auth::Account;
use crate::cache::DEFAULT_TTL_MS;
use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::storage::{LocalStorage, MemoryStorage, ObjectStorage, StorageLayout, DEFAULT_ROOT_PREFIX};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Objects under a local directory.
    #[default]
    Local,
    /// In-process only; nothing survives the process.
    Memory,
}

fn default_root_prefix() -> String {
    DEFAULT_ROOT_PREFIX.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Top-level prefix holding every folder.
    #[serde(default = "default_root_prefix")]
    pub root_prefix: String,

    /// Object directory of the local backend.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            root_prefix: default_root_prefix(),
            data_dir: None,
        }
    }
}

impl StorageConfig {
    pub fn resolve_data_dir(&self) -> Result<PathBuf, ApiError> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => paths::default_objects_dir(),
        }
    }

    pub fn layout(&self) -> StorageLayout {
        StorageLayout::new(self.root_prefix.clone())
    }

    /// Instantiate the configured backend.
    pub fn open(&self) -> Result<Arc<dyn ObjectStorage>, ApiError> {
        let storage: Arc<dyn ObjectStorage> = match self.backend {
            StorageBackend::Local => Arc::new(LocalStorage::new(self.resolve_data_dir()?)),
            StorageBackend::Memory => Arc::new(MemoryStorage::new()),
        };
        Ok(storage)
    }
}

fn default_ttl_ms() -> u64 {
    DEFAULT_TTL_MS
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Freshness window of cached listings.
    #[serde(default = "default_ttl_ms")]
    pub ttl_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_ms: default_ttl_ms(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminConfig {
    /// SHA-256 hex digest of the admin password, or the password itself.
    #[serde(default)]
    pub password_hash: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub accounts: Vec<Account>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShelfConfig {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub admin: AdminConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ShelfConfig {
    pub fn validate(&self) -> Result<(), ApiError> {
        let prefix = &self.storage.root_prefix;
        if prefix.trim().is_empty() {
            return Err(ApiError::ConfigError(
                "storage.root_prefix cannot be empty".to_string(),
            ));
        }
        if prefix.starts_with('/') || prefix.ends_with('/') {
            return Err(ApiError::ConfigError(format!(
                "storage.root_prefix cannot start or end with '/': {}",
                prefix
            )));
        }
        if self.cache.ttl_ms == 0 {
            return Err(ApiError::ConfigError(
                "cache.ttl_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

//! ConfigLoader facade delegating to the merge service.

use super::merge::service::MergeService;
use super::paths;
use super::ShelfConfig;
use crate::error::ApiError;
use std::path::Path;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load from the global file, `explicit` when given, and the environment,
    /// then validate.
    pub fn load(explicit: Option<&Path>) -> Result<ShelfConfig, ApiError> {
        let global = paths::global_config_path();
        Self::load_with_global(global.as_deref(), explicit)
    }

    /// Like [`load`](Self::load) with a caller-chosen global file.
    pub fn load_with_global(
        global: Option<&Path>,
        explicit: Option<&Path>,
    ) -> Result<ShelfConfig, ApiError> {
        let config = MergeService::load(global, explicit)?;
        config.validate()?;
        Ok(config)
    }

    pub fn default() -> ShelfConfig {
        ShelfConfig::default()
    }
}

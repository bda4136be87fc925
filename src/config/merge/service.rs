//! MergeService: orchestrates sources, applies merge policy, deserializes to ShelfConfig.

use super::policy;
use crate::config::sources::{environment, file};
use crate::config::ShelfConfig;
use config::ConfigError;
use std::path::Path;

pub struct MergeService;

impl MergeService {
    /// Precedence: defaults (lowest) -> global file -> explicit file -> environment (highest).
    pub fn load(global: Option<&Path>, explicit: Option<&Path>) -> Result<ShelfConfig, ConfigError> {
        let builder = policy::builder_with_defaults()?;
        let builder = file::add_global(builder, global)?;
        let builder = match explicit {
            Some(path) => file::add_explicit(builder, path)?,
            None => builder,
        };
        let builder = environment::add_to_builder(builder)?;

        builder.build()?.try_deserialize()
    }
}

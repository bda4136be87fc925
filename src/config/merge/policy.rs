//! Built-in defaults applied beneath every other source.

use crate::cache::DEFAULT_TTL_MS;
use crate::storage::DEFAULT_ROOT_PREFIX;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("storage.backend", "local")?
        .set_default("storage.root_prefix", DEFAULT_ROOT_PREFIX)?
        .set_default("cache.ttl_ms", DEFAULT_TTL_MS as i64)
}

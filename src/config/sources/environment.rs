//! Environment variable source: CLOUDSHELF_<SECTION>__<KEY>

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

pub const ENV_PREFIX: &str = "CLOUDSHELF";

/// Add the environment overlay. `CLOUDSHELF_CACHE__TTL_MS` sets `cache.ttl_ms`.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    ))
}

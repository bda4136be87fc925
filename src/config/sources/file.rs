//! TOML file sources.

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File, FileFormat};
use std::path::Path;
use tracing::debug;

/// Add the global config file when it exists.
pub fn add_global(
    builder: ConfigBuilder<DefaultState>,
    path: Option<&Path>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    match path {
        Some(path) if path.is_file() => {
            debug!(path = %path.display(), "Loading global config");
            Ok(builder.add_source(File::from(path).format(FileFormat::Toml).required(false)))
        }
        _ => Ok(builder),
    }
}

/// Add an explicitly requested file. It must exist.
pub fn add_explicit(
    builder: ConfigBuilder<DefaultState>,
    path: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::Message(format!(
            "config file not found: {}",
            path.display()
        )));
    }
    debug!(path = %path.display(), "Loading config file");
    Ok(builder.add_source(File::from(path).format(FileFormat::Toml).required(true)))
}

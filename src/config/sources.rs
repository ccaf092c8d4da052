//! Configuration sources: global file, explicit file and `EAGLEBRIDGE__*` environment.

use super::paths;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment, File};
use std::path::Path;

/// Keys whose environment values are split on `,` into lists.
const LIST_KEYS: [&str; 2] = ["catalog.media_types", "catalog.tags"];

/// Add the global config file if it exists.
pub fn add_global_file(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    match paths::global_config_path() {
        Some(path) => Ok(builder.add_source(File::from(path).required(false))),
        None => Ok(builder),
    }
}

/// Add a file named on the command line; it must exist.
pub fn add_explicit_file(
    builder: ConfigBuilder<DefaultState>,
    path: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::NotFound(path.display().to_string()));
    }
    Ok(builder.add_source(File::from(path).required(true)))
}

/// Add environment variable overlay to builder.
/// Uses EAGLEBRIDGE prefix and __ as separator for nested keys.
pub fn add_environment(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(builder.add_source(environment()))
}

fn environment() -> Environment {
    LIST_KEYS.iter().fold(
        Environment::with_prefix("EAGLEBRIDGE")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
            .list_separator(","),
        |env, key| env.with_list_parse_key(key),
    )
}

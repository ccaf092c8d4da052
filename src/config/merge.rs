//! MergeService: orchestrates sources and deserializes to BridgeConfig.

use super::sources;
use super::BridgeConfig;
use config::{Config, ConfigError};
use std::path::Path;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Precedence: defaults (lowest) -> global file -> explicit file -> environment (highest).
    pub fn load(explicit_file: Option<&Path>) -> Result<BridgeConfig, ConfigError> {
        let builder = sources::add_global_file(Config::builder())?;
        let builder = match explicit_file {
            Some(path) => sources::add_explicit_file(builder, path)?,
            None => builder,
        };
        let builder = sources::add_environment(builder)?;

        let mut config: BridgeConfig = builder.build()?.try_deserialize()?;
        config.immich = config.immich.with_env_fallback();
        tracing::debug!(
            catalog = ?config.catalog.path,
            eagle = %config.eagle.base_url(),
            "Configuration loaded"
        );
        Ok(config)
    }
}

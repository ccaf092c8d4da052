//! Configuration
//!
//! Layered configuration for the bridge: built-in defaults, the global
//! `config.toml`, an explicit `--config` file, then `EAGLEBRIDGE__*`
//! environment variables.

pub mod facade;
pub mod merge;
pub mod paths;
pub mod sources;

pub use facade::ConfigLoader;

use crate::logging::LoggingConfig;
use crate::types::{FilterConfig, MediaType};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub eagle: EagleConfig,

    #[serde(default)]
    pub immich: ImmichConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BridgeConfig {
    /// Admission policy from the `catalog` section.
    pub fn filter_config(&self) -> FilterConfig {
        let allowed_types = if self.catalog.media_types.is_empty() {
            MediaType::default_allowed()
        } else {
            self.catalog.media_types.iter().copied().collect()
        };
        FilterConfig {
            include_deleted: self.catalog.include_deleted,
            allowed_types,
            tag_filter: None,
        }
        .with_tags(self.catalog.tags.iter().cloned())
    }
}

fn default_media_types() -> Vec<MediaType> {
    MediaType::default_allowed().into_iter().collect()
}

/// Library location and default filter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Eagle library root (`*.library` directory)
    #[serde(default)]
    pub path: Option<PathBuf>,

    #[serde(default)]
    pub include_deleted: bool,

    #[serde(default = "default_media_types")]
    pub media_types: Vec<MediaType>,

    #[serde(default)]
    pub tags: Vec<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: None,
            include_deleted: false,
            media_types: default_media_types(),
            tags: Vec::new(),
        }
    }
}

fn default_eagle_host() -> String {
    "localhost".to_string()
}

fn default_eagle_port() -> u16 {
    41595
}

fn default_eagle_timeout() -> u64 {
    30
}

/// Eagle local API endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EagleConfig {
    #[serde(default = "default_eagle_host")]
    pub host: String,

    #[serde(default = "default_eagle_port")]
    pub port: u16,

    #[serde(default = "default_eagle_timeout")]
    pub timeout_secs: u64,
}

impl EagleConfig {
    pub fn base_url(&self) -> String {
        format!("http://{}:{}/api", self.host, self.port)
    }
}

impl Default for EagleConfig {
    fn default() -> Self {
        Self {
            host: default_eagle_host(),
            port: default_eagle_port(),
            timeout_secs: default_eagle_timeout(),
        }
    }
}

fn default_device_id() -> String {
    "eaglebridge".to_string()
}

fn default_immich_concurrency() -> usize {
    4
}

fn default_immich_timeout() -> u64 {
    300
}

/// Immich server connection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImmichConfig {
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub api_key: Option<String>,

    /// Device id reported with every upload
    #[serde(default = "default_device_id")]
    pub device_id: String,

    /// Maximum uploads in flight
    #[serde(default = "default_immich_concurrency")]
    pub concurrency: usize,

    #[serde(default = "default_immich_timeout")]
    pub timeout_secs: u64,
}

impl ImmichConfig {
    /// Fill `url` and `api_key` from `IMMICH_URL` / `IMMICH_API_KEY` when unset.
    pub fn with_env_fallback(mut self) -> Self {
        if self.url.is_none() {
            self.url = non_empty_env("IMMICH_URL");
        }
        if self.api_key.is_none() {
            self.api_key = non_empty_env("IMMICH_API_KEY");
        }
        self
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Default for ImmichConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            device_id: default_device_id(),
            concurrency: default_immich_concurrency(),
            timeout_secs: default_immich_timeout(),
        }
    }
}

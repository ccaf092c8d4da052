//! Client for the Immich server REST API.

use super::models::{AssetUpdate, AssetUploadResponse};
use super::PhotoService;
use crate::config::ImmichConfig;
use crate::error::{ApiError, RemoteError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

/// Trim trailing slashes and make sure the URL ends in `/api`.
pub fn normalize_base_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.ends_with("/api") {
        trimmed.to_string()
    } else {
        format!("{}/api", trimmed)
    }
}

/// ISO-8601 UTC with millisecond precision, the form Immich expects.
pub fn iso_timestamp(time: DateTime<Utc>) -> String {
    time.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Text fields of the multipart upload, in submission order.
pub fn upload_fields(
    device_asset_id: &str,
    device_id: &str,
    modified: DateTime<Utc>,
) -> Vec<(&'static str, String)> {
    let stamp = iso_timestamp(modified);
    vec![
        ("deviceAssetId", device_asset_id.to_string()),
        ("deviceId", device_id.to_string()),
        ("fileCreatedAt", stamp.clone()),
        ("fileModifiedAt", stamp),
        ("isFavorite", "false".to_string()),
    ]
}

pub struct ImmichClient {
    base_url: String,
    device_id: String,
    http: reqwest::Client,
}

impl ImmichClient {
    pub fn new(
        base_url: &str,
        api_key: &str,
        device_id: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RemoteError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let mut key = HeaderValue::from_str(api_key)
            .map_err(|e| RemoteError::InvalidRequest(format!("invalid API key: {}", e)))?;
        key.set_sensitive(true);
        headers.insert("x-api-key", key);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            base_url: normalize_base_url(base_url),
            device_id: device_id.into(),
            http,
        })
    }

    /// Build from configuration; URL and API key must be set there or in the environment.
    pub fn from_config(config: &ImmichConfig) -> Result<Self, ApiError> {
        let url = config.url.as_deref().ok_or_else(|| {
            ApiError::ConfigError(
                "Immich URL not configured (set immich.url or IMMICH_URL)".to_string(),
            )
        })?;
        let api_key = config.api_key.as_deref().ok_or_else(|| {
            ApiError::ConfigError(
                "Immich API key not configured (set immich.api_key or IMMICH_API_KEY)".to_string(),
            )
        })?;
        Ok(Self::new(
            url,
            api_key,
            config.device_id.clone(),
            Duration::from_secs(config.timeout_secs),
        )?)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, RemoteError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(RemoteError::Http {
                status: status.as_u16(),
                body,
            });
        }
        serde_json::from_str(&body).map_err(|e| RemoteError::Decode(e.to_string()))
    }

    pub async fn ping(&self) -> Result<(), RemoteError> {
        let url = format!("{}/server/ping", self.base_url);
        let response = self.http.get(&url).send().await?;
        let _: serde_json::Value = Self::read_json(response).await?;
        Ok(())
    }

    /// Upload one file; `device_asset_id` defaults to the file name.
    pub async fn upload_asset(
        &self,
        path: &Path,
        device_asset_id: Option<&str>,
    ) -> Result<AssetUploadResponse, RemoteError> {
        let metadata = tokio::fs::metadata(path).await.map_err(|_| {
            RemoteError::InvalidRequest(format!("File not found: {}", path.display()))
        })?;
        if !metadata.is_file() {
            return Err(RemoteError::InvalidRequest(format!(
                "Not a file: {}",
                path.display()
            )));
        }
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let modified: DateTime<Utc> = metadata
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());
        let device_asset_id = device_asset_id.unwrap_or(&file_name);

        let bytes = tokio::fs::read(path).await.map_err(|e| {
            RemoteError::InvalidRequest(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let part = Part::bytes(bytes)
            .file_name(file_name.clone())
            .mime_str("application/octet-stream")?;
        let form = upload_fields(device_asset_id, &self.device_id, modified)
            .into_iter()
            .fold(Form::new(), |form, (name, value)| form.text(name, value))
            .part("assetData", part);

        debug!(file = %path.display(), device_asset_id, "Uploading asset to Immich");
        let response = self
            .http
            .post(format!("{}/assets", self.base_url))
            .multipart(form)
            .send()
            .await?;
        Self::read_json(response).await.map_err(|e| {
            warn!(file = %path.display(), error = %e, "Immich upload failed");
            e
        })
    }

    pub async fn update_asset(
        &self,
        asset_id: &str,
        update: &AssetUpdate,
    ) -> Result<serde_json::Value, RemoteError> {
        let response = self
            .http
            .put(format!("{}/assets/{}", self.base_url, asset_id))
            .json(update)
            .send()
            .await?;
        Self::read_json(response).await
    }
}

#[async_trait]
impl PhotoService for ImmichClient {
    async fn ping(&self) -> Result<(), RemoteError> {
        ImmichClient::ping(self).await
    }

    async fn upload_asset(
        &self,
        path: &Path,
        device_asset_id: &str,
    ) -> Result<AssetUploadResponse, RemoteError> {
        ImmichClient::upload_asset(self, path, Some(device_asset_id)).await
    }

    async fn update_asset(&self, asset_id: &str, update: &AssetUpdate) -> Result<(), RemoteError> {
        ImmichClient::update_asset(self, asset_id, update).await?;
        Ok(())
    }
}

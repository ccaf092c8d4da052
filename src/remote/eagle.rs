//! Client for the Eagle desktop app's local HTTP API.
//!
//! Every endpoint answers with an envelope `{"status": "success", "data": ...}`.
//! [`parse_envelope`] turns a raw response into the `data` value or a typed
//! [`RemoteError`]; the typed methods then decode `data`.

use super::models::{
    ApplicationInfo, Bookmark, EagleFolder, EagleItem, FolderUpdate, ItemQuery, ItemUpdate,
    LibraryInfo, PathItem, UrlItem,
};
use super::CatalogService;
use crate::config::EagleConfig;
use crate::error::RemoteError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, error};

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    data: Value,
}

/// Unwrap an Eagle response body into its `data` value.
pub fn parse_envelope(status: u16, body: &str) -> Result<Value, RemoteError> {
    if !(200..300).contains(&status) {
        return Err(RemoteError::Http {
            status,
            body: body.to_string(),
        });
    }
    let envelope: Envelope =
        serde_json::from_str(body).map_err(|e| RemoteError::Decode(e.to_string()))?;
    match envelope.status.as_deref() {
        Some("success") => Ok(envelope.data),
        other => Err(RemoteError::Status(other.unwrap_or("missing").to_string())),
    }
}

fn decode<T: DeserializeOwned>(data: Value) -> Result<T, RemoteError> {
    serde_json::from_value(data).map_err(|e| RemoteError::Decode(e.to_string()))
}

/// Add `folderId` to an object payload when a target folder is given.
fn with_folder<T: Serialize>(payload: &T, folder_id: Option<&str>) -> Result<Value, RemoteError> {
    let mut value =
        serde_json::to_value(payload).map_err(|e| RemoteError::InvalidRequest(e.to_string()))?;
    if let (Some(folder_id), Some(map)) = (folder_id, value.as_object_mut()) {
        map.insert("folderId".to_string(), Value::String(folder_id.to_string()));
    }
    Ok(value)
}

pub struct EagleClient {
    base_url: String,
    http: reqwest::Client,
}

impl EagleClient {
    /// `base_url` is the API root, e.g. `http://localhost:41595/api`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, RemoteError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn from_config(config: &EagleConfig) -> Result<Self, RemoteError> {
        Self::new(config.base_url(), Duration::from_secs(config.timeout_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value, RemoteError> {
        let url = self.endpoint(path);
        debug!(url = %url, "Eagle GET");
        let response = self.http.get(&url).query(query).send().await.map_err(|e| {
            error!(url = %url, error = %e, "Failed to connect to Eagle API. Is Eagle running?");
            RemoteError::from(e)
        })?;
        Self::finish(&url, response).await
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, RemoteError> {
        let url = self.endpoint(path);
        debug!(url = %url, "Eagle POST");
        let response = self.http.post(&url).json(body).send().await.map_err(|e| {
            error!(url = %url, error = %e, "Failed to connect to Eagle API. Is Eagle running?");
            RemoteError::from(e)
        })?;
        Self::finish(&url, response).await
    }

    async fn finish(url: &str, response: reqwest::Response) -> Result<Value, RemoteError> {
        let status = response.status().as_u16();
        let body = response.text().await?;
        parse_envelope(status, &body).map_err(|e| {
            error!(url = %url, error = %e, "Eagle API request failed");
            e
        })
    }

    pub async fn application_info(&self) -> Result<ApplicationInfo, RemoteError> {
        decode(self.get("/application/info", &[]).await?)
    }

    pub async fn library_info(&self) -> Result<LibraryInfo, RemoteError> {
        decode(self.get("/library/info", &[]).await?)
    }

    /// Paths of recently opened libraries.
    pub async fn library_history(&self) -> Result<Vec<String>, RemoteError> {
        match self.get("/library/history", &[]).await? {
            data @ Value::Array(_) => decode(data),
            _ => Ok(Vec::new()),
        }
    }

    pub async fn create_folder(
        &self,
        folder_name: &str,
        parent_id: Option<&str>,
    ) -> Result<EagleFolder, RemoteError> {
        let mut payload = json!({ "folderName": folder_name });
        if let Some(parent) = parent_id {
            payload["parent"] = Value::String(parent.to_string());
        }
        decode(self.post("/folder/create", &payload).await?)
    }

    pub async fn rename_folder(
        &self,
        folder_id: &str,
        new_name: &str,
    ) -> Result<EagleFolder, RemoteError> {
        let payload = json!({ "folderId": folder_id, "newName": new_name });
        decode(self.post("/folder/rename", &payload).await?)
    }

    pub async fn update_folder(
        &self,
        folder_id: &str,
        update: &FolderUpdate,
    ) -> Result<EagleFolder, RemoteError> {
        let mut payload = serde_json::to_value(update)
            .map_err(|e| RemoteError::InvalidRequest(e.to_string()))?;
        if let Some(map) = payload.as_object_mut() {
            map.insert("folderId".to_string(), Value::String(folder_id.to_string()));
        }
        decode(self.post("/folder/update", &payload).await?)
    }

    pub async fn list_folders(&self) -> Result<Vec<EagleFolder>, RemoteError> {
        decode(self.get("/folder/list", &[]).await?)
    }

    pub async fn list_recent_folders(&self) -> Result<Vec<EagleFolder>, RemoteError> {
        decode(self.get("/folder/listRecent", &[]).await?)
    }

    pub async fn add_item_from_url(
        &self,
        item: &UrlItem,
        folder_id: Option<&str>,
    ) -> Result<(), RemoteError> {
        self.post("/item/addFromURL", &with_folder(item, folder_id)?)
            .await?;
        Ok(())
    }

    pub async fn add_items_from_urls(
        &self,
        items: &[UrlItem],
        folder_id: Option<&str>,
    ) -> Result<(), RemoteError> {
        let payload = with_folder(&json!({ "items": items }), folder_id)?;
        self.post("/item/addFromURLs", &payload).await?;
        Ok(())
    }

    pub async fn add_item_from_path(
        &self,
        item: &PathItem,
        folder_id: Option<&str>,
    ) -> Result<(), RemoteError> {
        self.post("/item/addFromPath", &with_folder(item, folder_id)?)
            .await?;
        Ok(())
    }

    pub async fn add_items_from_paths(
        &self,
        items: &[PathItem],
        folder_id: Option<&str>,
    ) -> Result<(), RemoteError> {
        let payload = with_folder(&json!({ "items": items }), folder_id)?;
        self.post("/item/addFromPaths", &payload).await?;
        Ok(())
    }

    pub async fn add_bookmark(
        &self,
        bookmark: &Bookmark,
        folder_id: Option<&str>,
    ) -> Result<(), RemoteError> {
        self.post("/item/addBookmark", &with_folder(bookmark, folder_id)?)
            .await?;
        Ok(())
    }

    pub async fn move_to_trash(&self, item_ids: &[String]) -> Result<(), RemoteError> {
        if item_ids.is_empty() {
            return Err(RemoteError::InvalidRequest(
                "at least one item id is required".to_string(),
            ));
        }
        self.post("/item/moveToTrash", &json!({ "itemIds": item_ids }))
            .await?;
        Ok(())
    }

    pub async fn update_item(
        &self,
        item_id: &str,
        update: &ItemUpdate,
    ) -> Result<EagleItem, RemoteError> {
        let mut payload = serde_json::to_value(update)
            .map_err(|e| RemoteError::InvalidRequest(e.to_string()))?;
        if let Some(map) = payload.as_object_mut() {
            map.insert("id".to_string(), Value::String(item_id.to_string()));
        }
        decode(self.post("/item/update", &payload).await?)
    }

    pub async fn refresh_palette(&self, item_id: &str) -> Result<(), RemoteError> {
        self.post("/item/refreshPalette", &json!({ "id": item_id }))
            .await?;
        Ok(())
    }

    pub async fn refresh_thumbnail(&self, item_id: &str) -> Result<(), RemoteError> {
        self.post("/item/refreshThumbnail", &json!({ "id": item_id }))
            .await?;
        Ok(())
    }

    pub async fn item_info(&self, item_id: &str) -> Result<EagleItem, RemoteError> {
        decode(
            self.get("/item/info", &[("id", item_id.to_string())])
                .await?,
        )
    }

    /// Absolute path of the item's thumbnail on the Eagle host.
    pub async fn item_thumbnail(&self, item_id: &str) -> Result<String, RemoteError> {
        match self
            .get("/item/thumbnail", &[("id", item_id.to_string())])
            .await?
        {
            Value::String(path) => Ok(path),
            other => Ok(other.to_string()),
        }
    }

    pub async fn list_items(&self, query: &ItemQuery) -> Result<Vec<EagleItem>, RemoteError> {
        decode(self.get("/item/list", &query.to_pairs()).await?)
    }
}

#[async_trait]
impl CatalogService for EagleClient {
    async fn application_info(&self) -> Result<ApplicationInfo, RemoteError> {
        EagleClient::application_info(self).await
    }

    async fn library_info(&self) -> Result<LibraryInfo, RemoteError> {
        EagleClient::library_info(self).await
    }

    async fn list_folders(&self) -> Result<Vec<EagleFolder>, RemoteError> {
        EagleClient::list_folders(self).await
    }

    async fn list_recent_folders(&self) -> Result<Vec<EagleFolder>, RemoteError> {
        EagleClient::list_recent_folders(self).await
    }

    async fn create_folder(
        &self,
        folder_name: &str,
        parent_id: Option<&str>,
    ) -> Result<EagleFolder, RemoteError> {
        EagleClient::create_folder(self, folder_name, parent_id).await
    }

    async fn rename_folder(
        &self,
        folder_id: &str,
        new_name: &str,
    ) -> Result<EagleFolder, RemoteError> {
        EagleClient::rename_folder(self, folder_id, new_name).await
    }

    async fn list_items(&self, query: &ItemQuery) -> Result<Vec<EagleItem>, RemoteError> {
        EagleClient::list_items(self, query).await
    }

    async fn move_to_trash(&self, item_ids: &[String]) -> Result<(), RemoteError> {
        EagleClient::move_to_trash(self, item_ids).await
    }
}

//! HTTP clients for the Eagle local API and an Immich server.
//!
//! Commands depend on the capability traits below rather than the concrete
//! clients so they can run against in-memory fakes.

pub mod eagle;
pub mod immich;
pub mod models;

pub use eagle::EagleClient;
pub use immich::ImmichClient;
pub use models::{
    ApplicationInfo, AssetUpdate, AssetUploadResponse, EagleFolder, EagleItem, ItemQuery,
    LibraryInfo,
};

use crate::error::RemoteError;
use async_trait::async_trait;
use std::path::Path;

/// Read and organise a running Eagle library.
#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn application_info(&self) -> Result<ApplicationInfo, RemoteError>;

    async fn library_info(&self) -> Result<LibraryInfo, RemoteError>;

    async fn list_folders(&self) -> Result<Vec<EagleFolder>, RemoteError>;

    async fn list_recent_folders(&self) -> Result<Vec<EagleFolder>, RemoteError>;

    async fn create_folder(
        &self,
        folder_name: &str,
        parent_id: Option<&str>,
    ) -> Result<EagleFolder, RemoteError>;

    async fn rename_folder(
        &self,
        folder_id: &str,
        new_name: &str,
    ) -> Result<EagleFolder, RemoteError>;

    async fn list_items(&self, query: &ItemQuery) -> Result<Vec<EagleItem>, RemoteError>;

    async fn move_to_trash(&self, item_ids: &[String]) -> Result<(), RemoteError>;
}

/// Upload media to a photo server.
#[async_trait]
pub trait PhotoService: Send + Sync {
    /// Succeeds when the server is reachable and answering.
    async fn ping(&self) -> Result<(), RemoteError>;

    async fn upload_asset(
        &self,
        path: &Path,
        device_asset_id: &str,
    ) -> Result<AssetUploadResponse, RemoteError>;

    async fn update_asset(&self, asset_id: &str, update: &AssetUpdate) -> Result<(), RemoteError>;
}

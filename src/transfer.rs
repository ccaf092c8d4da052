//! Send accepted catalog items to Immich.
//!
//! Uploads run with bounded concurrency. A failing item is recorded and
//! never stops the rest of the batch.

use crate::catalog::CatalogItem;
use crate::remote::{AssetUpdate, PhotoService};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info, warn};

pub const DEFAULT_CONCURRENCY: usize = 4;

/// What happened to one item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TransferOutcome {
    Uploaded { asset_id: String },
    /// Server already had the asset; the description was still applied
    Duplicate { asset_id: String },
    /// Dry run: nothing was sent
    WouldUpload,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemTransfer {
    pub folder_id: String,
    pub asset_path: PathBuf,
    #[serde(flatten)]
    pub outcome: TransferOutcome,
}

/// Per-item outcomes, in input order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TransferReport {
    pub items: Vec<ItemTransfer>,
}

impl TransferReport {
    fn count(&self, pred: impl Fn(&TransferOutcome) -> bool) -> usize {
        self.items.iter().filter(|t| pred(&t.outcome)).count()
    }

    pub fn uploaded(&self) -> usize {
        self.count(|o| matches!(o, TransferOutcome::Uploaded { .. }))
    }

    pub fn duplicates(&self) -> usize {
        self.count(|o| matches!(o, TransferOutcome::Duplicate { .. }))
    }

    pub fn planned(&self) -> usize {
        self.count(|o| matches!(o, TransferOutcome::WouldUpload))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, TransferOutcome::Failed { .. }))
    }
}

pub struct ImmichTransfer<'a, S: PhotoService + ?Sized> {
    service: &'a S,
    concurrency: usize,
    dry_run: bool,
}

impl<'a, S: PhotoService + ?Sized> ImmichTransfer<'a, S> {
    pub fn new(service: &'a S) -> Self {
        Self {
            service,
            concurrency: DEFAULT_CONCURRENCY,
            dry_run: false,
        }
    }

    /// Maximum uploads in flight; zero is treated as one.
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub async fn run(&self, items: &[CatalogItem]) -> TransferReport {
        let mut results: Vec<(usize, ItemTransfer)> = stream::iter(items.iter().enumerate())
            .map(|(index, item)| async move { (index, self.transfer_one(item).await) })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;
        results.sort_by_key(|(index, _)| *index);

        let report = TransferReport {
            items: results.into_iter().map(|(_, t)| t).collect(),
        };
        info!(
            uploaded = report.uploaded(),
            duplicates = report.duplicates(),
            failed = report.failed(),
            dry_run = self.dry_run,
            "Immich transfer finished"
        );
        report
    }

    async fn transfer_one(&self, item: &CatalogItem) -> ItemTransfer {
        let outcome = if self.dry_run {
            TransferOutcome::WouldUpload
        } else {
            self.upload(item).await
        };
        ItemTransfer {
            folder_id: item.folder_id.clone(),
            asset_path: item.primary_asset_path.clone(),
            outcome,
        }
    }

    async fn upload(&self, item: &CatalogItem) -> TransferOutcome {
        let device_asset_id = if item.metadata.id.is_empty() {
            item.asset_file_name()
        } else {
            item.metadata.id.clone()
        };

        let response = match self
            .service
            .upload_asset(&item.primary_asset_path, &device_asset_id)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(folder = %item.folder_id, error = %e, "Upload failed");
                return TransferOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        };
        debug!(folder = %item.folder_id, asset_id = %response.id, status = %response.status, "Uploaded");

        if !item.metadata.annotation.is_empty() {
            let update = AssetUpdate::description(item.metadata.annotation.clone());
            if let Err(e) = self.service.update_asset(&response.id, &update).await {
                warn!(folder = %item.folder_id, asset_id = %response.id, error = %e, "Description update failed");
                return TransferOutcome::Failed {
                    reason: format!(
                        "uploaded as {} but setting description failed: {}",
                        response.id, e
                    ),
                };
            }
        }

        if response.is_duplicate() {
            TransferOutcome::Duplicate {
                asset_id: response.id,
            }
        } else {
            TransferOutcome::Uploaded {
                asset_id: response.id,
            }
        }
    }
}

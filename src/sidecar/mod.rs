//! XMP sidecar generation for accepted catalog items.

pub mod xmp;

pub use xmp::{escape, render_xmp, sidecar_path};

use crate::catalog::CatalogItem;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// A sidecar that could not be written; the batch carried on without it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SidecarFailure {
    pub folder_id: String,
    pub sidecar_path: PathBuf,
    pub error: String,
}

/// Totals for one generation run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SidecarReport {
    /// Sidecars written (or that would be written in a dry run)
    pub written: Vec<PathBuf>,
    /// Assets left alone because a sidecar already existed
    pub skipped_existing: Vec<PathBuf>,
    pub failures: Vec<SidecarFailure>,
    pub dry_run: bool,
}

/// Writes one `.xmp` next to each item's primary asset.
#[derive(Debug, Clone, Default)]
pub struct SidecarWriter {
    dry_run: bool,
    missing_only: bool,
}

impl SidecarWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report what would be written without touching the filesystem.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Leave existing sidecars untouched instead of overwriting them.
    pub fn missing_only(mut self, missing_only: bool) -> Self {
        self.missing_only = missing_only;
        self
    }

    pub fn generate(&self, items: &[CatalogItem]) -> SidecarReport {
        let mut report = SidecarReport {
            dry_run: self.dry_run,
            ..SidecarReport::default()
        };

        for item in items {
            let path = sidecar_path(&item.primary_asset_path);
            if self.missing_only && path.exists() {
                debug!(sidecar = %path.display(), "Sidecar exists, skipping");
                report.skipped_existing.push(path);
                continue;
            }
            if self.dry_run {
                report.written.push(path);
                continue;
            }

            match std::fs::write(&path, render_xmp(&item.metadata)) {
                Ok(()) => {
                    debug!(sidecar = %path.display(), "Sidecar written");
                    report.written.push(path);
                }
                Err(e) => {
                    warn!(sidecar = %path.display(), error = %e, "Failed to write sidecar");
                    report.failures.push(SidecarFailure {
                        folder_id: item.folder_id.clone(),
                        sidecar_path: path,
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            written = report.written.len(),
            skipped = report.skipped_existing.len(),
            failed = report.failures.len(),
            dry_run = self.dry_run,
            "Sidecar generation finished"
        );
        report
    }
}

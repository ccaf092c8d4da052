//! Catalog scanner
//!
//! Walks `<library>/images/*`, turns each item folder into exactly one
//! outcome (accepted, skipped by policy, or errored) and collects the
//! outcomes into a [`ScanResult`].

use crate::catalog::classify::{classify_path, FileKind};
use crate::catalog::media_type;
use crate::catalog::metadata::MetadataRecord;
use crate::catalog::resolve::resolve_main_asset;
use crate::error::CatalogError;
use crate::logging::LogContext;
use crate::types::{FilterConfig, MediaType};
use rayon::prelude::*;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Name of the directory holding one sub-folder per catalog item
pub const IMAGES_DIR: &str = "images";

/// A well-formed item folder: descriptor parsed and primary asset resolved
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogItem {
    /// Item folder name, e.g. `KBHG6KA0Y5S9W.info`
    pub folder_id: String,
    pub primary_asset_path: PathBuf,
    pub metadata: MetadataRecord,
    pub thumbnail_paths: Vec<PathBuf>,
}

impl CatalogItem {
    pub fn asset_file_name(&self) -> String {
        self.primary_asset_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn media_type(&self) -> Option<MediaType> {
        media_type::detect(&self.primary_asset_path)
    }
}

/// Why a well-formed item was left out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Deleted,
    TypeNotRequested(MediaType),
    /// Carries the extension as shown to the user, e.g. `.blend`
    UnsupportedType(String),
    TagMismatch,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Deleted => f.write_str("Item is deleted"),
            SkipReason::TypeNotRequested(t) => write!(f, "File type not requested: {}", t),
            SkipReason::UnsupportedType(ext) => write!(f, "Unsupported file type: {}", ext),
            SkipReason::TagMismatch => f.write_str("Tag mismatch"),
        }
    }
}

/// Why a folder could not be turned into an item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderErrorReason {
    MissingParts { metadata: bool, media: bool },
    MetadataParse(String),
    Unreadable(String),
}

impl fmt::Display for FolderErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FolderErrorReason::MissingParts { metadata, media } => {
                let mut missing = Vec::new();
                if *metadata {
                    missing.push("Missing metadata.json");
                }
                if *media {
                    missing.push("Missing media file");
                }
                f.write_str(&missing.join(", "))
            }
            FolderErrorReason::MetadataParse(detail) => {
                write!(f, "metadata parse failure: {}", detail)
            }
            FolderErrorReason::Unreadable(detail) => write!(f, "unreadable folder: {}", detail),
        }
    }
}

/// Terminal state of one item folder
#[derive(Debug, Clone, PartialEq)]
pub enum FolderOutcome {
    Accepted(CatalogItem),
    Skipped(CatalogItem, SkipReason),
    Errored(PathBuf, FolderErrorReason),
}

/// Outcomes of one scan pass; every visited folder is in exactly one list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanResult {
    pub accepted: Vec<CatalogItem>,
    pub skipped: Vec<(CatalogItem, SkipReason)>,
    pub errored: Vec<(PathBuf, FolderErrorReason)>,
    /// Directories visited under `images/`, whatever their outcome
    pub folders_visited: usize,
}

impl ScanResult {
    fn record(&mut self, outcome: FolderOutcome) {
        self.folders_visited += 1;
        match outcome {
            FolderOutcome::Accepted(item) => self.accepted.push(item),
            FolderOutcome::Skipped(item, reason) => self.skipped.push((item, reason)),
            FolderOutcome::Errored(path, reason) => self.errored.push((path, reason)),
        }
    }

    fn from_outcomes(outcomes: impl IntoIterator<Item = FolderOutcome>) -> Self {
        let mut result = Self::default();
        for outcome in outcomes {
            result.record(outcome);
        }
        result
    }
}

/// Scanner over one Eagle library
pub struct CatalogScanner {
    catalog_root: PathBuf,
    filter: FilterConfig,
    log: LogContext,
}

impl CatalogScanner {
    pub fn new(catalog_root: impl Into<PathBuf>, filter: FilterConfig) -> Self {
        let catalog_root = catalog_root.into();
        let log = LogContext::scan(&catalog_root);
        Self {
            catalog_root,
            filter,
            log,
        }
    }

    /// Replace the logging context created for this scanner.
    pub fn with_log_context(mut self, log: LogContext) -> Self {
        self.log = log;
        self
    }

    pub fn catalog_root(&self) -> &Path {
        &self.catalog_root
    }

    pub fn filter(&self) -> &FilterConfig {
        &self.filter
    }

    pub fn images_dir(&self) -> PathBuf {
        self.catalog_root.join(IMAGES_DIR)
    }

    /// Scan every item folder sequentially.
    ///
    /// Fails only when the `images` directory is missing or cannot be listed;
    /// problems inside a folder are recorded in [`ScanResult::errored`].
    pub fn scan(&self) -> Result<ScanResult, CatalogError> {
        self.log.in_scope(|| -> Result<ScanResult, CatalogError> {
            let folders = self.item_folders()?;
            info!(folders = folders.len(), "Scanning catalog folders");
            let result =
                ScanResult::from_outcomes(folders.iter().map(|folder| self.scan_folder(folder)));
            log_summary(&result);
            Ok(result)
        })
    }

    /// Scan item folders on a pool of `workers` threads.
    ///
    /// Outcomes are merged in folder order, so the result equals [`Self::scan`].
    pub fn scan_parallel(&self, workers: usize) -> Result<ScanResult, CatalogError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers.max(1))
            .build()
            .map_err(|e| CatalogError::WorkerPool(e.to_string()))?;

        self.log.in_scope(|| -> Result<ScanResult, CatalogError> {
            let folders = self.item_folders()?;
            info!(folders = folders.len(), workers, "Scanning catalog folders in parallel");
            let outcomes: Vec<FolderOutcome> = pool.install(|| {
                folders
                    .par_iter()
                    .map(|folder| self.log.in_scope(|| self.scan_folder(folder)))
                    .collect()
            });
            let result = ScanResult::from_outcomes(outcomes);
            log_summary(&result);
            Ok(result)
        })
    }

    /// Item folders in file-name order.
    fn item_folders(&self) -> Result<Vec<PathBuf>, CatalogError> {
        let images_dir = self.images_dir();
        if !images_dir.is_dir() {
            return Err(CatalogError::ImagesDirMissing(images_dir));
        }

        let mut folders = Vec::new();
        for entry in WalkDir::new(&images_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                // Depth 0 is `images` itself; anything deeper is one bad entry.
                Err(source) if source.depth() == 0 => {
                    return Err(CatalogError::ReadDir {
                        path: images_dir.clone(),
                        source,
                    })
                }
                Err(e) => {
                    warn!(
                        path = %e.path().map(|p| p.display().to_string()).unwrap_or_default(),
                        error = %e,
                        "Skipping unreadable catalog entry"
                    );
                    continue;
                }
            };
            if entry.file_type().is_dir() {
                folders.push(entry.into_path());
            }
        }
        Ok(folders)
    }

    /// Evaluate a single item folder.
    pub fn scan_folder(&self, folder: &Path) -> FolderOutcome {
        let outcome = self.evaluate_folder(folder);
        match &outcome {
            FolderOutcome::Accepted(item) => {
                debug!(folder = %item.folder_id, asset = %item.asset_file_name(), "Accepted");
            }
            FolderOutcome::Skipped(item, reason) => {
                debug!(folder = %item.folder_id, %reason, "Skipped");
            }
            FolderOutcome::Errored(path, reason) => {
                warn!(folder = %path.display(), %reason, "Folder error");
            }
        }
        outcome
    }

    fn evaluate_folder(&self, folder: &Path) -> FolderOutcome {
        let listing = match FolderListing::read(folder) {
            Ok(listing) => listing,
            Err(e) => {
                return FolderOutcome::Errored(
                    folder.to_path_buf(),
                    FolderErrorReason::Unreadable(e.to_string()),
                )
            }
        };

        let metadata = match &listing.metadata {
            Some(path) => match MetadataRecord::load(path) {
                Ok(record) => Some(record),
                Err(e) => {
                    return FolderOutcome::Errored(
                        folder.to_path_buf(),
                        FolderErrorReason::MetadataParse(e.to_string()),
                    )
                }
            },
            None => None,
        };

        let asset = resolve_main_asset(&listing.candidates).map(Path::to_path_buf);

        let (metadata, asset) = match (metadata, asset) {
            (Some(metadata), Some(asset)) => (metadata, asset),
            (metadata, asset) => {
                return FolderOutcome::Errored(
                    folder.to_path_buf(),
                    FolderErrorReason::MissingParts {
                        metadata: metadata.is_none(),
                        media: asset.is_none(),
                    },
                )
            }
        };

        let item = CatalogItem {
            folder_id: folder
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            primary_asset_path: asset,
            metadata,
            thumbnail_paths: listing.thumbnails,
        };

        match self.admission_check(&item) {
            Some(reason) => FolderOutcome::Skipped(item, reason),
            None => FolderOutcome::Accepted(item),
        }
    }

    /// Deleted, then type, then tag check; first failure wins.
    fn admission_check(&self, item: &CatalogItem) -> Option<SkipReason> {
        if item.metadata.is_deleted && !self.filter.include_deleted {
            return Some(SkipReason::Deleted);
        }

        match item.media_type() {
            Some(t) if !self.filter.allowed_types.contains(&t) => {
                return Some(SkipReason::TypeNotRequested(t));
            }
            Some(_) => {}
            None => {
                return Some(SkipReason::UnsupportedType(media_type::display_extension(
                    &item.primary_asset_path,
                )));
            }
        }

        if !self.filter.matches_tags(&item.metadata.tags) {
            return Some(SkipReason::TagMismatch);
        }

        None
    }
}

fn log_summary(result: &ScanResult) {
    info!(
        visited = result.folders_visited,
        accepted = result.accepted.len(),
        skipped = result.skipped.len(),
        errored = result.errored.len(),
        "Catalog scan complete"
    );
}

/// Files of one item folder, split by [`FileKind`]
struct FolderListing {
    metadata: Option<PathBuf>,
    candidates: Vec<PathBuf>,
    thumbnails: Vec<PathBuf>,
}

impl FolderListing {
    fn read(folder: &Path) -> std::io::Result<Self> {
        let mut listing = FolderListing {
            metadata: None,
            candidates: Vec::new(),
            thumbnails: Vec::new(),
        };

        for entry in std::fs::read_dir(folder)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            match classify_path(&path) {
                FileKind::Thumbnail => listing.thumbnails.push(path),
                FileKind::Metadata => {
                    if listing.metadata.is_none() {
                        listing.metadata = Some(path);
                    } else {
                        warn!(file = %path.display(), "Ignoring extra metadata descriptor");
                    }
                }
                FileKind::AssetCandidate => listing.candidates.push(path),
            }
        }
        Ok(listing)
    }
}

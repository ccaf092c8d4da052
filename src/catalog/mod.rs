//! Eagle library catalog: file classification, main asset resolution,
//! descriptor parsing and the folder scanner built on them.

pub mod classify;
pub mod media_type;
pub mod metadata;
pub mod resolve;
pub mod scanner;

pub use classify::{classify, FileKind};
pub use metadata::{MetadataRecord, PaletteEntry};
pub use resolve::resolve_main_asset;
pub use scanner::{
    CatalogItem, CatalogScanner, FolderErrorReason, FolderOutcome, ScanResult, SkipReason,
    IMAGES_DIR,
};

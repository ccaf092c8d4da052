//! File classification inside an item folder.
//!
//! Name-pattern rules only; file contents are never inspected.

use std::path::Path;

/// Role a file plays inside an Eagle item folder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Eagle-generated preview, ignored by every later stage
    Thumbnail,
    /// The `metadata.json` descriptor
    Metadata,
    /// Anything else; one of these becomes the item's primary asset
    AssetCandidate,
}

const THUMBNAIL_MARKER: &str = "_thumbnail";
const METADATA_STEM: &str = "metadata";
const METADATA_EXT: &str = "json";

/// Classify a file by its name.
pub fn classify(file_name: &str) -> FileKind {
    if file_name.to_lowercase().contains(THUMBNAIL_MARKER) {
        return FileKind::Thumbnail;
    }
    if is_metadata_name(file_name) {
        return FileKind::Metadata;
    }
    FileKind::AssetCandidate
}

/// Classify the final component of a path; paths without a UTF-8 file name are candidates.
pub fn classify_path(path: &Path) -> FileKind {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(classify)
        .unwrap_or(FileKind::AssetCandidate)
}

// Base name is matched exactly, the extension case-insensitively.
fn is_metadata_name(file_name: &str) -> bool {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) => stem == METADATA_STEM && ext.eq_ignore_ascii_case(METADATA_EXT),
        None => false,
    }
}

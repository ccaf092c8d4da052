//! Media type detection by file extension.

use crate::types::MediaType;
use std::path::Path;

const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "tif", "tiff", "webp", "heic", "heif", "avif", "dng",
    "cr2", "cr3", "nef", "arw", "orf", "rw2", "raf", "srw", "pef", "svg", "ico", "psd",
];

const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "mov", "m4v", "avi", "mkv", "webm", "wmv", "flv", "mpg", "mpeg", "3gp", "mts", "m2ts",
];

const AUDIO_EXTENSIONS: &[&str] = &[
    "mp3", "wav", "flac", "aac", "m4a", "ogg", "opus", "wma", "aiff", "aif",
];

const DOCUMENT_EXTENSIONS: &[&str] = &[
    "pdf", "txt", "md", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "rtf", "epub",
];

/// Detect the media type of an asset; `None` when the extension is unknown or absent.
pub fn detect(path: &Path) -> Option<MediaType> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let ext = ext.as_str();
    if IMAGE_EXTENSIONS.contains(&ext) {
        Some(MediaType::Image)
    } else if VIDEO_EXTENSIONS.contains(&ext) {
        Some(MediaType::Video)
    } else if AUDIO_EXTENSIONS.contains(&ext) {
        Some(MediaType::Audio)
    } else if DOCUMENT_EXTENSIONS.contains(&ext) {
        Some(MediaType::Document)
    } else {
        None
    }
}

/// Extension as shown in skip reasons: `.xyz`, or empty when the file has none.
pub fn display_extension(path: &Path) -> String {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default()
}

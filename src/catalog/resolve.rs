//! Main asset resolution for one item folder.

use std::path::{Path, PathBuf};

/// Extensions whose original wins over a rendered `<name>.png` sibling, in priority order.
pub const PRIORITY_EXTENSIONS: [&str; 2] = ["heic", "dng"];

/// Pick the canonical asset among a folder's candidates.
///
/// A `.heic` (then `.dng`) file is returned when a sibling named `<file>.png`
/// is also present. Otherwise the first candidate in the given order wins;
/// callers pass directory iteration order, so with several unrelated files
/// the result depends on the filesystem.
pub fn resolve_main_asset(candidates: &[PathBuf]) -> Option<&Path> {
    let first = candidates.first()?;

    for ext in PRIORITY_EXTENSIONS {
        for candidate in candidates.iter().filter(|c| has_extension(c, ext)) {
            if has_preview_sibling(candidate, candidates) {
                return Some(candidate.as_path());
            }
        }
    }

    Some(first.as_path())
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(ext))
        .unwrap_or(false)
}

// Literal concatenation: `photo.heic` pairs with `photo.heic.png`, not `photo.png`.
fn has_preview_sibling(original: &Path, candidates: &[PathBuf]) -> bool {
    let Some(name) = original.file_name() else {
        return false;
    };
    let mut preview_name = name.to_os_string();
    preview_name.push(".png");
    let preview = original.with_file_name(preview_name);
    candidates.iter().any(|c| *c == preview)
}

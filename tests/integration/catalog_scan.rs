use std::fs;

use eaglebridge::catalog::{CatalogScanner, FolderErrorReason, SkipReason};
use eaglebridge::types::{FilterConfig, MediaType};
use tempfile::TempDir;

use crate::integration::support::{metadata, three_folder_library, LibraryFixture};

#[test]
fn three_folder_library_splits_one_each() {
    let temp_dir = TempDir::new().unwrap();
    let lib = three_folder_library(temp_dir.path());

    let filter = FilterConfig::default().with_tags(["x"]);
    let result = CatalogScanner::new(lib.root(), filter).scan().unwrap();

    assert_eq!(result.folders_visited, 3);
    assert_eq!(result.accepted.len(), 1);
    assert_eq!(result.skipped.len(), 1);
    assert_eq!(result.errored.len(), 1);

    assert_eq!(result.accepted[0].folder_id, "C.info");
    assert_eq!(result.accepted[0].asset_file_name(), "c.jpg");
    assert_eq!(result.accepted[0].thumbnail_paths.len(), 1);
    assert_eq!(result.skipped[0].0.folder_id, "A.info");
    assert_eq!(result.skipped[0].1, SkipReason::Deleted);
    assert!(result.errored[0].0.ends_with("B.info"));
    assert_eq!(
        result.errored[0].1,
        FolderErrorReason::MissingParts {
            metadata: true,
            media: false
        }
    );
}

#[test]
fn repeated_scans_are_identical() {
    let temp_dir = TempDir::new().unwrap();
    let lib = three_folder_library(temp_dir.path());
    let scanner = CatalogScanner::new(lib.root(), FilterConfig::default());

    let first = scanner.scan().unwrap();
    let second = scanner.scan().unwrap();
    assert_eq!(first, second);
}

#[test]
fn parallel_scan_equals_sequential() {
    let temp_dir = TempDir::new().unwrap();
    let lib = LibraryFixture::new(temp_dir.path());
    for i in 0..24 {
        let id = format!("ITEM{:02}", i);
        let deleted = i % 5 == 0;
        let tags: &[&str] = if i % 2 == 0 { &["even"] } else { &["odd"] };
        lib.add_item(
            &format!("{}.info", id),
            &format!("f{}.jpg", i),
            metadata(&id, &id, "jpg", tags, deleted),
        );
    }
    lib.folder("EMPTY.info");

    let scanner = CatalogScanner::new(lib.root(), FilterConfig::default().with_tags(["even"]));
    let sequential = scanner.scan().unwrap();
    let parallel = scanner.scan_parallel(4).unwrap();

    assert_eq!(sequential, parallel);
    assert_eq!(sequential.folders_visited, 25);
}

#[test]
fn accepted_items_are_never_deleted_unless_requested() {
    let temp_dir = TempDir::new().unwrap();
    let lib = three_folder_library(temp_dir.path());

    let result = CatalogScanner::new(lib.root(), FilterConfig::default())
        .scan()
        .unwrap();
    assert!(result.accepted.iter().all(|item| !item.metadata.is_deleted));

    let filter = FilterConfig {
        include_deleted: true,
        ..FilterConfig::default()
    };
    let result = CatalogScanner::new(lib.root(), filter).scan().unwrap();
    assert_eq!(result.accepted.len(), 2);
    assert!(result.skipped.is_empty());
}

#[test]
fn type_filter_reports_requested_and_unsupported_types() {
    let temp_dir = TempDir::new().unwrap();
    let lib = LibraryFixture::new(temp_dir.path());
    lib.add_item("DOC.info", "report.pdf", metadata("DOC", "report", "pdf", &[], false));
    lib.add_item("BLEND.info", "scene.blend", metadata("BLEND", "scene", "blend", &[], false));
    lib.add_item("VID.info", "clip.mp4", metadata("VID", "clip", "mp4", &[], false));

    let filter = FilterConfig {
        allowed_types: [MediaType::Image, MediaType::Video].into_iter().collect(),
        ..FilterConfig::default()
    };
    let result = CatalogScanner::new(lib.root(), filter).scan().unwrap();

    assert_eq!(result.accepted.len(), 1);
    assert_eq!(result.accepted[0].media_type(), Some(MediaType::Video));
    let reasons: Vec<String> = result.skipped.iter().map(|(_, r)| r.to_string()).collect();
    assert_eq!(
        reasons,
        vec![
            "Unsupported file type: .blend".to_string(),
            "File type not requested: document".to_string(),
        ]
    );
}

#[test]
fn heic_with_preview_png_resolves_to_original() {
    let temp_dir = TempDir::new().unwrap();
    let lib = LibraryFixture::new(temp_dir.path());
    let dir = lib.add_item("H.info", "photo.heic", metadata("H", "photo", "heic", &[], false));
    fs::write(dir.join("photo.heic.png"), b"preview").unwrap();

    let result = CatalogScanner::new(lib.root(), FilterConfig::default())
        .scan()
        .unwrap();
    assert_eq!(result.accepted.len(), 1);
    assert_eq!(result.accepted[0].asset_file_name(), "photo.heic");
}

#[test]
fn unknown_metadata_fields_survive_the_scan() {
    let temp_dir = TempDir::new().unwrap();
    let lib = LibraryFixture::new(temp_dir.path());
    let mut meta = metadata("U", "u", "png", &["x", "y"], false);
    meta["unknownField"] = serde_json::json!(42);
    lib.add_item("U.info", "u.png", meta);

    let result = CatalogScanner::new(lib.root(), FilterConfig::default())
        .scan()
        .unwrap();
    let record = &result.accepted[0].metadata;
    assert_eq!(record.tags, vec!["x", "y"]);
    assert_eq!(
        record.extra_fields.get("unknownField"),
        Some(&serde_json::json!(42))
    );
}

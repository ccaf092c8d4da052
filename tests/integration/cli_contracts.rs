use std::fs;
use std::path::PathBuf;

use eaglebridge::config::BridgeConfig;
use eaglebridge::error::{ApiError, CatalogError};
use eaglebridge::tooling::cli::{CliContext, Commands};
use tempfile::TempDir;

use crate::integration::support::three_folder_library;

fn scan_command(catalog: Option<PathBuf>, show: &str, format: &str) -> Commands {
    Commands::Scan {
        catalog,
        include_deleted: false,
        types: vec![],
        tags: vec![],
        show: show.to_string(),
        format: format.to_string(),
        jobs: None,
    }
}

#[test]
fn scan_json_contract_has_required_fields() {
    let temp_dir = TempDir::new().unwrap();
    let lib = three_folder_library(temp_dir.path());
    let cli = CliContext::with_config(BridgeConfig::default());

    let output = cli
        .execute(&scan_command(Some(lib.root().to_path_buf()), "all", "json"))
        .unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["folders_visited"].as_u64(), Some(3));
    let accepted = parsed["accepted"].as_array().unwrap();
    assert_eq!(accepted.len(), 1);
    assert_eq!(accepted[0]["folder_id"], "C.info");
    assert_eq!(accepted[0]["metadata"]["id"], "C");
    assert!(accepted[0]["primary_asset_path"]
        .as_str()
        .unwrap()
        .ends_with("c.jpg"));
    assert_eq!(parsed["skipped"][0]["reason"], "Item is deleted");
    assert_eq!(parsed["errored"][0]["reason"], "Missing metadata.json");
}

#[test]
fn scan_uses_catalog_path_from_config() {
    let temp_dir = TempDir::new().unwrap();
    let lib = three_folder_library(temp_dir.path());
    let mut config = BridgeConfig::default();
    config.catalog.path = Some(lib.root().to_path_buf());
    config.catalog.include_deleted = true;
    let cli = CliContext::with_config(config);

    let output = cli.execute(&scan_command(None, "accepted", "text")).unwrap();

    assert!(output.starts_with("Visited 3 folder(s): 2 accepted, 0 skipped, 1 errored"));
    assert!(output.contains("a.jpg"));
    assert!(output.contains("c.jpg"));
    assert!(!output.contains("Errored"));
}

#[test]
fn scan_parallel_jobs_match_sequential_output() {
    let temp_dir = TempDir::new().unwrap();
    let lib = three_folder_library(temp_dir.path());
    let cli = CliContext::with_config(BridgeConfig::default());

    let sequential = cli
        .execute(&scan_command(Some(lib.root().to_path_buf()), "all", "json"))
        .unwrap();
    let parallel = cli
        .execute(&Commands::Scan {
            catalog: Some(lib.root().to_path_buf()),
            include_deleted: false,
            types: vec![],
            tags: vec![],
            show: "all".to_string(),
            format: "json".to_string(),
            jobs: Some(3),
        })
        .unwrap();
    assert_eq!(sequential, parallel);
}

#[test]
fn scan_without_images_dir_fails() {
    let temp_dir = TempDir::new().unwrap();
    let cli = CliContext::with_config(BridgeConfig::default());

    let err = cli
        .execute(&scan_command(Some(temp_dir.path().to_path_buf()), "all", "text"))
        .unwrap_err();
    assert!(matches!(
        err,
        ApiError::Catalog(CatalogError::ImagesDirMissing(_))
    ));
}

#[test]
fn sidegen_writes_sidecars_for_accepted_items_only() {
    let temp_dir = TempDir::new().unwrap();
    let lib = three_folder_library(temp_dir.path());
    let cli = CliContext::with_config(BridgeConfig::default());

    let output = cli
        .execute(&Commands::Sidegen {
            catalog: Some(lib.root().to_path_buf()),
            tags: vec![],
            dry: false,
            missing_only: false,
            format: "text".to_string(),
        })
        .unwrap();

    assert_eq!(output, "Wrote 1 sidecar(s), 0 already present, 0 failed");
    let images = lib.root().join("images");
    let sidecar = fs::read_to_string(images.join("C.info").join("c.xmp")).unwrap();
    assert!(sidecar.contains("<rdf:li>x</rdf:li>"));
    assert!(!images.join("A.info").join("a.xmp").exists());
}

#[test]
fn sidegen_dry_run_touches_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let lib = three_folder_library(temp_dir.path());
    let cli = CliContext::with_config(BridgeConfig::default());

    let output = cli
        .execute(&Commands::Sidegen {
            catalog: Some(lib.root().to_path_buf()),
            tags: vec![],
            dry: true,
            missing_only: false,
            format: "json".to_string(),
        })
        .unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["dry_run"], true);
    assert_eq!(parsed["written"].as_array().unwrap().len(), 1);
    assert!(!lib.root().join("images/C.info/c.xmp").exists());
}

#[test]
fn send_to_immich_dry_run_lists_accepted_items() {
    let temp_dir = TempDir::new().unwrap();
    let lib = three_folder_library(temp_dir.path());
    let cli = CliContext::with_config(BridgeConfig::default());

    let output = cli
        .execute(&Commands::SendToImmich {
            catalog: Some(lib.root().to_path_buf()),
            immich_url: Some("http://127.0.0.1:9".to_string()),
            api_key: Some("test-key".to_string()),
            tags: vec![],
            concurrency: Some(2),
            dry: true,
            skip_check: false,
            format: "text".to_string(),
        })
        .unwrap();

    assert!(output.starts_with("Would upload 1 item(s)"));
    assert!(output.contains("C.info"));
}

//! Format command results as text tables or JSON.

use crate::catalog::ScanResult;
use crate::error::ApiError;
use crate::remote::{ApplicationInfo, EagleFolder, EagleItem, LibraryInfo};
use crate::sidecar::SidecarReport;
use crate::transfer::{TransferOutcome, TransferReport};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::json;
use std::str::FromStr;

/// Which part of a scan result to print
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Accepted,
    Skipped,
    Errored,
    All,
}

impl Section {
    fn includes(&self, other: Section) -> bool {
        *self == Section::All || *self == other
    }
}

impl FromStr for Section {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accepted" => Ok(Section::Accepted),
            "skipped" => Ok(Section::Skipped),
            "errored" => Ok(Section::Errored),
            "all" => Ok(Section::All),
            other => Err(ApiError::ConfigError(format!(
                "Invalid section: {} (must be 'accepted', 'skipped', 'errored', or 'all')",
                other
            ))),
        }
    }
}

/// Check an output format flag.
pub fn parse_format(format: &str) -> Result<&str, ApiError> {
    match format {
        "text" | "json" => Ok(format),
        other => Err(ApiError::ConfigError(format!(
            "Invalid output format: {} (must be 'text' or 'json')",
            other
        ))),
    }
}

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| ApiError::ConfigError(format!("Failed to serialize output: {}", e)))
}

pub fn format_scan_summary(result: &ScanResult) -> String {
    format!(
        "Visited {} folder(s): {} accepted, {} skipped, {} errored",
        result.folders_visited,
        result.accepted.len(),
        result.skipped.len(),
        result.errored.len()
    )
}

pub fn format_scan_text(result: &ScanResult, section: Section) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_scan_summary(result)));

    if section.includes(Section::Accepted) {
        out.push_str(&format!(
            "{}\n\n",
            format_section_heading(&format!("Accepted ({})", result.accepted.len()))
        ));
        if !result.accepted.is_empty() {
            let mut table = Table::new();
            table.load_preset(UTF8_BORDERS_ONLY);
            table.set_header(vec!["Folder", "Name", "Asset", "Type", "Tags"]);
            for item in &result.accepted {
                table.add_row(vec![
                    item.folder_id.clone(),
                    item.metadata.name.clone(),
                    item.asset_file_name(),
                    item.media_type()
                        .map(|t| t.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    item.metadata.tags.join(", "),
                ]);
            }
            out.push_str(&format!("{}\n\n", table));
        }
    }

    if section.includes(Section::Skipped) {
        out.push_str(&format!(
            "{}\n\n",
            format_section_heading(&format!("Skipped ({})", result.skipped.len()))
        ));
        if !result.skipped.is_empty() {
            let mut table = Table::new();
            table.load_preset(UTF8_BORDERS_ONLY);
            table.set_header(vec!["Folder", "Asset", "Reason"]);
            for (item, reason) in &result.skipped {
                table.add_row(vec![
                    item.folder_id.clone(),
                    item.asset_file_name(),
                    reason.to_string(),
                ]);
            }
            out.push_str(&format!("{}\n\n", table));
        }
    }

    if section.includes(Section::Errored) {
        out.push_str(&format!(
            "{}\n\n",
            format_section_heading(&format!("Errored ({})", result.errored.len()))
        ));
        if !result.errored.is_empty() {
            let mut table = Table::new();
            table.load_preset(UTF8_BORDERS_ONLY);
            table.set_header(vec!["Folder", "Reason"]);
            for (path, reason) in &result.errored {
                table.add_row(vec![path.display().to_string(), reason.to_string()]);
            }
            out.push_str(&format!("{}\n", table));
        }
    }

    out.trim_end().to_string()
}

pub fn format_scan_json(result: &ScanResult, section: Section) -> Result<String, ApiError> {
    let mut out = serde_json::Map::new();
    out.insert("folders_visited".to_string(), json!(result.folders_visited));
    if section.includes(Section::Accepted) {
        out.insert("accepted".to_string(), json!(result.accepted));
    }
    if section.includes(Section::Skipped) {
        let skipped: Vec<_> = result
            .skipped
            .iter()
            .map(|(item, reason)| json!({ "item": item, "reason": reason.to_string() }))
            .collect();
        out.insert("skipped".to_string(), json!(skipped));
    }
    if section.includes(Section::Errored) {
        let errored: Vec<_> = result
            .errored
            .iter()
            .map(|(path, reason)| {
                json!({ "folder": path.display().to_string(), "reason": reason.to_string() })
            })
            .collect();
        out.insert("errored".to_string(), json!(errored));
    }
    to_json(&out)
}

pub fn format_sidecar_report(report: &SidecarReport, format: &str) -> Result<String, ApiError> {
    if format == "json" {
        return to_json(report);
    }
    let verb = if report.dry_run { "Would write" } else { "Wrote" };
    let mut out = format!(
        "{} {} sidecar(s), {} already present, {} failed",
        verb,
        report.written.len(),
        report.skipped_existing.len(),
        report.failures.len()
    );
    if !report.failures.is_empty() {
        out.push_str(&format!("\n\n{}\n\n", format_section_heading("Failures")));
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        table.set_header(vec!["Folder", "Sidecar", "Error"]);
        for f in &report.failures {
            table.add_row(vec![
                f.folder_id.clone(),
                f.sidecar_path.display().to_string(),
                f.error.clone(),
            ]);
        }
        out.push_str(&table.to_string());
    }
    Ok(out)
}

pub fn format_transfer_report(report: &TransferReport, format: &str) -> Result<String, ApiError> {
    if format == "json" {
        return to_json(report);
    }
    let mut out = if report.planned() > 0 {
        format!("Would upload {} item(s)", report.planned())
    } else {
        format!(
            "Uploaded {} item(s), {} duplicate(s), {} failed",
            report.uploaded(),
            report.duplicates(),
            report.failed()
        )
    };
    if report.items.is_empty() {
        return Ok(out);
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Folder", "Asset", "Result"]);
    for t in &report.items {
        let result = match &t.outcome {
            TransferOutcome::Uploaded { asset_id } => format!("uploaded ({})", asset_id),
            TransferOutcome::Duplicate { asset_id } => format!("duplicate ({})", asset_id),
            TransferOutcome::WouldUpload => "pending".to_string(),
            TransferOutcome::Failed { reason } => format!("failed: {}", reason),
        };
        let asset = t
            .asset_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        table.add_row(vec![t.folder_id.clone(), asset, result]);
    }
    out.push_str(&format!("\n\n{}", table));
    Ok(out)
}

pub fn format_eagle_info(
    app: &ApplicationInfo,
    library: &LibraryInfo,
    format: &str,
) -> Result<String, ApiError> {
    if format == "json" {
        return to_json(&json!({ "application": app, "library": library }));
    }
    let folder_count: usize = library.folders.iter().map(|f| f.flatten().len()).sum();
    Ok(format!(
        "{}\n  Version: {} (build {})\n  Platform: {}\n  Folders: {}\n  Smart folders: {}",
        format_section_heading("Eagle"),
        app.version,
        app.build_version,
        app.platform,
        folder_count,
        library.smart_folders.len()
    ))
}

pub fn format_folders(folders: &[EagleFolder], format: &str) -> Result<String, ApiError> {
    if format == "json" {
        return to_json(folders);
    }
    if folders.is_empty() {
        return Ok("No folders found.".to_string());
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["ID", "Name", "Items"]);
    for root in folders {
        for (depth, folder) in root.flatten() {
            table.add_row(vec![
                folder.id.clone(),
                format!("{}{}", "  ".repeat(depth), folder.name),
                folder.images.len().to_string(),
            ]);
        }
    }
    Ok(table.to_string())
}

pub fn format_items(items: &[EagleItem], format: &str) -> Result<String, ApiError> {
    if format == "json" {
        return to_json(items);
    }
    if items.is_empty() {
        return Ok("No items found.".to_string());
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["ID", "Name", "Ext", "Size", "Tags"]);
    for item in items {
        table.add_row(vec![
            item.id.clone(),
            item.name.clone(),
            item.ext.clone(),
            item.size.to_string(),
            item.tags.join(", "),
        ]);
    }
    Ok(format!("{}\n\nTotal: {} item(s)", table, items.len()))
}

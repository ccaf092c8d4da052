//! Wire types for the Eagle and Immich APIs.
//!
//! Response types keep every field the server sent: the ones modelled here
//! are typed, the rest land in `extra_fields`. Request payloads omit unset
//! optional fields entirely.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Null and missing both mean "default".
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub version: String,
    #[serde(default)]
    pub prerelease_version: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub build_version: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub exec_path: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub platform: String,
    #[serde(flatten)]
    pub extra_fields: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EagleFolder {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub modification_time: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    /// Item ids directly in this folder, when the endpoint includes them
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub children: Vec<EagleFolder>,
    #[serde(flatten)]
    pub extra_fields: Map<String, Value>,
}

impl EagleFolder {
    /// This folder followed by all descendants, depth first, with their depth.
    pub fn flatten(&self) -> Vec<(usize, &EagleFolder)> {
        let mut out = Vec::new();
        self.collect_into(0, &mut out);
        out
    }

    fn collect_into<'a>(&'a self, depth: usize, out: &mut Vec<(usize, &'a EagleFolder)>) {
        out.push((depth, self));
        for child in &self.children {
            child.collect_into(depth + 1, out);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EagleItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ext: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub annotation: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub folders: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub size: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_deleted: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub modification_time: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_modified: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub no_thumbnail: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub width: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub height: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub palettes: Vec<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub star: u8,
    #[serde(flatten)]
    pub extra_fields: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub folders: Vec<EagleFolder>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub smart_folders: Vec<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub quick_access: Vec<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags_groups: Vec<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub modification_time: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub application_version: String,
    #[serde(flatten)]
    pub extra_fields: Map<String, Value>,
}

/// Folder label colors accepted by `/folder/update`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FolderColor {
    Red,
    Orange,
    Green,
    Yellow,
    Aqua,
    Blue,
    Purple,
    Pink,
}

impl FromStr for FolderColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "red" => Ok(FolderColor::Red),
            "orange" => Ok(FolderColor::Orange),
            "green" => Ok(FolderColor::Green),
            "yellow" => Ok(FolderColor::Yellow),
            "aqua" => Ok(FolderColor::Aqua),
            "blue" => Ok(FolderColor::Blue),
            "purple" => Ok(FolderColor::Purple),
            "pink" => Ok(FolderColor::Pink),
            other => Err(format!("Invalid folder color: {}", other)),
        }
    }
}

/// Changes for `/folder/update`; unset fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_color: Option<FolderColor>,
}

/// One image to import from a URL (http, https or base64 data URL)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlItem {
    pub url: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub star: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modification_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
}

/// One local file to import
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathItem {
    pub path: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub url: String,
    pub name: String,
    /// Thumbnail as a base64 image string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base64: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modification_time: Option<i64>,
}

/// Metadata changes for `/item/update`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub star: Option<u8>,
}

/// Sort keys for `/item/list`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOrder {
    CreateDate,
    FileSize,
    Name,
    Resolution,
}

impl ItemOrder {
    fn as_str(&self) -> &'static str {
        match self {
            ItemOrder::CreateDate => "CREATEDATE",
            ItemOrder::FileSize => "FILESIZE",
            ItemOrder::Name => "NAME",
            ItemOrder::Resolution => "RESOLUTION",
        }
    }
}

/// Filter for `/item/list`
#[derive(Debug, Clone, PartialEq)]
pub struct ItemQuery {
    pub limit: u32,
    pub offset: u32,
    /// Sort key and whether it is descending
    pub order_by: Option<(ItemOrder, bool)>,
    pub keyword: Option<String>,
    pub ext: Option<String>,
    pub tags: Vec<String>,
    pub folders: Vec<String>,
}

impl Default for ItemQuery {
    fn default() -> Self {
        Self {
            limit: 200,
            offset: 0,
            order_by: None,
            keyword: None,
            ext: None,
            tags: Vec::new(),
            folders: Vec::new(),
        }
    }
}

impl ItemQuery {
    /// Query string pairs; tags and folders are comma-joined.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
        ];
        if let Some((order, descending)) = self.order_by {
            let prefix = if descending { "-" } else { "" };
            pairs.push(("orderBy", format!("{}{}", prefix, order.as_str())));
        }
        if let Some(keyword) = self.keyword.as_ref().filter(|k| !k.is_empty()) {
            pairs.push(("keyword", keyword.clone()));
        }
        if let Some(ext) = self.ext.as_ref().filter(|e| !e.is_empty()) {
            pairs.push(("ext", ext.clone()));
        }
        if !self.tags.is_empty() {
            pairs.push(("tags", self.tags.join(",")));
        }
        if !self.folders.is_empty() {
            pairs.push(("folders", self.folders.join(",")));
        }
        pairs
    }
}

/// Result of `POST /assets`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetUploadResponse {
    pub id: String,
    /// `created`, `replaced` or `duplicate`
    #[serde(default)]
    pub status: String,
    #[serde(flatten)]
    pub extra_fields: Map<String, Value>,
}

impl AssetUploadResponse {
    pub fn is_duplicate(&self) -> bool {
        self.status.eq_ignore_ascii_case("duplicate")
    }
}

/// Body of `PUT /assets/{id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_archived: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl AssetUpdate {
    pub fn description(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..Self::default()
        }
    }
}

impl fmt::Display for EagleFolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

//! Eagle `metadata.json` descriptor parsing.
//!
//! Known keys are coerced into typed fields, missing keys take defaults and
//! unknown keys are kept in `extra_fields` so newer Eagle versions never break
//! parsing. A malformed palette fails the whole record.

use crate::error::MetadataError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// One dominant color of an asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteEntry {
    #[serde(rename = "color")]
    pub rgb: [u8; 3],
    /// Share of the image covered by this color; weights need not sum to 1
    #[serde(rename = "ratio")]
    pub weight: f64,
}

/// Typed view of an item's `metadata.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataRecord {
    #[serde(deserialize_with = "de::required_string")]
    pub id: String,
    #[serde(deserialize_with = "de::required_string")]
    pub name: String,
    #[serde(rename = "size", default, deserialize_with = "de::lenient_u64")]
    pub size_bytes: u64,
    /// Creation time, epoch milliseconds
    #[serde(rename = "btime", default, deserialize_with = "de::lenient_i64")]
    pub created_at: i64,
    /// File modification time, epoch milliseconds
    #[serde(rename = "mtime", default, deserialize_with = "de::lenient_i64")]
    pub modified_at: i64,
    #[serde(rename = "ext", default, deserialize_with = "de::lenient_string")]
    pub extension: String,
    #[serde(default, deserialize_with = "de::tag_list")]
    pub tags: Vec<String>,
    #[serde(rename = "folders", default, deserialize_with = "de::string_list")]
    pub folder_refs: Vec<String>,
    #[serde(rename = "isDeleted", default, deserialize_with = "de::lenient_bool")]
    pub is_deleted: bool,
    #[serde(rename = "url", default, deserialize_with = "de::lenient_string")]
    pub source_url: String,
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub annotation: String,
    #[serde(default, deserialize_with = "de::lenient_u64")]
    pub width: u64,
    #[serde(default, deserialize_with = "de::lenient_u64")]
    pub height: u64,
    #[serde(rename = "noThumbnail", default, deserialize_with = "de::lenient_bool")]
    pub has_no_thumbnail: bool,
    #[serde(rename = "lastModified", default, deserialize_with = "de::lenient_i64")]
    pub last_modified_at: i64,
    #[serde(rename = "modificationTime", default, deserialize_with = "de::lenient_i64")]
    pub modification_time: i64,
    #[serde(
        rename = "deletedTime",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "de::optional_i64"
    )]
    pub deleted_time: Option<i64>,
    #[serde(rename = "palettes", default, deserialize_with = "de::null_default")]
    pub palette: Vec<PaletteEntry>,
    /// Keys this crate does not know about, preserved verbatim
    #[serde(flatten)]
    pub extra_fields: Map<String, Value>,
}

impl MetadataRecord {
    /// Minimal record with every optional field at its default.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            size_bytes: 0,
            created_at: 0,
            modified_at: 0,
            extension: String::new(),
            tags: Vec::new(),
            folder_refs: Vec::new(),
            is_deleted: false,
            source_url: String::new(),
            annotation: String::new(),
            width: 0,
            height: 0,
            has_no_thumbnail: false,
            last_modified_at: 0,
            modification_time: 0,
            deleted_time: None,
            palette: Vec::new(),
            extra_fields: Map::new(),
        }
    }

    /// Parse an already-decoded JSON value.
    pub fn from_value(value: Value) -> Result<Self, MetadataError> {
        match value {
            Value::Object(_) => Ok(serde_json::from_value(value)?),
            other => Err(MetadataError::NotAnObject(json_kind(&other))),
        }
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, MetadataError> {
        let value: Value = serde_json::from_slice(bytes)?;
        Self::from_value(value)
    }

    /// Read and parse a descriptor file.
    pub fn load(path: &Path) -> Result<Self, MetadataError> {
        let bytes = std::fs::read(path).map_err(|source| MetadataError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_slice(&bytes)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        millis_to_utc(self.created_at)
    }

    pub fn modified_at_utc(&self) -> Option<DateTime<Utc>> {
        millis_to_utc(self.modified_at)
    }

    pub fn deleted_at_utc(&self) -> Option<DateTime<Utc>> {
        self.deleted_time.and_then(millis_to_utc)
    }
}

fn millis_to_utc(ms: i64) -> Option<DateTime<Utc>> {
    if ms <= 0 {
        return None;
    }
    DateTime::<Utc>::from_timestamp_millis(ms)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Lenient field deserializers: `null` means absent, numbers and strings are coerced.
mod de {
    use serde::de::{Deserialize, Deserializer, Error};
    use serde_json::Value;

    pub fn required_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        match Value::deserialize(d)? {
            Value::Null => Err(D::Error::custom("required string field is null")),
            other => scalar_to_string(other).map_err(D::Error::custom),
        }
    }

    pub fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        match Value::deserialize(d)? {
            Value::Null => Ok(String::new()),
            other => scalar_to_string(other).map_err(D::Error::custom),
        }
    }

    pub fn lenient_u64<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
        match Value::deserialize(d)? {
            Value::Null => Ok(0),
            other => {
                if let Some(v) = other.as_u64() {
                    return Ok(v);
                }
                let n = to_i64(&other).map_err(D::Error::custom)?;
                u64::try_from(n).map_err(|_| D::Error::custom(format!("expected non-negative number, got {}", n)))
            }
        }
    }

    pub fn lenient_i64<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
        match Value::deserialize(d)? {
            Value::Null => Ok(0),
            other => to_i64(&other).map_err(D::Error::custom),
        }
    }

    pub fn optional_i64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
        match Value::deserialize(d)? {
            Value::Null => Ok(None),
            other => to_i64(&other).map(Some).map_err(D::Error::custom),
        }
    }

    pub fn lenient_bool<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        match Value::deserialize(d)? {
            Value::Null => Ok(false),
            Value::Bool(b) => Ok(b),
            Value::Number(n) => match n.as_i64() {
                Some(0) => Ok(false),
                Some(1) => Ok(true),
                _ => Err(D::Error::custom(format!("expected boolean, got {}", n))),
            },
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(true),
                "false" | "0" | "" => Ok(false),
                _ => Err(D::Error::custom(format!("expected boolean, got {:?}", s))),
            },
            other => Err(D::Error::custom(format!("expected boolean, got {}", other))),
        }
    }

    pub fn string_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        match Value::deserialize(d)? {
            Value::Null => Ok(Vec::new()),
            Value::Array(items) => items
                .into_iter()
                .map(|v| scalar_to_string(v).map_err(D::Error::custom))
                .collect(),
            other => Err(D::Error::custom(format!("expected list of strings, got {}", other))),
        }
    }

    /// String list with duplicates removed, first occurrence kept.
    pub fn tag_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        let raw = string_list(d)?;
        let mut tags: Vec<String> = Vec::with_capacity(raw.len());
        for tag in raw {
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        Ok(tags)
    }

    pub fn null_default<'de, D, T>(d: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + Default,
    {
        Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
    }

    fn scalar_to_string(value: Value) -> Result<String, String> {
        match value {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            other => Err(format!("expected string, got {}", other)),
        }
    }

    fn to_i64(value: &Value) -> Result<i64, String> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().and_then(truncate_f64))
                .ok_or_else(|| format!("number out of range: {}", n)),
            Value::String(s) => {
                let s = s.trim();
                match s.parse::<i64>() {
                    Ok(v) => Ok(v),
                    Err(_) => match s.parse::<f64>() {
                        Ok(f) => truncate_f64(f).ok_or_else(|| format!("number out of range: {}", s)),
                        Err(_) => Err(format!("expected number, got {:?}", s)),
                    },
                }
            }
            other => Err(format!("expected number, got {}", other)),
        }
    }

    // `i64::MAX as f64` rounds up to 2^63, so the upper bound is exclusive.
    fn truncate_f64(f: f64) -> Option<i64> {
        const LIMIT: f64 = 9_223_372_036_854_775_808.0;
        let t = f.trunc();
        (t.is_finite() && t >= -LIMIT && t < LIMIT).then(|| t as i64)
    }
}

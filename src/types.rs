//! Core types shared by the scanner, configuration and CLI.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Broad media category of a primary asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
    Audio,
    Document,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
            MediaType::Audio => "audio",
            MediaType::Document => "document",
        }
    }

    /// Types admitted when the caller does not say otherwise.
    pub fn default_allowed() -> BTreeSet<MediaType> {
        [MediaType::Image, MediaType::Video, MediaType::Audio]
            .into_iter()
            .collect()
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "image" => Ok(MediaType::Image),
            "video" => Ok(MediaType::Video),
            "audio" => Ok(MediaType::Audio),
            "document" => Ok(MediaType::Document),
            other => Err(format!(
                "Invalid media type: {}. Must be image, video, audio, or document",
                other
            )),
        }
    }
}

/// Admission policy applied to every well-formed catalog item.
///
/// Immutable for the duration of a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterConfig {
    /// Keep items that Eagle has moved to its trash
    pub include_deleted: bool,
    /// Media types an accepted item may have
    pub allowed_types: BTreeSet<MediaType>,
    /// Tags to match with OR semantics; `None` (or an empty set) disables tag filtering
    pub tag_filter: Option<BTreeSet<String>>,
}

impl FilterConfig {
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tags: BTreeSet<String> = tags.into_iter().map(Into::into).collect();
        self.tag_filter = if tags.is_empty() { None } else { Some(tags) };
        self
    }

    /// True when no tag filter is set or at least one item tag is in the filter.
    pub fn matches_tags<S: AsRef<str>>(&self, item_tags: &[S]) -> bool {
        match &self.tag_filter {
            None => true,
            Some(filter) if filter.is_empty() => true,
            Some(filter) => item_tags.iter().any(|t| filter.contains(t.as_ref())),
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            include_deleted: false,
            allowed_types: MediaType::default_allowed(),
            tag_filter: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_filter_config() {
        let filter = FilterConfig::default();
        assert!(!filter.include_deleted);
        assert!(filter.allowed_types.contains(&MediaType::Image));
        assert!(filter.allowed_types.contains(&MediaType::Video));
        assert!(filter.allowed_types.contains(&MediaType::Audio));
        assert!(!filter.allowed_types.contains(&MediaType::Document));
        assert!(filter.tag_filter.is_none());
    }

    #[test]
    fn test_tag_filter_or_semantics() {
        let filter = FilterConfig::default().with_tags(["a", "b"]);
        assert!(filter.matches_tags(&["b", "z"]));
        assert!(!filter.matches_tags(&["c"]));
        assert!(!filter.matches_tags::<&str>(&[]));
    }

    #[test]
    fn test_empty_tag_list_disables_filter() {
        let filter = FilterConfig::default().with_tags(Vec::<String>::new());
        assert!(filter.tag_filter.is_none());
        assert!(filter.matches_tags::<&str>(&[]));
    }

    #[test]
    fn test_media_type_from_str() {
        assert_eq!("Image".parse::<MediaType>().unwrap(), MediaType::Image);
        assert_eq!(" video ".parse::<MediaType>().unwrap(), MediaType::Video);
        assert!("hologram".parse::<MediaType>().is_err());
    }

    proptest! {
        #[test]
        fn prop_tag_filter_accepts_iff_intersection(
            filter_tags in proptest::collection::btree_set("[a-e]", 1..4),
            item_tags in proptest::collection::vec("[a-h]", 0..6),
        ) {
            let filter = FilterConfig::default().with_tags(filter_tags.iter().cloned());
            let expected = item_tags.iter().any(|t| filter_tags.contains(t));
            prop_assert_eq!(filter.matches_tags(&item_tags), expected);
        }
    }
}

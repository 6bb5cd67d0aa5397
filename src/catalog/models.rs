//! Catalog data models

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A catalog record as it appears in the bundled data
#[derive(Debug, Clone, Deserialize)]
pub(super) struct RawGameEntry {
    pub id: i64,
    pub name: String,
    pub cover: String,
    pub url: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub special: Option<Vec<String>>,
    #[serde(default)]
    pub featured: Option<bool>,
}

impl RawGameEntry {
    /// Reserved rows carry neither a name nor content
    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty() && self.url.trim().is_empty()
    }
}

/// Why a record was left out of the catalog
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntryError {
    #[error("record {index} is missing required fields: {reason}")]
    Malformed { index: usize, reason: String },
    #[error("record {index} has negative id {id}")]
    NegativeId { index: usize, id: i64 },
    #[error("record {index} repeats id {id}")]
    DuplicateId { index: usize, id: u32 },
}

/// A game in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub id: u32,
    pub display_name: String,
    /// Path inside the covers repository
    pub cover_file: String,
    /// Path inside the content repository
    pub content_file: String,
    pub author: Option<String>,
    pub tags: BTreeSet<String>,
    pub featured: bool,
}

impl CatalogEntry {
    pub(super) fn from_raw(id: u32, raw: RawGameEntry) -> Self {
        Self {
            id,
            display_name: raw.name.trim().to_string(),
            cover_file: raw.cover.trim().to_string(),
            content_file: raw.url.trim().to_string(),
            author: raw.author.filter(|a| !a.trim().is_empty()),
            tags: raw.special.unwrap_or_default().into_iter().collect(),
            featured: raw.featured.unwrap_or(false),
        }
    }

    /// Placeholder row that must never be rendered or loaded
    pub fn is_sentinel(&self) -> bool {
        self.display_name.is_empty() || self.content_file.is_empty()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

/// A catalog entry paired with the cover URL to show for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    #[serde(flatten)]
    pub entry: CatalogEntry,
    pub cover_url: String,
}

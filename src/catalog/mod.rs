//! Game catalog
//!
//! Parses the bundled game list. Records are validated one at a time so a broken
//! record only removes itself from the catalog.

mod filters;
mod models;

use std::collections::HashSet;

pub use filters::{resolved_cover_url, with_covers};
pub use models::{CatalogEntry, EntryError, GameView};

use crate::{log_debug, log_error, log_info, log_warn};
use models::RawGameEntry;

const MODULE: &str = "catalog";

const BUNDLED: &str = include_str!("games.json");

/// The parsed, immutable game list
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    skipped: Vec<EntryError>,
}

impl Catalog {
    /// The catalog shipped with the application
    pub fn bundled() -> Self {
        Self::from_json(BUNDLED).unwrap_or_else(|e| {
            log_error!(MODULE, "Bundled catalog unreadable: {}", e);
            Self::default()
        })
    }

    /// Parse a JSON array of game records
    ///
    /// Fails only when the document is not an array; bad records are skipped and logged.
    pub fn from_json(json: &str) -> Result<Self, String> {
        let records: Vec<serde_json::Value> =
            serde_json::from_str(json).map_err(|e| format!("Failed to parse catalog: {}", e))?;

        let mut entries = Vec::with_capacity(records.len());
        let mut skipped = Vec::new();
        let mut seen = HashSet::new();

        for (index, record) in records.into_iter().enumerate() {
            match parse_record(index, record, &mut seen) {
                Ok(Some(entry)) => entries.push(entry),
                Ok(None) => {}
                Err(e) => {
                    log_warn!(MODULE, "Skipping catalog entry: {}", e);
                    skipped.push(e);
                }
            }
        }

        log_info!(
            MODULE,
            "Loaded {} catalog entries ({} skipped)",
            entries.len(),
            skipped.len()
        );
        Ok(Self { entries, skipped })
    }

    /// All accepted entries, sentinels included
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Records rejected while parsing
    pub fn skipped(&self) -> &[EntryError] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_record(
    index: usize,
    record: serde_json::Value,
    seen: &mut HashSet<u32>,
) -> Result<Option<CatalogEntry>, EntryError> {
    let raw: RawGameEntry = serde_json::from_value(record).map_err(|e| EntryError::Malformed {
        index,
        reason: e.to_string(),
    })?;

    if raw.id < 0 {
        if raw.is_blank() {
            log_debug!(MODULE, "Ignoring reserved row {} (id {})", index, raw.id);
            return Ok(None);
        }
        return Err(EntryError::NegativeId { index, id: raw.id });
    }

    let id = u32::try_from(raw.id).map_err(|_| EntryError::Malformed {
        index,
        reason: format!("id {} out of range", raw.id),
    })?;

    if !seen.insert(id) {
        return Err(EntryError::DuplicateId { index, id });
    }

    Ok(Some(CatalogEntry::from_raw(id, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mirrors::{PreferredMirrors, ResourceClass};
    use crate::testing::{cover_url, test_registry};

    const SAMPLE: &str = r#"[
        {"id": -1, "name": "", "cover": "", "url": ""},
        {"id": 0, "name": "Bowmasters", "cover": "bowmasters.png", "url": "bowmasters.html", "author": "Azur Games"},
        {"id": 1, "name": "OvO", "cover": "ovo.png", "url": "ovo.html", "special": ["flash"], "featured": true},
        {"id": 4, "name": "", "cover": "", "url": "", "special": ["emulator"], "featured": true},
        {"id": 7, "name": "Ruffle Game", "cover": "r.png", "url": "r.html", "special": ["flash", "port"]}
    ]"#;

    #[test]
    fn test_sentinels_are_not_loadable() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();

        assert_eq!(catalog.len(), 4);
        let ids: Vec<u32> = catalog.loadable_games().map(|e| e.id).collect();
        assert_eq!(ids, vec![0, 1, 7]);
        assert!(catalog.loadable_games().all(|e| !e.display_name.is_empty()));
        assert!(catalog.find(4).is_none());
        assert!(catalog.skipped().is_empty());
    }

    #[test]
    fn test_views() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();

        let flash: Vec<u32> = catalog.with_tag("flash").map(|e| e.id).collect();
        assert_eq!(flash, vec![1, 7]);
        let featured: Vec<u32> = catalog.featured().map(|e| e.id).collect();
        assert_eq!(featured, vec![1]);

        let bowmasters = catalog.find(0).unwrap();
        assert_eq!(bowmasters.content_file, "bowmasters.html");
        assert_eq!(bowmasters.author.as_deref(), Some("Azur Games"));
        assert!(!bowmasters.featured);
        assert!(bowmasters.tags.is_empty());
    }

    #[test]
    fn test_malformed_records_are_skipped() {
        let json = r#"[
            {"id": 0, "name": "Good", "cover": "g.png", "url": "g.html"},
            {"id": 1, "name": "No content", "cover": "n.png"},
            {"id": "two", "name": "Bad id", "cover": "b.png", "url": "b.html"},
            {"id": -5, "name": "Negative", "cover": "x.png", "url": "x.html"},
            {"id": 0, "name": "Again", "cover": "a.png", "url": "a.html"},
            42,
            {"id": 3, "name": "Also good", "cover": "a.png", "url": "a.html"}
        ]"#;

        let catalog = Catalog::from_json(json).unwrap();

        let ids: Vec<u32> = catalog.loadable_games().map(|e| e.id).collect();
        assert_eq!(ids, vec![0, 3]);
        assert_eq!(catalog.skipped().len(), 5);
        assert!(catalog
            .skipped()
            .contains(&EntryError::NegativeId { index: 3, id: -5 }));
        assert!(catalog
            .skipped()
            .contains(&EntryError::DuplicateId { index: 4, id: 0 }));
    }

    #[test]
    fn test_non_array_is_an_error() {
        assert!(Catalog::from_json(r#"{"games": []}"#).is_err());
        assert!(Catalog::from_json("not json").is_err());
    }

    #[test]
    fn test_bundled_catalog() {
        let catalog = Catalog::bundled();

        assert!(catalog.skipped().is_empty());
        assert_eq!(catalog.loadable_games().count(), 638);
        assert_eq!(catalog.find(0).map(|e| e.display_name.as_str()), Some("Bowmasters"));
        assert!(catalog.find(596).is_none());
        assert!(catalog.featured().count() > 0);
    }

    #[test]
    fn test_cover_url_follows_preferred_mirror() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        let registry = test_registry();
        let preferred = PreferredMirrors::new();
        let ovo = catalog.find(1).unwrap();

        assert_eq!(
            resolved_cover_url(ovo, &registry, &preferred),
            Some(cover_url(1, "ovo.png"))
        );

        preferred.set(ResourceClass::CoverImage, registry.mirrors()[2].clone());
        let views = with_covers(catalog.featured(), &registry, &preferred);
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].cover_url, cover_url(3, "ovo.png"));
    }
}

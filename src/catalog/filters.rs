//! Catalog views
//!
//! Read-only selections over the parsed catalog. Every view skips sentinel rows.

use crate::mirrors::{MirrorRegistry, PreferredMirrors, ResourceClass};

use super::models::{CatalogEntry, GameView};
use super::Catalog;

impl Catalog {
    /// Entries that can be rendered and loaded, in catalog order
    pub fn loadable_games(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter().filter(|e| !e.is_sentinel())
    }

    /// Loadable entries carrying a tag such as `flash` or `emulator`
    pub fn with_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a CatalogEntry> + 'a {
        self.loadable_games().filter(move |e| e.has_tag(tag))
    }

    pub fn featured(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.loadable_games().filter(|e| e.featured)
    }

    /// Look up a loadable entry by id
    pub fn find(&self, id: u32) -> Option<&CatalogEntry> {
        self.loadable_games().find(|e| e.id == id)
    }
}

/// Cover URL for an entry on the preferred cover mirror, or the primary one
pub fn resolved_cover_url(
    entry: &CatalogEntry,
    registry: &MirrorRegistry,
    preferred: &PreferredMirrors,
) -> Option<String> {
    let mirror = preferred.get(ResourceClass::CoverImage);
    let repo = registry.repo_for(ResourceClass::CoverImage);

    match mirror {
        Some(mirror) => Some(mirror.url(repo, &entry.cover_file)),
        None => registry.primary().map(|m| m.url(repo, &entry.cover_file)),
    }
}

/// Pair entries with their current cover URLs
pub fn with_covers<'a>(
    entries: impl Iterator<Item = &'a CatalogEntry>,
    registry: &MirrorRegistry,
    preferred: &PreferredMirrors,
) -> Vec<GameView> {
    entries
        .map(|entry| GameView {
            cover_url: resolved_cover_url(entry, registry, preferred).unwrap_or_default(),
            entry: entry.clone(),
        })
        .collect()
}

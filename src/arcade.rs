//! Arcade orchestration
//!
//! Wires the mirror registry, prober, fetcher and loaders together around one
//! shared preferred-mirror state. Owned by the desktop shell; no globals.

use std::sync::Arc;

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::backgrounds::Backgrounds;
use crate::catalog::{with_covers, Catalog, GameView};
use crate::config::ArcadeConfig;
use crate::documents::DocumentStore;
use crate::fetch::ResilientFetcher;
use crate::loader::{ContentLoader, CoverImage, ImageLoader, LoadState};
use crate::mirrors::{MirrorRegistry, PreferredMirrors, ResourceClass};
use crate::placeholder::Theme;
use crate::preferences::{KeyValueStore, PreferenceStore};
use crate::presenter::Presenter;
use crate::probe::Prober;
use crate::transport::Transport;
use crate::{log_info, log_warn};

const MODULE: &str = "arcade";

/// Mirrors chosen by a probe run, by name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeReport {
    pub content: Option<String>,
    pub covers: Option<String>,
}

/// Current mirror choice for one resource class
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MirrorStatus {
    pub class: String,
    pub preferred: Option<String>,
    /// Mirror names in the order a fetch would try them
    pub order: Vec<String>,
}

pub struct Arcade {
    registry: Arc<MirrorRegistry>,
    preferred: Arc<PreferredMirrors>,
    prober: Prober,
    content: ContentLoader,
    covers: ImageLoader,
    backgrounds: Backgrounds,
    catalog: Catalog,
    documents: DocumentStore,
}

impl Arcade {
    pub fn new(
        config: ArcadeConfig,
        catalog: Catalog,
        transport: Arc<dyn Transport>,
        presenter: Arc<dyn Presenter>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        let registry = Arc::new(config.registry);
        let preferred = Arc::new(PreferredMirrors::new());
        let documents = DocumentStore::new();

        let prober = Prober::new(
            transport.clone(),
            registry.clone(),
            preferred.clone(),
            config.probe_timeout,
        );
        let fetcher = Arc::new(ResilientFetcher::new(
            transport.clone(),
            registry.clone(),
            preferred.clone(),
        ));
        let content = ContentLoader::new(
            fetcher.clone(),
            presenter.clone(),
            documents.clone(),
            config.ready_timeout,
        );
        let backgrounds = Backgrounds::new(
            transport,
            fetcher.clone(),
            Arc::new(PreferenceStore::new(store)),
            presenter,
            config.background_endpoints,
        );

        Self {
            registry,
            preferred,
            prober,
            covers: ImageLoader::new(fetcher),
            content,
            backgrounds,
            catalog,
            documents,
        }
    }

    /// Probe content mirrors, then cover mirrors
    pub async fn initialize(&self) -> ProbeReport {
        log_info!(MODULE, "Initializing mirror system...");

        let report = ProbeReport {
            content: self.probe(ResourceClass::GameContent).await,
            covers: self.probe(ResourceClass::CoverImage).await,
        };

        log_info!(
            MODULE,
            "Mirror initialization complete. Content: {}, Covers: {}",
            report.content.as_deref().unwrap_or("using fallbacks"),
            report.covers.as_deref().unwrap_or("using fallbacks")
        );
        report
    }

    /// Forget the current choices and probe again
    pub async fn reprobe(&self) -> ProbeReport {
        for class in ResourceClass::ALL {
            self.preferred.clear(class);
        }
        self.initialize().await
    }

    async fn probe(&self, class: ResourceClass) -> Option<String> {
        self.prober
            .probe(class)
            .await
            .map(|mirror| mirror.name().to_string())
    }

    pub fn mirror_status(&self) -> Vec<MirrorStatus> {
        ResourceClass::ALL
            .into_iter()
            .map(|class| {
                let preferred = self.preferred.get(class);
                let mut order: Vec<String> =
                    preferred.iter().map(|m| m.name().to_string()).collect();
                for mirror in self.registry.mirrors() {
                    if !order.iter().any(|name| name == mirror.name()) {
                        order.push(mirror.name().to_string());
                    }
                }

                MirrorStatus {
                    class: class.as_str().to_string(),
                    preferred: preferred.map(|m| m.name().to_string()),
                    order,
                }
            })
            .collect()
    }

    /// Loadable games with cover URLs on the current cover mirror
    pub fn games(&self) -> Vec<GameView> {
        with_covers(self.catalog.loadable_games(), &self.registry, &self.preferred)
    }

    pub fn featured_games(&self) -> Vec<GameView> {
        with_covers(self.catalog.featured(), &self.registry, &self.preferred)
    }

    /// Load a catalog game into the embedding surface
    pub async fn load_game(&self, id: u32) -> Result<LoadState, String> {
        let entry = self.catalog.find(id).ok_or_else(|| {
            log_warn!(MODULE, "Load requested for unknown game {}", id);
            format!("Unknown game: {}", id)
        })?;

        Ok(self
            .content
            .load_game(&entry.content_file, &entry.display_name)
            .await)
    }

    /// Close the current game, abandoning its load if still in flight
    pub fn close_game(&self) {
        log_info!(MODULE, "Closing game");
        self.content.cancel();
    }

    pub fn content(&self) -> &ContentLoader {
        &self.content
    }

    /// Resolve the cover for a catalog game
    pub async fn load_cover(&self, id: u32, theme: &Theme) -> Result<CoverImage, String> {
        let entry = self
            .catalog
            .find(id)
            .ok_or_else(|| format!("Unknown game: {}", id))?;

        Ok(self
            .covers
            .load_cover(
                &entry.cover_file,
                &entry.display_name,
                theme,
                &CancellationToken::new(),
            )
            .await)
    }

    pub fn backgrounds(&self) -> &Backgrounds {
        &self.backgrounds
    }

    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }
}

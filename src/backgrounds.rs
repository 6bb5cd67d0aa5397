//! Background templates
//!
//! Lists background images from the repository contents API and applies one by
//! probing its candidate URLs as images, persisting the first that loads.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::config;
use crate::fetch::{Expect, FetchError, ResilientFetcher};
use crate::preferences::{BackgroundPreference, PreferenceStore};
use crate::presenter::Presenter;
use crate::transport::Transport;
use crate::{log_error, log_info, log_warn};

const MODULE: &str = "backgrounds";

/// Entry of a repository contents listing
#[derive(Debug, Deserialize)]
struct ContentsEntry {
    name: String,
    download_url: Option<String>,
}

/// A selectable background with its fallback URLs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundTemplate {
    /// File name without extension
    pub name: String,
    pub full_name: String,
    /// Preview URL
    pub url: String,
    /// Candidates tried in order when applying
    pub urls: Vec<String>,
}

/// Result of applying a background
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedBackground {
    /// What was persisted: the serving URL and display name
    #[serde(flatten)]
    pub preference: BackgroundPreference,
    /// The fetched image as a `data:` URL, shown without another download
    pub src: String,
}

pub struct Backgrounds {
    transport: Arc<dyn Transport>,
    fetcher: Arc<ResilientFetcher>,
    preferences: Arc<PreferenceStore>,
    presenter: Arc<dyn Presenter>,
    endpoints: Vec<String>,
}

impl Backgrounds {
    pub fn new(
        transport: Arc<dyn Transport>,
        fetcher: Arc<ResilientFetcher>,
        preferences: Arc<PreferenceStore>,
        presenter: Arc<dyn Presenter>,
        endpoints: Vec<String>,
    ) -> Self {
        Self {
            transport,
            fetcher,
            preferences,
            presenter,
            endpoints,
        }
    }

    /// Fetch the template list, trying each listing endpoint in order
    ///
    /// Returns an empty list when every endpoint is blocked.
    pub async fn fetch_templates(&self) -> Vec<BackgroundTemplate> {
        for endpoint in &self.endpoints {
            let payload = match self.transport.get(endpoint).await {
                Ok(payload) => payload,
                Err(e) => {
                    log_warn!(MODULE, "Failed to fetch backgrounds from {}: {}", endpoint, e);
                    continue;
                }
            };

            match serde_json::from_slice::<Vec<serde_json::Value>>(&payload.body) {
                Ok(entries) => {
                    let templates = self.templates_from(entries);
                    log_info!(MODULE, "Found {} background templates", templates.len());
                    return templates;
                }
                Err(e) => {
                    log_warn!(MODULE, "Unexpected listing from {}: {}", endpoint, e);
                }
            }
        }

        log_error!(MODULE, "All background listing endpoints blocked");
        Vec::new()
    }

    fn templates_from(&self, entries: Vec<serde_json::Value>) -> Vec<BackgroundTemplate> {
        let registry = self.fetcher.registry();
        let repo = &registry.sources().backgrounds;

        entries
            .into_iter()
            .filter_map(|value| serde_json::from_value::<ContentsEntry>(value).ok())
            .filter(|entry| is_image_file(&entry.name))
            .filter_map(|entry| {
                let mut urls: Vec<String> = entry.download_url.into_iter().collect();
                for url in registry.urls_for(repo, &entry.name) {
                    if !urls.contains(&url) {
                        urls.push(url);
                    }
                }

                Some(BackgroundTemplate {
                    name: stem(&entry.name).to_string(),
                    url: urls.first()?.clone(),
                    full_name: entry.name,
                    urls,
                })
            })
            .collect()
    }

    /// Apply a background by loading the first candidate that serves an image
    ///
    /// The serving URL is persisted for later sessions; the fetched bytes are
    /// returned for immediate display.
    pub async fn apply(
        &self,
        urls: &[String],
        file_name: &str,
    ) -> Result<AppliedBackground, FetchError> {
        let resource = format!("background:{}", file_name);
        let result = self
            .fetcher
            .fetch_from(&resource, urls, Expect::Image, &CancellationToken::new())
            .await;

        match result {
            Ok(payload) => {
                let src = payload.data_url();
                let preference = BackgroundPreference {
                    image_url: payload.url,
                    display_name: file_name.to_string(),
                };
                if let Err(e) = self.preferences.save(&preference) {
                    log_warn!(MODULE, "Background applied but not saved: {}", e);
                }
                self.presenter
                    .toast(&format!("Background applied: {}", file_name));
                Ok(AppliedBackground { preference, src })
            }
            Err(e) => {
                self.presenter
                    .toast("Failed to load background - network restricted");
                Err(e)
            }
        }
    }

    /// Background saved in a previous session, if any
    pub fn restore(&self) -> Option<BackgroundPreference> {
        self.preferences.load()
    }
}

fn is_image_file(name: &str) -> bool {
    name.rsplit_once('.').is_some_and(|(_, ext)| {
        config::backgrounds::IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
    })
}

fn stem(name: &str) -> &str {
    name.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mirrors::PreferredMirrors;
    use crate::preferences::MemoryStore;
    use crate::testing::{test_registry, MockTransport, RecordingPresenter};

    const LISTING: &str = "https://api.test/contents/";

    struct Fixture {
        transport: Arc<MockTransport>,
        presenter: Arc<RecordingPresenter>,
        preferences: Arc<PreferenceStore>,
        backgrounds: Backgrounds,
    }

    fn fixture() -> Fixture {
        fixture_with(vec![LISTING.to_string()])
    }

    fn fixture_with(endpoints: Vec<String>) -> Fixture {
        let transport = MockTransport::new();
        let presenter = RecordingPresenter::new();
        let preferences = Arc::new(PreferenceStore::new(Arc::new(MemoryStore::new())));
        let fetcher = Arc::new(ResilientFetcher::new(
            transport.clone(),
            Arc::new(test_registry()),
            Arc::new(PreferredMirrors::new()),
        ));
        let backgrounds = Backgrounds::new(
            transport.clone(),
            fetcher,
            preferences.clone(),
            presenter.clone(),
            endpoints,
        );
        Fixture {
            transport,
            presenter,
            preferences,
            backgrounds,
        }
    }

    #[tokio::test]
    async fn test_templates_keep_images_only() {
        let f = fixture();
        f.transport.ok(
            LISTING,
            "application/json",
            r#"[
                {"name": "Space.PNG", "download_url": "https://raw.test/Space.PNG", "type": "file"},
                {"name": "README.md", "download_url": "https://raw.test/README.md", "type": "file"},
                {"name": "forest.webp", "download_url": null, "type": "file"},
                {"name": "nested", "type": "dir"}
            ]"#,
        );

        let templates = f.backgrounds.fetch_templates().await;

        assert_eq!(templates.len(), 2);
        assert_eq!(templates[0].name, "Space");
        assert_eq!(templates[0].full_name, "Space.PNG");
        assert_eq!(templates[0].url, "https://raw.test/Space.PNG");
        assert_eq!(templates[0].urls.len(), 5);
        assert_eq!(
            templates[0].urls[1],
            "https://m1.test/owner/backgrounds@main/Space.PNG"
        );
        assert_eq!(templates[1].urls.len(), 4);
        assert_eq!(templates[1].url, "https://m1.test/owner/backgrounds@main/forest.webp");
    }

    #[tokio::test]
    async fn test_falls_back_to_next_listing_endpoint() {
        let mirror_listing = "https://mirror-api.test/contents/";
        let f = fixture_with(vec![LISTING.to_string(), mirror_listing.to_string()]);
        f.transport.fail(LISTING, 403);
        f.transport.ok(
            mirror_listing,
            "application/json",
            r#"[{"name": "city.jpg", "download_url": "https://raw.test/city.jpg"}]"#,
        );

        let templates = f.backgrounds.fetch_templates().await;

        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].name, "city");
        assert_eq!(templates[0].url, "https://raw.test/city.jpg");
        assert_eq!(
            f.transport.get_urls(),
            vec![LISTING.to_string(), mirror_listing.to_string()]
        );
    }

    #[tokio::test]
    async fn test_blocked_listing_yields_empty() {
        let f = fixture();
        f.transport.fail(LISTING, 403);
        assert!(f.backgrounds.fetch_templates().await.is_empty());

        f.transport.ok(LISTING, "application/json", r#"{"message": "rate limited"}"#);
        assert!(f.backgrounds.fetch_templates().await.is_empty());
    }

    #[tokio::test]
    async fn test_apply_saves_first_loading_candidate() {
        let f = fixture();
        let urls = vec![
            "https://a.test/bg.png".to_string(),
            "https://b.test/bg.png".to_string(),
        ];
        f.transport.ok(&urls[1], "image/png", "png");

        let applied = f.backgrounds.apply(&urls, "bg.png").await.unwrap();

        assert_eq!(applied.preference.image_url, urls[1]);
        assert_eq!(applied.src, "data:image/png;base64,cG5n");
        assert_eq!(f.preferences.load(), Some(applied.preference));
        assert_eq!(
            f.transport.get_urls(),
            vec![urls[0].clone(), urls[1].clone()]
        );
        assert_eq!(f.presenter.toasts(), vec!["Background applied: bg.png".to_string()]);
        assert_eq!(f.backgrounds.restore().map(|p| p.image_url), Some(urls[1].clone()));
    }

    #[tokio::test]
    async fn test_apply_failure_notifies_and_keeps_previous() {
        let f = fixture();
        let previous = BackgroundPreference {
            image_url: "https://old.test/bg.png".to_string(),
            display_name: "old".to_string(),
        };
        f.preferences.save(&previous).unwrap();

        let urls = vec!["https://a.test/x.png".to_string()];
        let result = f.backgrounds.apply(&urls, "x.png").await;

        assert!(matches!(result, Err(FetchError::AllMirrorsExhausted { .. })));
        assert_eq!(
            f.presenter.toasts(),
            vec!["Failed to load background - network restricted".to_string()]
        );
        assert_eq!(f.preferences.load(), Some(previous));
    }

    #[test]
    fn test_image_extension_filter() {
        assert!(is_image_file("a.jpeg"));
        assert!(is_image_file("a.GIF"));
        assert!(!is_image_file("a.svg"));
        assert!(!is_image_file("png"));
    }
}

//! Application configuration and constants
//!
//! Centralizes all hard-coded values, mirror templates, and source repositories.
//! [`ArcadeConfig`] bundles the runtime-tunable parts so they can be injected.

use std::time::Duration;

use crate::mirrors::{Mirror, MirrorRegistry, RepoRef, Sources};

/// Application metadata
pub mod app {
    /// Application name used for cache directories
    pub const NAME: &str = "apex-arcade";

    /// Application display name
    pub const DISPLAY_NAME: &str = "Apex Arcade";

    /// User agent for HTTP requests
    pub const USER_AGENT: &str = "Apex-Arcade/1.0";
}

/// Source repositories served through the mirrors
pub mod sources {
    /// Account owning every source repository
    pub const OWNER: &str = "ProjectApex1243";

    /// Repository holding the game HTML documents
    pub const CONTENT_REPO: &str = "Unblockedweb";
    pub const CONTENT_BRANCH: &str = "master";

    /// Repository holding the cover images
    pub const COVER_REPO: &str = "Covers-for-web";
    pub const COVER_BRANCH: &str = "master";

    /// Repository holding background templates
    pub const BACKGROUND_REPO: &str = "Backrounds";
    pub const BACKGROUND_BRANCH: &str = "master";

    /// Known-to-exist file used to probe content mirrors
    pub const CONTENT_PROBE_FILE: &str = "bowmasters.html";

    /// Known-to-exist file used to probe cover mirrors
    pub const COVER_PROBE_FILE: &str = "bowmasters.png";
}

/// Built-in mirror templates, in priority order
///
/// Placeholders: `{owner}`, `{repo}`, `{branch}`. The relative path is appended.
pub mod mirrors {
    pub const BUILTIN: &[(&str, &str)] = &[
        ("jsDelivr", "https://cdn.jsdelivr.net/gh/{owner}/{repo}@{branch}"),
        ("Statically", "https://cdn.statically.io/gh/{owner}/{repo}@{branch}"),
        ("GitHack", "https://rawcdn.githack.com/{owner}/{repo}/{branch}"),
        ("RawGitHub", "https://raw.githubusercontent.com/{owner}/{repo}/{branch}"),
    ];
}

/// HTTP client settings
pub mod http {
    /// Reachability probe timeout per mirror (5 seconds)
    pub const PROBE_TIMEOUT_SECS: u64 = 5;

    /// Connection timeout in seconds
    pub const CONNECT_TIMEOUT_SECS: u64 = 15;

    /// Request timeout in seconds for full resource downloads
    pub const REQUEST_TIMEOUT_SECS: u64 = 60;

    /// Maximum redirects followed per request
    pub const MAX_REDIRECTS: usize = 10;
}

/// Content loader settings
pub mod loader {
    /// Reveal the display surface after this long even without a ready signal
    pub const READY_TIMEOUT_SECS: u64 = 8;

    /// URI scheme serving loaded game documents
    pub const DOCUMENT_SCHEME: &str = "game";
}

/// Generated cover placeholder settings
pub mod placeholder {
    pub const WIDTH: u32 = 160;
    pub const HEIGHT: u32 = 120;
    pub const FONT_SIZE: u32 = 48;

    /// Gradient start when the theme provides no `--accentDark`
    pub const DEFAULT_ACCENT_DARK: &str = "#cc0000";

    /// Gradient end when the theme provides no `--accent`
    pub const DEFAULT_ACCENT: &str = "#ff0000";

    /// Glyph drawn when the game has no display name
    pub const GENERIC_GLYPH: &str = "🎮";

    /// Class added to image targets showing a generated cover
    pub const MARKER_CLASS: &str = "placeholder-generated";
}

/// Persistent preference store settings
pub mod preferences {
    /// Store file managed by the store plugin
    pub const STORE_FILE: &str = "settings.json";

    pub const BACKGROUND_URL_KEY: &str = "customBackground";
    pub const BACKGROUND_NAME_KEY: &str = "customBackgroundName";
    pub const DEVELOPER_MODE_KEY: &str = "developer_mode";
}

/// Background template settings
pub mod backgrounds {
    /// Directory listing endpoints, tried in order
    pub const API_ENDPOINTS: &[&str] =
        &["https://api.github.com/repos/ProjectApex1243/Backrounds/contents/"];

    /// File extensions accepted as background images
    pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];
}

/// Runtime configuration for the arcade core
#[derive(Debug, Clone)]
pub struct ArcadeConfig {
    pub registry: MirrorRegistry,
    pub probe_timeout: Duration,
    pub ready_timeout: Duration,
    pub background_endpoints: Vec<String>,
}

impl Default for ArcadeConfig {
    fn default() -> Self {
        Self {
            registry: default_registry(),
            probe_timeout: Duration::from_secs(http::PROBE_TIMEOUT_SECS),
            ready_timeout: Duration::from_secs(loader::READY_TIMEOUT_SECS),
            background_endpoints: backgrounds::API_ENDPOINTS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Registry of the built-in mirrors bound to the project's repositories
pub fn default_registry() -> MirrorRegistry {
    let mirrors = mirrors::BUILTIN
        .iter()
        .enumerate()
        .map(|(i, (name, template))| Mirror::new(*name, i as u32 + 1, *template))
        .collect();

    MirrorRegistry::new(mirrors, default_sources())
}

/// Source repositories and probe files for each resource class
pub fn default_sources() -> Sources {
    Sources {
        content: RepoRef::new(sources::OWNER, sources::CONTENT_REPO, sources::CONTENT_BRANCH),
        covers: RepoRef::new(sources::OWNER, sources::COVER_REPO, sources::COVER_BRANCH),
        backgrounds: RepoRef::new(
            sources::OWNER,
            sources::BACKGROUND_REPO,
            sources::BACKGROUND_BRANCH,
        ),
        content_probe: sources::CONTENT_PROBE_FILE.to_string(),
        cover_probe: sources::COVER_PROBE_FILE.to_string(),
    }
}

//! Cover image loader
//!
//! Walks the cover candidates the way an image element would, awaiting each one in
//! turn, and falls back to a generated placeholder. Cover failures never reach the user.

use std::sync::Arc;

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::config;
use crate::fetch::{Expect, FetchError, ResilientFetcher};
use crate::mirrors::ResourceClass;
use crate::placeholder::{Placeholder, Theme};
use crate::{log_debug, log_info};

const MODULE: &str = "loader::cover";

/// Resolved image source for a cover target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CoverImage {
    /// A mirror served the real cover; `src` embeds the bytes it served
    Remote { src: String, url: String },
    /// Locally generated stand-in
    Placeholder {
        src: String,
        glyph: String,
        /// Class the presentation layer adds to mark a generated cover
        #[serde(rename = "markerClass")]
        marker_class: String,
    },
}

impl CoverImage {
    pub fn src(&self) -> &str {
        match self {
            CoverImage::Remote { src, .. } | CoverImage::Placeholder { src, .. } => src,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, CoverImage::Placeholder { .. })
    }
}

pub struct ImageLoader {
    fetcher: Arc<ResilientFetcher>,
}

impl ImageLoader {
    pub fn new(fetcher: Arc<ResilientFetcher>) -> Self {
        Self { fetcher }
    }

    /// Resolve a cover, trying every mirror before generating a placeholder
    pub async fn load_cover(
        &self,
        cover_file: &str,
        display_name: &str,
        theme: &Theme,
        cancel: &CancellationToken,
    ) -> CoverImage {
        if cover_file.trim().is_empty() {
            log_debug!(MODULE, "No cover file for '{}', using placeholder", display_name);
            return placeholder(display_name, theme);
        }

        match self
            .fetcher
            .fetch(ResourceClass::CoverImage, cover_file, Expect::Image, cancel)
            .await
        {
            Ok(payload) => CoverImage::Remote {
                src: payload.data_url(),
                url: payload.url,
            },
            Err(FetchError::AllMirrorsExhausted { .. }) => {
                log_info!(MODULE, "No mirror served {}, generating placeholder", cover_file);
                placeholder(display_name, theme)
            }
            Err(FetchError::Cancelled { .. }) => placeholder(display_name, theme),
        }
    }
}

fn placeholder(display_name: &str, theme: &Theme) -> CoverImage {
    let placeholder = Placeholder::render(display_name, theme);
    CoverImage::Placeholder {
        src: placeholder.data_url(),
        glyph: placeholder.glyph().to_string(),
        marker_class: config::placeholder::MARKER_CLASS.to_string(),
    }
}

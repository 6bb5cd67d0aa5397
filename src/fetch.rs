//! Resilient fetcher
//!
//! Retrieves a resource by walking its candidate URLs one at a time, preferred mirror
//! first, until one succeeds. Failed mirrors are not remembered across calls.

use std::fmt;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::mirrors::{MirrorRegistry, PreferredMirrors, ResourceClass};
use crate::transport::{Payload, Transport, TransportError};
use crate::{log_debug, log_info, log_warn};

const MODULE: &str = "fetch";

/// One failed candidate inside an exhausted fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedAttempt {
    pub url: String,
    pub error: TransportError,
}

impl fmt::Display for FailedAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.url, self.error)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Every candidate mirror failed for this resource
    #[error("all {} mirrors exhausted for {resource}", .attempts.len())]
    AllMirrorsExhausted {
        resource: String,
        attempts: Vec<FailedAttempt>,
    },
    /// A newer request superseded this one
    #[error("fetch of {resource} was cancelled")]
    Cancelled { resource: String },
}

/// What counts as a usable response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expect {
    /// Any 2xx response
    Any,
    /// A 2xx response an image element would render
    Image,
}

impl Expect {
    fn accept(self, payload: &Payload) -> Result<(), TransportError> {
        match self {
            Expect::Any => Ok(()),
            Expect::Image if payload.is_image() => Ok(()),
            Expect::Image => Err(TransportError::ContentType(
                payload.content_type.clone().unwrap_or_default(),
            )),
        }
    }
}

pub struct ResilientFetcher {
    transport: Arc<dyn Transport>,
    registry: Arc<MirrorRegistry>,
    preferred: Arc<PreferredMirrors>,
}

impl ResilientFetcher {
    pub fn new(
        transport: Arc<dyn Transport>,
        registry: Arc<MirrorRegistry>,
        preferred: Arc<PreferredMirrors>,
    ) -> Self {
        Self {
            transport,
            registry,
            preferred,
        }
    }

    pub fn registry(&self) -> &MirrorRegistry {
        &self.registry
    }

    /// Candidate URLs for a resource, preferred mirror first
    pub fn candidates(&self, class: ResourceClass, path: &str) -> Vec<String> {
        let preferred = self.preferred.get(class);
        self.registry.candidate_urls(class, path, preferred.as_ref())
    }

    /// Fetch a resource of a class through the mirrors
    pub async fn fetch(
        &self,
        class: ResourceClass,
        path: &str,
        expect: Expect,
        cancel: &CancellationToken,
    ) -> Result<Payload, FetchError> {
        let urls = self.candidates(class, path);
        let resource = format!("{}:{}", class, path);
        self.fetch_from(&resource, &urls, expect, cancel).await
    }

    /// Fetch a document and decode it as text, returning the serving URL and the text
    pub async fn fetch_text(
        &self,
        class: ResourceClass,
        path: &str,
        cancel: &CancellationToken,
    ) -> Result<(String, String), FetchError> {
        let payload = self.fetch(class, path, Expect::Any, cancel).await?;
        let text = payload.text();
        Ok((payload.url, text))
    }

    /// Try an explicit candidate list in order
    ///
    /// Attempts are strictly sequential; the next candidate is only tried after the
    /// previous one failed. No per-candidate retry.
    pub async fn fetch_from(
        &self,
        resource: &str,
        urls: &[String],
        expect: Expect,
        cancel: &CancellationToken,
    ) -> Result<Payload, FetchError> {
        let mut attempts = Vec::with_capacity(urls.len());

        for url in urls {
            if cancel.is_cancelled() {
                return Err(cancelled(resource));
            }

            log_debug!(MODULE, "Trying {} from {}", resource, url);

            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(cancelled(resource)),
                result = self.transport.get(url) => result,
            };

            match result.and_then(|payload| expect.accept(&payload).map(|()| payload)) {
                Ok(payload) => {
                    log_info!(MODULE, "Loaded {} from {}", resource, url);
                    return Ok(payload);
                }
                Err(error) => {
                    log_warn!(MODULE, "Mirror unreachable for {}: {} ({})", resource, url, error);
                    attempts.push(FailedAttempt {
                        url: url.clone(),
                        error,
                    });
                }
            }
        }

        log_warn!(
            MODULE,
            "All mirrors exhausted for {} after {} attempts",
            resource,
            attempts.len()
        );
        Err(FetchError::AllMirrorsExhausted {
            resource: resource.to_string(),
            attempts,
        })
    }
}

fn cancelled(resource: &str) -> FetchError {
    log_debug!(MODULE, "Fetch of {} cancelled", resource);
    FetchError::Cancelled {
        resource: resource.to_string(),
    }
}

//! Network boundary
//!
//! The [`Transport`] trait is the only way the core talks to mirrors: a lightweight
//! existence check for probing and a plain GET for fetching. Non-success statuses
//! are errors, never panics.

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::{header, Client};

use crate::utils::http::{create_fetch_client, create_probe_client};
use crate::log_debug;

const MODULE: &str = "transport";

/// A single failed attempt against one mirror URL
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP status {0}")]
    Status(u16),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected content type: {0}")]
    ContentType(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Network(format!("request timed out: {}", e))
        } else if let Some(status) = e.status() {
            TransportError::Status(status.as_u16())
        } else {
            TransportError::Network(e.to_string())
        }
    }
}

/// A successfully retrieved resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    /// URL that served the resource
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl Payload {
    /// Whether the payload is plausibly an image, as an image element would judge it
    ///
    /// A missing content type is accepted; an HTML error page is not.
    pub fn is_image(&self) -> bool {
        match self.content_type.as_deref() {
            None => true,
            Some(ct) => {
                let ct = ct.trim().to_ascii_lowercase();
                ct.starts_with("image/") || ct.starts_with("application/octet-stream")
            }
        }
    }

    /// Body decoded as text, replacing invalid UTF-8 sequences
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// The fetched body as a self-contained `data:` URL
    ///
    /// Media type parameters are dropped; a missing type is sent as octet-stream.
    pub fn data_url(&self) -> String {
        let mime = self
            .content_type
            .as_deref()
            .and_then(|ct| ct.split(';').next())
            .map(|ct| ct.trim().to_ascii_lowercase())
            .filter(|ct| !ct.is_empty())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        format!("data:{};base64,{}", mime, STANDARD.encode(&self.body))
    }
}

/// Requests against mirror-provided URLs
#[async_trait]
pub trait Transport: Send + Sync {
    /// Lightweight existence check bounded by `timeout`
    async fn check(&self, url: &str, timeout: Duration) -> Result<(), TransportError>;

    /// Retrieve a resource; any non-2xx status is an error
    async fn get(&self, url: &str) -> Result<Payload, TransportError>;
}

/// [`Transport`] backed by reqwest
#[derive(Debug, Clone)]
pub struct HttpTransport {
    probe_client: Client,
    fetch_client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, String> {
        Ok(Self {
            probe_client: create_probe_client()?,
            fetch_client: create_fetch_client()?,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn check(&self, url: &str, timeout: Duration) -> Result<(), TransportError> {
        log_debug!(MODULE, "HEAD {}", url);

        let response = self
            .probe_client
            .head(url)
            .header(header::CACHE_CONTROL, "no-cache")
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout(timeout)
                } else {
                    TransportError::from(e)
                }
            })?;

        if !response.status().is_success() {
            return Err(TransportError::Status(response.status().as_u16()));
        }
        Ok(())
    }

    async fn get(&self, url: &str) -> Result<Payload, TransportError> {
        log_debug!(MODULE, "GET {}", url);

        let response = self.fetch_client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let body = response.bytes().await?.to_vec();

        Ok(Payload {
            url: url.to_string(),
            status: status.as_u16(),
            content_type,
            body,
        })
    }
}

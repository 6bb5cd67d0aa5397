//! Locally-addressable game documents
//!
//! Fetched game HTML is kept in memory and served to the embedding surface through
//! the `game` URI scheme, so the surface never goes back to the network.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::config;

/// Handle of one stored document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(u64);

impl DocumentId {
    /// Parse the id from a request path such as `/17`
    pub fn from_path(path: &str) -> Option<Self> {
        path.trim_matches('/').parse().ok().map(DocumentId)
    }

    /// URL the webview uses to load this document
    pub fn url(&self) -> String {
        // Custom schemes are exposed as http://<scheme>.localhost on Windows webviews
        if cfg!(windows) {
            format!("http://{}.localhost/{}", config::loader::DOCUMENT_SCHEME, self.0)
        } else {
            format!("{}://localhost/{}", config::loader::DOCUMENT_SCHEME, self.0)
        }
    }
}

/// Shared store of in-memory documents; clones share the same storage
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    next_id: AtomicU64,
    documents: RwLock<HashMap<DocumentId, Arc<str>>>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, html: &str) -> DocumentId {
        let id = DocumentId(self.inner.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        self.inner
            .documents
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, Arc::from(html));
        id
    }

    pub fn get(&self, id: DocumentId) -> Option<Arc<str>> {
        self.inner
            .documents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    /// Drop a document; returns whether it was still stored
    pub fn release(&self, id: DocumentId) -> bool {
        self.inner
            .documents
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .is_some()
    }

    pub fn len(&self) -> usize {
        self.inner
            .documents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(feature = "desktop")]
pub mod protocol {
    //! `game://` URI scheme handler

    use tauri::http::{header, Request, Response, StatusCode};

    use super::{DocumentId, DocumentStore};
    use crate::log_warn;

    /// Answer a webview request for a stored document
    pub fn respond(store: &DocumentStore, request: &Request<Vec<u8>>) -> Response<Vec<u8>> {
        let path = request.uri().path();
        let document = DocumentId::from_path(path).and_then(|id| store.get(id));

        let built = match document {
            Some(html) => Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
                .body(html.as_bytes().to_vec()),
            None => {
                log_warn!("documents", "Unknown or released document: {}", path);
                Response::builder()
                    .status(StatusCode::NOT_FOUND)
                    .body(Vec::new())
            }
        };

        built.unwrap_or_else(|e| {
            log_warn!("documents", "Failed to build response: {}", e);
            Response::new(Vec::new())
        })
    }

    /// Answer requests arriving before the arcade is set up
    pub fn not_ready() -> Response<Vec<u8>> {
        let mut response = Response::new(Vec::new());
        *response.status_mut() = StatusCode::SERVICE_UNAVAILABLE;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_get_release() {
        let store = DocumentStore::new();
        let a = store.insert("<p>a</p>");
        let b = store.insert("<p>b</p>");

        assert_ne!(a, b);
        assert_eq!(store.get(a).as_deref(), Some("<p>a</p>"));
        assert_eq!(store.len(), 2);

        assert!(store.release(a));
        assert!(!store.release(a));
        assert!(store.get(a).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_clones_share_storage() {
        let store = DocumentStore::new();
        let clone = store.clone();
        let id = clone.insert("x");
        assert_eq!(store.get(id).as_deref(), Some("x"));
    }

    #[test]
    fn test_url_round_trips_through_path() {
        let store = DocumentStore::new();
        let id = store.insert("x");
        let url = id.url();
        let path = url.rsplit_once('/').map(|(_, p)| p).unwrap();

        assert!(url.contains("game"));
        assert_eq!(DocumentId::from_path(&format!("/{}", path)), Some(id));
        assert_eq!(DocumentId::from_path("/not-a-number"), None);
    }
}

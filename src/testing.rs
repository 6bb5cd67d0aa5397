//! Scripted test doubles shared by unit tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::mirrors::{Mirror, MirrorRegistry, RepoRef, Sources};
use crate::presenter::Presenter;
use crate::transport::{Payload, Transport, TransportError};

#[derive(Debug, Clone)]
pub enum Reply {
    Ok {
        content_type: Option<String>,
        body: Vec<u8>,
    },
    Status(u16),
    Hang,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Check(String),
    Get(String),
}

/// Transport answering from a URL table; unknown URLs answer 404
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<HashMap<String, Reply>>,
    calls: Mutex<Vec<Call>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, url: &str, reply: Reply) {
        self.replies.lock().unwrap().insert(url.to_string(), reply);
    }

    pub fn ok(&self, url: &str, content_type: &str, body: &str) {
        self.reply(
            url,
            Reply::Ok {
                content_type: Some(content_type.to_string()),
                body: body.as_bytes().to_vec(),
            },
        );
    }

    pub fn fail(&self, url: &str, status: u16) {
        self.reply(url, Reply::Status(status));
    }

    pub fn hang(&self, url: &str) {
        self.reply(url, Reply::Hang);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn get_urls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Get(url) => Some(url),
                Call::Check(_) => None,
            })
            .collect()
    }

    pub fn check_urls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Check(url) => Some(url),
                Call::Get(_) => None,
            })
            .collect()
    }

    fn lookup(&self, url: &str) -> Reply {
        self.replies
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .unwrap_or(Reply::Status(404))
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn check(&self, url: &str, _timeout: Duration) -> Result<(), TransportError> {
        self.calls.lock().unwrap().push(Call::Check(url.to_string()));
        match self.lookup(url) {
            Reply::Ok { .. } => Ok(()),
            Reply::Status(code) => Err(TransportError::Status(code)),
            Reply::Hang => std::future::pending().await,
        }
    }

    async fn get(&self, url: &str) -> Result<Payload, TransportError> {
        self.calls.lock().unwrap().push(Call::Get(url.to_string()));
        match self.lookup(url) {
            Reply::Ok { content_type, body } => Ok(Payload {
                url: url.to_string(),
                status: 200,
                content_type,
                body,
            }),
            Reply::Status(code) => Err(TransportError::Status(code)),
            Reply::Hang => std::future::pending().await,
        }
    }
}

/// Registry of four mirrors `m1.test` .. `m4.test`
pub fn test_registry() -> MirrorRegistry {
    let mirrors = (1..=4)
        .map(|i| {
            Mirror::new(
                &format!("m{}", i),
                i,
                &format!("https://m{}.test/{{owner}}/{{repo}}@{{branch}}", i),
            )
        })
        .collect();

    MirrorRegistry::new(
        mirrors,
        Sources {
            content: RepoRef::new("owner", "games", "main"),
            covers: RepoRef::new("owner", "covers", "main"),
            backgrounds: RepoRef::new("owner", "backgrounds", "main"),
            content_probe: "probe.html".to_string(),
            cover_probe: "probe.png".to_string(),
        },
    )
}

/// URL of a content file on test mirror `i`
pub fn content_url(i: u32, path: &str) -> String {
    format!("https://m{}.test/owner/games@main/{}", i, path)
}

/// URL of a cover file on test mirror `i`
pub fn cover_url(i: u32, path: &str) -> String {
    format!("https://m{}.test/owner/covers@main/{}", i, path)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shown {
    Loading(bool),
    Surface(bool),
    Document { title: String, src: String },
    Alert(String),
    Toast(String),
}

/// Presenter recording every call in order
#[derive(Default)]
pub struct RecordingPresenter {
    events: Mutex<Vec<Shown>>,
}

impl RecordingPresenter {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<Shown> {
        self.events.lock().unwrap().clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Shown::Alert(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    pub fn toasts(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Shown::Toast(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    fn push(&self, shown: Shown) {
        self.events.lock().unwrap().push(shown);
    }
}

impl Presenter for RecordingPresenter {
    fn set_loading(&self, visible: bool) {
        self.push(Shown::Loading(visible));
    }

    fn set_surface_visible(&self, visible: bool) {
        self.push(Shown::Surface(visible));
    }

    fn show_document(&self, title: &str, src: &str) {
        self.push(Shown::Document {
            title: title.to_string(),
            src: src.to_string(),
        });
    }

    fn alert(&self, message: &str) {
        self.push(Shown::Alert(message.to_string()));
    }

    fn toast(&self, message: &str) {
        self.push(Shown::Toast(message.to_string()));
    }
}

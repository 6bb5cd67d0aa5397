//! Game content loader
//!
//! Drives the `Idle -> Loading -> {Ready, Failed}` state machine for the single
//! embedding surface. A new load cancels the one in flight; stale completions are
//! discarded by generation.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::documents::{DocumentId, DocumentStore};
use crate::fetch::{FetchError, ResilientFetcher};
use crate::mirrors::ResourceClass;
use crate::presenter::Presenter;
use crate::{log_debug, log_error, log_info, log_warn};

const MODULE: &str = "loader::content";

/// User-visible state of the embedding surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum LoadState {
    Idle,
    /// `src` is set once the document is assigned and the surface is rendering it
    Loading { title: String, src: Option<String> },
    Ready { title: String, src: String },
    Failed { title: String, message: String },
}

struct Session {
    state: LoadState,
    generation: u64,
    cancel: Option<CancellationToken>,
    document: Option<DocumentId>,
}

struct Shared {
    fetcher: Arc<ResilientFetcher>,
    presenter: Arc<dyn Presenter>,
    documents: DocumentStore,
    ready_timeout: Duration,
    session: Mutex<Session>,
}

impl Shared {
    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Show the surface for `generation` if it is still rendering
    fn reveal(&self, generation: u64, reason: &str) -> bool {
        {
            let mut session = self.session();
            if session.generation != generation {
                return false;
            }
            let ready = match &session.state {
                LoadState::Loading {
                    title,
                    src: Some(src),
                } => LoadState::Ready {
                    title: title.clone(),
                    src: src.clone(),
                },
                _ => return false,
            };

            if let LoadState::Ready { title, .. } = &ready {
                log_info!(MODULE, "Game ready ({}): {}", reason, title);
            }
            session.state = ready;
        }

        self.presenter.set_loading(false);
        self.presenter.set_surface_visible(true);
        true
    }
}

/// Loads game documents into the embedding surface
#[derive(Clone)]
pub struct ContentLoader {
    shared: Arc<Shared>,
}

impl ContentLoader {
    pub fn new(
        fetcher: Arc<ResilientFetcher>,
        presenter: Arc<dyn Presenter>,
        documents: DocumentStore,
        ready_timeout: Duration,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                fetcher,
                presenter,
                documents,
                ready_timeout,
                session: Mutex::new(Session {
                    state: LoadState::Idle,
                    generation: 0,
                    cancel: None,
                    document: None,
                }),
            }),
        }
    }

    pub fn state(&self) -> LoadState {
        self.shared.session().state.clone()
    }

    /// Fetch a game's HTML through the mirrors and hand it to the surface
    ///
    /// Returns the state this load left behind, or the current state if a newer
    /// load superseded it.
    pub async fn load_game(&self, content_file: &str, title: &str) -> LoadState {
        if content_file.trim().is_empty() {
            log_warn!(MODULE, "Ignoring load of '{}' without a content file", title);
            return self.state();
        }

        log_info!(MODULE, "Loading game: {} ({})", title, content_file);
        let (generation, cancel) = self.begin(title);

        let result = self
            .shared
            .fetcher
            .fetch_text(ResourceClass::GameContent, content_file, &cancel)
            .await;

        self.finish(generation, title, result)
    }

    /// Signal from the surface that the document rendered
    pub fn surface_ready(&self) -> bool {
        let generation = self.shared.session().generation;
        self.shared.reveal(generation, "ready signal")
    }

    /// Signal from the surface that rendering failed; the surface is revealed anyway
    pub fn surface_error(&self, detail: &str) -> bool {
        log_warn!(MODULE, "Surface reported an error: {}", detail);
        let generation = self.shared.session().generation;
        self.shared.reveal(generation, "error signal")
    }

    /// Abandon the load in flight or close the shown game, returning to idle
    pub fn cancel(&self) {
        let released = {
            let mut session = self.shared.session();
            session.generation += 1;
            if let Some(token) = session.cancel.take() {
                token.cancel();
            }
            session.state = LoadState::Idle;
            session.document.take()
        };

        if let Some(id) = released {
            self.shared.documents.release(id);
        }
        self.shared.presenter.set_loading(false);
        self.shared.presenter.set_surface_visible(false);
    }

    fn begin(&self, title: &str) -> (u64, CancellationToken) {
        let token = CancellationToken::new();
        let generation = {
            let mut session = self.shared.session();
            session.generation += 1;
            if let Some(previous) = session.cancel.replace(token.clone()) {
                previous.cancel();
            }
            session.state = LoadState::Loading {
                title: title.to_string(),
                src: None,
            };
            session.generation
        };

        self.shared.presenter.set_loading(true);
        self.shared.presenter.set_surface_visible(false);
        (generation, token)
    }

    fn finish(
        &self,
        generation: u64,
        title: &str,
        result: Result<(String, String), FetchError>,
    ) -> LoadState {
        let mut session = self.shared.session();
        if session.generation != generation {
            log_debug!(MODULE, "Discarding superseded load of {}", title);
            return session.state.clone();
        }
        session.cancel = None;

        if let Some(previous) = session.document.take() {
            self.shared.documents.release(previous);
        }

        match result {
            Ok((url, html)) => {
                let id = self.shared.documents.insert(&html);
                let src = id.url();
                log_info!(MODULE, "Game loaded from {} as {}", url, src);

                session.document = Some(id);
                session.state = LoadState::Loading {
                    title: title.to_string(),
                    src: Some(src.clone()),
                };
                let state = session.state.clone();
                drop(session);

                self.shared.presenter.show_document(title, &src);
                self.arm_ready_timeout(generation);
                state
            }
            Err(FetchError::Cancelled { .. }) => session.state.clone(),
            Err(e @ FetchError::AllMirrorsExhausted { .. }) => {
                log_error!(MODULE, "Unable to load {}: {}", title, e);
                if let FetchError::AllMirrorsExhausted { attempts, .. } = &e {
                    for attempt in attempts {
                        log_debug!(MODULE, "  {}", attempt);
                    }
                }

                let message = self.failure_message(title);
                session.state = LoadState::Failed {
                    title: title.to_string(),
                    message: message.clone(),
                };
                let state = session.state.clone();
                drop(session);

                self.shared.presenter.set_loading(false);
                self.shared.presenter.alert(&message);
                state
            }
        }
    }

    fn arm_ready_timeout(&self, generation: u64) {
        let shared = self.shared.clone();
        tokio::spawn(async move {
            tokio::time::sleep(shared.ready_timeout).await;
            shared.reveal(generation, "timeout");
        });
    }

    fn failure_message(&self, title: &str) -> String {
        let host = self
            .shared
            .fetcher
            .registry()
            .primary()
            .map(|m| m.host().to_string())
            .unwrap_or_else(|| "the content mirrors".to_string());

        format!(
            "Unable to load \"{}\". Your network may be blocking game content.\n\n\
             Try:\n\
             • Using mobile data\n\
             • A different network\n\
             • Asking your network administrator to unblock {}",
            title, host
        )
    }
}

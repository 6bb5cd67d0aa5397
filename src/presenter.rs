//! Presentation boundary
//!
//! The core never touches the page directly; it drives a [`Presenter`] that owns
//! the loading indicator, the embedding surface, alerts and toasts.

use serde::Serialize;

/// Name of the event carrying [`UiEvent`]s to the webview
pub const UI_EVENT: &str = "arcade://ui";

/// Event carrying the probe report once mirror selection finishes
pub const MIRRORS_EVENT: &str = "arcade://mirrors";

/// Sink for user-visible state changes
pub trait Presenter: Send + Sync {
    fn set_loading(&self, visible: bool);
    fn set_surface_visible(&self, visible: bool);
    /// Point the embedding surface at a locally-addressable document
    fn show_document(&self, title: &str, src: &str);
    /// Blocking, user-facing error
    fn alert(&self, message: &str);
    /// Transient notification
    fn toast(&self, message: &str);
}

/// Wire form of presenter calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum UiEvent {
    Loading { visible: bool },
    Surface { visible: bool },
    Document { title: String, src: String },
    Alert { message: String },
    Toast { message: String },
}

#[cfg(feature = "desktop")]
pub use desktop::EventPresenter;

#[cfg(feature = "desktop")]
mod desktop {
    use tauri::{AppHandle, Emitter};

    use super::{Presenter, UiEvent, UI_EVENT};
    use crate::log_warn;

    /// [`Presenter`] forwarding every call to the webview as a Tauri event
    pub struct EventPresenter {
        app: AppHandle,
    }

    impl EventPresenter {
        pub fn new(app: AppHandle) -> Self {
            Self { app }
        }

        fn send(&self, event: UiEvent) {
            if let Err(e) = self.app.emit(UI_EVENT, &event) {
                log_warn!("presenter", "Failed to emit {:?}: {}", event, e);
            }
        }
    }

    impl Presenter for EventPresenter {
        fn set_loading(&self, visible: bool) {
            self.send(UiEvent::Loading { visible });
        }

        fn set_surface_visible(&self, visible: bool) {
            self.send(UiEvent::Surface { visible });
        }

        fn show_document(&self, title: &str, src: &str) {
            self.send(UiEvent::Document {
                title: title.to_string(),
                src: src.to_string(),
            });
        }

        fn alert(&self, message: &str) {
            self.send(UiEvent::Alert {
                message: message.to_string(),
            });
        }

        fn toast(&self, message: &str) {
            self.send(UiEvent::Toast {
                message: message.to_string(),
            });
        }
    }
}

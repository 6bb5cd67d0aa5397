//! Apex Arcade - game catalog with mirror probing and resilient content loading
//!
//! Game documents, covers and backgrounds live in public repositories served by
//! several CDN mirrors, any of which may be blocked on a restrictive network. The
//! core probes the mirrors, remembers the first reachable one per resource class,
//! and falls back across the rest on every fetch.

pub mod logging;

pub mod arcade;
pub mod backgrounds;
pub mod catalog;
pub mod config;
pub mod documents;
pub mod fetch;
pub mod loader;
pub mod mirrors;
pub mod placeholder;
pub mod preferences;
pub mod presenter;
pub mod probe;
pub mod transport;
pub mod utils;

#[cfg(feature = "desktop")]
mod commands;

#[cfg(test)]
mod testing;

#[cfg(feature = "desktop")]
pub use desktop::run;

#[cfg(feature = "desktop")]
mod desktop {
    use std::sync::Arc;

    use tauri::{Emitter, Manager};
    use tauri_plugin_store::StoreExt;

    use crate::arcade::Arcade;
    use crate::catalog::Catalog;
    use crate::commands::{self, AppState};
    use crate::config::{self, ArcadeConfig};
    use crate::preferences::{KeyValueStore, MemoryStore, PluginStore};
    use crate::presenter::{EventPresenter, MIRRORS_EVENT};
    use crate::transport::HttpTransport;
    use crate::{documents, logging, log_error, log_info, log_warn};

    const MODULE: &str = "main";

    /// Apply the saved developer mode to the log level
    fn init_log_level(app: &tauri::App) {
        match app.store(config::preferences::STORE_FILE) {
            Ok(store) => {
                let developer_mode = store
                    .get(config::preferences::DEVELOPER_MODE_KEY)
                    .and_then(|v| v.as_bool())
                    .unwrap_or(false);

                if developer_mode {
                    log_info!(MODULE, "Developer mode enabled, setting log level to DEBUG");
                    logging::set_log_level(true);
                }
            }
            Err(e) => {
                log_warn!(
                    MODULE,
                    "Failed to access settings store: {}. Using default log level (INFO).",
                    e
                );
            }
        }
    }

    fn preference_store(app: &tauri::App) -> Arc<dyn KeyValueStore> {
        match app.store(config::preferences::STORE_FILE) {
            Ok(_) => Arc::new(PluginStore::new(app.handle().clone())),
            Err(e) => {
                log_warn!(
                    MODULE,
                    "Settings store unavailable ({}); background choice will not persist",
                    e
                );
                Arc::new(MemoryStore::new())
            }
        }
    }

    /// Start the desktop shell
    pub fn run() {
        logging::init();

        log_info!(MODULE, "=== {} Starting ===", config::app::DISPLAY_NAME);
        log_info!(MODULE, "Version: {}", env!("CARGO_PKG_VERSION"));
        log_info!(
            MODULE,
            "OS: {} {}",
            std::env::consts::OS,
            std::env::consts::ARCH
        );

        tauri::Builder::default()
            .plugin(tauri_plugin_store::Builder::new().build())
            .register_uri_scheme_protocol(config::loader::DOCUMENT_SCHEME, |ctx, request| {
                match ctx.app_handle().try_state::<AppState>() {
                    Some(state) => documents::protocol::respond(state.arcade.documents(), &request),
                    None => documents::protocol::not_ready(),
                }
            })
            .setup(|app| {
                init_log_level(app);

                let transport = HttpTransport::new()?;
                let arcade = Arc::new(Arcade::new(
                    ArcadeConfig::default(),
                    Catalog::bundled(),
                    Arc::new(transport),
                    Arc::new(EventPresenter::new(app.handle().clone())),
                    preference_store(app),
                ));
                app.manage(AppState::new(arcade.clone()));

                let handle = app.handle().clone();
                tauri::async_runtime::spawn(async move {
                    let report = arcade.initialize().await;
                    if let Err(e) = handle.emit(MIRRORS_EVENT, &report) {
                        log_error!(MODULE, "Failed to announce mirror choice: {}", e);
                    }
                });

                Ok(())
            })
            .invoke_handler(tauri::generate_handler![
                commands::games::get_games,
                commands::games::get_featured_games,
                commands::games::load_game,
                commands::games::close_game,
                commands::games::notify_frame_ready,
                commands::games::notify_frame_error,
                commands::games::get_load_state,
                commands::covers::load_cover,
                commands::system::get_mirror_status,
                commands::system::reprobe_mirrors,
                commands::system::log_from_frontend,
                commands::system::get_developer_mode,
                commands::system::set_developer_mode,
                commands::backgrounds::get_background_templates,
                commands::backgrounds::apply_background,
                commands::backgrounds::get_saved_background,
            ])
            .run(tauri::generate_context!())
            .expect("error while running tauri application");
    }
}

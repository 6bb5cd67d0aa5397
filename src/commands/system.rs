//! Mirror status, logging and developer settings commands

use tauri::State;
use tauri_plugin_store::StoreExt;

use super::state::AppState;
use crate::arcade::{MirrorStatus, ProbeReport};
use crate::config::preferences::{DEVELOPER_MODE_KEY, STORE_FILE};
use crate::logging::{self, LogLevel};
use crate::log_info;

const MODULE: &str = "commands::system";

#[tauri::command]
pub fn get_mirror_status(state: State<'_, AppState>) -> Vec<MirrorStatus> {
    state.arcade.mirror_status()
}

/// Discard the chosen mirrors and probe again
#[tauri::command]
pub async fn reprobe_mirrors(state: State<'_, AppState>) -> Result<ProbeReport, String> {
    log_info!(MODULE, "Re-probing mirrors on request");
    Ok(state.arcade.reprobe().await)
}

/// Log a message from the frontend at the given level (INFO when absent)
#[tauri::command]
pub fn log_from_frontend(module: String, message: String, level: Option<String>) {
    let level = level.as_deref().map(LogLevel::parse).unwrap_or(LogLevel::Info);
    logging::log(level, &format!("frontend::{}", module), &message);
}

#[tauri::command]
pub fn get_developer_mode(app: tauri::AppHandle) -> bool {
    match app.store(STORE_FILE) {
        Ok(store) => store
            .get(DEVELOPER_MODE_KEY)
            .and_then(|v| v.as_bool())
            .unwrap_or(false),
        Err(e) => {
            log_info!(MODULE, "Error loading store, developer mode off: {}", e);
            false
        }
    }
}

/// Toggle developer mode, switching DEBUG logging with it
#[tauri::command]
pub fn set_developer_mode(enabled: bool, app: tauri::AppHandle) -> Result<(), String> {
    log_info!(MODULE, "Setting developer_mode to: {}", enabled);
    logging::set_log_level(enabled);

    let store = app
        .store(STORE_FILE)
        .map_err(|e| format!("Failed to access store: {}", e))?;
    store.set(DEVELOPER_MODE_KEY, enabled);
    store
        .save()
        .map_err(|e| format!("Failed to save store: {}", e))
}

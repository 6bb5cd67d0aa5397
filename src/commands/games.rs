//! Catalog and game loading commands

use tauri::State;

use super::state::AppState;
use crate::catalog::GameView;
use crate::loader::LoadState;
use crate::log_debug;

const MODULE: &str = "commands::games";

/// Loadable games with their current cover URLs
#[tauri::command]
pub fn get_games(state: State<'_, AppState>) -> Vec<GameView> {
    state.arcade.games()
}

#[tauri::command]
pub fn get_featured_games(state: State<'_, AppState>) -> Vec<GameView> {
    state.arcade.featured_games()
}

/// Fetch a game through the mirrors and point the surface at it
#[tauri::command]
pub async fn load_game(id: u32, state: State<'_, AppState>) -> Result<LoadState, String> {
    state.arcade.load_game(id).await
}

/// Close the shown game, or abandon the one still loading
#[tauri::command]
pub fn close_game(state: State<'_, AppState>) {
    state.arcade.close_game();
}

/// The embedding surface finished rendering
#[tauri::command]
pub fn notify_frame_ready(state: State<'_, AppState>) -> bool {
    state.arcade.content().surface_ready()
}

/// The embedding surface failed to render; it is shown anyway
#[tauri::command]
pub fn notify_frame_error(detail: String, state: State<'_, AppState>) -> bool {
    state.arcade.content().surface_error(&detail)
}

#[tauri::command]
pub fn get_load_state(state: State<'_, AppState>) -> LoadState {
    let current = state.arcade.content().state();
    log_debug!(MODULE, "Load state: {:?}", current);
    current
}

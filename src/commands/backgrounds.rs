//! Background template commands

use tauri::State;

use super::state::AppState;
use crate::backgrounds::{AppliedBackground, BackgroundTemplate};
use crate::preferences::BackgroundPreference;

#[tauri::command]
pub async fn get_background_templates(
    state: State<'_, AppState>,
) -> Result<Vec<BackgroundTemplate>, String> {
    Ok(state.arcade.backgrounds().fetch_templates().await)
}

/// Apply the first candidate URL that loads as an image and remember it
#[tauri::command]
pub async fn apply_background(
    urls: Vec<String>,
    file_name: String,
    state: State<'_, AppState>,
) -> Result<AppliedBackground, String> {
    state
        .arcade
        .backgrounds()
        .apply(&urls, &file_name)
        .await
        .map_err(|e| e.to_string())
}

/// Background chosen in a previous session
#[tauri::command]
pub fn get_saved_background(state: State<'_, AppState>) -> Option<BackgroundPreference> {
    state.arcade.backgrounds().restore()
}

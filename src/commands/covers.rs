//! Cover image command

use tauri::State;

use super::state::AppState;
use crate::loader::CoverImage;
use crate::placeholder::Theme;

/// Resolve a game's cover, generating a placeholder if every mirror fails
///
/// `theme` carries the page's accent colors; missing or unusable colors fall back
/// to the defaults.
#[tauri::command]
pub async fn load_cover(
    id: u32,
    theme: Option<Theme>,
    state: State<'_, AppState>,
) -> Result<CoverImage, String> {
    let theme = theme.unwrap_or_default();
    state.arcade.load_cover(id, &theme).await
}

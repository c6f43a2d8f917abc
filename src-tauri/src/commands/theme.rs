use std::sync::Arc;

use folio::models::ApiResult;
use folio::organizer::Organizer;
use tauri::State;

/// Returns the current theme with the toggle button's icon and label.
#[tauri::command]
pub async fn get_theme(organizer: State<'_, Arc<Organizer>>) -> Result<ApiResult, String> {
    Ok(ApiResult::with_theme(organizer.theme()))
}

/// Flips between light and dark and persists the choice.
#[tauri::command]
pub async fn toggle_theme(organizer: State<'_, Arc<Organizer>>) -> Result<ApiResult, String> {
    Ok(ApiResult::with_theme(organizer.toggle_theme()))
}

use std::sync::Arc;

use folio::models::ApiResult;
use folio::organizer::Organizer;
use tauri::{AppHandle, State};
use tauri_plugin_opener::OpenerExt;

/// Renders the folder list with the current filter and open folders.
#[tauri::command]
pub async fn render_folders(organizer: State<'_, Arc<Organizer>>) -> Result<ApiResult, String> {
    Ok(ApiResult::with_html(organizer.render()))
}

/// Sets the case-insensitive folder name filter.
#[tauri::command]
pub async fn set_filter(
    query: String,
    organizer: State<'_, Arc<Organizer>>,
) -> Result<ApiResult, String> {
    Ok(ApiResult::with_html(organizer.set_filter(&query)))
}

/// Opens or closes a folder's content.
#[tauri::command]
pub async fn toggle_folder(
    folder_id: String,
    organizer: State<'_, Arc<Organizer>>,
) -> Result<ApiResult, String> {
    Ok(ApiResult::with_html(organizer.toggle_folder(&folder_id)))
}

/// Opens a stored link in the system browser.
#[tauri::command]
pub async fn open_link(url: String, app: AppHandle) -> Result<ApiResult, String> {
    match app.opener().open_url(url, None::<&str>) {
        Ok(()) => Ok(ApiResult::success()),
        Err(e) => Ok(ApiResult::error(format!("Failed to open link: {}", e))),
    }
}

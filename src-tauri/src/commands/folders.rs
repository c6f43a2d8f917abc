use std::sync::Arc;

use folio::models::ApiResult;
use folio::organizer::Organizer;
use tauri::State;

/// Creates a folder named `name`.
///
/// Blank names raise a native alert and nothing is created. Runs on a
/// blocking thread because the alert waits for the user.
#[tauri::command]
pub async fn create_folder(
    name: String,
    organizer: State<'_, Arc<Organizer>>,
) -> Result<ApiResult, String> {
    let organizer = Arc::clone(&organizer);
    let created = tauri::async_runtime::spawn_blocking(move || organizer.create_folder(&name))
        .await
        .map_err(|e| format!("Folder task failed: {}", e))?;

    match created {
        Some(folder) => Ok(ApiResult::with_folder_id(folder.id)),
        None => Ok(ApiResult::error("Folder was not created")),
    }
}

/// Deletes a folder after a native OK/Cancel confirmation.
#[tauri::command]
pub async fn delete_folder(
    folder_id: String,
    organizer: State<'_, Arc<Organizer>>,
) -> Result<ApiResult, String> {
    let organizer = Arc::clone(&organizer);
    let removed = tauri::async_runtime::spawn_blocking(move || organizer.delete_folder(&folder_id))
        .await
        .map_err(|e| format!("Folder task failed: {}", e))?;

    if removed {
        Ok(ApiResult::success())
    } else {
        Ok(ApiResult::error("Folder was not deleted"))
    }
}

use std::path::PathBuf;
use std::sync::Arc;

use folio::models::ApiResult;
use folio::organizer::Organizer;
use tauri::{AppHandle, State};

use crate::dialogs;

/// Appends a link to a folder. Blank input raises a native alert.
#[tauri::command]
pub async fn add_link(
    folder_id: String,
    url: String,
    organizer: State<'_, Arc<Organizer>>,
) -> Result<ApiResult, String> {
    let organizer = Arc::clone(&organizer);
    let added = tauri::async_runtime::spawn_blocking(move || organizer.add_link(&folder_id, &url))
        .await
        .map_err(|e| format!("Link task failed: {}", e))?;

    if added {
        Ok(ApiResult::success())
    } else {
        Ok(ApiResult::error("Link was not added"))
    }
}

/// Appends a note to a folder. Blank input raises a native alert.
#[tauri::command]
pub async fn add_note(
    folder_id: String,
    text: String,
    organizer: State<'_, Arc<Organizer>>,
) -> Result<ApiResult, String> {
    let organizer = Arc::clone(&organizer);
    let added = tauri::async_runtime::spawn_blocking(move || organizer.add_note(&folder_id, &text))
        .await
        .map_err(|e| format!("Note task failed: {}", e))?;

    if added {
        Ok(ApiResult::success())
    } else {
        Ok(ApiResult::error("Note was not added"))
    }
}

/// Decodes and appends photos from local paths, e.g. files dropped on a folder.
///
/// Each photo is persisted and rendered as soon as its decode completes.
#[tauri::command]
pub async fn add_photos(
    folder_id: String,
    paths: Vec<String>,
    organizer: State<'_, Arc<Organizer>>,
) -> Result<ApiResult, String> {
    let paths: Vec<PathBuf> = paths.into_iter().map(PathBuf::from).collect();
    let added = organizer.add_photos(&folder_id, paths).await;
    log::debug!("Added {} photo(s) to {}", added, folder_id);
    Ok(ApiResult::with_folder_id(folder_id))
}

/// Opens the native image picker, then decodes and appends the selection.
#[tauri::command]
pub async fn pick_photos(
    folder_id: String,
    app: AppHandle,
    organizer: State<'_, Arc<Organizer>>,
) -> Result<ApiResult, String> {
    let paths = tauri::async_runtime::spawn_blocking(move || dialogs::pick_image_files(&app))
        .await
        .map_err(|e| format!("Dialog task failed: {}", e))?;

    let added = organizer.add_photos(&folder_id, paths).await;
    log::debug!("Added {} picked photo(s) to {}", added, folder_id);
    Ok(ApiResult::with_folder_id(folder_id))
}

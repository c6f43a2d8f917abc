use std::sync::Arc;

use folio::config::ConfigManager;
use folio::models::Config;
use tauri::State;

/// Returns the current application configuration.
#[tauri::command]
pub async fn get_config(config: State<'_, Arc<ConfigManager>>) -> Result<Config, String> {
    Ok(config.get())
}

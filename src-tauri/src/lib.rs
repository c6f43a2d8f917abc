use std::sync::Arc;

use folio::config::ConfigManager;
use folio::organizer::Organizer;
use folio::store::FileStore;
use tauri::{Emitter, Manager, WindowEvent};

pub mod commands;
pub mod dialogs;
pub mod window;

/// Event carrying the re-rendered folder markup
pub const RENDER_EVENT: &str = "folders-rendered";

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(|app, _args, _cwd| {
            // Focus the main window when a second instance is launched
            if let Some(window) = app.get_webview_window("main") {
                let _ = window.set_focus();
                let _ = window.unminimize();
            }
        }))
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_dialog::init())
        .setup(|app| {
            let store = FileStore::new()?;
            store.ensure_directories()?;

            let config_path = store.base_dir.join("config.json");
            let (config, config_error) = match ConfigManager::new(config_path.clone()) {
                Ok(config) => (config, None),
                Err(e) => (ConfigManager::with_defaults(config_path), Some(e)),
            };
            folio::init_logging(&config.get().log_level);
            if let Some(e) = config_error {
                log::warn!("Using default configuration: {}", e);
            }
            log::info!("Data directory: {}", store.base_dir.display());

            let handle = app.handle().clone();
            let emitter = app.handle().clone();
            let organizer = Organizer::new(
                Arc::new(store),
                Arc::new(dialogs::DialogPrompter::new(handle)),
                Arc::new(move |html: String| {
                    if let Err(e) = emitter.emit(RENDER_EVENT, html) {
                        log::error!("Failed to emit {}: {}", RENDER_EVENT, e);
                    }
                }),
            )
            .with_max_photo_bytes(config.max_photo_bytes());

            if let Some(main) = app.get_webview_window("main") {
                window::restore_bounds(&main, config.get_window_bounds());
            }

            app.manage(Arc::new(organizer));
            app.manage(Arc::new(config));
            Ok(())
        })
        .on_window_event(|window, event| {
            if !matches!(event, WindowEvent::Resized(_) | WindowEvent::Moved(_)) {
                return;
            }
            let Some(config) = window.try_state::<Arc<ConfigManager>>() else {
                return;
            };
            let config = Arc::clone(config.inner());
            let bounds = match crate::window::current_bounds(window) {
                Ok(bounds) => bounds,
                Err(e) => {
                    log::warn!("{}", e);
                    return;
                }
            };
            tauri::async_runtime::spawn(async move {
                config.update_and_save(|c| c.window_bounds = bounds).await;
            });
        })
        .invoke_handler(tauri::generate_handler![
            commands::create_folder,
            commands::delete_folder,
            commands::add_link,
            commands::add_note,
            commands::add_photos,
            commands::pick_photos,
            commands::render_folders,
            commands::set_filter,
            commands::toggle_folder,
            commands::open_link,
            commands::get_theme,
            commands::toggle_theme,
            commands::get_config,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}

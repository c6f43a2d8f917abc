use std::path::PathBuf;

use folio::organizer::Prompter;
use tauri::{AppHandle, Runtime};
use tauri_plugin_dialog::{DialogExt, MessageDialogButtons, MessageDialogKind};

const DIALOG_TITLE: &str = "Folio";

/// Extensions offered by the photo picker
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp", "svg"];

/// Native blocking dialogs.
///
/// Every method blocks until the user answers, so callers must stay off
/// the main thread.
pub struct DialogPrompter<R: Runtime> {
    app: AppHandle<R>,
}

impl<R: Runtime> DialogPrompter<R> {
    pub fn new(app: AppHandle<R>) -> Self {
        Self { app }
    }
}

impl<R: Runtime> Prompter for DialogPrompter<R> {
    fn alert(&self, message: &str) {
        self.app
            .dialog()
            .message(message)
            .title(DIALOG_TITLE)
            .kind(MessageDialogKind::Warning)
            .blocking_show();
    }

    fn confirm(&self, message: &str) -> bool {
        self.app
            .dialog()
            .message(message)
            .title(DIALOG_TITLE)
            .kind(MessageDialogKind::Warning)
            .buttons(MessageDialogButtons::OkCancel)
            .blocking_show()
    }
}

/// Opens the native multi-file image picker.
///
/// Returns an empty list when the picker is cancelled.
pub fn pick_image_files<R: Runtime>(app: &AppHandle<R>) -> Vec<PathBuf> {
    let picked = app
        .dialog()
        .file()
        .set_title("Add photos")
        .add_filter("Images", IMAGE_EXTENSIONS)
        .blocking_pick_files();

    picked
        .unwrap_or_default()
        .into_iter()
        .filter_map(|file| match file.into_path() {
            Ok(path) => Some(path),
            Err(e) => {
                log::warn!("Ignoring picked file without a local path: {}", e);
                None
            }
        })
        .collect()
}

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::folders::FolderManager;
use crate::models::{Folder, RootState, DEFAULT_MAX_PHOTO_BYTES};
use crate::photos;
use crate::render::{self, ViewState};
use crate::store::KeyValueStore;
use crate::theme::{Theme, ThemeManager};

pub const DELETE_CONFIRM_MESSAGE: &str = "Are you sure you want to delete this folder?";

/// Blocking user prompts supplied by the host surface.
pub trait Prompter: Send + Sync {
    /// Shows a message and returns once it is dismissed.
    fn alert(&self, message: &str);

    /// Asks a yes/no question. Returns `true` only on explicit confirmation.
    fn confirm(&self, message: &str) -> bool;
}

/// Receives the full markup after every re-render.
pub type RenderSink = Arc<dyn Fn(String) + Send + Sync>;

/// Organizer ties the folders document, the view and the theme together.
///
/// Every user action follows the same path: validate, alert and stop on
/// bad input, mutate, persist, then rebuild the whole view and hand it to
/// the render sink.
pub struct Organizer {
    folders: FolderManager,
    theme: ThemeManager,
    view: Mutex<ViewState>,
    prompter: Arc<dyn Prompter>,
    on_render: RenderSink,
    max_photo_bytes: u64,
}

impl Organizer {
    /// Loads the folders document and theme preference from `store`.
    pub fn new(store: Arc<dyn KeyValueStore>, prompter: Arc<dyn Prompter>, on_render: RenderSink) -> Self {
        Self {
            folders: FolderManager::load(Arc::clone(&store)),
            theme: ThemeManager::load(store),
            view: Mutex::new(ViewState::default()),
            prompter,
            on_render,
            max_photo_bytes: DEFAULT_MAX_PHOTO_BYTES,
        }
    }

    /// Sets the size ceiling for photos picked after this call.
    pub fn with_max_photo_bytes(mut self, max_photo_bytes: u64) -> Self {
        self.max_photo_bytes = max_photo_bytes;
        self
    }

    pub fn snapshot(&self) -> RootState {
        self.folders.snapshot()
    }

    pub fn theme(&self) -> Theme {
        self.theme.current()
    }

    /// Rebuilds the visible tree and pushes it to the render sink.
    pub fn render(&self) -> String {
        let state = self.folders.snapshot();
        let html = {
            let mut view = self.view.lock().unwrap_or_else(|e| e.into_inner());
            view.retain_existing(&state);
            render::render_folders(&state, &view)
        };
        (self.on_render)(html.clone());
        html
    }

    pub fn create_folder(&self, name: &str) -> Option<Folder> {
        match self.folders.create_folder(name) {
            Ok(folder) => {
                self.render();
                Some(folder)
            }
            Err(e) => {
                self.prompter.alert(&e.to_string());
                None
            }
        }
    }

    /// Returns whether a link was appended.
    pub fn add_link(&self, folder_id: &str, url: &str) -> bool {
        match self.folders.add_link(folder_id, url) {
            Ok(true) => {
                self.render();
                true
            }
            Ok(false) => false,
            Err(e) => {
                self.prompter.alert(&e.to_string());
                false
            }
        }
    }

    /// Returns whether a note was appended.
    pub fn add_note(&self, folder_id: &str, text: &str) -> bool {
        match self.folders.add_note(folder_id, text) {
            Ok(true) => {
                self.render();
                true
            }
            Ok(false) => false,
            Err(e) => {
                self.prompter.alert(&e.to_string());
                false
            }
        }
    }

    /// Decodes the selected files and appends each photo as soon as it is ready.
    ///
    /// Every completed decode is persisted and rendered on its own, so N
    /// files produce N persist/render cycles in completion order. Files that
    /// fail to decode are logged and skipped. Returns the number added.
    pub async fn add_photos(&self, folder_id: &str, paths: Vec<PathBuf>) -> usize {
        if paths.is_empty() || !self.folders.contains(folder_id) {
            return 0;
        }

        let mut rx = photos::decode_photos(paths, self.max_photo_bytes);
        let mut added = 0;
        while let Some((path, result)) = rx.recv().await {
            match result {
                Ok(payload) => {
                    // The folder may have been deleted while decoding
                    if self.folders.add_photo(folder_id, payload) {
                        added += 1;
                        self.render();
                    }
                }
                Err(e) => log::warn!("Skipping photo {}: {}", path.display(), e),
            }
        }
        added
    }

    /// Deletes a folder after the user confirms.
    ///
    /// Unknown ids return `false` without prompting.
    pub fn delete_folder(&self, folder_id: &str) -> bool {
        if !self.folders.contains(folder_id) {
            return false;
        }
        if !self.prompter.confirm(DELETE_CONFIRM_MESSAGE) {
            return false;
        }
        let removed = self.folders.delete_folder(folder_id);
        if removed {
            self.render();
        }
        removed
    }

    /// Replaces the search text and re-renders.
    pub fn set_filter(&self, query: &str) -> String {
        self.view.lock().unwrap_or_else(|e| e.into_inner()).filter = query.to_string();
        self.render()
    }

    /// Opens or closes a folder's body and re-renders. Not persisted.
    pub fn toggle_folder(&self, folder_id: &str) -> String {
        if self.folders.contains(folder_id) {
            self.view
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .toggle(folder_id);
        }
        self.render()
    }

    /// Flips the theme. A failed write is logged; the new theme still applies.
    pub fn toggle_theme(&self) -> Theme {
        match self.theme.toggle() {
            Ok(theme) => theme,
            Err(e) => {
                log::error!("Failed to persist theme: {}", e);
                self.theme.current()
            }
        }
    }
}

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;

use crate::models::{Folder, RootState};
use crate::theme::Theme;

/// Key holding the serialized [`RootState`]
pub const STORAGE_KEY: &str = "foldersData";
/// Key holding the raw theme string
pub const THEME_KEY: &str = "theme";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid store key '{0}'")]
    InvalidKey(String),

    #[error("Could not determine data directory")]
    DataDirNotFound,
}

/// A string key/value substrate. Writes overwrite the whole value.
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, or `None` when the key is absent or unreadable.
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Validates a store key so it maps to exactly one file inside the store directory.
///
/// Rejects empty keys, `.`/`..`, path separators and control characters.
pub fn validate_key(key: &str) -> Result<(), StoreError> {
    let invalid = key.is_empty()
        || key == "."
        || key == ".."
        || key.contains('/')
        || key.contains('\\')
        || key.chars().any(|c| c.is_control());
    if invalid {
        return Err(StoreError::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// FileStore keeps one file per key under `{base_dir}/store/`.
///
/// On Linux: ~/.local/share/folio/store/
/// On macOS: ~/Library/Application Support/folio/store/
/// On Windows: C:\Users\{user}\AppData\Roaming\folio\store\
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Base data directory for the application
    pub base_dir: PathBuf,
    /// Directory holding one file per key
    pub store_dir: PathBuf,
}

impl FileStore {
    /// Creates a FileStore in the platform data directory.
    pub fn new() -> Result<Self, StoreError> {
        let base_dir = data_dir()?;
        Ok(Self::new_with_base(&base_dir))
    }

    /// Creates a FileStore rooted at a custom base directory.
    /// Useful for testing.
    pub fn new_with_base(base_dir: &Path) -> Self {
        let base_dir = base_dir.to_path_buf();
        let store_dir = base_dir.join("store");
        Self {
            base_dir,
            store_dir,
        }
    }

    /// Ensures the store directory exists.
    pub fn ensure_directories(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.store_dir)?;
        Ok(())
    }

    fn key_path(&self, key: &str) -> Result<PathBuf, StoreError> {
        validate_key(key)?;
        Ok(self.store_dir.join(key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.key_path(key).ok()?;
        if !path.exists() {
            return None;
        }
        match fs::read_to_string(&path) {
            Ok(content) => Some(content),
            Err(e) => {
                log::warn!("Failed to read store key '{}': {}", key, e);
                None
            }
        }
    }

    /// Atomic write: write to a temp file then rename over the key file.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.key_path(key)?;
        self.ensure_directories()?;
        let temp_path = path.with_extension("tmp");
        let mut f = fs::File::create(&temp_path)?;
        f.write_all(value.as_bytes())?;
        f.sync_all()?;
        drop(f);
        fs::rename(&temp_path, &path)?;
        Ok(())
    }
}

/// In-memory store for tests and headless use.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with one value.
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        validate_key(key)?;
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Returns the platform data directory for the application.
pub fn data_dir() -> Result<PathBuf, StoreError> {
    dirs::data_dir()
        .map(|p| p.join("folio"))
        .ok_or(StoreError::DataDirNotFound)
}

/// Parses a stored folders document.
///
/// Anything that is not an object with a `folders` array yields the empty
/// document. Individual folder entries that fail to parse are dropped so one
/// bad record does not discard the rest.
pub fn parse_root_state(raw: &str) -> RootState {
    if raw.trim().is_empty() {
        return RootState::default();
    }

    let json_value: serde_json::Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            log::warn!("Stored folders data is not valid JSON, starting empty: {}", e);
            return RootState::default();
        }
    };

    let Some(entries) = json_value.get("folders").and_then(|v| v.as_array()) else {
        log::warn!("Stored folders data has no folders array, starting empty");
        return RootState::default();
    };

    let folders = entries
        .iter()
        .filter_map(|entry| match serde_json::from_value::<Folder>(entry.clone()) {
            Ok(folder) => Some(folder),
            Err(e) => {
                log::warn!("Skipping malformed folder record: {}", e);
                None
            }
        })
        .collect();

    RootState { folders }
}

/// Loads the folders document. Never fails: absence or corruption gives an empty document.
pub fn load_root_state(store: &dyn KeyValueStore) -> RootState {
    match store.get(STORAGE_KEY) {
        Some(raw) => parse_root_state(&raw),
        None => RootState::default(),
    }
}

/// Serializes the full document and overwrites the stored value.
pub fn save_root_state(store: &dyn KeyValueStore, state: &RootState) -> Result<(), StoreError> {
    let json = serde_json::to_string(state)?;
    store.set(STORAGE_KEY, &json)
}

/// Loads the theme preference; anything other than `"dark"` is light.
pub fn load_theme(store: &dyn KeyValueStore) -> Theme {
    Theme::from_stored(store.get(THEME_KEY).as_deref())
}

pub fn save_theme(store: &dyn KeyValueStore, theme: Theme) -> Result<(), StoreError> {
    store.set(THEME_KEY, theme.as_str())
}

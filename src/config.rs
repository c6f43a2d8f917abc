use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::models::{Config, WindowBounds};

/// Debounce delay for config saves (1 second)
const SAVE_DEBOUNCE_MS: u64 = 1000;

/// Smallest photo limit accepted from a config file (64 KiB)
const MIN_PHOTO_BYTES: u64 = 64 * 1024;

/// ConfigManager handles loading, saving, and updating application configuration.
///
/// Features:
/// - Thread-safe access via RwLock
/// - Debounced saving to avoid excessive disk writes while a window is dragged
/// - Merges saved config with defaults for missing fields
pub struct ConfigManager {
    /// The current configuration, shared with the debounced save task
    config: Arc<RwLock<Config>>,
    /// Path to the configuration file
    config_path: Arc<PathBuf>,
    /// Handle to the debounced save task
    save_handle: Mutex<Option<JoinHandle<()>>>,
}

impl ConfigManager {
    /// Creates a new ConfigManager with the given config file path.
    ///
    /// Loads existing configuration from disk, merging with defaults for any
    /// missing fields.
    ///
    /// # Returns
    /// * `Ok(ConfigManager)` - A new ConfigManager instance
    /// * `Err(String)` - If the file exists but cannot be read or parsed
    pub fn new(config_path: PathBuf) -> Result<Self, String> {
        let config = Self::load_from_file(&config_path)?;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_path: Arc::new(config_path),
            save_handle: Mutex::new(None),
        })
    }

    /// Creates a ConfigManager holding defaults, ignoring whatever is on disk.
    ///
    /// The next save overwrites the file at `config_path`.
    pub fn with_defaults(config_path: PathBuf) -> Self {
        Self {
            config: Arc::new(RwLock::new(Config::default())),
            config_path: Arc::new(config_path),
            save_handle: Mutex::new(None),
        }
    }

    /// Loads configuration from file, merging with defaults.
    ///
    /// If the file doesn't exist, returns default configuration.
    fn load_from_file(path: &Path) -> Result<Config, String> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        merge_config_with_defaults(&content)
    }

    /// Gets a clone of the current configuration.
    pub fn get(&self) -> Config {
        self.config.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Updates the configuration using a closure.
    ///
    /// Nothing is written to disk; call [`ConfigManager::schedule_save`] or
    /// [`ConfigManager::save_sync`] afterwards.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut Config),
    {
        let mut config = self.config.write().unwrap_or_else(|e| e.into_inner());
        f(&mut config);
    }

    /// Schedules a debounced save operation.
    ///
    /// If a save is already scheduled, it will be cancelled and a new one
    /// will be scheduled. The save will occur after SAVE_DEBOUNCE_MS milliseconds.
    pub async fn schedule_save(&self) {
        let mut handle_guard = self.save_handle.lock().await;

        if let Some(handle) = handle_guard.take() {
            handle.abort();
        }

        let config_ref = Arc::clone(&self.config);
        let path_ref = Arc::clone(&self.config_path);

        let handle = tokio::spawn(async move {
            sleep(Duration::from_millis(SAVE_DEBOUNCE_MS)).await;

            let config = config_ref.read().unwrap_or_else(|e| e.into_inner()).clone();
            if let Err(e) = write_config(&path_ref, &config) {
                log::warn!("Failed to persist configuration: {}", e);
            }
        });

        *handle_guard = Some(handle);
    }

    /// Updates the configuration and schedules a debounced save.
    pub async fn update_and_save<F>(&self, f: F)
    where
        F: FnOnce(&mut Config),
    {
        self.update(f);
        self.schedule_save().await;
    }

    /// Saves the configuration to disk immediately.
    pub fn save_sync(&self) -> Result<(), String> {
        let config = self.get();
        write_config(&self.config_path, &config)
    }

    pub fn get_window_bounds(&self) -> WindowBounds {
        self.config
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .window_bounds
            .clone()
    }

    pub fn set_window_bounds(&self, bounds: WindowBounds) {
        self.update(|config| {
            config.window_bounds = bounds;
        });
    }

    pub fn max_photo_bytes(&self) -> u64 {
        self.config.read().unwrap_or_else(|e| e.into_inner()).max_photo_bytes
    }
}

fn write_config(path: &Path, config: &Config) -> Result<(), String> {
    let content = serde_json::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }

    fs::write(path, content).map_err(|e| format!("Failed to write config file: {}", e))
}

/// Merges a partial config JSON with defaults.
///
/// Unknown fields are ignored, fields of the wrong type keep their default,
/// and `max_photo_bytes` is raised to at least 64 KiB.
pub fn merge_config_with_defaults(partial_json: &str) -> Result<Config, String> {
    if partial_json.trim().is_empty() {
        return Ok(Config::default());
    }

    let json_value: serde_json::Value = serde_json::from_str(partial_json)
        .map_err(|e| format!("Failed to parse config: {}", e))?;

    let mut config = Config::default();

    if let Some(obj) = json_value.as_object() {
        if let Some(v) = obj.get("window_bounds") {
            if let Ok(bounds) = serde_json::from_value(v.clone()) {
                config.window_bounds = bounds;
            }
        }
        if let Some(v) = obj.get("max_photo_bytes").and_then(|v| v.as_u64()) {
            config.max_photo_bytes = v.max(MIN_PHOTO_BYTES);
        }
        if let Some(v) = obj.get("log_level").and_then(|v| v.as_str()) {
            config.log_level = v.to_string();
        }
    }

    Ok(config)
}

//! Folio core: folders of links, notes and photos kept in a local
//! key/value store, with a full-rebuild HTML view and a light/dark theme.
//!
//! The desktop shell in `src-tauri/` wires [`organizer::Organizer`] to
//! native dialogs and the webview.

pub mod config;
pub mod folders;
pub mod models;
pub mod organizer;
pub mod photos;
pub mod render;
pub mod store;
pub mod theme;

/// Initializes `env_logger` with `default_level` unless `RUST_LOG` is set.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging(default_level: &str) {
    let env = env_logger::Env::default().default_filter_or(default_level);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .try_init();
}

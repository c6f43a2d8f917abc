use std::sync::{Arc, RwLock};

use chrono::Utc;
use thiserror::Error;

use crate::models::{Folder, RootState};
use crate::store::{self, KeyValueStore};

/// Validation failures. The messages are shown to the user verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FolderError {
    #[error("Please enter a folder name.")]
    EmptyName,

    #[error("Please enter a valid link.")]
    EmptyLink,

    #[error("Please enter a note.")]
    EmptyNote,
}

/// Formats a folder id from a millisecond timestamp: `f_` + base-36 digits.
pub fn format_folder_id(millis: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if millis == 0 {
        return "f_0".to_string();
    }
    let mut n = millis;
    let mut buf = Vec::new();
    while n > 0 {
        buf.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    buf.reverse();
    format!("f_{}", String::from_utf8_lossy(&buf))
}

/// Parses the timestamp back out of an id produced by [`format_folder_id`].
fn parse_folder_id(id: &str) -> Option<u64> {
    let digits = id.strip_prefix("f_")?;
    u64::from_str_radix(digits, 36).ok()
}

/// FolderManager owns the in-memory folders document.
///
/// The document is loaded once and rewritten to the store in full after
/// every successful mutation. A failed write is logged and otherwise
/// treated like a successful one; the in-memory state stays authoritative.
pub struct FolderManager {
    state: RwLock<RootState>,
    store: Arc<dyn KeyValueStore>,
    /// Timestamp of the last issued id, used to keep ids strictly increasing
    last_id_millis: RwLock<u64>,
}

impl FolderManager {
    /// Loads the folders document from the store.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let state = store::load_root_state(store.as_ref());
        let last_id_millis = state
            .folders
            .iter()
            .filter_map(|f| parse_folder_id(&f.id))
            .max()
            .unwrap_or(0);
        log::info!("Loaded {} folder(s)", state.folders.len());

        Self {
            state: RwLock::new(state),
            store,
            last_id_millis: RwLock::new(last_id_millis),
        }
    }

    /// Returns a copy of the current document.
    pub fn snapshot(&self) -> RootState {
        self.state.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn folder_count(&self) -> usize {
        self.state.read().unwrap_or_else(|e| e.into_inner()).folders.len()
    }

    pub fn contains(&self, folder_id: &str) -> bool {
        self.state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .find(folder_id)
            .is_some()
    }

    /// Issues a time-based id not used by any folder in `state`.
    ///
    /// Ids normally increase past every id issued or loaded so far. Once the
    /// counter reaches `u64::MAX` it restarts from the clock and skips ids
    /// that are taken. Callers hold the state write lock, so the id stays
    /// unique until the folder is pushed.
    fn next_id(&self, state: &RootState) -> String {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        let mut last = self.last_id_millis.write().unwrap_or_else(|e| e.into_inner());
        let mut millis = if now > *last {
            now
        } else {
            last.checked_add(1).unwrap_or(now)
        };
        while state.find(&format_folder_id(millis)).is_some() {
            millis = millis.wrapping_add(1);
        }
        *last = millis;
        format_folder_id(millis)
    }

    fn persist(&self, state: &RootState) {
        if let Err(e) = store::save_root_state(self.store.as_ref(), state) {
            log::error!("Failed to persist folders: {}", e);
        }
    }

    /// Applies `f` to the folder with `folder_id` and persists.
    ///
    /// Returns `false` without persisting when no folder matches.
    fn mutate_folder<F>(&self, folder_id: &str, f: F) -> bool
    where
        F: FnOnce(&mut Folder),
    {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        let Some(folder) = state.find_mut(folder_id) else {
            log::debug!("Ignoring mutation for unknown folder '{}'", folder_id);
            return false;
        };
        f(folder);
        self.persist(&state);
        true
    }

    /// Appends a new empty folder named `name` (trimmed).
    ///
    /// Duplicate names are allowed.
    pub fn create_folder(&self, name: &str) -> Result<Folder, FolderError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(FolderError::EmptyName);
        }

        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        let folder = Folder::new(self.next_id(&state), name);
        state.folders.push(folder.clone());
        self.persist(&state);
        log::debug!("Created folder '{}' ({})", folder.name, folder.id);
        Ok(folder)
    }

    /// Appends a trimmed link. No URL format validation is done.
    ///
    /// Returns `Ok(false)` when the folder does not exist.
    pub fn add_link(&self, folder_id: &str, url: &str) -> Result<bool, FolderError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(FolderError::EmptyLink);
        }
        Ok(self.mutate_folder(folder_id, |folder| folder.links.push(url.to_string())))
    }

    /// Appends a trimmed note.
    ///
    /// Returns `Ok(false)` when the folder does not exist.
    pub fn add_note(&self, folder_id: &str, text: &str) -> Result<bool, FolderError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(FolderError::EmptyNote);
        }
        Ok(self.mutate_folder(folder_id, |folder| folder.notes.push(text.to_string())))
    }

    /// Appends one decoded photo payload and persists.
    pub fn add_photo(&self, folder_id: &str, payload: String) -> bool {
        self.mutate_folder(folder_id, |folder| folder.photos.push(payload))
    }

    /// Removes the folder with `folder_id`. Returns whether anything was removed.
    pub fn delete_folder(&self, folder_id: &str) -> bool {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        let before = state.folders.len();
        state.folders.retain(|f| f.id != folder_id);
        if state.folders.len() == before {
            return false;
        }
        self.persist(&state);
        log::debug!("Deleted folder {}", folder_id);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, STORAGE_KEY};
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn manager() -> (Arc<MemoryStore>, FolderManager) {
        let store = Arc::new(MemoryStore::new());
        let manager = FolderManager::load(store.clone());
        (store, manager)
    }

    #[test]
    fn test_format_folder_id() {
        assert_eq!(format_folder_id(0), "f_0");
        assert_eq!(format_folder_id(35), "f_z");
        assert_eq!(format_folder_id(36), "f_10");
        assert_eq!(parse_folder_id(&format_folder_id(1_700_000_000_000)), Some(1_700_000_000_000));
        assert_eq!(parse_folder_id("custom"), None);
    }

    #[test]
    fn test_create_folder_appends_empty_folder() {
        let (store, manager) = manager();
        let folder = manager.create_folder("  Books ").unwrap();

        assert_eq!(folder.name, "Books");
        assert!(folder.id.starts_with("f_"));
        assert!(folder.links.is_empty() && folder.notes.is_empty() && folder.photos.is_empty());
        assert_eq!(manager.folder_count(), 1);

        let persisted = store::load_root_state(store.as_ref());
        assert_eq!(persisted, manager.snapshot());
    }

    #[test]
    fn test_create_folder_rejects_blank_names() {
        let (store, manager) = manager();
        assert_eq!(manager.create_folder(""), Err(FolderError::EmptyName));
        assert_eq!(manager.create_folder("   "), Err(FolderError::EmptyName));
        assert_eq!(manager.folder_count(), 0);
        assert!(store.get(STORAGE_KEY).is_none());
    }

    #[test]
    fn test_duplicate_names_get_distinct_ids() {
        let (_, manager) = manager();
        let ids: HashSet<String> = (0..50)
            .map(|_| manager.create_folder("Same").unwrap().id)
            .collect();
        assert_eq!(ids.len(), 50);
        assert_eq!(manager.folder_count(), 50);
    }

    #[test]
    fn test_ids_stay_ahead_of_loaded_ids() {
        let far_future = format_folder_id(u64::MAX / 2);
        let mut state = RootState::default();
        state.folders.push(Folder::new(far_future.clone(), "Old"));
        let store = Arc::new(MemoryStore::new());
        store::save_root_state(store.as_ref(), &state).unwrap();

        let manager = FolderManager::load(store);
        let created = manager.create_folder("New").unwrap();
        assert_ne!(created.id, far_future);
        assert_eq!(parse_folder_id(&created.id), Some(u64::MAX / 2 + 1));
    }

    #[test]
    fn test_max_loaded_id_does_not_overflow() {
        let last_possible = format_folder_id(u64::MAX);
        let mut state = RootState::default();
        state.folders.push(Folder::new(last_possible.clone(), "Edited"));
        let store = Arc::new(MemoryStore::new());
        store::save_root_state(store.as_ref(), &state).unwrap();

        let manager = FolderManager::load(store);
        let first = manager.create_folder("New").unwrap();
        let second = manager.create_folder("Newer").unwrap();

        let ids: HashSet<String> = manager
            .snapshot()
            .folders
            .into_iter()
            .map(|f| f.id)
            .collect();
        assert_eq!(ids.len(), 3);
        assert_ne!(first.id, last_possible);
        assert_ne!(second.id, first.id);
    }

    #[test]
    fn test_concurrent_creates_keep_id_order() {
        let manager = Arc::new(FolderManager::load(Arc::new(MemoryStore::new())));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let manager = Arc::clone(&manager);
                std::thread::spawn(move || {
                    for i in 0..25 {
                        manager.create_folder(&format!("{}-{}", t, i)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let millis: Vec<u64> = manager
            .snapshot()
            .folders
            .iter()
            .map(|f| parse_folder_id(&f.id).unwrap())
            .collect();
        assert_eq!(millis.len(), 200);
        assert!(millis.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_add_link_trims_and_keeps_order() {
        let (_, manager) = manager();
        let id = manager.create_folder("Links").unwrap().id;

        assert_eq!(manager.add_link(&id, "https://a.com"), Ok(true));
        assert_eq!(manager.add_link(&id, " https://x.com "), Ok(true));

        let state = manager.snapshot();
        assert_eq!(state.folders[0].links, vec!["https://a.com", "https://x.com"]);
    }

    #[test]
    fn test_add_link_does_not_validate_format() {
        let (_, manager) = manager();
        let id = manager.create_folder("Links").unwrap().id;
        assert_eq!(manager.add_link(&id, "not a url"), Ok(true));
        assert_eq!(manager.snapshot().folders[0].links, vec!["not a url"]);
    }

    #[test]
    fn test_add_link_rejects_blank() {
        let (_, manager) = manager();
        let id = manager.create_folder("Links").unwrap().id;
        assert_eq!(manager.add_link(&id, "  \t"), Err(FolderError::EmptyLink));
        assert!(manager.snapshot().folders[0].links.is_empty());
    }

    #[test]
    fn test_add_note_rejects_blank() {
        let (_, manager) = manager();
        let id = manager.create_folder("Notes").unwrap().id;
        assert_eq!(manager.add_note(&id, "\n  "), Err(FolderError::EmptyNote));
        assert!(manager.snapshot().folders[0].notes.is_empty());
    }

    #[test]
    fn test_add_note_appends() {
        let (_, manager) = manager();
        let id = manager.create_folder("Notes").unwrap().id;
        assert_eq!(manager.add_note(&id, " remember milk "), Ok(true));
        assert_eq!(manager.snapshot().folders[0].notes, vec!["remember milk"]);
    }

    #[test]
    fn test_unknown_folder_is_noop() {
        let (store, manager) = manager();
        manager.create_folder("Only").unwrap();
        let before = store.get(STORAGE_KEY);

        assert_eq!(manager.add_link("missing", "https://x.com"), Ok(false));
        assert_eq!(manager.add_note("missing", "text"), Ok(false));
        assert!(!manager.add_photo("missing", "data:image/png;base64,AA==".to_string()));

        assert_eq!(store.get(STORAGE_KEY), before);
    }

    #[test]
    fn test_add_photo_appends_payload() {
        let (store, manager) = manager();
        let id = manager.create_folder("Photos").unwrap().id;
        assert!(manager.add_photo(&id, "data:image/png;base64,AA==".to_string()));

        let persisted = store::load_root_state(store.as_ref());
        assert_eq!(persisted.folders[0].photos, vec!["data:image/png;base64,AA=="]);
    }

    #[test]
    fn test_delete_folder_removes_only_target() {
        let (store, manager) = manager();
        let a = manager.create_folder("A").unwrap().id;
        let b = manager.create_folder("B").unwrap().id;
        let c = manager.create_folder("C").unwrap().id;

        assert!(manager.delete_folder(&b));

        let ids: Vec<String> = manager.snapshot().folders.into_iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![a, c]);
        assert_eq!(store::load_root_state(store.as_ref()), manager.snapshot());
    }

    #[test]
    fn test_delete_unknown_folder_is_noop() {
        let (_, manager) = manager();
        manager.create_folder("A").unwrap();
        let before = manager.snapshot();
        assert!(!manager.delete_folder("missing"));
        assert_eq!(manager.snapshot(), before);
    }

    #[test]
    fn test_load_existing_document() {
        let store = Arc::new(MemoryStore::with_entry(
            STORAGE_KEY,
            r#"{"folders":[{"id":"f_1","name":"Books","links":["a"],"notes":[],"photos":[]}]}"#,
        ));
        let manager = FolderManager::load(store);
        assert_eq!(manager.folder_count(), 1);
        assert!(manager.contains("f_1"));
        assert_eq!(manager.add_link("f_1", "b"), Ok(true));
        assert_eq!(manager.snapshot().folders[0].links, vec!["a", "b"]);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Any name that is non-empty after trimming adds exactly one empty folder.
        #[test]
        fn prop_create_folder_adds_one(name in "\\s{0,3}[^\\s]\\PC{0,20}") {
            let (_, manager) = manager();
            manager.create_folder("seed").unwrap();
            let before = manager.folder_count();

            let folder = manager.create_folder(&name).unwrap();

            prop_assert_eq!(manager.folder_count(), before + 1);
            prop_assert_eq!(folder.name.as_str(), name.trim());
            prop_assert!(folder.links.is_empty());
            prop_assert!(folder.notes.is_empty());
            prop_assert!(folder.photos.is_empty());
        }

        /// Links are stored trimmed and in insertion order.
        #[test]
        fn prop_links_trimmed_in_order(
            links in proptest::collection::vec("\\s{0,2}[a-z:/.]{1,15}\\s{0,2}", 1..8)
        ) {
            let (_, manager) = manager();
            let id = manager.create_folder("Links").unwrap().id;
            for link in &links {
                prop_assert_eq!(manager.add_link(&id, link), Ok(true));
            }
            let expected: Vec<String> = links.iter().map(|l| l.trim().to_string()).collect();
            prop_assert_eq!(&manager.snapshot().folders[0].links, &expected);
        }
    }
}

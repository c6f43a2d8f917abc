use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::store::{self, KeyValueStore, StoreError};

const SUN_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" class="icon-sun"><circle cx="12" cy="12" r="4"/><path d="M12 2v2"/><path d="M12 20v2"/><path d="m4.93 4.93 1.41 1.41"/><path d="m17.66 17.66 1.41 1.41"/><path d="M2 12h2"/><path d="M20 12h2"/><path d="m6.34 17.66-1.41 1.41"/><path d="m19.07 4.93-1.41 1.41"/></svg>"#;

const MOON_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" class="icon-moon"><path d="M20.985 12.486a9 9 0 1 1-9.473-9.472c.405-.022.617.46.402.803a6 6 0 0 0 8.268 8.268c.344-.215.825-.004.803.401"/></svg>"#;

/// Binary presentation preference.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Interprets a stored value. Only `"dark"` selects the dark theme.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("dark") => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Class applied to the document body.
    pub fn body_class(self) -> &'static str {
        match self {
            Theme::Light => "",
            Theme::Dark => "dark",
        }
    }

    /// Icon for the toggle button. It depicts the theme the button switches to.
    pub fn icon_svg(self) -> &'static str {
        match self {
            Theme::Light => MOON_ICON,
            Theme::Dark => SUN_ICON,
        }
    }

    /// Accessible label for the toggle button, naming the next action.
    pub fn aria_label(self) -> &'static str {
        match self {
            Theme::Light => "Switch to dark mode",
            Theme::Dark => "Switch to light mode",
        }
    }
}

/// ThemeManager holds the current theme and persists every change
/// under its own key, independent of the folders document.
pub struct ThemeManager {
    current: RwLock<Theme>,
    store: Arc<dyn KeyValueStore>,
}

impl ThemeManager {
    /// Loads the stored preference, defaulting to light.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let theme = store::load_theme(store.as_ref());
        log::debug!("Loaded theme preference: {}", theme.as_str());
        Self {
            current: RwLock::new(theme),
            store,
        }
    }

    pub fn current(&self) -> Theme {
        *self.current.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Flips the theme and persists the new value.
    ///
    /// The in-memory theme changes even if the write fails; the error is
    /// returned so the caller can log it.
    pub fn toggle(&self) -> Result<Theme, StoreError> {
        let next = {
            let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());
            *current = current.toggled();
            *current
        };
        store::save_theme(self.store.as_ref(), next)?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, THEME_KEY};
    use proptest::prelude::*;

    #[test]
    fn test_from_stored() {
        assert_eq!(Theme::from_stored(None), Theme::Light);
        assert_eq!(Theme::from_stored(Some("dark")), Theme::Dark);
        assert_eq!(Theme::from_stored(Some("light")), Theme::Light);
        assert_eq!(Theme::from_stored(Some("Dark")), Theme::Light);
        assert_eq!(Theme::from_stored(Some("")), Theme::Light);
    }

    #[test]
    fn test_button_describes_opposite_state() {
        assert_eq!(Theme::Light.aria_label(), "Switch to dark mode");
        assert!(Theme::Light.icon_svg().contains("icon-moon"));
        assert_eq!(Theme::Dark.aria_label(), "Switch to light mode");
        assert!(Theme::Dark.icon_svg().contains("icon-sun"));
    }

    #[test]
    fn test_body_class() {
        assert_eq!(Theme::Dark.body_class(), "dark");
        assert_eq!(Theme::Light.body_class(), "");
    }

    #[test]
    fn test_manager_toggle_persists() {
        let store = Arc::new(MemoryStore::new());
        let manager = ThemeManager::load(store.clone());
        assert_eq!(manager.current(), Theme::Light);

        let next = manager.toggle().unwrap();
        assert_eq!(next, Theme::Dark);
        assert_eq!(manager.current(), Theme::Dark);
        assert_eq!(store.get(THEME_KEY).as_deref(), Some("dark"));
    }

    #[test]
    fn test_manager_loads_dark() {
        let store = Arc::new(MemoryStore::with_entry(THEME_KEY, "dark"));
        let manager = ThemeManager::load(store);
        assert_eq!(manager.current(), Theme::Dark);
    }

    proptest! {
        /// Toggling twice returns to the original theme, stored value, icon and label.
        #[test]
        fn prop_double_toggle_restores(start_dark in any::<bool>()) {
            let initial = if start_dark { "dark" } else { "light" };
            let store = Arc::new(MemoryStore::with_entry(THEME_KEY, initial));
            let manager = ThemeManager::load(store.clone());
            let before = manager.current();

            manager.toggle().unwrap();
            let after = manager.toggle().unwrap();

            prop_assert_eq!(before, after);
            let stored = store.get(THEME_KEY);
            prop_assert_eq!(stored.as_deref(), Some(initial));
            prop_assert_eq!(before.icon_svg(), after.icon_svg());
            prop_assert_eq!(before.aria_label(), after.aria_label());
        }
    }
}

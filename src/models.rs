use serde::{Deserialize, Serialize};

/// A named container of links, notes and photos.
///
/// The serialized shape is the persisted document format, so field names
/// must not change. Missing sequences deserialize as empty ones; a folder
/// never carries a null list.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Folder {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub links: Vec<String>,
    #[serde(default)]
    pub notes: Vec<String>,
    /// Self-contained `data:` URLs, never external references
    #[serde(default)]
    pub photos: Vec<String>,
}

impl Folder {
    /// Creates an empty folder with the given id and name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            links: Vec::new(),
            notes: Vec::new(),
            photos: Vec::new(),
        }
    }
}

/// The complete persisted document: every folder, in creation order.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct RootState {
    pub folders: Vec<Folder>,
}

impl RootState {
    pub fn find(&self, folder_id: &str) -> Option<&Folder> {
        self.folders.iter().find(|f| f.id == folder_id)
    }

    pub fn find_mut(&mut self, folder_id: &str) -> Option<&mut Folder> {
        self.folders.iter_mut().find(|f| f.id == folder_id)
    }
}

/// Generic API result for IPC commands
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApiResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Class applied to `<body>`; empty for the light theme
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_class: Option<String>,
}

impl ApiResult {
    /// Create a successful result
    pub fn success() -> Self {
        Self {
            success: true,
            ..Default::default()
        }
    }

    /// Create an error result
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
            ..Default::default()
        }
    }

    /// Create a success result carrying freshly rendered markup
    pub fn with_html(html: impl Into<String>) -> Self {
        Self {
            success: true,
            html: Some(html.into()),
            ..Default::default()
        }
    }

    /// Create a success result with folder_id
    pub fn with_folder_id(folder_id: impl Into<String>) -> Self {
        Self {
            success: true,
            folder_id: Some(folder_id.into()),
            ..Default::default()
        }
    }

    /// Create a success result describing the theme and its toggle button
    pub fn with_theme(theme: crate::theme::Theme) -> Self {
        Self {
            success: true,
            theme: Some(theme.as_str().to_string()),
            icon: Some(theme.icon_svg().to_string()),
            label: Some(theme.aria_label().to_string()),
            body_class: Some(theme.body_class().to_string()),
            ..Default::default()
        }
    }
}

/// Window bounds for position and size persistence
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct WindowBounds {
    pub width: u32,
    pub height: u32,
    pub x: Option<i32>,
    pub y: Option<i32>,
}

impl Default for WindowBounds {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 760,
            x: None,
            y: None,
        }
    }
}

/// Default ceiling for a single photo, before encoding (10 MiB)
pub const DEFAULT_MAX_PHOTO_BYTES: u64 = 10 * 1024 * 1024;

/// Application configuration
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Config {
    pub window_bounds: WindowBounds,
    pub max_photo_bytes: u64,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window_bounds: WindowBounds::default(),
            max_photo_bytes: DEFAULT_MAX_PHOTO_BYTES,
            log_level: "info".to_string(),
        }
    }
}

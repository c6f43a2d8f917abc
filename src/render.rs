use std::collections::HashSet;
use std::fmt::Write;

use crate::models::{Folder, RootState};

const FOLDER_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="18" height="18" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" class="icon-folder" aria-hidden="true"><path d="M20 20a2 2 0 0 0 2-2V8a2 2 0 0 0-2-2h-7.9a2 2 0 0 1-1.69-.9L9.6 3.9A2 2 0 0 0 7.93 3H4a2 2 0 0 0-2 2v13a2 2 0 0 0 2 2Z"/></svg>"#;

const TRASH_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="18" height="18" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" class="icon-trash" aria-hidden="true"><path d="M3 6h18"/><path d="M19 6v14c0 1-1 2-2 2H7c-1 0-2-1-2-2V6"/><path d="M8 6V4c0-1 1-2 2-2h4c1 0 2 1 2 2v2"/></svg>"#;

/// Escapes text for element content.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

/// Escapes text for a quoted attribute value. Also covers single quotes.
pub fn escape_attr(s: &str) -> String {
    escape_html(s).replace('\'', "&#39;")
}

/// Case-insensitive substring match on a folder name.
/// A blank filter matches everything.
pub fn matches_filter(name: &str, filter: &str) -> bool {
    let filter = filter.trim().to_lowercase();
    filter.is_empty() || name.to_lowercase().contains(&filter)
}

/// View-only state. Never persisted; it survives re-renders but not restarts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewState {
    /// Search text applied to folder names
    pub filter: String,
    /// Folders whose content body is open
    pub expanded: HashSet<String>,
}

impl ViewState {
    /// Flips the open/closed flag of a folder. Returns the new state.
    pub fn toggle(&mut self, folder_id: &str) -> bool {
        if self.expanded.remove(folder_id) {
            false
        } else {
            self.expanded.insert(folder_id.to_string());
            true
        }
    }

    pub fn is_expanded(&self, folder_id: &str) -> bool {
        self.expanded.contains(folder_id)
    }

    /// Drops flags for folders that no longer exist.
    pub fn retain_existing(&mut self, state: &RootState) {
        self.expanded.retain(|id| state.find(id).is_some());
    }
}

/// Rebuilds the whole folder list from scratch.
///
/// One block per folder whose name passes the filter, in document order.
/// Every user-supplied string goes through [`escape_html`] or
/// [`escape_attr`] before it reaches the markup.
pub fn render_folders(state: &RootState, view: &ViewState) -> String {
    let mut html = String::new();
    for folder in state
        .folders
        .iter()
        .filter(|f| matches_filter(&f.name, &view.filter))
    {
        render_folder(&mut html, folder, view.is_expanded(&folder.id));
    }
    html
}

fn render_folder(html: &mut String, folder: &Folder, expanded: bool) {
    let id = escape_attr(&folder.id);
    let hidden = if expanded { "" } else { " hidden" };

    // Writing to a String cannot fail
    let _ = write!(
        html,
        concat!(
            r#"<div class="folder" data-id="{id}">"#,
            r#"<div class="folder-header">"#,
            r#"<h3 data-action="toggle-folder" data-id="{id}">{folder_icon}<span class="folder-name">{name}</span></h3>"#,
            r#"<button class="delete-btn" data-action="delete-folder" data-id="{id}" aria-label="Delete folder" title="Delete folder">{trash_icon}</button>"#,
            r#"</div>"#,
            r#"<div class="content"{hidden}>"#,
            r#"<input type="text" class="link-input" placeholder="Add a new link (https://...)">"#,
            r#"<div class="inline-actions">"#,
            r#"<button data-action="add-link" data-id="{id}">Add Link</button>"#,
            r#"<button data-action="add-note" data-id="{id}">Add Note</button>"#,
            r#"</div>"#,
            r#"<textarea class="note-input" placeholder="Write your notes here..."></textarea>"#,
            r#"<button data-action="add-photos" data-id="{id}">Add Photos</button>"#,
        ),
        id = id,
        name = escape_html(&folder.name),
        hidden = hidden,
        folder_icon = FOLDER_ICON,
        trash_icon = TRASH_ICON,
    );

    for url in &folder.links {
        let _ = write!(
            html,
            r#"<div class="link-item"><a href="{}" target="_blank" rel="noopener">{}</a></div>"#,
            escape_attr(url),
            escape_html(url),
        );
    }
    for note in &folder.notes {
        let _ = write!(html, r#"<div class="note-item">{}</div>"#, escape_html(note));
    }
    for src in &folder.photos {
        let _ = write!(html, r#"<img src="{}" alt="">"#, escape_attr(src));
    }

    html.push_str("</div></div>");
}

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{FsError, FsResult};
use crate::fs::listing::{list_directory, probe_directory, Entry};

/// An active search or extension filter narrowing a panel's entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    /// Case-insensitive substring match on the name; `query` is lowercase.
    Search { query: String },
    /// Case-insensitive suffix match; `extension` is lowercase and starts with `.`.
    Filter { extension: String },
}

impl Overlay {
    pub fn search(query: &str) -> Self {
        Overlay::Search {
            query: query.to_lowercase(),
        }
    }

    /// `"MP3"`, `".mp3"` and `" .Mp3 "` all normalize to `.mp3`.
    pub fn filter(extension: &str) -> Self {
        let ext = extension.trim().to_lowercase();
        let extension = if ext.starts_with('.') {
            ext
        } else {
            format!(".{}", ext)
        };
        Overlay::Filter { extension }
    }

    pub fn matches(&self, entry: &Entry) -> bool {
        let name = entry.name.to_lowercase();
        match self {
            Overlay::Search { query } => name.contains(query.as_str()),
            Overlay::Filter { extension } => name.ends_with(extension.as_str()),
        }
    }

    /// Status bar text, e.g. `Search: foo` or `Filter: .rs`.
    pub fn label(&self) -> String {
        match self {
            Overlay::Search { query } => format!("Search: {}", query),
            Overlay::Filter { extension } => format!("Filter: {}", extension),
        }
    }
}

/// One browsable directory view.
///
/// `selected_index` always indexes `entries` (or is 0 when empty) and every
/// index in `multi_selected` is valid for the current `entries`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelState {
    pub path: PathBuf,
    pub entries: Vec<Entry>,
    pub selected_index: usize,
    pub scroll_offset: usize,
    pub multi_selected: BTreeSet<usize>,
    pub overlay: Option<Overlay>,
    /// Unfiltered snapshot while an overlay is active.
    original_entries: Option<Vec<Entry>>,
}

impl PanelState {
    /// Create a panel for `path`. Entries stay empty until [`refresh`](Self::refresh).
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            ..Self::default()
        }
    }

    /// Re-list `path`, dropping any overlay and multi-selection.
    ///
    /// Returns the error if the directory itself could not be read; the
    /// panel is then left with no entries.
    pub fn refresh(&mut self, show_hidden: bool) -> Option<FsError> {
        let listing = list_directory(&self.path, show_hidden);
        self.entries = listing.entries;
        self.overlay = None;
        self.original_entries = None;
        self.multi_selected.clear();
        self.clamp_cursor();
        listing.error
    }

    /// Re-list `path` keeping the current overlay (re-applied to the fresh
    /// listing) and the cursor position where it still fits.
    pub fn rescan(&mut self, show_hidden: bool) -> Option<FsError> {
        let overlay = self.overlay.clone();
        let (selected, scroll) = (self.selected_index, self.scroll_offset);
        let error = self.refresh(show_hidden);
        if let Some(overlay) = overlay {
            self.apply_overlay(overlay);
        }
        self.selected_index = selected;
        self.scroll_offset = scroll;
        self.clamp_cursor();
        error
    }

    fn clamp_cursor(&mut self) {
        self.selected_index = self.selected_index.min(self.entries.len().saturating_sub(1));
        self.scroll_offset = self.scroll_offset.min(self.selected_index);
    }

    fn reset_cursor(&mut self) {
        self.selected_index = 0;
        self.scroll_offset = 0;
        self.multi_selected.clear();
    }

    /// Move the cursor by `delta`, clamped to the entries, and scroll so it
    /// stays inside a window of `viewport` rows.
    pub fn move_cursor(&mut self, delta: isize, viewport: usize) {
        if self.entries.is_empty() {
            return;
        }
        let last = (self.entries.len() - 1) as isize;
        let target = (self.selected_index as isize).saturating_add(delta).clamp(0, last);
        self.selected_index = target as usize;
        self.ensure_visible(viewport);
    }

    /// Adjust `scroll_offset` so the cursor lies in the visible window.
    pub fn ensure_visible(&mut self, viewport: usize) {
        if viewport == 0 {
            return;
        }
        if self.selected_index < self.scroll_offset {
            self.scroll_offset = self.selected_index;
        } else if self.selected_index >= self.scroll_offset + viewport {
            self.scroll_offset = self.selected_index - viewport + 1;
        }
    }

    /// Flip `index` in the multi-selection.
    ///
    /// Returns `Some(true)` when it became selected, `Some(false)` when it was
    /// deselected, and `None` for an out-of-range index.
    pub fn toggle_multi_select(&mut self, index: usize) -> Option<bool> {
        if index >= self.entries.len() {
            return None;
        }
        if self.multi_selected.remove(&index) {
            Some(false)
        } else {
            self.multi_selected.insert(index);
            Some(true)
        }
    }

    /// Select every entry; returns how many were newly added.
    pub fn select_all(&mut self) -> usize {
        let before = self.multi_selected.len();
        self.multi_selected.extend(0..self.entries.len());
        self.multi_selected.len() - before
    }

    /// Clear the multi-selection; returns how many were cleared.
    pub fn clear_selection(&mut self) -> usize {
        let count = self.multi_selected.len();
        self.multi_selected.clear();
        count
    }

    /// Descend into the child directory `name`.
    ///
    /// The child is probed before anything changes, so an `Err` leaves the
    /// panel untouched. `Ok(Some(_))` means the panel moved but the new
    /// listing could not be read.
    pub fn enter_child(&mut self, name: &str, show_hidden: bool) -> FsResult<Option<FsError>> {
        let entry = self
            .entries
            .iter()
            .find(|e| e.name == name)
            .ok_or(FsError::NotFound)?;
        if !entry.is_dir {
            return Err(FsError::NotADirectory);
        }
        let target = self.path.join(name);
        probe_directory(&target)?;

        debug!(path = %target.display(), "entering directory");
        self.path = target;
        self.selected_index = 0;
        self.scroll_offset = 0;
        Ok(self.refresh(show_hidden))
    }

    /// Move to the parent directory.
    ///
    /// Returns whether the panel moved (`false` at the filesystem root) and
    /// the listing error of the parent, if any.
    pub fn go_to_parent(&mut self, show_hidden: bool) -> (bool, Option<FsError>) {
        let Some(parent) = self.path.parent().map(Path::to_path_buf) else {
            return (false, None);
        };
        debug!(path = %parent.display(), "leaving to parent");
        self.path = parent;
        self.selected_index = 0;
        self.scroll_offset = 0;
        (true, self.refresh(show_hidden))
    }

    /// Narrow `entries` to those matching `overlay`.
    ///
    /// Applying a second overlay filters the original listing, not the
    /// already-filtered subset.
    pub fn apply_overlay(&mut self, overlay: Overlay) {
        let original = self
            .original_entries
            .get_or_insert_with(|| self.entries.clone());
        self.entries = original
            .iter()
            .filter(|e| overlay.matches(e))
            .cloned()
            .collect();
        self.overlay = Some(overlay);
        self.reset_cursor();
    }

    /// Restore the unfiltered entries. Returns `false` if no overlay was active.
    pub fn clear_overlay(&mut self) -> bool {
        let Some(original) = self.original_entries.take() else {
            return false;
        };
        self.entries = original;
        self.overlay = None;
        self.reset_cursor();
        true
    }

    pub fn selected_entry(&self) -> Option<&Entry> {
        self.entries.get(self.selected_index)
    }

    pub fn selected_path(&self) -> Option<PathBuf> {
        self.selected_entry().map(|e| self.path.join(&e.name))
    }

    /// Paths an operation acts on: the multi-selection in listing order, or
    /// the cursor entry when nothing is multi-selected.
    pub fn targets(&self) -> Vec<PathBuf> {
        if self.multi_selected.is_empty() {
            return self.selected_path().into_iter().collect();
        }
        self.multi_selected
            .iter()
            .filter_map(|&i| self.entries.get(i))
            .map(|e| self.path.join(&e.name))
            .collect()
    }

    /// Put the cursor on the entry called `name`, if present.
    pub fn select_by_name(&mut self, name: &str, viewport: usize) -> bool {
        match self.entries.iter().position(|e| e.name == name) {
            Some(index) => {
                self.selected_index = index;
                self.ensure_visible(viewport);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::TempDir;

    fn names(panel: &PanelState) -> Vec<&str> {
        panel.entries.iter().map(|e| e.name.as_str()).collect()
    }

    fn panel_with(files: &[&str], dirs: &[&str]) -> (TempDir, PanelState) {
        let dir = TempDir::new().unwrap();
        for f in files {
            File::create(dir.path().join(f)).unwrap();
        }
        for d in dirs {
            fs::create_dir(dir.path().join(d)).unwrap();
        }
        let mut panel = PanelState::new(dir.path().to_path_buf());
        assert!(panel.refresh(false).is_none());
        (dir, panel)
    }

    #[test]
    fn overlay_normalization() {
        assert_eq!(
            Overlay::filter(" MP3 "),
            Overlay::Filter {
                extension: ".mp3".into()
            }
        );
        assert_eq!(
            Overlay::filter(".Rs"),
            Overlay::Filter {
                extension: ".rs".into()
            }
        );
        assert_eq!(
            Overlay::search("ReadMe"),
            Overlay::Search {
                query: "readme".into()
            }
        );
    }

    #[test]
    fn overlay_labels() {
        assert_eq!(Overlay::search("Foo").label(), "Search: foo");
        assert_eq!(Overlay::filter("txt").label(), "Filter: .txt");
    }

    #[test]
    fn filter_by_extension_then_clear_round_trips() {
        let (_dir, mut panel) = panel_with(&["a.mp3", "b.txt", "c.MP3"], &[]);
        let before = panel.entries.clone();

        panel.apply_overlay(Overlay::filter(".mp3"));
        assert_eq!(names(&panel), vec!["a.mp3", "c.MP3"]);

        assert!(panel.clear_overlay());
        assert_eq!(panel.entries, before);
        assert_eq!(names(&panel), vec!["a.mp3", "b.txt", "c.MP3"]);
        assert!(panel.overlay.is_none());
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let (_dir, mut panel) = panel_with(&["Report.pdf", "notes.md", "old_report.txt"], &["reports"]);
        panel.apply_overlay(Overlay::search("REPORT"));
        assert_eq!(names(&panel), vec!["reports", "old_report.txt", "Report.pdf"]);
    }

    #[test]
    fn second_overlay_filters_original_listing() {
        let (_dir, mut panel) = panel_with(&["a.rs", "b.rs", "c.md"], &[]);
        panel.apply_overlay(Overlay::filter("rs"));
        panel.apply_overlay(Overlay::filter("md"));
        assert_eq!(names(&panel), vec!["c.md"]);
        panel.clear_overlay();
        assert_eq!(names(&panel), vec!["a.rs", "b.rs", "c.md"]);
    }

    #[test]
    fn overlay_resets_cursor_and_selection() {
        let (_dir, mut panel) = panel_with(&["a.rs", "b.rs", "c.rs"], &[]);
        panel.move_cursor(2, 10);
        panel.toggle_multi_select(1);
        panel.apply_overlay(Overlay::search("b"));
        assert_eq!(panel.selected_index, 0);
        assert_eq!(panel.scroll_offset, 0);
        assert!(panel.multi_selected.is_empty());
    }

    #[test]
    fn clear_overlay_without_overlay_is_noop() {
        let (_dir, mut panel) = panel_with(&["a"], &[]);
        assert!(!panel.clear_overlay());
        assert_eq!(names(&panel), vec!["a"]);
    }

    #[test]
    fn move_cursor_clamps_both_ends() {
        let (_dir, mut panel) = panel_with(&["a", "b", "c"], &[]);
        panel.move_cursor(-5, 10);
        assert_eq!(panel.selected_index, 0);
        panel.move_cursor(isize::MAX, 10);
        assert_eq!(panel.selected_index, 2);
        panel.move_cursor(isize::MIN, 10);
        assert_eq!(panel.selected_index, 0);
    }

    #[test]
    fn move_cursor_on_empty_listing_is_noop() {
        let (_dir, mut panel) = panel_with(&[], &[]);
        panel.move_cursor(1, 10);
        assert_eq!(panel.selected_index, 0);
        assert!(panel.selected_entry().is_none());
        assert!(panel.targets().is_empty());
    }

    #[test]
    fn scroll_follows_cursor() {
        let files: Vec<String> = (0..20).map(|i| format!("f{:02}", i)).collect();
        let refs: Vec<&str> = files.iter().map(String::as_str).collect();
        let (_dir, mut panel) = panel_with(&refs, &[]);

        panel.move_cursor(7, 5);
        assert_eq!(panel.selected_index, 7);
        assert_eq!(panel.scroll_offset, 3);

        panel.move_cursor(-6, 5);
        assert_eq!(panel.selected_index, 1);
        assert_eq!(panel.scroll_offset, 1);
    }

    #[test]
    fn cursor_stays_in_bounds_after_mixed_operations() {
        let (dir, mut panel) = panel_with(&["a.rs", "b.rs", "c.md", "d.md"], &[]);
        panel.move_cursor(3, 2);
        fs::remove_file(dir.path().join("d.md")).unwrap();
        fs::remove_file(dir.path().join("c.md")).unwrap();
        panel.refresh(false);
        assert_eq!(panel.selected_index, 1);
        assert!(panel.scroll_offset <= panel.selected_index);

        panel.apply_overlay(Overlay::filter("zip"));
        assert!(panel.entries.is_empty());
        assert_eq!(panel.selected_index, 0);
        panel.move_cursor(1, 2);
        assert_eq!(panel.selected_index, 0);
        panel.clear_overlay();
        assert_eq!(panel.entries.len(), 2);
    }

    #[test]
    fn refresh_discards_overlay() {
        let (_dir, mut panel) = panel_with(&["a.rs", "b.md"], &[]);
        panel.apply_overlay(Overlay::filter("rs"));
        panel.refresh(false);
        assert!(panel.overlay.is_none());
        assert_eq!(names(&panel), vec!["a.rs", "b.md"]);
    }

    #[test]
    fn rescan_reapplies_overlay_to_new_listing() {
        let (dir, mut panel) = panel_with(&["a.rs", "b.md"], &[]);
        panel.apply_overlay(Overlay::filter("rs"));
        File::create(dir.path().join("c.rs")).unwrap();
        panel.rescan(false);
        assert_eq!(panel.overlay, Some(Overlay::filter("rs")));
        assert_eq!(names(&panel), vec!["a.rs", "c.rs"]);
        panel.clear_overlay();
        assert_eq!(names(&panel), vec!["a.rs", "b.md", "c.rs"]);
    }

    #[test]
    fn rescan_keeps_cursor_and_clears_selection() {
        let (dir, mut panel) = panel_with(&["a", "b", "c"], &[]);
        panel.move_cursor(1, 10);
        panel.toggle_multi_select(2);
        fs::remove_file(dir.path().join("a")).unwrap();
        panel.rescan(false);
        assert_eq!(panel.selected_index, 1);
        assert!(panel.multi_selected.is_empty());
    }

    #[test]
    fn toggle_multi_select_ignores_invalid_index() {
        let (_dir, mut panel) = panel_with(&["a", "b"], &[]);
        assert_eq!(panel.toggle_multi_select(5), None);
        assert_eq!(panel.toggle_multi_select(1), Some(true));
        assert_eq!(panel.toggle_multi_select(1), Some(false));
        assert!(panel.multi_selected.is_empty());
    }

    #[test]
    fn select_all_and_clear() {
        let (_dir, mut panel) = panel_with(&["a", "b", "c"], &[]);
        panel.toggle_multi_select(0);
        assert_eq!(panel.select_all(), 2);
        assert_eq!(panel.multi_selected.len(), 3);
        assert_eq!(panel.clear_selection(), 3);
        assert!(panel.multi_selected.is_empty());
    }

    #[test]
    fn targets_prefer_multi_selection_in_order() {
        let (dir, mut panel) = panel_with(&["a", "b", "c"], &[]);
        panel.toggle_multi_select(2);
        panel.toggle_multi_select(0);
        assert_eq!(
            panel.targets(),
            vec![dir.path().join("a"), dir.path().join("c")]
        );
        panel.clear_selection();
        panel.move_cursor(1, 10);
        assert_eq!(panel.targets(), vec![dir.path().join("b")]);
    }

    #[test]
    fn enter_child_and_back_to_parent() {
        let (dir, mut panel) = panel_with(&["top.txt"], &["sub"]);
        File::create(dir.path().join("sub").join("inner.txt")).unwrap();

        assert_eq!(panel.enter_child("sub", false), Ok(None));
        assert_eq!(panel.path, dir.path().join("sub"));
        assert_eq!(names(&panel), vec!["inner.txt"]);
        assert_eq!(panel.selected_index, 0);

        assert_eq!(panel.go_to_parent(false), (true, None));
        assert_eq!(panel.path, dir.path());
        assert_eq!(names(&panel), vec!["sub", "top.txt"]);
    }

    #[test]
    fn go_to_vanished_parent_reports_listing_error() {
        let (dir, _) = panel_with(&[], &["a"]);
        let inner = dir.path().join("a").join("b");
        fs::create_dir(&inner).unwrap();
        let mut panel = PanelState::new(inner);
        panel.refresh(false);
        fs::remove_dir_all(dir.path().join("a")).unwrap();

        let (moved, error) = panel.go_to_parent(false);
        assert!(moved);
        assert_eq!(error, Some(FsError::NotFound));
        assert_eq!(panel.path, dir.path().join("a"));
        assert!(panel.entries.is_empty());
    }

    #[test]
    fn enter_child_rejects_files() {
        let (dir, mut panel) = panel_with(&["file.txt"], &[]);
        assert_eq!(
            panel.enter_child("file.txt", false),
            Err(FsError::NotADirectory)
        );
        assert_eq!(panel.path, dir.path());
    }

    #[test]
    fn enter_child_discards_overlay() {
        let (_dir, mut panel) = panel_with(&["x.rs"], &["src"]);
        panel.apply_overlay(Overlay::search("src"));
        panel.enter_child("src", false).unwrap();
        assert!(panel.overlay.is_none());
    }

    #[test]
    fn enter_vanished_child_leaves_panel_untouched() {
        let (dir, mut panel) = panel_with(&[], &["gone"]);
        fs::remove_dir(dir.path().join("gone")).unwrap();
        assert_eq!(panel.enter_child("gone", false), Err(FsError::NotFound));
        assert_eq!(panel.path, dir.path());
        assert_eq!(names(&panel), vec!["gone"]);
    }

    #[cfg(unix)]
    #[test]
    fn enter_unreadable_child_is_permission_denied() {
        use std::os::unix::fs::PermissionsExt;
        let (dir, mut panel) = panel_with(&[], &["locked"]);
        let locked = dir.path().join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        // Root can read anything; the check only means something unprivileged.
        if fs::read_dir(&locked).is_err() {
            assert_eq!(
                panel.enter_child("locked", false),
                Err(FsError::PermissionDenied)
            );
            assert_eq!(panel.path, dir.path());
        }
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[test]
    fn go_to_parent_at_root_is_noop() {
        let mut panel = PanelState::new(PathBuf::from("/"));
        panel.refresh(false);
        assert_eq!(panel.go_to_parent(false), (false, None));
        assert_eq!(panel.path, PathBuf::from("/"));
    }

    #[test]
    fn select_by_name_moves_cursor_into_view() {
        let (_dir, mut panel) = panel_with(&["a", "b", "c", "d"], &[]);
        assert!(panel.select_by_name("d", 2));
        assert_eq!(panel.selected_index, 3);
        assert_eq!(panel.scroll_offset, 2);
        assert!(!panel.select_by_name("zzz", 2));
    }
}

use std::path::{Path, PathBuf};
use std::time::Instant;

use crossterm::event::KeyEvent;
use tracing::{debug, info, warn};

use crate::components::help::HelpOverlay;
use crate::config::AppConfig;
use crate::error::FsError;
use crate::fs::clipboard::{Clipboard, ClipboardOp};
use crate::fs::launcher::{Launcher, SystemLauncher};
use crate::fs::operations::{
    delete_batch, is_non_empty_dir, paste_batch, validate_name, BatchReport, FileOps,
    LocalFileOps,
};
use crate::modal::{is_yes, scroll_delta, InputOutcome, InputPurpose, Modal};
use crate::navigation::Navigation;
use crate::panel::Overlay;
use crate::preview::load_preview;

/// Application mode.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum AppMode {
    #[default]
    Normal,
    /// A modal owns every key until it resolves.
    Modal(Modal),
}

/// A Normal-mode command, decoded from one key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    First,
    Last,
    Parent,
    Enter,
    Open,
    Copy,
    Cut,
    Paste,
    Delete,
    Rename,
    CreateFile,
    CreateDirectory,
    ToggleSelect,
    SelectAll,
    ClearSelection,
    ToggleDual,
    SwitchPanel,
    Search,
    Filter,
    ClearOverlay,
    /// Clear an active search/filter, otherwise quit.
    Escape,
    Preview,
    ToggleHidden,
    Refresh,
    Help,
    Quit,
}

/// One line of transient feedback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub text: String,
    pub is_error: bool,
}

impl Status {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// Browser state every command operates on.
#[derive(Debug, Default)]
pub struct AppState {
    pub nav: Navigation,
    pub clipboard: Clipboard,
}

/// Main application: state, mode, feedback and collaborators.
pub struct App {
    pub state: AppState,
    pub mode: AppMode,
    pub status_message: Option<(Status, Instant)>,
    pub should_quit: bool,
    /// Rows available to the entry list, set by the event loop.
    pub viewport_rows: usize,
    pub config: AppConfig,
    ops: Box<dyn FileOps>,
    launcher: Box<dyn Launcher>,
}

impl App {
    /// Create an App on the real filesystem and desktop opener.
    pub fn new(config: AppConfig) -> Self {
        Self::with_collaborators(config, Box::new(LocalFileOps), Box::new(SystemLauncher))
    }

    pub fn with_collaborators(
        config: AppConfig,
        ops: Box<dyn FileOps>,
        launcher: Box<dyn Launcher>,
    ) -> Self {
        let mut nav = Navigation::new(config.start_dir.clone());
        let startup_error = nav.refresh_all();
        let mut app = Self {
            state: AppState {
                nav,
                clipboard: Clipboard::new(),
            },
            mode: AppMode::Normal,
            status_message: None,
            should_quit: false,
            viewport_rows: 1,
            config,
            ops,
            launcher,
        };
        if let Some(e) = startup_error {
            app.set_status(listing_error(e));
        }
        app
    }

    /// Record the list height and re-clamp every panel's scroll window.
    pub fn set_viewport(&mut self, rows: usize) {
        self.viewport_rows = rows.max(1);
        self.state.nav.ensure_visible(self.viewport_rows);
    }

    pub fn set_status(&mut self, status: Status) {
        if status.is_error {
            warn!(message = %status.text, "status");
        } else {
            debug!(message = %status.text, "status");
        }
        self.status_message = Some((status, Instant::now()));
    }

    /// Drop the status message once it has been shown long enough.
    pub fn clear_expired_status(&mut self) {
        if let Some((_, created)) = &self.status_message {
            if created.elapsed() >= self.config.status_timeout {
                self.status_message = None;
            }
        }
    }

    /// Directory reported to the shell on exit.
    pub fn exit_directory(&self) -> &Path {
        &self.state.nav.active().path
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    fn open_modal(&mut self, modal: Modal) {
        self.mode = AppMode::Modal(modal);
    }

    fn close_modal(&mut self) {
        self.mode = AppMode::Normal;
    }

    /// Run one Normal-mode command to completion.
    pub fn dispatch(&mut self, command: Command) {
        debug!(?command, "dispatch");
        let rows = self.viewport_rows as isize;
        let status = match command {
            Command::MoveUp => self.move_cursor(-1),
            Command::MoveDown => self.move_cursor(1),
            Command::PageUp => self.move_cursor(-rows),
            Command::PageDown => self.move_cursor(rows),
            Command::First => self.move_cursor(isize::MIN),
            Command::Last => self.move_cursor(isize::MAX),
            Command::Parent => self.state.nav.go_to_parent().1.map(listing_error),
            Command::Enter => self.enter_selected(),
            Command::Open => self.open_selected(),
            Command::Copy => self.stage_clipboard(ClipboardOp::Copy),
            Command::Cut => self.stage_clipboard(ClipboardOp::Cut),
            Command::Paste => Some(self.paste()),
            Command::Delete => self.begin_delete(),
            Command::Rename => self.begin_rename(),
            Command::CreateFile => {
                self.open_modal(InputPurpose::CreateFile.into_modal());
                None
            }
            Command::CreateDirectory => {
                self.open_modal(InputPurpose::CreateDirectory.into_modal());
                None
            }
            Command::ToggleSelect => self.toggle_select(),
            Command::SelectAll => Some(self.select_all()),
            Command::ClearSelection => Some(self.clear_selection()),
            Command::ToggleDual => Some(self.toggle_dual()),
            Command::SwitchPanel => self.switch_panel(),
            Command::Search => {
                self.open_modal(InputPurpose::Search.into_modal());
                None
            }
            Command::Filter => {
                self.open_modal(InputPurpose::Filter.into_modal());
                None
            }
            Command::ClearOverlay => self.clear_overlay(),
            Command::Escape => {
                let cleared = self.clear_overlay();
                if cleared.is_none() {
                    self.quit();
                }
                cleared
            }
            Command::Preview => self.preview_selected(),
            Command::ToggleHidden => Some(self.toggle_hidden()),
            Command::Refresh => Some(self.refresh()),
            Command::Help => {
                self.open_modal(Modal::Help { scroll: 0 });
                None
            }
            Command::Quit => {
                self.quit();
                None
            }
        };
        if let Some(status) = status {
            self.set_status(status);
        }
    }

    // ── Navigation ──────────────────────────────────────────────────────

    fn move_cursor(&mut self, delta: isize) -> Option<Status> {
        self.state.nav.move_cursor(delta, self.viewport_rows);
        None
    }

    /// Enter the selected directory, or open the selected file.
    fn enter_selected(&mut self) -> Option<Status> {
        let entry = self.state.nav.active().selected_entry()?.clone();
        if !entry.is_dir {
            return self.open_selected();
        }
        match self.state.nav.enter_child(&entry.name) {
            Ok(error) => error.map(listing_error),
            Err(FsError::PermissionDenied) => Some(Status::error("Permission denied")),
            Err(e) => Some(Status::error(format!("Cannot enter {}: {}", entry.name, e))),
        }
    }

    fn open_selected(&mut self) -> Option<Status> {
        let panel = self.state.nav.active();
        let entry = panel.selected_entry()?;
        if entry.is_dir {
            return None;
        }
        let path = panel.path.join(&entry.name);
        let name = entry.name.clone();
        Some(match self.launcher.open(&path) {
            Ok(()) => Status::info(format!("Opening {}...", name)),
            Err(e) => Status::error(format!("Error opening file: {}", e)),
        })
    }

    fn toggle_dual(&mut self) -> Status {
        let (dual, error) = self.state.nav.toggle_dual();
        self.state.nav.ensure_visible(self.viewport_rows);
        if let Some(e) = error {
            return listing_error(e);
        }
        if dual {
            Status::info("Dual panel mode ON - TAB to switch panels")
        } else {
            Status::info("Single panel mode")
        }
    }

    fn switch_panel(&mut self) -> Option<Status> {
        if self.state.nav.switch_panel() {
            None
        } else {
            Some(Status::info("Tab only works in dual panel mode"))
        }
    }

    fn toggle_hidden(&mut self) -> Status {
        if let Some(e) = self.state.nav.toggle_hidden() {
            return listing_error(e);
        }
        let flag = if self.state.nav.show_hidden { "ON" } else { "OFF" };
        Status::info(format!("Hidden files: {}", flag))
    }

    fn refresh(&mut self) -> Status {
        match self.rescan() {
            Some(e) => listing_error(e),
            None => Status::info("Refreshed"),
        }
    }

    /// Re-list every panel after a filesystem change, keeping overlays.
    fn rescan(&mut self) -> Option<FsError> {
        let error = self.state.nav.rescan_all();
        self.state.nav.ensure_visible(self.viewport_rows);
        error
    }

    // ── Selection ───────────────────────────────────────────────────────

    fn toggle_select(&mut self) -> Option<Status> {
        let panel = self.state.nav.active_mut();
        let index = panel.selected_index;
        let selected = panel.toggle_multi_select(index)?;
        let name = &panel.entries[index].name;
        Some(if selected {
            Status::info(format!("Selected: {}", name))
        } else {
            Status::info(format!("Deselected: {}", name))
        })
    }

    fn select_all(&mut self) -> Status {
        match self.state.nav.active_mut().select_all() {
            0 => Status::info("All files already selected"),
            n => Status::info(format!("Selected {} additional files", n)),
        }
    }

    fn clear_selection(&mut self) -> Status {
        match self.state.nav.active_mut().clear_selection() {
            0 => Status::info("No files selected"),
            n => Status::info(format!("Cleared {} selections", n)),
        }
    }

    // ── Search / filter ─────────────────────────────────────────────────

    fn clear_overlay(&mut self) -> Option<Status> {
        self.state
            .nav
            .clear_overlay()
            .then(|| Status::info("Search/filter cleared"))
    }

    fn apply_search(&mut self, query: &str) -> Status {
        if query.trim().is_empty() {
            self.state.nav.clear_overlay();
            return Status::info("Search/filter cleared");
        }
        self.state.nav.apply_overlay(Overlay::search(query));
        Status::info(format!("Searching for: {}", query))
    }

    fn apply_filter(&mut self, extension: &str) -> Status {
        if extension.trim().is_empty() {
            self.state.nav.clear_overlay();
            return Status::info("Search/filter cleared");
        }
        let overlay = Overlay::filter(extension);
        let label = match &overlay {
            Overlay::Filter { extension } => extension.clone(),
            Overlay::Search { query } => query.clone(),
        };
        self.state.nav.apply_overlay(overlay);
        Status::info(format!("Filtering by: {}", label))
    }

    // ── Clipboard ───────────────────────────────────────────────────────

    fn stage_clipboard(&mut self, op: ClipboardOp) -> Option<Status> {
        let panel = self.state.nav.active();
        let targets = panel.targets();
        if targets.is_empty() {
            return None;
        }
        let verb = match op {
            ClipboardOp::Copy => "Copied",
            ClipboardOp::Cut => "Cut",
        };
        let text = if panel.multi_selected.is_empty() {
            let name = panel.selected_entry().map(|e| e.name.as_str()).unwrap_or("");
            format!("{} {}", verb, name)
        } else {
            format!("{} {} file(s) to clipboard", verb, targets.len())
        };
        info!(op = op.label(), count = targets.len(), "staged clipboard");
        self.state.clipboard.stage(targets, op);
        Some(Status::info(text))
    }

    fn paste(&mut self) -> Status {
        let Some((sources, op)) = self.state.clipboard.resolve() else {
            return Status::error("Nothing to paste");
        };
        let sources = sources.to_vec();
        let dest_dir = self.state.nav.active().path.clone();

        let report = paste_batch(self.ops.as_ref(), &sources, op, &dest_dir);
        self.state.clipboard.complete_paste(op, report.succeeded);
        self.rescan();

        let verb = match op {
            ClipboardOp::Copy => "Copied",
            ClipboardOp::Cut => "Moved",
        };
        self.batch_status(verb, &report)
    }

    /// `VERB N file(s)`, with the capped error list appended.
    fn batch_status(&self, verb: &str, report: &BatchReport) -> Status {
        let done = (report.succeeded > 0).then(|| format!("{} {} file(s)", verb, report.succeeded));
        match (done, report.error_summary(self.config.max_reported_errors)) {
            (Some(done), None) => Status::info(done),
            (Some(done), Some(errors)) => Status::error(format!("{}. {}", done, errors)),
            (None, Some(errors)) => Status::error(errors),
            (None, None) => Status::info(format!("{} 0 file(s)", verb)),
        }
    }

    // ── Delete ──────────────────────────────────────────────────────────

    fn begin_delete(&mut self) -> Option<Status> {
        let targets = self.state.nav.active().targets();
        if targets.is_empty() {
            return None;
        }
        self.open_modal(Modal::ConfirmDelete { targets });
        None
    }

    /// First confirmation: `y` either escalates to the recursive prompt or
    /// deletes right away.
    fn confirm_delete(&mut self, key: &KeyEvent, targets: Vec<PathBuf>) -> Option<Status> {
        self.close_modal();
        if !is_yes(key) {
            return Some(Status::info("Delete cancelled"));
        }
        let non_empty: Vec<String> = targets
            .iter()
            .filter(|p| is_non_empty_dir(p))
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().to_string()))
            .collect();
        if non_empty.is_empty() {
            return Some(self.execute_delete(&targets));
        }
        self.open_modal(Modal::ConfirmRecursive { targets, non_empty });
        None
    }

    /// Second confirmation; declining cancels the whole batch.
    fn confirm_recursive(&mut self, key: &KeyEvent, targets: Vec<PathBuf>) -> Option<Status> {
        self.close_modal();
        if !is_yes(key) {
            return Some(Status::info("Delete cancelled"));
        }
        Some(self.execute_delete(&targets))
    }

    fn execute_delete(&mut self, targets: &[PathBuf]) -> Status {
        let report = delete_batch(self.ops.as_ref(), targets);
        self.rescan();
        self.batch_status("Deleted", &report)
    }

    // ── Rename / create ─────────────────────────────────────────────────

    fn begin_rename(&mut self) -> Option<Status> {
        let original = self.state.nav.active().selected_entry()?.name.clone();
        self.open_modal(InputPurpose::Rename { original }.into_modal());
        None
    }

    fn rename_entry(&mut self, original: &str, input: &str) -> Status {
        let new_name = input.trim();
        if new_name.is_empty() || new_name == original {
            return Status::info("Rename cancelled");
        }
        let Ok(new_name) = validate_name(new_name) else {
            return Status::error("Invalid file name");
        };
        let dir = self.state.nav.active().path.clone();
        match self.ops.rename(&dir.join(original), &dir.join(new_name)) {
            Ok(()) => {
                info!(from = original, to = new_name, "renamed");
                self.rescan();
                self.state
                    .nav
                    .active_mut()
                    .select_by_name(new_name, self.viewport_rows);
                Status::info(format!("Renamed '{}' to '{}'", original, new_name))
            }
            Err(FsError::AlreadyExists) => {
                Status::error(format!("File '{}' already exists", new_name))
            }
            Err(e) => Status::error(format!("Error renaming: {}", e)),
        }
    }

    fn create_entry(&mut self, input: &str, directory: bool) -> Status {
        let noun = if directory { "directory" } else { "file" };
        let name = input.trim();
        if name.is_empty() {
            return Status::info(if directory {
                "Directory creation cancelled"
            } else {
                "File creation cancelled"
            });
        }
        let Ok(name) = validate_name(name) else {
            return Status::error(format!("Invalid {} name", noun));
        };
        let path = self.state.nav.active().path.join(name);
        let result = if directory {
            self.ops.mkdir(&path)
        } else {
            self.ops.touch(&path)
        };
        match result {
            Ok(()) => {
                info!(path = %path.display(), "created {}", noun);
                self.rescan();
                self.state
                    .nav
                    .active_mut()
                    .select_by_name(name, self.viewport_rows);
                Status::info(format!("Created {} '{}'", noun, name))
            }
            Err(FsError::AlreadyExists) => {
                let kind = if directory { "Directory" } else { "File" };
                Status::error(format!("{} '{}' already exists", kind, name))
            }
            Err(e) => Status::error(format!("Error creating {}: {}", noun, e)),
        }
    }

    // ── Preview ─────────────────────────────────────────────────────────

    fn preview_selected(&mut self) -> Option<Status> {
        let path = self.state.nav.active().selected_path()?;
        match load_preview(&path) {
            Ok(content) => {
                self.open_modal(Modal::Preview { content, scroll: 0 });
                None
            }
            Err(e) => Some(Status::error(e.to_string())),
        }
    }

    // ── Modal input ─────────────────────────────────────────────────────

    /// Feed a key to the open modal. No-op in Normal mode.
    pub fn handle_modal_key(&mut self, key: KeyEvent) {
        let AppMode::Modal(modal) = std::mem::take(&mut self.mode) else {
            return;
        };
        let status = match modal {
            Modal::Input { purpose, mut input } => match input.handle_key(key) {
                InputOutcome::Pending => {
                    self.open_modal(Modal::Input { purpose, input });
                    None
                }
                InputOutcome::Cancelled => Some(Status::info(cancel_message(&purpose))),
                InputOutcome::Submitted(value) => Some(self.submit_input(purpose, &value)),
            },
            Modal::ConfirmDelete { targets } => self.confirm_delete(&key, targets),
            Modal::ConfirmRecursive { targets, .. } => self.confirm_recursive(&key, targets),
            Modal::Help { scroll } => {
                if let Some(delta) = scroll_delta(&key) {
                    let max = HelpOverlay::total_lines().saturating_sub(1);
                    let scroll = scroll.saturating_add_signed(delta).min(max);
                    self.open_modal(Modal::Help { scroll });
                }
                None
            }
            Modal::Preview { content, scroll } => {
                if let Some(delta) = scroll_delta(&key) {
                    let max = content.lines.len().saturating_sub(1);
                    let scroll = scroll.saturating_add_signed(delta).min(max);
                    self.open_modal(Modal::Preview { content, scroll });
                }
                None
            }
        };
        if let Some(status) = status {
            self.set_status(status);
        }
    }

    fn submit_input(&mut self, purpose: InputPurpose, value: &str) -> Status {
        match purpose {
            InputPurpose::Rename { original } => self.rename_entry(&original, value),
            InputPurpose::CreateFile => self.create_entry(value, false),
            InputPurpose::CreateDirectory => self.create_entry(value, true),
            InputPurpose::Search => self.apply_search(value),
            InputPurpose::Filter => self.apply_filter(value),
        }
    }
}

fn listing_error(error: FsError) -> Status {
    Status::error(format!("Error reading directory: {}", error))
}

fn cancel_message(purpose: &InputPurpose) -> &'static str {
    match purpose {
        InputPurpose::Rename { .. } => "Rename cancelled",
        InputPurpose::CreateFile => "File creation cancelled",
        InputPurpose::CreateDirectory => "Directory creation cancelled",
        InputPurpose::Search => "Search cancelled",
        InputPurpose::Filter => "Filter cancelled",
    }
}

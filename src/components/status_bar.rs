use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::fs::clipboard::Clipboard;
use crate::navigation::Navigation;
use crate::theme::ThemeColors;

/// Summary of the active panel: position, selection, hidden flag, overlay
/// and clipboard, followed by key hints.
pub fn status_text(nav: &Navigation, clipboard: &Clipboard) -> String {
    let panel = nav.active();
    let mut parts = Vec::new();

    if let Some(index) = nav.active_index() {
        parts.push(format!("Panel {}", index + 1));
    }
    parts.push(format!("Files: {}", panel.entries.len()));
    if !panel.multi_selected.is_empty() {
        parts.push(format!("Selected: {} files", panel.multi_selected.len()));
    } else if let Some(entry) = panel.selected_entry() {
        parts.push(format!("Current: {}", entry.name));
    }
    parts.push(format!(
        "Hidden: {}",
        if nav.show_hidden { "ON" } else { "OFF" }
    ));
    if let Some(overlay) = &panel.overlay {
        parts.push(overlay.label());
    }
    if let Some(clip) = clipboard.summary() {
        parts.push(clip);
    }
    if !nav.is_dual() {
        parts.push("F2=Dual".to_string());
    }
    parts.push("s=Search f=Filter".to_string());
    parts.push("? for help".to_string());
    parts.join(" | ")
}

/// Full-width status bar line.
pub struct StatusBarWidget<'a> {
    text: &'a str,
    theme: &'a ThemeColors,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(text: &'a str, theme: &'a ThemeColors) -> Self {
        Self { text, theme }
    }
}

impl<'a> Widget for StatusBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let width = area.width as usize;
        let style = Style::default()
            .bg(self.theme.status_bg)
            .fg(self.theme.status_fg);
        let display = format!("{:<width$}", self.text, width = width);
        let line = Line::from(Span::styled(display, style));
        buf.set_line(area.x, area.y, &line, area.width);
    }
}

/// Transient message line under the status bar.
pub struct MessageWidget<'a> {
    message: Option<(&'a str, bool)>,
    theme: &'a ThemeColors,
}

impl<'a> MessageWidget<'a> {
    pub fn new(theme: &'a ThemeColors) -> Self {
        Self {
            message: None,
            theme,
        }
    }

    pub fn message(mut self, text: &'a str, is_error: bool) -> Self {
        self.message = Some((text, is_error));
        self
    }
}

impl<'a> Widget for MessageWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some((text, is_error)) = self.message else {
            return;
        };
        if area.height == 0 || area.width == 0 {
            return;
        }
        let style = if is_error {
            Style::default()
                .fg(self.theme.error_fg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.theme.list_fg)
        };
        let line = Line::from(Span::styled(text, style));
        buf.set_line(area.x, area.y, &line, area.width);
    }
}

use chrono::{DateTime, Local};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::fs::listing::Entry;
use crate::panel::PanelState;
use crate::theme::ThemeColors;

const SIZE_WIDTH: usize = 8;
const DATE_WIDTH: usize = 16;
/// Marker, two separating spaces, size and date columns.
const FIXED_COLUMNS: usize = 2 + 1 + SIZE_WIDTH + 1 + DATE_WIDTH;
/// Below this many name columns the size/date columns are dropped.
const MIN_NAME_WIDTH: usize = 8;

/// One panel: a title row followed by the visible slice of entries.
pub struct PanelWidget<'a> {
    panel: &'a PanelState,
    theme: &'a ThemeColors,
    title: String,
    /// Highlight the title (active panel in dual mode).
    highlight_title: bool,
    /// Paint the cursor row.
    show_cursor: bool,
}

impl<'a> PanelWidget<'a> {
    pub fn new(panel: &'a PanelState, theme: &'a ThemeColors, title: String) -> Self {
        Self {
            panel,
            theme,
            title,
            highlight_title: false,
            show_cursor: true,
        }
    }

    pub fn highlight_title(mut self, on: bool) -> Self {
        self.highlight_title = on;
        self
    }

    pub fn show_cursor(mut self, on: bool) -> Self {
        self.show_cursor = on;
        self
    }

    fn entry_style(&self, entry: &Entry, is_cursor: bool, is_marked: bool) -> Style {
        if is_cursor {
            return Style::default()
                .bg(self.theme.list_selected_bg)
                .fg(self.theme.list_selected_fg)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED);
        }
        if is_marked {
            return Style::default()
                .fg(self.theme.list_marked_fg)
                .add_modifier(Modifier::BOLD);
        }
        if entry.is_dir {
            Style::default()
                .fg(self.theme.list_dir_fg)
                .add_modifier(Modifier::BOLD)
        } else if entry.is_executable() {
            Style::default().fg(self.theme.list_exec_fg)
        } else if entry.is_special() {
            Style::default().fg(self.theme.list_special_fg)
        } else {
            Style::default().fg(self.theme.list_fg)
        }
    }
}

impl<'a> Widget for PanelWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let title_style = if self.highlight_title {
            Style::default()
                .bg(self.theme.title_active_bg)
                .fg(self.theme.title_active_fg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .fg(self.theme.title_fg)
                .add_modifier(Modifier::BOLD)
        };
        let title = Line::from(Span::styled(self.title.as_str(), title_style));
        buf.set_line(area.x, area.y, &title, area.width);

        let rows = area.height.saturating_sub(1) as usize;
        let width = area.width as usize;
        let panel = self.panel;
        let visible = panel
            .entries
            .iter()
            .enumerate()
            .skip(panel.scroll_offset)
            .take(rows);

        for (row, (idx, entry)) in visible.enumerate() {
            let is_cursor = self.show_cursor && idx == panel.selected_index;
            let is_marked = panel.multi_selected.contains(&idx);
            let style = self.entry_style(entry, is_cursor, is_marked);
            let text = format_row(entry, is_marked, width);
            let line = Line::from(Span::styled(text, style));
            buf.set_line(area.x, area.y + 1 + row as u16, &line, area.width);
        }
    }
}

/// `* name...  size  date`, fitted to `width` columns.
pub fn format_row(entry: &Entry, marked: bool, width: usize) -> String {
    let marker = if marked { "* " } else { "  " };
    let name_width = width.saturating_sub(FIXED_COLUMNS);
    if name_width < MIN_NAME_WIDTH {
        let name = truncate_name(&entry.name, width.saturating_sub(2));
        return format!("{}{}", marker, name);
    }

    let size = if entry.is_dir {
        "<DIR>".to_string()
    } else {
        format_size(entry.size)
    };
    let name = truncate_name(&entry.name, name_width);
    format!(
        "{}{:<name_width$} {:>SIZE_WIDTH$} {}",
        marker,
        name,
        size,
        format_date(entry.modified),
    )
}

/// Shorten to `max` characters, ending in `...` when cut.
fn truncate_name(name: &str, max: usize) -> String {
    if name.chars().count() <= max {
        return name.to_string();
    }
    if max <= 3 {
        return name.chars().take(max).collect();
    }
    let head: String = name.chars().take(max - 3).collect();
    format!("{}...", head)
}

/// Bytes below 1 KiB as a plain count, larger sizes with one decimal and
/// a `K`/`M`/`G`/`T` suffix.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "K", "M", "G", "T"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        bytes.to_string()
    } else {
        format!("{:.1}{}", size, UNITS[unit])
    }
}

/// Local `YYYY-MM-DD HH:MM`, or `Unknown` for a zero timestamp.
pub fn format_date(timestamp: i64) -> String {
    if timestamp == 0 {
        return "Unknown".to_string();
    }
    match DateTime::from_timestamp(timestamp, 0) {
        Some(utc) => utc
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
            .to_string(),
        None => "Unknown".to_string(),
    }
}

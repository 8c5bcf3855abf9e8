use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Widget},
};

use crate::theme::ThemeColors;

/// A single keybinding entry for display.
struct KeyEntry {
    key: &'static str,
    description: &'static str,
}

/// A category of keybindings.
struct KeyCategory {
    name: &'static str,
    entries: &'static [KeyEntry],
}

const NAVIGATION_KEYS: &[KeyEntry] = &[
    KeyEntry {
        key: "j / ↓, k / ↑",
        description: "Move down / up",
    },
    KeyEntry {
        key: "PgDn / PgUp",
        description: "Move by one page",
    },
    KeyEntry {
        key: "g / Home",
        description: "Jump to first item",
    },
    KeyEntry {
        key: "G / End",
        description: "Jump to last item",
    },
    KeyEntry {
        key: "Enter / l / →",
        description: "Enter directory or open file",
    },
    KeyEntry {
        key: "Backspace / h / ←",
        description: "Go to parent directory",
    },
    KeyEntry {
        key: "o",
        description: "Open with default application",
    },
    KeyEntry {
        key: ".",
        description: "Toggle hidden files",
    },
];

const PANEL_KEYS: &[KeyEntry] = &[
    KeyEntry {
        key: "F2",
        description: "Toggle dual-panel mode",
    },
    KeyEntry {
        key: "Tab",
        description: "Switch active panel",
    },
];

const SELECTION_KEYS: &[KeyEntry] = &[
    KeyEntry {
        key: "Space",
        description: "Toggle multi-select",
    },
    KeyEntry {
        key: "a",
        description: "Select all",
    },
    KeyEntry {
        key: "A",
        description: "Clear selection",
    },
];

const FILE_OPS_KEYS: &[KeyEntry] = &[
    KeyEntry {
        key: "c",
        description: "Copy to clipboard",
    },
    KeyEntry {
        key: "x",
        description: "Cut to clipboard",
    },
    KeyEntry {
        key: "v",
        description: "Paste into current directory",
    },
    KeyEntry {
        key: "d",
        description: "Delete (with confirmation)",
    },
    KeyEntry {
        key: "r",
        description: "Rename item",
    },
    KeyEntry {
        key: "n",
        description: "Create new file",
    },
    KeyEntry {
        key: "m",
        description: "Create new directory",
    },
];

const SEARCH_FILTER_KEYS: &[KeyEntry] = &[
    KeyEntry {
        key: "s",
        description: "Search by name",
    },
    KeyEntry {
        key: "f",
        description: "Filter by extension",
    },
    KeyEntry {
        key: "\\",
        description: "Clear search / filter",
    },
    KeyEntry {
        key: "Esc",
        description: "Clear search / filter, or quit",
    },
];

const GENERAL_KEYS: &[KeyEntry] = &[
    KeyEntry {
        key: "p",
        description: "Preview text file",
    },
    KeyEntry {
        key: "F5",
        description: "Refresh panels",
    },
    KeyEntry {
        key: "?",
        description: "Show this help",
    },
    KeyEntry {
        key: "q / Ctrl+C",
        description: "Quit",
    },
];

const CATEGORIES: &[KeyCategory] = &[
    KeyCategory {
        name: "Navigation",
        entries: NAVIGATION_KEYS,
    },
    KeyCategory {
        name: "Panels",
        entries: PANEL_KEYS,
    },
    KeyCategory {
        name: "Selection",
        entries: SELECTION_KEYS,
    },
    KeyCategory {
        name: "File Operations",
        entries: FILE_OPS_KEYS,
    },
    KeyCategory {
        name: "Search & Filter",
        entries: SEARCH_FILTER_KEYS,
    },
    KeyCategory {
        name: "General",
        entries: GENERAL_KEYS,
    },
];

/// Help overlay widget showing all keybindings.
pub struct HelpOverlay<'a> {
    theme: &'a ThemeColors,
    scroll_offset: usize,
}

impl<'a> HelpOverlay<'a> {
    pub fn new(theme: &'a ThemeColors, scroll_offset: usize) -> Self {
        Self {
            theme,
            scroll_offset,
        }
    }

    fn build_content_lines(&self) -> Vec<Line<'static>> {
        let mut lines: Vec<Line<'static>> = Vec::new();

        lines.push(Line::from(vec![Span::styled(
            " Keybinding Reference ",
            Style::default()
                .fg(self.theme.accent_fg)
                .add_modifier(Modifier::BOLD),
        )]));
        lines.push(Line::from(""));

        for category in CATEGORIES {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("── {} ", category.name),
                    Style::default()
                        .fg(self.theme.accent_fg)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled("─".repeat(30), Style::default().fg(self.theme.dim_fg)),
            ]));

            for entry in category.entries {
                let key_padded = format!("  {:<20}", entry.key);
                lines.push(Line::from(vec![
                    Span::styled(
                        key_padded,
                        Style::default()
                            .fg(self.theme.warning_fg)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(entry.description, Style::default().fg(self.theme.list_fg)),
                ]));
            }

            lines.push(Line::from(""));
        }

        lines.push(Line::from(vec![Span::styled(
            " j/k scroll, any other key closes ",
            Style::default().fg(self.theme.dim_fg),
        )]));

        lines
    }

    /// Get total number of content lines (for scroll bounds).
    pub fn total_lines() -> usize {
        let mut count = 2; // title + blank
        for category in CATEGORIES {
            count += 1; // header
            count += category.entries.len();
            count += 1; // blank separator
        }
        count += 1; // footer
        count
    }
}

impl<'a> Widget for HelpOverlay<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // 70% width, 80% height
        let overlay_width = (area.width as f32 * 0.70).clamp(0.0, 72.0) as u16;
        let overlay_height = (area.height as f32 * 0.80).clamp(0.0, 50.0) as u16;
        if overlay_width < 3 || overlay_height < 3 {
            return;
        }

        let x = area.x + (area.width.saturating_sub(overlay_width)) / 2;
        let y = area.y + (area.height.saturating_sub(overlay_height)) / 2;
        let overlay_area = Rect::new(x, y, overlay_width, overlay_height);

        Clear.render(overlay_area, buf);

        let block = Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.dialog_border_fg));

        let inner = block.inner(overlay_area);
        block.render(overlay_area, buf);

        let content_lines = self.build_content_lines();
        let visible_height = inner.height as usize;
        let scroll = self
            .scroll_offset
            .min(content_lines.len().saturating_sub(visible_height));

        for (i, line) in content_lines
            .iter()
            .skip(scroll)
            .take(visible_height)
            .enumerate()
        {
            buf.set_line(
                inner.x + 1,
                inner.y + i as u16,
                line,
                inner.width.saturating_sub(2),
            );
        }

        if content_lines.len() > visible_height {
            let total = content_lines.len();
            let indicator = format!(" {}/{} ", scroll + 1, total);
            let ind_span = Span::styled(indicator, Style::default().fg(self.theme.dim_fg));
            let ind_x = overlay_area.x
                + overlay_area
                    .width
                    .saturating_sub(ind_span.width() as u16 + 1);
            let ind_y = overlay_area.y + overlay_area.height - 1;
            buf.set_span(ind_x, ind_y, &ind_span, ind_span.width() as u16);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_to_string(buf: &Buffer, area: Rect) -> String {
        let mut s = String::new();
        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                s.push_str(buf.cell((x, y)).unwrap().symbol());
            }
            s.push('\n');
        }
        s
    }

    #[test]
    fn all_categories_have_entries() {
        for cat in CATEGORIES {
            assert!(
                !cat.entries.is_empty(),
                "Category '{}' has no entries",
                cat.name
            );
        }
    }

    #[test]
    fn content_lines_match_total() {
        let theme = crate::theme::dark_theme();
        let overlay = HelpOverlay::new(&theme, 0);
        let lines = overlay.build_content_lines();
        assert_eq!(lines.len(), HelpOverlay::total_lines());
    }

    #[test]
    fn renders_top_of_reference() {
        let theme = crate::theme::dark_theme();
        let area = Rect::new(0, 0, 100, 60);
        let mut buf = Buffer::empty(area);
        HelpOverlay::new(&theme, 0).render(area, &mut buf);
        let content = buffer_to_string(&buf, area);
        assert!(content.contains("Help"));
        assert!(content.contains("Keybinding Reference"));
        assert!(content.contains("Toggle dual-panel mode"));
    }

    #[test]
    fn scrolling_hides_leading_lines() {
        let theme = crate::theme::dark_theme();
        let area = Rect::new(0, 0, 100, 20);
        let mut buf = Buffer::empty(area);
        HelpOverlay::new(&theme, 5).render(area, &mut buf);
        let content = buffer_to_string(&buf, area);
        assert!(!content.contains("Keybinding Reference"));
        assert!(content.contains(&format!(" 6/{} ", HelpOverlay::total_lines())));
    }

    #[test]
    fn excessive_scroll_is_clamped() {
        let theme = crate::theme::dark_theme();
        let area = Rect::new(0, 0, 100, 20);
        let mut buf = Buffer::empty(area);
        HelpOverlay::new(&theme, 10_000).render(area, &mut buf);
        assert!(buffer_to_string(&buf, area).contains("any other key closes"));
    }

    #[test]
    fn tiny_area_does_not_panic() {
        let theme = crate::theme::dark_theme();
        let area = Rect::new(0, 0, 3, 2);
        let mut buf = Buffer::empty(area);
        HelpOverlay::new(&theme, 0).render(area, &mut buf);
    }
}

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Widget},
};

use crate::preview::PreviewContent;
use crate::theme::ThemeColors;

const FOOTER: &str = "j/k to scroll, any other key to close preview";

/// Full-screen text preview: title row, file lines from `scroll`, footer.
pub struct PreviewWidget<'a> {
    content: &'a PreviewContent,
    scroll: usize,
    theme: &'a ThemeColors,
}

impl<'a> PreviewWidget<'a> {
    pub fn new(content: &'a PreviewContent, scroll: usize, theme: &'a ThemeColors) -> Self {
        Self {
            content,
            scroll,
            theme,
        }
    }
}

impl<'a> Widget for PreviewWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        Clear.render(area, buf);

        let accent = Style::default()
            .fg(self.theme.accent_fg)
            .add_modifier(Modifier::BOLD);
        let mut title = format!("Preview: {}", self.content.name);
        if self.content.truncated {
            title.push_str(" (first 4 KiB)");
        }
        buf.set_line(
            area.x,
            area.y,
            &Line::from(Span::styled(title, accent)),
            area.width,
        );

        if area.height > 1 {
            let footer = Line::from(Span::styled(FOOTER, Style::default().fg(self.theme.accent_fg)));
            buf.set_line(area.x, area.y + area.height - 1, &footer, area.width);
        }

        // Rows between the title and a blank line above the footer
        let body_rows = area.height.saturating_sub(3) as usize;
        let text_style = Style::default().fg(self.theme.list_fg);
        for (i, text) in self
            .content
            .lines
            .iter()
            .skip(self.scroll)
            .take(body_rows)
            .enumerate()
        {
            let line = Line::from(Span::styled(text.as_str(), text_style));
            buf.set_line(area.x, area.y + 1 + i as u16, &line, area.width);
        }
    }
}

use std::path::PathBuf;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Widget},
};

use crate::modal::{InputPurpose, Modal, TextInput};
use crate::theme::ThemeColors;

/// Centered overlay for text prompts and delete confirmations.
pub struct DialogWidget<'a> {
    modal: &'a Modal,
    theme: &'a ThemeColors,
}

impl<'a> DialogWidget<'a> {
    pub fn new(modal: &'a Modal, theme: &'a ThemeColors) -> Self {
        Self { modal, theme }
    }
}

/// Calculate a centered rectangle within the given area.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width - w) / 2;
    let y = area.y + (area.height - h) / 2;
    Rect::new(x, y, w, h)
}

impl<'a> Widget for DialogWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.modal {
            Modal::Input { purpose, input } => {
                render_input_dialog(purpose, input, self.theme, area, buf);
            }
            Modal::ConfirmDelete { targets } => {
                let names = file_names(targets);
                render_confirm_dialog(
                    " Delete Confirmation ",
                    &format!("Delete {} item(s)?", names.len()),
                    &names,
                    self.theme,
                    area,
                    buf,
                );
            }
            Modal::ConfirmRecursive { non_empty, .. } => {
                render_confirm_dialog(
                    " Delete Non-Empty Directories ",
                    "These directories are not empty. Delete everything inside?",
                    non_empty,
                    self.theme,
                    area,
                    buf,
                );
            }
            Modal::Help { .. } | Modal::Preview { .. } => {}
        }
    }
}

fn file_names(targets: &[PathBuf]) -> Vec<String> {
    targets
        .iter()
        .map(|p| {
            p.file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| p.to_string_lossy().to_string())
        })
        .collect()
}

fn render_input_dialog(
    purpose: &InputPurpose,
    input: &TextInput,
    theme: &ThemeColors,
    area: Rect,
    buf: &mut Buffer,
) {
    let dialog_width = 56.min(area.width.saturating_sub(4));
    let dialog_height = 5;
    let rect = centered_rect(dialog_width, dialog_height, area);

    Clear.render(rect, buf);

    let block = Block::default()
        .title(format!(" {} ", purpose.title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.dialog_border_fg))
        .padding(Padding::horizontal(1));

    let inner = block.inner(rect);
    block.render(rect, buf);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    // Input line with a block cursor
    let value = input.value();
    let (before, rest) = value.split_at(input.cursor());
    let mut rest_chars = rest.chars();
    let cursor_char = rest_chars
        .next()
        .map(|c| c.to_string())
        .unwrap_or_else(|| " ".to_string());
    let after = rest_chars.as_str();

    // Keep the cursor in view by dropping characters from the left
    let max_width = inner.width as usize;
    let before_len = before.chars().count();
    let before_display: String = if before_len + 1 > max_width {
        before.chars().skip(before_len + 1 - max_width).collect()
    } else {
        before.to_string()
    };

    let input_style = Style::default().fg(theme.list_fg);
    let cursor_style = Style::default()
        .bg(theme.list_fg)
        .fg(theme.title_active_fg)
        .add_modifier(Modifier::BOLD);

    let line = Line::from(vec![
        Span::styled(before_display, input_style),
        Span::styled(cursor_char, cursor_style),
        Span::styled(after, input_style),
    ]);
    buf.set_line(inner.x, inner.y + inner.height / 2, &line, inner.width);

    let hint = "[Enter] Confirm  [Esc] Cancel";
    let hint_style = Style::default()
        .fg(theme.dim_fg)
        .add_modifier(Modifier::DIM);
    if inner.height > 1 {
        let hint_line = Line::from(Span::styled(hint, hint_style));
        buf.set_line(inner.x, inner.y + inner.height - 1, &hint_line, inner.width);
    }
}

fn render_confirm_dialog(
    title: &str,
    question: &str,
    names: &[String],
    theme: &ThemeColors,
    area: Rect,
    buf: &mut Buffer,
) {
    let longest = names
        .iter()
        .map(|n| n.chars().count())
        .chain(std::iter::once(question.chars().count()))
        .max()
        .unwrap_or(10);

    let dialog_width = (longest as u16 + 8)
        .max(40)
        .min(area.width.saturating_sub(4));
    let dialog_height = (names.len() as u16 + 6).min(area.height.saturating_sub(2));
    let rect = centered_rect(dialog_width, dialog_height, area);

    Clear.render(rect, buf);

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.danger_border_fg))
        .padding(Padding::horizontal(1));

    let inner = block.inner(rect);
    block.render(rect, buf);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let header = Line::from(Span::styled(
        question,
        Style::default()
            .fg(theme.warning_fg)
            .add_modifier(Modifier::BOLD),
    ));
    buf.set_line(inner.x, inner.y, &header, inner.width);

    let max_items = inner.height.saturating_sub(3) as usize;
    for (i, name) in names.iter().take(max_items).enumerate() {
        let line = Line::from(Span::styled(
            format!("  • {}", name),
            Style::default().fg(theme.list_fg),
        ));
        buf.set_line(inner.x, inner.y + 2 + i as u16, &line, inner.width);
    }
    if names.len() > max_items && max_items > 0 {
        let more = Line::from(Span::styled(
            format!("  … and {} more", names.len() - max_items),
            Style::default().fg(theme.dim_fg),
        ));
        let y = inner.y + 1 + max_items as u16;
        buf.set_line(inner.x, y, &more, inner.width);
    }

    let hint = "[y] Yes  [any other key] Cancel";
    let hint_style = Style::default()
        .fg(theme.dim_fg)
        .add_modifier(Modifier::DIM);
    let hint_line = Line::from(Span::styled(hint, hint_style));
    buf.set_line(inner.x, inner.y + inner.height - 1, &hint_line, inner.width);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme;

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

    fn render(modal: &Modal) -> String {
        let tc = theme::dark_theme();
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        DialogWidget::new(modal, &tc).render(area, &mut buf);
        buffer_to_string(&buf, area)
    }

    #[test]
    fn input_dialog_renders() {
        let mut modal = InputPurpose::CreateFile.into_modal();
        if let Modal::Input { input, .. } = &mut modal {
            for c in "test.txt".chars() {
                input.insert(c);
            }
        }
        let content = render(&modal);
        assert!(content.contains("Create New File"));
        assert!(content.contains("test.txt"));
        assert!(content.contains("[Enter] Confirm"));
    }

    #[test]
    fn rename_dialog_shows_prefilled_name() {
        let modal = InputPurpose::Rename {
            original: "old_name.txt".into(),
        }
        .into_modal();
        let content = render(&modal);
        assert!(content.contains("Rename"));
        assert!(content.contains("old_name.txt"));
    }

    #[test]
    fn filter_dialog_title() {
        let content = render(&InputPurpose::Filter.into_modal());
        assert!(content.contains("Filter by Extension"));
    }

    #[test]
    fn confirm_dialog_lists_targets() {
        let modal = Modal::ConfirmDelete {
            targets: vec![
                PathBuf::from("/tmp/file1.txt"),
                PathBuf::from("/tmp/file2.txt"),
            ],
        };
        let content = render(&modal);
        assert!(content.contains("Delete 2 item(s)?"));
        assert!(content.contains("file1.txt"));
        assert!(content.contains("file2.txt"));
    }

    #[test]
    fn recursive_dialog_lists_non_empty_dirs() {
        let modal = Modal::ConfirmRecursive {
            targets: vec![PathBuf::from("/tmp/src"), PathBuf::from("/tmp/a.txt")],
            non_empty: vec!["src".into()],
        };
        let content = render(&modal);
        assert!(content.contains("Non-Empty"));
        assert!(content.contains("• src"));
        assert!(!content.contains("a.txt"));
    }

    #[test]
    fn long_input_keeps_cursor_visible() {
        let mut modal = InputPurpose::Search.into_modal();
        if let Modal::Input { input, .. } = &mut modal {
            for c in "x".repeat(45).chars() {
                input.insert(c);
            }
            input.insert('Z');
        }
        let tc = theme::dark_theme();
        let area = Rect::new(0, 0, 30, 10);
        let mut buf = Buffer::empty(area);
        DialogWidget::new(&modal, &tc).render(area, &mut buf);
        assert!(buffer_to_string(&buf, area).contains("xZ"));
    }

    #[test]
    fn help_modal_is_not_a_dialog() {
        let content = render(&Modal::Help { scroll: 0 });
        assert!(content.trim().is_empty());
    }

    #[test]
    fn centered_rect_fits_small_area() {
        let rect = centered_rect(50, 10, Rect::new(0, 0, 20, 5));
        assert_eq!(rect, Rect::new(0, 0, 20, 5));
        let rect = centered_rect(10, 4, Rect::new(0, 0, 20, 10));
        assert_eq!(rect, Rect::new(5, 3, 10, 4));
    }
}

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    widgets::{Block, Borders},
    Frame,
};

use crate::app::{App, AppMode};
use crate::components::dialog::DialogWidget;
use crate::components::help::HelpOverlay;
use crate::components::panel::PanelWidget;
use crate::components::preview::PreviewWidget;
use crate::components::status_bar::{status_text, MessageWidget, StatusBarWidget};
use crate::modal::Modal;
use crate::theme::ThemeColors;

/// Rows below the panels: status bar and message line.
const FOOTER_ROWS: u16 = 2;

/// Entry rows available to a panel for a terminal of `height` rows:
/// everything except the title row, status bar and message line.
pub fn list_rows(height: u16) -> usize {
    height.saturating_sub(FOOTER_ROWS + 1).max(1) as usize
}

/// Render the application UI.
pub fn render(app: &App, frame: &mut Frame) {
    let theme = ThemeColors::default();
    let area = frame.area();

    let [panels_area, status_area, message_area] = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);

    render_panels(app, &theme, panels_area, frame);

    let status = status_text(&app.state.nav, &app.state.clipboard);
    frame.render_widget(StatusBarWidget::new(&status, &theme), status_area);

    let mut message = MessageWidget::new(&theme);
    if let Some((status, _)) = &app.status_message {
        message = message.message(&status.text, status.is_error);
    }
    frame.render_widget(message, message_area);

    if let AppMode::Modal(modal) = &app.mode {
        match modal {
            Modal::Help { scroll } => {
                frame.render_widget(HelpOverlay::new(&theme, *scroll), area);
            }
            Modal::Preview { content, scroll } => {
                frame.render_widget(PreviewWidget::new(content, *scroll, &theme), area);
            }
            _ => frame.render_widget(DialogWidget::new(modal, &theme), area),
        }
    }
}

fn render_panels(app: &App, theme: &ThemeColors, area: Rect, frame: &mut Frame) {
    let nav = &app.state.nav;
    let Some(active) = nav.active_index() else {
        let panel = nav.active();
        let title = format!("File Manager - {}", panel.path.display());
        frame.render_widget(PanelWidget::new(panel, theme, title), area);
        return;
    };

    let [left_area, right_area] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(area);

    // Separator column on the right edge of the left panel
    let separator = Block::default()
        .borders(Borders::RIGHT)
        .border_style(Style::default().fg(theme.border_fg));
    let left_inner = separator.inner(left_area);
    frame.render_widget(separator, left_area);

    let areas = [left_inner, right_area];
    for (idx, (panel, panel_area)) in nav.panels().iter().zip(areas).enumerate() {
        let side = if idx == 0 { "L" } else { "R" };
        let title = format!("{}: {}", side, panel.path.display());
        let widget = PanelWidget::new(panel, theme, title)
            .highlight_title(idx == active)
            .show_cursor(idx == active);
        frame.render_widget(widget, panel_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Command;
    use crate::config::AppConfig;
    use crate::modal::InputPurpose;
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};
    use std::fs::File;
    use tempfile::TempDir;

    fn row(buf: &Buffer, y: u16) -> String {
        row_from(buf, 0, y)
    }

    fn row_from(buf: &Buffer, x0: u16, y: u16) -> String {
        (x0..buf.area.width)
            .map(|x| buf.cell((x, y)).unwrap().symbol().to_string())
            .collect()
    }

    fn setup() -> (TempDir, App) {
        let dir = TempDir::new().unwrap();
        File::create(dir.path().join("alpha.txt")).unwrap();
        File::create(dir.path().join("beta.txt")).unwrap();
        std::fs::create_dir(dir.path().join("docs")).unwrap();
        let config = AppConfig {
            start_dir: dir.path().to_path_buf(),
            ..AppConfig::default()
        };
        let mut app = App::new(config);
        app.set_viewport(list_rows(10));
        (dir, app)
    }

    fn draw(app: &App, width: u16, height: u16) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();
        terminal.backend().buffer().clone()
    }

    #[test]
    fn list_rows_leaves_title_and_footer() {
        assert_eq!(list_rows(24), 21);
        assert_eq!(list_rows(4), 1);
        assert_eq!(list_rows(0), 1);
    }

    #[test]
    fn single_mode_layout() {
        let (dir, app) = setup();
        let buf = draw(&app, 80, 10);
        let title = format!("File Manager - {}", dir.path().display());
        assert!(row(&buf, 0).starts_with(&title));
        assert!(row(&buf, 1).starts_with("  docs"));
        assert!(row(&buf, 2).starts_with("  alpha.txt"));
        assert!(row(&buf, 8).starts_with("Files: 3 | Current: docs"));
    }

    #[test]
    fn dual_mode_shows_both_titles() {
        let (dir, mut app) = setup();
        app.dispatch(Command::ToggleDual);
        app.dispatch(Command::SwitchPanel);
        let buf = draw(&app, 80, 10);
        assert!(row(&buf, 0).starts_with("L: "));
        let right_title = format!("R: {}", dir.path().display());
        let shown: String = right_title.chars().take(40).collect();
        assert!(row_from(&buf, 40, 0).starts_with(&shown));
        assert_eq!(buf.cell((39, 3)).unwrap().symbol(), "│");
        assert!(row(&buf, 8).starts_with("Panel 2 |"));
    }

    #[test]
    fn status_message_on_last_row() {
        let (_dir, mut app) = setup();
        app.dispatch(Command::SwitchPanel);
        let buf = draw(&app, 80, 10);
        assert!(row(&buf, 9).starts_with("Tab only works in dual panel mode"));
    }

    #[test]
    fn input_modal_is_drawn_over_panels() {
        let (_dir, mut app) = setup();
        app.mode = AppMode::Modal(InputPurpose::CreateDirectory.into_modal());
        let buf = draw(&app, 80, 12);
        let all: String = (0..12).map(|y| row(&buf, y)).collect();
        assert!(all.contains("Create New Directory"));
    }

    #[test]
    fn help_modal_is_drawn() {
        let (_dir, mut app) = setup();
        app.dispatch(Command::Help);
        let buf = draw(&app, 100, 40);
        let all: String = (0..40).map(|y| row(&buf, y)).collect();
        assert!(all.contains("Keybinding Reference"));
    }

    #[test]
    fn tiny_terminal_does_not_panic() {
        let (_dir, mut app) = setup();
        draw(&app, 5, 2);
        app.dispatch(Command::ToggleDual);
        draw(&app, 3, 3);
    }
}

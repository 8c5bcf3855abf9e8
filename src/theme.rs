//! Built-in color palette (Catppuccin Mocha).

use ratatui::style::Color;

/// All runtime colors used in the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeColors {
    // File list
    pub list_fg: Color,
    pub list_selected_bg: Color,
    pub list_selected_fg: Color,
    pub list_marked_fg: Color,
    pub list_dir_fg: Color,
    pub list_exec_fg: Color,
    pub list_special_fg: Color,

    // Titles
    pub title_fg: Color,
    pub title_active_bg: Color,
    pub title_active_fg: Color,

    // Status bar
    pub status_bg: Color,
    pub status_fg: Color,

    // Borders & chrome
    pub border_fg: Color,

    // Dialogs
    pub dialog_border_fg: Color,
    pub danger_border_fg: Color,

    // Semantic colors
    pub error_fg: Color,
    pub warning_fg: Color,
    pub accent_fg: Color,
    pub dim_fg: Color,
}

impl Default for ThemeColors {
    fn default() -> Self {
        dark_theme()
    }
}

/// Dark theme using the Catppuccin Mocha palette.
pub fn dark_theme() -> ThemeColors {
    ThemeColors {
        list_fg: Color::Rgb(205, 214, 244),          // #cdd6f4 (text)
        list_selected_bg: Color::Rgb(69, 71, 90),    // #45475a (surface1)
        list_selected_fg: Color::Rgb(205, 214, 244), // #cdd6f4
        list_marked_fg: Color::Rgb(249, 226, 175),   // #f9e2af (yellow)
        list_dir_fg: Color::Rgb(137, 180, 250),      // #89b4fa (blue)
        list_exec_fg: Color::Rgb(166, 227, 161),     // #a6e3a1 (green)
        list_special_fg: Color::Rgb(245, 194, 231),  // #f5c2e7 (pink)

        title_fg: Color::Rgb(203, 166, 247),         // #cba6f7 (mauve)
        title_active_bg: Color::Rgb(203, 166, 247),
        title_active_fg: Color::Rgb(30, 30, 46),     // #1e1e2e (base)

        status_bg: Color::Rgb(49, 50, 68),           // #313244 (surface0)
        status_fg: Color::Rgb(205, 214, 244),

        border_fg: Color::Rgb(88, 91, 112),          // #585b70 (surface2)

        dialog_border_fg: Color::Rgb(137, 180, 250),
        danger_border_fg: Color::Rgb(243, 139, 168), // #f38ba8 (red)

        error_fg: Color::Rgb(243, 139, 168),
        warning_fg: Color::Rgb(249, 226, 175),
        accent_fg: Color::Rgb(203, 166, 247),
        dim_fg: Color::Rgb(108, 112, 134),           // #6c7086 (overlay0)
    }
}

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{App, AppMode, Command};

/// Handle a key event.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    if matches!(app.mode, AppMode::Modal(_)) {
        app.handle_modal_key(key);
        return;
    }
    if let Some(command) = map_key(key) {
        app.dispatch(command);
    }
}

/// Normal-mode key bindings.
pub fn map_key(key: KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Command::Quit),
            _ => None,
        };
    }
    let command = match key.code {
        KeyCode::Up | KeyCode::Char('k') => Command::MoveUp,
        KeyCode::Down | KeyCode::Char('j') => Command::MoveDown,
        KeyCode::PageUp => Command::PageUp,
        KeyCode::PageDown => Command::PageDown,
        KeyCode::Home | KeyCode::Char('g') => Command::First,
        KeyCode::End | KeyCode::Char('G') => Command::Last,
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Backspace => Command::Parent,
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Enter => Command::Enter,
        KeyCode::Char('o') => Command::Open,
        KeyCode::Char('c') => Command::Copy,
        KeyCode::Char('x') => Command::Cut,
        KeyCode::Char('v') => Command::Paste,
        KeyCode::Char('d') => Command::Delete,
        KeyCode::Char('r') => Command::Rename,
        KeyCode::Char('n') => Command::CreateFile,
        KeyCode::Char('m') => Command::CreateDirectory,
        KeyCode::Char(' ') => Command::ToggleSelect,
        KeyCode::Char('a') => Command::SelectAll,
        KeyCode::Char('A') => Command::ClearSelection,
        KeyCode::F(2) => Command::ToggleDual,
        KeyCode::Tab => Command::SwitchPanel,
        KeyCode::Char('s') => Command::Search,
        KeyCode::Char('f') => Command::Filter,
        KeyCode::Char('\\') => Command::ClearOverlay,
        KeyCode::Esc => Command::Escape,
        KeyCode::Char('p') => Command::Preview,
        KeyCode::Char('.') => Command::ToggleHidden,
        KeyCode::F(5) => Command::Refresh,
        KeyCode::Char('?') => Command::Help,
        KeyCode::Char('q') => Command::Quit,
        _ => return None,
    };
    Some(command)
}

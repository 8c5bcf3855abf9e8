use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::config::{MAX_EXTENSION_LEN, MAX_NAME_LEN};
use crate::preview::PreviewContent;

/// What a text prompt is collecting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputPurpose {
    Rename { original: String },
    CreateFile,
    CreateDirectory,
    Search,
    Filter,
}

impl InputPurpose {
    pub fn title(&self) -> &'static str {
        match self {
            InputPurpose::Rename { .. } => "Rename",
            InputPurpose::CreateFile => "Create New File",
            InputPurpose::CreateDirectory => "Create New Directory",
            InputPurpose::Search => "Search",
            InputPurpose::Filter => "Filter by Extension",
        }
    }

    pub fn max_len(&self) -> usize {
        match self {
            InputPurpose::Filter => MAX_EXTENSION_LEN,
            _ => MAX_NAME_LEN,
        }
    }

    /// Open a prompt for this purpose; rename starts with the current name.
    pub fn into_modal(self) -> Modal {
        let input = match &self {
            InputPurpose::Rename { original } => TextInput::with_value(original, self.max_len()),
            _ => TextInput::new(self.max_len()),
        };
        Modal::Input {
            purpose: self,
            input,
        }
    }
}

/// Single-line text editor with a byte cursor and a character limit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    cursor: usize,
    max_len: usize,
}

/// Result of feeding one key to a [`TextInput`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputOutcome {
    Pending,
    Submitted(String),
    Cancelled,
}

impl TextInput {
    pub fn new(max_len: usize) -> Self {
        Self {
            value: String::new(),
            cursor: 0,
            max_len,
        }
    }

    /// Prefilled input with the cursor at the end. Truncated to `max_len`.
    pub fn with_value(value: &str, max_len: usize) -> Self {
        let value: String = value.chars().take(max_len).collect();
        Self {
            cursor: value.len(),
            value,
            max_len,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Cursor position in bytes.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Insert at the cursor. Ignored once `max_len` characters are reached.
    pub fn insert(&mut self, c: char) {
        if self.value.chars().count() >= self.max_len {
            return;
        }
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        if let Some(prev) = self.value[..self.cursor].chars().next_back() {
            self.cursor -= prev.len_utf8();
            self.value.remove(self.cursor);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.value.len() {
            self.value.remove(self.cursor);
        }
    }

    pub fn move_left(&mut self) {
        if let Some(prev) = self.value[..self.cursor].chars().next_back() {
            self.cursor -= prev.len_utf8();
        }
    }

    pub fn move_right(&mut self) {
        if let Some(next) = self.value[self.cursor..].chars().next() {
            self.cursor += next.len_utf8();
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.value.len();
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> InputOutcome {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Enter => return InputOutcome::Submitted(self.value.clone()),
            KeyCode::Esc => return InputOutcome::Cancelled,
            KeyCode::Char('a') if ctrl => self.home(),
            KeyCode::Char('e') if ctrl => self.end(),
            KeyCode::Char(_) if ctrl => {}
            KeyCode::Char(c) => self.insert(c),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),
            KeyCode::Home => self.home(),
            KeyCode::End => self.end(),
            _ => {}
        }
        InputOutcome::Pending
    }
}

/// A modal that captures every key until it resolves.
#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    Input {
        purpose: InputPurpose,
        input: TextInput,
    },
    /// First delete confirmation.
    ConfirmDelete { targets: Vec<PathBuf> },
    /// Second confirmation, required when any target is a non-empty directory.
    ConfirmRecursive {
        targets: Vec<PathBuf>,
        non_empty: Vec<String>,
    },
    Help { scroll: usize },
    Preview {
        content: PreviewContent,
        scroll: usize,
    },
}

/// `y` or `Y`; every other key declines a confirmation.
pub fn is_yes(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y'))
}

/// Scroll delta for the read-only modals, or `None` for a closing key.
pub fn scroll_delta(key: &KeyEvent) -> Option<isize> {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => Some(1),
        KeyCode::Char('k') | KeyCode::Up => Some(-1),
        KeyCode::PageDown => Some(10),
        KeyCode::PageUp => Some(-10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn typed(text: &str, max_len: usize) -> TextInput {
        let mut input = TextInput::new(max_len);
        for c in text.chars() {
            input.insert(c);
        }
        input
    }

    #[test]
    fn insert_and_backspace() {
        let mut input = typed("abc", 10);
        assert_eq!(input.value(), "abc");
        assert_eq!(input.cursor(), 3);
        input.backspace();
        assert_eq!(input.value(), "ab");
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn backspace_at_start_is_noop() {
        let mut input = TextInput::new(10);
        input.backspace();
        assert_eq!(input.value(), "");
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn insert_in_middle() {
        let mut input = typed("ac", 10);
        input.move_left();
        input.insert('b');
        assert_eq!(input.value(), "abc");
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn delete_under_cursor() {
        let mut input = typed("abc", 10);
        input.home();
        input.delete();
        assert_eq!(input.value(), "bc");
        input.end();
        input.delete();
        assert_eq!(input.value(), "bc");
    }

    #[test]
    fn cursor_handles_multibyte_chars() {
        let mut input = typed("añb", 10);
        input.move_left();
        input.move_left();
        assert_eq!(input.cursor(), 1);
        input.move_right();
        assert_eq!(input.cursor(), 3);
        input.backspace();
        assert_eq!(input.value(), "ab");
    }

    #[test]
    fn max_len_caps_characters() {
        let input = typed("abcdef", 4);
        assert_eq!(input.value(), "abcd");
    }

    #[test]
    fn prefilled_value_puts_cursor_at_end() {
        let input = TextInput::with_value("hello.txt", 50);
        assert_eq!(input.value(), "hello.txt");
        assert_eq!(input.cursor(), 9);
    }

    #[test]
    fn enter_submits_and_esc_cancels() {
        let mut input = typed("x", 10);
        assert_eq!(
            input.handle_key(key(KeyCode::Enter)),
            InputOutcome::Submitted("x".into())
        );
        assert_eq!(input.handle_key(key(KeyCode::Esc)), InputOutcome::Cancelled);
    }

    #[test]
    fn ctrl_shortcuts_move_cursor() {
        let mut input = typed("abc", 10);
        let ctrl_a = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL);
        assert_eq!(input.handle_key(ctrl_a), InputOutcome::Pending);
        assert_eq!(input.cursor(), 0);
        assert_eq!(input.value(), "abc");
        let ctrl_e = KeyEvent::new(KeyCode::Char('e'), KeyModifiers::CONTROL);
        input.handle_key(ctrl_e);
        assert_eq!(input.cursor(), 3);
    }

    #[test]
    fn filter_prompt_uses_short_limit() {
        assert_eq!(InputPurpose::Filter.max_len(), MAX_EXTENSION_LEN);
        assert_eq!(InputPurpose::Search.max_len(), MAX_NAME_LEN);
    }

    #[test]
    fn rename_modal_is_prefilled() {
        let modal = InputPurpose::Rename {
            original: "notes.md".into(),
        }
        .into_modal();
        match modal {
            Modal::Input { input, .. } => assert_eq!(input.value(), "notes.md"),
            other => panic!("unexpected modal: {:?}", other),
        }
    }

    #[test]
    fn confirmation_accepts_only_y() {
        assert!(is_yes(&key(KeyCode::Char('y'))));
        assert!(is_yes(&key(KeyCode::Char('Y'))));
        assert!(!is_yes(&key(KeyCode::Char('n'))));
        assert!(!is_yes(&key(KeyCode::Enter)));
    }

    #[test]
    fn scroll_keys() {
        assert_eq!(scroll_delta(&key(KeyCode::Char('j'))), Some(1));
        assert_eq!(scroll_delta(&key(KeyCode::Up)), Some(-1));
        assert_eq!(scroll_delta(&key(KeyCode::Char('q'))), None);
    }
}

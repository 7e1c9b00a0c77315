use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use unicode_width::UnicodeWidthStr;

use crate::editor::{EditorAction, FieldEditor};

/// A single-line text input with a byte-offset cursor.
#[derive(Debug, Clone, Default)]
pub struct LineInput {
    value: String,
    /// Byte offset into `value`, always on a char boundary.
    cursor: usize,
    /// Maximum number of characters, if bounded.
    char_limit: Option<usize>,
    placeholder: String,
    focused: bool,
}

impl LineInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_char_limit(mut self, limit: usize) -> Self {
        self.char_limit = Some(limit);
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Terminal columns between the start of the text and the cursor.
    pub fn display_cursor(&self) -> usize {
        self.value[..self.cursor].width()
    }

    /// Replace the content and put the cursor at the end.
    pub fn set_value(&mut self, value: &str) {
        self.value = match self.char_limit {
            Some(limit) => value.chars().take(limit).collect(),
            None => value.to_string(),
        };
        self.cursor = self.value.len();
    }

    fn has_room(&self) -> bool {
        match self.char_limit {
            Some(limit) => self.value.chars().count() < limit,
            None => true,
        }
    }

    pub fn insert_char(&mut self, c: char) -> bool {
        if !self.has_room() {
            return false;
        }
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
        true
    }

    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let prev = self.value[..self.cursor]
            .chars()
            .last()
            .map(|c| c.len_utf8())
            .unwrap_or(0);
        self.cursor -= prev;
        self.value.remove(self.cursor);
        true
    }

    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.value.len() {
            return false;
        }
        self.value.remove(self.cursor);
        true
    }

    pub fn cursor_left(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let prev = self.value[..self.cursor]
            .chars()
            .last()
            .map(|c| c.len_utf8())
            .unwrap_or(0);
        self.cursor -= prev;
        true
    }

    pub fn cursor_right(&mut self) -> bool {
        if self.cursor >= self.value.len() {
            return false;
        }
        let next = self.value[self.cursor..]
            .chars()
            .next()
            .map(|c| c.len_utf8())
            .unwrap_or(0);
        self.cursor += next;
        true
    }

    pub fn cursor_home(&mut self) -> bool {
        self.cursor = 0;
        true
    }

    pub fn cursor_end(&mut self) -> bool {
        self.cursor = self.value.len();
        true
    }
}

impl FieldEditor for LineInput {
    fn focus(&mut self) {
        self.focused = true;
    }

    fn blur(&mut self) {
        self.focused = false;
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn handle_key(&mut self, key: KeyEvent) -> EditorAction {
        if !self.focused {
            return EditorAction::Ignored;
        }

        let changed = match key.code {
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.insert_char(c)
            }
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.cursor_left(),
            KeyCode::Right => self.cursor_right(),
            KeyCode::Home => self.cursor_home(),
            KeyCode::End => self.cursor_end(),
            _ => return EditorAction::Ignored,
        };

        if changed {
            EditorAction::Consumed
        } else {
            EditorAction::Ignored
        }
    }

    fn insert_str(&mut self, text: &str) {
        for c in text.chars().filter(|c| *c != '\n' && *c != '\r') {
            if !self.insert_char(c) {
                break;
            }
        }
    }

    fn value(&self) -> String {
        self.value.clone()
    }
}

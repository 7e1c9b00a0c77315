use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::editor::{EditorAction, FieldEditor};

/// A multi-line text editor with a 2D cursor.
///
/// Lines are stored without trailing newlines. The cursor is (row, col) where
/// col is a byte offset into the current line. There is always at least one
/// line.
#[derive(Debug, Clone)]
pub struct TextArea {
    lines: Vec<String>,
    cursor_row: usize,
    cursor_col: usize,
    /// Sticky display column for vertical movement.
    desired_col: usize,
    placeholder: String,
    focused: bool,
}

impl Default for TextArea {
    fn default() -> Self {
        Self::new()
    }
}

impl TextArea {
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            cursor_row: 0,
            cursor_col: 0,
            desired_col: 0,
            placeholder: String::new(),
            focused: false,
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].is_empty()
    }

    /// Row the cursor is on (0-based).
    pub fn line(&self) -> usize {
        self.cursor_row
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.cursor_row, self.cursor_col)
    }

    /// Terminal columns before the cursor on the current line.
    pub fn display_cursor_col(&self) -> usize {
        self.lines[self.cursor_row][..self.cursor_col].width()
    }

    /// Replace the content, cursor at the end of the last line.
    pub fn set_value(&mut self, text: &str) {
        self.lines = text.split('\n').map(|l| l.replace('\r', "")).collect();
        self.cursor_row = self.lines.len() - 1;
        self.cursor_col = self.lines[self.cursor_row].len();
        self.remember_col();
    }

    fn remember_col(&mut self) {
        self.desired_col = self.display_cursor_col();
    }

    // ── Cursor movement ──────────────────────────────────────────────

    pub fn cursor_left(&mut self) -> bool {
        if self.cursor_col == 0 {
            return false;
        }
        let line = &self.lines[self.cursor_row];
        self.cursor_col = line[..self.cursor_col]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0);
        self.remember_col();
        true
    }

    pub fn cursor_right(&mut self) -> bool {
        let line = &self.lines[self.cursor_row];
        if self.cursor_col >= line.len() {
            return false;
        }
        self.cursor_col = line[self.cursor_col..]
            .char_indices()
            .nth(1)
            .map(|(i, _)| self.cursor_col + i)
            .unwrap_or(line.len());
        self.remember_col();
        true
    }

    pub fn cursor_up(&mut self) -> bool {
        if self.cursor_row == 0 {
            return false;
        }
        self.cursor_row -= 1;
        self.cursor_col = byte_at_width(&self.lines[self.cursor_row], self.desired_col);
        true
    }

    pub fn cursor_down(&mut self) -> bool {
        if self.cursor_row + 1 >= self.lines.len() {
            return false;
        }
        self.cursor_row += 1;
        self.cursor_col = byte_at_width(&self.lines[self.cursor_row], self.desired_col);
        true
    }

    pub fn cursor_home(&mut self) -> bool {
        self.cursor_col = 0;
        self.desired_col = 0;
        true
    }

    pub fn cursor_end(&mut self) -> bool {
        self.cursor_col = self.lines[self.cursor_row].len();
        self.remember_col();
        true
    }

    // ── Editing ──────────────────────────────────────────────────────

    pub fn insert_char(&mut self, c: char) {
        self.lines[self.cursor_row].insert(self.cursor_col, c);
        self.cursor_col += c.len_utf8();
        self.remember_col();
    }

    pub fn insert_newline(&mut self) {
        let rest = self.lines[self.cursor_row].split_off(self.cursor_col);
        self.lines.insert(self.cursor_row + 1, rest);
        self.cursor_row += 1;
        self.cursor_col = 0;
        self.desired_col = 0;
    }

    pub fn backspace(&mut self) -> bool {
        if self.cursor_col > 0 {
            self.cursor_left();
            self.lines[self.cursor_row].remove(self.cursor_col);
            true
        } else if self.cursor_row > 0 {
            // Merge with previous line
            let current = self.lines.remove(self.cursor_row);
            self.cursor_row -= 1;
            self.cursor_col = self.lines[self.cursor_row].len();
            self.remember_col();
            self.lines[self.cursor_row].push_str(&current);
            true
        } else {
            false
        }
    }

    pub fn delete(&mut self) -> bool {
        if self.cursor_col < self.lines[self.cursor_row].len() {
            self.lines[self.cursor_row].remove(self.cursor_col);
            true
        } else if self.cursor_row + 1 < self.lines.len() {
            let next = self.lines.remove(self.cursor_row + 1);
            self.lines[self.cursor_row].push_str(&next);
            true
        } else {
            false
        }
    }
}

impl FieldEditor for TextArea {
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
                self.insert_char(c);
                true
            }
            KeyCode::Enter => {
                self.insert_newline();
                true
            }
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.cursor_left(),
            KeyCode::Right => self.cursor_right(),
            KeyCode::Up => self.cursor_up(),
            KeyCode::Down => self.cursor_down(),
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
        for c in text.chars() {
            match c {
                '\n' => self.insert_newline(),
                '\r' => {}
                c => self.insert_char(c),
            }
        }
    }

    fn value(&self) -> String {
        self.lines.join("\n")
    }
}

/// Byte offset of the last char boundary whose display column does not
/// exceed `width`.
fn byte_at_width(line: &str, width: usize) -> usize {
    let mut used = 0;
    for (i, c) in line.char_indices() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            return i;
        }
        used += w;
    }
    line.len()
}

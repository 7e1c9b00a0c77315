use crossterm::event::KeyEvent;

/// What an editor did with a delegated key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    /// The key changed the content or the cursor.
    Consumed,
    /// The key was not for this editor (blurred, or not an editing key).
    Ignored,
}

/// The contract between the form and its text editors.
///
/// The form owns focus: it calls `blur()` on every editor that is not the
/// current field and `focus()` on the one that is, after every event. A
/// blurred editor must ignore keys.
pub trait FieldEditor {
    fn focus(&mut self);

    fn blur(&mut self);

    fn is_focused(&self) -> bool;

    /// Apply one key event to the content/cursor.
    fn handle_key(&mut self, key: KeyEvent) -> EditorAction;

    /// Insert a block of text at the cursor (bracketed paste, indentation).
    fn insert_str(&mut self, text: &str);

    /// The current text.
    fn value(&self) -> String;
}

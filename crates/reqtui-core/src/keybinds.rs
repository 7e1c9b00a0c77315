use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// The keys the form navigation cares about.
///
/// Anything not listed here is `Other` and goes to the focused field's editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Enter,
    Up,
    Down,
    Left,
    Right,
    Tab,
    /// Ctrl+Up: leave the body upwards regardless of the cursor line.
    CtrlUp,
    /// Ctrl+Down: leave the body downwards regardless of the cursor line.
    CtrlDown,
    Esc,
    /// Plain `q`. Only quits from non-text fields.
    Quit,
    /// Ctrl+S: submit from anywhere.
    Submit,
    /// Ctrl+N: append a header pair.
    AddHeader,
    /// Ctrl+X: remove a header pair.
    RemoveHeader,
    /// F1: toggle the help popup.
    Help,
    Other,
}

/// Map a raw key event to its navigation meaning.
pub fn classify(key: &KeyEvent) -> NavKey {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => NavKey::Esc,
        KeyCode::Enter => NavKey::Enter,
        KeyCode::Tab => NavKey::Tab,
        KeyCode::Up if ctrl => NavKey::CtrlUp,
        KeyCode::Down if ctrl => NavKey::CtrlDown,
        KeyCode::Up => NavKey::Up,
        KeyCode::Down => NavKey::Down,
        KeyCode::Left => NavKey::Left,
        KeyCode::Right => NavKey::Right,
        KeyCode::F(1) => NavKey::Help,
        KeyCode::Char('s') if ctrl => NavKey::Submit,
        KeyCode::Char('n') if ctrl => NavKey::AddHeader,
        KeyCode::Char('x') if ctrl => NavKey::RemoveHeader,
        KeyCode::Char('q') if key.modifiers.is_empty() => NavKey::Quit,
        _ => NavKey::Other,
    }
}

/// Ctrl+C always quits, whatever the application is doing.
pub fn is_force_quit(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

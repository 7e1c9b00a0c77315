use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use unicode_width::UnicodeWidthChar;

/// Label colour of the focused field.
pub const FOCUSED: Style = Style::new().fg(Color::Indexed(205));
/// Label colour of every other field.
pub const BLURRED: Style = Style::new().fg(Color::Indexed(240));

/// Style for a label, given whether its field has focus.
pub fn label_style(focused: bool) -> Style {
    if focused { FOCUSED } else { BLURRED }
}

/// Render the top title line.
pub fn render_title_bar(frame: &mut Frame, area: Rect, title: &str, info: &str) {
    let line = Line::from(vec![
        Span::styled(
            format!(" {title} "),
            Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED),
        ),
        Span::raw("  "),
        Span::styled(info, Style::default().add_modifier(Modifier::DIM)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Render the bottom status bar showing the phase label and optional info.
pub fn render_status_bar(frame: &mut Frame, area: Rect, label: &str, info: &str) {
    let line = Line::from(vec![
        Span::styled(
            format!(" {label} "),
            Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED),
        ),
        Span::raw("  "),
        Span::styled(info, Style::default().add_modifier(Modifier::DIM)),
    ]);

    let bar = Paragraph::new(line).style(Style::default().add_modifier(Modifier::REVERSED));
    frame.render_widget(bar, area);
}

/// Standard layout: title bar (1 line) + main content + status bar (1 line).
/// Returns (title_area, content_area, status_area).
pub fn standard_layout(area: Rect) -> (Rect, Rect, Rect) {
    let [title_area, content_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(area);

    (title_area, content_area, status_area)
}

/// Create a standard bordered block.
pub fn tool_block(title: &str, focused: bool) -> Block<'_> {
    Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(label_style(focused))
}

/// Hard-wrap text to `width` terminal columns, keeping existing line breaks.
///
/// A width of 0 disables wrapping.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    for line in text.split('\n') {
        if width == 0 {
            out.push(line.to_string());
            continue;
        }
        let mut current = String::new();
        let mut current_width = 0;
        for c in line.chars() {
            let w = c.width().unwrap_or(0);
            if current_width + w > width && !current.is_empty() {
                out.push(std::mem::take(&mut current));
                current_width = 0;
            }
            current.push(c);
            current_width += w;
        }
        out.push(current);
    }
    out
}

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};
use unicode_width::UnicodeWidthStr;

/// Keys understood by the request form, in the order they are listed.
pub const FORM_KEYS: &[(&str, &str)] = &[
    ("up / down", "previous / next field"),
    ("enter", "next field, newline in body"),
    ("left / right", "method choice, header column"),
    ("ctrl+up / ctrl+down", "leave the body"),
    ("tab", "indent body"),
    ("ctrl+n", "add header"),
    ("ctrl+x", "remove header"),
    ("ctrl+s", "submit"),
    ("q", "quit (method or submit)"),
    ("esc / ctrl+c", "quit"),
];

/// Overlay listing the form's keys. Opened with F1.
#[derive(Debug, Default)]
pub struct KeyHelp {
    open: bool,
}

impl KeyHelp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if !self.open {
            return;
        }

        let lines = key_lines(FORM_KEYS);
        let content_width = lines.iter().map(Line::width).max().unwrap_or(0) as u16;
        let box_area = centered(area, content_width + 4, lines.len() as u16 + 2);

        frame.render_widget(Clear, box_area);
        let block = Block::default()
            .title(" keys · any key closes ")
            .borders(Borders::ALL);
        frame.render_widget(Paragraph::new(lines).block(block), box_area);
    }
}

/// One line per binding, keys right-aligned to the widest key.
fn key_lines(keys: &[(&str, &str)]) -> Vec<Line<'static>> {
    let key_width = keys.iter().map(|(k, _)| k.width()).max().unwrap_or(0);
    let bold = Style::default().add_modifier(Modifier::BOLD);

    keys.iter()
        .map(|(k, what)| {
            Line::from(vec![
                Span::styled(format!(" {k:>key_width$}  "), bold),
                Span::raw(what.to_string()),
            ])
        })
        .collect()
}

/// A `width` x `height` rect centered in `area`, shrunk to fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

use crate::field::{Field, FieldId, HeaderSlot, header_id};
use crate::form::{FormState, HeaderPair};
use crate::pipeline::ResponseState;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use reqtui_core::ui::{BLURRED, FOCUSED, label_style, wrap_text};
use unicode_width::UnicodeWidthStr;

/// Minimum width of the header name column.
const NAME_COLUMN: usize = 24;
const NAME_PREFIX: &str = "Name: ";
const VALUE_PREFIX: &str = " Value: ";
const URL_PREFIX: &str = "URL: ";

const HINTS: &str =
    "esc quit • ctrl+s submit • ctrl+n add header • ctrl+x remove header • F1 help";

fn status_color(code: u16) -> Color {
    match code {
        200..=299 => Color::Green,
        300..=399 => Color::Cyan,
        400..=499 => Color::Yellow,
        500..=599 => Color::Red,
        _ => Color::White,
    }
}

fn placeholder_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

// ── Form ─────────────────────────────────────────────────────────────

/// Render the request form. Focus styling is derived from the form's focus
/// state on every draw.
pub fn render_form(frame: &mut Frame, area: Rect, form: &FormState, debug: bool) {
    let header_rows = form.headers.len().max(1) as u16;
    let body_height = (form.body.line_count().max(3) + 2).min(12) as u16;

    let [
        method_area,
        _,
        url_area,
        _,
        body_label_area,
        body_area,
        _,
        headers_area,
        _,
        submit_area,
        _,
        hints_area,
        debug_area,
        _,
    ] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(body_height),
        Constraint::Length(1),
        Constraint::Length(1 + header_rows),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(if debug { 1 } else { 0 }),
        Constraint::Min(0),
    ])
    .areas(area);

    let current = form.current();

    render_method_selector(frame, method_area, form, current == FieldId::METHOD);
    render_url(frame, url_area, form, current == FieldId::URL);

    frame.render_widget(
        Paragraph::new(Span::styled("BODY:", label_style(current == FieldId::BODY))),
        body_label_area,
    );
    render_body(frame, body_area, form, current == FieldId::BODY);

    render_headers(frame, headers_area, form, current);

    let submit = if current == FieldId::SUBMIT {
        Line::from(Span::styled("[ Submit ]", FOCUSED))
    } else {
        Line::from(vec![
            Span::raw("[ "),
            Span::styled("Submit", BLURRED),
            Span::raw(" ]"),
        ])
    };
    frame.render_widget(Paragraph::new(submit), submit_area);

    frame.render_widget(
        Paragraph::new(Span::styled(HINTS, BLURRED)),
        hints_area,
    );

    if debug {
        frame.render_widget(
            Paragraph::new(format!("Current selection: {}", current.0)),
            debug_area,
        );
    }
}

fn render_method_selector(frame: &mut Frame, area: Rect, form: &FormState, focused: bool) {
    let mut spans: Vec<Span> = Vec::new();
    for (i, method) in form.methods.choices().iter().enumerate() {
        if i == form.methods.selected_index() {
            spans.push(Span::styled(
                format!("(•) {}", method.as_str()),
                Style::default().add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::raw(format!("( ) {}", method.as_str())));
        }
        spans.push(Span::raw(" "));
    }

    let lines = vec![
        Line::from(Span::styled("METHOD:", label_style(focused))),
        Line::from(spans),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_url(frame: &mut Frame, area: Rect, form: &FormState, focused: bool) {
    let text = if form.url.is_empty() {
        Span::styled(form.url.placeholder(), placeholder_style())
    } else {
        Span::styled(form.url.as_str(), label_style(focused))
    };
    let line = Line::from(vec![Span::styled(URL_PREFIX, label_style(focused)), text]);
    frame.render_widget(Paragraph::new(line), area);

    if focused {
        let cursor_x = area.x + (URL_PREFIX.len() + form.url.display_cursor()) as u16;
        if cursor_x < area.x + area.width {
            frame.set_cursor_position((cursor_x, area.y));
        }
    }
}

fn render_body(frame: &mut Frame, area: Rect, form: &FormState, focused: bool) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(label_style(focused));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let (row, _) = form.body.cursor();
    let visible = inner.height as usize;
    let scroll = row.saturating_sub(visible.saturating_sub(1));

    let lines: Vec<Line> = if form.body.is_empty() && !focused {
        form.body
            .placeholder()
            .split('\n')
            .map(|l| Line::from(Span::styled(l, placeholder_style())))
            .collect()
    } else {
        form.body
            .lines()
            .iter()
            .skip(scroll)
            .take(visible)
            .map(|l| Line::from(l.as_str()))
            .collect()
    };
    frame.render_widget(Paragraph::new(lines), inner);

    if focused {
        let cursor_x = inner.x + form.body.display_cursor_col() as u16;
        let cursor_y = inner.y + (row - scroll) as u16;
        if cursor_x < inner.x + inner.width {
            frame.set_cursor_position((cursor_x, cursor_y));
        }
    }
}

/// Width of the name column for one header row.
fn name_column(pair: &HeaderPair) -> usize {
    NAME_COLUMN.max(pair.name.as_str().width() + 1)
}

fn render_headers(frame: &mut Frame, area: Rect, form: &FormState, current: FieldId) {
    let header_count = form.headers.len();
    let on_header = current.is_header(header_count);

    let mut lines = vec![Line::from(Span::styled("HEADERS:", label_style(on_header)))];
    if form.headers.is_empty() {
        lines.push(Line::from("None"));
    }

    for (i, pair) in form.headers.iter().enumerate() {
        let name_focused = current == header_id(i, HeaderSlot::Name);
        let value_focused = current == header_id(i, HeaderSlot::Value);
        let width = name_column(pair);
        let name = pair.name.as_str();
        let padded = format!("{name}{}", " ".repeat(width - name.width()));

        lines.push(Line::from(vec![
            Span::styled(NAME_PREFIX, label_style(name_focused)),
            Span::styled(padded, label_style(name_focused)),
            Span::styled(VALUE_PREFIX, label_style(value_focused)),
            Span::styled(pair.value.as_str(), label_style(value_focused)),
        ]));
    }
    frame.render_widget(Paragraph::new(lines), area);

    let (index, slot) = match current.resolve(header_count) {
        Some(Field::HeaderName(i)) => (i, HeaderSlot::Name),
        Some(Field::HeaderValue(i)) => (i, HeaderSlot::Value),
        _ => return,
    };
    let pair = &form.headers[index];
    let row = 1 + index as u16;
    if row >= area.height {
        return;
    }
    let offset = match slot {
        HeaderSlot::Name => NAME_PREFIX.len() + pair.name.display_cursor(),
        HeaderSlot::Value => {
            NAME_PREFIX.len() + name_column(pair) + VALUE_PREFIX.len() + pair.value.display_cursor()
        }
    };
    let cursor_x = area.x + offset as u16;
    if cursor_x < area.x + area.width {
        frame.set_cursor_position((cursor_x, area.y + row));
    }
}

// ── Request in flight ────────────────────────────────────────────────

pub fn render_in_flight(frame: &mut Frame, area: Rect, spinner: char, elapsed_ms: u128) {
    let line = Line::from(vec![
        Span::styled(format!("{spinner} "), FOCUSED),
        Span::raw("Sending request... "),
        Span::styled(format!("{elapsed_ms} ms"), BLURRED),
        Span::styled("  (esc to abandon)", BLURRED),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

// ── Response ─────────────────────────────────────────────────────────

/// Render the response view: summary, then the body wrapped to the area.
pub fn render_response(frame: &mut Frame, area: Rect, response: &ResponseState) {
    let mut title = String::from(" RESPONSE: ");
    if let Some(ms) = response.elapsed_ms {
        title.push_str(&format!("· {ms} ms "));
    }
    if let Some(at) = response.received_at {
        title.push_str(&format!("· {} ", at.format("%H:%M:%S")));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(BLURRED)
        .title(title);

    let mut lines: Vec<Line> = Vec::new();
    for (i, line) in response.summary.split('\n').enumerate() {
        match (i, response.status_code) {
            (0, Some(code)) => lines.push(Line::from(Span::styled(
                line,
                Style::default()
                    .fg(status_color(code))
                    .add_modifier(Modifier::BOLD),
            ))),
            _ => lines.push(Line::from(line)),
        }
    }
    for line in response.body.split('\n') {
        lines.push(Line::from(line));
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// The response as plain text, body wrapped to `width` columns, for printing
/// after the terminal is restored.
pub fn plain_response(response: &ResponseState, width: usize) -> String {
    let mut out = String::from("RESPONSE:\n\n");
    out.push_str(&response.summary);
    out.push_str(&wrap_text(&response.body, width).join("\n"));
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{Terminal, backend::TestBackend};

    fn draw(width: u16, height: u16, render: impl FnOnce(&mut Frame)) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(render).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_empty_form() {
        let form = FormState::new();
        let text = draw(100, 30, |f| render_form(f, f.area(), &form, false));
        assert!(text.contains("METHOD:"));
        assert!(text.contains("(•) GET"));
        assert!(text.contains("( ) DELETE"));
        assert!(text.contains("None"));
        assert!(text.contains("[ Submit ]"));
        assert!(!text.contains("Current selection"));
    }

    #[test]
    fn test_debug_line_shows_focus_id() {
        let mut form = FormState::new();
        form.add_header();
        let text = draw(100, 30, |f| render_form(f, f.area(), &form, true));
        assert!(text.contains("Current selection: 3"));
    }

    #[test]
    fn test_headers_rows() {
        let mut form = FormState::new();
        form.add_header();
        form.paste("X-Test");
        let text = draw(100, 30, |f| render_form(f, f.area(), &form, false));
        assert!(text.contains("Name: X-Test"));
        assert!(text.contains("Value:"));
        assert!(!text.contains("None"));
    }

    #[test]
    fn test_response_view() {
        let response = ResponseState {
            summary: "200 OK\n\n--------------------\n\nContent-Type: text/plain\n\n--------------------\n\n"
                .to_string(),
            body: "ok".to_string(),
            status_code: Some(200),
            ..Default::default()
        };
        let text = draw(60, 20, |f| render_response(f, f.area(), &response));
        assert!(text.contains("RESPONSE"));
        assert!(text.contains("200 OK"));
        assert!(text.contains("Content-Type: text/plain"));
        assert!(text.contains("ok"));
    }

    #[test]
    fn test_plain_response_wraps_body() {
        let response = ResponseState {
            summary: "200 OK\n".to_string(),
            body: "abcdefgh".to_string(),
            ..Default::default()
        };
        assert_eq!(
            plain_response(&response, 4),
            "RESPONSE:\n\n200 OK\nabcd\nefgh\n"
        );
    }
}

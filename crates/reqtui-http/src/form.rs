use crossterm::event::KeyEvent;
use reqtui_core::{
    config::{BODY_INDENT, MAX_HEADERS, URL_CHAR_LIMIT},
    editor::{EditorAction, FieldEditor},
    input::LineInput,
    keybinds::classify,
    textarea::TextArea,
};

use crate::field::{Field, FieldId, HeaderSlot, all_ids, header_id};
use crate::focus::{BodyEdge, FocusState, Step, Transition, transition};
use crate::model::MethodSelector;
use crate::pipeline::RequestSnapshot;

// ── Header pair ──────────────────────────────────────────────────────

/// One header entry: a name input and a value input.
#[derive(Debug, Clone, Default)]
pub struct HeaderPair {
    pub name: LineInput,
    pub value: LineInput,
}

impl HeaderPair {
    pub fn new() -> Self {
        Self::default()
    }
}

// ── Outcome ──────────────────────────────────────────────────────────

/// What the application should do after the form handled a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormOutcome {
    Continue,
    Submit,
    Quit,
    ToggleHelp,
}

// ── Form state ───────────────────────────────────────────────────────

/// The request form: method, URL, body, headers and the focus over them.
pub struct FormState {
    pub methods: MethodSelector,
    pub url: LineInput,
    pub body: TextArea,
    pub headers: Vec<HeaderPair>,
    focus: FocusState,
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

impl FormState {
    pub fn new() -> Self {
        let mut form = Self {
            methods: MethodSelector::new(),
            url: LineInput::new()
                .with_char_limit(URL_CHAR_LIMIT)
                .with_placeholder("https://example.com"),
            body: TextArea::new().with_placeholder("{\n  \"foo\":\"bar\"\n}"),
            headers: Vec::new(),
            focus: FocusState::new(),
        };
        form.sync_focus();
        form
    }

    pub fn focus(&self) -> FocusState {
        self.focus
    }

    pub fn current(&self) -> FieldId {
        self.focus.current()
    }

    /// Handle one key: navigate, delegate to the focused editor, or report a
    /// submit/quit request. Focus flags are recomputed afterwards.
    pub fn handle_key(&mut self, key: KeyEvent) -> FormOutcome {
        let nav = classify(&key);
        let edge = BodyEdge::new(self.body.line(), self.body.line_count());
        let step = transition(self.focus, self.headers.len(), nav, edge);
        tracing::debug!(focus = %self.focus.current(), ?nav, transition = ?step, "form key");

        let outcome = self.apply(step, key);
        self.sync_focus();
        outcome
    }

    fn apply(&mut self, step: Transition, key: KeyEvent) -> FormOutcome {
        match step {
            Transition::Focus(id) => self.focus.set(id),
            Transition::Delegate(id) => {
                if let Some(editor) = self.editor_mut(id) {
                    if editor.handle_key(key) == EditorAction::Ignored {
                        tracing::trace!(field = %id, ?key, "key ignored by editor");
                    }
                }
            }
            Transition::Indent => self.body.insert_str(BODY_INDENT),
            Transition::SelectMethod(Step::Prev) => self.methods.select_prev(),
            Transition::SelectMethod(Step::Next) => self.methods.select_next(),
            Transition::AddHeader => self.add_header(),
            Transition::RemoveHeader => self.remove_header(),
            Transition::Submit => return FormOutcome::Submit,
            Transition::Quit => return FormOutcome::Quit,
            Transition::ToggleHelp => return FormOutcome::ToggleHelp,
            Transition::Noop => {}
        }
        FormOutcome::Continue
    }

    /// The editor behind a field id, if that field takes text.
    fn editor_mut(&mut self, id: FieldId) -> Option<&mut dyn FieldEditor> {
        match id.resolve(self.headers.len())? {
            Field::Url => Some(&mut self.url),
            Field::Body => Some(&mut self.body),
            Field::HeaderName(i) => Some(&mut self.headers[i].name),
            Field::HeaderValue(i) => Some(&mut self.headers[i].value),
            Field::MethodSelector | Field::Submit => None,
        }
    }

    /// Blur every editor except the current field, which is focused.
    ///
    /// Walks every header pair each time since the list length changes.
    pub fn sync_focus(&mut self) {
        let current = self.focus.current();
        for id in all_ids(self.headers.len()) {
            if let Some(editor) = self.editor_mut(id) {
                if id == current {
                    editor.focus();
                } else {
                    editor.blur();
                }
            }
        }
    }

    // ── Header list ──────────────────────────────────────────────────

    /// Append an empty header pair and focus its name.
    pub fn add_header(&mut self) {
        if self.headers.len() >= MAX_HEADERS {
            tracing::warn!(max = MAX_HEADERS, "header limit reached");
            return;
        }
        self.headers.push(HeaderPair::new());
        let index = self.headers.len() - 1;
        self.focus.set(header_id(index, HeaderSlot::Name));
        tracing::debug!(count = self.headers.len(), "header added");
        self.sync_focus();
    }

    /// Remove the header pair under focus, or the last pair when focus is
    /// elsewhere.
    pub fn remove_header(&mut self) {
        if self.headers.is_empty() {
            return;
        }
        let index = match self.focus.current().resolve(self.headers.len()) {
            Some(Field::HeaderName(i)) | Some(Field::HeaderValue(i)) => i,
            _ => self.headers.len() - 1,
        };
        self.headers.remove(index);
        self.after_header_removal();
        tracing::debug!(index, count = self.headers.len(), "header removed");
    }

    pub fn clear_headers(&mut self) {
        self.headers.clear();
        self.after_header_removal();
    }

    fn after_header_removal(&mut self) {
        if self.focus.clamp(self.headers.len()) {
            tracing::debug!(focus = %self.focus.current(), "focus clamped after header removal");
        }
        self.sync_focus();
    }

    // ── Content ──────────────────────────────────────────────────────

    /// Insert pasted text into the focused editor.
    pub fn paste(&mut self, text: &str) {
        let current = self.focus.current();
        if let Some(editor) = self.editor_mut(current) {
            editor.insert_str(text);
        }
    }

    /// Copy the current field values for the pipeline.
    pub fn snapshot(&self) -> RequestSnapshot {
        RequestSnapshot {
            method: self.methods.selected().as_str().to_string(),
            url: self.url.value(),
            body: self.body.value(),
            headers: self
                .headers
                .iter()
                .map(|h| (h.name.value(), h.value.value()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::CONTROL)
    }

    fn type_str(form: &mut FormState, text: &str) {
        for c in text.chars() {
            form.handle_key(key(KeyCode::Char(c)));
        }
    }

    fn focused_editors(form: &mut FormState) -> Vec<FieldId> {
        let ids: Vec<FieldId> = all_ids(form.headers.len()).collect();
        ids.into_iter()
            .filter(|id| form.editor_mut(*id).is_some_and(|e| e.is_focused()))
            .collect()
    }

    #[test]
    fn test_new_form() {
        let mut form = FormState::new();
        assert_eq!(form.current(), FieldId::METHOD);
        assert!(form.headers.is_empty());
        assert!(focused_editors(&mut form).is_empty());
    }

    #[test]
    fn test_fill_in_form() {
        let mut form = FormState::new();
        form.handle_key(key(KeyCode::Right));
        form.handle_key(key(KeyCode::Enter));
        assert_eq!(form.current(), FieldId::URL);
        type_str(&mut form, "api.test/x");
        form.handle_key(key(KeyCode::Enter));
        assert_eq!(form.current(), FieldId::BODY);
        type_str(&mut form, "hi");

        let snap = form.snapshot();
        assert_eq!(snap.method, "POST");
        assert_eq!(snap.url, "api.test/x");
        assert_eq!(snap.body, "hi");
    }

    #[test]
    fn test_exactly_one_editor_focused() {
        let mut form = FormState::new();
        form.add_header();
        form.add_header();
        assert_eq!(focused_editors(&mut form), vec![FieldId(5)]);

        form.handle_key(key(KeyCode::Up));
        assert_eq!(focused_editors(&mut form), vec![FieldId(3)]);

        form.handle_key(key(KeyCode::Up));
        assert_eq!(focused_editors(&mut form), vec![FieldId::BODY]);

        form.handle_key(key(KeyCode::Up));
        form.handle_key(key(KeyCode::Up));
        assert_eq!(form.current(), FieldId::METHOD);
        assert!(focused_editors(&mut form).is_empty());
    }

    #[test]
    fn test_sync_focus_is_idempotent() {
        let mut form = FormState::new();
        form.add_header();
        form.handle_key(key(KeyCode::Right));
        let before = focused_editors(&mut form);
        form.sync_focus();
        form.sync_focus();
        assert_eq!(focused_editors(&mut form), before);
        assert_eq!(before, vec![FieldId(4)]);
    }

    #[test]
    fn test_enter_inserts_newline_in_body() {
        let mut form = FormState::new();
        form.handle_key(ctrl(KeyCode::Down)); // method ignores ctrl+down
        assert_eq!(form.current(), FieldId::METHOD);

        form.handle_key(key(KeyCode::Down));
        form.handle_key(key(KeyCode::Down));
        type_str(&mut form, "{");
        form.handle_key(key(KeyCode::Enter));
        type_str(&mut form, "}");
        assert_eq!(form.current(), FieldId::BODY);
        assert_eq!(form.body.value(), "{\n}");
    }

    #[test]
    fn test_up_moves_inside_body_before_leaving() {
        let mut form = FormState::new();
        form.focus.set(FieldId::BODY);
        form.sync_focus();
        form.body.insert_str("a\nb\nc");

        form.handle_key(key(KeyCode::Up));
        form.handle_key(key(KeyCode::Up));
        assert_eq!(form.current(), FieldId::BODY);
        assert_eq!(form.body.line(), 0);

        form.handle_key(key(KeyCode::Up));
        assert_eq!(form.current(), FieldId::URL);
    }

    #[test]
    fn test_down_from_body_needs_last_line() {
        let mut form = FormState::new();
        form.add_header();
        form.focus.set(FieldId::BODY);
        form.sync_focus();
        form.body.insert_str("a\nb");
        form.handle_key(key(KeyCode::Up));

        form.handle_key(key(KeyCode::Down));
        assert_eq!(form.current(), FieldId::BODY);
        assert_eq!(form.body.line(), 1);

        form.handle_key(key(KeyCode::Down));
        assert_eq!(form.current(), FieldId(3));
    }

    #[test]
    fn test_tab_indents_body() {
        let mut form = FormState::new();
        form.focus.set(FieldId::BODY);
        form.sync_focus();
        form.handle_key(key(KeyCode::Tab));
        type_str(&mut form, "x");
        assert_eq!(form.body.value(), "  x");
        assert_eq!(form.current(), FieldId::BODY);
    }

    #[test]
    fn test_method_left_right() {
        let mut form = FormState::new();
        for _ in 0..10 {
            form.handle_key(key(KeyCode::Right));
        }
        assert_eq!(form.methods.selected_index(), 4);
        form.handle_key(key(KeyCode::Left));
        assert_eq!(form.methods.selected_index(), 3);
    }

    #[test]
    fn test_left_in_url_moves_cursor() {
        let mut form = FormState::new();
        form.handle_key(key(KeyCode::Down));
        type_str(&mut form, "ac");
        form.handle_key(key(KeyCode::Left));
        type_str(&mut form, "b");
        assert_eq!(form.url.as_str(), "abc");
        assert_eq!(form.current(), FieldId::URL);
    }

    #[test]
    fn test_q_types_into_text_fields_and_quits_elsewhere() {
        let mut form = FormState::new();
        assert_eq!(form.handle_key(key(KeyCode::Char('q'))), FormOutcome::Quit);

        form.handle_key(key(KeyCode::Down));
        assert_eq!(
            form.handle_key(key(KeyCode::Char('q'))),
            FormOutcome::Continue
        );
        assert_eq!(form.url.as_str(), "q");
    }

    #[test]
    fn test_headers_editing() {
        let mut form = FormState::new();
        form.handle_key(ctrl(KeyCode::Char('n')));
        assert_eq!(form.current(), FieldId(3));
        type_str(&mut form, "X-Test");
        form.handle_key(key(KeyCode::Right));
        type_str(&mut form, "1");
        assert_eq!(form.snapshot().headers, vec![("X-Test".into(), "1".into())]);

        form.handle_key(key(KeyCode::Enter));
        assert_eq!(form.current(), FieldId::SUBMIT);
        assert_eq!(form.handle_key(key(KeyCode::Enter)), FormOutcome::Submit);
    }

    #[test]
    fn test_submit_shortcut_from_anywhere() {
        let mut form = FormState::new();
        form.handle_key(key(KeyCode::Down));
        assert_eq!(form.handle_key(ctrl(KeyCode::Char('s'))), FormOutcome::Submit);
        assert!(form.url.is_empty());
    }

    #[test]
    fn test_esc_quits() {
        let mut form = FormState::new();
        form.focus.set(FieldId::BODY);
        assert_eq!(form.handle_key(key(KeyCode::Esc)), FormOutcome::Quit);
    }

    #[test]
    fn test_removing_all_headers_clamps_to_submit() {
        let mut form = FormState::new();
        form.add_header();
        form.add_header();
        form.add_header();
        form.handle_key(key(KeyCode::Right));
        assert_eq!(form.current(), FieldId(8));

        form.clear_headers();
        assert_eq!(form.current(), FieldId::SUBMIT);
        assert!(form.current().is_valid(0));
        assert!(focused_editors(&mut form).is_empty());
    }

    #[test]
    fn test_remove_focused_header() {
        let mut form = FormState::new();
        form.add_header();
        form.add_header();
        form.headers[1].name.set_value("second");

        // Focus on the last pair's name; removing it leaves a stale id
        form.handle_key(ctrl(KeyCode::Char('x')));
        assert_eq!(form.headers.len(), 1);
        assert_eq!(form.current(), FieldId::SUBMIT);

        // From a non-header field the last pair goes
        form.focus.set(FieldId::URL);
        form.remove_header();
        assert!(form.headers.is_empty());
        assert_eq!(form.current(), FieldId::URL);

        // Nothing to remove
        form.remove_header();
        assert_eq!(form.current(), FieldId::URL);
    }

    #[test]
    fn test_remove_middle_header_keeps_focus_id() {
        let mut form = FormState::new();
        for name in ["a", "b", "c"] {
            form.add_header();
            form.paste(name);
        }
        form.focus.set(FieldId(5));
        form.sync_focus();
        form.remove_header();
        let names: Vec<String> = form.headers.iter().map(|h| h.name.value()).collect();
        assert_eq!(names, vec!["a", "c"]);
        assert_eq!(form.current(), FieldId(5));
        assert_eq!(focused_editors(&mut form), vec![FieldId(5)]);
    }

    #[test]
    fn test_header_limit() {
        let mut form = FormState::new();
        for _ in 0..(MAX_HEADERS + 5) {
            form.add_header();
        }
        assert_eq!(form.headers.len(), MAX_HEADERS);
    }

    #[test]
    fn test_help_toggle() {
        let mut form = FormState::new();
        assert_eq!(form.handle_key(key(KeyCode::F(1))), FormOutcome::ToggleHelp);
    }

    #[test]
    fn test_paste_into_body() {
        let mut form = FormState::new();
        form.focus.set(FieldId::BODY);
        form.sync_focus();
        form.paste("{\n  \"a\": 1\n}");
        assert_eq!(form.body.line_count(), 3);

        // Method selector takes no text
        form.focus.set(FieldId::METHOD);
        form.sync_focus();
        form.paste("ignored");
        assert_eq!(form.body.line_count(), 3);
    }
}

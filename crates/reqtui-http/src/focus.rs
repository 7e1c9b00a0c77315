//! The focus engine: which field is current, and what each navigation key does.
//!
//! [`transition`] is a pure function of the focus, the header count, the key
//! and where the body cursor sits. It never touches editors or the network;
//! the form applies the returned [`Transition`].

use reqtui_core::keybinds::NavKey;

use crate::field::{FieldId, HeaderSlot, field_count, header_id};

/// Exactly one current field, always a valid address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusState {
    current: FieldId,
}

impl Default for FocusState {
    fn default() -> Self {
        Self {
            current: FieldId::METHOD,
        }
    }
}

impl FocusState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> FieldId {
        self.current
    }

    pub fn is(&self, id: FieldId) -> bool {
        self.current == id
    }

    /// Move focus. Callers pass ids produced by [`transition`] or the form's
    /// header operations; [`FocusState::clamp`] repairs anything stale.
    pub fn set(&mut self, id: FieldId) {
        self.current = id;
    }

    /// Pull a stale header id back into range after the list shrank.
    /// Returns true if focus moved.
    pub fn clamp(&mut self, header_count: usize) -> bool {
        if self.current.is_valid(header_count) {
            return false;
        }
        self.current = FieldId::SUBMIT;
        true
    }
}

/// Where the body's cursor is, for deciding whether Up/Down leave the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyEdge {
    pub at_first_line: bool,
    pub at_last_line: bool,
}

impl BodyEdge {
    pub fn new(line: usize, line_count: usize) -> Self {
        Self {
            at_first_line: line == 0,
            at_last_line: line + 1 >= line_count,
        }
    }
}

impl Default for BodyEdge {
    fn default() -> Self {
        Self {
            at_first_line: true,
            at_last_line: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Prev,
    Next,
}

/// The outcome of one key for the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Move focus to this field.
    Focus(FieldId),
    /// Forward the raw key to this field's editor.
    Delegate(FieldId),
    /// Insert an indent into the body.
    Indent,
    /// Change the selected method.
    SelectMethod(Step),
    /// Run the request pipeline.
    Submit,
    /// Leave the program, discarding edits.
    Quit,
    AddHeader,
    RemoveHeader,
    ToggleHelp,
    Noop,
}

/// First field after the body: the first header name, or submit.
fn after_body(header_count: usize) -> FieldId {
    if header_count > 0 {
        header_id(0, HeaderSlot::Name)
    } else {
        FieldId::SUBMIT
    }
}

/// Next header field, or submit once past the last one.
fn advance(id: FieldId, header_count: usize) -> FieldId {
    if id.0 + 1 < field_count(header_count) {
        FieldId(id.0 + 1)
    } else {
        FieldId::SUBMIT
    }
}

/// Compute what `key` does given the current focus.
pub fn transition(
    focus: FocusState,
    header_count: usize,
    key: NavKey,
    body: BodyEdge,
) -> Transition {
    let current = focus.current();
    let on_header = current.is_header(header_count);

    match key {
        NavKey::Esc => Transition::Quit,
        NavKey::Submit => Transition::Submit,
        NavKey::AddHeader => Transition::AddHeader,
        NavKey::RemoveHeader => Transition::RemoveHeader,
        NavKey::Help => Transition::ToggleHelp,

        NavKey::Enter => match current {
            FieldId::METHOD => Transition::Focus(FieldId::URL),
            FieldId::URL => Transition::Focus(FieldId::BODY),
            FieldId::BODY => Transition::Delegate(FieldId::BODY),
            FieldId::SUBMIT => Transition::Submit,
            id if on_header => Transition::Focus(advance(id, header_count)),
            _ => Transition::Noop,
        },

        NavKey::Down => match current {
            FieldId::METHOD => Transition::Focus(FieldId::URL),
            FieldId::URL => Transition::Focus(FieldId::BODY),
            FieldId::BODY if !body.at_last_line => Transition::Delegate(FieldId::BODY),
            FieldId::BODY => Transition::Focus(after_body(header_count)),
            FieldId::SUBMIT => Transition::Noop,
            id if on_header => Transition::Focus(advance(id, header_count)),
            _ => Transition::Noop,
        },

        NavKey::Up => match current {
            FieldId::METHOD => Transition::Noop,
            FieldId::URL => Transition::Focus(FieldId::METHOD),
            FieldId::BODY if !body.at_first_line => Transition::Delegate(FieldId::BODY),
            FieldId::BODY => Transition::Focus(FieldId::URL),
            FieldId::SUBMIT if header_count > 0 => {
                Transition::Focus(header_id(header_count - 1, HeaderSlot::Name))
            }
            FieldId::SUBMIT => Transition::Focus(FieldId::BODY),
            // First header row (name or value) goes back to the body
            id if on_header && id.0 <= FieldId::BODY.0 + 2 => Transition::Focus(FieldId::BODY),
            // Same column, previous row
            id if on_header => Transition::Focus(FieldId(id.0 - 2)),
            _ => Transition::Noop,
        },

        NavKey::Left => match current {
            FieldId::METHOD => Transition::SelectMethod(Step::Prev),
            FieldId::URL | FieldId::BODY => Transition::Delegate(current),
            FieldId::SUBMIT => Transition::Noop,
            id if on_header && id.0 > FieldId::BODY.0 + 1 => Transition::Focus(FieldId(id.0 - 1)),
            _ => Transition::Noop,
        },

        NavKey::Right => match current {
            FieldId::METHOD => Transition::SelectMethod(Step::Next),
            FieldId::URL | FieldId::BODY => Transition::Delegate(current),
            FieldId::SUBMIT => Transition::Noop,
            id if on_header => Transition::Focus(advance(id, header_count)),
            _ => Transition::Noop,
        },

        NavKey::Tab => match current {
            FieldId::BODY => Transition::Indent,
            _ => Transition::Noop,
        },

        NavKey::CtrlUp => match current {
            FieldId::BODY => Transition::Focus(FieldId::URL),
            _ => Transition::Noop,
        },

        NavKey::CtrlDown => match current {
            FieldId::BODY => Transition::Focus(after_body(header_count)),
            _ => Transition::Noop,
        },

        // `q` quits from fields that take no text; elsewhere it is typed.
        NavKey::Quit => match current {
            FieldId::METHOD | FieldId::SUBMIT => Transition::Quit,
            id => delegate_text(id, header_count),
        },

        NavKey::Other => delegate_text(current, header_count),
    }
}

fn delegate_text(id: FieldId, header_count: usize) -> Transition {
    if id == FieldId::URL || id == FieldId::BODY || id.is_header(header_count) {
        Transition::Delegate(id)
    } else {
        Transition::Noop
    }
}

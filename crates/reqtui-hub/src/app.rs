use std::time::Instant;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
};

use reqtui_core::{
    config::Config,
    key_help::KeyHelp,
    keybinds, ui,
};
use reqtui_http::{
    executor::HttpExecutor,
    form::{FormOutcome, FormState},
    pipeline::{self, ResponseState, SubmitError},
    ui as form_ui,
};

const SPINNER: [char; 8] = ['⣾', '⣽', '⣻', '⢿', '⡿', '⣟', '⣯', '⣷'];

/// Where the application is in its single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Editing,
    InFlight { started: Instant },
    Done,
}

/// The main application state.
pub struct App {
    form: FormState,
    key_help: KeyHelp,
    executor: HttpExecutor,
    response: ResponseState,
    phase: Phase,
    /// Show the current focus id under the form.
    debug: bool,
    /// Spinner frame, advanced every tick while in flight.
    spinner: usize,
    /// Whether the app should quit.
    pub should_quit: bool,
}

impl App {
    pub fn new(config: &Config, executor: HttpExecutor) -> Self {
        Self {
            form: FormState::new(),
            key_help: KeyHelp::new(),
            executor,
            response: ResponseState::default(),
            phase: Phase::Editing,
            debug: config.debug,
            spinner: 0,
            should_quit: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn response(&self) -> &ResponseState {
        &self.response
    }

    /// Poll the executor (called every ~50ms).
    pub fn tick(&mut self) {
        let Phase::InFlight { .. } = self.phase else {
            return;
        };
        self.spinner = (self.spinner + 1) % SPINNER.len();

        if let Some(result) = self.executor.try_recv() {
            self.response.apply(result.outcome, result.started);
            self.finish();
        }
    }

    /// Handle a terminal event.
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => self.handle_key(key),
            Event::Paste(text) => {
                if self.phase == Phase::Editing && !self.key_help.is_open() {
                    self.form.paste(&text);
                }
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if keybinds::is_force_quit(&key) {
            self.should_quit = true;
            return;
        }

        match self.phase {
            Phase::Editing => {}
            Phase::InFlight { .. } => {
                if key.code == KeyCode::Esc {
                    tracing::info!("request abandoned");
                    self.should_quit = true;
                }
                return;
            }
            Phase::Done => return,
        }

        if self.key_help.is_open() {
            if key.code == KeyCode::Esc {
                self.should_quit = true;
            } else {
                self.key_help.close();
            }
            return;
        }

        match self.form.handle_key(key) {
            FormOutcome::Continue => {}
            FormOutcome::Quit => self.should_quit = true,
            FormOutcome::ToggleHelp => self.key_help.toggle(),
            FormOutcome::Submit => self.submit(),
        }
    }

    /// Build the request on the UI thread and hand it to the executor.
    fn submit(&mut self) {
        let started = Instant::now();
        let snapshot = self.form.snapshot();
        tracing::info!(method = snapshot.method.as_str(), url = %snapshot.url, "submit");

        let sent = pipeline::prepare(&snapshot).and_then(|request| self.executor.send(request));
        match sent {
            Ok(()) => self.phase = Phase::InFlight { started },
            Err(err) => self.fail(err, started),
        }
    }

    fn fail(&mut self, err: SubmitError, started: Instant) {
        self.response.apply(Err(err), started);
        self.finish();
    }

    /// Record completion; the run loop draws once more before quitting.
    fn finish(&mut self) {
        self.phase = Phase::Done;
        self.should_quit = true;
    }

    /// Render the entire application.
    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let (title_area, content_area, status_area) = ui::standard_layout(area);

        let method = self.form.methods.selected().as_str();
        ui::render_title_bar(frame, title_area, "reqtui", method);

        match self.phase {
            Phase::Editing => {
                form_ui::render_form(frame, content_area, &self.form, self.debug);
                ui::render_status_bar(frame, status_area, "EDIT", "F1 help");
            }
            Phase::InFlight { started } => {
                let [form_area, spinner_area] = split_bottom(content_area);
                form_ui::render_form(frame, form_area, &self.form, self.debug);
                form_ui::render_in_flight(
                    frame,
                    spinner_area,
                    SPINNER[self.spinner],
                    started.elapsed().as_millis(),
                );
                ui::render_status_bar(frame, status_area, "SENDING", "");
            }
            Phase::Done => {
                form_ui::render_response(frame, content_area, &self.response);
                let info = self
                    .response
                    .status_code
                    .map(|code| code.to_string())
                    .unwrap_or_else(|| "failed".to_string());
                ui::render_status_bar(frame, status_area, "DONE", &info);
            }
        }

        self.key_help.render(frame, area);
    }

    /// What to print once the terminal is restored, wrapped to `width`.
    pub fn final_output(&self, width: usize) -> Option<String> {
        if self.phase != Phase::Done || self.response.is_empty() {
            return None;
        }
        Some(form_ui::plain_response(&self.response, width))
    }
}

fn split_bottom(area: Rect) -> [Rect; 2] {
    Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area)
}

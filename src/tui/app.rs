//! Main TUI application state machine.
//!
//! Handles:
//! - Screen navigation
//! - Input event handling
//! - Checkups and voice commands via the background worker

use std::io;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::adapters::csv_dataset::load_dataset;
use crate::adapters::forest::RandomForest;
use crate::adapters::speech::{CommandRecognizer, TypedRecognizer};
use crate::application::{CheckupService, Session, VoiceResponse};
use crate::config::Config;
use crate::domain::Report;

use super::ui::{
    form::{render_form, CheckupFormState},
    render_disclaimer,
    report::render_report,
    running::{render_running, RunningState},
    voice::{render_voice, VoiceState},
};
use super::worker::{CheckupWorker, CheckupWorkerHandle, Job, WorkerProgress};

/// Current screen/view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Form,
    Running,
    Report,
    Voice,
}

type CheckupSession = Session<RandomForest>;

/// Main application state
pub struct App {
    screen: Screen,

    should_quit: bool,

    /// Shared with the worker thread; never locked by the UI while a job runs
    session: Arc<Mutex<CheckupSession>>,

    /// Recognizer program; `None` means commands are typed
    recognizer: Option<CommandRecognizer>,

    form_state: CheckupFormState,

    running_state: RunningState,

    voice_state: VoiceState,

    /// Report currently on screen
    report: Option<Report>,

    /// Voice echo shown above a report produced by "check"
    report_notice: Option<String>,

    pending_worker: Option<CheckupWorkerHandle>,
}

impl App {
    /// Create the application from configuration.
    ///
    /// # Errors
    /// Fails if the dataset cannot be loaded or the forest size is invalid.
    pub fn new(config: &Config) -> Result<Self> {
        let dataset = load_dataset(&config.dataset_path).with_context(|| {
            format!(
                "Failed to load dataset from {}. Set DIACHECK_DATASET_PATH to a diabetes CSV file.",
                config.dataset_path.display()
            )
        })?;

        let forest = RandomForest::new(config.trees)?;
        tracing::info!("Random forest with {} trees", forest.n_trees());
        let checkup = CheckupService::new(Arc::new(dataset), forest).with_cache(config.cache_model);
        if config.cache_model {
            tracing::info!("Model cache enabled");
        }

        let session = Session::new(checkup, config.synthesizer());
        Ok(Self::with_dependencies(
            Arc::new(Mutex::new(session)),
            config.recognizer(),
        ))
    }

    /// Create application with injected dependencies.
    #[must_use]
    pub fn with_dependencies(
        session: Arc<Mutex<CheckupSession>>,
        recognizer: Option<CommandRecognizer>,
    ) -> Self {
        let typed = recognizer.is_none();
        Self {
            screen: Screen::Form,
            should_quit: false,
            session,
            recognizer,
            form_state: CheckupFormState::default(),
            running_state: RunningState::default(),
            voice_state: VoiceState::new(typed),
            report: None,
            report_notice: None,
            pending_worker: None,
        }
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            self.poll_worker();
            self.running_state.tick(Instant::now());

            terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(3)])
                    .split(f.area());

                let voice_ready = self.pending_worker.is_none();
                match (self.screen, &self.report) {
                    (Screen::Form, _) => render_form(f, chunks[0], &self.form_state, voice_ready),
                    (Screen::Running, _) => render_running(f, chunks[0], &self.running_state),
                    (Screen::Report, Some(report)) => {
                        render_report(f, chunks[0], report, self.report_notice.as_deref());
                    }
                    (Screen::Report, None) => render_form(f, chunks[0], &self.form_state, voice_ready),
                    (Screen::Voice, _) => render_voice(f, chunks[0], &self.voice_state),
                }

                render_disclaimer(f, chunks[1]);
            })?;

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.pending_worker.is_some()
    }

    /// Drain progress messages from the background worker.
    fn poll_worker(&mut self) {
        while let Some(progress) = self.pending_worker.as_ref().and_then(CheckupWorkerHandle::try_recv) {
            match progress {
                WorkerProgress::Listening => {
                    self.voice_state.start_listening();
                }
                WorkerProgress::Stage(stage) => {
                    self.running_state.enter(stage);
                    self.screen = Screen::Running;
                }
                WorkerProgress::Checked(report) => {
                    self.show_report(report, None);
                    self.pending_worker = None;
                }
                WorkerProgress::Voice(outcome) => {
                    self.voice_state.finish(&outcome);
                    let echo = outcome.echo();
                    match outcome.response {
                        VoiceResponse::Report(report) => self.show_report(report, Some(echo)),
                        _ => self.screen = Screen::Voice,
                    }
                    self.pending_worker = None;
                }
                WorkerProgress::Failed { message, warning } => {
                    if self.screen == Screen::Running && !self.voice_state.listening {
                        self.form_state.error_message = Some(message);
                        self.screen = Screen::Form;
                    } else {
                        self.voice_state.fail(message, warning);
                        self.screen = Screen::Voice;
                    }
                    self.pending_worker = None;
                }
            }
        }
    }

    fn show_report(&mut self, report: Report, notice: Option<String>) {
        self.report = Some(report);
        self.report_notice = notice;
        self.running_state = RunningState::default();
        self.screen = Screen::Report;
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Form => self.handle_form_key(key),
            Screen::Report => self.handle_report_key(key),
            Screen::Voice => self.handle_voice_key(key),
            Screen::Running => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Up | KeyCode::BackTab => self.form_state.prev_field(),
            KeyCode::Down | KeyCode::Tab => self.form_state.next_field(),
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Char('d') | KeyCode::Char('D') => self.form_state.restore_defaults(),
            KeyCode::Char('v') | KeyCode::Char('V') => self.open_voice(),
            KeyCode::Char(c) => self.form_state.input_char(c),
            KeyCode::Backspace => self.form_state.delete_char(),
            KeyCode::Delete => self.form_state.clear_field(),
            KeyCode::Enter => self.submit_form(),
            _ => {}
        }
    }

    fn handle_report_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Enter | KeyCode::Esc => self.screen = Screen::Form,
            KeyCode::Char('v') | KeyCode::Char('V') => self.open_voice(),
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_voice_key(&mut self, key: KeyCode) {
        if self.is_busy() {
            return;
        }
        match key {
            KeyCode::Esc => self.screen = Screen::Form,
            KeyCode::Enter => self.start_voice_command(),
            KeyCode::Backspace if self.voice_state.typed => self.voice_state.delete_char(),
            KeyCode::Char(c) if self.voice_state.typed => self.voice_state.input_char(c),
            _ => {}
        }
    }

    fn submit_form(&mut self) {
        if self.is_busy() {
            return;
        }
        match self.form_state.to_record() {
            Ok(record) => {
                self.running_state = RunningState::default();
                self.screen = Screen::Running;
                self.pending_worker = Some(CheckupWorker::spawn(self.session.clone(), Job::Check(record)));
            }
            Err(e) => {
                tracing::debug!("Form rejected with {} issue(s)", e.issues.len());
            }
        }
    }

    fn open_voice(&mut self) {
        if self.is_busy() {
            return;
        }
        self.voice_state = VoiceState::new(self.recognizer.is_none());
        self.screen = Screen::Voice;
        if self.recognizer.is_some() {
            self.start_voice_command();
        }
    }

    fn start_voice_command(&mut self) {
        if self.is_busy() {
            return;
        }
        let job = match &self.recognizer {
            Some(recognizer) => Job::Voice(Box::new(recognizer.clone())),
            None => {
                let text = self.voice_state.take_input();
                if text.trim().is_empty() {
                    return;
                }
                Job::Voice(Box::new(TypedRecognizer::new(text)))
            }
        };
        self.voice_state.start_listening();
        self.running_state = RunningState::default();
        self.pending_worker = Some(CheckupWorker::spawn(self.session.clone(), job));
    }
}

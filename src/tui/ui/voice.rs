//! Voice command view.
//!
//! With a recognizer program configured the screen shows "Say a command..."
//! while the worker listens. Otherwise the command is typed into a prompt.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::application::{VoiceOutcome, VoiceResponse};
use crate::tui::styles::CheckupTheme;

/// How the last command ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceResult {
    /// Suggestion text, shown and spoken
    Suggestion(String),
    Warning(String),
    Error(String),
}

/// Voice screen state
#[derive(Debug, Clone, Default)]
pub struct VoiceState {
    /// Commands are typed rather than recorded
    pub typed: bool,
    pub input: String,
    pub listening: bool,
    /// "Command recognized: ..." line
    pub echo: Option<String>,
    pub result: Option<VoiceResult>,
}

impl VoiceState {
    #[must_use]
    pub fn new(typed: bool) -> Self {
        Self {
            typed,
            ..Self::default()
        }
    }

    pub fn input_char(&mut self, c: char) {
        if !c.is_control() {
            self.input.push(c);
        }
    }

    pub fn delete_char(&mut self) {
        self.input.pop();
    }

    /// Take the typed command, leaving the prompt empty.
    pub fn take_input(&mut self) -> String {
        std::mem::take(&mut self.input)
    }

    pub fn start_listening(&mut self) {
        self.listening = true;
        self.echo = None;
        self.result = None;
    }

    /// Record a handled command. A repeated check is shown on the report
    /// screen, so only its echo is kept here.
    pub fn finish(&mut self, outcome: &VoiceOutcome) {
        self.listening = false;
        self.echo = Some(outcome.echo());
        self.result = match &outcome.response {
            VoiceResponse::Report(_) => None,
            VoiceResponse::Suggestion { text, .. } => Some(VoiceResult::Suggestion((*text).to_string())),
            VoiceResponse::Rejected(message) => Some(VoiceResult::Warning((*message).to_string())),
        };
    }

    pub fn fail(&mut self, message: String, warning: bool) {
        self.listening = false;
        self.result = Some(if warning {
            VoiceResult::Warning(message)
        } else {
            VoiceResult::Error(message)
        });
    }
}

pub fn render_voice(f: &mut Frame, area: Rect, state: &VoiceState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Prompt
            Constraint::Min(0),    // Result
            Constraint::Length(3), // Keys
        ])
        .split(area);

    let header = Paragraph::new(Line::from(vec![
        Span::styled(" Voice Command ", CheckupTheme::header()),
        Span::styled(
            " │ Try saying 'Check' or 'Suggestion'",
            CheckupTheme::text_secondary(),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(CheckupTheme::border()),
    );
    f.render_widget(header, chunks[0]);

    render_prompt(f, chunks[1], state);
    render_result(f, chunks[2], state);
    render_voice_keys(f, chunks[3], state);
}

fn render_prompt(f: &mut Frame, area: Rect, state: &VoiceState) {
    let line = if state.listening {
        Line::from(Span::styled("Say a command...", CheckupTheme::focused()))
    } else if state.typed {
        Line::from(vec![
            Span::styled("> ", CheckupTheme::key_hint()),
            Span::styled(state.input.as_str(), CheckupTheme::text()),
            Span::styled("▌", CheckupTheme::cursor()),
        ])
    } else {
        Line::from(Span::styled(
            "Press Enter to listen",
            CheckupTheme::text_muted(),
        ))
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(CheckupTheme::border_focused());
    f.render_widget(Paragraph::new(line).block(block), area);
}

fn render_result(f: &mut Frame, area: Rect, state: &VoiceState) {
    let mut lines = Vec::new();
    if let Some(echo) = &state.echo {
        lines.push(Line::from(Span::styled(echo.as_str(), CheckupTheme::info())));
        lines.push(Line::from(""));
    }
    match &state.result {
        Some(VoiceResult::Suggestion(text)) => {
            lines.push(Line::from(Span::styled(text.as_str(), CheckupTheme::success())));
        }
        Some(VoiceResult::Warning(text)) => {
            lines.push(Line::from(vec![
                Span::styled("! ", CheckupTheme::warning()),
                Span::styled(text.as_str(), CheckupTheme::warning()),
            ]));
        }
        Some(VoiceResult::Error(text)) => {
            lines.push(Line::from(vec![
                Span::styled("! Error: ", CheckupTheme::danger()),
                Span::styled(text.as_str(), CheckupTheme::danger()),
            ]));
        }
        None => {}
    }

    let content = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(CheckupTheme::border()),
        );
    f.render_widget(content, area);
}

fn render_voice_keys(f: &mut Frame, area: Rect, state: &VoiceState) {
    let content = if state.listening {
        Line::from(Span::styled("Listening...", CheckupTheme::text_muted()))
    } else {
        let action = if state.typed { "Send " } else { "Listen " };
        Line::from(vec![
            Span::styled("[Enter] ", CheckupTheme::key_hint()),
            Span::styled(action, CheckupTheme::key_desc()),
            Span::styled("[Esc] ", CheckupTheme::key_hint()),
            Span::styled("Back to Form", CheckupTheme::key_desc()),
        ])
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(CheckupTheme::border()),
    );
    f.render_widget(footer, area);
}

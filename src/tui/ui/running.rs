//! Progress view shown while the worker runs.

use std::time::Instant;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::application::Stage;
use crate::tui::styles::CheckupTheme;

/// Current stage and gauge position.
#[derive(Debug, Clone)]
pub struct RunningState {
    pub stage: Option<Stage>,
    pub progress: f64,
    stage_started: Instant,
}

impl Default for RunningState {
    fn default() -> Self {
        Self {
            stage: None,
            progress: 0.0,
            stage_started: Instant::now(),
        }
    }
}

fn next_floor(stage: Stage) -> f64 {
    match stage {
        Stage::Splitting => Stage::Training.progress(),
        Stage::Training => Stage::Predicting.progress(),
        Stage::Predicting => Stage::Scoring.progress(),
        Stage::Scoring => Stage::Speaking.progress(),
        Stage::Speaking => 0.98,
    }
}

impl RunningState {
    /// Jump to the start of `stage`; the gauge never moves backwards.
    pub fn enter(&mut self, stage: Stage) {
        self.stage = Some(stage);
        self.progress = self.progress.max(stage.progress());
        self.stage_started = Instant::now();
    }

    /// Ease toward the next stage's floor while the current one runs.
    pub fn tick(&mut self, now: Instant) {
        let Some(stage) = self.stage else {
            return;
        };
        let elapsed = now.saturating_duration_since(self.stage_started).as_secs_f64();
        let start = stage.progress();
        let target = next_floor(stage) - 0.01;
        let k = 1.0 - (-elapsed / 1.5).exp();
        let desired = start + (target - start) * k;
        self.progress = self.progress.max(desired).min(target.max(self.progress));
    }
}

pub fn render_running(f: &mut Frame, area: Rect, state: &RunningState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .margin(2)
        .split(area);

    let stage_label = state.stage.map_or("Listening for a command", Stage::label);
    let stage_text = Paragraph::new(Line::from(vec![
        Span::styled("Stage: ", CheckupTheme::text_secondary()),
        Span::styled(stage_label, CheckupTheme::focused()),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(stage_text, chunks[0]);

    let percent = (state.progress * 100.0).clamp(0.0, 100.0);
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(CheckupTheme::border()),
        )
        .gauge_style(CheckupTheme::info())
        .percent(percent as u16)
        .label(format!("{percent:.0}%"));
    f.render_widget(gauge, chunks[1]);

    let hint = Paragraph::new(Line::from(Span::styled(
        "Please wait...",
        CheckupTheme::text_muted(),
    )))
    .alignment(Alignment::Center);
    f.render_widget(hint, chunks[2]);
}

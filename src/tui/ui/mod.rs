//! UI module: View components for the TUI.

pub mod form;
pub mod report;
pub mod running;
pub mod voice;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tui::styles::CheckupTheme;

pub fn render_disclaimer(f: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(vec![Span::styled(
            "DISCLAIMER: This checkup gives a quick indicative estimate and does not replace professional medical evaluation.",
            CheckupTheme::text_muted(),
        )]),
        Line::from(vec![Span::styled(
            "The model is trained on a small reference table; accuracy is reported on its held-out rows.",
            CheckupTheme::text_muted(),
        )]),
    ];

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(CheckupTheme::border());

    let p = Paragraph::new(text).block(block).wrap(Wrap { trim: true });

    f.render_widget(p, area);
}

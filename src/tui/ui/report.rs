//! Checkup report view.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::domain::{Label, Report};
use crate::tui::styles::CheckupTheme;

/// Render the report for the last checkup.
///
/// `notice` is an optional line shown above the report, used to echo the
/// voice command that produced it.
pub fn render_report(f: &mut Frame, area: Rect, report: &Report, notice: Option<&str>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(if notice.is_some() { 2 } else { 0 }),
            Constraint::Length(4), // Your Report
            Constraint::Min(6),    // Health Tip
            Constraint::Length(5), // Model Accuracy
            Constraint::Length(2), // Keys
        ])
        .margin(1)
        .split(area);

    if let Some(notice) = notice {
        f.render_widget(
            Paragraph::new(Span::styled(notice, CheckupTheme::info())),
            chunks[0],
        );
    }

    render_outcome(f, chunks[1], report);
    render_tip(f, chunks[2], report);
    render_accuracy(f, chunks[3], report);
    render_report_keys(f, chunks[4]);
}

fn section(title: &str) -> Block<'_> {
    Block::default()
        .title(Span::styled(format!(" {title} "), CheckupTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(CheckupTheme::border())
}

fn render_outcome(f: &mut Frame, area: Rect, report: &Report) {
    let style = CheckupTheme::label(report.label());
    let icon = match report.label() {
        Label::Healthy => "OK",
        Label::NotHealthy => "!",
    };

    let content = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(format!("{icon} "), style),
            Span::styled(report.advice.display, style.add_modifier(Modifier::BOLD)),
        ]),
        Line::from(Span::styled(
            report.prediction.checked_at_message(),
            CheckupTheme::text_muted(),
        )),
    ])
    .alignment(Alignment::Center)
    .block(section("Your Report:"));

    f.render_widget(content, area);
}

fn render_tip(f: &mut Frame, area: Rect, report: &Report) {
    let mut lines: Vec<Line> = report
        .advice
        .guidance
        .iter()
        .map(|g| Line::from(Span::styled(*g, CheckupTheme::text())))
        .collect();

    let spoken_style = match report.label() {
        Label::Healthy => CheckupTheme::text(),
        Label::NotHealthy => CheckupTheme::danger(),
    };
    lines.push(Line::from(Span::styled(report.advice.spoken, spoken_style)));

    let content = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(section("Health Tip:"));

    f.render_widget(content, area);
}

fn render_accuracy(f: &mut Frame, area: Rect, report: &Report) {
    let block = section("Model Accuracy:");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    f.render_widget(
        Paragraph::new(Span::styled(
            report.prediction.accuracy_message(),
            CheckupTheme::text(),
        )),
        rows[0],
    );

    let fraction = report.prediction.accuracy / 100.0;
    let gauge = Gauge::default()
        .gauge_style(CheckupTheme::gauge(fraction))
        .ratio(fraction.clamp(0.0, 1.0))
        .label(format!(
            "{:.2}% (train {}, test {})",
            report.prediction.accuracy, report.prediction.train_size, report.prediction.test_size
        ));
    f.render_widget(gauge, rows[1]);
}

fn render_report_keys(f: &mut Frame, area: Rect) {
    let keys = Paragraph::new(Line::from(vec![
        Span::styled("[Enter] ", CheckupTheme::key_hint()),
        Span::styled("Back to Form ", CheckupTheme::key_desc()),
        Span::styled("[V] ", CheckupTheme::key_hint()),
        Span::styled("Voice Command ", CheckupTheme::key_desc()),
        Span::styled("[Q] ", CheckupTheme::key_hint()),
        Span::styled("Quit", CheckupTheme::key_desc()),
    ]));
    f.render_widget(keys, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Prediction;
    use ratatui::{backend::TestBackend, Terminal};

    fn rendered(report: &Report, notice: Option<&str>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(90, 30)).expect("Test terminal");
        terminal
            .draw(|f| render_report(f, f.area(), report, notice))
            .expect("Report renders");
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_report_sections_and_timestamp() {
        let mut prediction = Prediction::new(Label::Healthy, 60.0, 40, 10);
        prediction.checked_at = chrono::DateTime::parse_from_rfc3339("2024-03-05T14:07:09Z")
            .expect("valid timestamp")
            .with_timezone(&chrono::Utc);
        let screen = rendered(&Report::new(prediction), Some("Command recognized: check"));

        assert!(screen.contains("Command recognized: check"));
        assert!(screen.contains("Your Report:"));
        assert!(screen.contains("You are healthy."));
        assert!(screen.contains("Checked at 2024-03-05 14:07:09 UTC"));
        assert!(screen.contains("Health Tip:"));
        assert!(screen.contains("Model Accuracy:"));
        assert!(screen.contains("The model accuracy on the test data is 60.00%."));
    }
}

//! Palette and preset styles for the checkup screens.
//!
//! Outcome colours carry meaning: green for a healthy prediction, red for a
//! not-healthy one or a failed action, amber for recoverable warnings.

use ratatui::style::{Color, Modifier, Style};

use crate::domain::Label;

/// Checkup colour palette.
pub struct CheckupTheme;

impl CheckupTheme {
    // Accent

    /// Sky blue for headers and focused borders
    pub const ACCENT: Color = Color::Rgb(2, 132, 199); // #0284C7
    pub const ACCENT_BRIGHT: Color = Color::Rgb(56, 189, 248); // #38BDF8
    pub const ACCENT_DEEP: Color = Color::Rgb(7, 89, 133); // #075985

    // Outcomes

    pub const HEALTHY: Color = Color::Rgb(34, 197, 94); // #22C55E
    pub const CAUTION: Color = Color::Rgb(245, 158, 11); // #F59E0B
    pub const ALERT: Color = Color::Rgb(239, 68, 68); // #EF4444
    /// Echoed voice transcripts
    pub const NOTICE: Color = Color::Rgb(129, 140, 248); // #818CF8

    // Text and chrome

    pub const BACKDROP: Color = Color::Rgb(17, 24, 39); // #111827
    pub const INK: Color = Color::Rgb(243, 244, 246); // #F3F4F6
    pub const INK_SOFT: Color = Color::Rgb(156, 163, 175); // #9CA3AF
    pub const INK_FAINT: Color = Color::Rgb(107, 114, 128); // #6B7280
    pub const OUTLINE: Color = Color::Rgb(75, 85, 99); // #4B5563

    /// Report section headings ("Your Report:", "Health Tip:")
    #[must_use]
    pub fn subtitle() -> Style {
        Style::default()
            .fg(Self::ACCENT_BRIGHT)
            .add_modifier(Modifier::BOLD)
    }

    /// Field values and advice text
    #[must_use]
    pub fn text() -> Style {
        Style::default().fg(Self::INK)
    }

    /// Field labels and screen captions
    #[must_use]
    pub fn text_secondary() -> Style {
        Style::default().fg(Self::INK_SOFT)
    }

    /// Ranges, placeholders and the disclaimer
    #[must_use]
    pub fn text_muted() -> Style {
        Style::default().fg(Self::INK_FAINT)
    }

    #[must_use]
    pub fn success() -> Style {
        Style::default().fg(Self::HEALTHY)
    }

    #[must_use]
    pub fn warning() -> Style {
        Style::default().fg(Self::CAUTION)
    }

    #[must_use]
    pub fn danger() -> Style {
        Style::default().fg(Self::ALERT)
    }

    /// Voice command echo
    #[must_use]
    pub fn info() -> Style {
        Style::default().fg(Self::NOTICE)
    }

    /// Highlighted form row
    #[must_use]
    pub fn selected() -> Style {
        Style::default()
            .fg(Self::BACKDROP)
            .bg(Self::ACCENT_BRIGHT)
            .add_modifier(Modifier::BOLD)
    }

    /// "Say a command..." while the recognizer listens
    #[must_use]
    pub fn focused() -> Style {
        Style::default()
            .fg(Self::ACCENT_BRIGHT)
            .add_modifier(Modifier::BOLD | Modifier::ITALIC)
    }

    /// Input cursor block
    #[must_use]
    pub fn cursor() -> Style {
        Style::default()
            .fg(Self::ACCENT_BRIGHT)
            .add_modifier(Modifier::SLOW_BLINK)
    }

    #[must_use]
    pub fn border() -> Style {
        Style::default().fg(Self::OUTLINE)
    }

    /// Border of the panel taking input
    #[must_use]
    pub fn border_focused() -> Style {
        Style::default().fg(Self::ACCENT)
    }

    /// Screen title bar
    #[must_use]
    pub fn header() -> Style {
        Style::default()
            .fg(Self::INK)
            .bg(Self::ACCENT_DEEP)
            .add_modifier(Modifier::BOLD)
    }

    /// `[Key]` in the footer hints
    #[must_use]
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Self::ACCENT_BRIGHT)
            .add_modifier(Modifier::BOLD)
    }

    /// Action text next to a key hint
    #[must_use]
    pub fn key_desc() -> Style {
        Style::default().fg(Self::INK_SOFT)
    }

    /// Outcome style: success when healthy, danger otherwise.
    #[must_use]
    pub fn label(label: Label) -> Style {
        match label {
            Label::Healthy => Self::success(),
            Label::NotHealthy => Self::danger(),
        }
    }

    /// Gauge style for an accuracy fraction in [0, 1].
    #[must_use]
    pub fn gauge(fraction: f64) -> Style {
        if fraction >= 0.7 {
            Self::success()
        } else if fraction >= 0.5 {
            Self::warning()
        } else {
            Self::danger()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_styles() {
        assert_eq!(CheckupTheme::label(Label::Healthy), CheckupTheme::success());
        assert_eq!(CheckupTheme::label(Label::NotHealthy), CheckupTheme::danger());
    }

    #[test]
    fn test_gauge_thresholds() {
        assert_eq!(CheckupTheme::gauge(0.8), CheckupTheme::success());
        assert_eq!(CheckupTheme::gauge(0.6), CheckupTheme::warning());
        assert_eq!(CheckupTheme::gauge(0.2), CheckupTheme::danger());
    }

    #[test]
    fn test_selected_row_is_readable() {
        let style = CheckupTheme::selected();
        assert_ne!(style.fg, style.bg);
        assert!(style.add_modifier.contains(Modifier::BOLD));
    }
}

//! Voice command interpretation.
//!
//! A transcript is matched by substring on its lower-cased form. "check" wins
//! over "suggestion" when both appear.

use super::advice::suggestion;
use super::outcome::Label;

/// Warning shown for any phrase that is not a known command.
pub const INVALID_COMMAND: &str = "Invalid command. Try saying 'Check' or 'Suggestion'.";

/// Recognized phrase class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Check,
    Suggestion,
    Unknown,
}

impl Command {
    #[must_use]
    pub fn parse(transcript: &str) -> Self {
        let lowered = transcript.to_lowercase();
        if lowered.contains("check") {
            Self::Check
        } else if lowered.contains("suggestion") {
            Self::Suggestion
        } else {
            Self::Unknown
        }
    }
}

/// What the session should do in response to a transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Re-run the checkup with the last submitted record
    RepeatPrediction,
    /// Show and speak the suggestion for the last label
    SpeakSuggestion { label: Label, text: &'static str },
    /// Unknown phrase
    Reject { message: &'static str },
}

/// A suggestion was requested before any prediction was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("No prediction yet. Submit your health data with 'Check' first.")]
pub struct NoPriorPrediction;

/// Map a transcript to an action.
///
/// # Errors
/// Returns [`NoPriorPrediction`] for a suggestion request when
/// `last_label` is `None`.
pub fn interpret(transcript: &str, last_label: Option<Label>) -> Result<Action, NoPriorPrediction> {
    match Command::parse(transcript) {
        Command::Check => Ok(Action::RepeatPrediction),
        Command::Suggestion => {
            let label = last_label.ok_or(NoPriorPrediction)?;
            Ok(Action::SpeakSuggestion {
                label,
                text: suggestion(label),
            })
        }
        Command::Unknown => Ok(Action::Reject {
            message: INVALID_COMMAND,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_phrase() {
        assert_eq!(
            interpret("please check my status", None),
            Ok(Action::RepeatPrediction)
        );
    }

    #[test]
    fn test_suggestion_uses_last_label() {
        let action = interpret("give me a suggestion", Some(Label::NotHealthy)).expect("Should interpret");
        assert_eq!(
            action,
            Action::SpeakSuggestion {
                label: Label::NotHealthy,
                text: suggestion(Label::NotHealthy),
            }
        );

        let action = interpret("suggestion", Some(Label::Healthy)).expect("Should interpret");
        assert!(matches!(action, Action::SpeakSuggestion { label: Label::Healthy, .. }));
    }

    #[test]
    fn test_suggestion_without_prediction() {
        assert_eq!(interpret("give me a suggestion", None), Err(NoPriorPrediction));
    }

    #[test]
    fn test_unknown_phrase_rejected() {
        assert_eq!(
            interpret("hello there", Some(Label::Healthy)),
            Ok(Action::Reject {
                message: "Invalid command. Try saying 'Check' or 'Suggestion'."
            })
        );
    }

    #[test]
    fn test_matching_is_case_insensitive_and_ordered() {
        assert_eq!(Command::parse("CHECK please"), Command::Check);
        assert_eq!(Command::parse("Suggestion or check"), Command::Check);
        assert_eq!(Command::parse("any Suggestions?"), Command::Suggestion);
        assert_eq!(Command::parse(""), Command::Unknown);
    }
}

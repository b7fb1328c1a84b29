//! Session: The state carried between user actions.
//!
//! Holds the checkup service, the synthesizer, the last submitted record and
//! the last report. Voice commands act on that state.

use crate::domain::{interpret, Action, HealthInput, HealthRecord, Label, NoPriorPrediction, Report};
use crate::ports::{SpeechRecognizer, SpeechSynthesizer, Trainer};
use crate::DiacheckError;

use super::checkup::{CheckupService, Stage};

/// Result of a voice command, after any action has been carried out.
#[derive(Debug, Clone)]
pub enum VoiceResponse {
    /// "check": the workflow ran again
    Report(Report),
    /// "suggestion": the text was shown and spoken
    Suggestion { label: Label, text: &'static str },
    /// Unknown phrase
    Rejected(&'static str),
}

#[derive(Debug, Clone)]
pub struct VoiceOutcome {
    pub transcript: String,
    pub response: VoiceResponse,
}

impl VoiceOutcome {
    /// Echo line shown above the response.
    #[must_use]
    pub fn echo(&self) -> String {
        format!("Command recognized: {}", self.transcript)
    }
}

pub struct Session<T: Trainer> {
    checkup: CheckupService<T>,
    synthesizer: Box<dyn SpeechSynthesizer>,
    last_record: Option<HealthRecord>,
    last_report: Option<Report>,
}

impl<T: Trainer> Session<T> {
    pub fn new(checkup: CheckupService<T>, synthesizer: Box<dyn SpeechSynthesizer>) -> Self {
        Self {
            checkup,
            synthesizer,
            last_record: None,
            last_report: None,
        }
    }

    /// Run a checkup and speak its tip.
    ///
    /// # Errors
    /// See [`CheckupService::run`]. Synthesis failures are logged, not returned.
    pub fn submit(&mut self, record: HealthRecord) -> Result<Report, DiacheckError> {
        self.submit_with_progress(record, |_| {})
    }

    /// Validate raw input, then [`Self::submit`].
    ///
    /// # Errors
    /// Returns [`DiacheckError::Validation`] before any training happens.
    pub fn submit_input(&mut self, input: HealthInput) -> Result<Report, DiacheckError> {
        let record = input.validate()?;
        self.submit(record)
    }

    /// [`Self::submit`] with stage notifications, including [`Stage::Speaking`].
    ///
    /// # Errors
    /// See [`Self::submit`].
    pub fn submit_with_progress<F>(
        &mut self,
        record: HealthRecord,
        mut progress: F,
    ) -> Result<Report, DiacheckError>
    where
        F: FnMut(Stage),
    {
        let report = self.checkup.run_with_progress(&record, &mut progress)?;

        progress(Stage::Speaking);
        self.say(report.advice.spoken);

        self.last_record = Some(record);
        self.last_report = Some(report.clone());
        Ok(report)
    }

    /// Interpret a transcript and carry out the action.
    ///
    /// # Errors
    /// Returns [`DiacheckError::NoPriorPrediction`] for "check" or
    /// "suggestion" before the first submission, or the errors of
    /// [`Self::submit`] for a repeated check.
    pub fn handle_transcript(&mut self, transcript: &str) -> Result<VoiceOutcome, DiacheckError> {
        self.handle_transcript_with_progress(transcript, |_| {})
    }

    /// [`Self::handle_transcript`] with stage notifications for a repeated check.
    ///
    /// # Errors
    /// See [`Self::handle_transcript`].
    pub fn handle_transcript_with_progress<F>(
        &mut self,
        transcript: &str,
        progress: F,
    ) -> Result<VoiceOutcome, DiacheckError>
    where
        F: FnMut(Stage),
    {
        tracing::info!("Voice command received ({} characters)", transcript.len());

        let response = match interpret(transcript, self.last_label())? {
            Action::RepeatPrediction => {
                let record = self.last_record.ok_or(NoPriorPrediction)?;
                VoiceResponse::Report(self.submit_with_progress(record, progress)?)
            }
            Action::SpeakSuggestion { label, text } => {
                self.say(text);
                VoiceResponse::Suggestion { label, text }
            }
            Action::Reject { message } => {
                tracing::warn!("Unrecognized voice command");
                VoiceResponse::Rejected(message)
            }
        };

        Ok(VoiceOutcome {
            transcript: transcript.to_string(),
            response,
        })
    }

    /// Listen for one command, then handle it.
    ///
    /// # Errors
    /// Returns [`DiacheckError::Speech`] if recognition fails, otherwise see
    /// [`Self::handle_transcript`].
    pub fn voice_command(
        &mut self,
        recognizer: &dyn SpeechRecognizer,
    ) -> Result<VoiceOutcome, DiacheckError> {
        self.voice_command_with_progress(recognizer, |_| {})
    }

    /// [`Self::voice_command`] with stage notifications for a repeated check.
    ///
    /// # Errors
    /// See [`Self::voice_command`].
    pub fn voice_command_with_progress<F>(
        &mut self,
        recognizer: &dyn SpeechRecognizer,
        progress: F,
    ) -> Result<VoiceOutcome, DiacheckError>
    where
        F: FnMut(Stage),
    {
        let transcript = recognizer.listen()?;
        self.handle_transcript_with_progress(&transcript, progress)
    }

    #[must_use]
    pub fn last_report(&self) -> Option<&Report> {
        self.last_report.as_ref()
    }

    #[must_use]
    pub fn last_label(&self) -> Option<Label> {
        self.last_report.as_ref().map(Report::label)
    }

    #[must_use]
    pub fn last_record(&self) -> Option<&HealthRecord> {
        self.last_record.as_ref()
    }

    #[must_use]
    pub fn checkup(&self) -> &CheckupService<T> {
        &self.checkup
    }

    fn say(&self, text: &str) {
        if let Err(e) = self.synthesizer.speak(text) {
            tracing::warn!("Speech synthesis failed: {e}");
        }
    }
}

//! Speech adapters: External programs behind the speech ports.
//!
//! Recognition and synthesis are delegated to whatever the host provides:
//! - `CommandRecognizer` runs a recorder/recognizer program that prints a
//!   Vosk-style JSON result (`{"text": "..."}`) on stdout
//! - `CommandSynthesizer` runs a TTS program such as `espeak` with the text
//!   as its last argument
//! - `TypedRecognizer` and `SilentSynthesizer` stand in when neither is
//!   configured

use std::process::{Command, Stdio};
use std::time::Duration;

use serde::Deserialize;

use crate::ports::{SpeechError, SpeechRecognizer, SpeechSynthesizer, SynthesisError};

/// Environment variable handed to the recognizer with the calibration window.
pub const AMBIENT_SECS_ENV: &str = "DIACHECK_AMBIENT_SECS";

/// Split a configured command line into program and arguments.
fn split_command_line(command_line: &str) -> Option<(String, Vec<String>)> {
    let mut parts = command_line.split_whitespace().map(str::to_string);
    let program = parts.next()?;
    Some((program, parts.collect()))
}

/// One line of recognizer output.
#[derive(Debug, Deserialize)]
struct RecognizerOutput {
    #[serde(default)]
    text: String,
}

/// Extract the transcript from recognizer stdout.
///
/// Recognizers may print partial results first; the last non-empty line wins.
fn parse_transcript(stdout: &str) -> Result<String, SpeechError> {
    let line = stdout
        .lines()
        .map(str::trim)
        .rev()
        .find(|l| !l.is_empty())
        .ok_or(SpeechError::Unrecognized)?;

    let output: RecognizerOutput =
        serde_json::from_str(line).map_err(|_| SpeechError::Unrecognized)?;

    let transcript = output.text.trim().to_lowercase();
    if transcript.is_empty() {
        Err(SpeechError::Unrecognized)
    } else {
        Ok(transcript)
    }
}

/// Speech recognizer backed by an external program.
#[derive(Debug, Clone)]
pub struct CommandRecognizer {
    program: String,
    args: Vec<String>,
    ambient: Duration,
}

impl CommandRecognizer {
    /// Build from a command line such as `vosk-listen --model small-en`.
    ///
    /// Returns `None` for a blank command line.
    #[must_use]
    pub fn from_command_line(command_line: &str, ambient: Duration) -> Option<Self> {
        let (program, args) = split_command_line(command_line)?;
        Some(Self {
            program,
            args,
            ambient,
        })
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }
}

impl SpeechRecognizer for CommandRecognizer {
    fn listen(&self) -> Result<String, SpeechError> {
        tracing::debug!(
            "Listening via '{}' (ambient calibration {}s)",
            self.program,
            self.ambient.as_secs()
        );

        let output = Command::new(&self.program)
            .args(&self.args)
            .env(AMBIENT_SECS_ENV, self.ambient.as_secs().to_string())
            .stdin(Stdio::null())
            .output()
            .map_err(|e| SpeechError::ServiceUnavailable(format!("{}: {e}", self.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SpeechError::ServiceUnavailable(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        parse_transcript(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Recognizer for a command typed instead of spoken.
#[derive(Debug, Clone)]
pub struct TypedRecognizer {
    text: String,
}

impl TypedRecognizer {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl SpeechRecognizer for TypedRecognizer {
    fn listen(&self) -> Result<String, SpeechError> {
        let transcript = self.text.trim().to_lowercase();
        if transcript.is_empty() {
            Err(SpeechError::Unrecognized)
        } else {
            Ok(transcript)
        }
    }
}

/// Speech synthesizer backed by an external program.
#[derive(Debug, Clone)]
pub struct CommandSynthesizer {
    program: String,
    args: Vec<String>,
}

impl CommandSynthesizer {
    /// Build from a command line such as `espeak -s 150`.
    ///
    /// Returns `None` for a blank command line.
    #[must_use]
    pub fn from_command_line(command_line: &str) -> Option<Self> {
        let (program, args) = split_command_line(command_line)?;
        Some(Self { program, args })
    }
}

impl SpeechSynthesizer for CommandSynthesizer {
    fn speak(&self, text: &str) -> Result<(), SynthesisError> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|source| SynthesisError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(SynthesisError::Failed {
                program: self.program.clone(),
                status: status.to_string(),
            })
        }
    }
}

/// Synthesizer that says nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSynthesizer;

impl SpeechSynthesizer for SilentSynthesizer {
    fn speak(&self, text: &str) -> Result<(), SynthesisError> {
        tracing::debug!("Speech disabled, skipping {} characters", text.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_transcript_lowercases() {
        assert_eq!(
            parse_transcript("{\"text\": \"Please CHECK my status\"}\n"),
            Ok("please check my status".to_string())
        );
    }

    #[test]
    fn test_parse_transcript_uses_last_line() {
        let stdout = "{\"partial\": \"give me\"}\n{\"text\": \"give me a suggestion\"}\n\n";
        assert_eq!(parse_transcript(stdout), Ok("give me a suggestion".to_string()));
    }

    #[test]
    fn test_parse_transcript_unrecognized() {
        assert_eq!(parse_transcript(""), Err(SpeechError::Unrecognized));
        assert_eq!(parse_transcript("{\"text\": \"  \"}"), Err(SpeechError::Unrecognized));
        assert_eq!(parse_transcript("not json"), Err(SpeechError::Unrecognized));
    }

    #[test]
    fn test_command_line_parsing() {
        assert!(CommandRecognizer::from_command_line("   ", Duration::from_secs(5)).is_none());

        let recognizer = CommandRecognizer::from_command_line("vosk-listen --model en", Duration::from_secs(5))
            .expect("Should parse");
        assert_eq!(recognizer.program(), "vosk-listen");
        assert_eq!(recognizer.args, vec!["--model", "en"]);
    }

    #[test]
    fn test_missing_recognizer_program_is_unavailable() {
        let recognizer = CommandRecognizer::from_command_line(
            "diacheck-no-such-recognizer-program",
            Duration::from_secs(0),
        )
        .expect("Should parse");
        assert!(matches!(recognizer.listen(), Err(SpeechError::ServiceUnavailable(_))));
    }

    #[test]
    fn test_missing_synthesizer_program_fails() {
        let synth = CommandSynthesizer::from_command_line("diacheck-no-such-tts-program")
            .expect("Should parse");
        assert!(matches!(synth.speak("hello"), Err(SynthesisError::Spawn { .. })));
    }

    #[test]
    fn test_typed_recognizer() {
        assert_eq!(TypedRecognizer::new("  Check ").listen(), Ok("check".to_string()));
        assert_eq!(TypedRecognizer::new("").listen(), Err(SpeechError::Unrecognized));
    }

    #[test]
    fn test_silent_synthesizer() {
        assert!(SilentSynthesizer.speak("anything").is_ok());
    }
}

//! Speech ports: Traits for the speech-to-text and text-to-speech collaborators.
//!
//! Both calls block: recognition for the calibration window plus the
//! utterance, synthesis until playback ends.

/// Speech recognition failures. Both are recoverable: the user may retry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpeechError {
    #[error("Sorry, I could not understand the audio.")]
    Unrecognized,

    #[error("Could not request results from the speech recognition service; {0}")]
    ServiceUnavailable(String),
}

/// Speech synthesis failures. Logged by callers, never propagated.
#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    #[error("cannot start speech synthesizer '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("speech synthesizer '{program}' exited with {status}")]
    Failed { program: String, status: String },
}

/// Captures one utterance and returns its lower-cased transcript.
pub trait SpeechRecognizer: Send + Sync {
    /// # Errors
    /// [`SpeechError::Unrecognized`] when the audio held no usable speech,
    /// [`SpeechError::ServiceUnavailable`] when the backend could not be reached.
    fn listen(&self) -> Result<String, SpeechError>;
}

/// Reads text aloud, returning once playback finishes.
pub trait SpeechSynthesizer: Send + Sync {
    /// # Errors
    /// Returns [`SynthesisError`] if the synthesizer could not play the text.
    fn speak(&self, text: &str) -> Result<(), SynthesisError>;
}

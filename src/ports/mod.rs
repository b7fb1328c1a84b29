//! Ports layer: Trait definitions for external collaborators.
//!
//! Following Hexagonal Architecture, these traits separate the checkup
//! workflow from the classifier implementation and the speech backends.

mod classifier;
mod speech;

pub use classifier::{ClassifierError, Model, Trainer};
pub use speech::{SpeechError, SpeechRecognizer, SpeechSynthesizer, SynthesisError};

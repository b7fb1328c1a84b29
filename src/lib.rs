//! # Diacheck
//!
//! Terminal diabetes checkup: eight health measurements in, a predicted
//! outcome, a health tip (shown and spoken) and the model's holdout accuracy out.
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Health records, dataset and split, advice, voice commands
//! - `ports`: Classifier and speech traits
//! - `adapters`: CSV loader, random forest, external speech programs, log sanitizer
//! - `application`: Checkup workflow and session state
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use domain::{HealthRecord, Label, Report};

/// Result type for Diacheck operations
pub type Result<T> = std::result::Result<T, DiacheckError>;

/// Main error type for Diacheck
#[derive(Debug, thiserror::Error)]
pub enum DiacheckError {
    #[error("Invalid health data: {0}")]
    Validation(#[from] domain::ValidationError),

    #[error("Dataset unavailable: {0}")]
    DataUnavailable(#[from] domain::DatasetError),

    #[error("Classifier failed: {0}")]
    Classifier(#[from] ports::ClassifierError),

    #[error("{0}")]
    Speech(#[from] ports::SpeechError),

    #[error("{0}")]
    NoPriorPrediction(#[from] domain::NoPriorPrediction),

    #[error("Session lock poisoned")]
    LockPoisoned,
}

impl DiacheckError {
    /// Recoverable conditions shown as warnings rather than errors.
    #[must_use]
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::Speech(_) | Self::NoPriorPrediction(_))
    }
}

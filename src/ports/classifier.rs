//! Classifier port: Trait for fitting and applying a binary classifier.
//!
//! The checkup workflow only depends on fit / predict / score, so any
//! binary classifier can stand behind these traits.

use crate::domain::{FeatureVector, Label, Sample};

/// Errors that can occur while fitting a classifier.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassifierError {
    #[error("cannot fit a classifier on an empty training set")]
    EmptyTrainingSet,

    #[error("invalid classifier parameter: {0}")]
    InvalidParameter(String),
}

/// A fitted classifier.
pub trait Model: Send + Sync {
    /// Predict the label of one row.
    fn predict(&self, features: &FeatureVector) -> Label;

    /// Percentage of `test` rows whose predicted label matches the stored one.
    ///
    /// Returns 0.0 for an empty slice.
    fn score(&self, test: &[Sample]) -> f64 {
        if test.is_empty() {
            return 0.0;
        }
        let correct = test
            .iter()
            .filter(|sample| self.predict(&sample.features) == sample.label)
            .count();
        correct as f64 / test.len() as f64 * 100.0
    }
}

/// Builds a fresh [`Model`] from training rows.
pub trait Trainer: Send + Sync {
    type Model: Model;

    /// Fit a new model.
    ///
    /// # Errors
    /// Returns [`ClassifierError::EmptyTrainingSet`] if `train` is empty.
    fn fit(&self, train: &[Sample]) -> Result<Self::Model, ClassifierError>;

    /// Stable description of the hyperparameters, part of the model cache key.
    fn parameters(&self) -> String;
}

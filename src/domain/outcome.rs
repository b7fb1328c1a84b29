//! Prediction results.

use super::advice::{advise, Advice};

/// Binary diabetes outcome, matching the dataset's `Outcome` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    /// Outcome 0
    Healthy,
    /// Outcome 1
    NotHealthy,
}

impl Label {
    #[must_use]
    pub fn from_outcome(outcome: u8) -> Option<Self> {
        match outcome {
            0 => Some(Self::Healthy),
            1 => Some(Self::NotHealthy),
            _ => None,
        }
    }

    #[must_use]
    pub fn outcome(self) -> u8 {
        match self {
            Self::Healthy => 0,
            Self::NotHealthy => 1,
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Healthy => write!(f, "HEALTHY"),
            Self::NotHealthy => write!(f, "NOT HEALTHY"),
        }
    }
}

/// Output of one run of the checkup workflow.
#[derive(Debug, Clone)]
pub struct Prediction {
    pub label: Label,

    /// Holdout accuracy in percent (0.0 to 100.0)
    pub accuracy: f64,

    /// Rows the classifier was fitted on
    pub train_size: usize,

    /// Rows the accuracy was measured on
    pub test_size: usize,

    /// When the workflow finished
    pub checked_at: chrono::DateTime<chrono::Utc>,
}

impl Prediction {
    #[must_use]
    pub fn new(label: Label, accuracy: f64, train_size: usize, test_size: usize) -> Self {
        Self {
            label,
            accuracy: accuracy.clamp(0.0, 100.0),
            train_size,
            test_size,
            checked_at: chrono::Utc::now(),
        }
    }

    /// Accuracy sentence shown under "Model Accuracy".
    #[must_use]
    pub fn accuracy_message(&self) -> String {
        format!(
            "The model accuracy on the test data is {:.2}%.",
            self.accuracy
        )
    }

    /// Timestamp line shown under the outcome.
    #[must_use]
    pub fn checked_at_message(&self) -> String {
        format!("Checked at {}", self.checked_at.format("%Y-%m-%d %H:%M:%S UTC"))
    }
}

/// A prediction together with the advice derived from it.
#[derive(Debug, Clone)]
pub struct Report {
    pub prediction: Prediction,
    pub advice: Advice,
}

impl Report {
    #[must_use]
    pub fn new(prediction: Prediction) -> Self {
        Self {
            advice: advise(prediction.label),
            prediction,
        }
    }

    #[must_use]
    pub fn label(&self) -> Label {
        self.prediction.label
    }
}

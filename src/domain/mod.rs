//! Domain layer: Core checkup types and rules.
//!
//! Pure Rust types with no I/O. Input validation, the dataset split,
//! advice lookup and voice command interpretation all live here.

mod advice;
mod command;
mod dataset;
mod health;
mod outcome;

pub use advice::{advise, suggestion, Advice};
pub use command::{interpret, Action, Command, NoPriorPrediction, INVALID_COMMAND};
pub use dataset::{split, Dataset, DatasetError, Sample, Split, SplitConfig};
pub use health::{
    FeatureVector, FieldIssue, FieldSpec, HealthField, HealthInput, HealthRecord,
    ValidationError, FEATURE_COUNT, FIELD_SPECS,
};
pub use outcome::{Label, Prediction, Report};

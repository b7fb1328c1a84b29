//! Checkup service: Runs the prediction workflow.
//!
//! Each request goes split → fit → predict → score → advise. The model is
//! retrained on every request unless the cache is enabled, in which case a
//! fitted model is reused while the dataset fingerprint, split parameters and
//! classifier parameters stay the same.

use std::sync::Arc;
use std::time::Instant;

use crate::domain::{Dataset, HealthRecord, Prediction, Report, Split, SplitConfig};
use crate::ports::{Model, Trainer};
use crate::DiacheckError;

/// Workflow step, reported to progress observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Splitting,
    Training,
    Predicting,
    Scoring,
    Speaking,
}

impl Stage {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Splitting => "Splitting dataset",
            Self::Training => "Training classifier",
            Self::Predicting => "Predicting outcome",
            Self::Scoring => "Scoring on test data",
            Self::Speaking => "Speaking health tip",
        }
    }

    /// Completion fraction shown by the progress gauge once this stage starts.
    #[must_use]
    pub fn progress(self) -> f64 {
        match self {
            Self::Splitting => 0.1,
            Self::Training => 0.3,
            Self::Predicting => 0.7,
            Self::Scoring => 0.8,
            Self::Speaking => 0.9,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct CacheKey {
    fingerprint: String,
    test_ratio_bits: u64,
    seed: u64,
    parameters: String,
}

struct CachedModel<M> {
    key: CacheKey,
    split: Split,
    model: M,
}

/// Service for running checkups against one dataset.
pub struct CheckupService<T: Trainer> {
    dataset: Arc<Dataset>,
    fingerprint: String,
    split: SplitConfig,
    trainer: T,
    cache_enabled: bool,
    cache: Option<CachedModel<T::Model>>,
    trainings: usize,
}

impl<T: Trainer> CheckupService<T> {
    /// Create a service with the default 80/20 split, seed 0, no cache.
    pub fn new(dataset: Arc<Dataset>, trainer: T) -> Self {
        let fingerprint = dataset.fingerprint();
        Self {
            dataset,
            fingerprint,
            split: SplitConfig::default(),
            trainer,
            cache_enabled: false,
            cache: None,
            trainings: 0,
        }
    }

    #[must_use]
    pub fn with_split(mut self, split: SplitConfig) -> Self {
        self.split = split;
        self.cache = None;
        self
    }

    /// Reuse fitted models across requests.
    #[must_use]
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        if !enabled {
            self.cache = None;
        }
        self
    }

    #[must_use]
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Number of models fitted so far.
    #[must_use]
    pub fn trainings(&self) -> usize {
        self.trainings
    }

    /// Run the workflow for one record.
    ///
    /// # Errors
    /// Returns [`DiacheckError::DataUnavailable`] if the dataset cannot be
    /// split, or [`DiacheckError::Classifier`] if fitting fails.
    pub fn run(&mut self, record: &HealthRecord) -> Result<Report, DiacheckError> {
        self.run_with_progress(record, |_| {})
    }

    /// Like [`Self::run`], calling `progress` as each stage starts.
    ///
    /// # Errors
    /// See [`Self::run`].
    pub fn run_with_progress<F>(
        &mut self,
        record: &HealthRecord,
        mut progress: F,
    ) -> Result<Report, DiacheckError>
    where
        F: FnMut(Stage),
    {
        let start = Instant::now();
        let key = self.cache_key();

        let cached = match self.cache.take() {
            Some(entry) if self.cache_enabled && entry.key == key => {
                tracing::debug!("Reusing cached model");
                entry
            }
            _ => {
                progress(Stage::Splitting);
                let split = self.dataset.split(&self.split)?;

                progress(Stage::Training);
                let model = self.trainer.fit(&split.train)?;
                self.trainings += 1;
                tracing::debug!(
                    "Fitted {} on {} rows",
                    self.trainer.parameters(),
                    split.train.len()
                );

                CachedModel { key, split, model }
            }
        };

        progress(Stage::Predicting);
        let label = cached.model.predict(&record.features());

        progress(Stage::Scoring);
        let accuracy = cached.model.score(&cached.split.test);

        let prediction = Prediction::new(
            label,
            accuracy,
            cached.split.train.len(),
            cached.split.test.len(),
        );

        if self.cache_enabled {
            self.cache = Some(cached);
        }

        tracing::info!(
            "Checkup complete: {}, accuracy {:.2}% (train {}, test {}) in {:?}",
            prediction.label,
            prediction.accuracy,
            prediction.train_size,
            prediction.test_size,
            start.elapsed()
        );

        Ok(Report::new(prediction))
    }

    fn cache_key(&self) -> CacheKey {
        CacheKey {
            fingerprint: self.fingerprint.clone(),
            test_ratio_bits: self.split.test_ratio.to_bits(),
            seed: self.split.seed,
            parameters: self.trainer.parameters(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::csv_dataset::reference_dataset;
    use crate::adapters::forest::RandomForest;
    use crate::domain::{HealthInput, Label};

    fn service() -> CheckupService<RandomForest> {
        CheckupService::new(Arc::new(reference_dataset()), RandomForest::default())
    }

    fn default_record() -> HealthRecord {
        HealthInput::default().validate().expect("Defaults are valid")
    }

    #[test]
    fn test_default_input_end_to_end() {
        let record = default_record();

        let first = service().run(&record).expect("Checkup should succeed");
        let second = service().run(&record).expect("Checkup should succeed");

        assert_eq!(first.label(), second.label());
        assert!((first.prediction.accuracy - second.prediction.accuracy).abs() < f64::EPSILON);

        // 50 rows, 10 held out: accuracy moves in steps of 10%
        assert_eq!(first.prediction.train_size, 40);
        assert_eq!(first.prediction.test_size, 10);
        let acc = first.prediction.accuracy;
        assert!((0.0..=100.0).contains(&acc));
        assert!((acc / 10.0 - (acc / 10.0).round()).abs() < 1e-9);

        // Frozen reference table, seed 0, 100 trees
        assert_eq!(first.label(), Label::Healthy);
        assert!((acc - 60.0).abs() < 1e-9, "Unexpected accuracy {acc}");
        assert_eq!(first.advice, crate::domain::advise(Label::Healthy));
    }

    #[test]
    fn test_retrains_every_request_by_default() {
        let mut service = service();
        let record = default_record();
        let a = service.run(&record).expect("run");
        let b = service.run(&record).expect("run");
        assert_eq!(service.trainings(), 2);
        assert_eq!(a.label(), b.label());
    }

    #[test]
    fn test_cache_skips_training() {
        let mut service = service().with_cache(true);
        let record = default_record();
        let a = service.run(&record).expect("run");
        let b = service.run(&record).expect("run");
        assert_eq!(service.trainings(), 1);
        assert_eq!(a.label(), b.label());
        assert!((a.prediction.accuracy - b.prediction.accuracy).abs() < f64::EPSILON);
    }

    #[test]
    fn test_progress_stages_in_order() {
        let mut stages = Vec::new();
        service()
            .run_with_progress(&default_record(), |stage| stages.push(stage))
            .expect("run");
        assert_eq!(
            stages,
            vec![
                Stage::Splitting,
                Stage::Training,
                Stage::Predicting,
                Stage::Scoring
            ]
        );
    }

    #[test]
    fn test_invalid_split_is_data_unavailable() {
        let mut service = service().with_split(SplitConfig {
            test_ratio: 1.5,
            seed: 0,
        });
        let err = service.run(&default_record()).expect_err("Should fail");
        assert!(matches!(err, DiacheckError::DataUnavailable(_)));
        assert_eq!(service.trainings(), 0);
    }
}

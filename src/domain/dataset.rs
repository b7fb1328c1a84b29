//! Labeled training table and its deterministic train/test split.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

use super::health::FeatureVector;
use super::outcome::Label;

/// Errors raised while loading or partitioning a dataset.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed table: {0}")]
    Malformed(String),

    #[error("table has no rows")]
    Empty,

    #[error("invalid split: {0}")]
    InvalidSplit(String),
}

/// One labeled row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub features: FeatureVector,
    pub label: Label,
}

/// Immutable, ordered set of labeled rows.
#[derive(Debug, Clone)]
pub struct Dataset {
    samples: Vec<Sample>,
}

impl Dataset {
    /// # Errors
    /// Returns [`DatasetError::Empty`] for an empty table.
    pub fn new(samples: Vec<Sample>) -> Result<Self, DatasetError> {
        if samples.is_empty() {
            return Err(DatasetError::Empty);
        }
        Ok(Self { samples })
    }

    #[must_use]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    fn rows(&self, indices: &[usize]) -> Vec<Sample> {
        indices.iter().map(|&i| self.samples[i]).collect()
    }

    /// SHA-256 over every feature and label, in row order.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for sample in &self.samples {
            for value in sample.features.0 {
                hasher.update(value.to_le_bytes());
            }
            hasher.update([sample.label.outcome()]);
        }
        hasher
            .finalize()
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect()
    }

    /// Partition into train and test rows.
    ///
    /// # Errors
    /// Returns [`DatasetError::InvalidSplit`] if the ratio is outside (0, 1)
    /// or either partition would be empty.
    pub fn split(&self, config: &SplitConfig) -> Result<Split, DatasetError> {
        split(self, config)
    }
}

/// Split parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitConfig {
    /// Share of rows held out for scoring
    pub test_ratio: f64,
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_ratio: 0.2,
            seed: 0,
        }
    }
}

/// Disjoint train/test partitions, with their row indices in the source dataset.
#[derive(Debug, Clone)]
pub struct Split {
    pub train: Vec<Sample>,
    pub test: Vec<Sample>,
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
}

/// Shuffle row indices with a seeded ChaCha8 stream; the first
/// `ceil(n * test_ratio)` shuffled rows form the test partition.
///
/// # Errors
/// See [`Dataset::split`].
pub fn split(dataset: &Dataset, config: &SplitConfig) -> Result<Split, DatasetError> {
    if !(config.test_ratio > 0.0 && config.test_ratio < 1.0) {
        return Err(DatasetError::InvalidSplit(format!(
            "test ratio {} must be strictly between 0 and 1",
            config.test_ratio
        )));
    }

    let n = dataset.len();
    let n_test = (n as f64 * config.test_ratio).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(DatasetError::InvalidSplit(format!(
            "{n} rows cannot be split with test ratio {}",
            config.test_ratio
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    indices.shuffle(&mut rng);

    let train_indices = indices.split_off(n_test);
    let test_indices = indices;

    Ok(Split {
        train: dataset.rows(&train_indices),
        test: dataset.rows(&test_indices),
        train_indices,
        test_indices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn toy_dataset(n: usize) -> Dataset {
        let samples = (0..n)
            .map(|i| Sample {
                features: FeatureVector([i as f64, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 21.0]),
                label: if i % 3 == 0 { Label::NotHealthy } else { Label::Healthy },
            })
            .collect();
        Dataset::new(samples).expect("non-empty")
    }

    #[test]
    fn test_empty_dataset_rejected() {
        assert!(matches!(Dataset::new(Vec::new()), Err(DatasetError::Empty)));
    }

    #[test]
    fn test_split_sizes() {
        let dataset = toy_dataset(50);
        let split = dataset.split(&SplitConfig::default()).expect("Should split");
        assert_eq!(split.test.len(), 10);
        assert_eq!(split.train.len(), 40);

        // ceil: 11 rows at 20% hold out 3
        let split = toy_dataset(11).split(&SplitConfig::default()).expect("Should split");
        assert_eq!(split.test.len(), 3);
        assert_eq!(split.train.len(), 8);
    }

    #[test]
    fn test_split_is_deterministic() {
        let dataset = toy_dataset(50);
        let a = dataset.split(&SplitConfig::default()).expect("split");
        let b = dataset.split(&SplitConfig::default()).expect("split");
        assert_eq!(a.train_indices, b.train_indices);
        assert_eq!(a.test_indices, b.test_indices);
        assert_eq!(a.test, b.test);
    }

    #[test]
    fn test_split_disjoint_and_exhaustive() {
        let dataset = toy_dataset(37);
        let split = dataset.split(&SplitConfig::default()).expect("split");

        let train: HashSet<usize> = split.train_indices.iter().copied().collect();
        let test: HashSet<usize> = split.test_indices.iter().copied().collect();
        assert!(train.is_disjoint(&test));

        let all: HashSet<usize> = train.union(&test).copied().collect();
        assert_eq!(all, (0..37).collect::<HashSet<_>>());
        assert_eq!(split.train.len() + split.test.len(), 37);
    }

    #[test]
    fn test_split_rows_match_indices() {
        let dataset = toy_dataset(20);
        let split = dataset.split(&SplitConfig::default()).expect("split");
        for (row, &idx) in split.test.iter().zip(&split.test_indices) {
            assert_eq!(*row, dataset.samples()[idx]);
        }
    }

    #[test]
    fn test_different_seed_changes_partition() {
        let dataset = toy_dataset(50);
        let a = dataset.split(&SplitConfig::default()).expect("split");
        let b = dataset
            .split(&SplitConfig { seed: 42, ..Default::default() })
            .expect("split");
        assert_ne!(a.test_indices, b.test_indices);
    }

    #[test]
    fn test_invalid_split_rejected() {
        let dataset = toy_dataset(10);
        for ratio in [0.0, 1.0, -0.5, f64::NAN] {
            let result = dataset.split(&SplitConfig { test_ratio: ratio, seed: 0 });
            assert!(matches!(result, Err(DatasetError::InvalidSplit(_))));
        }

        // A single row cannot fill both partitions
        let single = toy_dataset(1);
        assert!(single.split(&SplitConfig::default()).is_err());
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let a = toy_dataset(10);
        let b = toy_dataset(10);
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);

        let mut samples = a.samples().to_vec();
        samples[4].label = Label::NotHealthy;
        let flipped = Dataset::new(samples).expect("non-empty");
        assert_ne!(a.fingerprint(), flipped.fingerprint());
    }
}

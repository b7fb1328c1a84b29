//! Random forest adapter: Implementation of Trainer.
//!
//! Bagged CART trees grown on Gini impurity:
//! - each tree sees a bootstrap sample of the training rows
//! - each split considers `sqrt(features)` randomly chosen features, and keeps
//!   drawing further features until one of them can split the node
//! - thresholds sit midway between consecutive distinct values
//! - the forest averages the leaf class probabilities of its trees
//!
//! All randomness comes from a `ChaCha8Rng` seeded at construction, so the
//! same seed and training rows always produce the same forest.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::domain::{FeatureVector, Label, Sample, FEATURE_COUNT};
use crate::ports::{ClassifierError, Model, Trainer};

/// Default number of trees.
pub const DEFAULT_TREES: usize = 100;

/// Hard cap on tree depth.
const MAX_DEPTH: usize = 64;

/// Random forest hyperparameters.
#[derive(Debug, Clone)]
pub struct RandomForest {
    n_trees: usize,
    max_features: usize,
    min_samples_split: usize,
    max_depth: usize,
    seed: u64,
}

impl Default for RandomForest {
    fn default() -> Self {
        Self {
            n_trees: DEFAULT_TREES,
            max_features: (FEATURE_COUNT as f64).sqrt() as usize,
            min_samples_split: 2,
            max_depth: MAX_DEPTH,
            seed: 0,
        }
    }
}

impl RandomForest {
    /// Create a forest with `n_trees` trees.
    ///
    /// # Errors
    /// Returns [`ClassifierError::InvalidParameter`] if `n_trees` is zero.
    pub fn new(n_trees: usize) -> Result<Self, ClassifierError> {
        if n_trees == 0 {
            return Err(ClassifierError::InvalidParameter(
                "forest needs at least one tree".to_string(),
            ));
        }
        Ok(Self {
            n_trees,
            ..Self::default()
        })
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.n_trees
    }
}

impl Trainer for RandomForest {
    type Model = ForestModel;

    fn fit(&self, train: &[Sample]) -> Result<ForestModel, ClassifierError> {
        if train.is_empty() {
            return Err(ClassifierError::EmptyTrainingSet);
        }

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let n = train.len();

        let trees = (0..self.n_trees)
            .map(|_| {
                let mut tree_rng = ChaCha8Rng::seed_from_u64(rng.gen());
                let rows: Vec<usize> = (0..n).map(|_| tree_rng.gen_range(0..n)).collect();
                TreeBuilder {
                    samples: train,
                    max_features: self.max_features.max(1),
                    min_samples_split: self.min_samples_split,
                    max_depth: self.max_depth,
                    nodes: Vec::new(),
                }
                .build(rows, &mut tree_rng)
            })
            .collect();

        Ok(ForestModel { trees })
    }

    fn parameters(&self) -> String {
        format!(
            "random_forest(trees={}, max_features={}, min_samples_split={}, max_depth={}, seed={})",
            self.n_trees, self.max_features, self.min_samples_split, self.max_depth, self.seed
        )
    }
}

/// A fitted forest.
#[derive(Debug, Clone)]
pub struct ForestModel {
    trees: Vec<Tree>,
}

impl ForestModel {
    /// Mean probability of [`Label::NotHealthy`] across trees.
    #[must_use]
    pub fn probability(&self, features: &FeatureVector) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }
        let total: f64 = self.trees.iter().map(|t| t.probability(features)).sum();
        total / self.trees.len() as f64
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.trees.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }
}

impl Model for ForestModel {
    fn predict(&self, features: &FeatureVector) -> Label {
        // Ties go to the first class.
        if self.probability(features) > 0.5 {
            Label::NotHealthy
        } else {
            Label::Healthy
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Node {
    Leaf {
        p_positive: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// Arena-allocated decision tree; node 0 is the root.
#[derive(Debug, Clone)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn probability(&self, features: &FeatureVector) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                Node::Leaf { p_positive } => return p_positive,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if features.0[feature] <= threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    feature: usize,
    threshold: f64,
    /// Size-weighted Gini impurity of the two children
    impurity: f64,
}

struct TreeBuilder<'a> {
    samples: &'a [Sample],
    max_features: usize,
    min_samples_split: usize,
    max_depth: usize,
    nodes: Vec<Node>,
}

impl TreeBuilder<'_> {
    fn build(mut self, rows: Vec<usize>, rng: &mut ChaCha8Rng) -> Tree {
        self.grow(rows, 0, rng);
        Tree { nodes: self.nodes }
    }

    fn is_positive(&self, row: usize) -> bool {
        self.samples[row].label == Label::NotHealthy
    }

    fn grow(&mut self, rows: Vec<usize>, depth: usize, rng: &mut ChaCha8Rng) -> usize {
        let positives = rows.iter().filter(|&&r| self.is_positive(r)).count();
        let p_positive = positives as f64 / rows.len() as f64;
        let idx = self.nodes.len();
        self.nodes.push(Node::Leaf { p_positive });

        let pure = positives == 0 || positives == rows.len();
        if pure || depth >= self.max_depth || rows.len() < self.min_samples_split {
            return idx;
        }

        let Some(best) = self.best_split(&rows, rng) else {
            return idx;
        };

        let samples = self.samples;
        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
            .into_iter()
            .partition(|&r| samples[r].features.0[best.feature] <= best.threshold);

        let left = self.grow(left_rows, depth + 1, rng);
        let right = self.grow(right_rows, depth + 1, rng);
        self.nodes[idx] = Node::Split {
            feature: best.feature,
            threshold: best.threshold,
            left,
            right,
        };
        idx
    }

    fn best_split(&self, rows: &[usize], rng: &mut ChaCha8Rng) -> Option<Candidate> {
        let mut features: Vec<usize> = (0..FEATURE_COUNT).collect();
        features.shuffle(rng);

        let mut best: Option<Candidate> = None;
        for (visited, &feature) in features.iter().enumerate() {
            if visited >= self.max_features && best.is_some() {
                break;
            }
            if let Some(candidate) = self.best_threshold(rows, feature) {
                if best.map_or(true, |b| candidate.impurity < b.impurity) {
                    best = Some(candidate);
                }
            }
        }
        best
    }

    fn best_threshold(&self, rows: &[usize], feature: usize) -> Option<Candidate> {
        let mut values: Vec<(f64, bool)> = rows
            .iter()
            .map(|&r| (self.samples[r].features.0[feature], self.is_positive(r)))
            .collect();
        values.sort_by(|a, b| a.0.total_cmp(&b.0));

        let total = values.len();
        let total_positive = values.iter().filter(|v| v.1).count();

        let mut best: Option<Candidate> = None;
        let mut left_positive = 0;
        for i in 1..total {
            if values[i - 1].1 {
                left_positive += 1;
            }
            let (prev, next) = (values[i - 1].0, values[i].0);
            if prev >= next {
                continue;
            }

            let impurity = i as f64 * gini(left_positive, i)
                + (total - i) as f64 * gini(total_positive - left_positive, total - i);

            if best.map_or(true, |b| impurity < b.impurity) {
                let mid = prev + (next - prev) / 2.0;
                best = Some(Candidate {
                    feature,
                    threshold: if mid < next { mid } else { prev },
                    impurity,
                });
            }
        }
        best
    }
}

fn gini(positive: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let p = positive as f64 / total as f64;
    1.0 - p * p - (1.0 - p) * (1.0 - p)
}

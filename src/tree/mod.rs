//! Tree-based regression models.
//!
//! Includes a greedy CART-style decision tree regressor and a bagged
//! random forest with per-tree feature subsampling and out-of-bag scoring.

use crate::error::{PredecirError, Result};
use crate::metrics::r_squared;
use crate::primitives::{Matrix, Vector};
use crate::traits::Estimator;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// A node in a regression tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
enum RegressionNode {
    /// Terminal node holding the mean target of its training rows.
    Leaf { value: f32 },
    /// Internal split: rows with `feature <= threshold` go left.
    Internal {
        feature_idx: usize,
        threshold: f32,
        left: Box<RegressionNode>,
        right: Box<RegressionNode>,
    },
}

impl RegressionNode {
    fn predict_one(&self, sample: &[f32]) -> f32 {
        let mut node = self;
        loop {
            match node {
                RegressionNode::Leaf { value } => return *value,
                RegressionNode::Internal {
                    feature_idx,
                    threshold,
                    left,
                    right,
                } => {
                    node = if sample[*feature_idx] <= *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }

    /// Accumulates split counts per feature index.
    fn count_splits(&self, counts: &mut [f32]) {
        if let RegressionNode::Internal {
            feature_idx,
            left,
            right,
            ..
        } = self
        {
            counts[*feature_idx] += 1.0;
            left.count_splits(counts);
            right.count_splits(counts);
        }
    }
}

/// Sum of squared errors around the mean of `values`.
fn sse(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().sum::<f32>() / values.len() as f32;
    values.iter().map(|v| (v - mean).powi(2)).sum()
}

struct BestSplit {
    feature_idx: usize,
    threshold: f32,
    cost: f32,
}

/// Finds the split minimizing summed within-child SSE, trying midpoints
/// between adjacent distinct sorted values of each feature.
fn find_best_split(x: &Matrix<f32>, y: &[f32]) -> Option<BestSplit> {
    let (n_samples, n_features) = x.shape();
    let mut best: Option<BestSplit> = None;

    for feature_idx in 0..n_features {
        let mut values: Vec<f32> = (0..n_samples).map(|i| x.get(i, feature_idx)).collect();
        values.sort_by(|a, b| a.total_cmp(b));
        values.dedup();

        for pair in values.windows(2) {
            let threshold = (pair[0] + pair[1]) / 2.0;

            let mut left = Vec::new();
            let mut right = Vec::new();
            for i in 0..n_samples {
                if x.get(i, feature_idx) <= threshold {
                    left.push(y[i]);
                } else {
                    right.push(y[i]);
                }
            }
            if left.is_empty() || right.is_empty() {
                continue;
            }

            let cost = sse(&left) + sse(&right);
            if best.as_ref().map_or(true, |b| cost < b.cost) {
                best = Some(BestSplit {
                    feature_idx,
                    threshold,
                    cost,
                });
            }
        }
    }

    best
}

fn build_tree(
    x: &Matrix<f32>,
    y: &[f32],
    depth: usize,
    max_depth: Option<usize>,
    min_samples_split: usize,
) -> RegressionNode {
    let n_samples = y.len();
    let mean = if n_samples == 0 {
        0.0
    } else {
        y.iter().sum::<f32>() / n_samples as f32
    };

    let depth_reached = max_depth.is_some_and(|d| depth >= d);
    if depth_reached || n_samples < min_samples_split || sse(y) == 0.0 {
        return RegressionNode::Leaf { value: mean };
    }

    let Some(split) = find_best_split(x, y) else {
        return RegressionNode::Leaf { value: mean };
    };

    let mut left_idx = Vec::new();
    let mut right_idx = Vec::new();
    for i in 0..n_samples {
        if x.get(i, split.feature_idx) <= split.threshold {
            left_idx.push(i);
        } else {
            right_idx.push(i);
        }
    }

    let left_y: Vec<f32> = left_idx.iter().map(|&i| y[i]).collect();
    let right_y: Vec<f32> = right_idx.iter().map(|&i| y[i]).collect();

    RegressionNode::Internal {
        feature_idx: split.feature_idx,
        threshold: split.threshold,
        left: Box::new(build_tree(
            &x.select_rows(&left_idx),
            &left_y,
            depth + 1,
            max_depth,
            min_samples_split,
        )),
        right: Box::new(build_tree(
            &x.select_rows(&right_idx),
            &right_y,
            depth + 1,
            max_depth,
            min_samples_split,
        )),
    }
}

/// CART-style decision tree regressor.
///
/// Splits greedily on the (feature, threshold) pair that minimizes the
/// summed within-child SSE. Recursion stops when `max_depth` is reached,
/// a node has fewer than `min_samples_split` rows, or its targets are
/// constant; leaves predict the mean target of their rows.
///
/// # Examples
///
/// ```
/// use predecir::prelude::*;
///
/// let x = Matrix::from_vec(4, 1, vec![1.0, 2.0, 10.0, 11.0]).unwrap();
/// let y = Vector::from_slice(&[5.0, 5.0, 20.0, 20.0]);
///
/// let mut tree = DecisionTreeRegressor::new().with_max_depth(3);
/// tree.fit(&x, &y).unwrap();
/// assert!(tree.score(&x, &y).unwrap() > 0.99);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTreeRegressor {
    tree: Option<RegressionNode>,
    n_features: usize,
    max_depth: Option<usize>,
    min_samples_split: usize,
}

impl Default for DecisionTreeRegressor {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionTreeRegressor {
    /// Creates an unbounded-depth tree requiring 2 samples to split.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: None,
            n_features: 0,
            max_depth: None,
            min_samples_split: 2,
        }
    }

    /// Sets the maximum depth (root is depth 0).
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Sets the minimum node size eligible for splitting (at least 2).
    #[must_use]
    pub fn with_min_samples_split(mut self, min_samples: usize) -> Self {
        self.min_samples_split = min_samples.max(2);
        self
    }

    /// Returns true if the model has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.tree.is_some()
    }

    /// Serializes the fitted model to a JSON string.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if encoding fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(Into::into)
    }

    /// Restores a model from its JSON representation.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(Into::into)
    }

    /// Split counts per feature, unnormalized.
    fn split_counts(&self) -> Option<Vec<f32>> {
        let tree = self.tree.as_ref()?;
        let mut counts = vec![0.0; self.n_features];
        tree.count_splits(&mut counts);
        Some(counts)
    }
}

impl Estimator for DecisionTreeRegressor {
    fn fit(&mut self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<()> {
        let (n_samples, n_features) = x.shape();
        if n_samples == 0 {
            return Err(PredecirError::empty_input("DecisionTreeRegressor::fit"));
        }
        if y.len() != n_samples {
            return Err(PredecirError::dimension_mismatch(
                "labels",
                n_samples,
                y.len(),
            ));
        }

        self.n_features = n_features;
        self.tree = Some(build_tree(
            x,
            y.as_slice(),
            0,
            self.max_depth,
            self.min_samples_split,
        ));
        Ok(())
    }

    fn predict(&self, x: &Matrix<f32>) -> Result<Vector<f32>> {
        let tree = self
            .tree
            .as_ref()
            .ok_or_else(|| PredecirError::not_trained("DecisionTreeRegressor"))?;
        if x.n_cols() != self.n_features {
            return Err(PredecirError::dimension_mismatch(
                "features",
                self.n_features,
                x.n_cols(),
            ));
        }

        let predictions: Vec<f32> = (0..x.n_rows())
            .map(|i| tree.predict_one(x.row(i).as_slice()))
            .collect();
        Ok(Vector::from_vec(predictions))
    }

    fn score(&self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<f32> {
        let predictions = self.predict(x)?;
        Ok(r_squared(&predictions, y))
    }
}

/// Number of features each tree in a forest may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaxFeatures {
    /// `floor(sqrt(n_features))`, at least 1.
    Sqrt,
    /// `floor(log2(n_features))`, at least 1.
    Log2,
    /// A fixed count, clamped to `n_features`.
    Count(usize),
}

impl MaxFeatures {
    fn resolve(self, n_features: usize) -> usize {
        let k = match self {
            MaxFeatures::Sqrt => (n_features as f32).sqrt().floor() as usize,
            MaxFeatures::Log2 => (n_features as f32).log2().floor() as usize,
            MaxFeatures::Count(k) => k,
        };
        k.clamp(1, n_features)
    }
}

/// Random forest regressor: bagged decision trees.
///
/// Each tree trains on a bootstrap resample (with replacement, size n)
/// over a random feature subset; the forest predicts the mean of the tree
/// predictions. Bootstrap index sets are recorded per tree so an
/// out-of-bag R² can be computed during fit without a holdout set.
///
/// # Examples
///
/// ```
/// use predecir::prelude::*;
///
/// let x = Matrix::from_vec(6, 1, vec![1.0, 2.0, 3.0, 10.0, 11.0, 12.0]).unwrap();
/// let y = Vector::from_slice(&[5.0, 5.0, 5.0, 20.0, 20.0, 20.0]);
///
/// let mut forest = RandomForestRegressor::new(20).with_random_state(42);
/// forest.fit(&x, &y).unwrap();
/// assert!(forest.score(&x, &y).unwrap() > 0.9);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForestRegressor {
    trees: Vec<DecisionTreeRegressor>,
    /// Feature indices each tree was trained on.
    tree_features: Vec<Vec<usize>>,
    /// Bootstrap row indices each tree was trained on.
    bootstrap_indices: Vec<Vec<usize>>,
    n_estimators: usize,
    max_depth: Option<usize>,
    min_samples_split: usize,
    max_features: MaxFeatures,
    random_state: Option<u64>,
    n_features: usize,
    oob_score: Option<f32>,
}

impl RandomForestRegressor {
    /// Creates a forest of `n_estimators` trees with sqrt feature
    /// subsampling and unbounded depth.
    #[must_use]
    pub fn new(n_estimators: usize) -> Self {
        Self {
            trees: Vec::new(),
            tree_features: Vec::new(),
            bootstrap_indices: Vec::new(),
            n_estimators,
            max_depth: None,
            min_samples_split: 2,
            max_features: MaxFeatures::Sqrt,
            random_state: None,
            n_features: 0,
            oob_score: None,
        }
    }

    /// Sets the maximum depth for every tree.
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Sets the minimum node size eligible for splitting.
    #[must_use]
    pub fn with_min_samples_split(mut self, min_samples: usize) -> Self {
        self.min_samples_split = min_samples.max(2);
        self
    }

    /// Sets the per-tree feature budget.
    #[must_use]
    pub fn with_max_features(mut self, max_features: MaxFeatures) -> Self {
        self.max_features = max_features;
        self
    }

    /// Sets the random seed for reproducible bagging.
    #[must_use]
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    /// Returns true if the model has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        !self.trees.is_empty()
    }

    /// Out-of-bag R² from the last fit.
    ///
    /// Each row is scored by the trees whose bootstrap sample excluded it.
    ///
    /// # Errors
    ///
    /// Returns `NotTrained` if the model has not been fitted.
    pub fn oob_score(&self) -> Result<f32> {
        self.oob_score
            .ok_or_else(|| PredecirError::not_trained("RandomForestRegressor"))
    }

    /// Feature importances as normalized split counts across all trees.
    ///
    /// Sums to 1.0 when any split exists; all zeros for a forest of stumps.
    ///
    /// # Errors
    ///
    /// Returns `NotTrained` if the model has not been fitted.
    pub fn feature_importances(&self) -> Result<Vec<f32>> {
        if self.trees.is_empty() {
            return Err(PredecirError::not_trained("RandomForestRegressor"));
        }

        let mut importances = vec![0.0; self.n_features];
        for (tree, features) in self.trees.iter().zip(self.tree_features.iter()) {
            if let Some(counts) = tree.split_counts() {
                // Map subset-local feature indices back to original columns.
                for (local, &count) in counts.iter().enumerate() {
                    importances[features[local]] += count;
                }
            }
        }

        let total: f32 = importances.iter().sum();
        if total > 0.0 {
            for importance in &mut importances {
                *importance /= total;
            }
        }
        Ok(importances)
    }

    /// Serializes the fitted model to a JSON string.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if encoding fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(Into::into)
    }

    /// Restores a model from its JSON representation.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(Into::into)
    }

    fn rng(&self) -> StdRng {
        match self.random_state {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Draws `k` distinct feature indices, sorted.
    fn sample_features(rng: &mut StdRng, n_features: usize, k: usize) -> Vec<usize> {
        let mut chosen: Vec<usize> = Vec::with_capacity(k);
        while chosen.len() < k {
            let idx = rng.gen_range(0..n_features);
            if !chosen.contains(&idx) {
                chosen.push(idx);
            }
        }
        chosen.sort_unstable();
        chosen
    }

    fn compute_oob_score(&self, x: &Matrix<f32>, y: &Vector<f32>) -> Option<f32> {
        let n_samples = x.n_rows();
        let mut in_bag: Vec<Vec<bool>> = Vec::with_capacity(self.trees.len());
        for indices in &self.bootstrap_indices {
            let mut mask = vec![false; n_samples];
            for &i in indices {
                mask[i] = true;
            }
            in_bag.push(mask);
        }

        let mut oob_pred = Vec::new();
        let mut oob_true = Vec::new();
        for i in 0..n_samples {
            let mut sum = 0.0;
            let mut count = 0;
            for (t, tree) in self.trees.iter().enumerate() {
                if in_bag[t][i] {
                    continue;
                }
                let sample = x.select_rows(&[i]).select_columns(&self.tree_features[t]);
                if let Ok(pred) = tree.predict(&sample) {
                    sum += pred[0];
                    count += 1;
                }
            }
            if count > 0 {
                oob_pred.push(sum / count as f32);
                oob_true.push(y[i]);
            }
        }

        if oob_pred.is_empty() {
            return None;
        }
        Some(r_squared(
            &Vector::from_vec(oob_pred),
            &Vector::from_vec(oob_true),
        ))
    }
}

impl Estimator for RandomForestRegressor {
    fn fit(&mut self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<()> {
        let (n_samples, n_features) = x.shape();
        if n_samples == 0 {
            return Err(PredecirError::empty_input("RandomForestRegressor::fit"));
        }
        if y.len() != n_samples {
            return Err(PredecirError::dimension_mismatch(
                "labels",
                n_samples,
                y.len(),
            ));
        }
        if self.n_estimators == 0 {
            return Err(PredecirError::InvalidHyperparameter {
                param: "n_estimators".to_string(),
                value: "0".to_string(),
                constraint: ">= 1".to_string(),
            });
        }

        let mut rng = self.rng();
        let k = self.max_features.resolve(n_features);

        self.trees = Vec::with_capacity(self.n_estimators);
        self.tree_features = Vec::with_capacity(self.n_estimators);
        self.bootstrap_indices = Vec::with_capacity(self.n_estimators);
        self.n_features = n_features;

        for _ in 0..self.n_estimators {
            let indices: Vec<usize> = (0..n_samples)
                .map(|_| rng.gen_range(0..n_samples))
                .collect();
            let features = Self::sample_features(&mut rng, n_features, k);

            let x_boot = x.select_rows(&indices).select_columns(&features);
            let y_boot = Vector::from_vec(indices.iter().map(|&i| y[i]).collect());

            let mut tree = DecisionTreeRegressor::new()
                .with_min_samples_split(self.min_samples_split);
            if let Some(depth) = self.max_depth {
                tree = tree.with_max_depth(depth);
            }
            tree.fit(&x_boot, &y_boot)?;

            self.trees.push(tree);
            self.tree_features.push(features);
            self.bootstrap_indices.push(indices);
        }

        self.oob_score = self.compute_oob_score(x, y);
        Ok(())
    }

    fn predict(&self, x: &Matrix<f32>) -> Result<Vector<f32>> {
        if self.trees.is_empty() {
            return Err(PredecirError::not_trained("RandomForestRegressor"));
        }
        if x.n_cols() != self.n_features {
            return Err(PredecirError::dimension_mismatch(
                "features",
                self.n_features,
                x.n_cols(),
            ));
        }

        let n_samples = x.n_rows();
        let mut sums = vec![0.0_f32; n_samples];
        for (tree, features) in self.trees.iter().zip(self.tree_features.iter()) {
            let subset = x.select_columns(features);
            let predictions = tree.predict(&subset)?;
            for (sum, &p) in sums.iter_mut().zip(predictions.as_slice()) {
                *sum += p;
            }
        }

        let n_trees = self.trees.len() as f32;
        Ok(Vector::from_vec(
            sums.into_iter().map(|s| s / n_trees).collect(),
        ))
    }

    fn score(&self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<f32> {
        let predictions = self.predict(x)?;
        Ok(r_squared(&predictions, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_data() -> (Matrix<f32>, Vector<f32>) {
        let x = Matrix::from_vec(6, 1, vec![1.0, 2.0, 3.0, 10.0, 11.0, 12.0]).expect("matrix");
        let y = Vector::from_slice(&[5.0, 5.0, 5.0, 20.0, 20.0, 20.0]);
        (x, y)
    }

    #[test]
    fn test_tree_fits_step_function_exactly() {
        let (x, y) = step_data();
        let mut tree = DecisionTreeRegressor::new();
        tree.fit(&x, &y).expect("fit succeeds");

        let predictions = tree.predict(&x).expect("fitted");
        for (p, t) in predictions.as_slice().iter().zip(y.as_slice()) {
            assert!((p - t).abs() < 1e-6);
        }
    }

    #[test]
    fn test_tree_midpoint_threshold() {
        // One split possible: between 1.0 and 3.0 -> threshold 2.0.
        let x = Matrix::from_vec(2, 1, vec![1.0, 3.0]).expect("matrix");
        let y = Vector::from_slice(&[0.0, 10.0]);
        let mut tree = DecisionTreeRegressor::new();
        tree.fit(&x, &y).expect("fit succeeds");

        let probe = Matrix::from_vec(2, 1, vec![1.9, 2.1]).expect("matrix");
        let predictions = tree.predict(&probe).expect("fitted");
        assert_eq!(predictions.as_slice(), &[0.0, 10.0]);
    }

    #[test]
    fn test_tree_depth_zero_predicts_mean() {
        let (x, y) = step_data();
        let mut stump = DecisionTreeRegressor::new().with_max_depth(0);
        stump.fit(&x, &y).expect("fit succeeds");
        let predictions = stump.predict(&x).expect("fitted");
        for &p in predictions.as_slice() {
            assert!((p - 12.5).abs() < 1e-4);
        }
    }

    #[test]
    fn test_tree_min_samples_split_stops_growth() {
        let (x, y) = step_data();
        let mut tree = DecisionTreeRegressor::new().with_min_samples_split(100);
        tree.fit(&x, &y).expect("fit succeeds");
        // Never split, so every prediction is the global mean.
        let predictions = tree.predict(&x).expect("fitted");
        assert!((predictions[0] - predictions[5]).abs() < 1e-6);
    }

    #[test]
    fn test_tree_predict_before_fit_errors() {
        let tree = DecisionTreeRegressor::new();
        let x = Matrix::from_vec(1, 1, vec![1.0]).expect("matrix");
        assert!(matches!(
            tree.predict(&x).unwrap_err(),
            PredecirError::NotTrained { .. }
        ));
    }

    #[test]
    fn test_forest_fits_step_function() {
        let (x, y) = step_data();
        let mut forest = RandomForestRegressor::new(20).with_random_state(42);
        forest.fit(&x, &y).expect("fit succeeds");
        assert!(forest.score(&x, &y).expect("fitted") > 0.9);
    }

    #[test]
    fn test_forest_same_seed_same_predictions() {
        let (x, y) = step_data();
        let mut a = RandomForestRegressor::new(10).with_random_state(7);
        let mut b = RandomForestRegressor::new(10).with_random_state(7);
        a.fit(&x, &y).expect("fit");
        b.fit(&x, &y).expect("fit");
        assert_eq!(
            a.predict(&x).expect("fitted"),
            b.predict(&x).expect("fitted")
        );
    }

    #[test]
    fn test_forest_importances_normalized() {
        let (x, y) = step_data();
        let mut forest = RandomForestRegressor::new(15).with_random_state(3);
        forest.fit(&x, &y).expect("fit succeeds");
        let importances = forest.feature_importances().expect("fitted");
        assert_eq!(importances.len(), 1);
        let total: f32 = importances.iter().sum();
        assert!((total - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_forest_importances_favor_informative_feature() {
        // Column 0 carries the signal, column 1 is constant noise.
        let x = Matrix::from_vec(
            6,
            2,
            vec![
                1.0, 0.5, 2.0, 0.5, 3.0, 0.5, 10.0, 0.5, 11.0, 0.5, 12.0, 0.5,
            ],
        )
        .expect("matrix");
        let y = Vector::from_slice(&[5.0, 5.0, 5.0, 20.0, 20.0, 20.0]);

        let mut forest = RandomForestRegressor::new(25)
            .with_max_features(MaxFeatures::Count(2))
            .with_random_state(11);
        forest.fit(&x, &y).expect("fit succeeds");

        let importances = forest.feature_importances().expect("fitted");
        assert!(importances[0] > importances[1]);
    }

    #[test]
    fn test_forest_oob_score_available() {
        let (x, y) = step_data();
        let mut forest = RandomForestRegressor::new(30).with_random_state(42);
        forest.fit(&x, &y).expect("fit succeeds");
        // With 30 bootstrap samples of 6 rows, OOB coverage is near-certain.
        let oob = forest.oob_score().expect("oob available");
        assert!(oob > 0.5, "oob R² was {oob}");
    }

    #[test]
    fn test_forest_zero_estimators_rejected() {
        let (x, y) = step_data();
        let mut forest = RandomForestRegressor::new(0);
        assert!(matches!(
            forest.fit(&x, &y).unwrap_err(),
            PredecirError::InvalidHyperparameter { .. }
        ));
    }

    #[test]
    fn test_forest_predict_before_fit_errors() {
        let forest = RandomForestRegressor::new(5);
        let x = Matrix::from_vec(1, 1, vec![1.0]).expect("matrix");
        assert!(matches!(
            forest.predict(&x).unwrap_err(),
            PredecirError::NotTrained { .. }
        ));
    }

    #[test]
    fn test_tree_json_round_trip() {
        let (x, y) = step_data();
        let mut tree = DecisionTreeRegressor::new();
        tree.fit(&x, &y).expect("fit succeeds");

        let json = tree.to_json().expect("serialize");
        let restored = DecisionTreeRegressor::from_json(&json).expect("deserialize");
        assert_eq!(
            tree.predict(&x).expect("fitted"),
            restored.predict(&x).expect("restored fitted")
        );
    }

    #[test]
    fn test_forest_json_round_trip() {
        let (x, y) = step_data();
        let mut forest = RandomForestRegressor::new(10).with_random_state(7);
        forest.fit(&x, &y).expect("fit succeeds");

        let json = forest.to_json().expect("serialize");
        let restored = RandomForestRegressor::from_json(&json).expect("deserialize");
        assert_eq!(
            forest.predict(&x).expect("fitted"),
            restored.predict(&x).expect("restored fitted")
        );
        assert_eq!(
            forest.oob_score().expect("oob"),
            restored.oob_score().expect("restored oob")
        );
    }

    #[test]
    fn test_max_features_resolution() {
        assert_eq!(MaxFeatures::Sqrt.resolve(9), 3);
        assert_eq!(MaxFeatures::Log2.resolve(8), 3);
        assert_eq!(MaxFeatures::Count(100).resolve(4), 4);
        assert_eq!(MaxFeatures::Sqrt.resolve(1), 1);
    }
}

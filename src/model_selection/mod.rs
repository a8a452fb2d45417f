//! Model selection utilities: train/test splitting, cross-validation,
//! learning curves, and model comparison.
//!
//! Cross-validation refits the supplied model per fold; `fit` is required
//! to re-fit from scratch, so the same instance is reused across folds.

use crate::error::{PredecirError, Result};
use crate::metrics;
use crate::metrics::classification;
use crate::primitives::{Matrix, Vector};
use crate::traits::Estimator;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Scoring metric used by cross-validation and model comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Metric {
    /// Mean absolute error (lower is better).
    Mae,
    /// Mean squared error (lower is better).
    Mse,
    /// Root mean squared error (lower is better).
    Rmse,
    /// Coefficient of determination (higher is better).
    R2,
    /// Binary accuracy (higher is better).
    Accuracy,
    /// Binary precision (higher is better).
    Precision,
    /// Binary recall (higher is better).
    Recall,
    /// Binary F1 score (higher is better).
    F1,
}

impl Metric {
    /// Scores predictions against true values.
    ///
    /// # Panics
    ///
    /// Panics if vectors have different lengths or are empty.
    #[must_use]
    pub fn compute(&self, y_pred: &Vector<f32>, y_true: &Vector<f32>) -> f32 {
        match self {
            Metric::Mae => metrics::mae(y_pred, y_true),
            Metric::Mse => metrics::mse(y_pred, y_true),
            Metric::Rmse => metrics::rmse(y_pred, y_true),
            Metric::R2 => metrics::r_squared(y_pred, y_true),
            Metric::Accuracy => classification::accuracy(y_pred, y_true),
            Metric::Precision => classification::precision(y_pred, y_true),
            Metric::Recall => classification::recall(y_pred, y_true),
            Metric::F1 => classification::f1_score(y_pred, y_true),
        }
    }

    /// True when larger scores indicate a better model.
    #[must_use]
    pub fn higher_is_better(&self) -> bool {
        !matches!(self, Metric::Mae | Metric::Mse | Metric::Rmse)
    }
}

/// Results from cross-validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossValidationResult {
    /// Score for each fold.
    pub scores: Vec<f32>,
}

impl CrossValidationResult {
    /// Mean score across folds.
    #[must_use]
    pub fn mean(&self) -> f32 {
        if self.scores.is_empty() {
            return 0.0;
        }
        self.scores.iter().sum::<f32>() / self.scores.len() as f32
    }

    /// Population standard deviation of fold scores.
    #[must_use]
    pub fn std(&self) -> f32 {
        if self.scores.is_empty() {
            return 0.0;
        }
        let mean = self.mean();
        let variance = self
            .scores
            .iter()
            .map(|&score| (score - mean).powi(2))
            .sum::<f32>()
            / self.scores.len() as f32;
        variance.sqrt()
    }

    /// Minimum fold score.
    #[must_use]
    pub fn min(&self) -> f32 {
        self.scores.iter().copied().fold(f32::INFINITY, f32::min)
    }

    /// Maximum fold score.
    #[must_use]
    pub fn max(&self) -> f32 {
        self.scores
            .iter()
            .copied()
            .fold(f32::NEG_INFINITY, f32::max)
    }
}

/// Splits features and labels into train and test partitions.
///
/// Shuffles row indices (deterministically when `seed` is given) and puts
/// `round(n * test_size)` rows into the test partition. The result is a
/// true partition: every row lands in exactly one side.
///
/// # Errors
///
/// Returns an error if `test_size` is not strictly between 0 and 1, if
/// the data is empty, or if `x` and `y` lengths differ.
///
/// # Examples
///
/// ```
/// use predecir::model_selection::train_test_split;
/// use predecir::primitives::{Matrix, Vector};
///
/// let x = Matrix::from_vec(8, 1, (0..8).map(|i| i as f32).collect()).unwrap();
/// let y = Vector::from_vec((0..8).map(|i| i as f32).collect());
///
/// let (x_train, x_test, y_train, y_test) =
///     train_test_split(&x, &y, 0.25, Some(42)).unwrap();
/// assert_eq!(x_train.n_rows() + x_test.n_rows(), 8);
/// assert_eq!(y_train.len() + y_test.len(), 8);
/// ```
pub fn train_test_split(
    x: &Matrix<f32>,
    y: &Vector<f32>,
    test_size: f32,
    seed: Option<u64>,
) -> Result<(Matrix<f32>, Matrix<f32>, Vector<f32>, Vector<f32>)> {
    let n_samples = x.n_rows();
    if n_samples == 0 {
        return Err(PredecirError::empty_input("train_test_split"));
    }
    if y.len() != n_samples {
        return Err(PredecirError::dimension_mismatch(
            "labels",
            n_samples,
            y.len(),
        ));
    }
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(PredecirError::InvalidHyperparameter {
            param: "test_size".to_string(),
            value: test_size.to_string(),
            constraint: "0 < test_size < 1".to_string(),
        });
    }

    let mut indices: Vec<usize> = (0..n_samples).collect();
    match seed {
        Some(seed) => {
            let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
            indices.shuffle(&mut rng);
        }
        None => {
            let mut rng = rand::thread_rng();
            indices.shuffle(&mut rng);
        }
    }

    let n_test = (n_samples as f32 * test_size).round() as usize;
    let (test_idx, train_idx) = indices.split_at(n_test);

    Ok((
        x.select_rows(train_idx),
        x.select_rows(test_idx),
        select_vector(y, train_idx),
        select_vector(y, test_idx),
    ))
}

fn select_vector(y: &Vector<f32>, indices: &[usize]) -> Vector<f32> {
    Vector::from_vec(indices.iter().map(|&i| y[i]).collect())
}

/// Extracts the rows of `x` and `y` at the given indices.
fn extract_samples(
    x: &Matrix<f32>,
    y: &Vector<f32>,
    indices: &[usize],
) -> (Matrix<f32>, Vector<f32>) {
    (x.select_rows(indices), select_vector(y, indices))
}

/// K-Fold cross-validator producing contiguous, unshuffled folds.
///
/// Fold `i` covers rows `[i*fold_size, (i+1)*fold_size)`; the last fold
/// absorbs any remainder.
///
/// # Examples
///
/// ```
/// use predecir::model_selection::KFold;
///
/// let kfold = KFold::new(3);
/// let splits = kfold.split(10).unwrap();
/// assert_eq!(splits.len(), 3);
/// assert_eq!(splits[2].1.len(), 4); // last fold absorbs the remainder
/// ```
#[derive(Debug, Clone)]
pub struct KFold {
    n_splits: usize,
}

impl KFold {
    /// Creates a K-Fold cross-validator with `n_splits` folds.
    #[must_use]
    pub fn new(n_splits: usize) -> Self {
        Self { n_splits }
    }

    /// Generates (train_indices, test_indices) for each fold.
    ///
    /// # Errors
    ///
    /// Returns an error if `n_splits < 2` or `n_samples < n_splits`.
    pub fn split(&self, n_samples: usize) -> Result<Vec<(Vec<usize>, Vec<usize>)>> {
        if self.n_splits < 2 {
            return Err(PredecirError::InvalidHyperparameter {
                param: "n_splits".to_string(),
                value: self.n_splits.to_string(),
                constraint: ">= 2".to_string(),
            });
        }
        if n_samples < self.n_splits {
            return Err(PredecirError::InvalidInput {
                message: format!(
                    "need at least {} samples for {} folds, got {n_samples}",
                    self.n_splits, self.n_splits
                ),
            });
        }

        let fold_size = n_samples / self.n_splits;
        let mut result = Vec::with_capacity(self.n_splits);

        for i in 0..self.n_splits {
            let start = i * fold_size;
            let end = if i == self.n_splits - 1 {
                n_samples
            } else {
                start + fold_size
            };

            let test_indices: Vec<usize> = (start..end).collect();
            let mut train_indices = Vec::with_capacity(n_samples - (end - start));
            train_indices.extend(0..start);
            train_indices.extend(end..n_samples);

            result.push((train_indices, test_indices));
        }

        Ok(result)
    }
}

/// Stratified K-Fold cross-validator.
///
/// Folds are built per class so each fold preserves the overall class
/// proportions; intended for classification metrics.
///
/// # Examples
///
/// ```
/// use predecir::model_selection::StratifiedKFold;
/// use predecir::primitives::Vector;
///
/// let y = Vector::from_slice(&[0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0]);
/// let skfold = StratifiedKFold::new(2);
/// let splits = skfold.split(&y).unwrap();
/// assert_eq!(splits.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct StratifiedKFold {
    n_splits: usize,
}

impl StratifiedKFold {
    /// Creates a stratified K-Fold cross-validator with `n_splits` folds.
    #[must_use]
    pub fn new(n_splits: usize) -> Self {
        Self { n_splits }
    }

    /// Generates stratified (train_indices, test_indices) for each fold.
    ///
    /// # Errors
    ///
    /// Returns an error if `n_splits < 2`, there are fewer samples than
    /// folds, or the class counts are too small to put at least one
    /// sample in every fold.
    pub fn split(&self, y: &Vector<f32>) -> Result<Vec<(Vec<usize>, Vec<usize>)>> {
        let n_samples = y.len();
        if self.n_splits < 2 {
            return Err(PredecirError::InvalidHyperparameter {
                param: "n_splits".to_string(),
                value: self.n_splits.to_string(),
                constraint: ">= 2".to_string(),
            });
        }
        if n_samples < self.n_splits {
            return Err(PredecirError::InvalidInput {
                message: format!(
                    "need at least {} samples for {} folds, got {n_samples}",
                    self.n_splits, self.n_splits
                ),
            });
        }

        // Group indices by class label; BTreeMap keeps fold layout stable.
        let mut class_indices: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
        for (i, &label) in y.as_slice().iter().enumerate() {
            class_indices.entry(label.round() as i64).or_default().push(i);
        }

        // Distribute each class across folds in turn.
        let mut fold_indices: Vec<Vec<usize>> = vec![Vec::new(); self.n_splits];
        for indices in class_indices.values() {
            let class_size = indices.len();
            let fold_size = class_size / self.n_splits;
            let remainder = class_size % self.n_splits;

            let mut start = 0;
            for (i, fold) in fold_indices.iter_mut().enumerate() {
                let current_size = if i < remainder {
                    fold_size + 1
                } else {
                    fold_size
                };
                let end = start + current_size;
                fold.extend_from_slice(&indices[start..end]);
                start = end;
            }
        }

        // Small classes can starve trailing folds; an empty test fold
        // cannot be scored.
        if fold_indices.iter().any(Vec::is_empty) {
            return Err(PredecirError::InvalidInput {
                message: format!(
                    "class counts are too small to fill {} stratified folds",
                    self.n_splits
                ),
            });
        }

        let mut result = Vec::with_capacity(self.n_splits);
        for i in 0..self.n_splits {
            let test_indices = fold_indices[i].clone();
            let mut train_indices = Vec::with_capacity(n_samples - test_indices.len());
            for (j, fold) in fold_indices.iter().enumerate() {
                if i != j {
                    train_indices.extend_from_slice(fold);
                }
            }
            result.push((train_indices, test_indices));
        }

        Ok(result)
    }
}

/// Runs k-fold cross-validation with the given metric.
///
/// The model is refit from scratch on each fold's training rows, then
/// scored with `metric` on the held-out fold. Every row appears in
/// exactly one test fold.
///
/// # Errors
///
/// Returns an error for invalid fold counts, mismatched lengths, or a
/// fold whose training fails.
///
/// # Examples
///
/// ```
/// use predecir::prelude::*;
/// use predecir::model_selection::{cross_validate, Metric};
///
/// let x = Matrix::from_vec(12, 1, (0..12).map(|i| i as f32).collect()).unwrap();
/// let y = Vector::from_vec((0..12).map(|i| 2.0 * i as f32).collect());
///
/// let mut model = LinearRegression::new();
/// let result = cross_validate(&mut model, &x, &y, 3, Metric::R2).unwrap();
/// assert_eq!(result.scores.len(), 3);
/// ```
pub fn cross_validate<M>(
    model: &mut M,
    x: &Matrix<f32>,
    y: &Vector<f32>,
    k: usize,
    metric: Metric,
) -> Result<CrossValidationResult>
where
    M: Estimator + ?Sized,
{
    if y.len() != x.n_rows() {
        return Err(PredecirError::dimension_mismatch(
            "labels",
            x.n_rows(),
            y.len(),
        ));
    }
    let splits = KFold::new(k).split(x.n_rows())?;
    score_folds(model, x, y, &splits, metric)
}

/// Runs stratified k-fold cross-validation with the given metric.
///
/// # Errors
///
/// Returns an error for invalid fold counts, mismatched lengths, or a
/// fold whose training fails.
pub fn stratified_cross_validate<M>(
    model: &mut M,
    x: &Matrix<f32>,
    y: &Vector<f32>,
    k: usize,
    metric: Metric,
) -> Result<CrossValidationResult>
where
    M: Estimator + ?Sized,
{
    if y.len() != x.n_rows() {
        return Err(PredecirError::dimension_mismatch(
            "labels",
            x.n_rows(),
            y.len(),
        ));
    }
    let splits = StratifiedKFold::new(k).split(y)?;
    score_folds(model, x, y, &splits, metric)
}

fn score_folds<M>(
    model: &mut M,
    x: &Matrix<f32>,
    y: &Vector<f32>,
    splits: &[(Vec<usize>, Vec<usize>)],
    metric: Metric,
) -> Result<CrossValidationResult>
where
    M: Estimator + ?Sized,
{
    let mut scores = Vec::with_capacity(splits.len());
    for (train_idx, test_idx) in splits {
        let (x_train, y_train) = extract_samples(x, y, train_idx);
        let (x_test, y_test) = extract_samples(x, y, test_idx);

        model.fit(&x_train, &y_train)?;
        let y_pred = model.predict(&x_test)?;
        scores.push(metric.compute(&y_pred, &y_test));
    }
    Ok(CrossValidationResult { scores })
}

/// Scores for one point on a learning curve.
#[derive(Debug, Clone, PartialEq)]
pub struct LearningCurvePoint {
    /// Fraction of the data used for training.
    pub train_fraction: f32,
    /// Mean cross-validation score on the training subset.
    pub train_score: f32,
    /// Score on the held-out validation remainder.
    pub validation_score: f32,
}

/// Computes a learning curve for over/under-fitting diagnosis.
///
/// For each fraction, the leading `fraction * n` rows are cross-validated
/// with `k` folds (train score) and a model fit on that subset is scored
/// on the remaining rows (validation score).
///
/// # Errors
///
/// Returns an error if a fraction is outside (0, 1), leaves no validation
/// rows, or produces a subset too small for `k` folds.
pub fn learning_curve<M>(
    model: &mut M,
    x: &Matrix<f32>,
    y: &Vector<f32>,
    fractions: &[f32],
    k: usize,
    metric: Metric,
) -> Result<Vec<LearningCurvePoint>>
where
    M: Estimator + ?Sized,
{
    let n_samples = x.n_rows();
    if n_samples == 0 {
        return Err(PredecirError::empty_input("learning_curve"));
    }

    let mut points = Vec::with_capacity(fractions.len());
    for &fraction in fractions {
        if !(fraction > 0.0 && fraction < 1.0) {
            return Err(PredecirError::InvalidHyperparameter {
                param: "train_fraction".to_string(),
                value: fraction.to_string(),
                constraint: "0 < fraction < 1".to_string(),
            });
        }

        let n_train = ((n_samples as f32) * fraction).round() as usize;
        let n_train = n_train.clamp(1, n_samples - 1);
        let train_idx: Vec<usize> = (0..n_train).collect();
        let valid_idx: Vec<usize> = (n_train..n_samples).collect();

        let (x_sub, y_sub) = extract_samples(x, y, &train_idx);
        let (x_valid, y_valid) = extract_samples(x, y, &valid_idx);

        let cv = cross_validate(model, &x_sub, &y_sub, k, metric)?;

        model.fit(&x_sub, &y_sub)?;
        let y_pred = model.predict(&x_valid)?;
        let validation_score = metric.compute(&y_pred, &y_valid);

        points.push(LearningCurvePoint {
            train_fraction: fraction,
            train_score: cv.mean(),
            validation_score,
        });
    }
    Ok(points)
}

/// One entry in a model-comparison ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRank {
    /// Caller-supplied model name.
    pub name: String,
    /// Mean cross-validation score.
    pub mean: f32,
    /// Population standard deviation of fold scores.
    pub std: f32,
}

/// Cross-validates each named model and returns them ranked best-first.
///
/// Ordering respects the metric direction: error metrics rank ascending,
/// score metrics descending.
///
/// # Errors
///
/// Returns an error if any model fails cross-validation.
pub fn compare_models(
    models: &mut [(String, Box<dyn Estimator>)],
    x: &Matrix<f32>,
    y: &Vector<f32>,
    k: usize,
    metric: Metric,
) -> Result<Vec<ModelRank>> {
    let mut ranks = Vec::with_capacity(models.len());
    for (name, model) in models.iter_mut() {
        let result = cross_validate(model.as_mut(), x, y, k, metric)?;
        ranks.push(ModelRank {
            name: name.clone(),
            mean: result.mean(),
            std: result.std(),
        });
    }

    if metric.higher_is_better() {
        ranks.sort_by(|a, b| b.mean.total_cmp(&a.mean));
    } else {
        ranks.sort_by(|a, b| a.mean.total_cmp(&b.mean));
    }
    Ok(ranks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linear_model::LinearRegression;

    fn linear_data(n: usize) -> (Matrix<f32>, Vector<f32>) {
        let x = Matrix::from_vec(n, 1, (0..n).map(|i| i as f32).collect()).expect("matrix");
        let y = Vector::from_vec((0..n).map(|i| 2.0 * i as f32 + 1.0).collect());
        (x, y)
    }

    #[test]
    fn test_split_sizes_sum_to_n() {
        let (x, y) = linear_data(10);
        let (x_train, x_test, y_train, y_test) =
            train_test_split(&x, &y, 0.3, Some(7)).expect("valid split");
        assert_eq!(x_train.n_rows() + x_test.n_rows(), 10);
        assert_eq!(y_train.len() + y_test.len(), 10);
        assert_eq!(x_test.n_rows(), 3);
    }

    #[test]
    fn test_split_is_partition() {
        let (x, y) = linear_data(10);
        let (x_train, x_test, _, _) =
            train_test_split(&x, &y, 0.25, Some(42)).expect("valid split");

        let mut seen: Vec<f32> = x_train
            .as_slice()
            .iter()
            .chain(x_test.as_slice().iter())
            .copied()
            .collect();
        seen.sort_by(|a, b| a.total_cmp(b));
        let expected: Vec<f32> = (0..10).map(|i| i as f32).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_split_deterministic_with_seed() {
        let (x, y) = linear_data(12);
        let first = train_test_split(&x, &y, 0.25, Some(42)).expect("valid split");
        let second = train_test_split(&x, &y, 0.25, Some(42)).expect("valid split");
        assert_eq!(first.0, second.0);
        assert_eq!(first.1, second.1);
        assert_eq!(first.2, second.2);
        assert_eq!(first.3, second.3);
    }

    #[test]
    fn test_split_invalid_test_size() {
        let (x, y) = linear_data(10);
        assert!(train_test_split(&x, &y, 0.0, None).is_err());
        assert!(train_test_split(&x, &y, 1.0, None).is_err());
        assert!(train_test_split(&x, &y, 1.5, None).is_err());
    }

    #[test]
    fn test_split_length_mismatch() {
        let (x, _) = linear_data(10);
        let y = Vector::from_slice(&[1.0, 2.0]);
        assert!(train_test_split(&x, &y, 0.25, None).is_err());
    }

    #[test]
    fn test_kfold_contiguous_folds() {
        let splits = KFold::new(3).split(10).expect("valid");
        assert_eq!(splits[0].1, vec![0, 1, 2]);
        assert_eq!(splits[1].1, vec![3, 4, 5]);
        // Last fold absorbs the remainder.
        assert_eq!(splits[2].1, vec![6, 7, 8, 9]);
    }

    #[test]
    fn test_kfold_every_row_tested_once() {
        let splits = KFold::new(4).split(11).expect("valid");
        let mut tested: Vec<usize> = splits.iter().flat_map(|(_, t)| t.clone()).collect();
        tested.sort_unstable();
        assert_eq!(tested, (0..11).collect::<Vec<_>>());
    }

    #[test]
    fn test_kfold_rejects_k_below_two() {
        assert!(KFold::new(1).split(10).is_err());
    }

    #[test]
    fn test_kfold_rejects_too_few_samples() {
        assert!(KFold::new(5).split(3).is_err());
    }

    #[test]
    fn test_stratified_preserves_proportions() {
        let y = Vector::from_vec(
            (0..12)
                .map(|i| if i < 8 { 0.0 } else { 1.0 })
                .collect::<Vec<f32>>(),
        );
        let splits = StratifiedKFold::new(4).split(&y).expect("valid");
        for (_, test_idx) in &splits {
            let positives = test_idx.iter().filter(|&&i| y[i] == 1.0).count();
            assert_eq!(positives, 1, "each fold should hold one positive");
            assert_eq!(test_idx.len(), 3);
        }
    }

    #[test]
    fn test_stratified_rejects_classes_smaller_than_fold_count() {
        // Two classes of two samples cannot fill three folds; the third
        // fold would be empty.
        let y = Vector::from_slice(&[0.0, 0.0, 1.0, 1.0]);
        let err = StratifiedKFold::new(3).split(&y).unwrap_err();
        assert!(matches!(err, PredecirError::InvalidInput { .. }));
    }

    #[test]
    fn test_stratified_cross_validate_small_classes_errors() {
        let x = Matrix::from_vec(4, 1, vec![0.0, 1.0, 2.0, 3.0]).expect("matrix");
        let y = Vector::from_slice(&[0.0, 0.0, 1.0, 1.0]);
        let mut model = LinearRegression::new();
        // Must surface as an error, never a panic inside the metric.
        let result = stratified_cross_validate(&mut model, &x, &y, 3, Metric::Mse);
        assert!(matches!(
            result.unwrap_err(),
            PredecirError::InvalidInput { .. }
        ));
    }

    #[test]
    fn test_stratified_covers_all_rows() {
        let y = Vector::from_slice(&[0.0, 1.0, 0.0, 1.0, 0.0, 1.0]);
        let splits = StratifiedKFold::new(3).split(&y).expect("valid");
        let mut tested: Vec<usize> = splits.iter().flat_map(|(_, t)| t.clone()).collect();
        tested.sort_unstable();
        assert_eq!(tested, (0..6).collect::<Vec<_>>());
    }

    #[test]
    fn test_cross_validate_linear_data() {
        let (x, y) = linear_data(12);
        let mut model = LinearRegression::new();
        let result = cross_validate(&mut model, &x, &y, 3, Metric::R2).expect("cv succeeds");
        assert_eq!(result.scores.len(), 3);
        assert!(result.mean() > 0.9, "mean R² was {}", result.mean());
    }

    #[test]
    fn test_cross_validate_rejects_bad_k() {
        let (x, y) = linear_data(12);
        let mut model = LinearRegression::new();
        assert!(cross_validate(&mut model, &x, &y, 1, Metric::R2).is_err());
        assert!(cross_validate(&mut model, &x, &y, 13, Metric::R2).is_err());
    }

    #[test]
    fn test_result_mean_std() {
        let result = CrossValidationResult {
            scores: vec![1.0, 2.0, 3.0],
        };
        assert!((result.mean() - 2.0).abs() < 1e-6);
        let expected_std = (2.0_f32 / 3.0).sqrt();
        assert!((result.std() - expected_std).abs() < 1e-6);
        assert_eq!(result.min(), 1.0);
        assert_eq!(result.max(), 3.0);
    }

    #[test]
    fn test_learning_curve_points() {
        let (x, y) = linear_data(20);
        let mut model = LinearRegression::new();
        let points =
            learning_curve(&mut model, &x, &y, &[0.3, 0.5], 2, Metric::R2).expect("curve");
        assert_eq!(points.len(), 2);
        for point in &points {
            assert!(point.validation_score > 0.9);
        }
    }

    #[test]
    fn test_learning_curve_rejects_bad_fraction() {
        let (x, y) = linear_data(10);
        let mut model = LinearRegression::new();
        assert!(learning_curve(&mut model, &x, &y, &[1.5], 2, Metric::R2).is_err());
    }

    #[test]
    fn test_compare_models_ranking() {
        let (x, y) = linear_data(12);
        let mut models: Vec<(String, Box<dyn Estimator>)> = vec![
            (
                "short".to_string(),
                Box::new(LinearRegression::new().with_max_iter(5)),
            ),
            (
                "long".to_string(),
                Box::new(LinearRegression::new().with_max_iter(5000)),
            ),
        ];
        let ranks = compare_models(&mut models, &x, &y, 3, Metric::R2).expect("compare");
        assert_eq!(ranks.len(), 2);
        assert!(ranks[0].mean >= ranks[1].mean);
        assert_eq!(ranks[0].name, "long");
    }

    #[test]
    fn test_metric_direction() {
        assert!(Metric::R2.higher_is_better());
        assert!(Metric::Accuracy.higher_is_better());
        assert!(!Metric::Mse.higher_is_better());
        assert!(!Metric::Rmse.higher_is_better());
    }
}

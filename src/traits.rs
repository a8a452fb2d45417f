//! Core traits for ML estimators and transformers.
//!
//! These traits define the API contracts for all algorithms, so that
//! cross-validation and the pipeline stay algorithm-agnostic.

use crate::error::Result;
use crate::primitives::{Matrix, Vector};

/// Primary trait for supervised learning estimators.
///
/// Estimators implement fit/predict/score following sklearn conventions.
/// Calling `fit` again re-fits from scratch; no training data is retained
/// after `fit` returns.
///
/// # Examples
///
/// ```
/// use predecir::prelude::*;
///
/// // Training data: y = 2x
/// let x = Matrix::from_vec(4, 1, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
/// let y = Vector::from_slice(&[2.0, 4.0, 6.0, 8.0]);
///
/// let mut model = LinearRegression::new();
/// model.fit(&x, &y).unwrap();
/// let predictions = model.predict(&x).unwrap();
/// assert_eq!(predictions.len(), 4);
/// ```
pub trait Estimator {
    /// Fits the model to training data.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails (empty data, dimension mismatch,
    /// invalid hyperparameters).
    fn fit(&mut self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<()>;

    /// Predicts target values for input data.
    ///
    /// # Errors
    ///
    /// Returns `NotTrained` if called before `fit`, or a dimension error
    /// if `x` has the wrong number of features.
    fn predict(&self, x: &Matrix<f32>) -> Result<Vector<f32>>;

    /// Computes the score (R² for regression, accuracy for classification).
    ///
    /// # Errors
    ///
    /// Returns `NotTrained` if called before `fit`.
    fn score(&self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<f32>;
}

/// Trait for estimators that expose class probabilities.
pub trait ProbabilisticEstimator: Estimator {
    /// Predicts per-class probabilities, one row per sample.
    ///
    /// # Errors
    ///
    /// Returns `NotTrained` if called before `fit`.
    fn predict_proba(&self, x: &Matrix<f32>) -> Result<Matrix<f32>>;
}

/// Trait for unsupervised learning models.
///
/// # Examples
///
/// ```
/// use predecir::prelude::*;
///
/// let data = Matrix::from_vec(4, 2, vec![
///     0.0, 0.0,
///     0.0, 1.0,
///     10.0, 10.0,
///     10.0, 11.0,
/// ]).unwrap();
///
/// let mut kmeans = KMeans::new(2).with_random_state(42);
/// kmeans.fit(&data).unwrap();
/// let labels = kmeans.predict(&data).unwrap();
/// assert_eq!(labels.len(), 4);
/// ```
pub trait UnsupervisedEstimator {
    /// The type of labels/clusters produced.
    type Labels;

    /// Fits the model to data.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails (empty data, invalid parameters).
    fn fit(&mut self, x: &Matrix<f32>) -> Result<()>;

    /// Predicts cluster assignments for data.
    ///
    /// # Errors
    ///
    /// Returns `NotTrained` if called before `fit`.
    fn predict(&self, x: &Matrix<f32>) -> Result<Self::Labels>;
}

/// Trait for data transformers (scalers, imputers, feature expanders).
///
/// Transformers compute statistics during `fit` and reuse them verbatim in
/// every later `transform` call. Inference inputs are therefore always
/// transformed with training-time statistics, never statistics recomputed
/// from the inference batch.
pub trait Transformer {
    /// Fits the transformer to data.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails.
    fn fit(&mut self, x: &Matrix<f32>) -> Result<()>;

    /// Transforms data using fitted parameters, returning a new matrix.
    ///
    /// # Errors
    ///
    /// Returns an error if the transformer is not fitted.
    fn transform(&self, x: &Matrix<f32>) -> Result<Matrix<f32>>;

    /// Fits and transforms in one step.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails.
    fn fit_transform(&mut self, x: &Matrix<f32>) -> Result<Matrix<f32>> {
        self.fit(x)?;
        self.transform(x)
    }
}

//! Binary classifiers.
//!
//! `LogisticRegression` is trained by batch gradient descent on the
//! log-loss, mirroring the linear regression solver.

use crate::error::{PredecirError, Result};
use crate::metrics::classification::accuracy;
use crate::primitives::{Matrix, Vector};
use crate::traits::{Estimator, ProbabilisticEstimator};
use serde::{Deserialize, Serialize};

/// Numerically stable logistic sigmoid.
fn sigmoid(z: f32) -> f32 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Binary logistic regression fit by batch gradient descent.
///
/// Models `P(y=1 | x) = sigmoid(x·w + b)`. `predict` thresholds the
/// probability at 0.5 and returns 0/1 labels; `predict_proba` returns one
/// row per sample with columns `[P(0), P(1)]`. Score is binary accuracy.
///
/// # Examples
///
/// ```
/// use predecir::prelude::*;
///
/// let x = Matrix::from_vec(6, 1, vec![-3.0, -2.0, -1.0, 1.0, 2.0, 3.0]).unwrap();
/// let y = Vector::from_slice(&[0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
///
/// let mut model = LogisticRegression::new();
/// model.fit(&x, &y).unwrap();
/// assert!(model.score(&x, &y).unwrap() > 0.99);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    weights: Option<Vector<f32>>,
    bias: f32,
    learning_rate: f32,
    max_iter: usize,
    tolerance: f32,
    n_iter: usize,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LogisticRegression {
    /// Creates a model with learning rate 0.1, 1000 iterations, and
    /// tolerance 1e-6.
    #[must_use]
    pub fn new() -> Self {
        Self {
            weights: None,
            bias: 0.0,
            learning_rate: 0.1,
            max_iter: 1000,
            tolerance: 1e-6,
            n_iter: 0,
        }
    }

    /// Sets the gradient descent step size.
    #[must_use]
    pub fn with_learning_rate(mut self, learning_rate: f32) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Sets the maximum number of gradient descent iterations.
    #[must_use]
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Sets the gradient-norm tolerance for early stopping.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Returns the fitted feature weights (excluding bias).
    ///
    /// # Errors
    ///
    /// Returns `NotTrained` if the model has not been fitted.
    pub fn weights(&self) -> Result<&Vector<f32>> {
        self.weights
            .as_ref()
            .ok_or_else(|| PredecirError::not_trained("LogisticRegression"))
    }

    /// Returns the fitted bias term.
    #[must_use]
    pub fn bias(&self) -> f32 {
        self.bias
    }

    /// Returns the number of iterations the last fit actually ran.
    #[must_use]
    pub fn n_iter(&self) -> usize {
        self.n_iter
    }

    /// Returns true if the model has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.weights.is_some()
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

    /// P(y=1) for each row.
    fn positive_probabilities(&self, x: &Matrix<f32>) -> Result<Vector<f32>> {
        let weights = self
            .weights
            .as_ref()
            .ok_or_else(|| PredecirError::not_trained("LogisticRegression"))?;
        if x.n_cols() != weights.len() {
            return Err(PredecirError::dimension_mismatch(
                "features",
                weights.len(),
                x.n_cols(),
            ));
        }
        let logits = x.matvec(weights)?.add_scalar(self.bias);
        Ok(Vector::from_vec(
            logits.as_slice().iter().map(|&z| sigmoid(z)).collect(),
        ))
    }

    fn validate_inputs(&self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<()> {
        let n_samples = x.n_rows();
        if n_samples == 0 {
            return Err(PredecirError::empty_input("LogisticRegression::fit"));
        }
        if y.len() != n_samples {
            return Err(PredecirError::dimension_mismatch(
                "labels",
                n_samples,
                y.len(),
            ));
        }
        for &label in y.as_slice() {
            if label != 0.0 && label != 1.0 {
                return Err(PredecirError::InvalidInput {
                    message: format!("labels must be 0 or 1, got {label}"),
                });
            }
        }
        if !(self.learning_rate > 0.0) {
            return Err(PredecirError::InvalidHyperparameter {
                param: "learning_rate".to_string(),
                value: self.learning_rate.to_string(),
                constraint: "> 0".to_string(),
            });
        }
        if self.max_iter == 0 {
            return Err(PredecirError::InvalidHyperparameter {
                param: "max_iter".to_string(),
                value: "0".to_string(),
                constraint: ">= 1".to_string(),
            });
        }
        Ok(())
    }
}

impl Estimator for LogisticRegression {
    fn fit(&mut self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<()> {
        self.validate_inputs(x, y)?;

        let (n_samples, n_features) = x.shape();
        let mut weights = Vector::zeros(n_features);
        let mut bias = 0.0_f32;
        let n = n_samples as f32;
        let mut iterations = 0;

        for _ in 0..self.max_iter {
            iterations += 1;

            // Gradient of the log-loss: (1/n) X^T (sigmoid(Xw + b) - y).
            let mut grad_w = vec![0.0_f32; n_features];
            let mut grad_b = 0.0_f32;
            for i in 0..n_samples {
                let row = x.row(i);
                let p = sigmoid(row.dot(&weights) + bias);
                let error = p - y[i];
                for (j, g) in grad_w.iter_mut().enumerate() {
                    *g += error * row[j];
                }
                grad_b += error;
            }
            for g in &mut grad_w {
                *g /= n;
            }
            grad_b /= n;

            let max_grad = grad_w
                .iter()
                .map(|g| g.abs())
                .fold(grad_b.abs(), f32::max);

            let mut next = Vec::with_capacity(n_features);
            for (w, g) in weights.as_slice().iter().zip(grad_w.iter()) {
                next.push(w - self.learning_rate * g);
            }
            weights = Vector::from_vec(next);
            bias -= self.learning_rate * grad_b;

            if max_grad < self.tolerance {
                break;
            }
        }

        self.weights = Some(weights);
        self.bias = bias;
        self.n_iter = iterations;
        Ok(())
    }

    /// Predicts hard 0/1 labels by thresholding P(y=1) at 0.5.
    fn predict(&self, x: &Matrix<f32>) -> Result<Vector<f32>> {
        let probabilities = self.positive_probabilities(x)?;
        Ok(Vector::from_vec(
            probabilities
                .as_slice()
                .iter()
                .map(|&p| if p >= 0.5 { 1.0 } else { 0.0 })
                .collect(),
        ))
    }

    fn score(&self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<f32> {
        let predictions = self.predict(x)?;
        Ok(accuracy(&predictions, y))
    }
}

impl ProbabilisticEstimator for LogisticRegression {
    /// Returns an (n, 2) matrix with columns `[P(y=0), P(y=1)]`.
    fn predict_proba(&self, x: &Matrix<f32>) -> Result<Matrix<f32>> {
        let positive = self.positive_probabilities(x)?;
        let mut data = Vec::with_capacity(positive.len() * 2);
        for &p in positive.as_slice() {
            data.push(1.0 - p);
            data.push(p);
        }
        Matrix::from_vec(positive.len(), 2, data).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn separable_data() -> (Matrix<f32>, Vector<f32>) {
        let x = Matrix::from_vec(
            8,
            1,
            vec![-4.0, -3.0, -2.0, -1.0, 1.0, 2.0, 3.0, 4.0],
        )
        .expect("matrix");
        let y = Vector::from_slice(&[0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0]);
        (x, y)
    }

    #[test]
    fn test_fit_separable_data() {
        let (x, y) = separable_data();
        let mut model = LogisticRegression::new();
        model.fit(&x, &y).expect("fit succeeds");
        assert!((model.score(&x, &y).expect("fitted") - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_predictions_are_binary() {
        let (x, y) = separable_data();
        let mut model = LogisticRegression::new();
        model.fit(&x, &y).expect("fit succeeds");
        let predictions = model.predict(&x).expect("fitted");
        for &p in predictions.as_slice() {
            assert!(p == 0.0 || p == 1.0);
        }
    }

    #[test]
    fn test_proba_rows_sum_to_one() {
        let (x, y) = separable_data();
        let mut model = LogisticRegression::new();
        model.fit(&x, &y).expect("fit succeeds");

        let probabilities = model.predict_proba(&x).expect("fitted");
        assert_eq!(probabilities.shape(), (8, 2));
        for i in 0..probabilities.n_rows() {
            let sum = probabilities.get(i, 0) + probabilities.get(i, 1);
            assert!((sum - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_proba_monotone_in_feature() {
        let (x, y) = separable_data();
        let mut model = LogisticRegression::new();
        model.fit(&x, &y).expect("fit succeeds");

        let probabilities = model.predict_proba(&x).expect("fitted");
        // P(1) should increase with x for this data.
        assert!(probabilities.get(0, 1) < probabilities.get(7, 1));
    }

    #[test]
    fn test_predict_before_fit_errors() {
        let model = LogisticRegression::new();
        let x = Matrix::from_vec(1, 1, vec![1.0]).expect("matrix");
        let err = model.predict(&x).unwrap_err();
        assert!(matches!(err, PredecirError::NotTrained { .. }));
    }

    #[test]
    fn test_non_binary_labels_rejected() {
        let x = Matrix::from_vec(2, 1, vec![1.0, 2.0]).expect("matrix");
        let y = Vector::from_slice(&[0.0, 2.0]);
        let mut model = LogisticRegression::new();
        let err = model.fit(&x, &y).unwrap_err();
        assert!(matches!(err, PredecirError::InvalidInput { .. }));
    }

    #[test]
    fn test_sigmoid_bounds() {
        assert!(sigmoid(-100.0) >= 0.0);
        assert!(sigmoid(100.0) <= 1.0);
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_json_round_trip() {
        let (x, y) = separable_data();
        let mut model = LogisticRegression::new();
        model.fit(&x, &y).expect("fit succeeds");

        let json = model.to_json().expect("serialize");
        let restored = LogisticRegression::from_json(&json).expect("deserialize");
        assert_eq!(
            model.predict(&x).expect("fitted"),
            restored.predict(&x).expect("restored fitted")
        );
    }
}

//! Linear models for regression.
//!
//! `LinearRegression` is trained by batch gradient descent on the mean
//! squared error, which keeps training robust on the small, possibly
//! collinear feature sets produced by polynomial expansion.

use crate::error::{PredecirError, Result};
use crate::metrics::r_squared;
use crate::primitives::{Matrix, Vector};
use crate::traits::Estimator;
use serde::{Deserialize, Serialize};

/// Linear regression fit by batch gradient descent.
///
/// Minimizes MSE over `y = X w + b`. Each iteration computes the full-batch
/// gradient and steps all weights and the bias together; training stops
/// early once the largest absolute gradient component drops below
/// `tolerance`.
///
/// # Examples
///
/// ```
/// use predecir::prelude::*;
///
/// // y = 2x + 1
/// let x = Matrix::from_vec(4, 1, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
/// let y = Vector::from_slice(&[3.0, 5.0, 7.0, 9.0]);
///
/// let mut model = LinearRegression::new();
/// model.fit(&x, &y).unwrap();
///
/// let r2 = model.score(&x, &y).unwrap();
/// assert!(r2 > 0.99);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegression {
    weights: Option<Vector<f32>>,
    bias: f32,
    learning_rate: f32,
    max_iter: usize,
    tolerance: f32,
    n_iter: usize,
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearRegression {
    /// Creates a model with learning rate 0.01, 1000 iterations, and
    /// tolerance 1e-6.
    #[must_use]
    pub fn new() -> Self {
        Self {
            weights: None,
            bias: 0.0,
            learning_rate: 0.01,
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
            .ok_or_else(|| PredecirError::not_trained("LinearRegression"))
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

    fn validate_hyperparameters(&self) -> Result<()> {
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
        if !(self.tolerance >= 0.0) {
            return Err(PredecirError::InvalidHyperparameter {
                param: "tolerance".to_string(),
                value: self.tolerance.to_string(),
                constraint: ">= 0".to_string(),
            });
        }
        Ok(())
    }
}

impl Estimator for LinearRegression {
    fn fit(&mut self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<()> {
        self.validate_hyperparameters()?;

        let (n_samples, n_features) = x.shape();
        if n_samples == 0 {
            return Err(PredecirError::empty_input("LinearRegression::fit"));
        }
        if y.len() != n_samples {
            return Err(PredecirError::dimension_mismatch(
                "labels",
                n_samples,
                y.len(),
            ));
        }

        let mut weights = Vector::zeros(n_features);
        let mut bias = 0.0_f32;
        let n = n_samples as f32;
        let mut iterations = 0;

        for _ in 0..self.max_iter {
            iterations += 1;

            // Full-batch gradient of MSE.
            let mut grad_w = vec![0.0_f32; n_features];
            let mut grad_b = 0.0_f32;
            for i in 0..n_samples {
                let row = x.row(i);
                let error = row.dot(&weights) + bias - y[i];
                for (j, g) in grad_w.iter_mut().enumerate() {
                    *g += error * row[j];
                }
                grad_b += error;
            }
            for g in &mut grad_w {
                *g *= 2.0 / n;
            }
            grad_b *= 2.0 / n;

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

    fn predict(&self, x: &Matrix<f32>) -> Result<Vector<f32>> {
        let weights = self
            .weights
            .as_ref()
            .ok_or_else(|| PredecirError::not_trained("LinearRegression"))?;
        if x.n_cols() != weights.len() {
            return Err(PredecirError::dimension_mismatch(
                "features",
                weights.len(),
                x.n_cols(),
            ));
        }
        Ok(x.matvec(weights)?.add_scalar(self.bias))
    }

    fn score(&self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<f32> {
        let predictions = self.predict(x)?;
        Ok(r_squared(&predictions, y))
    }
}

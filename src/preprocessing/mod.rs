//! Preprocessing transformers for data standardization and cleaning.
//!
//! All transformers compute their statistics during `fit` and replay them
//! unchanged in `transform`, so inference inputs are never rescaled with
//! statistics recomputed from the inference batch. Every transform
//! allocates a fresh matrix; inputs are never mutated.
//!
//! # Example
//!
//! ```
//! use predecir::prelude::*;
//! use predecir::preprocessing::StandardScaler;
//!
//! let data = Matrix::from_vec(4, 2, vec![
//!     1.0, 100.0,
//!     2.0, 200.0,
//!     3.0, 300.0,
//!     4.0, 400.0,
//! ]).expect("valid matrix dimensions");
//!
//! let mut scaler = StandardScaler::new();
//! let scaled = scaler.fit_transform(&data).expect("fit_transform should succeed");
//! assert_eq!(scaled.shape(), (4, 2));
//! ```

use crate::error::{PredecirError, Result};
use crate::primitives::{Matrix, Vector};
use crate::traits::Transformer;
use serde::{Deserialize, Serialize};

/// Per-column summary statistics computed at training time.
///
/// Owned by the pipeline and reused unmodified for every inference call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureStats {
    /// Column mean.
    pub mean: f32,
    /// Column population standard deviation.
    pub std: f32,
    /// Column minimum.
    pub min: f32,
    /// Column maximum.
    pub max: f32,
    /// Column median (even/odd midpoint rule).
    pub median: f32,
}

/// Computes per-column mean/std/min/max/median.
///
/// # Errors
///
/// Returns `InvalidInput` if the matrix has no rows or no columns.
pub fn feature_stats(x: &Matrix<f32>) -> Result<Vec<FeatureStats>> {
    let (n_samples, n_features) = x.shape();
    if n_samples == 0 || n_features == 0 {
        return Err(PredecirError::empty_input("feature_stats"));
    }

    let mut stats = Vec::with_capacity(n_features);
    for j in 0..n_features {
        let col = x.column(j);
        let mean = col.mean();
        let std = population_std(col.as_slice(), mean);

        let mut sorted = col.as_slice().to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        stats.push(FeatureStats {
            mean,
            std,
            min: sorted[0],
            max: sorted[n_samples - 1],
            median: median_sorted(&sorted),
        });
    }
    Ok(stats)
}

/// Population standard deviation given a precomputed mean.
fn population_std(values: &[f32], mean: f32) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / values.len() as f32;
    var.sqrt()
}

/// Median of an already-sorted slice using the even/odd midpoint rule.
fn median_sorted(sorted: &[f32]) -> f32 {
    let n = sorted.len();
    if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    }
}

/// Standardizes features by removing mean and scaling to unit variance.
///
/// The standard score of a sample x is: z = (x - mean) / std.
/// A zero-variance column uses a divisor of 1, so it becomes all-zero
/// after centering instead of producing NaN.
///
/// # Example
///
/// ```
/// use predecir::prelude::*;
/// use predecir::preprocessing::StandardScaler;
///
/// let data = Matrix::from_vec(3, 1, vec![0.0, 1.0, 2.0]).expect("valid matrix dimensions");
/// let mut scaler = StandardScaler::new();
/// let scaled = scaler.fit_transform(&data).expect("fit_transform should succeed");
///
/// let mean: f32 = (0..3).map(|i| scaled.get(i, 0)).sum::<f32>() / 3.0;
/// assert!(mean.abs() < 1e-5);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Mean of each feature (computed during fit).
    mean: Option<Vec<f32>>,
    /// Standard deviation of each feature (computed during fit).
    std: Option<Vec<f32>>,
}

impl StandardScaler {
    /// Creates a new `StandardScaler`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mean: None,
            std: None,
        }
    }

    /// Returns the mean of each feature.
    ///
    /// # Panics
    ///
    /// Panics if the scaler is not fitted.
    #[must_use]
    pub fn mean(&self) -> &[f32] {
        self.mean
            .as_ref()
            .expect("Scaler not fitted. Call fit() first.")
    }

    /// Returns the standard deviation of each feature.
    ///
    /// # Panics
    ///
    /// Panics if the scaler is not fitted.
    #[must_use]
    pub fn std(&self) -> &[f32] {
        self.std
            .as_ref()
            .expect("Scaler not fitted. Call fit() first.")
    }

    /// Returns true if the scaler has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.mean.is_some()
    }

    /// Transforms standardized data back to the original scale.
    ///
    /// # Errors
    ///
    /// Returns an error if the scaler is not fitted or dimensions mismatch.
    pub fn inverse_transform(&self, x: &Matrix<f32>) -> Result<Matrix<f32>> {
        let mean = self
            .mean
            .as_ref()
            .ok_or_else(|| PredecirError::not_trained("StandardScaler"))?;
        let std = self
            .std
            .as_ref()
            .ok_or_else(|| PredecirError::not_trained("StandardScaler"))?;

        let (n_samples, n_features) = x.shape();
        if n_features != mean.len() {
            return Err(PredecirError::dimension_mismatch(
                "features",
                mean.len(),
                n_features,
            ));
        }

        let mut result = vec![0.0; n_samples * n_features];
        for i in 0..n_samples {
            for j in 0..n_features {
                let divisor = if std[j] > 0.0 { std[j] } else { 1.0 };
                result[i * n_features + j] = x.get(i, j) * divisor + mean[j];
            }
        }
        Matrix::from_vec(n_samples, n_features, result).map_err(Into::into)
    }
}

impl Transformer for StandardScaler {
    /// Computes the mean and population standard deviation of each feature.
    fn fit(&mut self, x: &Matrix<f32>) -> Result<()> {
        let (n_samples, n_features) = x.shape();
        if n_samples == 0 {
            return Err(PredecirError::empty_input("StandardScaler::fit"));
        }

        let mut mean = vec![0.0; n_features];
        let mut std = vec![0.0; n_features];
        for j in 0..n_features {
            let col = x.column(j);
            mean[j] = col.mean();
            std[j] = population_std(col.as_slice(), mean[j]);
        }

        self.mean = Some(mean);
        self.std = Some(std);
        Ok(())
    }

    /// Standardizes the data using fitted mean and std.
    fn transform(&self, x: &Matrix<f32>) -> Result<Matrix<f32>> {
        let mean = self
            .mean
            .as_ref()
            .ok_or_else(|| PredecirError::not_trained("StandardScaler"))?;
        let std = self
            .std
            .as_ref()
            .ok_or_else(|| PredecirError::not_trained("StandardScaler"))?;

        let (n_samples, n_features) = x.shape();
        if n_features != mean.len() {
            return Err(PredecirError::dimension_mismatch(
                "features",
                mean.len(),
                n_features,
            ));
        }

        let mut result = vec![0.0; n_samples * n_features];
        for i in 0..n_samples {
            for j in 0..n_features {
                // Zero-variance column: divisor 1 keeps output finite.
                let divisor = if std[j] > 0.0 { std[j] } else { 1.0 };
                result[i * n_features + j] = (x.get(i, j) - mean[j]) / divisor;
            }
        }
        Matrix::from_vec(n_samples, n_features, result).map_err(Into::into)
    }
}

/// Scales features linearly into a target range (default [0, 1]).
///
/// The transformation is: X_scaled = lo + (X - min) * (hi - lo) / (max - min).
/// A constant column (max == min) uses a range of 1, keeping the output
/// deterministic instead of NaN.
///
/// # Example
///
/// ```
/// use predecir::prelude::*;
/// use predecir::preprocessing::MinMaxScaler;
///
/// let data = Matrix::from_vec(3, 1, vec![0.0, 5.0, 10.0]).expect("valid matrix dimensions");
/// let mut scaler = MinMaxScaler::new();
/// let scaled = scaler.fit_transform(&data).expect("fit_transform should succeed");
///
/// assert!((scaled.get(0, 0) - 0.0).abs() < 1e-6);
/// assert!((scaled.get(1, 0) - 0.5).abs() < 1e-6);
/// assert!((scaled.get(2, 0) - 1.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinMaxScaler {
    /// Minimum value of each feature (computed during fit).
    data_min: Option<Vec<f32>>,
    /// Maximum value of each feature (computed during fit).
    data_max: Option<Vec<f32>>,
    /// Target minimum for scaling.
    feature_min: f32,
    /// Target maximum for scaling.
    feature_max: f32,
}

impl Default for MinMaxScaler {
    fn default() -> Self {
        Self::new()
    }
}

impl MinMaxScaler {
    /// Creates a new `MinMaxScaler` targeting [0, 1].
    #[must_use]
    pub fn new() -> Self {
        Self {
            data_min: None,
            data_max: None,
            feature_min: 0.0,
            feature_max: 1.0,
        }
    }

    /// Sets the target output range.
    #[must_use]
    pub fn with_range(mut self, lo: f32, hi: f32) -> Self {
        self.feature_min = lo;
        self.feature_max = hi;
        self
    }

    /// Returns true if the scaler has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.data_min.is_some()
    }
}

impl Transformer for MinMaxScaler {
    /// Records the per-column minimum and maximum.
    fn fit(&mut self, x: &Matrix<f32>) -> Result<()> {
        let (n_samples, n_features) = x.shape();
        if n_samples == 0 {
            return Err(PredecirError::empty_input("MinMaxScaler::fit"));
        }
        if self.feature_max <= self.feature_min {
            return Err(PredecirError::InvalidHyperparameter {
                param: "range".to_string(),
                value: format!("[{}, {}]", self.feature_min, self.feature_max),
                constraint: "lo < hi".to_string(),
            });
        }

        let mut data_min = vec![f32::INFINITY; n_features];
        let mut data_max = vec![f32::NEG_INFINITY; n_features];
        for i in 0..n_samples {
            for j in 0..n_features {
                let v = x.get(i, j);
                data_min[j] = data_min[j].min(v);
                data_max[j] = data_max[j].max(v);
            }
        }

        self.data_min = Some(data_min);
        self.data_max = Some(data_max);
        Ok(())
    }

    /// Rescales the data into the target range using fitted min/max.
    fn transform(&self, x: &Matrix<f32>) -> Result<Matrix<f32>> {
        let data_min = self
            .data_min
            .as_ref()
            .ok_or_else(|| PredecirError::not_trained("MinMaxScaler"))?;
        let data_max = self
            .data_max
            .as_ref()
            .ok_or_else(|| PredecirError::not_trained("MinMaxScaler"))?;

        let (n_samples, n_features) = x.shape();
        if n_features != data_min.len() {
            return Err(PredecirError::dimension_mismatch(
                "features",
                data_min.len(),
                n_features,
            ));
        }

        let span = self.feature_max - self.feature_min;
        let mut result = vec![0.0; n_samples * n_features];
        for i in 0..n_samples {
            for j in 0..n_features {
                // Constant column: range 1 keeps output deterministic.
                let range = data_max[j] - data_min[j];
                let range = if range > 0.0 { range } else { 1.0 };
                let unit = (x.get(i, j) - data_min[j]) / range;
                result[i * n_features + j] = self.feature_min + unit * span;
            }
        }
        Matrix::from_vec(n_samples, n_features, result).map_err(Into::into)
    }
}

/// Replaces missing entries (NaN) with the column mean over present values.
///
/// A column that is entirely missing defaults to 0.
///
/// # Example
///
/// ```
/// use predecir::prelude::*;
/// use predecir::preprocessing::SimpleImputer;
///
/// let data = Matrix::from_vec(3, 1, vec![1.0, f32::NAN, 3.0]).expect("valid matrix dimensions");
/// let mut imputer = SimpleImputer::new();
/// let filled = imputer.fit_transform(&data).expect("fit_transform should succeed");
/// assert!((filled.get(1, 0) - 2.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimpleImputer {
    /// Per-column fill value (mean of non-missing entries).
    fill: Option<Vec<f32>>,
}

impl SimpleImputer {
    /// Creates a new mean imputer.
    #[must_use]
    pub fn new() -> Self {
        Self { fill: None }
    }

    /// Returns true if the imputer has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.fill.is_some()
    }

    /// Returns the per-column fill values.
    ///
    /// # Panics
    ///
    /// Panics if the imputer is not fitted.
    #[must_use]
    pub fn fill_values(&self) -> &[f32] {
        self.fill
            .as_ref()
            .expect("Imputer not fitted. Call fit() first.")
    }
}

impl Transformer for SimpleImputer {
    /// Computes per-column means over non-missing entries.
    fn fit(&mut self, x: &Matrix<f32>) -> Result<()> {
        let (n_samples, n_features) = x.shape();
        if n_samples == 0 {
            return Err(PredecirError::empty_input("SimpleImputer::fit"));
        }

        let mut fill = vec![0.0; n_features];
        for (j, fill_j) in fill.iter_mut().enumerate() {
            let mut sum = 0.0;
            let mut count = 0usize;
            for i in 0..n_samples {
                let v = x.get(i, j);
                if !v.is_nan() {
                    sum += v;
                    count += 1;
                }
            }
            // All-missing column defaults to 0.
            *fill_j = if count > 0 { sum / count as f32 } else { 0.0 };
        }

        self.fill = Some(fill);
        Ok(())
    }

    /// Replaces NaN entries with the fitted fill values.
    fn transform(&self, x: &Matrix<f32>) -> Result<Matrix<f32>> {
        let fill = self
            .fill
            .as_ref()
            .ok_or_else(|| PredecirError::not_trained("SimpleImputer"))?;

        let (n_samples, n_features) = x.shape();
        if n_features != fill.len() {
            return Err(PredecirError::dimension_mismatch(
                "features",
                fill.len(),
                n_features,
            ));
        }

        let mut result = Vec::with_capacity(n_samples * n_features);
        for i in 0..n_samples {
            for j in 0..n_features {
                let v = x.get(i, j);
                result.push(if v.is_nan() { fill[j] } else { v });
            }
        }
        Matrix::from_vec(n_samples, n_features, result).map_err(Into::into)
    }
}

/// Appends polynomial interaction features.
///
/// For each degree d in 2..=degree and each pair i <= j, appends the
/// column `x_i^d * x_j^d`. Original columns come first.
///
/// # Example
///
/// ```
/// use predecir::prelude::*;
/// use predecir::preprocessing::PolynomialFeatures;
///
/// let data = Matrix::from_vec(1, 2, vec![2.0, 3.0]).expect("valid matrix dimensions");
/// let mut poly = PolynomialFeatures::new(2);
/// let expanded = poly.fit_transform(&data).expect("fit_transform should succeed");
///
/// // [x0, x1, then squared pair products]
/// assert_eq!(expanded.n_cols(), 5);
/// assert!((expanded.get(0, 2) - 16.0).abs() < 1e-6);  // (2²)·(2²)
/// assert!((expanded.get(0, 3) - 36.0).abs() < 1e-6);  // (2²)·(3²)
/// assert!((expanded.get(0, 4) - 81.0).abs() < 1e-6);  // (3²)·(3²)
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolynomialFeatures {
    degree: usize,
    /// Number of input features seen at fit time.
    n_input_features: Option<usize>,
}

impl PolynomialFeatures {
    /// Creates a polynomial expander of the given degree.
    #[must_use]
    pub fn new(degree: usize) -> Self {
        Self {
            degree,
            n_input_features: None,
        }
    }

    /// Returns the configured degree.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.degree
    }
}

impl Transformer for PolynomialFeatures {
    /// Validates the degree and records the input width.
    fn fit(&mut self, x: &Matrix<f32>) -> Result<()> {
        if self.degree < 1 {
            return Err(PredecirError::InvalidHyperparameter {
                param: "degree".to_string(),
                value: self.degree.to_string(),
                constraint: ">= 1".to_string(),
            });
        }
        let (n_samples, n_features) = x.shape();
        if n_samples == 0 {
            return Err(PredecirError::empty_input("PolynomialFeatures::fit"));
        }
        self.n_input_features = Some(n_features);
        Ok(())
    }

    /// Expands the input with the configured interaction terms.
    fn transform(&self, x: &Matrix<f32>) -> Result<Matrix<f32>> {
        let n_input = self
            .n_input_features
            .ok_or_else(|| PredecirError::not_trained("PolynomialFeatures"))?;

        let (n_samples, n_features) = x.shape();
        if n_features != n_input {
            return Err(PredecirError::dimension_mismatch(
                "features",
                n_input,
                n_features,
            ));
        }

        let pairs = n_features * (n_features + 1) / 2;
        let n_out = n_features + pairs * self.degree.saturating_sub(1);
        let mut result = Vec::with_capacity(n_samples * n_out);

        for i in 0..n_samples {
            for j in 0..n_features {
                result.push(x.get(i, j));
            }
            for d in 2..=self.degree {
                for a in 0..n_features {
                    for b in a..n_features {
                        let term = x.get(i, a).powi(d as i32) * x.get(i, b).powi(d as i32);
                        result.push(term);
                    }
                }
            }
        }
        Matrix::from_vec(n_samples, n_out, result).map_err(Into::into)
    }
}

/// Expands categorical columns into one indicator column per category.
///
/// Fit records the sorted distinct values of every column; `transform`
/// replaces each column with 0/1 indicator columns in that order. A
/// value not seen at fit time is rejected rather than silently encoded
/// as all zeros.
///
/// # Example
///
/// ```
/// use predecir::prelude::*;
/// use predecir::preprocessing::OneHotEncoder;
///
/// // Room types 0, 1, 2 in one column.
/// let data = Matrix::from_vec(3, 1, vec![0.0, 2.0, 1.0]).expect("valid matrix dimensions");
/// let mut encoder = OneHotEncoder::new();
/// let encoded = encoder.fit_transform(&data).expect("fit_transform should succeed");
///
/// assert_eq!(encoded.shape(), (3, 3));
/// assert_eq!(encoded.get(0, 0), 1.0);
/// assert_eq!(encoded.get(1, 2), 1.0);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OneHotEncoder {
    /// Sorted distinct values per input column.
    categories: Option<Vec<Vec<f32>>>,
}

impl OneHotEncoder {
    /// Creates a new one-hot encoder.
    #[must_use]
    pub fn new() -> Self {
        Self { categories: None }
    }

    /// Returns true if the encoder has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.categories.is_some()
    }

    /// Sorted category values per input column.
    ///
    /// # Errors
    ///
    /// Returns `NotTrained` before a successful fit.
    pub fn categories(&self) -> Result<&[Vec<f32>]> {
        self.categories
            .as_deref()
            .ok_or_else(|| PredecirError::not_trained("OneHotEncoder"))
    }
}

impl Transformer for OneHotEncoder {
    /// Records the sorted distinct values of every column.
    fn fit(&mut self, x: &Matrix<f32>) -> Result<()> {
        let (n_samples, n_features) = x.shape();
        if n_samples == 0 {
            return Err(PredecirError::empty_input("OneHotEncoder::fit"));
        }

        let mut categories = Vec::with_capacity(n_features);
        for j in 0..n_features {
            let mut values: Vec<f32> = (0..n_samples).map(|i| x.get(i, j)).collect();
            values.sort_by(f32::total_cmp);
            values.dedup();
            categories.push(values);
        }
        self.categories = Some(categories);
        Ok(())
    }

    /// Replaces each column with its indicator columns.
    fn transform(&self, x: &Matrix<f32>) -> Result<Matrix<f32>> {
        let categories = self
            .categories
            .as_ref()
            .ok_or_else(|| PredecirError::not_trained("OneHotEncoder"))?;

        let (n_samples, n_features) = x.shape();
        if n_features != categories.len() {
            return Err(PredecirError::dimension_mismatch(
                "features",
                categories.len(),
                n_features,
            ));
        }

        let n_out: usize = categories.iter().map(Vec::len).sum();
        let mut result = Vec::with_capacity(n_samples * n_out);
        for i in 0..n_samples {
            for (j, column_categories) in categories.iter().enumerate() {
                let v = x.get(i, j);
                let hit = column_categories
                    .iter()
                    .position(|&c| c == v)
                    .ok_or_else(|| PredecirError::InvalidInput {
                        message: format!(
                            "value {v} in column {j} was not seen during fit"
                        ),
                    })?;
                for k in 0..column_categories.len() {
                    result.push(if k == hit { 1.0 } else { 0.0 });
                }
            }
        }
        Matrix::from_vec(n_samples, n_out, result).map_err(Into::into)
    }
}

/// Maps label values to consecutive class indices `0..n_classes`.
///
/// Fit records the sorted distinct labels; `transform` emits each
/// label's index as f32, and `inverse_transform` maps indices back.
///
/// # Example
///
/// ```
/// use predecir::preprocessing::LabelEncoder;
/// use predecir::primitives::Vector;
///
/// let labels = Vector::from_slice(&[10.0, 30.0, 10.0, 20.0]);
/// let mut encoder = LabelEncoder::new();
/// let encoded = encoder.fit_transform(&labels).expect("fit_transform should succeed");
///
/// assert_eq!(encoded.as_slice(), &[0.0, 2.0, 0.0, 1.0]);
/// let decoded = encoder.inverse_transform(&encoded).expect("fitted");
/// assert_eq!(decoded.as_slice(), labels.as_slice());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelEncoder {
    /// Sorted distinct labels; a label's class index is its position.
    classes: Option<Vec<f32>>,
}

impl LabelEncoder {
    /// Creates a new label encoder.
    #[must_use]
    pub fn new() -> Self {
        Self { classes: None }
    }

    /// Returns true if the encoder has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.classes.is_some()
    }

    /// Sorted distinct labels seen at fit time.
    ///
    /// # Errors
    ///
    /// Returns `NotTrained` before a successful fit.
    pub fn classes(&self) -> Result<&[f32]> {
        self.classes
            .as_deref()
            .ok_or_else(|| PredecirError::not_trained("LabelEncoder"))
    }

    /// Records the sorted distinct labels.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the label vector is empty.
    pub fn fit(&mut self, y: &Vector<f32>) -> Result<()> {
        if y.is_empty() {
            return Err(PredecirError::empty_input("LabelEncoder::fit"));
        }
        let mut classes = y.as_slice().to_vec();
        classes.sort_by(f32::total_cmp);
        classes.dedup();
        self.classes = Some(classes);
        Ok(())
    }

    /// Maps each label to its class index.
    ///
    /// # Errors
    ///
    /// Returns `NotTrained` before fit, or `InvalidInput` for a label
    /// not seen during fit.
    pub fn transform(&self, y: &Vector<f32>) -> Result<Vector<f32>> {
        let classes = self.classes()?;
        let mut encoded = Vec::with_capacity(y.len());
        for &label in y.as_slice() {
            let idx = classes
                .iter()
                .position(|&c| c == label)
                .ok_or_else(|| PredecirError::InvalidInput {
                    message: format!("label {label} was not seen during fit"),
                })?;
            encoded.push(idx as f32);
        }
        Ok(Vector::from_vec(encoded))
    }

    /// Fits and transforms in one call.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the label vector is empty.
    pub fn fit_transform(&mut self, y: &Vector<f32>) -> Result<Vector<f32>> {
        self.fit(y)?;
        self.transform(y)
    }

    /// Maps class indices back to the original labels.
    ///
    /// # Errors
    ///
    /// Returns `NotTrained` before fit, or `InvalidInput` for an index
    /// outside `0..n_classes`.
    pub fn inverse_transform(&self, encoded: &Vector<f32>) -> Result<Vector<f32>> {
        let classes = self.classes()?;
        let mut labels = Vec::with_capacity(encoded.len());
        for &value in encoded.as_slice() {
            let idx = value.round() as usize;
            if value < 0.0 || idx >= classes.len() {
                return Err(PredecirError::InvalidInput {
                    message: format!(
                        "class index {value} is outside 0..{}",
                        classes.len()
                    ),
                });
            }
            labels.push(classes[idx]);
        }
        Ok(Vector::from_vec(labels))
    }
}

/// Removes rows containing outliers by the IQR rule.
///
/// A row is dropped if any column value falls outside
/// `[Q1 - k·IQR, Q3 + k·IQR]` for that column, with quartiles computed
/// over the whole matrix. Returns the retained rows and their original
/// indices (so callers can filter a label vector consistently).
///
/// # Errors
///
/// Returns `InvalidInput` if the matrix is empty.
///
/// # Example
///
/// ```
/// use predecir::prelude::*;
/// use predecir::preprocessing::remove_outliers;
///
/// let data = Matrix::from_vec(5, 1, vec![1.0, 2.0, 3.0, 4.0, 100.0]).expect("valid matrix dimensions");
/// let (kept, indices) = remove_outliers(&data, 1.5).expect("non-empty input");
/// assert_eq!(kept.n_rows(), 4);
/// assert_eq!(indices, vec![0, 1, 2, 3]);
/// ```
pub fn remove_outliers(x: &Matrix<f32>, iqr_multiplier: f32) -> Result<(Matrix<f32>, Vec<usize>)> {
    let (n_samples, n_features) = x.shape();
    if n_samples == 0 || n_features == 0 {
        return Err(PredecirError::empty_input("remove_outliers"));
    }

    // Per-column bounds from the full matrix.
    let mut bounds = Vec::with_capacity(n_features);
    for j in 0..n_features {
        let mut sorted = x.column(j).as_slice().to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let q1 = percentile_sorted(&sorted, 0.25);
        let q3 = percentile_sorted(&sorted, 0.75);
        let iqr = q3 - q1;
        bounds.push((q1 - iqr_multiplier * iqr, q3 + iqr_multiplier * iqr));
    }

    let kept: Vec<usize> = (0..n_samples)
        .filter(|&i| {
            (0..n_features).all(|j| {
                let v = x.get(i, j);
                let (lo, hi) = bounds[j];
                v >= lo && v <= hi
            })
        })
        .collect();

    Ok((x.select_rows(&kept), kept))
}

/// Linear-interpolation percentile of an already-sorted slice.
fn percentile_sorted(sorted: &[f32], p: f32) -> f32 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let pos = p * (n - 1) as f32;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    if lower == upper {
        sorted[lower]
    } else {
        let frac = pos - lower as f32;
        sorted[lower] * (1.0 - frac) + sorted[upper] * frac
    }
}

/// Filters a label vector down to the given row indices.
#[must_use]
pub fn select_labels(y: &Vector<f32>, indices: &[usize]) -> Vector<f32> {
    Vector::from_vec(indices.iter().map(|&i| y[i]).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Matrix<f32> {
        Matrix::from_vec(4, 2, vec![1.0, 10.0, 2.0, 20.0, 3.0, 30.0, 4.0, 40.0]).expect("matrix")
    }

    #[test]
    fn test_standard_scaler_zero_mean_unit_std() {
        let mut scaler = StandardScaler::new();
        let scaled = scaler.fit_transform(&sample()).expect("fit_transform");

        for j in 0..2 {
            let col = scaled.column(j);
            assert!(col.mean().abs() < 1e-5, "column {j} mean should be ~0");
            let std = (col.as_slice().iter().map(|v| v * v).sum::<f32>() / 4.0).sqrt();
            assert!((std - 1.0).abs() < 1e-4, "column {j} std should be ~1");
        }
    }

    #[test]
    fn test_standard_scaler_zero_variance_column() {
        let x = Matrix::from_vec(3, 1, vec![5.0, 5.0, 5.0]).expect("matrix");
        let mut scaler = StandardScaler::new();
        let scaled = scaler.fit_transform(&x).expect("fit_transform");
        // Centered with divisor 1: all zeros, no NaN.
        for i in 0..3 {
            assert_eq!(scaled.get(i, 0), 0.0);
        }
    }

    #[test]
    fn test_standard_scaler_inverse_round_trip() {
        let x = sample();
        let mut scaler = StandardScaler::new();
        let scaled = scaler.fit_transform(&x).expect("fit_transform");
        let back = scaler.inverse_transform(&scaled).expect("inverse");
        for i in 0..4 {
            for j in 0..2 {
                assert!((back.get(i, j) - x.get(i, j)).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_standard_scaler_uses_training_stats_for_new_data() {
        let mut scaler = StandardScaler::new();
        scaler.fit(&sample()).expect("fit");

        // New row scaled with training stats, not its own.
        let new = Matrix::from_vec(1, 2, vec![2.5, 25.0]).expect("matrix");
        let scaled = scaler.transform(&new).expect("transform");
        assert!((scaled.get(0, 0) - 0.0).abs() < 1e-5);
        assert!((scaled.get(0, 1) - 0.0).abs() < 1e-5);
    }

    #[test]
    fn test_standard_scaler_empty_input() {
        let x = Matrix::from_vec(0, 2, vec![]).expect("matrix");
        let mut scaler = StandardScaler::new();
        assert!(scaler.fit(&x).is_err());
    }

    #[test]
    fn test_min_max_scaler_unit_range() {
        let mut scaler = MinMaxScaler::new();
        let scaled = scaler.fit_transform(&sample()).expect("fit_transform");
        for j in 0..2 {
            assert!((scaled.get(0, j) - 0.0).abs() < 1e-6);
            assert!((scaled.get(3, j) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_min_max_scaler_custom_range() {
        let mut scaler = MinMaxScaler::new().with_range(-1.0, 1.0);
        let scaled = scaler.fit_transform(&sample()).expect("fit_transform");
        assert!((scaled.get(0, 0) - (-1.0)).abs() < 1e-6);
        assert!((scaled.get(3, 0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_min_max_scaler_constant_column() {
        let x = Matrix::from_vec(3, 1, vec![7.0, 7.0, 7.0]).expect("matrix");
        let mut scaler = MinMaxScaler::new();
        let scaled = scaler.fit_transform(&x).expect("fit_transform");
        // Range 1 substitution: (7-7)/1 = 0, no NaN.
        for i in 0..3 {
            assert_eq!(scaled.get(i, 0), 0.0);
        }
    }

    #[test]
    fn test_min_max_scaler_invalid_range() {
        let mut scaler = MinMaxScaler::new().with_range(1.0, 1.0);
        assert!(scaler.fit(&sample()).is_err());
    }

    #[test]
    fn test_imputer_column_mean() {
        let x = Matrix::from_vec(3, 2, vec![1.0, f32::NAN, f32::NAN, 4.0, 3.0, 8.0]).expect("matrix");
        let mut imputer = SimpleImputer::new();
        let filled = imputer.fit_transform(&x).expect("fit_transform");
        assert!((filled.get(1, 0) - 2.0).abs() < 1e-6); // mean of 1, 3
        assert!((filled.get(0, 1) - 6.0).abs() < 1e-6); // mean of 4, 8
    }

    #[test]
    fn test_imputer_all_missing_column_defaults_to_zero() {
        let x = Matrix::from_vec(2, 1, vec![f32::NAN, f32::NAN]).expect("matrix");
        let mut imputer = SimpleImputer::new();
        let filled = imputer.fit_transform(&x).expect("fit_transform");
        assert_eq!(filled.get(0, 0), 0.0);
        assert_eq!(filled.get(1, 0), 0.0);
    }

    #[test]
    fn test_imputer_preserves_present_values() {
        let x = Matrix::from_vec(2, 1, vec![1.0, 2.0]).expect("matrix");
        let mut imputer = SimpleImputer::new();
        let filled = imputer.fit_transform(&x).expect("fit_transform");
        assert_eq!(filled.get(0, 0), 1.0);
        assert_eq!(filled.get(1, 0), 2.0);
    }

    #[test]
    fn test_polynomial_features_degree_two() {
        let x = Matrix::from_vec(1, 2, vec![2.0, 3.0]).expect("matrix");
        let mut poly = PolynomialFeatures::new(2);
        let out = poly.fit_transform(&x).expect("fit_transform");

        // 2 original + 3 squared pair products.
        assert_eq!(out.n_cols(), 5);
        assert_eq!(out.get(0, 0), 2.0);
        assert_eq!(out.get(0, 1), 3.0);
        assert!((out.get(0, 2) - 16.0).abs() < 1e-5); // (2²)·(2²)
        assert!((out.get(0, 3) - 36.0).abs() < 1e-5); // (2²)·(3²)
        assert!((out.get(0, 4) - 81.0).abs() < 1e-5); // (3²)·(3²)
    }

    #[test]
    fn test_polynomial_features_degree_one_is_identity() {
        let x = sample();
        let mut poly = PolynomialFeatures::new(1);
        let out = poly.fit_transform(&x).expect("fit_transform");
        assert_eq!(out, x);
    }

    #[test]
    fn test_polynomial_features_degree_zero_rejected() {
        let mut poly = PolynomialFeatures::new(0);
        let result = poly.fit(&sample());
        assert!(matches!(
            result,
            Err(PredecirError::InvalidHyperparameter { .. })
        ));
    }

    #[test]
    fn test_one_hot_encoder_expands_columns() {
        // Two categorical columns: 2 and 3 categories.
        let x = Matrix::from_vec(
            3,
            2,
            vec![0.0, 5.0, 1.0, 6.0, 0.0, 7.0],
        )
        .expect("matrix");
        let mut encoder = OneHotEncoder::new();
        let encoded = encoder.fit_transform(&x).expect("fit_transform");

        assert_eq!(encoded.shape(), (3, 5));
        // Row 1: category 1 of column 0, category 6 of column 1.
        assert_eq!(encoded.get(1, 0), 0.0);
        assert_eq!(encoded.get(1, 1), 1.0);
        assert_eq!(encoded.get(1, 3), 1.0);
        // Every row has exactly one indicator set per original column.
        for i in 0..3 {
            let first: f32 = (0..2).map(|j| encoded.get(i, j)).sum();
            let second: f32 = (2..5).map(|j| encoded.get(i, j)).sum();
            assert_eq!(first, 1.0);
            assert_eq!(second, 1.0);
        }
    }

    #[test]
    fn test_one_hot_encoder_rejects_unseen_value() {
        let x = Matrix::from_vec(2, 1, vec![0.0, 1.0]).expect("matrix");
        let mut encoder = OneHotEncoder::new();
        encoder.fit(&x).expect("fit");

        let unseen = Matrix::from_vec(1, 1, vec![2.0]).expect("matrix");
        assert!(matches!(
            encoder.transform(&unseen).unwrap_err(),
            PredecirError::InvalidInput { .. }
        ));
    }

    #[test]
    fn test_one_hot_encoder_uses_fitted_categories_for_new_rows() {
        let x = Matrix::from_vec(3, 1, vec![0.0, 1.0, 2.0]).expect("matrix");
        let mut encoder = OneHotEncoder::new();
        encoder.fit(&x).expect("fit");

        // A batch missing some categories still gets the full width.
        let partial = Matrix::from_vec(1, 1, vec![2.0]).expect("matrix");
        let encoded = encoder.transform(&partial).expect("transform");
        assert_eq!(encoded.shape(), (1, 3));
        assert_eq!(encoded.get(0, 2), 1.0);
    }

    #[test]
    fn test_label_encoder_round_trip() {
        let y = Vector::from_slice(&[10.0, 30.0, 10.0, 20.0]);
        let mut encoder = LabelEncoder::new();
        let encoded = encoder.fit_transform(&y).expect("fit_transform");
        assert_eq!(encoded.as_slice(), &[0.0, 2.0, 0.0, 1.0]);

        let decoded = encoder.inverse_transform(&encoded).expect("fitted");
        assert_eq!(decoded.as_slice(), y.as_slice());
    }

    #[test]
    fn test_label_encoder_rejects_unseen_label() {
        let y = Vector::from_slice(&[1.0, 2.0]);
        let mut encoder = LabelEncoder::new();
        encoder.fit(&y).expect("fit");
        let unseen = Vector::from_slice(&[3.0]);
        assert!(matches!(
            encoder.transform(&unseen).unwrap_err(),
            PredecirError::InvalidInput { .. }
        ));
    }

    #[test]
    fn test_label_encoder_inverse_out_of_range_errors() {
        let y = Vector::from_slice(&[1.0, 2.0]);
        let mut encoder = LabelEncoder::new();
        encoder.fit(&y).expect("fit");
        let bad = Vector::from_slice(&[5.0]);
        assert!(encoder.inverse_transform(&bad).is_err());
    }

    #[test]
    fn test_remove_outliers_drops_extreme_row() {
        let x =
            Matrix::from_vec(5, 1, vec![1.0, 2.0, 3.0, 4.0, 100.0]).expect("matrix");
        let (kept, indices) = remove_outliers(&x, 1.5).expect("non-empty");
        assert_eq!(kept.n_rows(), 4);
        assert_eq!(indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_remove_outliers_keeps_clean_data() {
        let (kept, indices) = remove_outliers(&sample(), 1.5).expect("non-empty");
        assert_eq!(kept.n_rows(), 4);
        assert_eq!(indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_remove_outliers_empty_input() {
        let x = Matrix::from_vec(0, 1, vec![]).expect("matrix");
        assert!(remove_outliers(&x, 1.5).is_err());
    }

    #[test]
    fn test_feature_stats_values() {
        let x = Matrix::from_vec(4, 1, vec![1.0, 2.0, 3.0, 4.0]).expect("matrix");
        let stats = feature_stats(&x).expect("non-empty");
        assert_eq!(stats.len(), 1);
        assert!((stats[0].mean - 2.5).abs() < 1e-6);
        assert_eq!(stats[0].min, 1.0);
        assert_eq!(stats[0].max, 4.0);
        assert!((stats[0].median - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_feature_stats_odd_median() {
        let x = Matrix::from_vec(3, 1, vec![3.0, 1.0, 2.0]).expect("matrix");
        let stats = feature_stats(&x).expect("non-empty");
        assert_eq!(stats[0].median, 2.0);
    }

    #[test]
    fn test_feature_stats_empty_errors() {
        let x = Matrix::from_vec(0, 1, vec![]).expect("matrix");
        assert!(feature_stats(&x).is_err());
    }

    #[test]
    fn test_select_labels() {
        let y = Vector::from_slice(&[10.0, 20.0, 30.0]);
        let filtered = select_labels(&y, &[2, 0]);
        assert_eq!(filtered.as_slice(), &[30.0, 10.0]);
    }

    #[test]
    fn test_transforms_do_not_mutate_input() {
        let x = sample();
        let before = x.clone();
        let mut scaler = StandardScaler::new();
        let _ = scaler.fit_transform(&x).expect("fit_transform");
        assert_eq!(x, before);
    }
}

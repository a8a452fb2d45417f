//! Binary classification metrics.
//!
//! Predictions and labels are floating-point sequences; both are rounded
//! to 0/1 before counting, so probability outputs can be scored directly.
//! Zero-denominator precision/recall/F1 return 0.0 instead of NaN.

use crate::primitives::Vector;

/// Binary confusion matrix counts.
///
/// Invariant: `tp + tn + fp + fn_ == predictions.len()`.
///
/// # Examples
///
/// ```
/// use predecir::metrics::classification::ConfusionMatrix;
/// use predecir::primitives::Vector;
///
/// let y_true = Vector::from_slice(&[1.0, 0.0, 1.0, 0.0]);
/// let y_pred = Vector::from_slice(&[0.9, 0.2, 0.4, 0.1]);
/// let cm = ConfusionMatrix::from_predictions(&y_pred, &y_true);
/// assert_eq!(cm.tp + cm.tn + cm.fp + cm.fn_, 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfusionMatrix {
    /// True positives.
    pub tp: usize,
    /// False positives.
    pub fp: usize,
    /// True negatives.
    pub tn: usize,
    /// False negatives.
    pub fn_: usize,
}

impl ConfusionMatrix {
    /// Builds a confusion matrix by rounding predictions and labels to 0/1.
    ///
    /// # Panics
    ///
    /// Panics if vectors have different lengths.
    #[must_use]
    pub fn from_predictions(y_pred: &Vector<f32>, y_true: &Vector<f32>) -> Self {
        assert_eq!(y_pred.len(), y_true.len(), "Vectors must have same length");

        let mut cm = Self {
            tp: 0,
            fp: 0,
            tn: 0,
            fn_: 0,
        };
        for (p, t) in y_pred.as_slice().iter().zip(y_true.as_slice().iter()) {
            let p = p.round() >= 1.0;
            let t = t.round() >= 1.0;
            match (p, t) {
                (true, true) => cm.tp += 1,
                (true, false) => cm.fp += 1,
                (false, false) => cm.tn += 1,
                (false, true) => cm.fn_ += 1,
            }
        }
        cm
    }

    /// Total number of scored samples.
    #[must_use]
    pub fn total(&self) -> usize {
        self.tp + self.fp + self.tn + self.fn_
    }

    /// Accuracy = (TP + TN) / total; 0.0 for an empty matrix.
    #[must_use]
    pub fn accuracy(&self) -> f32 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        (self.tp + self.tn) as f32 / total as f32
    }

    /// Precision = TP / (TP + FP); 0.0 when the denominator is 0.
    #[must_use]
    pub fn precision(&self) -> f32 {
        if self.tp + self.fp == 0 {
            return 0.0;
        }
        self.tp as f32 / (self.tp + self.fp) as f32
    }

    /// Recall = TP / (TP + FN); 0.0 when the denominator is 0.
    #[must_use]
    pub fn recall(&self) -> f32 {
        if self.tp + self.fn_ == 0 {
            return 0.0;
        }
        self.tp as f32 / (self.tp + self.fn_) as f32
    }

    /// F1 = harmonic mean of precision and recall; 0.0 when both are 0.
    #[must_use]
    pub fn f1(&self) -> f32 {
        let p = self.precision();
        let r = self.recall();
        if p + r == 0.0 {
            return 0.0;
        }
        2.0 * p * r / (p + r)
    }
}

/// Binary classification accuracy (predictions rounded to 0/1).
///
/// # Panics
///
/// Panics if vectors have different lengths.
#[must_use]
pub fn accuracy(y_pred: &Vector<f32>, y_true: &Vector<f32>) -> f32 {
    ConfusionMatrix::from_predictions(y_pred, y_true).accuracy()
}

/// Binary precision (predictions rounded to 0/1).
///
/// # Panics
///
/// Panics if vectors have different lengths.
#[must_use]
pub fn precision(y_pred: &Vector<f32>, y_true: &Vector<f32>) -> f32 {
    ConfusionMatrix::from_predictions(y_pred, y_true).precision()
}

/// Binary recall (predictions rounded to 0/1).
///
/// # Panics
///
/// Panics if vectors have different lengths.
#[must_use]
pub fn recall(y_pred: &Vector<f32>, y_true: &Vector<f32>) -> f32 {
    ConfusionMatrix::from_predictions(y_pred, y_true).recall()
}

/// Binary F1 score (predictions rounded to 0/1).
///
/// # Panics
///
/// Panics if vectors have different lengths.
#[must_use]
pub fn f1_score(y_pred: &Vector<f32>, y_true: &Vector<f32>) -> f32 {
    ConfusionMatrix::from_predictions(y_pred, y_true).f1()
}

//! Threshold curves: ROC and precision-recall, with trapezoidal AUC.
//!
//! Both curves sweep every distinct prediction score (descending) as a
//! decision threshold, accumulating TP/FP/TN/FN at each cut.

use crate::error::{PredecirError, Result};
use crate::primitives::Vector;

/// A receiver operating characteristic curve.
#[derive(Debug, Clone, PartialEq)]
pub struct RocCurve {
    /// False positive rate at each threshold.
    pub fpr: Vec<f32>,
    /// True positive rate at each threshold.
    pub tpr: Vec<f32>,
    /// Thresholds, descending.
    pub thresholds: Vec<f32>,
    /// Area under the curve (trapezoidal rule).
    pub auc: f32,
}

/// A precision-recall curve.
#[derive(Debug, Clone, PartialEq)]
pub struct PrCurve {
    /// Recall at each threshold.
    pub recall: Vec<f32>,
    /// Precision at each threshold.
    pub precision: Vec<f32>,
    /// Thresholds, descending.
    pub thresholds: Vec<f32>,
    /// Area under the curve (trapezoidal rule over recall).
    pub auc: f32,
}

/// Distinct scores, sorted descending.
fn descending_thresholds(scores: &Vector<f32>) -> Vec<f32> {
    let mut thresholds: Vec<f32> = scores.as_slice().to_vec();
    thresholds.sort_by(|a, b| b.total_cmp(a));
    thresholds.dedup();
    thresholds
}

/// Confusion counts at a given threshold (score >= threshold is positive).
fn counts_at(scores: &Vector<f32>, y_true: &Vector<f32>, threshold: f32) -> (f32, f32, f32, f32) {
    let mut tp = 0.0;
    let mut fp = 0.0;
    let mut tn = 0.0;
    let mut fn_ = 0.0;
    for (s, t) in scores.as_slice().iter().zip(y_true.as_slice().iter()) {
        let predicted = *s >= threshold;
        let actual = t.round() >= 1.0;
        match (predicted, actual) {
            (true, true) => tp += 1.0,
            (true, false) => fp += 1.0,
            (false, false) => tn += 1.0,
            (false, true) => fn_ += 1.0,
        }
    }
    (tp, fp, tn, fn_)
}

/// Trapezoidal integration over (x, y) points.
fn trapezoid_area(x: &[f32], y: &[f32]) -> f32 {
    let mut area = 0.0;
    for i in 1..x.len() {
        area += (x[i] - x[i - 1]) * (y[i] + y[i - 1]) / 2.0;
    }
    area.abs()
}

/// Computes the ROC curve and its AUC.
///
/// Sweeps every distinct score descending; endpoints (0,0) and (1,1) are
/// included so the trapezoidal AUC covers the full FPR range.
///
/// # Errors
///
/// Returns `InvalidInput` if inputs are empty or lengths differ.
///
/// # Examples
///
/// ```
/// use predecir::metrics::curves::roc_curve;
/// use predecir::primitives::Vector;
///
/// let scores = Vector::from_slice(&[0.9, 0.8, 0.3, 0.1]);
/// let y_true = Vector::from_slice(&[1.0, 1.0, 0.0, 0.0]);
/// let roc = roc_curve(&scores, &y_true).expect("valid inputs");
/// assert!((roc.auc - 1.0).abs() < 1e-6);
/// ```
pub fn roc_curve(scores: &Vector<f32>, y_true: &Vector<f32>) -> Result<RocCurve> {
    if scores.is_empty() {
        return Err(PredecirError::empty_input("roc_curve"));
    }
    if scores.len() != y_true.len() {
        return Err(PredecirError::dimension_mismatch(
            "labels",
            scores.len(),
            y_true.len(),
        ));
    }

    let thresholds = descending_thresholds(scores);
    let mut fpr = vec![0.0];
    let mut tpr = vec![0.0];

    for &threshold in &thresholds {
        let (tp, fp, tn, fn_) = counts_at(scores, y_true, threshold);
        let tpr_i = if tp + fn_ > 0.0 { tp / (tp + fn_) } else { 0.0 };
        let fpr_i = if fp + tn > 0.0 { fp / (fp + tn) } else { 0.0 };
        tpr.push(tpr_i);
        fpr.push(fpr_i);
    }

    fpr.push(1.0);
    tpr.push(1.0);

    let auc = trapezoid_area(&fpr, &tpr);
    Ok(RocCurve {
        fpr,
        tpr,
        thresholds,
        auc,
    })
}

/// Computes the precision-recall curve and its AUC.
///
/// # Errors
///
/// Returns `InvalidInput` if inputs are empty or lengths differ.
///
/// # Examples
///
/// ```
/// use predecir::metrics::curves::precision_recall_curve;
/// use predecir::primitives::Vector;
///
/// let scores = Vector::from_slice(&[0.9, 0.8, 0.3, 0.1]);
/// let y_true = Vector::from_slice(&[1.0, 1.0, 0.0, 0.0]);
/// let pr = precision_recall_curve(&scores, &y_true).expect("valid inputs");
/// assert!(pr.auc > 0.99);
/// ```
pub fn precision_recall_curve(scores: &Vector<f32>, y_true: &Vector<f32>) -> Result<PrCurve> {
    if scores.is_empty() {
        return Err(PredecirError::empty_input("precision_recall_curve"));
    }
    if scores.len() != y_true.len() {
        return Err(PredecirError::dimension_mismatch(
            "labels",
            scores.len(),
            y_true.len(),
        ));
    }

    let thresholds = descending_thresholds(scores);
    let mut recall = Vec::with_capacity(thresholds.len());
    let mut precision = Vec::with_capacity(thresholds.len());

    for &threshold in &thresholds {
        let (tp, fp, _tn, fn_) = counts_at(scores, y_true, threshold);
        let p = if tp + fp > 0.0 { tp / (tp + fp) } else { 0.0 };
        let r = if tp + fn_ > 0.0 { tp / (tp + fn_) } else { 0.0 };
        precision.push(p);
        recall.push(r);
    }

    let auc = trapezoid_area(&recall, &precision);
    Ok(PrCurve {
        recall,
        precision,
        thresholds,
        auc,
    })
}

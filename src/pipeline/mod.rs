//! End-to-end training pipeline.
//!
//! `Pipeline` chains preprocessing, optional feature selection, a seeded
//! train/test split, model training, and held-out evaluation behind a
//! single `fit` call. All training-time statistics (imputation fill
//! values, scaler parameters, selected feature indices) are stored and
//! replayed verbatim for inference, so prediction inputs are never
//! transformed with statistics recomputed from the inference batch.

use crate::classification::LogisticRegression;
use crate::error::{PredecirError, Result};
use crate::linear_model::LinearRegression;
use crate::metrics;
use crate::metrics::classification::ConfusionMatrix;
use crate::model_selection::train_test_split;
use crate::preprocessing::{
    feature_stats, remove_outliers, select_labels, FeatureStats, PolynomialFeatures,
    SimpleImputer, StandardScaler,
};
use crate::primitives::{Matrix, Vector};
use crate::traits::{Estimator, ProbabilisticEstimator, Transformer};
use crate::tree::RandomForestRegressor;
use serde::{Deserialize, Serialize};

/// Which model family the pipeline trains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelKind {
    /// Gradient-descent linear regression.
    Linear,
    /// Binary logistic regression.
    Logistic,
    /// Random forest regression with the given number of trees.
    RandomForest {
        /// Number of trees in the forest.
        n_estimators: usize,
    },
}

/// Immutable pipeline configuration, supplied at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Replace missing (NaN) entries with training column means.
    pub impute: bool,
    /// Drop training rows with IQR outliers (training only; inference
    /// rows are never dropped).
    pub remove_outliers: bool,
    /// IQR fence multiplier used when `remove_outliers` is set.
    pub iqr_multiplier: f32,
    /// Append polynomial interaction features of this degree.
    pub polynomial_degree: Option<usize>,
    /// Z-score features with training-time statistics.
    pub standardize: bool,
    /// Keep only features whose absolute Pearson correlation with the
    /// target exceeds this threshold, ranked descending.
    pub feature_selection_threshold: Option<f32>,
    /// Model family to train.
    pub model: ModelKind,
    /// Held-out fraction for evaluation, strictly in (0, 1).
    pub test_size: f32,
    /// Seed for the train/test shuffle and model randomness.
    pub random_seed: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            impute: true,
            remove_outliers: false,
            iqr_multiplier: 1.5,
            polynomial_degree: None,
            standardize: true,
            feature_selection_threshold: None,
            model: ModelKind::Linear,
            test_size: 0.2,
            random_seed: 42,
        }
    }
}

/// Held-out metrics computed at the end of `fit`.
///
/// Regression models populate the error/R² fields; the logistic model
/// populates the classification fields. Unused fields are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Rows used for training.
    pub n_train: usize,
    /// Rows held out for evaluation.
    pub n_test: usize,
    /// Mean absolute error (regression).
    pub mae: Option<f32>,
    /// Mean squared error (regression).
    pub mse: Option<f32>,
    /// Root mean squared error (regression).
    pub rmse: Option<f32>,
    /// Coefficient of determination (regression).
    pub r2: Option<f32>,
    /// Accuracy (classification).
    pub accuracy: Option<f32>,
    /// Precision (classification).
    pub precision: Option<f32>,
    /// Recall (classification).
    pub recall: Option<f32>,
    /// F1 score (classification).
    pub f1: Option<f32>,
}

/// The trained model behind a pipeline.
#[derive(Debug, Clone)]
enum FittedModel {
    Linear(LinearRegression),
    Logistic(LogisticRegression),
    Forest(RandomForestRegressor),
}

impl FittedModel {
    fn name(&self) -> &'static str {
        match self {
            FittedModel::Linear(_) => "LinearRegression",
            FittedModel::Logistic(_) => "LogisticRegression",
            FittedModel::Forest(_) => "RandomForestRegressor",
        }
    }

    fn predict(&self, x: &Matrix<f32>) -> Result<Vector<f32>> {
        match self {
            FittedModel::Linear(model) => model.predict(x),
            FittedModel::Logistic(model) => model.predict(x),
            FittedModel::Forest(model) => model.predict(x),
        }
    }
}

/// Preprocessing, feature selection, split, training, and evaluation in
/// one object.
///
/// A pipeline is a one-way state machine: untrained until `fit`
/// succeeds, then trained until `reset`. `predict`, `predict_proba`, and
/// `report` fail with `NotTrained` in the untrained state.
///
/// # Examples
///
/// ```
/// use predecir::pipeline::{Pipeline, PipelineConfig};
/// use predecir::primitives::{Matrix, Vector};
///
/// let x = Matrix::from_vec(16, 1, (0..16).map(|i| i as f32).collect()).unwrap();
/// let y = Vector::from_vec((0..16).map(|i| 2.0 * i as f32 + 1.0).collect());
///
/// let mut pipeline = Pipeline::new(PipelineConfig::default());
/// pipeline.fit(&x, &y).unwrap();
///
/// let report = pipeline.report().unwrap();
/// assert!(report.r2.unwrap() > 0.9);
/// ```
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    imputer: Option<SimpleImputer>,
    polynomial: Option<PolynomialFeatures>,
    scaler: Option<StandardScaler>,
    selected_features: Option<Vec<usize>>,
    stats: Option<Vec<FeatureStats>>,
    model: Option<FittedModel>,
    report: Option<EvaluationReport>,
}

impl Pipeline {
    /// Creates an untrained pipeline with the given configuration.
    #[must_use]
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            imputer: None,
            polynomial: None,
            scaler: None,
            selected_features: None,
            stats: None,
            model: None,
            report: None,
        }
    }

    /// Returns the pipeline configuration.
    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Replaces the configuration and returns the pipeline to the
    /// untrained state; the stored transforms and model no longer match
    /// the new settings.
    pub fn set_params(&mut self, config: PipelineConfig) {
        self.config = config;
        self.reset();
    }

    /// True once `fit` has succeeded.
    #[must_use]
    pub fn is_trained(&self) -> bool {
        self.model.is_some()
    }

    /// Per-feature statistics computed at training time (after imputation,
    /// outlier removal, and polynomial expansion; before standardization).
    ///
    /// # Errors
    ///
    /// Returns `NotTrained` before a successful fit.
    pub fn feature_stats(&self) -> Result<&[FeatureStats]> {
        self.stats
            .as_deref()
            .ok_or_else(|| PredecirError::not_trained("Pipeline"))
    }

    /// Feature indices kept by correlation-based selection, ranked by
    /// descending |Pearson r|; `None` when selection was not configured.
    ///
    /// # Errors
    ///
    /// Returns `NotTrained` before a successful fit.
    pub fn selected_features(&self) -> Result<Option<&[usize]>> {
        if self.model.is_none() {
            return Err(PredecirError::not_trained("Pipeline"));
        }
        Ok(self.selected_features.as_deref())
    }

    /// Held-out evaluation report from the last fit.
    ///
    /// # Errors
    ///
    /// Returns `NotTrained` before a successful fit.
    pub fn report(&self) -> Result<&EvaluationReport> {
        self.report
            .as_ref()
            .ok_or_else(|| PredecirError::not_trained("Pipeline"))
    }

    /// Returns the pipeline to the untrained state, dropping all fitted
    /// transforms, the model, and the report. Configuration is kept.
    pub fn reset(&mut self) {
        self.imputer = None;
        self.polynomial = None;
        self.scaler = None;
        self.selected_features = None;
        self.stats = None;
        self.model = None;
        self.report = None;
    }

    /// Runs the full training flow: preprocessing, feature selection,
    /// seeded split, model fit, and held-out evaluation.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for empty data, mismatched lengths, or a
    /// configuration the data cannot satisfy (all rows removed as
    /// outliers, no feature passing the selection threshold), and
    /// propagates errors from the underlying transforms and model.
    pub fn fit(&mut self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<()> {
        if x.n_rows() == 0 {
            return Err(PredecirError::empty_input("Pipeline::fit"));
        }
        if y.len() != x.n_rows() {
            return Err(PredecirError::dimension_mismatch(
                "labels",
                x.n_rows(),
                y.len(),
            ));
        }

        self.reset();

        let mut features = x.clone();
        let mut labels = y.clone();

        if self.config.impute {
            let mut imputer = SimpleImputer::new();
            features = imputer.fit_transform(&features)?;
            self.imputer = Some(imputer);
        }

        if self.config.remove_outliers {
            let (kept, indices) = remove_outliers(&features, self.config.iqr_multiplier)?;
            if kept.n_rows() == 0 {
                return Err(PredecirError::InvalidInput {
                    message: "outlier removal dropped every training row".to_string(),
                });
            }
            labels = select_labels(&labels, &indices);
            features = kept;
        }

        if let Some(degree) = self.config.polynomial_degree {
            let mut polynomial = PolynomialFeatures::new(degree);
            features = polynomial.fit_transform(&features)?;
            self.polynomial = Some(polynomial);
        }

        self.stats = Some(feature_stats(&features)?);

        if self.config.standardize {
            let mut scaler = StandardScaler::new();
            features = scaler.fit_transform(&features)?;
            self.scaler = Some(scaler);
        }

        if let Some(threshold) = self.config.feature_selection_threshold {
            let selected = select_by_correlation(&features, &labels, threshold)?;
            features = features.select_columns(&selected);
            self.selected_features = Some(selected);
        }

        let (x_train, x_test, y_train, y_test) = train_test_split(
            &features,
            &labels,
            self.config.test_size,
            Some(self.config.random_seed),
        )?;

        let model = self.train_model(&x_train, &y_train)?;
        let report = self.evaluate_model(&model, &x_test, &y_test, x_train.n_rows())?;

        self.model = Some(model);
        self.report = Some(report);
        Ok(())
    }

    fn train_model(&self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<FittedModel> {
        match self.config.model {
            ModelKind::Linear => {
                let mut model = LinearRegression::new();
                model.fit(x, y)?;
                Ok(FittedModel::Linear(model))
            }
            ModelKind::Logistic => {
                let mut model = LogisticRegression::new();
                model.fit(x, y)?;
                Ok(FittedModel::Logistic(model))
            }
            ModelKind::RandomForest { n_estimators } => {
                let mut model = RandomForestRegressor::new(n_estimators)
                    .with_random_state(self.config.random_seed);
                model.fit(x, y)?;
                Ok(FittedModel::Forest(model))
            }
        }
    }

    fn evaluate_model(
        &self,
        model: &FittedModel,
        x_test: &Matrix<f32>,
        y_test: &Vector<f32>,
        n_train: usize,
    ) -> Result<EvaluationReport> {
        let predictions = model.predict(x_test)?;
        let mut report = EvaluationReport {
            n_train,
            n_test: x_test.n_rows(),
            mae: None,
            mse: None,
            rmse: None,
            r2: None,
            accuracy: None,
            precision: None,
            recall: None,
            f1: None,
        };

        match model {
            FittedModel::Logistic(_) => {
                let cm = ConfusionMatrix::from_predictions(&predictions, y_test);
                report.accuracy = Some(cm.accuracy());
                report.precision = Some(cm.precision());
                report.recall = Some(cm.recall());
                report.f1 = Some(cm.f1());
            }
            FittedModel::Linear(_) | FittedModel::Forest(_) => {
                report.mae = Some(metrics::mae(&predictions, y_test));
                report.mse = Some(metrics::mse(&predictions, y_test));
                report.rmse = Some(metrics::rmse(&predictions, y_test));
                report.r2 = Some(metrics::r_squared(&predictions, y_test));
            }
        }
        Ok(report)
    }

    /// Replays the training-time transforms on `x`. Outlier removal is
    /// training-only and never drops inference rows.
    fn transform(&self, x: &Matrix<f32>) -> Result<Matrix<f32>> {
        let mut features = x.clone();
        if let Some(imputer) = &self.imputer {
            features = imputer.transform(&features)?;
        }
        if let Some(polynomial) = &self.polynomial {
            features = polynomial.transform(&features)?;
        }
        if let Some(scaler) = &self.scaler {
            features = scaler.transform(&features)?;
        }
        if let Some(selected) = &self.selected_features {
            features = features.select_columns(selected);
        }
        Ok(features)
    }

    /// Predicts targets for raw (untransformed) feature rows.
    ///
    /// # Errors
    ///
    /// Returns `NotTrained` before a successful fit, or a dimension error
    /// if `x` does not have the training feature width.
    pub fn predict(&self, x: &Matrix<f32>) -> Result<Vector<f32>> {
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| PredecirError::not_trained("Pipeline"))?;
        let features = self.transform(x)?;
        model.predict(&features)
    }

    /// Predicts class probabilities for raw feature rows.
    ///
    /// # Errors
    ///
    /// Returns `NotTrained` before a successful fit, and
    /// `UnsupportedOperation` when the configured model has no
    /// probability output (linear regression, random forest).
    pub fn predict_proba(&self, x: &Matrix<f32>) -> Result<Matrix<f32>> {
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| PredecirError::not_trained("Pipeline"))?;
        let features = self.transform(x)?;
        match model {
            FittedModel::Logistic(logistic) => logistic.predict_proba(&features),
            other => Err(PredecirError::UnsupportedOperation {
                operation: "predict_proba".to_string(),
                model: other.name().to_string(),
            }),
        }
    }
}

/// Indices of features whose |Pearson r| with `y` exceeds `threshold`,
/// ranked by descending |r|.
fn select_by_correlation(
    x: &Matrix<f32>,
    y: &Vector<f32>,
    threshold: f32,
) -> Result<Vec<usize>> {
    let mut scored: Vec<(usize, f32)> = (0..x.n_cols())
        .map(|j| (j, pearson(&x.column(j), y).abs()))
        .filter(|&(_, r)| r > threshold)
        .collect();

    if scored.is_empty() {
        return Err(PredecirError::InvalidInput {
            message: format!(
                "no feature has |correlation| above the selection threshold {threshold}"
            ),
        });
    }

    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    Ok(scored.into_iter().map(|(j, _)| j).collect())
}

/// Pearson correlation; 0.0 when either side has zero variance.
fn pearson(a: &Vector<f32>, b: &Vector<f32>) -> f32 {
    let n = a.len();
    if n == 0 || n != b.len() {
        return 0.0;
    }
    let mean_a = a.mean();
    let mean_b = b.mean();

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for i in 0..n {
        let da = a[i] - mean_a;
        let db = b[i] - mean_b;
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }

    let denominator = (var_a * var_b).sqrt();
    if denominator == 0.0 {
        return 0.0;
    }
    cov / denominator
}

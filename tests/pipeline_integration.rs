//! End-to-end scenarios exercising the full pipeline and model stack.

use predecir::error::PredecirError;
use predecir::metrics::curves::roc_curve;
use predecir::model_selection::{compare_models, cross_validate, Metric};
use predecir::pipeline::{ModelKind, Pipeline, PipelineConfig};
use predecir::prelude::*;
use predecir::time_series::{detect_seasonality, TimeSeriesForecaster};

/// Occupancy-style regression data: target grows linearly with lead time.
fn booking_regression_data() -> (Matrix<f32>, Vector<f32>) {
    let n = 24;
    let x = Matrix::from_vec(n, 2, {
        let mut data = Vec::with_capacity(n * 2);
        for i in 0..n {
            data.push(i as f32 * 0.1); // lead time in weeks
            data.push((i % 4) as f32); // party size bucket
        }
        data
    })
    .expect("matrix");
    let y = Vector::from_vec(
        (0..n)
            .map(|i| 3.0 * i as f32 * 0.1 + 0.5 * (i % 4) as f32 + 10.0)
            .collect(),
    );
    (x, y)
}

/// Cancellation-style binary data, separable on the first feature.
fn cancellation_data() -> (Matrix<f32>, Vector<f32>) {
    let n = 24;
    let x = Matrix::from_vec(n, 1, (0..n).map(|i| i as f32 - 11.5).collect())
        .expect("matrix");
    let y = Vector::from_vec(
        (0..n)
            .map(|i| if i < 12 { 0.0 } else { 1.0 })
            .collect::<Vec<f32>>(),
    );
    (x, y)
}

#[test]
fn regression_pipeline_learns_and_serves() {
    let (x, y) = booking_regression_data();
    let mut pipeline = Pipeline::new(PipelineConfig::default());
    pipeline.fit(&x, &y).expect("fit succeeds");

    let report = pipeline.report().expect("trained");
    assert!(report.r2.expect("regression metrics") > 0.9);
    assert!(report.rmse.expect("regression metrics") >= 0.0);

    // Inference takes raw feature rows, transformed with training stats.
    let probe = Matrix::from_vec(1, 2, vec![1.2, 1.0]).expect("matrix");
    let prediction = pipeline.predict(&probe).expect("trained");
    // True value is 3*1.2 + 0.5 + 10 = 14.1.
    assert!((prediction[0] - 14.1).abs() < 2.0, "got {}", prediction[0]);
}

#[test]
fn classification_pipeline_scores_cancellations() {
    let (x, y) = cancellation_data();
    let config = PipelineConfig {
        model: ModelKind::Logistic,
        test_size: 0.25,
        ..PipelineConfig::default()
    };
    let mut pipeline = Pipeline::new(config);
    pipeline.fit(&x, &y).expect("fit succeeds");

    let report = pipeline.report().expect("trained");
    assert!(report.accuracy.expect("classification metrics") > 0.7);

    let probabilities = pipeline.predict_proba(&x).expect("trained");
    assert_eq!(probabilities.shape(), (24, 2));
    for i in 0..24 {
        let sum = probabilities.get(i, 0) + probabilities.get(i, 1);
        assert!((sum - 1.0).abs() < 1e-5);
    }
}

#[test]
fn forest_pipeline_drops_extreme_rows() {
    // 19 well-behaved rows plus one with an absurd lead time.
    let mut features: Vec<f32> = Vec::with_capacity(40);
    let mut targets: Vec<f32> = Vec::with_capacity(20);
    for i in 0..19 {
        features.push(i as f32 * 0.1);
        features.push((i % 4) as f32);
        targets.push(3.0 * i as f32 * 0.1 + 10.0);
    }
    features.push(500.0);
    features.push(0.0);
    targets.push(11.0);

    let x = Matrix::from_vec(20, 2, features).expect("matrix");
    let y = Vector::from_vec(targets);

    let config = PipelineConfig {
        model: ModelKind::RandomForest { n_estimators: 20 },
        remove_outliers: true,
        standardize: false,
        ..PipelineConfig::default()
    };
    let mut pipeline = Pipeline::new(config);
    pipeline.fit(&x, &y).expect("fit succeeds");

    let report = pipeline.report().expect("trained");
    assert!(report.n_train + report.n_test < 20, "outlier row kept");
}

#[test]
fn pipeline_train_and_serve_are_consistent() {
    let (x, y) = booking_regression_data();
    let mut pipeline = Pipeline::new(PipelineConfig::default());
    pipeline.fit(&x, &y).expect("fit succeeds");

    // Predicting row-by-row must equal predicting the whole batch:
    // transforms depend only on stored training statistics.
    let batch = pipeline.predict(&x).expect("trained");
    for i in 0..x.n_rows() {
        let row = x.select_rows(&[i]);
        let single = pipeline.predict(&row).expect("trained");
        assert!((single[0] - batch[i]).abs() < 1e-5);
    }
}

#[test]
fn cross_validation_ranks_models() {
    let (x, y) = booking_regression_data();

    let mut model = LinearRegression::new();
    let cv = cross_validate(&mut model, &x, &y, 4, Metric::R2).expect("cv succeeds");
    assert_eq!(cv.scores.len(), 4);

    let mut models: Vec<(String, Box<dyn Estimator>)> = vec![
        ("linear".to_string(), Box::new(LinearRegression::new())),
        (
            "forest".to_string(),
            Box::new(RandomForestRegressor::new(10).with_random_state(42)),
        ),
    ];
    let ranks = compare_models(&mut models, &x, &y, 4, Metric::Rmse).expect("compare");
    assert_eq!(ranks.len(), 2);
    // Error metric: ranked ascending by mean.
    assert!(ranks[0].mean <= ranks[1].mean);
}

#[test]
fn roc_auc_separates_cancellation_scores() {
    let (x, y) = cancellation_data();
    let mut model = LogisticRegression::new();
    model.fit(&x, &y).expect("fit succeeds");

    let probabilities = model.predict_proba(&x).expect("fitted");
    let scores = Vector::from_vec(
        (0..probabilities.n_rows())
            .map(|i| probabilities.get(i, 1))
            .collect(),
    );
    let roc = roc_curve(&scores, &y).expect("valid inputs");
    assert!(roc.auc > 0.95, "AUC was {}", roc.auc);
}

#[test]
fn kmeans_segments_guest_groups() {
    let data = Matrix::from_vec(
        4,
        2,
        vec![0.0, 0.0, 0.0, 1.0, 10.0, 10.0, 10.0, 11.0],
    )
    .expect("matrix");

    let mut kmeans = KMeans::new(2).with_random_state(42);
    kmeans.fit(&data).expect("fit succeeds");

    let mut sizes = kmeans.cluster_sizes().expect("fitted");
    sizes.sort_unstable();
    assert_eq!(sizes, vec![2, 2]);
    assert!(silhouette_score(&data, kmeans.labels().expect("fitted")) > 0.5);
}

#[test]
fn forecaster_tracks_weekly_demand() {
    // Weekly pattern: weekend spike every 7 days.
    let mut occupancy = Vec::with_capacity(70);
    for _ in 0..10 {
        occupancy.extend_from_slice(&[0.4, 0.4, 0.4, 0.5, 0.7, 1.0, 0.9]);
    }
    let series = Vector::from_vec(occupancy);

    let mut model = TimeSeriesForecaster::new(3)
        .with_seasonal_period(7)
        .with_learning_rate(0.05)
        .with_max_iter(5000);
    model.fit(&series).expect("fit succeeds");

    let forecast = model.forecast(7).expect("fitted");
    assert_eq!(forecast.len(), 7);
    for &f in forecast.as_slice() {
        assert!(f.is_finite());
        assert!((-0.5..2.0).contains(&f), "forecast out of range: {f}");
    }
}

#[test]
fn seasonality_detection_finds_period() {
    let mut series = Vec::with_capacity(80);
    for _ in 0..8 {
        series.push(10.0);
        series.extend(std::iter::repeat(0.0).take(9));
    }
    let detected = detect_seasonality(&Vector::from_vec(series)).expect("valid");
    assert_eq!(detected, Some(10));
}

#[test]
fn untrained_pipeline_rejects_all_queries() {
    let pipeline = Pipeline::new(PipelineConfig::default());
    let x = Matrix::from_vec(1, 1, vec![1.0]).expect("matrix");

    assert!(matches!(
        pipeline.predict(&x).unwrap_err(),
        PredecirError::NotTrained { .. }
    ));
    assert!(matches!(
        pipeline.predict_proba(&x).unwrap_err(),
        PredecirError::NotTrained { .. }
    ));
    assert!(pipeline.report().is_err());
}

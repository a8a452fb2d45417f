//! Time series forecasting and analysis.
//!
//! `TimeSeriesForecaster` is an autoregressive model with optional
//! seasonal lag terms, trained by gradient descent on the one-step
//! prediction error. Free functions provide autocorrelation, naive
//! seasonality detection, and additive decomposition.

use crate::error::{PredecirError, Result};
use crate::primitives::Vector;
use serde::{Deserialize, Serialize};

/// Autoregressive forecaster with optional seasonal terms.
///
/// Uses lags `1..=p`, plus lags at the first two multiples of
/// `seasonal_period` when one is configured. A design matrix of lagged
/// values is built over the training series and the coefficients are fit
/// by batch gradient descent on the one-step-ahead squared error.
/// `forecast` predicts iteratively, feeding each forecast back into the
/// history for the next step.
///
/// # Examples
///
/// ```
/// use predecir::time_series::TimeSeriesForecaster;
/// use predecir::primitives::Vector;
///
/// let series = Vector::from_vec(vec![5.0; 30]);
/// let mut model = TimeSeriesForecaster::new(2);
/// model.fit(&series).unwrap();
///
/// let forecast = model.forecast(3).unwrap();
/// assert_eq!(forecast.len(), 3);
/// assert!((forecast[0] - 5.0).abs() < 0.5);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSeriesForecaster {
    n_lags: usize,
    seasonal_period: Option<usize>,
    learning_rate: f32,
    max_iter: usize,
    tolerance: f32,
    /// Lag offsets used as features, ascending.
    lags: Vec<usize>,
    weights: Option<Vector<f32>>,
    bias: f32,
    /// Training series tail kept for iterative forecasting.
    history: Vec<f32>,
    n_iter: usize,
}

impl TimeSeriesForecaster {
    /// Creates an AR(p) forecaster with learning rate 0.001, 1000
    /// iterations, and tolerance 1e-6.
    #[must_use]
    pub fn new(n_lags: usize) -> Self {
        Self {
            n_lags,
            seasonal_period: None,
            learning_rate: 0.001,
            max_iter: 1000,
            tolerance: 1e-6,
            lags: Vec::new(),
            weights: None,
            bias: 0.0,
            history: Vec::new(),
            n_iter: 0,
        }
    }

    /// Adds seasonal lag terms at the first two multiples of `period`.
    #[must_use]
    pub fn with_seasonal_period(mut self, period: usize) -> Self {
        self.seasonal_period = Some(period);
        self
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

    /// Returns the fitted lag coefficients, ordered as [`Self::lags`].
    ///
    /// # Errors
    ///
    /// Returns `NotTrained` if the model has not been fitted.
    pub fn weights(&self) -> Result<&Vector<f32>> {
        self.weights
            .as_ref()
            .ok_or_else(|| PredecirError::not_trained("TimeSeriesForecaster"))
    }

    /// Lag offsets used as features (ascending); empty before fit.
    #[must_use]
    pub fn lags(&self) -> &[usize] {
        &self.lags
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

    fn build_lags(&self) -> Vec<usize> {
        let mut lags: Vec<usize> = (1..=self.n_lags).collect();
        if let Some(period) = self.seasonal_period {
            for multiple in [period, 2 * period] {
                if multiple > 0 && !lags.contains(&multiple) {
                    lags.push(multiple);
                }
            }
        }
        lags.sort_unstable();
        lags
    }

    /// Fits the AR coefficients to the series.
    ///
    /// # Errors
    ///
    /// Returns an error if `n_lags` is 0, the seasonal period is too large
    /// for the series, or the series is too short to build any training
    /// window.
    pub fn fit(&mut self, series: &Vector<f32>) -> Result<()> {
        if self.n_lags == 0 {
            return Err(PredecirError::InvalidHyperparameter {
                param: "n_lags".to_string(),
                value: "0".to_string(),
                constraint: ">= 1".to_string(),
            });
        }
        if !(self.learning_rate > 0.0) {
            return Err(PredecirError::InvalidHyperparameter {
                param: "learning_rate".to_string(),
                value: self.learning_rate.to_string(),
                constraint: "> 0".to_string(),
            });
        }

        let lags = self.build_lags();
        let max_lag = *lags.last().unwrap_or(&0);
        let n = series.len();
        if n < max_lag + 2 {
            return Err(PredecirError::InvalidInput {
                message: format!(
                    "series of length {n} is too short for maximum lag {max_lag}"
                ),
            });
        }

        // Windowed design matrix: one row per predictable time step.
        let data = series.as_slice();
        let n_rows = n - max_lag;
        let n_features = lags.len();

        let mut weights = vec![0.0_f32; n_features];
        let mut bias = 0.0_f32;
        let mut iterations = 0;

        for _ in 0..self.max_iter {
            iterations += 1;

            let mut grad_w = vec![0.0_f32; n_features];
            let mut grad_b = 0.0_f32;
            for t in max_lag..n {
                let mut prediction = bias;
                for (j, &lag) in lags.iter().enumerate() {
                    prediction += weights[j] * data[t - lag];
                }
                let error = prediction - data[t];
                for (j, &lag) in lags.iter().enumerate() {
                    grad_w[j] += error * data[t - lag];
                }
                grad_b += error;
            }
            for g in &mut grad_w {
                *g *= 2.0 / n_rows as f32;
            }
            grad_b *= 2.0 / n_rows as f32;

            let max_grad = grad_w
                .iter()
                .map(|g| g.abs())
                .fold(grad_b.abs(), f32::max);

            for (w, g) in weights.iter_mut().zip(grad_w.iter()) {
                *w -= self.learning_rate * g;
            }
            bias -= self.learning_rate * grad_b;

            if max_grad < self.tolerance {
                break;
            }
        }

        self.lags = lags;
        self.weights = Some(Vector::from_vec(weights));
        self.bias = bias;
        self.history = data.to_vec();
        self.n_iter = iterations;
        Ok(())
    }

    /// Forecasts `horizon` future values by iterative one-step prediction.
    ///
    /// Each forecast is appended to the working history so later steps can
    /// use it as lagged input.
    ///
    /// # Errors
    ///
    /// Returns `NotTrained` if called before `fit`, or `InvalidInput` for
    /// a zero horizon.
    pub fn forecast(&self, horizon: usize) -> Result<Vector<f32>> {
        let weights = self
            .weights
            .as_ref()
            .ok_or_else(|| PredecirError::not_trained("TimeSeriesForecaster"))?;
        if horizon == 0 {
            return Err(PredecirError::InvalidInput {
                message: "forecast horizon must be at least 1".to_string(),
            });
        }

        let mut extended = self.history.clone();
        let mut forecasts = Vec::with_capacity(horizon);
        for _ in 0..horizon {
            let mut prediction = self.bias;
            for (j, &lag) in self.lags.iter().enumerate() {
                prediction += weights[j] * extended[extended.len() - lag];
            }
            forecasts.push(prediction);
            extended.push(prediction);
        }
        Ok(Vector::from_vec(forecasts))
    }
}

/// Autocorrelation function up to `max_lag` (inclusive).
///
/// Returns `max_lag + 1` values; index 0 is always 1.0. A zero-variance
/// series yields 1.0 at lag 0 and 0.0 elsewhere.
///
/// # Errors
///
/// Returns `InvalidInput` if the series is empty or shorter than
/// `max_lag + 1`.
pub fn acf(series: &Vector<f32>, max_lag: usize) -> Result<Vec<f32>> {
    let n = series.len();
    if n == 0 {
        return Err(PredecirError::empty_input("acf"));
    }
    if n <= max_lag {
        return Err(PredecirError::InvalidInput {
            message: format!("series of length {n} cannot support lag {max_lag}"),
        });
    }

    let data = series.as_slice();
    let mean = series.mean();
    let denominator: f32 = data.iter().map(|x| (x - mean).powi(2)).sum();

    let mut result = Vec::with_capacity(max_lag + 1);
    result.push(1.0);
    for lag in 1..=max_lag {
        if denominator == 0.0 {
            result.push(0.0);
            continue;
        }
        let numerator: f32 = (lag..n)
            .map(|t| (data[t] - mean) * (data[t - lag] - mean))
            .sum();
        result.push(numerator / denominator);
    }
    Ok(result)
}

/// Naive seasonality detection: the first lag greater than 7 whose
/// autocorrelation exceeds 0.5, scanning up to half the series length.
///
/// # Errors
///
/// Returns `InvalidInput` if the series is empty.
pub fn detect_seasonality(series: &Vector<f32>) -> Result<Option<usize>> {
    if series.is_empty() {
        return Err(PredecirError::empty_input("detect_seasonality"));
    }
    let max_lag = series.len() / 2;
    if max_lag <= 7 {
        return Ok(None);
    }

    let correlations = acf(series, max_lag)?;
    Ok(correlations
        .iter()
        .enumerate()
        .skip(8)
        .find(|(_, &r)| r > 0.5)
        .map(|(lag, _)| lag))
}

/// Additive decomposition of a series into trend, seasonal, and residual.
///
/// Edge positions where the centered moving average is undefined hold
/// `f32::NAN` in `trend` and `residual`.
#[derive(Debug, Clone, PartialEq)]
pub struct Decomposition {
    /// Centered moving-average trend; NaN at the edges.
    pub trend: Vec<f32>,
    /// Per-phase seasonal component, repeating with the given period.
    pub seasonal: Vec<f32>,
    /// `series - trend - seasonal`; NaN where trend is NaN.
    pub residual: Vec<f32>,
}

/// Decomposes a series additively with the given seasonal period.
///
/// Trend is a centered moving average of window `period` (half-window on
/// each side); the seasonal component is the mean detrended value per
/// phase, and the residual is what remains.
///
/// # Errors
///
/// Returns `InvalidInput` if `period < 2` or the series is shorter than
/// `period + 1`.
pub fn decompose(series: &Vector<f32>, period: usize) -> Result<Decomposition> {
    let n = series.len();
    if period < 2 {
        return Err(PredecirError::InvalidHyperparameter {
            param: "period".to_string(),
            value: period.to_string(),
            constraint: ">= 2".to_string(),
        });
    }
    if n <= period {
        return Err(PredecirError::InvalidInput {
            message: format!("series of length {n} is too short for period {period}"),
        });
    }

    let data = series.as_slice();
    let half = period / 2;

    let mut trend = vec![f32::NAN; n];
    for i in half..n - half {
        let window = &data[i - half..=i + half];
        trend[i] = window.iter().sum::<f32>() / window.len() as f32;
    }

    // Mean detrended value per phase.
    let mut phase_sums = vec![0.0_f32; period];
    let mut phase_counts = vec![0usize; period];
    for i in half..n - half {
        let phase = i % period;
        phase_sums[phase] += data[i] - trend[i];
        phase_counts[phase] += 1;
    }
    let phase_means: Vec<f32> = phase_sums
        .iter()
        .zip(phase_counts.iter())
        .map(|(&sum, &count)| if count > 0 { sum / count as f32 } else { 0.0 })
        .collect();

    let seasonal: Vec<f32> = (0..n).map(|i| phase_means[i % period]).collect();
    let residual: Vec<f32> = (0..n)
        .map(|i| data[i] - trend[i] - seasonal[i])
        .collect();

    Ok(Decomposition {
        trend,
        seasonal,
        residual,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant_series(value: f32, len: usize) -> Vector<f32> {
        Vector::from_vec(vec![value; len])
    }

    /// Impulse train: a spike every `period` steps.
    fn spiky_series(period: usize, cycles: usize) -> Vector<f32> {
        let mut data = Vec::with_capacity(period * cycles);
        for _ in 0..cycles {
            data.push(10.0);
            data.extend(std::iter::repeat(0.0).take(period - 1));
        }
        Vector::from_vec(data)
    }

    #[test]
    fn test_fit_and_forecast_constant_series() {
        let series = constant_series(5.0, 30);
        let mut model = TimeSeriesForecaster::new(2).with_learning_rate(0.01);
        model.fit(&series).expect("fit succeeds");

        let forecast = model.forecast(5).expect("fitted");
        assert_eq!(forecast.len(), 5);
        for &f in forecast.as_slice() {
            assert!((f - 5.0).abs() < 0.5, "forecast was {f}");
        }
    }

    #[test]
    fn test_fit_alternating_series() {
        // y_t = 1 - y_{t-1}
        let data: Vec<f32> = (0..40).map(|i| (i % 2) as f32).collect();
        let series = Vector::from_vec(data);
        let mut model = TimeSeriesForecaster::new(1)
            .with_learning_rate(0.1)
            .with_max_iter(5000);
        model.fit(&series).expect("fit succeeds");

        let weights = model.weights().expect("fitted");
        assert!((weights[0] + 1.0).abs() < 0.1, "weight was {}", weights[0]);
    }

    #[test]
    fn test_seasonal_lags_included() {
        let series = constant_series(1.0, 40);
        let mut model = TimeSeriesForecaster::new(2).with_seasonal_period(7);
        model.fit(&series).expect("fit succeeds");
        assert_eq!(model.lags(), &[1, 2, 7, 14]);
    }

    #[test]
    fn test_forecast_before_fit_errors() {
        let model = TimeSeriesForecaster::new(2);
        assert!(matches!(
            model.forecast(3).unwrap_err(),
            PredecirError::NotTrained { .. }
        ));
    }

    #[test]
    fn test_series_too_short_errors() {
        let series = constant_series(1.0, 5);
        let mut model = TimeSeriesForecaster::new(2).with_seasonal_period(10);
        assert!(model.fit(&series).is_err());
    }

    #[test]
    fn test_zero_horizon_errors() {
        let series = constant_series(1.0, 20);
        let mut model = TimeSeriesForecaster::new(1);
        model.fit(&series).expect("fit succeeds");
        assert!(model.forecast(0).is_err());
    }

    #[test]
    fn test_acf_lag_zero_is_one() {
        let series = Vector::from_slice(&[1.0, 3.0, 2.0, 4.0, 3.0, 5.0]);
        let correlations = acf(&series, 2).expect("valid");
        assert!((correlations[0] - 1.0).abs() < 1e-6);
        assert_eq!(correlations.len(), 3);
    }

    #[test]
    fn test_acf_constant_series_zero_beyond_lag_zero() {
        let series = constant_series(4.0, 10);
        let correlations = acf(&series, 3).expect("valid");
        assert_eq!(&correlations[1..], &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_acf_periodic_peak() {
        let series = spiky_series(10, 6);
        let correlations = acf(&series, 12).expect("valid");
        assert!(correlations[10] > 0.5);
        assert!(correlations[10] > correlations[9]);
    }

    #[test]
    fn test_detect_seasonality_period_ten() {
        let series = spiky_series(10, 8);
        let detected = detect_seasonality(&series).expect("valid");
        assert_eq!(detected, Some(10));
    }

    #[test]
    fn test_detect_seasonality_none_for_pure_trend() {
        let data: Vec<f32> = (0..40).map(|i| i as f32).collect();
        let series = Vector::from_vec(data);
        // ACF of a linear trend decays below 0.5 before lag 8.
        let detected = detect_seasonality(&series).expect("valid");
        assert_eq!(detected, None);
    }

    #[test]
    fn test_detect_seasonality_short_series_is_none() {
        let series = constant_series(1.0, 10);
        assert_eq!(detect_seasonality(&series).expect("valid"), None);
    }

    #[test]
    fn test_decompose_recovers_seasonal_period() {
        // Linear trend plus a period-4 pattern.
        let pattern = [3.0, -1.0, -1.0, -1.0];
        let data: Vec<f32> = (0..32)
            .map(|i| 0.5 * i as f32 + pattern[i % 4])
            .collect();
        let series = Vector::from_vec(data);

        let parts = decompose(&series, 4).expect("valid");
        assert_eq!(parts.seasonal.len(), 32);
        // Seasonal component repeats with the period.
        for i in 0..28 {
            assert!((parts.seasonal[i] - parts.seasonal[i + 4]).abs() < 1e-5);
        }
        // Interior trend should be finite and increasing.
        assert!(parts.trend[10].is_finite());
        assert!(parts.trend[20] > parts.trend[10]);
    }

    #[test]
    fn test_decompose_edges_are_nan() {
        let series = Vector::from_vec((0..20).map(|i| i as f32).collect::<Vec<f32>>());
        let parts = decompose(&series, 4).expect("valid");
        assert!(parts.trend[0].is_nan());
        assert!(parts.residual[0].is_nan());
        assert!(parts.trend[19].is_nan());
    }

    #[test]
    fn test_decompose_invalid_period_errors() {
        let series = constant_series(1.0, 10);
        assert!(decompose(&series, 1).is_err());
        assert!(decompose(&series, 20).is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let series = constant_series(5.0, 30);
        let mut model = TimeSeriesForecaster::new(2).with_learning_rate(0.01);
        model.fit(&series).expect("fit succeeds");

        let json = model.to_json().expect("serialize");
        let restored = TimeSeriesForecaster::from_json(&json).expect("deserialize");
        assert_eq!(
            model.forecast(3).expect("fitted"),
            restored.forecast(3).expect("restored fitted")
        );
    }
}

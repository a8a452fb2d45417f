//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use predecir::prelude::*;
//! ```

pub use crate::classification::LogisticRegression;
pub use crate::cluster::{Init, KMeans};
pub use crate::error::{PredecirError, Result};
pub use crate::linear_model::LinearRegression;
pub use crate::metrics::{inertia, mae, mse, r_squared, rmse, silhouette_score};
pub use crate::model_selection::{cross_validate, train_test_split, KFold, Metric};
pub use crate::pipeline::{ModelKind, Pipeline, PipelineConfig};
pub use crate::preprocessing::{
    LabelEncoder, MinMaxScaler, OneHotEncoder, PolynomialFeatures, SimpleImputer,
    StandardScaler,
};
pub use crate::primitives::{Matrix, Vector};
pub use crate::time_series::TimeSeriesForecaster;
pub use crate::traits::{Estimator, ProbabilisticEstimator, Transformer, UnsupervisedEstimator};
pub use crate::tree::{DecisionTreeRegressor, MaxFeatures, RandomForestRegressor};

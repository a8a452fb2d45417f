//! Predecir: machine learning for hospitality demand prediction in pure Rust.
//!
//! Predecir provides the preprocessing, modeling, evaluation, and pipeline
//! building blocks behind room-demand and booking recommendation scoring:
//! regression and classification models, k-means clustering, random forests,
//! time series forecasting, and an end-to-end training pipeline that replays
//! its training-time transforms at inference.
//!
//! # Quick Start
//!
//! ```
//! use predecir::prelude::*;
//!
//! // Training data (y = 2*x + 1)
//! let x = Matrix::from_vec(4, 1, vec![
//!     1.0,
//!     2.0,
//!     3.0,
//!     4.0,
//! ]).unwrap();
//! let y = Vector::from_slice(&[3.0, 5.0, 7.0, 9.0]);
//!
//! let mut model = LinearRegression::new();
//! model.fit(&x, &y).unwrap();
//!
//! let r2 = model.score(&x, &y).unwrap();
//! assert!(r2 > 0.99);
//! ```
//!
//! # Modules
//!
//! - [`primitives`]: Core Vector and Matrix types
//! - [`preprocessing`]: Scalers, imputation, polynomial features, outlier removal
//! - [`linear_model`]: Gradient-descent linear regression
//! - [`classification`]: Logistic regression
//! - [`cluster`]: K-Means clustering
//! - [`tree`]: Decision tree and random forest regressors
//! - [`time_series`]: Autoregressive forecasting, ACF, decomposition
//! - [`metrics`]: Regression, classification, clustering metrics and curves
//! - [`model_selection`]: Splitting, cross-validation, learning curves
//! - [`pipeline`]: End-to-end train/evaluate/predict orchestration

pub mod classification;
pub mod cluster;
pub mod error;
pub mod linear_model;
pub mod metrics;
pub mod model_selection;
pub mod pipeline;
pub mod prelude;
pub mod preprocessing;
pub mod primitives;
pub mod time_series;
pub mod traits;
pub mod tree;

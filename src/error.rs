//! Error types for predecir operations.
//!
//! Provides rich error context for library consumers.

use std::fmt;

/// Main error type for predecir operations.
///
/// Covers invalid inputs, dimension mismatches, untrained-model misuse,
/// convergence issues, and invalid hyperparameters.
///
/// # Examples
///
/// ```
/// use predecir::error::PredecirError;
///
/// let err = PredecirError::DimensionMismatch {
///     expected: "100x10".to_string(),
///     actual: "100x5".to_string(),
/// };
/// assert!(err.to_string().contains("dimension mismatch"));
/// ```
#[derive(Debug)]
pub enum PredecirError {
    /// Input data is empty, malformed, or out of the documented domain.
    InvalidInput {
        /// What was wrong with the input
        message: String,
    },

    /// A predict/evaluate/score call arrived before a successful fit.
    NotTrained {
        /// Which component was used before fitting
        what: String,
    },

    /// The requested operation is not implemented by this model.
    UnsupportedOperation {
        /// Operation name (e.g., "predict_proba")
        operation: String,
        /// Model that rejected it
        model: String,
    },

    /// Matrix/vector dimensions don't match for the operation.
    DimensionMismatch {
        /// Expected dimensions description
        expected: String,
        /// Actual dimensions found
        actual: String,
    },

    /// Invalid hyperparameter value provided.
    InvalidHyperparameter {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// Optimization failed to converge within the iteration limit.
    ConvergenceFailure {
        /// Number of iterations attempted
        iterations: usize,
        /// Final loss value
        final_loss: f32,
    },

    /// Serialization/deserialization error.
    Serialization(String),

    /// I/O error.
    Io(std::io::Error),

    /// Generic error with string message.
    Other(String),
}

impl fmt::Display for PredecirError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredecirError::InvalidInput { message } => {
                write!(f, "Invalid input: {message}")
            }
            PredecirError::NotTrained { what } => {
                write!(f, "{what} is not fitted. Call fit() first")
            }
            PredecirError::UnsupportedOperation { operation, model } => {
                write!(f, "Operation {operation} is not supported by {model}")
            }
            PredecirError::DimensionMismatch { expected, actual } => {
                write!(f, "dimension mismatch: expected {expected}, got {actual}")
            }
            PredecirError::InvalidHyperparameter {
                param,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "Invalid hyperparameter: {param} = {value}, expected {constraint}"
                )
            }
            PredecirError::ConvergenceFailure {
                iterations,
                final_loss,
            } => {
                write!(
                    f,
                    "Convergence failure after {iterations} iterations, loss = {final_loss}"
                )
            }
            PredecirError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            PredecirError::Io(e) => write!(f, "I/O error: {e}"),
            PredecirError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PredecirError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PredecirError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PredecirError {
    fn from(err: std::io::Error) -> Self {
        PredecirError::Io(err)
    }
}

impl From<serde_json::Error> for PredecirError {
    fn from(err: serde_json::Error) -> Self {
        PredecirError::Serialization(err.to_string())
    }
}

impl From<&str> for PredecirError {
    fn from(msg: &str) -> Self {
        PredecirError::Other(msg.to_string())
    }
}

impl From<String> for PredecirError {
    fn from(msg: String) -> Self {
        PredecirError::Other(msg)
    }
}

impl PredecirError {
    /// Create an empty-input error.
    #[must_use]
    pub fn empty_input(context: &str) -> Self {
        Self::InvalidInput {
            message: format!("empty input: {context}"),
        }
    }

    /// Create a not-trained error for the named component.
    #[must_use]
    pub fn not_trained(what: &str) -> Self {
        Self::NotTrained {
            what: what.to_string(),
        }
    }

    /// Create a dimension mismatch error with descriptive context.
    #[must_use]
    pub fn dimension_mismatch(context: &str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            expected: format!("{context}={expected}"),
            actual: format!("{actual}"),
        }
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, PredecirError>;

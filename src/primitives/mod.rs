//! Core numeric primitives (Vector, Matrix).
//!
//! These types are the foundation for all algorithms in the crate.

mod matrix;
mod vector;

pub use matrix::Matrix;
pub use vector::Vector;

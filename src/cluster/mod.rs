//! Clustering algorithms.
//!
//! Includes K-Means clustering with k-means++ initialization.

use crate::error::{PredecirError, Result};
use crate::metrics::inertia;
use crate::primitives::Matrix;
use crate::traits::UnsupervisedEstimator;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Centroid initialization strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Init {
    /// k-means++ seeding: subsequent centroids chosen with probability
    /// proportional to squared distance from the nearest existing centroid.
    KMeansPlusPlus,
    /// Uniformly random distinct samples.
    Random,
}

/// K-Means clustering via Lloyd's algorithm.
///
/// Iterates assignment and centroid-update steps until every centroid
/// moves less than `tol` (Euclidean) or `max_iter` is reached. A cluster
/// that loses all its members keeps its previous centroid rather than
/// collapsing.
///
/// # Examples
///
/// ```
/// use predecir::prelude::*;
///
/// let data = Matrix::from_vec(4, 2, vec![
///     0.0, 0.0,
///     0.0, 1.0,
///     10.0, 10.0,
///     10.0, 11.0,
/// ]).unwrap();
///
/// let mut kmeans = KMeans::new(2).with_random_state(42);
/// kmeans.fit(&data).unwrap();
///
/// let mut sizes = kmeans.cluster_sizes().unwrap();
/// sizes.sort_unstable();
/// assert_eq!(sizes, vec![2, 2]);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KMeans {
    n_clusters: usize,
    max_iter: usize,
    tol: f32,
    init: Init,
    random_state: Option<u64>,
    centroids: Option<Matrix<f32>>,
    labels: Option<Vec<usize>>,
    inertia: f32,
    n_iter: usize,
}

impl KMeans {
    /// Creates a new K-Means with the specified number of clusters,
    /// k-means++ initialization, 300 max iterations, and tolerance 1e-4.
    #[must_use]
    pub fn new(n_clusters: usize) -> Self {
        Self {
            n_clusters,
            max_iter: 300,
            tol: 1e-4,
            init: Init::KMeansPlusPlus,
            random_state: None,
            centroids: None,
            labels: None,
            inertia: 0.0,
            n_iter: 0,
        }
    }

    /// Sets the maximum number of iterations.
    #[must_use]
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Sets the convergence tolerance (maximum centroid movement).
    #[must_use]
    pub fn with_tol(mut self, tol: f32) -> Self {
        self.tol = tol;
        self
    }

    /// Sets the centroid initialization strategy.
    #[must_use]
    pub fn with_init(mut self, init: Init) -> Self {
        self.init = init;
        self
    }

    /// Sets the random seed for reproducible initialization.
    #[must_use]
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    /// Returns the fitted cluster centroids, one row per cluster.
    ///
    /// # Errors
    ///
    /// Returns `NotTrained` if the model has not been fitted.
    pub fn centroids(&self) -> Result<&Matrix<f32>> {
        self.centroids
            .as_ref()
            .ok_or_else(|| PredecirError::not_trained("KMeans"))
    }

    /// Returns the training-data labels from the last fit.
    ///
    /// # Errors
    ///
    /// Returns `NotTrained` if the model has not been fitted.
    pub fn labels(&self) -> Result<&[usize]> {
        self.labels
            .as_deref()
            .ok_or_else(|| PredecirError::not_trained("KMeans"))
    }

    /// Number of training samples assigned to each cluster; sums to n.
    ///
    /// # Errors
    ///
    /// Returns `NotTrained` if the model has not been fitted.
    pub fn cluster_sizes(&self) -> Result<Vec<usize>> {
        let labels = self.labels()?;
        let mut sizes = vec![0; self.n_clusters];
        for &label in labels {
            sizes[label] += 1;
        }
        Ok(sizes)
    }

    /// Returns the inertia (within-cluster sum of squares) of the last fit.
    #[must_use]
    pub fn inertia(&self) -> f32 {
        self.inertia
    }

    /// Returns the number of iterations the last fit ran.
    #[must_use]
    pub fn n_iter(&self) -> usize {
        self.n_iter
    }

    /// Returns true if the model has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.centroids.is_some()
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

    fn rng(&self) -> StdRng {
        match self.random_state {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Picks distinct random samples as initial centroids.
    fn random_init(&self, x: &Matrix<f32>, rng: &mut StdRng) -> Matrix<f32> {
        let n_samples = x.n_rows();
        let mut chosen: Vec<usize> = Vec::with_capacity(self.n_clusters);
        while chosen.len() < self.n_clusters {
            let idx = rng.gen_range(0..n_samples);
            if !chosen.contains(&idx) {
                chosen.push(idx);
            }
        }
        x.select_rows(&chosen)
    }

    /// k-means++ seeding: each new centroid is drawn with probability
    /// proportional to squared distance from the nearest chosen centroid.
    fn kmeans_plusplus_init(&self, x: &Matrix<f32>, rng: &mut StdRng) -> Matrix<f32> {
        let n_samples = x.n_rows();
        let mut chosen: Vec<usize> = Vec::with_capacity(self.n_clusters);
        chosen.push(rng.gen_range(0..n_samples));

        while chosen.len() < self.n_clusters {
            let distances: Vec<f32> = (0..n_samples)
                .map(|i| {
                    let point = x.row(i);
                    chosen
                        .iter()
                        .map(|&c| {
                            let centroid = x.row(c);
                            (&point - &centroid).norm_squared()
                        })
                        .fold(f32::INFINITY, f32::min)
                })
                .collect();

            let total: f32 = distances.iter().sum();
            if total <= 0.0 {
                // All remaining points coincide with chosen centroids.
                let next = (0..n_samples)
                    .find(|i| !chosen.contains(i))
                    .unwrap_or(chosen[0]);
                chosen.push(next);
                continue;
            }

            let mut target = rng.gen::<f32>() * total;
            let mut pick = n_samples - 1;
            for (i, &d) in distances.iter().enumerate() {
                target -= d;
                if target <= 0.0 {
                    pick = i;
                    break;
                }
            }
            chosen.push(pick);
        }

        x.select_rows(&chosen)
    }

    /// Assigns each sample to the nearest centroid.
    fn assign_labels(&self, x: &Matrix<f32>, centroids: &Matrix<f32>) -> Vec<usize> {
        let n_samples = x.n_rows();
        let mut labels = vec![0; n_samples];

        for (i, label) in labels.iter_mut().enumerate() {
            let point = x.row(i);
            let mut min_dist = f32::INFINITY;
            let mut min_cluster = 0;

            for k in 0..self.n_clusters {
                let centroid = centroids.row(k);
                let dist = (&point - &centroid).norm_squared();
                if dist < min_dist {
                    min_dist = dist;
                    min_cluster = k;
                }
            }

            *label = min_cluster;
        }

        labels
    }

    /// Moves each centroid to the mean of its members; an empty cluster
    /// keeps its previous centroid.
    fn update_centroids(
        &self,
        x: &Matrix<f32>,
        labels: &[usize],
        previous: &Matrix<f32>,
    ) -> Matrix<f32> {
        let (_, n_features) = x.shape();
        let mut sums = vec![0.0; self.n_clusters * n_features];
        let mut counts = vec![0usize; self.n_clusters];

        for (i, &label) in labels.iter().enumerate() {
            counts[label] += 1;
            for j in 0..n_features {
                sums[label * n_features + j] += x.get(i, j);
            }
        }

        let mut data = Vec::with_capacity(self.n_clusters * n_features);
        for k in 0..self.n_clusters {
            for j in 0..n_features {
                if counts[k] > 0 {
                    data.push(sums[k * n_features + j] / counts[k] as f32);
                } else {
                    data.push(previous.get(k, j));
                }
            }
        }

        Matrix::from_vec(self.n_clusters, n_features, data)
            .unwrap_or_else(|_| previous.clone())
    }

    /// True when every centroid moved less than `tol` (Euclidean).
    fn converged(&self, old: &Matrix<f32>, new: &Matrix<f32>) -> bool {
        for k in 0..self.n_clusters {
            let shift = (&old.row(k) - &new.row(k)).norm();
            if shift >= self.tol {
                return false;
            }
        }
        true
    }
}

impl UnsupervisedEstimator for KMeans {
    type Labels = Vec<usize>;

    fn fit(&mut self, x: &Matrix<f32>) -> Result<()> {
        let n_samples = x.n_rows();
        if n_samples == 0 {
            return Err(PredecirError::empty_input("KMeans::fit"));
        }
        if self.n_clusters == 0 {
            return Err(PredecirError::InvalidHyperparameter {
                param: "n_clusters".to_string(),
                value: "0".to_string(),
                constraint: ">= 1".to_string(),
            });
        }
        if n_samples < self.n_clusters {
            return Err(PredecirError::InvalidInput {
                message: format!(
                    "need at least {} samples for {} clusters, got {n_samples}",
                    self.n_clusters, self.n_clusters
                ),
            });
        }

        let mut rng = self.rng();
        let mut centroids = match self.init {
            Init::KMeansPlusPlus => self.kmeans_plusplus_init(x, &mut rng),
            Init::Random => self.random_init(x, &mut rng),
        };

        let mut labels = vec![0; n_samples];
        self.n_iter = 0;

        for iter in 0..self.max_iter {
            labels = self.assign_labels(x, &centroids);
            let new_centroids = self.update_centroids(x, &labels, &centroids);
            let done = self.converged(&centroids, &new_centroids);
            centroids = new_centroids;
            self.n_iter = iter + 1;
            if done {
                break;
            }
        }

        self.inertia = inertia(x, &centroids, &labels);
        self.labels = Some(labels);
        self.centroids = Some(centroids);
        Ok(())
    }

    fn predict(&self, x: &Matrix<f32>) -> Result<Vec<usize>> {
        let centroids = self
            .centroids
            .as_ref()
            .ok_or_else(|| PredecirError::not_trained("KMeans"))?;
        if x.n_cols() != centroids.n_cols() {
            return Err(PredecirError::dimension_mismatch(
                "features",
                centroids.n_cols(),
                x.n_cols(),
            ));
        }
        Ok(self.assign_labels(x, centroids))
    }
}

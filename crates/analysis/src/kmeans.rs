//! Seeded Lloyd's k-means.
//!
//! A single run from one seed: initial centroids are `k` distinct rows drawn
//! with a `ChaCha8Rng`, so the same input and seed always give the same
//! labels. There are no restarts, which means a poor seed can leave the
//! solution in a local optimum.

use rand::seq::index;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use trader_sentiment_core::{AnalysisError, AnalysisResult, ClusteringConfig};

/// Lloyd's algorithm configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct KMeans {
    k: usize,
    max_iterations: usize,
    seed: u64,
    rtol: f64,
    atol: f64,
}

/// Result of one k-means run.
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansFit {
    /// Cluster of each input row.
    pub labels: Vec<usize>,
    /// Centroids the labels were assigned against.
    pub centroids: Vec<Vec<f64>>,
    pub iterations: usize,
    /// False when the iteration cap was hit first.
    pub converged: bool,
    /// Sum of squared distances from rows to their centroid.
    pub inertia: f64,
}

impl KMeans {
    /// Creates a configuration with 100 iterations and `allclose` default tolerances.
    #[must_use]
    pub fn new(k: usize, seed: u64) -> Self {
        Self {
            k,
            max_iterations: 100,
            seed,
            rtol: 1e-5,
            atol: 1e-8,
        }
    }

    #[must_use]
    pub fn from_config(config: &ClusteringConfig) -> Self {
        Self {
            k: config.k,
            max_iterations: config.max_iterations,
            seed: config.seed,
            rtol: config.rtol,
            atol: config.atol,
        }
    }

    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Partitions `rows` into `k` clusters.
    ///
    /// # Errors
    /// - `InvalidConfig` if `k` is zero or rows have differing lengths
    /// - `InsufficientAccounts` if there are fewer rows than clusters
    pub fn fit(&self, rows: &[Vec<f64>]) -> AnalysisResult<KMeansFit> {
        if self.k == 0 {
            return Err(AnalysisError::InvalidConfig("k must be at least 1".to_string()));
        }
        if rows.len() < self.k {
            return Err(AnalysisError::InsufficientAccounts {
                required: self.k,
                available: rows.len(),
            });
        }
        let dims = rows[0].len();
        if rows.iter().any(|r| r.len() != dims) {
            return Err(AnalysisError::InvalidConfig(
                "feature rows must all have the same length".to_string(),
            ));
        }

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut centroids: Vec<Vec<f64>> = index::sample(&mut rng, rows.len(), self.k)
            .into_iter()
            .map(|i| rows[i].clone())
            .collect();

        let mut labels = vec![0; rows.len()];
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.max_iterations {
            iterations += 1;
            labels = assign(rows, &centroids);
            let updated = self.recompute(rows, &labels, &mut rng);

            if self.allclose(&centroids, &updated) {
                converged = true;
                break;
            }
            centroids = updated;
        }

        if !converged {
            tracing::warn!(
                iterations,
                "k-means stopped at the iteration cap before converging"
            );
            labels = assign(rows, &centroids);
        }

        let inertia = rows
            .iter()
            .zip(&labels)
            .map(|(row, &label)| squared_distance(row, &centroids[label]))
            .sum();

        Ok(KMeansFit {
            labels,
            centroids,
            iterations,
            converged,
            inertia,
        })
    }

    /// Mean of each cluster's rows. An empty cluster is reseeded from a random row.
    fn recompute(&self, rows: &[Vec<f64>], labels: &[usize], rng: &mut ChaCha8Rng) -> Vec<Vec<f64>> {
        let dims = rows[0].len();
        let mut sums = vec![vec![0.0; dims]; self.k];
        let mut counts = vec![0usize; self.k];

        for (row, &label) in rows.iter().zip(labels) {
            counts[label] += 1;
            for (sum, value) in sums[label].iter_mut().zip(row) {
                *sum += value;
            }
        }

        sums.into_iter()
            .zip(counts)
            .enumerate()
            .map(|(cluster, (sum, count))| {
                if count == 0 {
                    let row = rng.gen_range(0..rows.len());
                    tracing::debug!(cluster, row, "Reseeding empty cluster");
                    rows[row].clone()
                } else {
                    sum.into_iter().map(|s| s / count as f64).collect()
                }
            })
            .collect()
    }

    /// `|a - b| <= atol + rtol * |b|` for every coordinate.
    fn allclose(&self, old: &[Vec<f64>], new: &[Vec<f64>]) -> bool {
        old.iter().zip(new).all(|(a, b)| {
            a.iter()
                .zip(b)
                .all(|(x, y)| (x - y).abs() <= self.atol + self.rtol * y.abs())
        })
    }
}

/// Index of the nearest centroid for each row; ties go to the lower index.
fn assign(rows: &[Vec<f64>], centroids: &[Vec<f64>]) -> Vec<usize> {
    rows.iter()
        .map(|row| {
            let mut best = 0;
            let mut best_dist = f64::INFINITY;
            for (i, centroid) in centroids.iter().enumerate() {
                let dist = squared_distance(row, centroid);
                if dist < best_dist {
                    best_dist = dist;
                    best = i;
                }
            }
            best
        })
        .collect()
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}

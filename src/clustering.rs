//! Caller-side pieces around the factorization: seeded initialization of
//! `H` and hard cluster labels from the converged factor.
//!
//! **DETERMINISTIC**: initialization draws from `ChaCha8Rng` seeded by the
//! caller, so equal seeds give equal factors.

use log::{debug, trace};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use symnmf_core::{DenseMatrix, MatrixArena, SymNmfError, SymNmfResult, Termination};

/// Seed used when the builder is not given one.
pub const DEFAULT_SEED: u64 = 1234;

/// Output of the full pipeline.
#[derive(Clone, Debug)]
pub struct ClusteredOutput {
    /// Converged (or budget-limited) factor, N×k
    pub h: DenseMatrix,
    /// Argmax cluster per point
    pub labels: Vec<usize>,
    /// Points per cluster, indexed by label
    pub cluster_sizes: Vec<usize>,
    pub iterations: usize,
    pub termination: Termination,
    /// ‖W − H·Hᵗ‖_F of the returned factor
    pub reconstruction_error: f64,
}

/// Initial factor for `w` with entries uniform in `[0, 2·sqrt(mean(W)/k))`.
///
/// The upper bound matches the scale of a factor whose product `H·Hᵗ` has
/// the same average entry as `W`.
pub fn initialize_h(w: &DenseMatrix, k: usize, seed: u64) -> SymNmfResult<DenseMatrix> {
    let (n, cols) = w.shape();
    if n != cols || n == 0 {
        return Err(SymNmfError::invalid_input(format!(
            "W must be a non-empty square matrix, got {:?}",
            w.shape()
        )));
    }
    if k == 0 || k > n {
        return Err(SymNmfError::invalid_input(format!(
            "rank k must satisfy 1 <= k <= {}, got {}",
            n, k
        )));
    }

    let mean = w.iter().sum::<f64>() / (n * n) as f64;
    let upper = 2.0 * (mean / k as f64).sqrt();
    debug!(
        "Initializing {}x{} factor: mean(W)={:.6}, upper bound={:.6}, seed={}",
        n, k, mean, upper, seed
    );

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut h = MatrixArena::allocate(n, k, true)?;
    // `mean` is 0 for a graph without edges, and the range would be empty
    if upper > 0.0 && upper.is_finite() {
        for v in h.as_mut_slice() {
            *v = rng.random_range(0.0..upper);
        }
    }
    trace!("Initial factor: {:?}", h);
    Ok(h)
}

/// Hard assignment: index of the largest entry in each row of `h`.
/// Ties resolve to the lowest column.
pub fn assign_clusters(h: &DenseMatrix) -> Vec<usize> {
    (0..h.nrows())
        .map(|i| {
            h.row(i)
                .iter()
                .enumerate()
                .fold((0, f64::NEG_INFINITY), |(best, best_v), (j, &v)| {
                    if v > best_v {
                        (j, v)
                    } else {
                        (best, best_v)
                    }
                })
                .0
        })
        .collect()
}

/// Number of points carrying each label in `0..k`.
pub fn cluster_sizes(labels: &[usize], k: usize) -> Vec<usize> {
    let mut sizes = vec![0; k];
    for &label in labels {
        if label < k {
            sizes[label] += 1;
        }
    }
    sizes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_clusters_ties_take_lowest() {
        let h = DenseMatrix::from_rows(&[vec![0.2, 0.2], vec![0.1, 0.9], vec![0.0, 0.0]]).unwrap();
        assert_eq!(assign_clusters(&h), vec![0, 1, 0]);
    }

    #[test]
    fn test_cluster_sizes() {
        assert_eq!(cluster_sizes(&[0, 1, 1, 2, 1], 3), vec![1, 3, 1]);
    }
}

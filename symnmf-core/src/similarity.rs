// symnmf-core/src/similarity.rs
//! Pairwise similarity matrix from raw coordinates.
//!
//! Edge weights use a Gaussian kernel with a fixed bandwidth:
//!
//! ```text
//! A[i][j] = exp(-‖x_i - x_j‖² / 2)    i ≠ j
//! A[i][i] = 0
//! ```
//!
//! The diagonal is zeroed by definition rather than through the formula,
//! since `exp(0) = 1` would otherwise turn every node into its own neighbour.
//! Identical points get similarity exactly 1 and are not special-cased.
//!
//! Time O(N²·d), memory O(N²).

use log::{debug, info};

use crate::error::{SymNmfError, SymNmfResult};
use crate::matrix::{DenseMatrix, MatrixArena};

/// Denominator of the kernel exponent (2σ² with σ = 1).
pub const SIMILARITY_BANDWIDTH: f64 = 2.0;

/// N points sharing one dimensionality d (N ≥ 1, d ≥ 1).
#[derive(Clone, Debug, PartialEq)]
pub struct PointSet {
    points: Vec<Vec<f64>>,
    dim: usize,
}

impl PointSet {
    pub fn new(points: Vec<Vec<f64>>) -> SymNmfResult<Self> {
        let dim = match points.first() {
            Some(first) => first.len(),
            None => return Err(SymNmfError::invalid_input("point set is empty")),
        };
        if dim == 0 {
            return Err(SymNmfError::invalid_input("points have no coordinates"));
        }
        if let Some((i, p)) = points.iter().enumerate().find(|(_, p)| p.len() != dim) {
            return Err(SymNmfError::invalid_input(format!(
                "point {} has dimension {}, expected {}",
                i,
                p.len(),
                dim
            )));
        }
        Ok(Self { points, dim })
    }

    /// Borrowing constructor for boundary data.
    pub fn from_rows(rows: &[Vec<f64>]) -> SymNmfResult<Self> {
        Self::new(rows.to_vec())
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn point(&self, i: usize) -> &[f64] {
        &self.points[i]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Vec<f64>> {
        self.points.iter()
    }
}

/// Squared Euclidean distance for slices
pub fn squared_euclidean_distance_slice(vec_i: &[f64], vec_j: &[f64]) -> f64 {
    debug_assert_eq!(vec_i.len(), vec_j.len());
    vec_i
        .iter()
        .zip(vec_j.iter())
        .map(|(a, b)| (a - b).powi(2))
        .sum()
}

/// Gaussian affinity for a squared distance.
#[inline]
pub fn gaussian_affinity(distance_sq: f64) -> f64 {
    (-distance_sq / SIMILARITY_BANDWIDTH).exp()
}

/// Build the N×N similarity matrix of `points`.
///
/// Only the upper triangle is evaluated; each value is mirrored so the
/// result is exactly symmetric.
pub fn compute_similarity(points: &PointSet) -> SymNmfResult<DenseMatrix> {
    let n = points.len();
    info!(
        "Building similarity matrix for {} points with {} coordinates",
        n,
        points.dim()
    );

    let mut similarity = MatrixArena::allocate(n, n, true)?;
    for i in 0..n {
        for j in (i + 1)..n {
            let d2 = squared_euclidean_distance_slice(points.point(i), points.point(j));
            let w = gaussian_affinity(d2);
            similarity.set(i, j, w);
            similarity.set(j, i, w);
        }
    }

    debug!("Similarity matrix built: {}x{}", n, n);
    Ok(similarity)
}

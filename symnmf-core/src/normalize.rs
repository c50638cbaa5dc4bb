// symnmf-core/src/normalize.rs
//! Symmetric normalization of the similarity matrix.
//!
//! `W = D^-1/2 · A · D^-1/2`, i.e. `W[i][j] = A[i][j] / sqrt(D[i][i] · D[j][j])`.
//! Only scaling is applied, so the zero diagonal of `A` is preserved.

use log::{debug, info, warn};

use crate::error::{SymNmfError, SymNmfResult};
use crate::matrix::{DenseMatrix, MatrixArena};

/// Inverse square roots of the degree diagonal.
///
/// A non-positive or non-finite degree cannot be inverted and is reported as
/// `DegenerateInput` instead of leaking NaN/Inf into `W`.
pub fn inverse_sqrt_degrees(degree: &DenseMatrix) -> SymNmfResult<Vec<f64>> {
    degree
        .diagonal()
        .into_iter()
        .enumerate()
        .map(|(i, d)| {
            if d > 0.0 && d.is_finite() {
                Ok(1.0 / d.sqrt())
            } else {
                warn!("Degree of node {} is {}, cannot normalize", i, d);
                Err(SymNmfError::degenerate_input(i, d))
            }
        })
        .collect()
}

/// Build the normalized similarity matrix from `A` and its degree matrix. O(N²).
pub fn compute_normalized(
    similarity: &DenseMatrix,
    degree: &DenseMatrix,
) -> SymNmfResult<DenseMatrix> {
    if !similarity.is_square() || similarity.shape() != degree.shape() {
        return Err(SymNmfError::invalid_input(format!(
            "similarity {:?} and degree {:?} must be square with equal shape",
            similarity.shape(),
            degree.shape()
        )));
    }
    let n = similarity.nrows();
    info!("Normalizing {}x{} similarity matrix", n, n);

    let inv_sqrt = inverse_sqrt_degrees(degree)?;

    let mut normalized = MatrixArena::allocate(n, n, false)?;
    for i in 0..n {
        let a_row = similarity.row(i);
        let scale_i = inv_sqrt[i];
        for ((w, &a), &scale_j) in normalized.row_mut(i).iter_mut().zip(a_row).zip(&inv_sqrt) {
            *w = a * scale_i * scale_j;
        }
    }

    debug!("Normalized similarity matrix built: {}x{}", n, n);
    Ok(normalized)
}

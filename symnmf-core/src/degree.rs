// symnmf-core/src/degree.rs
//! Diagonal degree matrix: `D[i][i] = Σ_j A[i][j]`, zero elsewhere.

use log::{debug, info};

use crate::error::{SymNmfError, SymNmfResult};
use crate::matrix::{DenseMatrix, MatrixArena};

/// Row sums of a square matrix.
pub fn row_sums(matrix: &DenseMatrix) -> Vec<f64> {
    (0..matrix.nrows())
        .map(|i| matrix.row(i).iter().sum())
        .collect()
}

/// Build the degree matrix of a similarity matrix. O(N²).
pub fn compute_degree(similarity: &DenseMatrix) -> SymNmfResult<DenseMatrix> {
    if !similarity.is_square() {
        return Err(SymNmfError::invalid_input(format!(
            "similarity matrix must be square, got {:?}",
            similarity.shape()
        )));
    }
    let n = similarity.nrows();
    info!("Building degree matrix for {} nodes", n);

    let degrees = row_sums(similarity);
    let mut degree = MatrixArena::allocate(n, n, true)?;
    for (i, &d) in degrees.iter().enumerate() {
        degree.set(i, i, d);
    }

    let (min_degree, max_degree) = degrees
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &d| {
            (min.min(d), max.max(d))
        });
    debug!(
        "Degree matrix built: min={:.6e}, max={:.6e}",
        min_degree, max_degree
    );
    Ok(degree)
}

//! Conversions between `symnmf_core::DenseMatrix` and smartcore's
//! `DenseMatrix<f64>`, for callers that already hold data in smartcore.

use smartcore::linalg::basic::arrays::Array;
use smartcore::linalg::basic::matrix::DenseMatrix as SmartMatrix;

use symnmf_core::{DenseMatrix, MatrixArena, SymNmfError, SymNmfResult};

pub fn to_smartcore(matrix: &DenseMatrix) -> SymNmfResult<SmartMatrix<f64>> {
    SmartMatrix::from_2d_vec(&matrix.to_rows())
        .map_err(|e| SymNmfError::invalid_input(format!("smartcore rejected matrix: {:?}", e)))
}

pub fn from_smartcore(matrix: &SmartMatrix<f64>) -> SymNmfResult<DenseMatrix> {
    let (rows, cols) = matrix.shape();
    let mut out = MatrixArena::allocate(rows, cols, false)?;
    for i in 0..rows {
        for j in 0..cols {
            out.set(i, j, *matrix.get((i, j)));
        }
    }
    Ok(out)
}

/// Row-major nested vectors of a smartcore matrix.
pub fn densematrix_to_vecvec(matrix: &SmartMatrix<f64>) -> Vec<Vec<f64>> {
    let (rows, cols) = matrix.shape();
    (0..rows)
        .map(|i| (0..cols).map(|j| *matrix.get((i, j))).collect())
        .collect()
}

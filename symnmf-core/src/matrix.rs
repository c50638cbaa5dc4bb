// symnmf-core/src/matrix.rs
//! Dense matrix storage and the arena that owns its lifecycle.
//!
//! Every engine allocates its output through [`MatrixArena`] so that an
//! allocation failure surfaces as [`SymNmfError::OutOfMemory`] instead of an
//! abort. Matrices are plain owned values: stages hand them over by move and
//! borrow them for read-only work, so a matrix is never aliased by two
//! live owners.

use std::ops::{Index, IndexMut};

use log::trace;

use crate::error::{SymNmfError, SymNmfResult};

/// Row-major rectangular matrix of `f64`.
#[derive(Clone, Debug, PartialEq)]
pub struct DenseMatrix {
    data: Vec<f64>, // row * ncols + col
    nrows: usize,
    ncols: usize,
}

impl DenseMatrix {
    /// Build from boundary rows (sequence of sequences). Ragged input is rejected.
    pub fn from_rows(rows: &[Vec<f64>]) -> SymNmfResult<Self> {
        let nrows = rows.len();
        let ncols = rows.first().map(|r| r.len()).unwrap_or(0);

        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != ncols) {
            return Err(SymNmfError::invalid_input(format!(
                "ragged rows: row {} has {} entries, expected {}",
                i,
                row.len(),
                ncols
            )));
        }

        let mut matrix = MatrixArena::allocate(nrows, ncols, false)?;
        for (i, row) in rows.iter().enumerate() {
            matrix.row_mut(i).copy_from_slice(row);
        }
        Ok(matrix)
    }

    /// Back to boundary rows.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.nrows).map(|i| self.row(i).to_vec()).collect()
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    pub fn is_square(&self) -> bool {
        self.nrows == self.ncols
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.ncols + j]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        self.data[i * self.ncols + j] = value;
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.ncols..(i + 1) * self.ncols]
    }

    pub fn row_mut(&mut self, i: usize) -> &mut [f64] {
        &mut self.data[i * self.ncols..(i + 1) * self.ncols]
    }

    /// All entries in row-major order.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.data.iter()
    }

    /// Diagonal of a square matrix.
    pub fn diagonal(&self) -> Vec<f64> {
        (0..self.nrows.min(self.ncols))
            .map(|i| self.get(i, i))
            .collect()
    }

    /// Check `|A[i][j] - A[j][i]| <= tolerance` for every pair.
    pub fn is_symmetric(&self, tolerance: f64) -> bool {
        if !self.is_square() {
            return false;
        }
        let n = self.nrows;
        (0..n).all(|i| ((i + 1)..n).all(|j| (self.get(i, j) - self.get(j, i)).abs() <= tolerance))
    }

    pub fn transpose(&self) -> SymNmfResult<Self> {
        let mut out = MatrixArena::allocate(self.ncols, self.nrows, false)?;
        for i in 0..self.nrows {
            for j in 0..self.ncols {
                out.set(j, i, self.get(i, j));
            }
        }
        Ok(out)
    }
}

impl Index<(usize, usize)> for DenseMatrix {
    type Output = f64;

    #[inline]
    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        &self.data[i * self.ncols + j]
    }
}

impl IndexMut<(usize, usize)> for DenseMatrix {
    #[inline]
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f64 {
        &mut self.data[i * self.ncols + j]
    }
}

/// Single point of truth for matrix lifetime.
///
/// Allocation is fallible: the element count is overflow-checked and the
/// storage is reserved with `try_reserve_exact`, so exhausting memory yields
/// `OutOfMemory` and no partial matrix. Storage that is not zero-initialised
/// is filled with NaN, which makes a read of an unfilled entry visible in
/// the output rather than silently plausible.
pub struct MatrixArena;

impl MatrixArena {
    pub fn allocate(rows: usize, cols: usize, zeroed: bool) -> SymNmfResult<DenseMatrix> {
        let len = rows
            .checked_mul(cols)
            .ok_or_else(|| SymNmfError::out_of_memory(rows, cols))?;

        let mut data: Vec<f64> = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| SymNmfError::out_of_memory(rows, cols))?;
        data.resize(len, if zeroed { 0.0 } else { f64::NAN });

        trace!("Allocated {}x{} matrix (zeroed={})", rows, cols, zeroed);
        Ok(DenseMatrix {
            data,
            nrows: rows,
            ncols: cols,
        })
    }

    /// Release a matrix. Taking it by value means it cannot be used or
    /// released again afterwards.
    pub fn release(matrix: DenseMatrix) {
        trace!("Released {}x{} matrix", matrix.nrows, matrix.ncols);
        drop(matrix);
    }

    /// Fresh allocation holding the same entries as `matrix`.
    pub fn duplicate(matrix: &DenseMatrix) -> SymNmfResult<DenseMatrix> {
        let mut out = Self::allocate(matrix.nrows, matrix.ncols, false)?;
        out.data.copy_from_slice(&matrix.data);
        Ok(out)
    }
}

/// `a · b`
pub fn matmul(a: &DenseMatrix, b: &DenseMatrix) -> SymNmfResult<DenseMatrix> {
    if a.ncols != b.nrows {
        return Err(SymNmfError::invalid_input(format!(
            "cannot multiply {}x{} by {}x{}",
            a.nrows, a.ncols, b.nrows, b.ncols
        )));
    }

    let mut out = MatrixArena::allocate(a.nrows, b.ncols, true)?;
    // i-p-j order keeps the inner loop on contiguous rows of `b` and `out`
    for i in 0..a.nrows {
        for p in 0..a.ncols {
            let a_ip = a.get(i, p);
            if a_ip == 0.0 {
                continue;
            }
            let b_row = b.row(p);
            for (o, &b_pj) in out.row_mut(i).iter_mut().zip(b_row) {
                *o += a_ip * b_pj;
            }
        }
    }
    Ok(out)
}

/// `aᵗ · b` without materialising the transpose.
pub fn transpose_matmul(a: &DenseMatrix, b: &DenseMatrix) -> SymNmfResult<DenseMatrix> {
    if a.nrows != b.nrows {
        return Err(SymNmfError::invalid_input(format!(
            "cannot multiply transpose of {}x{} by {}x{}",
            a.nrows, a.ncols, b.nrows, b.ncols
        )));
    }

    let mut out = MatrixArena::allocate(a.ncols, b.ncols, true)?;
    for r in 0..a.nrows {
        let b_row = b.row(r);
        for (p, &a_rp) in a.row(r).iter().enumerate() {
            if a_rp == 0.0 {
                continue;
            }
            for (o, &b_rq) in out.row_mut(p).iter_mut().zip(b_row) {
                *o += a_rp * b_rq;
            }
        }
    }
    Ok(out)
}

/// `‖a − b‖²_F`
pub fn frobenius_diff_sq(a: &DenseMatrix, b: &DenseMatrix) -> SymNmfResult<f64> {
    if a.shape() != b.shape() {
        return Err(SymNmfError::invalid_input(format!(
            "shape mismatch: {:?} vs {:?}",
            a.shape(),
            b.shape()
        )));
    }
    Ok(a.data
        .iter()
        .zip(&b.data)
        .map(|(x, y)| (x - y).powi(2))
        .sum())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_zeroed() {
        let m = MatrixArena::allocate(3, 4, true).unwrap();
        assert_eq!(m.shape(), (3, 4));
        assert!(m.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_allocate_unzeroed_is_nan_filled() {
        let m = MatrixArena::allocate(2, 2, false).unwrap();
        assert!(m.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_allocate_overflow_is_out_of_memory() {
        let err = MatrixArena::allocate(usize::MAX, 2, true).unwrap_err();
        assert_eq!(err, SymNmfError::out_of_memory(usize::MAX, 2));
    }

    #[test]
    fn test_allocate_huge_is_out_of_memory() {
        // fits in usize, but not in memory
        let rows = 1usize << 40;
        let err = MatrixArena::allocate(rows, 1 << 20, true).unwrap_err();
        assert!(matches!(err, SymNmfError::OutOfMemory { .. }));
    }

    #[test]
    fn test_duplicate_is_independent() {
        let a = DenseMatrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let mut b = MatrixArena::duplicate(&a).unwrap();
        b.set(0, 0, 9.0);
        assert_eq!(a.get(0, 0), 1.0);
        assert_eq!(b[(0, 0)], 9.0);
        MatrixArena::release(b);
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let err = DenseMatrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(err, SymNmfError::InvalidInput { .. }));
    }

    #[test]
    fn test_matmul_and_transpose_matmul() {
        let a = DenseMatrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]).unwrap();
        let b = DenseMatrix::from_rows(&[vec![1.0, 0.0], vec![0.0, 2.0]]).unwrap();

        let ab = matmul(&a, &b).unwrap();
        assert_eq!(
            ab.to_rows(),
            vec![vec![1.0, 4.0], vec![3.0, 8.0], vec![5.0, 12.0]]
        );

        // aᵗa = [[35, 44], [44, 56]]
        let ata = transpose_matmul(&a, &a).unwrap();
        assert_eq!(ata.to_rows(), vec![vec![35.0, 44.0], vec![44.0, 56.0]]);

        let explicit = matmul(&a.transpose().unwrap(), &a).unwrap();
        assert_eq!(ata, explicit);
    }

    #[test]
    fn test_matmul_shape_mismatch() {
        let a = MatrixArena::allocate(2, 3, true).unwrap();
        let b = MatrixArena::allocate(2, 3, true).unwrap();
        assert!(matmul(&a, &b).is_err());
        assert!(frobenius_diff_sq(&a, &a.transpose().unwrap()).is_err());
    }

    #[test]
    fn test_frobenius_diff_sq() {
        let a = DenseMatrix::from_rows(&[vec![1.0, 2.0]]).unwrap();
        let b = DenseMatrix::from_rows(&[vec![0.0, 4.0]]).unwrap();
        assert_eq!(frobenius_diff_sq(&a, &b).unwrap(), 5.0);
    }
}

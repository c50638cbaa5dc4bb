//! Named entry points over boundary data (row-major `Vec<Vec<f64>>`).
//!
//! Each operation converts its input, runs the core engines and releases
//! every intermediate matrix as soon as the next stage has consumed it.
//! `Goal` replaces an integer command code with a tagged choice.

use std::fmt;
use std::str::FromStr;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use symnmf_core::{
    compute_degree, compute_normalized, compute_similarity, factorize, DenseMatrix,
    FactorizeParams, MatrixArena, PointSet, SymNmfError, SymNmfResult,
};

/// Which matrix a caller asks for.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    /// Similarity matrix A
    Sym,
    /// Diagonal degree matrix D
    Ddg,
    /// Normalized similarity matrix W
    Norm,
    /// Factor matrix H
    SymNmf,
}

impl FromStr for Goal {
    type Err = SymNmfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sym" => Ok(Goal::Sym),
            "ddg" => Ok(Goal::Ddg),
            "norm" => Ok(Goal::Norm),
            "symnmf" => Ok(Goal::SymNmf),
            other => Err(SymNmfError::invalid_input(format!(
                "unknown goal '{}', expected one of sym, ddg, norm, symnmf",
                other
            ))),
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Goal::Sym => "sym",
            Goal::Ddg => "ddg",
            Goal::Norm => "norm",
            Goal::SymNmf => "symnmf",
        };
        write!(f, "{}", name)
    }
}

/// N×N similarity matrix of `points`.
pub fn similarity(points: &[Vec<f64>]) -> SymNmfResult<DenseMatrix> {
    let points = PointSet::from_rows(points)?;
    compute_similarity(&points)
}

/// N×N degree matrix of `points`; the similarity matrix is built first.
pub fn degree(points: &[Vec<f64>]) -> SymNmfResult<DenseMatrix> {
    let similarity = similarity(points)?;
    let degree = compute_degree(&similarity)?;
    MatrixArena::release(similarity);
    Ok(degree)
}

/// N×N normalized similarity matrix of `points`.
pub fn normalized(points: &[Vec<f64>]) -> SymNmfResult<DenseMatrix> {
    let points = PointSet::from_rows(points)?;
    normalized_from_points(&points)
}

/// Normalized similarity matrix of an already validated point set.
pub fn normalized_from_points(points: &PointSet) -> SymNmfResult<DenseMatrix> {
    let similarity = compute_similarity(points)?;
    let degree = compute_degree(&similarity)?;
    let normalized = compute_normalized(&similarity, &degree)?;
    MatrixArena::release(similarity);
    MatrixArena::release(degree);
    Ok(normalized)
}

/// Factorize `w` (n×n) from `h_init` (n×k) and return the final n×k factor.
///
/// `FactorizeParams::default()` takes damped steps (`beta = 0.5`);
/// `FactorizeParams::undamped()` applies the plain ratio rule `H ∘ (WH / H·HᵗH)`.
pub fn symnmf(
    h_init: &[Vec<f64>],
    w: &[Vec<f64>],
    n: usize,
    k: usize,
    params: &FactorizeParams,
) -> SymNmfResult<DenseMatrix> {
    let h_init = DenseMatrix::from_rows(h_init)?;
    let w = DenseMatrix::from_rows(w)?;

    if h_init.shape() != (n, k) {
        return Err(SymNmfError::invalid_input(format!(
            "H_init must be {}x{}, got {:?}",
            n,
            k,
            h_init.shape()
        )));
    }
    if w.shape() != (n, n) {
        return Err(SymNmfError::invalid_input(format!(
            "W must be {}x{}, got {:?}",
            n,
            n,
            w.shape()
        )));
    }

    debug!("symnmf: n={}, k={}, params={:?}", n, k, params);
    factorize(&h_init, &w, params)
}

/// Dispatch one of the three matrix goals over `points`.
///
/// `Goal::SymNmf` needs an initial factor and a normalized matrix, so it is
/// rejected here; see `SymNmfBuilder::run` for the full pipeline.
pub fn run_matrix_goal(goal: Goal, points: &[Vec<f64>]) -> SymNmfResult<DenseMatrix> {
    info!("Running goal '{}' on {} points", goal, points.len());
    match goal {
        Goal::Sym => similarity(points),
        Goal::Ddg => degree(points),
        Goal::Norm => normalized(points),
        Goal::SymNmf => Err(SymNmfError::invalid_input(
            "goal 'symnmf' needs H_init and W, not raw points",
        )),
    }
}

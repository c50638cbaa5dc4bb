// symnmf-core/src/factorize.rs
//! Symmetric nonnegative factorization `W ≈ H·Hᵗ` by multiplicative updates.
//!
//! Each iteration forms two dense products,
//!
//! ```text
//! WH     = W · H            (N×k)
//! HtH_H  = H · (Hᵗ · H)     (N×k)
//! ```
//!
//! and rescales every entry of `H`:
//!
//! ```text
//! H[i][j] ← H[i][j] · (1 − β + β · WH[i][j] / HtH_H[i][j])
//! ```
//!
//! With `β = 1` this is the plain ratio rule `H ∘ (WH / HtH_H)`. The default
//! `β = 0.5` damps the step; the undamped rule can oscillate between two
//! states forever (e.g. `W = [[0,1],[1,0]]`, `H = [[1],[1]]` alternates
//! between 1 and 0.5), while the damped one settles and in practice
//! decreases `‖W − H·Hᵗ‖_F` from one iteration to the next.
//!
//! A zero denominator leaves the entry unchanged. No clamping is applied:
//! the update preserves nonnegativity for nonnegative `W` and `H`.
//!
//! The loop stops when the iteration budget is spent or when
//! `‖H_new − H‖²_F < ε`. Running out of iterations is a normal outcome.
//!
//! Per iteration: O(N²·k + N·k²).

use std::ops::ControlFlow;

use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use crate::error::{SymNmfError, SymNmfResult};
use crate::matrix::{frobenius_diff_sq, matmul, transpose_matmul, DenseMatrix, MatrixArena};

/// Iteration budget and stopping tolerance for the update loop.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FactorizeParams {
    /// Hard cap on update iterations (default: 300)
    pub max_iterations: usize,
    /// Stop once ‖H_new − H‖²_F falls below this (default: 1e-4)
    pub epsilon: f64,
    /// Step damping in (0, 1] (default: 0.5, 1.0 is the undamped ratio rule)
    pub beta: f64,
}

impl Default for FactorizeParams {
    fn default() -> Self {
        Self {
            max_iterations: 300,
            epsilon: 1e-4,
            beta: 0.5,
        }
    }
}

// floats compared with relative equality
impl PartialEq for FactorizeParams {
    fn eq(&self, other: &Self) -> bool {
        self.max_iterations == other.max_iterations
            && approx::relative_eq!(self.epsilon, other.epsilon)
            && approx::relative_eq!(self.beta, other.beta)
    }
}

impl FactorizeParams {
    /// Undamped ratio rule `H ∘ (WH / HtH_H)`.
    pub fn undamped() -> Self {
        Self {
            beta: 1.0,
            ..Self::default()
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    pub fn validate(&self) -> SymNmfResult<()> {
        if self.beta.is_nan() || self.beta <= 0.0 || self.beta > 1.0 {
            return Err(SymNmfError::invalid_input(format!(
                "beta must lie in (0, 1], got {}",
                self.beta
            )));
        }
        if self.epsilon.is_nan() || self.epsilon < 0.0 {
            return Err(SymNmfError::invalid_input(format!(
                "epsilon must be nonnegative, got {}",
                self.epsilon
            )));
        }
        Ok(())
    }
}

/// Why the update loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// ‖H_new − H‖²_F dropped below epsilon
    Converged,
    /// `max_iterations` updates were applied
    IterationLimit,
    /// The observer asked to stop between iterations
    Stopped,
}

/// Final factor together with loop diagnostics.
#[derive(Debug, Clone)]
pub struct Factorization {
    pub h: DenseMatrix,
    pub iterations: usize,
    pub termination: Termination,
    /// ‖H_new − H‖²_F of the last applied update, `None` if no update ran
    pub final_delta: Option<f64>,
}

impl Factorization {
    pub fn converged(&self) -> bool {
        self.termination == Termination::Converged
    }
}

/// Check that `W` is an N×N and `H` an N×k matrix, both finite and
/// nonnegative, with 1 ≤ k ≤ N.
/// Returns `(n, k)`.
pub fn validate_inputs(h: &DenseMatrix, w: &DenseMatrix) -> SymNmfResult<(usize, usize)> {
    if !w.is_square() {
        return Err(SymNmfError::invalid_input(format!(
            "W must be square, got {:?}",
            w.shape()
        )));
    }
    let (n, k) = h.shape();
    if n != w.nrows() {
        return Err(SymNmfError::invalid_input(format!(
            "H has {} rows but W is {}x{}",
            n,
            w.nrows(),
            w.ncols()
        )));
    }
    if k == 0 || k > n {
        return Err(SymNmfError::invalid_input(format!(
            "rank k must satisfy 1 <= k <= {}, got {}",
            n, k
        )));
    }
    if let Some(pos) = h.iter().position(|&v| !v.is_finite() || v < 0.0) {
        return Err(SymNmfError::invalid_input(format!(
            "H[{}][{}] = {} is not a finite nonnegative value",
            pos / k,
            pos % k,
            h.as_slice()[pos]
        )));
    }
    if let Some(pos) = w.iter().position(|&v| !v.is_finite() || v < 0.0) {
        return Err(SymNmfError::invalid_input(format!(
            "W[{}][{}] = {} is not a finite nonnegative value",
            pos / n,
            pos % n,
            w.as_slice()[pos]
        )));
    }
    Ok((n, k))
}

/// One multiplicative update. Returns a freshly allocated `H_new`.
pub fn update_step(h: &DenseMatrix, w: &DenseMatrix, beta: f64) -> SymNmfResult<DenseMatrix> {
    let wh = matmul(w, h)?;
    let hth = transpose_matmul(h, h)?;
    let hth_h = matmul(h, &hth)?;
    MatrixArena::release(hth);

    let (n, k) = h.shape();
    let mut next = MatrixArena::allocate(n, k, false)?;
    for (((out, &h_ij), &num), &den) in next
        .as_mut_slice()
        .iter_mut()
        .zip(h.as_slice())
        .zip(wh.as_slice())
        .zip(hth_h.as_slice())
    {
        // no gradient signal through a zero denominator: keep the entry
        let ratio = if den == 0.0 { 1.0 } else { num / den };
        *out = h_ij * (1.0 - beta + beta * ratio);
    }

    MatrixArena::release(wh);
    MatrixArena::release(hth_h);
    Ok(next)
}

/// `‖W − H·Hᵗ‖_F`
pub fn reconstruction_error(w: &DenseMatrix, h: &DenseMatrix) -> SymNmfResult<f64> {
    let ht = h.transpose()?;
    let hht = matmul(h, &ht)?;
    Ok(frobenius_diff_sq(w, &hht)?.sqrt())
}

/// Run the update loop from `h_init` against `w` and return the final `H`.
///
/// `h_init` is only borrowed; the result is always a fresh allocation, also
/// when `max_iterations` is 0.
pub fn factorize(
    h_init: &DenseMatrix,
    w: &DenseMatrix,
    params: &FactorizeParams,
) -> SymNmfResult<DenseMatrix> {
    factorize_with_report(h_init, w, params).map(|f| f.h)
}

/// Like [`factorize`] but also reports how the loop ended.
pub fn factorize_with_report(
    h_init: &DenseMatrix,
    w: &DenseMatrix,
    params: &FactorizeParams,
) -> SymNmfResult<Factorization> {
    factorize_observed(h_init, w, params, |_, _| ControlFlow::Continue(()))
}

/// Update loop with an observer called after every applied update (the
/// converging one included) with the iteration count and the new `H`.
///
/// Returning `ControlFlow::Break` stops the loop between iterations; this is
/// the only way to interrupt a factorization before its budget is spent.
pub fn factorize_observed<F>(
    h_init: &DenseMatrix,
    w: &DenseMatrix,
    params: &FactorizeParams,
    mut observer: F,
) -> SymNmfResult<Factorization>
where
    F: FnMut(usize, &DenseMatrix) -> ControlFlow<()>,
{
    params.validate()?;
    let (n, k) = validate_inputs(h_init, w)?;

    info!(
        "Factorizing {}x{} matrix with rank {} (max_iterations={}, epsilon={:.2e}, beta={})",
        n, n, k, params.max_iterations, params.epsilon, params.beta
    );

    let mut h = MatrixArena::duplicate(h_init)?;
    let mut iterations = 0;
    let mut final_delta = None;
    let mut termination = Termination::IterationLimit;

    while iterations < params.max_iterations {
        let next = update_step(&h, w, params.beta)?;
        // compare against the previous H before it is dropped
        let delta = frobenius_diff_sq(&next, &h)?;
        MatrixArena::release(std::mem::replace(&mut h, next));

        iterations += 1;
        final_delta = Some(delta);
        trace!("Iteration {}: ‖ΔH‖²_F = {:.6e}", iterations, delta);

        let flow = observer(iterations, &h);
        if delta < params.epsilon {
            termination = Termination::Converged;
            break;
        }
        if flow.is_break() {
            termination = Termination::Stopped;
            break;
        }
    }

    match termination {
        Termination::Converged => info!("Converged after {} iterations", iterations),
        Termination::IterationLimit => debug!(
            "Stopped at iteration limit {} without converging (last delta {:?})",
            iterations, final_delta
        ),
        Termination::Stopped => debug!("Stopped by observer after {} iterations", iterations),
    }

    Ok(Factorization {
        h,
        iterations,
        termination,
        final_delta,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_node() -> (DenseMatrix, DenseMatrix) {
        let h = DenseMatrix::from_rows(&[vec![1.0], vec![1.0]]).unwrap();
        let w = DenseMatrix::from_rows(&[vec![0.0, 1.0], vec![1.0, 0.0]]).unwrap();
        (h, w)
    }

    #[test]
    fn test_default_params() {
        let params = FactorizeParams::default();
        assert_eq!(params.max_iterations, 300);
        assert_eq!(params.epsilon, 1e-4);
        assert_eq!(params.beta, 0.5);
        assert_eq!(FactorizeParams::undamped().beta, 1.0);
    }

    #[test]
    fn test_params_validation() {
        assert!(FactorizeParams::default().with_beta(0.0).validate().is_err());
        assert!(FactorizeParams::default().with_beta(1.5).validate().is_err());
        assert!(FactorizeParams::default().with_epsilon(-1.0).validate().is_err());
        assert!(FactorizeParams::default()
            .with_epsilon(f64::NAN)
            .validate()
            .is_err());
        assert!(FactorizeParams::undamped().validate().is_ok());
    }

    #[test]
    fn test_undamped_step_matches_ratio_rule() {
        // WH = [1, 1], H·HᵗH = [2, 2] → H = [0.5, 0.5]
        let (h, w) = two_node();
        let next = update_step(&h, &w, 1.0).unwrap();
        assert_eq!(next.to_rows(), vec![vec![0.5], vec![0.5]]);
    }

    #[test]
    fn test_damped_step() {
        // factor = 0.5 + 0.5 · 0.5
        let (h, w) = two_node();
        let next = update_step(&h, &w, 0.5).unwrap();
        assert_eq!(next.to_rows(), vec![vec![0.75], vec![0.75]]);
    }

    #[test]
    fn test_zero_denominator_keeps_entry() {
        // column 1 of H is all zero → HtH_H column 1 is zero
        let h = DenseMatrix::from_rows(&[vec![1.0, 0.0], vec![1.0, 0.0]]).unwrap();
        let w = DenseMatrix::from_rows(&[vec![0.0, 1.0], vec![1.0, 0.0]]).unwrap();
        let next = update_step(&h, &w, 1.0).unwrap();
        assert!(next.iter().all(|v| v.is_finite()));
        assert_eq!(next.get(0, 1), 0.0);
        assert_eq!(next.get(1, 1), 0.0);
    }

    #[test]
    fn test_validate_inputs() {
        let (h, w) = two_node();
        assert_eq!(validate_inputs(&h, &w).unwrap(), (2, 1));

        let negative = DenseMatrix::from_rows(&[vec![1.0], vec![-0.1]]).unwrap();
        assert!(validate_inputs(&negative, &w).is_err());

        let nan = DenseMatrix::from_rows(&[vec![f64::NAN], vec![1.0]]).unwrap();
        assert!(validate_inputs(&nan, &w).is_err());

        let wide = DenseMatrix::from_rows(&[vec![1.0, 1.0, 1.0], vec![1.0, 1.0, 1.0]]).unwrap();
        assert!(validate_inputs(&wide, &w).is_err());

        let tall = DenseMatrix::from_rows(&[vec![1.0], vec![1.0], vec![1.0]]).unwrap();
        assert!(validate_inputs(&tall, &w).is_err());

        let signed_w = DenseMatrix::from_rows(&[vec![0.0, -1.0], vec![-1.0, 0.0]]).unwrap();
        assert!(validate_inputs(&h, &signed_w).is_err());
    }

    #[test]
    fn test_observer_can_stop() {
        let (h, w) = two_node();
        let params = FactorizeParams::undamped().with_epsilon(0.0);
        let report = factorize_observed(&h, &w, &params, |it, _| {
            if it == 3 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
        .unwrap();
        assert_eq!(report.iterations, 3);
        assert_eq!(report.termination, Termination::Stopped);
    }

    #[test]
    fn test_undamped_oscillation_runs_to_limit() {
        let (h, w) = two_node();
        let params = FactorizeParams::undamped().with_max_iterations(10);
        let report = factorize_with_report(&h, &w, &params).unwrap();
        assert_eq!(report.iterations, 10);
        assert_eq!(report.termination, Termination::IterationLimit);
        assert!(!report.converged());
    }
}

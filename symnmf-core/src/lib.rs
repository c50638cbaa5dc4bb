// symnmf-core/src/lib.rs
//! Dense numeric core for graph-based symmetric NMF clustering.
//!
//! Pipeline, leaf-first:
//! - [`matrix`]: `DenseMatrix` storage and the `MatrixArena` lifecycle
//! - [`similarity`]: Gaussian similarity matrix `A` from coordinates
//! - [`degree`]: diagonal degree matrix `D` from `A`
//! - [`normalize`]: `W = D^-1/2 · A · D^-1/2`
//! - [`factorize`]: multiplicative updates `W ≈ H·Hᵗ`, `H ≥ 0`
//!
//! Every stage returns a new owned matrix. Everything runs synchronously on
//! the calling thread and there is no shared state between calls.

pub mod degree;
pub mod error;
pub mod factorize;
pub mod matrix;
pub mod normalize;
pub mod similarity;

pub use degree::compute_degree;
pub use error::{SymNmfError, SymNmfResult};
pub use factorize::{
    factorize, factorize_observed, factorize_with_report, reconstruction_error, update_step,
    Factorization, FactorizeParams, Termination,
};
pub use matrix::{DenseMatrix, MatrixArena};
pub use normalize::compute_normalized;
pub use similarity::{compute_similarity, PointSet};

#[cfg(test)]
mod tests;

#[cfg(test)]
pub(crate) fn init() {
    use std::sync::Once;

    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let env = env_logger::Env::default().default_filter_or("debug");

        // don't panic if called multiple times across binaries
        let _ = env_logger::Builder::from_env(env).is_test(true).try_init();
    });
}

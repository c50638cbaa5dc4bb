//! # symnmf
//!
//! Graph-based clustering by symmetric nonnegative matrix factorization.
//!
//! Given N points in Rᵈ the pipeline builds a Gaussian similarity graph,
//! normalizes it by degree, and factorizes the normalized matrix `W` into a
//! nonnegative N×k factor `H` with `W ≈ H·Hᵗ`. The argmax of each row of `H`
//! is the point's cluster.
//!
//! The numeric engines live in [`symnmf_core`]; this crate adds the named
//! goals over boundary data, seeded initialization, labelling and the
//! [`SymNmfBuilder`] pipeline.
//!
//! ```
//! use symnmf::{Goal, SymNmfBuilder};
//!
//! let points = vec![
//!     vec![0.0, 0.0], vec![0.4, 0.1], vec![0.1, 0.5],
//!     vec![6.0, 6.0], vec![6.3, 5.8], vec![5.9, 6.4],
//! ];
//!
//! let w = symnmf::normalized(&points).unwrap();
//! assert_eq!(w.shape(), (6, 6));
//!
//! let out = SymNmfBuilder::new().with_k(2).with_seed(42).build(&points).unwrap();
//! assert_eq!(out.labels[0], out.labels[1]);
//! assert_ne!(out.labels[0], out.labels[3]);
//!
//! let h = SymNmfBuilder::new().with_k(2).run(Goal::SymNmf, &points).unwrap();
//! assert_eq!(h.shape(), (6, 2));
//! ```

pub mod builder;
pub mod clustering;
pub mod convert;
pub mod goal;

pub use builder::SymNmfBuilder;
pub use clustering::{assign_clusters, cluster_sizes, initialize_h, ClusteredOutput, DEFAULT_SEED};
pub use goal::{degree, normalized, run_matrix_goal, similarity, symnmf, Goal};
pub use symnmf_core::{
    DenseMatrix, Factorization, FactorizeParams, MatrixArena, PointSet, SymNmfError,
    SymNmfResult, Termination,
};

#[cfg(test)]
mod tests;


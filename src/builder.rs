//! SymNMF builder and end-to-end pipeline.
//!
//! Configures rank, update loop and seed, then runs
//! points → A → D → W → H₀ → H → labels.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use symnmf_core::{
    factorize_with_report, reconstruction_error, DenseMatrix, FactorizeParams, MatrixArena,
    PointSet, SymNmfError, SymNmfResult,
};

use crate::clustering::{
    assign_clusters, cluster_sizes, initialize_h, ClusteredOutput, DEFAULT_SEED,
};
use crate::goal::{normalized_from_points, run_matrix_goal, Goal};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SymNmfBuilder {
    /// number of clusters / factor rank
    pub(crate) k: usize,
    pub(crate) params: FactorizeParams,
    /// seeds the initial factor (default 1234)
    pub(crate) seed: Option<u64>,
}

impl Default for SymNmfBuilder {
    fn default() -> Self {
        debug!("Creating SymNmfBuilder with default parameters");
        Self {
            k: 2,
            params: FactorizeParams::default(),
            seed: None,
        }
    }
}

impl SymNmfBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.params.max_iterations = max_iterations;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.params.epsilon = epsilon;
        self
    }

    pub fn with_beta(mut self, beta: f64) -> Self {
        self.params.beta = beta;
        self
    }

    pub fn with_params(mut self, params: FactorizeParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn params(&self) -> &FactorizeParams {
        &self.params
    }

    pub fn seed(&self) -> u64 {
        self.seed.unwrap_or(DEFAULT_SEED)
    }

    /// Run the whole pipeline on `points` and cluster them into `k` groups.
    pub fn build(&self, points: &[Vec<f64>]) -> SymNmfResult<ClusteredOutput> {
        let points = PointSet::from_rows(points)?;
        let n = points.len();
        if self.k == 0 || self.k > n {
            return Err(SymNmfError::invalid_input(format!(
                "k must satisfy 1 <= k <= {} (number of points), got {}",
                n, self.k
            )));
        }
        info!(
            "SymNmfBuilder::build: N={} points, d={}, k={}",
            n,
            points.dim(),
            self.k
        );

        let w = normalized_from_points(&points)?;
        let h_init = initialize_h(&w, self.k, self.seed())?;
        let report = factorize_with_report(&h_init, &w, &self.params)?;
        MatrixArena::release(h_init);

        let error = reconstruction_error(&w, &report.h)?;
        MatrixArena::release(w);

        let labels = assign_clusters(&report.h);
        let sizes = cluster_sizes(&labels, self.k);
        info!(
            "Clustered {} points in {} iterations ({:?}), sizes {:?}, ‖W − HHᵗ‖_F = {:.6}",
            n, report.iterations, report.termination, sizes, error
        );

        Ok(ClusteredOutput {
            h: report.h,
            labels,
            cluster_sizes: sizes,
            iterations: report.iterations,
            termination: report.termination,
            reconstruction_error: error,
        })
    }

    /// Matrix for `goal`: A, D, W, or the final H for `Goal::SymNmf`.
    pub fn run(&self, goal: Goal, points: &[Vec<f64>]) -> SymNmfResult<DenseMatrix> {
        match goal {
            Goal::SymNmf => self.build(points).map(|out| out.h),
            other => run_matrix_goal(other, points),
        }
    }
}

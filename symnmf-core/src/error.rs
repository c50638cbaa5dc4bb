// symnmf-core/src/error.rs
//! Error taxonomy shared by every engine in the core.
//!
//! Nothing in the core retries: the computations are deterministic, so a
//! failed call fails the same way again. Non-convergence of the
//! factorization loop is not an error and never shows up here.

use thiserror::Error;

/// Errors produced by matrix allocation and the numeric engines.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SymNmfError {
    /// Storage for a `rows × cols` matrix could not be reserved.
    #[error("Out of memory: cannot allocate a {rows}x{cols} matrix")]
    OutOfMemory { rows: usize, cols: usize },

    /// A shape or sign precondition was violated by the caller.
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Normalization hit a degree entry that cannot be inverted.
    #[error("Degenerate input: degree of node {index} is {value}")]
    DegenerateInput { index: usize, value: f64 },
}

impl SymNmfError {
    pub fn out_of_memory(rows: usize, cols: usize) -> Self {
        Self::OutOfMemory { rows, cols }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn degenerate_input(index: usize, value: f64) -> Self {
        Self::DegenerateInput { index, value }
    }
}

pub type SymNmfResult<T> = Result<T, SymNmfError>;

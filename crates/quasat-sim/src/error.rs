//! Error types for the sim crate.

use thiserror::Error;

/// Errors produced by embedding, diagonalisation and time evolution.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// A caller-supplied parameter is out of its valid range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Dense simulation over this many qubits would not fit in memory.
    #[error("{n_qubits} qubits exceed the dense simulation limit of {max}")]
    TooManyQubits {
        /// Requested qubit count.
        n_qubits: usize,
        /// Largest supported qubit count.
        max: usize,
    },

    /// Two operands act on spaces of different dimension.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimension required by the operation.
        expected: usize,
        /// Dimension supplied.
        actual: usize,
    },

    /// Diagonalisation failed to converge or integration produced
    /// non-finite amplitudes.
    #[error("numerical failure: {0}")]
    NumericalFailure(String),

    /// Instance handling failed.
    #[error(transparent)]
    Cnf(#[from] quasat_cnf::CnfError),
}

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;

//! Error types for the oracle crate.

use thiserror::Error;

/// Errors produced by SAT oracles and the phase-transition sampler.
///
/// An undecided instance is not an error; it is reported as
/// [`SatVerdict::Unknown`](crate::SatVerdict::Unknown).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OracleError {
    /// A sampler parameter is out of its valid range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The underlying decision procedure failed.
    #[error("SAT solver '{solver}' failed: {message}")]
    Solver {
        /// Name of the oracle that failed.
        solver: String,
        /// The solver's own error text.
        message: String,
    },

    /// The solver reported a model that does not satisfy the instance.
    #[error("SAT solver '{solver}' returned a model violating {violated} clause(s)")]
    InvalidModel {
        /// Name of the oracle.
        solver: String,
        /// Clauses the model falsifies.
        violated: usize,
    },

    /// Instance construction or generation failed.
    #[error(transparent)]
    Cnf(#[from] quasat_cnf::CnfError),
}

/// Result type for oracle operations.
pub type OracleResult<T> = Result<T, OracleError>;

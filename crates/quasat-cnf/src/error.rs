//! Error types for the CNF crate.

use thiserror::Error;

/// Errors produced while building, generating or parsing CNF instances.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CnfError {
    /// A caller-supplied parameter is out of its valid range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// `0` is the DIMACS clause terminator, never a literal.
    #[error("literal must be nonzero")]
    ZeroLiteral,

    /// Two literals of one clause share a variable.
    #[error("variable {var} appears more than once in clause")]
    DuplicateVariable {
        /// The repeated variable (1-based).
        var: usize,
    },

    /// A literal references a variable outside `1..=num_variables`.
    #[error("literal references variable {var} but instance only has {num_variables} variables")]
    VariableOutOfRange {
        /// The offending variable (1-based).
        var: usize,
        /// Declared variable count of the instance.
        num_variables: usize,
    },

    /// An assignment does not cover exactly the instance's variables.
    #[error("assignment has {actual} values, instance has {expected} variables")]
    AssignmentLength {
        /// Variable count of the instance.
        expected: usize,
        /// Length of the supplied assignment.
        actual: usize,
    },

    /// Malformed DIMACS input.
    #[error("DIMACS parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// Reading or writing a DIMACS stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for CNF operations.
pub type CnfResult<T> = Result<T, CnfError>;

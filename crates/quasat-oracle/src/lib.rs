//! quasat SAT Oracles and Phase-Transition Sampler
//!
//! Wraps exact and resource-bounded satisfiability procedures behind the
//! [`SatOracle`] trait, normalising their answers to [`SatVerdict`], and uses
//! them to estimate the random k-SAT satisfiability curve.
//!
//! # Quick start
//!
//! ```rust
//! use quasat_cnf::CnfInstance;
//! use quasat_oracle::{SatOracle, VarisatOracle};
//!
//! let inst = CnfInstance::from_dimacs(2, &[vec![1, 2], vec![-1], vec![-2]]).unwrap();
//! let verdict = VarisatOracle::new().solve(&inst).unwrap();
//! assert!(verdict.is_unsatisfiable());
//! ```

pub mod error;
pub mod oracle;
pub mod phase;
pub mod verdict;

pub use error::{OracleError, OracleResult};
pub use oracle::{BoundedOracle, SatOracle, VarisatOracle};
pub use phase::{PhaseConfig, PhaseCurve, PhasePoint, PhaseTransitionSampler, density_range};
pub use verdict::SatVerdict;

//! quasat CNF Formulas and Random k-SAT Instances
//!
//! Provides the plain data model shared by the rest of quasat:
//!
//! - [`Literal`], [`Clause`], [`CnfInstance`] and [`Assignment`]
//! - seeded random clause/instance generators ([`generator`])
//! - DIMACS CNF reading and writing ([`dimacs`])
//!
//! # Quick start
//!
//! ```rust
//! use quasat_cnf::{Assignment, CnfInstance};
//!
//! // (x₁ ∨ x₂ ∨ x₃) ∧ (¬x₁ ∨ x₂ ∨ ¬x₃)
//! let inst = CnfInstance::from_dimacs(3, &[vec![1, 2, 3], vec![-1, 2, -3]]).unwrap();
//! let a = Assignment::from(vec![true, false, true]);
//! assert_eq!(inst.violated_count(&a).unwrap(), 1);
//! ```

pub mod assignment;
pub mod clause;
pub mod dimacs;
pub mod error;
pub mod generator;
pub mod instance;
pub mod literal;

pub use assignment::Assignment;
pub use clause::Clause;
pub use error::{CnfError, CnfResult};
pub use generator::{
    GeneratorConfig, MAX_CLAUSES, clause_space_size, random_clause, random_instance,
    random_unique_instance,
};
pub use instance::CnfInstance;
pub use literal::Literal;

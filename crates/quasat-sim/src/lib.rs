//! quasat SAT Hamiltonians and Quantum Time Evolution
//!
//! Embeds a CNF instance as a Hamiltonian whose diagonal counts violated
//! clauses, then studies two heuristics for finding its ground state:
//!
//! - **Adiabatic evolution**: RK4 integration of the Schrödinger equation
//!   along H(t) = (1 − s)·(−Σ Xᵢ) + s·H₁, tracked against exact
//!   diagonalisation
//! - **QAOA**: alternating phase-separator / mixer layers whose angles are
//!   tuned by a bounded simplex optimizer
//!
//! All simulation is dense statevector work, so registers are small.
//!
//! # Quick start
//!
//! ```rust
//! use quasat_cnf::CnfInstance;
//! use quasat_sim::embedding::embed_diagonal;
//! use quasat_sim::qaoa::QaoaRunner;
//!
//! let inst = CnfInstance::from_dimacs(2, &[vec![1], vec![-2]]).unwrap();
//! let h1 = embed_diagonal(&inst).unwrap();
//! assert_eq!(h1.ground_states(), vec![0b01]);
//!
//! let result = QaoaRunner::new(h1).with_layers(1).run().unwrap();
//! assert!(result.expectation >= result.ground_energy - 1e-9);
//! ```

pub mod adiabatic;
pub mod dense;
pub mod embedding;
pub mod error;
pub mod hamiltonian;
pub mod integrator;
pub mod optimizer;
pub mod qaoa;
pub mod schedule;
pub mod spectrum;
pub mod statevector;

pub use adiabatic::{AdiabaticEvolution, EvolutionSample, EvolutionTrajectory};
pub use dense::{DenseOperator, MAX_DENSE_QUBITS, MAX_QUBITS};
pub use embedding::{
    DiagonalHamiltonian, assignment_of, basis_index, embed_dense, embed_diagonal, embed_pauli,
};
pub use error::{SimError, SimResult};
pub use hamiltonian::{Hamiltonian, HamiltonianTerm, PauliOp, PauliString};
pub use integrator::{Integrator, RungeKutta4};
pub use optimizer::{BoundedSimplex, OptimizationResult, Optimizer};
pub use qaoa::{QaoaResult, QaoaRunner, qaoa_expectation, qaoa_state};
pub use schedule::{LinearRamp, Schedule, SmoothRamp};
pub use spectrum::{GroundState, ground_space_overlap, ground_state};
pub use statevector::Statevector;

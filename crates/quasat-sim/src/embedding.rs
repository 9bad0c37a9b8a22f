//! CNF → Hamiltonian embedding.
//!
//! Variable `v` lives on qubit `v − 1`, and bit `v − 1` of a basis index is
//! the value of `x_v` (`1` = true). A clause contributes the projector onto
//! the assignments that violate it: a positive literal selects `|0⟩` on its
//! qubit, a negative literal selects `|1⟩`, identity elsewhere. Summed over
//! clauses, the diagonal entry at basis state `x` is the number of clauses
//! that `x` violates.
//!
//! Three equivalent forms are produced:
//!
//! - [`embed_diagonal`]: the `2^n` diagonal, computed directly;
//! - [`embed_dense`]: the full matrix, built from explicit Kronecker products;
//! - [`embed_pauli`]: a Pauli-sum over `I` and `Z` strings.
//!
//! ```rust
//! use quasat_cnf::CnfInstance;
//! use quasat_sim::embedding::embed_diagonal;
//!
//! let inst = CnfInstance::from_dimacs(3, &[vec![1, 2, 3]]).unwrap();
//! let h = embed_diagonal(&inst).unwrap();
//! assert_eq!(h.entries()[0], 1.0);
//! assert!(h.entries()[1..].iter().all(|&e| e == 0.0));
//! ```

use std::collections::BTreeMap;

use num_complex::Complex64;
use quasat_cnf::{Assignment, Clause, CnfInstance};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dense::{DenseOperator, check_qubits};
use crate::error::{SimError, SimResult};
use crate::hamiltonian::{Hamiltonian, HamiltonianTerm, PauliString};

/// Basis index encoding `assignment`.
pub fn basis_index(assignment: &Assignment) -> usize {
    assignment
        .as_slice()
        .iter()
        .enumerate()
        .filter(|(_, v)| **v)
        .fold(0, |x, (q, _)| x | (1 << q))
}

/// Assignment encoded by basis `index` over `num_variables` variables.
pub fn assignment_of(index: usize, num_variables: usize) -> Assignment {
    Assignment::from(
        (0..num_variables)
            .map(|q| (index >> q) & 1 == 1)
            .collect::<Vec<_>>(),
    )
}

/// A Hamiltonian diagonal in the computational basis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagonalHamiltonian {
    n_qubits: usize,
    entries: Vec<f64>,
}

impl DiagonalHamiltonian {
    /// Wrap a diagonal whose length is `2^n`.
    pub fn new(entries: Vec<f64>) -> SimResult<Self> {
        let dim = entries.len();
        if !dim.is_power_of_two() {
            return Err(SimError::InvalidArgument(format!(
                "diagonal length {dim} is not a power of two"
            )));
        }
        let n_qubits = dim.trailing_zeros() as usize;
        check_qubits(n_qubits)?;
        Ok(Self { n_qubits, entries })
    }

    /// Number of qubits.
    pub fn n_qubits(&self) -> usize {
        self.n_qubits
    }

    /// Hilbert-space dimension `2^n`.
    pub fn dim(&self) -> usize {
        self.entries.len()
    }

    /// Diagonal entries indexed by basis state.
    pub fn entries(&self) -> &[f64] {
        &self.entries
    }

    /// Energy of the basis state encoding `assignment`.
    pub fn energy_of(&self, assignment: &Assignment) -> SimResult<f64> {
        if assignment.len() != self.n_qubits {
            return Err(SimError::DimensionMismatch {
                expected: self.n_qubits,
                actual: assignment.len(),
            });
        }
        Ok(self.entries[basis_index(assignment)])
    }

    /// Smallest diagonal entry.
    pub fn ground_energy(&self) -> f64 {
        self.entries.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Basis indices attaining the ground energy.
    pub fn ground_states(&self) -> Vec<usize> {
        let e0 = self.ground_energy();
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| **e == e0)
            .map(|(x, _)| x)
            .collect()
    }

    /// True if some basis state has zero energy.
    pub fn has_zero_energy_state(&self) -> bool {
        self.ground_energy() == 0.0
    }

    /// Compute `H·ψ`.
    pub fn apply(&self, psi: &[Complex64]) -> SimResult<Vec<Complex64>> {
        self.check_len(psi.len())?;
        Ok(self.entries.iter().zip(psi).map(|(e, a)| *e * *a).collect())
    }

    /// `⟨ψ|H|ψ⟩`.
    pub fn expectation(&self, psi: &[Complex64]) -> SimResult<f64> {
        self.check_len(psi.len())?;
        Ok(self
            .entries
            .iter()
            .zip(psi)
            .map(|(e, a)| e * a.norm_sqr())
            .sum())
    }

    /// Expand into a dense matrix.
    pub fn to_dense(&self) -> SimResult<DenseOperator> {
        DenseOperator::from_diagonal(&self.entries)
    }

    fn check_len(&self, actual: usize) -> SimResult<()> {
        if actual != self.dim() {
            return Err(SimError::DimensionMismatch {
                expected: self.dim(),
                actual,
            });
        }
        Ok(())
    }
}

/// Qubit mask and the bit pattern on it that violates `clause`.
fn violation_pattern(clause: &Clause) -> (usize, usize) {
    clause.literals().iter().fold((0, 0), |(mask, bits), lit| {
        let bit = 1usize << (lit.var() - 1);
        let violating = if lit.is_negative() { bit } else { 0 };
        (mask | bit, bits | violating)
    })
}

/// Diagonal embedding: entry `x` is the number of clauses violated by `x`.
pub fn embed_diagonal(instance: &CnfInstance) -> SimResult<DiagonalHamiltonian> {
    let n = instance.num_variables();
    check_qubits(n)?;

    let patterns: Vec<(usize, usize)> = instance.clauses().iter().map(violation_pattern).collect();
    let entries = (0..1usize << n)
        .map(|x| {
            patterns
                .iter()
                .filter(|(mask, bits)| x & mask == *bits)
                .count() as f64
        })
        .collect();

    debug!(
        n_qubits = n,
        clauses = instance.num_clauses(),
        "embedded instance as diagonal"
    );
    DiagonalHamiltonian::new(entries)
}

/// Dense embedding built term by term from Kronecker products of
/// single-qubit projectors and identities.
pub fn embed_dense(instance: &CnfInstance) -> SimResult<DenseOperator> {
    let n = instance.num_variables();
    let mut total = DenseOperator::zeros(n)?;
    let identity = DenseOperator::identity(1)?;

    for clause in instance.clauses() {
        let mut factors = vec![identity.clone(); n];
        for lit in clause.literals() {
            factors[lit.var() - 1] = DenseOperator::projector(lit.is_negative());
        }
        total.add_assign(&DenseOperator::tensor_product(&factors)?)?;
    }

    debug!(
        n_qubits = n,
        clauses = instance.num_clauses(),
        "embedded instance as dense matrix"
    );
    Ok(total)
}

/// Pauli-sum embedding using `|0⟩⟨0| = (I + Z)/2` and `|1⟩⟨1| = (I − Z)/2`.
///
/// A width-k clause expands to `2^k` Z-strings with coefficient
/// `± 2^{-k}`; like terms are combined across clauses. The identity
/// coefficient is the expected number of violated clauses under a uniformly
/// random assignment.
pub fn embed_pauli(instance: &CnfInstance) -> SimResult<Hamiltonian> {
    let n = instance.num_variables();
    check_qubits(n)?;

    let mut acc: BTreeMap<PauliString, f64> = BTreeMap::new();
    for clause in instance.clauses() {
        let lits = clause.literals();
        let scale = 0.5f64.powi(lits.len() as i32);
        for subset in 0..1usize << lits.len() {
            let mut sign = 1.0;
            let mut qubits = Vec::new();
            for (i, lit) in lits.iter().enumerate() {
                if (subset >> i) & 1 == 1 {
                    qubits.push((lit.var() - 1) as u32);
                    if lit.is_negative() {
                        sign = -sign;
                    }
                }
            }
            *acc.entry(PauliString::zz(qubits)).or_insert(0.0) += sign * scale;
        }
    }

    let h: Hamiltonian = acc
        .into_iter()
        .map(|(p, c)| HamiltonianTerm::new(c, p))
        .collect();
    let h = h.simplify();
    debug!(
        n_qubits = n,
        terms = h.n_terms(),
        "embedded instance as Pauli sum"
    );
    Ok(h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basis_index_round_trip() {
        let a = Assignment::from(vec![true, false, true]);
        assert_eq!(basis_index(&a), 0b101);
        assert_eq!(assignment_of(0b101, 3), a);
    }

    #[test]
    fn test_negative_literal_penalises_one() {
        let inst = CnfInstance::from_dimacs(2, &[vec![-2]]).unwrap();
        let h = embed_diagonal(&inst).unwrap();
        // x2 = true is bit 1.
        assert_eq!(h.entries(), &[0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_ground_states() {
        let inst = CnfInstance::from_dimacs(2, &[vec![1], vec![2]]).unwrap();
        let h = embed_diagonal(&inst).unwrap();
        assert_eq!(h.ground_energy(), 0.0);
        assert_eq!(h.ground_states(), vec![0b11]);
        assert!(h.has_zero_energy_state());
    }

    #[test]
    fn test_energy_of_length_check() {
        let h = embed_diagonal(&CnfInstance::empty(2)).unwrap();
        let err = h.energy_of(&Assignment::all_false(3)).unwrap_err();
        assert!(matches!(err, SimError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_pauli_identity_coefficient() {
        let inst = CnfInstance::from_dimacs(3, &[vec![1, 2, 3], vec![-1, 2]]).unwrap();
        let h = embed_pauli(&inst).unwrap();
        assert_eq!(h.constant(), 0.125 + 0.25);
        assert!(h.is_diagonal());
    }

    #[test]
    fn test_empty_clause_violated_everywhere() {
        let inst = CnfInstance::from_dimacs(2, &[vec![]]).unwrap();
        let h = embed_diagonal(&inst).unwrap();
        assert!(h.entries().iter().all(|&e| e == 1.0));
    }
}

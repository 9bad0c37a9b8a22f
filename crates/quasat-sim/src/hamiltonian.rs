//! Pauli-sum Hamiltonians.
//!
//! A Hamiltonian is a sum of weighted Pauli strings:
//!
//!   H = Σ_k  c_k · P_k
//!
//! where each P_k is a tensor product of single-qubit Pauli operators
//! (I, X, Y, Z) and c_k ∈ ℝ. Qubit `q` is bit `q` of a basis index.
//!
//! # Example
//!
//! ```rust
//! use quasat_sim::hamiltonian::{Hamiltonian, HamiltonianTerm, PauliOp, PauliString};
//!
//! // H = -1.0·Z₀Z₁  +  0.5·X₀
//! let h = Hamiltonian::from_terms(vec![
//!     HamiltonianTerm::new(-1.0, PauliString::from_ops(vec![(0, PauliOp::Z), (1, PauliOp::Z)])),
//!     HamiltonianTerm::new( 0.5, PauliString::from_ops(vec![(0, PauliOp::X)])),
//! ]);
//! assert_eq!(h.n_terms(), 2);
//! assert!(!h.is_diagonal());
//! ```

use std::collections::BTreeMap;
use std::fmt;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::dense::DenseOperator;
use crate::error::{SimError, SimResult};

/// Coefficients below this magnitude are dropped by [`Hamiltonian::simplify`].
pub const COEFF_EPSILON: f64 = 1e-12;

/// Single-qubit Pauli operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PauliOp {
    /// Identity.
    I,
    /// Pauli-X.
    X,
    /// Pauli-Y.
    Y,
    /// Pauli-Z.
    Z,
}

impl fmt::Display for PauliOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            PauliOp::I => 'I',
            PauliOp::X => 'X',
            PauliOp::Y => 'Y',
            PauliOp::Z => 'Z',
        };
        write!(f, "{c}")
    }
}

/// A tensor product of Pauli operators on indexed qubits.
///
/// Stored as a sorted `Vec<(qubit_index, PauliOp)>` with Identity terms
/// omitted. Qubits not listed are implicitly I. The ordering makes it usable
/// as a map key when collecting like terms.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PauliString {
    ops: Vec<(u32, PauliOp)>,
}

impl PauliString {
    /// The identity string.
    pub fn identity() -> Self {
        Self { ops: Vec::new() }
    }

    /// Construct a PauliString from an iterator of (qubit, op) pairs.
    ///
    /// Identity operators are dropped; the remaining ops are sorted by qubit.
    pub fn from_ops(ops: impl IntoIterator<Item = (u32, PauliOp)>) -> Self {
        let mut v: Vec<(u32, PauliOp)> = ops
            .into_iter()
            .filter(|(_, op)| *op != PauliOp::I)
            .collect();
        v.sort_by_key(|(q, _)| *q);
        Self { ops: v }
    }

    /// Construct a Z⊗Z⊗...⊗Z string spanning the given qubits.
    pub fn zz(qubits: impl IntoIterator<Item = u32>) -> Self {
        Self::from_ops(qubits.into_iter().map(|q| (q, PauliOp::Z)))
    }

    /// Return the non-identity (qubit, op) pairs, sorted by qubit index.
    pub fn ops(&self) -> &[(u32, PauliOp)] {
        &self.ops
    }

    /// True if there are no non-identity operators.
    pub fn is_identity(&self) -> bool {
        self.ops.is_empty()
    }

    /// True if every operator is Z (the string is diagonal in the
    /// computational basis).
    pub fn is_diagonal(&self) -> bool {
        self.ops.iter().all(|(_, op)| *op == PauliOp::Z)
    }

    /// The highest qubit index referenced, or `None` for an identity string.
    pub fn max_qubit(&self) -> Option<u32> {
        self.ops.last().map(|(q, _)| *q)
    }

    /// Bit mask of the qubits flipped by X and Y factors.
    fn flip_mask(&self) -> usize {
        self.ops
            .iter()
            .filter(|(_, op)| matches!(op, PauliOp::X | PauliOp::Y))
            .fold(0, |m, (q, _)| m | (1usize << q))
    }

    /// Phase picked up by basis state `x`: P|x⟩ = phase · |x ⊕ flip⟩.
    fn phase(&self, x: usize) -> Complex64 {
        let mut phase = Complex64::new(1.0, 0.0);
        for &(q, op) in &self.ops {
            let bit = (x >> q) & 1;
            match op {
                PauliOp::Z if bit == 1 => phase = -phase,
                // Y|0⟩ = i|1⟩, Y|1⟩ = −i|0⟩
                PauliOp::Y if bit == 0 => phase *= Complex64::new(0.0, 1.0),
                PauliOp::Y => phase *= Complex64::new(0.0, -1.0),
                _ => {}
            }
        }
        phase
    }
}

impl fmt::Display for PauliString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ops.is_empty() {
            return write!(f, "I");
        }
        for (i, (q, op)) in self.ops.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{op}{q}")?;
        }
        Ok(())
    }
}

/// A single weighted Pauli term: `coeff · pauli`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HamiltonianTerm {
    /// Real coefficient.
    pub coeff: f64,
    /// The Pauli string.
    pub pauli: PauliString,
}

impl HamiltonianTerm {
    /// Create a new term.
    pub fn new(coeff: f64, pauli: PauliString) -> Self {
        Self { coeff, pauli }
    }

    /// Shorthand: identity (constant offset) term.
    pub fn constant(coeff: f64) -> Self {
        Self::new(coeff, PauliString::identity())
    }

    /// Shorthand: single-qubit Z term.
    pub fn z(qubit: u32, coeff: f64) -> Self {
        Self::new(coeff, PauliString::from_ops([(qubit, PauliOp::Z)]))
    }

    /// Shorthand: ZZ coupling term.
    pub fn zz(q0: u32, q1: u32, coeff: f64) -> Self {
        Self::new(
            coeff,
            PauliString::from_ops([(q0, PauliOp::Z), (q1, PauliOp::Z)]),
        )
    }

    /// Shorthand: single-qubit X term.
    pub fn x(qubit: u32, coeff: f64) -> Self {
        Self::new(coeff, PauliString::from_ops([(qubit, PauliOp::X)]))
    }
}

impl fmt::Display for HamiltonianTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+.4} {}", self.coeff, self.pauli)
    }
}

/// A sum-of-Pauli-strings Hamiltonian.
///
/// H = Σ_k  c_k · P_k
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hamiltonian {
    terms: Vec<HamiltonianTerm>,
}

impl Hamiltonian {
    /// Create from a list of terms.
    pub fn from_terms(terms: Vec<HamiltonianTerm>) -> Self {
        Self { terms }
    }

    /// The transverse-field mixer −Σᵢ Xᵢ on `n` qubits.
    ///
    /// Its ground state is the uniform superposition with energy `−n`.
    pub fn transverse_field(n: usize) -> Self {
        (0..n as u32).map(|q| HamiltonianTerm::x(q, -1.0)).collect()
    }

    /// All terms.
    pub fn terms(&self) -> &[HamiltonianTerm] {
        &self.terms
    }

    /// Number of terms.
    pub fn n_terms(&self) -> usize {
        self.terms.len()
    }

    /// The minimum number of qubits required to represent this Hamiltonian.
    ///
    /// Returns 0 if the Hamiltonian is empty or purely identity.
    pub fn min_qubits(&self) -> u32 {
        self.terms
            .iter()
            .filter_map(|t| t.pauli.max_qubit())
            .max()
            .map_or(0, |q| q + 1)
    }

    /// Coefficient of the identity string (after summing duplicates).
    pub fn constant(&self) -> f64 {
        self.terms
            .iter()
            .filter(|t| t.pauli.is_identity())
            .map(|t| t.coeff)
            .sum()
    }

    /// True if every term is a product of Z operators.
    pub fn is_diagonal(&self) -> bool {
        self.terms.iter().all(|t| t.pauli.is_diagonal())
    }

    /// Combine like terms and drop near-zero coefficients.
    ///
    /// The result is ordered by Pauli string, identity first.
    pub fn simplify(&self) -> Self {
        let mut acc: BTreeMap<PauliString, f64> = BTreeMap::new();
        for t in &self.terms {
            *acc.entry(t.pauli.clone()).or_insert(0.0) += t.coeff;
        }
        acc.into_iter()
            .filter(|(_, c)| c.abs() > COEFF_EPSILON)
            .map(|(p, c)| HamiltonianTerm::new(c, p))
            .collect()
    }

    fn check_qubits(&self, n_qubits: usize) -> SimResult<()> {
        let needed = self.min_qubits() as usize;
        if needed > n_qubits {
            return Err(SimError::InvalidArgument(format!(
                "Hamiltonian acts on {needed} qubits but the register has {n_qubits}"
            )));
        }
        Ok(())
    }

    /// Compute `H·ψ` matrix-free.
    pub fn apply(&self, psi: &[Complex64]) -> SimResult<Vec<Complex64>> {
        let dim = psi.len();
        if !dim.is_power_of_two() {
            return Err(SimError::InvalidArgument(format!(
                "state length {dim} is not a power of two"
            )));
        }
        self.check_qubits(dim.trailing_zeros() as usize)?;

        let mut out = vec![Complex64::new(0.0, 0.0); dim];
        for term in &self.terms {
            let flip = term.pauli.flip_mask();
            for (x, amp) in psi.iter().enumerate() {
                out[x ^ flip] += term.coeff * term.pauli.phase(x) * *amp;
            }
        }
        Ok(out)
    }

    /// The computational-basis diagonal of a Z-only Hamiltonian.
    pub fn diagonal(&self, n_qubits: usize) -> SimResult<Vec<f64>> {
        if !self.is_diagonal() {
            return Err(SimError::InvalidArgument(
                "Hamiltonian has off-diagonal Pauli terms".into(),
            ));
        }
        self.check_qubits(n_qubits)?;
        let diag = (0..1usize << n_qubits)
            .map(|x| {
                self.terms
                    .iter()
                    .map(|t| t.coeff * t.pauli.phase(x).re)
                    .sum()
            })
            .collect();
        Ok(diag)
    }

    /// Dense real matrix over `n_qubits`.
    ///
    /// Terms containing Y are rejected since their matrices are imaginary.
    pub fn to_dense(&self, n_qubits: usize) -> SimResult<DenseOperator> {
        if self
            .terms
            .iter()
            .any(|t| t.pauli.ops().iter().any(|(_, op)| *op == PauliOp::Y))
        {
            return Err(SimError::InvalidArgument(
                "Pauli-Y terms have no real dense representation".into(),
            ));
        }
        self.check_qubits(n_qubits)?;
        let mut op = DenseOperator::zeros(n_qubits)?;
        let dim = op.dim();
        for term in &self.terms {
            let flip = term.pauli.flip_mask();
            for x in 0..dim {
                op.add_entry(x ^ flip, x, term.coeff * term.pauli.phase(x).re);
            }
        }
        Ok(op)
    }
}

impl FromIterator<HamiltonianTerm> for Hamiltonian {
    fn from_iter<T: IntoIterator<Item = HamiltonianTerm>>(iter: T) -> Self {
        Self {
            terms: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Hamiltonian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "0");
        }
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{term}")?;
        }
        Ok(())
    }
}

//! Exact ground states by symmetric eigen-decomposition.

use std::cmp::Ordering;

use nalgebra::SymmetricEigen;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::dense::DenseOperator;
use crate::embedding::DiagonalHamiltonian;
use crate::error::{SimError, SimResult};

/// Eigenvalues within this distance of the minimum count as ground states.
pub const DEGENERACY_TOL: f64 = 1e-8;

/// Sweep cap per matrix dimension before declaring non-convergence.
const SWEEPS_PER_DIM: usize = 1000;

/// Ground energy and an orthonormal basis of the ground eigenspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundState {
    /// Lowest eigenvalue.
    pub energy: f64,
    /// Orthonormal real basis of the ground eigenspace.
    pub basis: Vec<Vec<f64>>,
    /// Next distinct eigenvalue above the ground energy, if any.
    pub first_excited: Option<f64>,
}

impl GroundState {
    /// Ground space of a diagonal Hamiltonian: the minimising basis states.
    pub fn from_diagonal(h: &DiagonalHamiltonian) -> Self {
        let energy = h.ground_energy();
        let basis = h
            .ground_states()
            .into_iter()
            .map(|x| {
                let mut v = vec![0.0; h.dim()];
                v[x] = 1.0;
                v
            })
            .collect();
        let first_excited = h
            .entries()
            .iter()
            .copied()
            .filter(|e| *e > energy + DEGENERACY_TOL)
            .min_by(f64::total_cmp);
        Self {
            energy,
            basis,
            first_excited,
        }
    }

    /// Dimension of the ground eigenspace.
    pub fn degeneracy(&self) -> usize {
        self.basis.len()
    }

    /// Spectral gap above the ground space.
    pub fn gap(&self) -> Option<f64> {
        self.first_excited.map(|e| e - self.energy)
    }

    /// Σ_k |⟨v_k|ψ⟩|² over the ground basis.
    pub fn overlap(&self, psi: &[Complex64]) -> SimResult<f64> {
        ground_space_overlap(psi, &self.basis)
    }
}

/// Diagonalise `op` and return its ground space.
pub fn ground_state(op: &DenseOperator) -> SimResult<GroundState> {
    let dim = op.dim();
    let eigen = SymmetricEigen::try_new(op.matrix().clone(), f64::EPSILON, SWEEPS_PER_DIM * dim)
        .ok_or_else(|| {
            SimError::NumericalFailure(format!(
                "symmetric eigen-decomposition of a {dim}×{dim} matrix did not converge"
            ))
        })?;

    let mut order: Vec<usize> = (0..eigen.eigenvalues.len()).collect();
    order.sort_by(|&a, &b| {
        eigen.eigenvalues[a]
            .partial_cmp(&eigen.eigenvalues[b])
            .unwrap_or(Ordering::Equal)
    });

    let Some(&lowest) = order.first() else {
        return Err(SimError::InvalidArgument("empty operator".into()));
    };
    let energy = eigen.eigenvalues[lowest];
    if !energy.is_finite() {
        return Err(SimError::NumericalFailure(format!(
            "non-finite ground energy {energy}"
        )));
    }

    let mut basis = Vec::new();
    let mut first_excited = None;
    for &i in &order {
        let value = eigen.eigenvalues[i];
        if value - energy <= DEGENERACY_TOL {
            basis.push(eigen.eigenvectors.column(i).iter().copied().collect());
        } else {
            first_excited = Some(value);
            break;
        }
    }

    Ok(GroundState {
        energy,
        basis,
        first_excited,
    })
}

/// Σ_k |⟨v_k|ψ⟩|² for an orthonormal real basis `{v_k}`.
pub fn ground_space_overlap(psi: &[Complex64], basis: &[Vec<f64>]) -> SimResult<f64> {
    let mut total = 0.0;
    for v in basis {
        if v.len() != psi.len() {
            return Err(SimError::DimensionMismatch {
                expected: v.len(),
                actual: psi.len(),
            });
        }
        let amp: Complex64 = v.iter().zip(psi).map(|(c, a)| *c * *a).sum();
        total += amp.norm_sqr();
    }
    Ok(total)
}

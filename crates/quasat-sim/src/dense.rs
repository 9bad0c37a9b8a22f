//! Dense real-symmetric operators over a qubit register.
//!
//! Row and column `x` correspond to the computational basis state whose bit
//! `q` is the value of qubit `q`. Memory is O(4^n), so construction is capped
//! at [`MAX_DENSE_QUBITS`].

use nalgebra::DMatrix;
use num_complex::Complex64;

use crate::error::{SimError, SimResult};

/// Largest register accepted for `2^n × 2^n` matrices.
pub const MAX_DENSE_QUBITS: usize = 12;

/// Largest register accepted for diagonals and state vectors.
pub const MAX_QUBITS: usize = 24;

fn check_limit(n_qubits: usize, max: usize) -> SimResult<()> {
    if n_qubits > max {
        return Err(SimError::TooManyQubits { n_qubits, max });
    }
    Ok(())
}

/// Check that `n_qubits` is within the dense-matrix limit.
pub fn check_dense_qubits(n_qubits: usize) -> SimResult<()> {
    check_limit(n_qubits, MAX_DENSE_QUBITS)
}

/// Check that `n_qubits` is within the state-vector limit.
pub fn check_qubits(n_qubits: usize) -> SimResult<()> {
    check_limit(n_qubits, MAX_QUBITS)
}

/// A `2^n × 2^n` real matrix acting on `n` qubits.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseOperator {
    n_qubits: usize,
    matrix: DMatrix<f64>,
}

impl DenseOperator {
    /// The zero operator.
    pub fn zeros(n_qubits: usize) -> SimResult<Self> {
        check_dense_qubits(n_qubits)?;
        let dim = 1usize << n_qubits;
        Ok(Self {
            n_qubits,
            matrix: DMatrix::zeros(dim, dim),
        })
    }

    /// The identity operator.
    pub fn identity(n_qubits: usize) -> SimResult<Self> {
        check_dense_qubits(n_qubits)?;
        let dim = 1usize << n_qubits;
        Ok(Self {
            n_qubits,
            matrix: DMatrix::identity(dim, dim),
        })
    }

    /// Single-qubit projector onto `|bit⟩`.
    pub fn projector(bit: bool) -> Self {
        let mut matrix = DMatrix::zeros(2, 2);
        let i = usize::from(bit);
        matrix[(i, i)] = 1.0;
        Self {
            n_qubits: 1,
            matrix,
        }
    }

    /// Diagonal operator with the given entries.
    pub fn from_diagonal(diag: &[f64]) -> SimResult<Self> {
        let dim = diag.len();
        if !dim.is_power_of_two() {
            return Err(SimError::InvalidArgument(format!(
                "diagonal length {dim} is not a power of two"
            )));
        }
        let n_qubits = dim.trailing_zeros() as usize;
        check_dense_qubits(n_qubits)?;
        Ok(Self {
            n_qubits,
            matrix: DMatrix::from_diagonal(&nalgebra::DVector::from_column_slice(diag)),
        })
    }

    /// Tensor product `self ⊗ rhs`; `rhs` occupies the low qubits.
    pub fn kron(&self, rhs: &Self) -> SimResult<Self> {
        let n_qubits = self.n_qubits + rhs.n_qubits;
        check_dense_qubits(n_qubits)?;
        Ok(Self {
            n_qubits,
            matrix: self.matrix.kronecker(&rhs.matrix),
        })
    }

    /// Build `O_{n-1} ⊗ … ⊗ O_0` where `factors[q]` acts on qubit `q`.
    pub fn tensor_product(factors: &[DenseOperator]) -> SimResult<Self> {
        check_dense_qubits(factors.len())?;
        let mut acc = Self {
            n_qubits: 0,
            matrix: DMatrix::identity(1, 1),
        };
        for factor in factors {
            acc = factor.kron(&acc)?;
        }
        Ok(acc)
    }

    /// Number of qubits.
    pub fn n_qubits(&self) -> usize {
        self.n_qubits
    }

    /// Matrix dimension `2^n`.
    pub fn dim(&self) -> usize {
        self.matrix.nrows()
    }

    /// Underlying matrix.
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    /// Entry at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.matrix[(row, col)]
    }

    pub(crate) fn add_entry(&mut self, row: usize, col: usize, value: f64) {
        self.matrix[(row, col)] += value;
    }

    /// In-place `self += rhs`.
    pub fn add_assign(&mut self, rhs: &Self) -> SimResult<()> {
        self.check_dim(rhs.dim())?;
        self.matrix += &rhs.matrix;
        Ok(())
    }

    /// `(1 − s)·a + s·b`.
    pub fn interpolate(a: &Self, b: &Self, s: f64) -> SimResult<Self> {
        a.check_dim(b.dim())?;
        Ok(Self {
            n_qubits: a.n_qubits,
            matrix: &a.matrix * (1.0 - s) + &b.matrix * s,
        })
    }

    /// The main diagonal.
    pub fn diagonal(&self) -> Vec<f64> {
        self.matrix.diagonal().iter().copied().collect()
    }

    /// True if every off-diagonal entry is exactly zero.
    pub fn is_diagonal(&self) -> bool {
        let dim = self.dim();
        (0..dim).all(|r| (0..dim).all(|c| r == c || self.matrix[(r, c)] == 0.0))
    }

    /// Compute `M·ψ` for a complex state.
    pub fn apply(&self, psi: &[Complex64]) -> SimResult<Vec<Complex64>> {
        self.check_dim(psi.len())?;
        let dim = self.dim();
        let mut out = vec![Complex64::new(0.0, 0.0); dim];
        for (r, o) in out.iter_mut().enumerate() {
            for (c, amp) in psi.iter().enumerate() {
                let m = self.matrix[(r, c)];
                if m != 0.0 {
                    *o += m * *amp;
                }
            }
        }
        Ok(out)
    }

    fn check_dim(&self, actual: usize) -> SimResult<()> {
        if actual != self.dim() {
            return Err(SimError::DimensionMismatch {
                expected: self.dim(),
                actual,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projector_kron_places_low_qubit_last() {
        // P1 on qubit 0, identity on qubit 1: selects odd basis indices.
        let id = DenseOperator::identity(1).unwrap();
        let op = DenseOperator::tensor_product(&[DenseOperator::projector(true), id]).unwrap();
        assert_eq!(op.diagonal(), vec![0.0, 1.0, 0.0, 1.0]);
        assert!(op.is_diagonal());
    }

    #[test]
    fn test_too_many_qubits() {
        let err = DenseOperator::zeros(MAX_DENSE_QUBITS + 1).unwrap_err();
        assert!(matches!(err, SimError::TooManyQubits { .. }));
    }

    #[test]
    fn test_from_diagonal_rejects_bad_length() {
        assert!(DenseOperator::from_diagonal(&[1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn test_interpolate_endpoints() {
        let a = DenseOperator::from_diagonal(&[1.0, 2.0]).unwrap();
        let b = DenseOperator::from_diagonal(&[5.0, 7.0]).unwrap();
        assert_eq!(DenseOperator::interpolate(&a, &b, 0.0).unwrap(), a);
        assert_eq!(DenseOperator::interpolate(&a, &b, 1.0).unwrap(), b);
    }

    #[test]
    fn test_apply_dimension_mismatch() {
        let a = DenseOperator::identity(2).unwrap();
        let err = a.apply(&[Complex64::new(1.0, 0.0)]).unwrap_err();
        assert!(matches!(
            err,
            SimError::DimensionMismatch {
                expected: 4,
                actual: 1
            }
        ));
    }
}

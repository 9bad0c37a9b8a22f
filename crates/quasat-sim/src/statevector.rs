//! Statevector over a qubit register.

use std::collections::BTreeMap;

use num_complex::Complex64;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::dense::check_qubits;
use crate::error::{SimError, SimResult};

/// A statevector representing a quantum state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl Statevector {
    /// The uniform superposition |+⟩^⊗n, ground state of −Σ Xᵢ.
    pub fn uniform(num_qubits: usize) -> SimResult<Self> {
        check_qubits(num_qubits)?;
        let size = 1usize << num_qubits;
        let amp = Complex64::new(1.0 / (size as f64).sqrt(), 0.0);
        Ok(Self {
            amplitudes: vec![amp; size],
            num_qubits,
        })
    }

    /// Wrap raw amplitudes; the length must be a power of two.
    pub fn from_amplitudes(amplitudes: Vec<Complex64>) -> SimResult<Self> {
        let size = amplitudes.len();
        if !size.is_power_of_two() {
            return Err(SimError::InvalidArgument(format!(
                "state length {size} is not a power of two"
            )));
        }
        let num_qubits = size.trailing_zeros() as usize;
        check_qubits(num_qubits)?;
        Ok(Self {
            amplitudes,
            num_qubits,
        })
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Hilbert-space dimension.
    pub fn dim(&self) -> usize {
        self.amplitudes.len()
    }

    /// Amplitudes indexed by basis state.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Consume into the amplitude vector.
    pub fn into_amplitudes(self) -> Vec<Complex64> {
        self.amplitudes
    }

    /// Rx(θ) = exp(−iθX/2) on one qubit.
    pub fn apply_rx(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        let neg_i_s = Complex64::new(0.0, -s);
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = c * a + neg_i_s * b;
                self.amplitudes[j] = neg_i_s * a + c * b;
            }
        }
    }

    /// exp(−iβ Σ Xᵢ) as Rx(2β) on every qubit.
    pub fn apply_mixer(&mut self, beta: f64) {
        for q in 0..self.num_qubits {
            self.apply_rx(q, 2.0 * beta);
        }
    }

    /// exp(−iγ H) for a diagonal H.
    pub fn apply_diagonal_phase(&mut self, diagonal: &[f64], gamma: f64) -> SimResult<()> {
        if diagonal.len() != self.amplitudes.len() {
            return Err(SimError::DimensionMismatch {
                expected: self.amplitudes.len(),
                actual: diagonal.len(),
            });
        }
        for (amp, e) in self.amplitudes.iter_mut().zip(diagonal) {
            *amp *= Complex64::from_polar(1.0, -gamma * e);
        }
        Ok(())
    }

    /// ‖ψ‖.
    pub fn norm(&self) -> f64 {
        norm(&self.amplitudes)
    }

    /// Measurement probabilities in the computational basis.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|a| a.norm_sqr()).collect()
    }

    /// Sample one measurement outcome.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let r: f64 = rng.r#gen();

        let mut cumulative = 0.0;
        for (i, amp) in self.amplitudes.iter().enumerate() {
            cumulative += amp.norm_sqr();
            if r < cumulative {
                return i;
            }
        }

        // Round-off can leave the cumulative sum just below 1.
        self.amplitudes.len() - 1
    }

    /// Histogram of `shots` measurement outcomes.
    pub fn sample_counts<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        shots: usize,
    ) -> BTreeMap<usize, usize> {
        let mut counts = BTreeMap::new();
        for _ in 0..shots {
            *counts.entry(self.sample(rng)).or_insert(0) += 1;
        }
        counts
    }

    /// Convert measurement outcome to bitstring, qubit 0 first.
    pub fn outcome_to_bitstring(&self, outcome: usize) -> String {
        format!("{:0width$b}", outcome, width = self.num_qubits)
            .chars()
            .rev()
            .collect()
    }
}

/// ‖ψ‖ of a raw amplitude slice.
pub fn norm(amplitudes: &[Complex64]) -> f64 {
    amplitudes.iter().map(|a| a.norm_sqr()).sum::<f64>().sqrt()
}

/// ⟨a|b⟩.
pub fn inner_product(a: &[Complex64], b: &[Complex64]) -> Complex64 {
    a.iter().zip(b).map(|(x, y)| x.conj() * *y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dense::MAX_QUBITS;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::f64::consts::PI;

    fn basis_state(n: usize, x: usize) -> Statevector {
        let mut amps = vec![Complex64::new(0.0, 0.0); 1 << n];
        amps[x] = Complex64::new(1.0, 0.0);
        Statevector::from_amplitudes(amps).unwrap()
    }

    #[test]
    fn test_uniform_amplitudes() {
        let u = Statevector::uniform(3).unwrap();
        assert_eq!(u.dim(), 8);
        for a in u.amplitudes() {
            assert!((*a - Complex64::new(8f64.sqrt().recip(), 0.0)).norm() < 1e-12);
        }
        assert!(Statevector::uniform(MAX_QUBITS + 1).is_err());
    }

    #[test]
    fn test_rx_pi_is_x_up_to_phase() {
        let mut sv = basis_state(2, 0);
        sv.apply_rx(1, PI);
        let p = sv.probabilities();
        assert!((p[2] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_mixer_leaves_uniform_invariant() {
        let mut sv = Statevector::uniform(2).unwrap();
        sv.apply_mixer(0.37);
        // Eigenstate of ΣX: only a global phase is picked up.
        for p in sv.probabilities() {
            assert!((p - 0.25).abs() < 1e-12);
        }
    }

    #[test]
    fn test_diagonal_phase_preserves_probabilities() {
        let mut sv = Statevector::uniform(2).unwrap();
        sv.apply_diagonal_phase(&[0.0, 1.0, 2.0, 3.0], 0.8).unwrap();
        assert!((sv.norm() - 1.0).abs() < 1e-12);
        assert!(sv.apply_diagonal_phase(&[0.0], 1.0).is_err());
    }

    #[test]
    fn test_sample_deterministic_state() {
        let sv = basis_state(3, 0b101);
        let mut rng = StdRng::seed_from_u64(1);
        let counts = sv.sample_counts(&mut rng, 50);
        assert_eq!(counts.get(&0b101), Some(&50));
        assert_eq!(sv.outcome_to_bitstring(0b101), "101");
        assert_eq!(sv.outcome_to_bitstring(0b001), "100");
    }

    #[test]
    fn test_from_amplitudes_rejects_bad_length() {
        let err = Statevector::from_amplitudes(vec![Complex64::new(1.0, 0.0); 3]).unwrap_err();
        assert!(matches!(err, SimError::InvalidArgument(_)));
    }
}

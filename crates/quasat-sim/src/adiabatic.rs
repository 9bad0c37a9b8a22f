//! Adiabatic evolution from the transverse-field mixer to a SAT Hamiltonian.
//!
//! H(t) = (1 − s(t))·H₀ + s(t)·H₁ with H₀ = −Σᵢ Xᵢ and H₁ the diagonal
//! clause-violation Hamiltonian. The Schrödinger equation
//! `dψ/dt = −i H(t) ψ` is integrated from the uniform superposition (the
//! ground state of H₀) over the schedule's duration. At sampled times the
//! simulated energy ⟨ψ|H(t)|ψ⟩ is recorded next to the exact instantaneous
//! ground energy from dense diagonalisation.
//!
//! # Example
//!
//! ```rust
//! use quasat_cnf::CnfInstance;
//! use quasat_sim::adiabatic::AdiabaticEvolution;
//! use quasat_sim::embedding::embed_diagonal;
//! use quasat_sim::schedule::LinearRamp;
//!
//! let inst = CnfInstance::from_dimacs(2, &[vec![1, 2], vec![-1, 2]]).unwrap();
//! let h1 = embed_diagonal(&inst).unwrap();
//! let traj = AdiabaticEvolution::new(h1, LinearRamp::new(0.1).unwrap())
//!     .run()
//!     .unwrap();
//! assert!(traj.final_gap < 0.5);
//! ```

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::dense::{DenseOperator, check_dense_qubits};
use crate::embedding::DiagonalHamiltonian;
use crate::error::{SimError, SimResult};
use crate::hamiltonian::Hamiltonian;
use crate::integrator::{Integrator, RungeKutta4};
use crate::schedule::Schedule;
use crate::spectrum::{GroundState, ground_state};
use crate::statevector::{Statevector, inner_product, norm};

/// Default number of integration steps between recorded samples.
pub const DEFAULT_SAMPLE_EVERY: usize = 10;

/// One recorded point along the trajectory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionSample {
    /// Time t.
    pub time: f64,
    /// Schedule value s(t).
    pub s: f64,
    /// ⟨ψ(t)|H(t)|ψ(t)⟩.
    pub expectation: f64,
    /// Exact ground energy of H(t).
    pub ground_energy: f64,
    /// Gap between the two lowest distinct levels of H(t).
    pub spectral_gap: Option<f64>,
    /// ‖ψ(t)‖.
    pub norm: f64,
}

/// Result of an adiabatic run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionTrajectory {
    pub n_qubits: usize,
    /// Total evolution time T.
    pub duration: f64,
    /// Number of integration steps taken.
    pub steps: usize,
    /// Step size actually used (T / steps).
    pub dt: f64,
    pub samples: Vec<EvolutionSample>,
    /// State at t = T.
    pub final_state: Statevector,
    /// ⟨ψ(T)|H₁|ψ(T)⟩.
    pub final_expectation: f64,
    /// Exact ground energy of H₁.
    pub ground_energy: f64,
    /// `final_expectation − ground_energy`.
    pub final_gap: f64,
    /// Probability mass of ψ(T) on the ground space of H₁.
    pub ground_fidelity: f64,
}

impl EvolutionTrajectory {
    /// `(time, expectation, ground_energy)` series for plotting.
    pub fn energy_series(&self) -> Vec<(f64, f64, f64)> {
        self.samples
            .iter()
            .map(|p| (p.time, p.expectation, p.ground_energy))
            .collect()
    }

    /// Largest |‖ψ‖ − 1| over the recorded samples.
    pub fn max_norm_deviation(&self) -> f64 {
        self.samples
            .iter()
            .map(|p| (p.norm - 1.0).abs())
            .fold(0.0, f64::max)
    }

    /// Smallest instantaneous spectral gap seen at the sampled times.
    pub fn min_spectral_gap(&self) -> Option<f64> {
        self.samples
            .iter()
            .filter_map(|p| p.spectral_gap)
            .min_by(f64::total_cmp)
    }
}

/// Adiabatic evolution driver.
#[derive(Debug, Clone)]
pub struct AdiabaticEvolution<S, I = RungeKutta4> {
    problem: DiagonalHamiltonian,
    mixer: Hamiltonian,
    schedule: S,
    integrator: I,
    sample_every: usize,
}

impl<S: Schedule> AdiabaticEvolution<S, RungeKutta4> {
    /// Evolve toward `problem` under `schedule` with the default RK4 step.
    pub fn new(problem: DiagonalHamiltonian, schedule: S) -> Self {
        let mixer = Hamiltonian::transverse_field(problem.n_qubits());
        Self {
            problem,
            mixer,
            schedule,
            integrator: RungeKutta4::default(),
            sample_every: DEFAULT_SAMPLE_EVERY,
        }
    }
}

impl<S: Schedule, I: Integrator> AdiabaticEvolution<S, I> {
    /// Swap the integrator.
    pub fn with_integrator<J: Integrator>(self, integrator: J) -> AdiabaticEvolution<S, J> {
        AdiabaticEvolution {
            problem: self.problem,
            mixer: self.mixer,
            schedule: self.schedule,
            integrator,
            sample_every: self.sample_every,
        }
    }

    /// Record a sample every `every` steps (the endpoints are always kept).
    pub fn with_sample_every(mut self, every: usize) -> Self {
        self.sample_every = every;
        self
    }

    /// `H(s)·ψ` applied matrix-free.
    fn apply_h(&self, s: f64, psi: &[Complex64]) -> SimResult<Vec<Complex64>> {
        let h0 = self.mixer.apply(psi)?;
        let h1 = self.problem.apply(psi)?;
        Ok(h0
            .into_iter()
            .zip(h1)
            .map(|(a, b)| (1.0 - s) * a + s * b)
            .collect())
    }

    fn sample(
        &self,
        t: f64,
        psi: &[Complex64],
        h0: &DenseOperator,
        h1: &DenseOperator,
    ) -> SimResult<EvolutionSample> {
        let s = self.schedule.s(t);
        let h_psi = self.apply_h(s, psi)?;
        let expectation = inner_product(psi, &h_psi).re;
        let exact = ground_state(&DenseOperator::interpolate(h0, h1, s)?)?;
        let sample = EvolutionSample {
            time: t,
            s,
            expectation,
            ground_energy: exact.energy,
            spectral_gap: exact.gap(),
            norm: norm(psi),
        };
        debug!(
            t = sample.time,
            s = sample.s,
            energy = sample.expectation,
            ground = sample.ground_energy,
            "adiabatic sample"
        );
        Ok(sample)
    }

    /// Integrate over the full schedule.
    pub fn run(&self) -> SimResult<EvolutionTrajectory> {
        let n = self.problem.n_qubits();
        check_dense_qubits(n)?;
        if self.sample_every == 0 {
            return Err(SimError::InvalidArgument(
                "sample interval must be at least one step".into(),
            ));
        }

        let duration = self.schedule.duration();
        let nominal = self.integrator.step_size();
        let steps = ((duration / nominal).ceil() as usize).max(1);
        let dt = duration / steps as f64;
        info!(n_qubits = n, duration, steps, dt, "starting adiabatic evolution");

        let h0 = self.mixer.to_dense(n)?;
        let h1 = self.problem.to_dense()?;

        let mut psi = Statevector::uniform(n)?.into_amplitudes();
        let mut field = |t: f64, p: &[Complex64]| -> SimResult<Vec<Complex64>> {
            let hp = self.apply_h(self.schedule.s(t), p)?;
            Ok(hp.into_iter().map(|a| Complex64::new(a.im, -a.re)).collect())
        };

        let mut samples = vec![self.sample(0.0, &psi, &h0, &h1)?];
        for k in 0..steps {
            let t = k as f64 * dt;
            self.integrator.step(&mut field, t, dt, &mut psi)?;
            let done = k + 1;
            if done % self.sample_every == 0 || done == steps {
                samples.push(self.sample(done as f64 * dt, &psi, &h0, &h1)?);
            }
        }

        let final_expectation = self.problem.expectation(&psi)?;
        let target = GroundState::from_diagonal(&self.problem);
        let ground_fidelity = target.overlap(&psi)?;
        let final_state = Statevector::from_amplitudes(psi)?;
        let trajectory = EvolutionTrajectory {
            n_qubits: n,
            duration,
            steps,
            dt,
            samples,
            final_state,
            final_expectation,
            ground_energy: target.energy,
            final_gap: final_expectation - target.energy,
            ground_fidelity,
        };
        info!(
            final_energy = trajectory.final_expectation,
            ground_energy = trajectory.ground_energy,
            gap = trajectory.final_gap,
            fidelity = trajectory.ground_fidelity,
            "adiabatic evolution finished"
        );
        Ok(trajectory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::LinearRamp;
    use approx::assert_abs_diff_eq;

    fn single_clause() -> DiagonalHamiltonian {
        DiagonalHamiltonian::new(vec![1.0, 0.0]).unwrap()
    }

    #[test]
    fn test_first_sample_is_mixer_ground_state() {
        let traj = AdiabaticEvolution::new(single_clause(), LinearRamp::new(1.0).unwrap())
            .run()
            .unwrap();
        let first = &traj.samples[0];
        assert_eq!(first.time, 0.0);
        assert_abs_diff_eq!(first.expectation, -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(first.ground_energy, -1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_sampling_cadence() {
        let traj = AdiabaticEvolution::new(single_clause(), LinearRamp::new(1.0).unwrap())
            .with_integrator(RungeKutta4::new(0.1).unwrap())
            .with_sample_every(3)
            .run()
            .unwrap();
        assert_eq!(traj.steps, 10);
        // t = 0, steps 3, 6, 9 and the final step.
        assert_eq!(traj.samples.len(), 5);
        assert_abs_diff_eq!(traj.samples.last().unwrap().time, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(traj.samples.last().unwrap().s, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_sample_interval_rejected() {
        let err = AdiabaticEvolution::new(single_clause(), LinearRamp::new(1.0).unwrap())
            .with_sample_every(0)
            .run()
            .unwrap_err();
        assert!(matches!(err, SimError::InvalidArgument(_)));
    }
}

//! QAOA for the clause-violation Hamiltonian.
//!
//! With p layers and angles (α₁, β₁, …, α_p, β_p) the ansatz state is
//!
//!   |ψ⟩ = Π_l exp(−iβ_l B) · exp(−iα_l H₁) |+⟩^⊗n,   B = Σᵢ Xᵢ
//!
//! H₁ is diagonal, so its evolution is a per-basis-state phase; the mixer is
//! Rx(2β) on every qubit. [`QaoaRunner`] minimises ⟨ψ|H₁|ψ⟩ over the box
//! [0, 2π]^{2p} with a [`BoundedSimplex`].

use std::f64::consts::{PI, TAU};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::embedding::DiagonalHamiltonian;
use crate::error::{SimError, SimResult};
use crate::optimizer::{BoundedSimplex, Optimizer};
use crate::spectrum::GroundState;
use crate::statevector::Statevector;

/// Total evolution time spread over the layers of the initial guess.
const INITIAL_RAMP_TIME: f64 = 0.75;

/// Prepare the QAOA state for interleaved `angles`.
pub fn qaoa_state(problem: &DiagonalHamiltonian, angles: &[f64]) -> SimResult<Statevector> {
    if angles.len() % 2 != 0 {
        return Err(SimError::InvalidArgument(format!(
            "QAOA needs an even number of angles, got {}",
            angles.len()
        )));
    }
    let mut state = Statevector::uniform(problem.n_qubits())?;
    for layer in angles.chunks_exact(2) {
        state.apply_diagonal_phase(problem.entries(), layer[0])?;
        state.apply_mixer(layer[1]);
    }
    Ok(state)
}

/// ⟨ψ(angles)|H₁|ψ(angles)⟩.
pub fn qaoa_expectation(problem: &DiagonalHamiltonian, angles: &[f64]) -> SimResult<f64> {
    let state = qaoa_state(problem, angles)?;
    problem.expectation(state.amplitudes())
}

/// Angles of a Trotterised linear ramp from −ΣX to H₁.
///
/// Layer l takes s = l/(p+1); the mixer angle is shifted by π because the
/// ansatz evolves under +ΣX while the ramp starts from −ΣX.
pub fn ramp_angles(p: usize) -> Vec<f64> {
    (1..=p)
        .flat_map(|l| {
            let s = l as f64 / (p + 1) as f64;
            [s * INITIAL_RAMP_TIME, PI - (1.0 - s) * INITIAL_RAMP_TIME]
        })
        .collect()
}

/// Result of a QAOA run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaoaResult {
    /// Number of layers.
    pub layers: usize,
    /// Minimised ⟨H₁⟩.
    pub expectation: f64,
    /// Exact ground energy of H₁.
    pub ground_energy: f64,
    /// Σ over the ground eigenspace of |⟨g|ψ⟩|².
    pub ground_overlap: f64,
    /// Optimal angles (α₁, β₁, …, α_p, β_p).
    pub optimal_angles: Vec<f64>,
    /// Most probable basis state of the optimised ansatz.
    pub most_likely: usize,
    /// Energy of `most_likely`.
    pub most_likely_energy: f64,
    /// Objective evaluations summed over restarts.
    pub num_evaluations: usize,
    /// Optimizer iterations of the winning restart.
    pub num_iterations: usize,
    /// Best energy after each improvement in the winning restart.
    pub energy_history: Vec<f64>,
    /// Whether the winning restart converged.
    pub converged: bool,
    /// Restarts performed.
    pub restarts: usize,
}

impl QaoaResult {
    /// `expectation − ground_energy`.
    pub fn gap(&self) -> f64 {
        self.expectation - self.ground_energy
    }
}

/// QAOA runner configuration.
#[derive(Debug, Clone)]
pub struct QaoaRunner {
    problem: DiagonalHamiltonian,
    /// Number of QAOA layers.
    pub p: usize,
    /// Maximum optimization iterations per restart.
    pub maxiter: usize,
    /// Optimizer convergence tolerance.
    pub tol: f64,
    /// Number of optimizer starts; the first uses [`ramp_angles`].
    pub restarts: usize,
    /// Seed for the random restarts.
    pub seed: u64,
}

impl QaoaRunner {
    /// Create a new QAOA runner.
    pub fn new(problem: DiagonalHamiltonian) -> Self {
        Self {
            problem,
            p: 1,
            maxiter: 200,
            tol: 1e-6,
            restarts: 1,
            seed: 42,
        }
    }

    /// Set the number of QAOA layers.
    pub fn with_layers(mut self, p: usize) -> Self {
        self.p = p;
        self
    }

    /// Set maximum iterations.
    pub fn with_maxiter(mut self, maxiter: usize) -> Self {
        self.maxiter = maxiter;
        self
    }

    /// Set convergence tolerance.
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Set the number of starts.
    pub fn with_restarts(mut self, restarts: usize) -> Self {
        self.restarts = restarts;
        self
    }

    /// Set the seed for random restarts.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Get the number of parameters needed.
    pub fn num_parameters(&self) -> usize {
        2 * self.p
    }

    fn optimizer(&self) -> BoundedSimplex {
        BoundedSimplex::new()
            .with_maxiter(self.maxiter)
            .with_tol(self.tol)
    }

    /// Run from the ramp guess, then from `restarts − 1` random points.
    pub fn run(&self) -> SimResult<QaoaResult> {
        if self.p == 0 {
            return Err(SimError::InvalidArgument(
                "QAOA needs at least one layer".into(),
            ));
        }
        if self.restarts == 0 {
            return Err(SimError::InvalidArgument(
                "QAOA needs at least one start".into(),
            ));
        }

        info!(
            n_qubits = self.problem.n_qubits(),
            layers = self.p,
            restarts = self.restarts,
            "starting QAOA"
        );
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut best: Option<QaoaResult> = None;
        let mut total_evaluations = 0;

        for restart in 0..self.restarts {
            let initial = if restart == 0 {
                ramp_angles(self.p)
            } else {
                (0..self.num_parameters())
                    .map(|_| rng.gen_range(0.0..TAU))
                    .collect()
            };
            let result = self.run_with_params(initial)?;
            total_evaluations += result.num_evaluations;
            debug!(restart, energy = result.expectation, "QAOA restart finished");

            if best
                .as_ref()
                .is_none_or(|b| result.expectation < b.expectation)
            {
                best = Some(result);
            }
        }

        let mut best = best.ok_or_else(|| {
            SimError::NumericalFailure("no QAOA restart produced a result".into())
        })?;
        best.num_evaluations = total_evaluations;
        best.restarts = self.restarts;
        info!(
            energy = best.expectation,
            ground_energy = best.ground_energy,
            overlap = best.ground_overlap,
            evaluations = best.num_evaluations,
            "QAOA finished"
        );
        Ok(best)
    }

    /// Optimise once from the given interleaved angles.
    pub fn run_with_params(&self, initial: Vec<f64>) -> SimResult<QaoaResult> {
        if initial.len() != self.num_parameters() {
            return Err(SimError::DimensionMismatch {
                expected: self.num_parameters(),
                actual: initial.len(),
            });
        }
        let bounds = vec![(0.0, TAU); self.num_parameters()];
        let problem = &self.problem;
        let result = self.optimizer().minimize(
            |angles| qaoa_expectation(problem, angles),
            initial,
            &bounds,
        )?;

        let state = qaoa_state(problem, &result.optimal_params)?;
        let ground = GroundState::from_diagonal(problem);
        let ground_overlap = ground.overlap(state.amplitudes())?;
        let most_likely = state
            .probabilities()
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map_or(0, |(x, _)| x);

        Ok(QaoaResult {
            layers: self.p,
            expectation: result.optimal_value,
            ground_energy: ground.energy,
            ground_overlap,
            optimal_angles: result.optimal_params,
            most_likely,
            most_likely_energy: problem.entries()[most_likely],
            num_evaluations: result.num_evaluations,
            num_iterations: result.num_iterations,
            energy_history: result.history,
            converged: result.converged,
            restarts: 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_clause() -> DiagonalHamiltonian {
        // Clause (x1): violated by |0⟩.
        DiagonalHamiltonian::new(vec![1.0, 0.0]).unwrap()
    }

    #[test]
    fn test_zero_angles_give_uniform_average() {
        let h = DiagonalHamiltonian::new(vec![3.0, 1.0, 0.0, 2.0]).unwrap();
        let e = qaoa_expectation(&h, &[0.0, 0.0]).unwrap();
        assert!((e - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_odd_angle_count_rejected() {
        assert!(qaoa_state(&single_clause(), &[0.1]).is_err());
    }

    #[test]
    fn test_known_optimum_single_qubit() {
        // α = π/2 maps |+⟩ to a Y eigenstate; β = 3π/4 rotates it onto |1⟩.
        let e = qaoa_expectation(&single_clause(), &[PI / 2.0, 3.0 * PI / 4.0]).unwrap();
        assert!(e < 1e-12);
    }

    #[test]
    fn test_ramp_angles_layout() {
        let a = ramp_angles(3);
        assert_eq!(a.len(), 6);
        assert!(a.iter().all(|x| (0.0..TAU).contains(x)));
        // Phase angles grow, mixer angles move toward π.
        assert!(a[0] < a[2] && a[2] < a[4]);
        assert!(a[1] < a[3] && a[3] < a[5]);
    }

    #[test]
    fn test_runner_rejects_zero_layers() {
        let err = QaoaRunner::new(single_clause()).with_layers(0).run().unwrap_err();
        assert!(matches!(err, SimError::InvalidArgument(_)));
    }

    #[test]
    fn test_run_with_params_checks_length() {
        let err = QaoaRunner::new(single_clause())
            .run_with_params(vec![0.1])
            .unwrap_err();
        assert!(matches!(err, SimError::DimensionMismatch { .. }));
    }
}

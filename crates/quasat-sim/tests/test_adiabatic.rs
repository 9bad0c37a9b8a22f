//! Tests for adiabatic evolution.

use approx::assert_abs_diff_eq;
use quasat_cnf::CnfInstance;
use quasat_sim::adiabatic::AdiabaticEvolution;
use quasat_sim::embedding::{DiagonalHamiltonian, embed_diagonal};
use quasat_sim::integrator::RungeKutta4;
use quasat_sim::schedule::{LinearRamp, SmoothRamp};

/// Three variables, seven clauses: every assignment except all-true is
/// forbidden by exactly one clause, so H₁ = 1 − |111⟩⟨111|.
fn unique_solution() -> DiagonalHamiltonian {
    let clauses: Vec<Vec<i32>> = (0..7)
        .map(|mask| {
            (0..3)
                .map(|i| if mask >> i & 1 == 1 { -(i + 1) } else { i + 1 })
                .collect()
        })
        .collect();
    let inst = CnfInstance::from_dimacs(3, &clauses).unwrap();
    embed_diagonal(&inst).unwrap()
}

fn final_gap(rate: f64) -> f64 {
    AdiabaticEvolution::new(unique_solution(), LinearRamp::new(rate).unwrap())
        .with_sample_every(50)
        .run()
        .unwrap()
        .final_gap
}

// ---------------------------------------------------------------------------
// Convergence in the ramp rate
// ---------------------------------------------------------------------------

#[test]
fn target_has_unique_ground_state() {
    let h = unique_solution();
    assert_eq!(h.ground_states(), vec![0b111]);
    assert_eq!(h.ground_energy(), 0.0);
}

#[test]
fn slower_ramp_tracks_ground_state_better() {
    let gaps: Vec<f64> = [1.0, 0.2, 0.05, 0.02].iter().map(|&r| final_gap(r)).collect();
    for w in gaps.windows(2) {
        assert!(w[1] < w[0], "gaps not decreasing: {gaps:?}");
    }
    assert!(gaps[3] < 0.05, "slow ramp left gap {}", gaps[3]);
    // A sudden quench leaves most of the weight in excited states.
    assert!(gaps[0] > 0.5);
}

#[test]
fn slow_ramp_lands_in_ground_space() {
    let traj = AdiabaticEvolution::new(unique_solution(), LinearRamp::new(0.02).unwrap())
        .with_sample_every(100)
        .run()
        .unwrap();
    assert!(traj.ground_fidelity > 0.95);
    assert_abs_diff_eq!(traj.duration, 50.0, epsilon = 1e-12);
    let probs = traj.final_state.probabilities();
    let most_likely = (0..probs.len())
        .max_by(|&a, &b| probs[a].total_cmp(&probs[b]))
        .unwrap();
    assert_eq!(most_likely, 0b111);
}

// ---------------------------------------------------------------------------
// Trajectory invariants
// ---------------------------------------------------------------------------

#[test]
fn energy_never_below_instantaneous_ground() {
    let traj = AdiabaticEvolution::new(unique_solution(), LinearRamp::new(0.1).unwrap())
        .run()
        .unwrap();
    for p in &traj.samples {
        assert!(p.expectation >= p.ground_energy - 1e-9, "{p:?}");
        assert!((0.0..=1.0).contains(&p.s));
    }
    let first = &traj.samples[0];
    assert_abs_diff_eq!(first.ground_energy, -3.0, epsilon = 1e-9);
    assert_abs_diff_eq!(first.expectation, -3.0, epsilon = 1e-12);
    let last = traj.samples.last().unwrap();
    assert_abs_diff_eq!(last.s, 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(last.ground_energy, 0.0, epsilon = 1e-9);
}

#[test]
fn rk4_preserves_norm() {
    let traj = AdiabaticEvolution::new(unique_solution(), LinearRamp::new(0.05).unwrap())
        .with_integrator(RungeKutta4::new(0.005).unwrap())
        .run()
        .unwrap();
    assert!(traj.max_norm_deviation() < 1e-6);
    assert!((traj.final_state.norm() - 1.0).abs() < 1e-6);
}

#[test]
fn minimum_gap_is_interior() {
    let traj = AdiabaticEvolution::new(unique_solution(), LinearRamp::new(0.1).unwrap())
        .run()
        .unwrap();
    let min_gap = traj.min_spectral_gap().unwrap();
    // Endpoints: 2 for −ΣX, 1 for H₁; the avoided crossing is narrower.
    assert!(min_gap > 0.0);
    assert!(min_gap < 1.0);
}

#[test]
fn smooth_ramp_also_converges() {
    let traj = AdiabaticEvolution::new(unique_solution(), SmoothRamp::new(50.0).unwrap())
        .with_sample_every(100)
        .run()
        .unwrap();
    assert!(traj.final_gap < 0.1);
    assert_eq!(traj.energy_series().len(), traj.samples.len());
}

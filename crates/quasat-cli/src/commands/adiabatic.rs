//! Adiabatic command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use quasat_sim::embedding::{DiagonalHamiltonian, embed_diagonal};
use quasat_sim::{
    AdiabaticEvolution, EvolutionSample, EvolutionTrajectory, LinearRamp, RungeKutta4, Schedule,
    SimResult, SmoothRamp,
};
use serde::Serialize;

use super::common::{
    InstanceArgs, bitstring, create_spinner, print_header, print_result, print_section, write_json,
};

/// Evolution parameters.
#[derive(Debug, Clone)]
pub struct Options {
    pub rate: f64,
    pub dt: f64,
    pub sample_every: usize,
    pub smooth: bool,
}

#[derive(Serialize)]
struct AdiabaticReport<'a> {
    schedule: &'static str,
    rate: f64,
    n_qubits: usize,
    duration: f64,
    steps: usize,
    dt: f64,
    final_expectation: f64,
    ground_energy: f64,
    final_gap: f64,
    ground_fidelity: f64,
    min_spectral_gap: Option<f64>,
    samples: &'a [EvolutionSample],
}

fn evolve<S: Schedule>(
    problem: DiagonalHamiltonian,
    schedule: S,
    options: &Options,
) -> SimResult<EvolutionTrajectory> {
    AdiabaticEvolution::new(problem, schedule)
        .with_integrator(RungeKutta4::new(options.dt)?)
        .with_sample_every(options.sample_every)
        .run()
}

/// Execute the adiabatic command.
pub fn execute(
    instance: &InstanceArgs,
    seed: u64,
    options: &Options,
    output: Option<&Path>,
) -> Result<()> {
    let inst = instance.load(seed)?;
    let problem = embed_diagonal(&inst).context("Failed to embed instance")?;
    let linear = LinearRamp::new(options.rate)?;
    let schedule_name = if options.smooth { "smoothstep" } else { "linear" };

    print_header("Adiabatic Evolution");
    print_result("Qubits", inst.num_variables());
    print_result("Clauses", inst.num_clauses());
    print_result("Schedule", schedule_name);
    print_result("Total time T", format!("{:.3}", linear.duration()));
    print_result("Step size", options.dt);

    let spinner = create_spinner("integrating Schrödinger equation")?;
    let trajectory = if options.smooth {
        evolve(problem, SmoothRamp::new(linear.duration())?, options)
    } else {
        evolve(problem, linear, options)
    };
    spinner.finish_and_clear();
    let trajectory = trajectory.context("Adiabatic evolution failed")?;

    print_section("Final state");
    print_result("⟨H₁⟩", format!("{:.6}", trajectory.final_expectation));
    print_result("Ground energy", trajectory.ground_energy);
    print_result("Residual energy", format!("{:.6}", trajectory.final_gap));
    print_result("Ground-space fidelity", format!("{:.4}", trajectory.ground_fidelity));
    if let Some(gap) = trajectory.min_spectral_gap() {
        print_result("Minimum spectral gap", format!("{gap:.4}"));
    }
    print_result("Max norm drift", format!("{:.2e}", trajectory.max_norm_deviation()));
    let probs = trajectory.final_state.probabilities();
    if let Some((x, p)) = probs
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
    {
        print_result(
            "Most likely",
            format!("{} (p = {:.3})", bitstring(x, trajectory.n_qubits), p),
        );
    }

    let report = AdiabaticReport {
        schedule: schedule_name,
        rate: options.rate,
        n_qubits: trajectory.n_qubits,
        duration: trajectory.duration,
        steps: trajectory.steps,
        dt: trajectory.dt,
        final_expectation: trajectory.final_expectation,
        ground_energy: trajectory.ground_energy,
        final_gap: trajectory.final_gap,
        ground_fidelity: trajectory.ground_fidelity,
        min_spectral_gap: trajectory.min_spectral_gap(),
        samples: &trajectory.samples,
    };
    write_json(&report, output)
}

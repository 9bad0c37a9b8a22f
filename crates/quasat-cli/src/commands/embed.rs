//! Embed command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use quasat_sim::spectrum::DEGENERACY_TOL;
use quasat_sim::embedding::{embed_diagonal, embed_pauli};
use serde::Serialize;

use super::common::{InstanceArgs, bitstring, print_header, print_result, print_section, write_json};

/// Ground states listed on the terminal before eliding.
const MAX_LISTED: usize = 16;

#[derive(Serialize)]
struct PauliTermReport {
    coeff: f64,
    pauli: String,
}

#[derive(Serialize)]
struct EmbedReport {
    num_variables: usize,
    num_clauses: usize,
    /// Violated-clause count per basis index.
    diagonal: Vec<f64>,
    ground_energy: f64,
    ground_states: Vec<usize>,
    spectral_gap: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pauli_terms: Option<Vec<PauliTermReport>>,
}

/// Execute the embed command.
pub fn execute(
    instance: &InstanceArgs,
    seed: u64,
    pauli: bool,
    output: Option<&Path>,
) -> Result<()> {
    let inst = instance.load(seed)?;
    let n = inst.num_variables();
    let h1 = embed_diagonal(&inst).context("Failed to embed instance")?;
    let ground_energy = h1.ground_energy();
    let ground_states = h1.ground_states();
    let spectral_gap = h1
        .entries()
        .iter()
        .copied()
        .filter(|e| *e > ground_energy + DEGENERACY_TOL)
        .min_by(f64::total_cmp)
        .map(|e| e - ground_energy);

    print_header("Clause-Violation Hamiltonian");
    print_result("Qubits", n);
    print_result("Clauses", inst.num_clauses());
    print_result("Ground energy", ground_energy);
    print_result("Degeneracy", ground_states.len());
    if let Some(gap) = spectral_gap {
        print_result("Spectral gap", gap);
    }
    let verdict = if h1.has_zero_energy_state() {
        style("satisfiable").green()
    } else {
        style("unsatisfiable").red()
    };
    eprintln!("  Instance is {verdict}");

    print_section("Ground states (x1 … xn)");
    for &x in ground_states.iter().take(MAX_LISTED) {
        eprintln!("  |{}⟩", bitstring(x, n));
    }
    if ground_states.len() > MAX_LISTED {
        eprintln!("  … {} more", ground_states.len() - MAX_LISTED);
    }

    let pauli_terms = if pauli {
        let h = embed_pauli(&inst).context("Failed to expand Pauli form")?;
        print_section(&format!("Pauli expansion ({} terms)", h.n_terms()));
        eprintln!("{h}");
        Some(
            h.terms()
                .iter()
                .map(|t| PauliTermReport {
                    coeff: t.coeff,
                    pauli: t.pauli.to_string(),
                })
                .collect(),
        )
    } else {
        None
    };

    let report = EmbedReport {
        num_variables: n,
        num_clauses: inst.num_clauses(),
        diagonal: h1.entries().to_vec(),
        ground_energy,
        ground_states,
        spectral_gap,
        pauli_terms,
    };
    write_json(&report, output)
}

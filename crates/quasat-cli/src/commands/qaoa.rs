//! QAOA command implementation.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use quasat_sim::embedding::embed_diagonal;
use quasat_sim::qaoa::qaoa_state;
use quasat_sim::{QaoaResult, QaoaRunner};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use super::common::{
    InstanceArgs, bitstring, create_progress_bar, print_header, print_result, print_section,
    write_json,
};

/// Optimisation parameters.
#[derive(Debug, Clone)]
pub struct Options {
    pub layers: usize,
    pub sweep: bool,
    pub restarts: usize,
    pub maxiter: usize,
    pub shots: usize,
}

impl Options {
    /// Depths to optimise, in order.
    pub fn depths(&self) -> Vec<usize> {
        if self.sweep {
            (1..=self.layers).collect()
        } else {
            vec![self.layers]
        }
    }
}

#[derive(Serialize)]
struct QaoaReport {
    num_variables: usize,
    num_clauses: usize,
    results: Vec<QaoaResult>,
    /// Bitstring histogram of the deepest ansatz, if shots were requested.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    counts: BTreeMap<String, usize>,
}

/// Execute the qaoa command.
pub fn execute(
    instance: &InstanceArgs,
    seed: u64,
    options: &Options,
    output: Option<&Path>,
) -> Result<()> {
    if options.layers == 0 {
        anyhow::bail!("--layers must be at least 1");
    }
    let inst = instance.load(seed)?;
    let n = inst.num_variables();
    let problem = embed_diagonal(&inst).context("Failed to embed instance")?;

    print_header("QAOA");
    print_result("Qubits", n);
    print_result("Clauses", inst.num_clauses());
    print_result("Ground energy", problem.ground_energy());
    print_result("Restarts", options.restarts);

    let depths = options.depths();
    let pb = create_progress_bar(depths.len() as u64, "depths")?;
    let mut results = Vec::with_capacity(depths.len());
    for &p in &depths {
        pb.set_message(format!("p = {p}"));
        let result = QaoaRunner::new(problem.clone())
            .with_layers(p)
            .with_restarts(options.restarts)
            .with_maxiter(options.maxiter)
            .with_seed(seed)
            .run()
            .with_context(|| format!("QAOA failed at depth {p}"))?;
        results.push(result);
        pb.inc(1);
    }
    pb.finish_and_clear();

    print_section("Results");
    eprintln!(
        "  {:>3} {:>12} {:>10} {:>10} {:>6}  {}",
        "p", "⟨H₁⟩", "residual", "overlap", "evals", "most likely"
    );
    for r in &results {
        let converged = if r.converged {
            style("").green()
        } else {
            style("*").yellow()
        };
        eprintln!(
            "  {:>3} {:>12.6} {:>10.6} {:>10.4} {:>6}  {}{}",
            r.layers,
            r.expectation,
            r.gap(),
            r.ground_overlap,
            r.num_evaluations,
            bitstring(r.most_likely, n),
            converged
        );
    }
    if results.iter().any(|r| !r.converged) {
        eprintln!("  {} optimizer hit --maxiter", style("*").yellow());
    }

    let mut counts = BTreeMap::new();
    if let Some(deepest) = results.last().filter(|_| options.shots > 0) {
        let state = qaoa_state(&problem, &deepest.optimal_angles)?;
        let mut rng = StdRng::seed_from_u64(seed);
        for (x, c) in state.sample_counts(&mut rng, options.shots) {
            counts.insert(state.outcome_to_bitstring(x), c);
        }
        print_section(&format!(
            "Measurements ({} shots, p = {})",
            options.shots, deepest.layers
        ));
        let mut sorted: Vec<_> = counts.iter().collect();
        sorted.sort_by(|a, b| b.1.cmp(a.1));
        for (bits, c) in sorted.into_iter().take(10) {
            let pct = 100.0 * *c as f64 / options.shots as f64;
            eprintln!("  {bits}: {c:>6} ({pct:>5.1}%)");
        }
    }

    let report = QaoaReport {
        num_variables: n,
        num_clauses: inst.num_clauses(),
        results,
        counts,
    };
    write_json(&report, output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(layers: usize, sweep: bool) -> Options {
        Options {
            layers,
            sweep,
            restarts: 1,
            maxiter: 50,
            shots: 0,
        }
    }

    #[test]
    fn test_sweep_covers_every_depth() {
        assert_eq!(options(3, true).depths(), vec![1, 2, 3]);
        assert_eq!(options(3, false).depths(), vec![3]);
    }
}

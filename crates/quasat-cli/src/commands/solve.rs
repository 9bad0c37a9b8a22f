//! Solve command implementation.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use console::style;
use quasat_oracle::SatVerdict;
use serde::Serialize;

use super::common::{InstanceArgs, OracleArgs, print_result, write_json};

#[derive(Serialize)]
struct SolveReport<'a> {
    oracle: &'a str,
    num_variables: usize,
    num_clauses: usize,
    verdict: &'a SatVerdict,
    elapsed_ms: f64,
}

/// Execute the solve command.
///
/// Prints the verdict in SAT-competition style (`s ...` / `v ... 0`) unless
/// `output` is given, in which case a JSON report is written there.
pub fn execute(
    instance: &InstanceArgs,
    oracle: &OracleArgs,
    seed: u64,
    output: Option<&Path>,
) -> Result<()> {
    let inst = instance.load(seed)?;
    let oracle = oracle.build();

    eprintln!(
        "{} Solving {} variables, {} clauses with {}",
        style("→").cyan().bold(),
        inst.num_variables(),
        inst.num_clauses(),
        style(oracle.name()).yellow()
    );

    let start = Instant::now();
    let verdict = oracle
        .solve(&inst)
        .with_context(|| format!("Oracle '{}' failed", oracle.name()))?;
    let elapsed = start.elapsed();

    let styled = match &verdict {
        SatVerdict::Satisfiable(_) => style(verdict.to_string()).green().bold(),
        SatVerdict::Unsatisfiable => style(verdict.to_string()).red().bold(),
        SatVerdict::Unknown => style(verdict.to_string()).yellow().bold(),
    };
    eprintln!("  Verdict: {styled}");
    print_result("Time", format!("{:.2?}", elapsed));

    if let Some(path) = output {
        let report = SolveReport {
            oracle: oracle.name(),
            num_variables: inst.num_variables(),
            num_clauses: inst.num_clauses(),
            verdict: &verdict,
            elapsed_ms: elapsed.as_secs_f64() * 1e3,
        };
        return write_json(&report, Some(path));
    }

    println!("s {verdict}");
    if let Some(model) = verdict.assignment() {
        let values: Vec<String> = model.to_dimacs().iter().map(i32::to_string).collect();
        println!("v {} 0", values.join(" "));
    }
    Ok(())
}

//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - random k-SAT phase transitions and quantum SAT heuristics",
        style("quasat").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  quasat-cnf     CNF formulas, random generators, DIMACS I/O");
    println!("  quasat-oracle  SAT oracles and the phase-transition sampler");
    println!("  quasat-sim     Hamiltonian embedding, adiabatic and QAOA simulation");
    println!("  quasat-cli     Command-line interface");
    println!();
    println!("License: {}", style(env!("CARGO_PKG_LICENSE")).dim());
}

//! Generate command implementation.

use std::path::Path;

use anyhow::Result;
use console::style;
use quasat_cnf::{clause_space_size, dimacs};

use super::common::{GeneratorArgs, print_result, print_success, write_text};

/// Execute the generate command.
pub fn execute(args: &GeneratorArgs, seed: u64, output: Option<&Path>) -> Result<()> {
    let config = args.config();
    if config.unique {
        let space = clause_space_size(config.num_variables, config.clause_width);
        if config.num_clauses as u128 > space {
            anyhow::bail!(
                "Cannot draw {} distinct {}-clauses over {} variables: only {} exist",
                config.num_clauses,
                config.clause_width,
                config.num_variables,
                space
            );
        }
    }

    eprintln!(
        "{} Generating random {}-SAT instance (seed {})",
        style("→").cyan().bold(),
        config.clause_width,
        seed
    );

    let instance = args.generate(seed)?;
    print_result("Variables", instance.num_variables());
    print_result("Clauses", instance.num_clauses());
    print_result("Density", format!("{:.3}", instance.density()));
    if !config.unique && instance.has_duplicate_clauses() {
        print_result("Duplicates", "yes");
    }

    write_text(&dimacs::to_string(&instance), output)?;
    if output.is_none() {
        print_success("Instance generated");
    }
    Ok(())
}

//! quasat command-line interface.
//!
//! Drives the random k-SAT experiments: instance generation, exact solving,
//! the satisfiability phase transition, and the adiabatic / QAOA
//! simulations of the clause-violation Hamiltonian.
//!
//! Human-readable summaries go to stderr; data (DIMACS, JSON series) goes to
//! stdout or the file named by `--output`, so every command can be piped.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::common::{DEFAULT_SEED, GeneratorArgs, InstanceArgs, OracleArgs};
use commands::{adiabatic, embed, generate, phase, qaoa, solve, version};

/// quasat - random k-SAT phase transitions and quantum SAT heuristics
#[derive(Parser, Debug)]
#[command(name = "quasat")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Seed for every random draw [default: 42]
    #[arg(long, env = "QUASAT_SEED", global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a random k-SAT instance in DIMACS format
    Generate {
        #[command(flatten)]
        generator: GeneratorArgs,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Decide satisfiability of an instance
    Solve {
        #[command(flatten)]
        instance: InstanceArgs,

        #[command(flatten)]
        oracle: OracleArgs,

        /// Write the verdict as JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Estimate the satisfiable fraction across clause densities
    Phase {
        /// JSON file with phase-transition parameters
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Variables per instance
        #[arg(short = 'n', long)]
        variables: Option<usize>,

        /// Instances per density
        #[arg(short, long)]
        samples: Option<usize>,

        /// Literals per clause
        #[arg(short = 'k', long)]
        width: Option<usize>,

        /// Smallest clause density
        #[arg(long, requires_all = ["max_density", "step"])]
        min_density: Option<f64>,

        /// Largest clause density
        #[arg(long, requires_all = ["min_density", "step"])]
        max_density: Option<f64>,

        /// Density increment
        #[arg(long, requires_all = ["min_density", "max_density"])]
        step: Option<f64>,

        #[command(flatten)]
        oracle: OracleArgs,

        /// Output file for the JSON curve (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Build the clause-violation Hamiltonian of an instance
    Embed {
        #[command(flatten)]
        instance: InstanceArgs,

        /// Also expand the Hamiltonian into Pauli Z-strings
        #[arg(long)]
        pauli: bool,

        /// Output file for the JSON diagonal (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Integrate the adiabatic Schrödinger equation
    Adiabatic {
        #[command(flatten)]
        instance: InstanceArgs,

        /// Ramp rate α; total time is 1/α
        #[arg(short, long, default_value = "0.1")]
        rate: f64,

        /// RK4 step size
        #[arg(long, default_value = "0.01")]
        dt: f64,

        /// Record a sample every this many steps
        #[arg(long, default_value = "10")]
        sample_every: usize,

        /// Use a smoothstep schedule instead of the linear ramp
        #[arg(long)]
        smooth: bool,

        /// Output file for the JSON trajectory (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Optimise a QAOA ansatz
    Qaoa {
        #[command(flatten)]
        instance: InstanceArgs,

        /// Number of layers p
        #[arg(short = 'p', long, default_value = "1")]
        layers: usize,

        /// Run every depth from 1 to --layers
        #[arg(long)]
        sweep: bool,

        /// Optimizer starts per depth
        #[arg(long, default_value = "1")]
        restarts: usize,

        /// Optimizer iteration cap per start
        #[arg(long, default_value = "200")]
        maxiter: usize,

        /// Measurement shots drawn from the optimised state
        #[arg(long, default_value = "0")]
        shots: usize,

        /// Output file for the JSON results (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let seed = cli.seed.unwrap_or(DEFAULT_SEED);

    let result = match cli.command {
        Commands::Generate { generator, output } => {
            generate::execute(&generator, seed, output.as_deref())
        }

        Commands::Solve {
            instance,
            oracle,
            output,
        } => solve::execute(&instance, &oracle, seed, output.as_deref()),

        Commands::Phase {
            config,
            variables,
            samples,
            width,
            min_density,
            max_density,
            step,
            oracle,
            output,
        } => {
            let overrides = phase::Overrides {
                num_variables: variables,
                samples,
                clause_width: width,
                densities: min_density.zip(max_density).zip(step).map(|((a, b), s)| (a, b, s)),
                seed: cli.seed,
            };
            phase::execute(config.as_deref(), &overrides, &oracle, output.as_deref())
        }

        Commands::Embed {
            instance,
            pauli,
            output,
        } => embed::execute(&instance, seed, pauli, output.as_deref()),

        Commands::Adiabatic {
            instance,
            rate,
            dt,
            sample_every,
            smooth,
            output,
        } => {
            let options = adiabatic::Options {
                rate,
                dt,
                sample_every,
                smooth,
            };
            adiabatic::execute(&instance, seed, &options, output.as_deref())
        }

        Commands::Qaoa {
            instance,
            layers,
            sweep,
            restarts,
            maxiter,
            shots,
            output,
        } => {
            let options = qaoa::Options {
                layers,
                sweep,
                restarts,
                maxiter,
                shots,
            };
            qaoa::execute(&instance, seed, &options, output.as_deref())
        }

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_generate_args() {
        let cli = Cli::try_parse_from(["quasat", "generate", "-n", "8", "-m", "30", "--unique"])
            .unwrap();
        match cli.command {
            Commands::Generate { generator, output } => {
                let config = generator.config();
                assert_eq!(config.num_variables, 8);
                assert_eq!(config.num_clauses, 30);
                assert!(config.unique);
                assert!(output.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_clauses_and_density_conflict() {
        let err = Cli::try_parse_from(["quasat", "generate", "-m", "30", "-d", "4.0"]);
        assert!(err.is_err());
    }

    #[test]
    fn test_input_conflicts_with_generator_flags() {
        let err = Cli::try_parse_from(["quasat", "embed", "-i", "f.cnf", "-n", "5"]);
        assert!(err.is_err());
    }

    #[test]
    fn test_global_seed_and_verbosity() {
        let cli = Cli::try_parse_from(["quasat", "qaoa", "-p", "3", "--seed", "7", "-vv"]).unwrap();
        assert_eq!(cli.seed, Some(7));
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Qaoa { layers: 3, .. }));
    }

    #[test]
    fn test_phase_density_range_requires_all_three() {
        assert!(Cli::try_parse_from(["quasat", "phase", "--min-density", "1.0"]).is_err());
        let cli = Cli::try_parse_from([
            "quasat",
            "phase",
            "--min-density",
            "1.0",
            "--max-density",
            "6.0",
            "--step",
            "0.5",
            "--oracle",
            "bounded",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Phase { step: Some(_), .. }));
    }
}

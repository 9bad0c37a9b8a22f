//! Shared arguments and helpers for CLI commands.

use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use quasat_cnf::{CnfInstance, GeneratorConfig, dimacs};
use quasat_oracle::phase::CRITICAL_DENSITY_3SAT;
use quasat_oracle::{BoundedOracle, SatOracle, VarisatOracle};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::info;

/// Seed used when neither `--seed` nor `QUASAT_SEED` is given.
pub const DEFAULT_SEED: u64 = 42;

/// Parameters of a random instance.
#[derive(Args, Debug, Clone)]
pub struct GeneratorArgs {
    /// Variable count n
    #[arg(short = 'n', long, default_value = "6")]
    pub variables: usize,

    /// Clause count m
    #[arg(short = 'm', long, conflicts_with = "density")]
    pub clauses: Option<usize>,

    /// Clause density m/n [default: 4.27]
    #[arg(short, long)]
    pub density: Option<f64>,

    /// Literals per clause k
    #[arg(short = 'k', long, default_value = "3")]
    pub width: usize,

    /// Reject duplicate clauses
    #[arg(long)]
    pub unique: bool,
}

impl GeneratorArgs {
    /// Generator configuration; m = ⌊n·density⌋ unless `--clauses` is given.
    pub fn config(&self) -> GeneratorConfig {
        let density = self.density.unwrap_or(CRITICAL_DENSITY_3SAT);
        let mut config = GeneratorConfig::at_density(self.variables, density)
            .with_clause_width(self.width)
            .with_unique(self.unique);
        if let Some(m) = self.clauses {
            config.num_clauses = m;
        }
        config
    }

    /// Draw an instance with a fresh RNG seeded from `seed`.
    pub fn generate(&self, seed: u64) -> Result<CnfInstance> {
        let config = self.config();
        let mut rng = StdRng::seed_from_u64(seed);
        let instance = config
            .generate(&mut rng)
            .context("Failed to generate instance")?;
        info!(
            n = config.num_variables,
            m = config.num_clauses,
            k = config.clause_width,
            seed,
            "generated random instance"
        );
        Ok(instance)
    }
}

/// Where a command takes its instance from.
#[derive(Args, Debug, Clone)]
pub struct InstanceArgs {
    /// DIMACS CNF file; a random instance is drawn when omitted
    #[arg(short, long, conflicts_with_all = ["variables", "clauses", "density", "width", "unique"])]
    pub input: Option<PathBuf>,

    #[command(flatten)]
    pub generator: GeneratorArgs,
}

impl InstanceArgs {
    /// Read `--input`, or generate from the generator flags.
    pub fn load(&self, seed: u64) -> Result<CnfInstance> {
        match &self.input {
            Some(path) => load_instance(path),
            None => self.generator.generate(seed),
        }
    }
}

/// Read a DIMACS CNF file.
pub fn load_instance(path: &Path) -> Result<CnfInstance> {
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }
    let instance = dimacs::read_file(path)
        .with_context(|| format!("Failed to read DIMACS file: {}", path.display()))?;
    info!(
        path = %path.display(),
        n = instance.num_variables(),
        m = instance.num_clauses(),
        "loaded instance"
    );
    Ok(instance)
}

/// Available SAT oracles.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OracleKind {
    /// CDCL solver, always decides
    Varisat,
    /// Exhaustive search under an assignment budget
    Bounded,
}

/// Oracle selection.
#[derive(Args, Debug, Clone)]
pub struct OracleArgs {
    /// SAT oracle
    #[arg(long, value_enum, default_value = "varisat")]
    pub oracle: OracleKind,

    /// Assignment budget of the bounded oracle
    #[arg(long, default_value = "1048576")]
    pub budget: u64,
}

impl OracleArgs {
    /// Instantiate the selected oracle.
    pub fn build(&self) -> Box<dyn SatOracle> {
        match self.oracle {
            OracleKind::Varisat => Box::new(VarisatOracle::new()),
            OracleKind::Bounded => Box::new(BoundedOracle::new(self.budget)),
        }
    }
}

/// Serialize `value` as pretty JSON to `output`, or stdout when `None`.
pub fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize results")?;
    write_text(&json, output)
}

/// Write `text` to `output`, or stdout when `None`.
pub fn write_text(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, text)
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
            print_success(&format!("Wrote {}", path.display()));
        }
        None => println!("{}", text.trim_end()),
    }
    Ok(())
}

/// Bitstring of a basis index, variable 1 first.
pub fn bitstring(index: usize, n: usize) -> String {
    (0..n)
        .map(|q| if index >> q & 1 == 1 { '1' } else { '0' })
        .collect()
}

/// Progress bar drawn on stderr.
pub fn create_progress_bar(len: u64, message: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )?
        .progress_chars("#>-"),
    );
    pb.set_message(message.to_string());
    Ok(pb)
}

/// Spinner for work without a known length.
pub fn create_spinner(message: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    Ok(pb)
}

pub fn print_header(title: &str) {
    eprintln!();
    eprintln!("{}", style("═".repeat(60)).cyan());
    eprintln!("{}", style(format!("  {title}")).cyan().bold());
    eprintln!("{}", style("═".repeat(60)).cyan());
    eprintln!();
}

pub fn print_section(title: &str) {
    eprintln!();
    eprintln!("{}", style(format!("▸ {title}")).yellow().bold());
    eprintln!("{}", style("─".repeat(40)).dim());
}

pub fn print_result(label: &str, value: impl Display) {
    eprintln!("  {}: {}", style(label).dim(), style(value).green());
}

pub fn print_success(message: &str) {
    eprintln!("{} {}", style("✓").green().bold(), message);
}

pub fn print_warning(message: &str) {
    eprintln!("{} {}", style("!").yellow().bold(), message);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator(clauses: Option<usize>, density: Option<f64>) -> GeneratorArgs {
        GeneratorArgs {
            variables: 10,
            clauses,
            density,
            width: 3,
            unique: false,
        }
    }

    #[test]
    fn test_default_density_is_critical() {
        assert_eq!(generator(None, None).config().num_clauses, 42);
    }

    #[test]
    fn test_explicit_clause_count_wins() {
        assert_eq!(generator(Some(7), None).config().num_clauses, 7);
        assert_eq!(generator(None, Some(2.5)).config().num_clauses, 25);
    }

    #[test]
    fn test_generation_is_seeded() {
        let args = generator(None, Some(3.0));
        assert_eq!(args.generate(5).unwrap(), args.generate(5).unwrap());
    }

    #[test]
    fn test_bitstring_puts_variable_one_first() {
        assert_eq!(bitstring(0b001, 3), "100");
        assert_eq!(bitstring(0b110, 3), "011");
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_instance(Path::new("/nonexistent/quasat_test.cnf")).unwrap_err();
        assert!(err.to_string().contains("File not found"));
    }

    #[test]
    fn test_load_and_write_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inst.cnf");
        let inst = generator(Some(12), None).generate(1).unwrap();
        write_text(&dimacs::to_string(&inst), Some(&path)).unwrap();
        assert_eq!(load_instance(&path).unwrap(), inst);
    }

    #[test]
    fn test_oracle_selection() {
        let args = OracleArgs {
            oracle: OracleKind::Bounded,
            budget: 16,
        };
        assert_eq!(args.build().name(), BoundedOracle::new(16).name());
    }
}

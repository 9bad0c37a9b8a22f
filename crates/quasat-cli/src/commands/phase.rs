//! Phase command implementation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use quasat_oracle::{PhaseConfig, PhaseTransitionSampler, density_range};

use super::common::{
    OracleArgs, create_progress_bar, print_header, print_result, print_section, print_warning,
    write_json,
};

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub num_variables: Option<usize>,
    pub samples: Option<usize>,
    pub clause_width: Option<usize>,
    /// (start, end, step)
    pub densities: Option<(f64, f64, f64)>,
    pub seed: Option<u64>,
}

/// Load a phase-transition config from JSON; missing fields take defaults.
pub fn load_config(path: &Path) -> Result<PhaseConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Invalid phase config: {}", path.display()))
}

/// Resolve the run parameters: defaults, then the file, then the flags.
pub fn resolve_config(config_path: Option<&Path>, overrides: &Overrides) -> Result<PhaseConfig> {
    let mut config = match config_path {
        Some(path) => load_config(path)?,
        None => PhaseConfig::default(),
    };
    if let Some(n) = overrides.num_variables {
        config.num_variables = n;
    }
    if let Some(samples) = overrides.samples {
        config.samples = samples;
    }
    if let Some(k) = overrides.clause_width {
        config.clause_width = k;
    }
    if let Some((start, end, step)) = overrides.densities {
        config.densities = density_range(start, end, step);
    }
    if let Some(seed) = overrides.seed {
        config.seed = seed;
    }
    config.validate()?;
    Ok(config)
}

/// Execute the phase command.
pub fn execute(
    config_path: Option<&Path>,
    overrides: &Overrides,
    oracle: &OracleArgs,
    output: Option<&Path>,
) -> Result<()> {
    let config = resolve_config(config_path, overrides)?;
    let sampler = PhaseTransitionSampler::new(oracle.build(), config);
    let cfg = sampler.config();

    print_header("Random k-SAT Phase Transition");
    print_result("Variables", cfg.num_variables);
    print_result("Clause width", cfg.clause_width);
    print_result("Samples per density", cfg.samples);
    print_result("Densities", cfg.densities.len());
    print_result("Seed", cfg.seed);

    let pb = create_progress_bar(sampler.total_samples() as u64, "instances")?;
    let curve = sampler.run_with_progress(|| pb.inc(1))?;
    pb.finish_and_clear();

    print_section("Satisfiable fraction");
    eprintln!(
        "  {:>8} {:>6} {:>6} {:>6} {:>6} {:>9}",
        "density", "m", "sat", "unsat", "unk", "fraction"
    );
    for p in &curve.points {
        eprintln!(
            "  {:>8.2} {:>6} {:>6} {:>6} {:>6} {:>9.3}",
            p.density,
            p.num_clauses,
            p.satisfiable,
            p.unsatisfiable,
            p.unknown,
            p.satisfiable_fraction
        );
    }

    eprintln!();
    match curve.crossover_density() {
        Some(d) => print_result("Crossover (fraction = 0.5)", format!("{d:.3}")),
        None => print_result("Crossover (fraction = 0.5)", "not bracketed"),
    }
    let unknown = curve.total_unknown();
    if unknown > 0 {
        print_warning(&format!(
            "{} undecided instances excluded from the fractions (raise --budget)",
            style(unknown).yellow()
        ));
    }

    write_json(&curve, output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("phase.json");
        fs::write(&path, r#"{"num_variables": 12, "samples": 5, "seed": 3}"#).unwrap();

        let overrides = Overrides {
            samples: Some(9),
            densities: Some((2.0, 4.0, 1.0)),
            ..Overrides::default()
        };
        let config = resolve_config(Some(&path), &overrides).unwrap();
        assert_eq!(config.num_variables, 12);
        assert_eq!(config.samples, 9);
        assert_eq!(config.seed, 3);
        assert_eq!(config.densities, vec![2.0, 3.0, 4.0]);
        assert_eq!(config.clause_width, PhaseConfig::default().clause_width);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let overrides = Overrides {
            samples: Some(0),
            ..Overrides::default()
        };
        assert!(resolve_config(None, &overrides).is_err());
    }

    #[test]
    fn test_malformed_json_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("phase.json");
        fs::write(&path, "{ not json").unwrap();
        let err = resolve_config(Some(&path), &Overrides::default()).unwrap_err();
        assert!(format!("{err:#}").contains("Invalid phase config"));
    }
}

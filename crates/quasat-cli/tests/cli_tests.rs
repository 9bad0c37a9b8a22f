//! End-to-end checks of the file formats the CLI reads and writes.
//!
//! The CLI is a binary crate, so these exercise the same library calls the
//! commands make: DIMACS files produced by `generate` must load back in
//! `solve`, and `phase --config` files must deserialize with defaults.

use std::fs;

use quasat_cnf::{GeneratorConfig, dimacs};
use quasat_oracle::{BoundedOracle, PhaseConfig, SatOracle, VarisatOracle};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn generated_file_solves_consistently() {
    let dir = tempfile::tempdir().unwrap();
    let mut rng = StdRng::seed_from_u64(42);

    for i in 0..10 {
        let inst = GeneratorConfig::at_density(8, 4.27)
            .generate(&mut rng)
            .unwrap();
        let path = dir.path().join(format!("inst{i}.cnf"));
        fs::write(&path, dimacs::to_string(&inst)).unwrap();

        let loaded = dimacs::read_file(&path).unwrap();
        assert_eq!(loaded, inst);

        let exact = VarisatOracle::new().solve(&loaded).unwrap();
        let bounded = BoundedOracle::new(1 << 8).solve(&loaded).unwrap();
        assert_eq!(exact.is_satisfiable(), bounded.is_satisfiable());
        if let Some(model) = exact.assignment() {
            assert!(loaded.is_satisfied_by(model).unwrap());
        }
    }
}

#[test]
fn handwritten_dimacs_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hand.cnf");
    fs::write(&path, "c two clauses\np cnf 3 2\n1 -2 3 0\n-1\n2 0\n").unwrap();
    let inst = dimacs::read_file(&path).unwrap();
    assert_eq!(inst.num_variables(), 3);
    assert_eq!(inst.raw_clauses(), vec![vec![1, -2, 3], vec![-1, 2]]);
}

#[test]
fn partial_phase_config_takes_defaults() {
    let config: PhaseConfig =
        serde_json::from_str(r#"{"num_variables": 15, "densities": [3.0, 4.0, 5.0]}"#).unwrap();
    assert_eq!(config.num_variables, 15);
    assert_eq!(config.densities, vec![3.0, 4.0, 5.0]);
    assert_eq!(config.samples, PhaseConfig::default().samples);
    assert!(config.validate().is_ok());
}

#[test]
fn phase_config_roundtrips_through_json() {
    let config = PhaseConfig::default();
    let json = serde_json::to_string(&config).unwrap();
    let back: PhaseConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}

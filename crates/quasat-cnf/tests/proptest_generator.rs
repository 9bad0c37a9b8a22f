//! Property-based tests for the random k-SAT generators.
//!
//! Any seed and any valid (n, m, k) must yield well-formed clauses; the
//! unique variant must additionally yield pairwise-distinct clauses.

use std::collections::HashSet;

use proptest::prelude::*;
use quasat_cnf::{
    CnfError, clause_space_size, random_clause, random_instance, random_unique_instance,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// (seed, n, k) with 1 ≤ k ≤ n ≤ 30.
fn arb_shape() -> impl Strategy<Value = (u64, usize, usize)> {
    (any::<u64>(), 1_usize..=30).prop_flat_map(|(seed, n)| (Just(seed), Just(n), 1..=n.min(5)))
}

proptest! {
    #[test]
    fn clause_literals_are_well_formed((seed, n, k) in arb_shape()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let clause = random_clause(&mut rng, n, k).unwrap();

        prop_assert_eq!(clause.len(), k);
        let vars: HashSet<usize> = clause.variables().collect();
        prop_assert_eq!(vars.len(), k);
        for lit in clause.literals() {
            prop_assert!(lit.to_dimacs() != 0);
            prop_assert!((1..=n).contains(&lit.var()));
        }
    }

    #[test]
    fn instance_has_requested_clause_count((seed, n, k) in arb_shape(), m in 0_usize..60) {
        let mut rng = StdRng::seed_from_u64(seed);
        let inst = random_instance(&mut rng, n, m, k).unwrap();
        prop_assert_eq!(inst.num_clauses(), m);
        prop_assert_eq!(inst.num_variables(), n);
        prop_assert!(inst.clauses().iter().all(|c| c.len() == k));
    }

    #[test]
    fn unique_instance_has_distinct_clauses((seed, n, k) in arb_shape(), m in 0_usize..40) {
        // Stay well inside the clause space so rejection sampling finishes fast.
        let m = m.min((clause_space_size(n, k) / 2) as usize);
        let mut rng = StdRng::seed_from_u64(seed);
        let inst = random_unique_instance(&mut rng, n, m, k).unwrap();

        prop_assert_eq!(inst.num_clauses(), m);
        prop_assert!(!inst.has_duplicate_clauses());
    }

    #[test]
    fn width_above_variable_count_is_rejected(seed in any::<u64>(), n in 0_usize..5, extra in 1_usize..4) {
        let mut rng = StdRng::seed_from_u64(seed);
        let res = random_clause(&mut rng, n, n + extra);
        prop_assert!(matches!(res, Err(CnfError::InvalidArgument(_))));
    }
}

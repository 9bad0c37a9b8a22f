//! Random k-SAT instance generation.
//!
//! The fixed-width model: every clause picks k distinct variables uniformly
//! without replacement from `{1..n}` and negates each with probability ½.
//! Instances are m independent clauses, so duplicate clauses are possible
//! unless the unique variant is used.
//!
//! All generators draw from a caller-owned RNG; seed it once per run to make
//! an experiment reproducible.
//!
//! ```rust
//! use rand::SeedableRng;
//! use quasat_cnf::generator::random_instance;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let inst = random_instance(&mut rng, 10, 42, 3).unwrap();
//! assert_eq!(inst.num_clauses(), 42);
//! ```

use std::collections::HashSet;

use rand::Rng;
use rand::seq::index;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::clause::Clause;
use crate::error::{CnfError, CnfResult};
use crate::instance::CnfInstance;
use crate::literal::Literal;

/// Clause width of 3-SAT.
pub const DEFAULT_CLAUSE_WIDTH: usize = 3;

/// Largest clause count any generator will allocate for.
pub const MAX_CLAUSES: usize = 1 << 24;

/// Draw one clause of `width` literals over `num_variables` variables.
pub fn random_clause<R: Rng + ?Sized>(
    rng: &mut R,
    num_variables: usize,
    width: usize,
) -> CnfResult<Clause> {
    validate_width(num_variables, width)?;
    let vars = index::sample(rng, num_variables, width);
    let literals = vars
        .into_iter()
        .map(|i| {
            let lit = Literal::positive(i + 1)?;
            Ok(if rng.gen_bool(0.5) { lit.negate() } else { lit })
        })
        .collect::<CnfResult<Vec<_>>>()?;
    Clause::new(literals)
}

/// Draw `num_clauses` independent clauses; duplicates are permitted.
pub fn random_instance<R: Rng + ?Sized>(
    rng: &mut R,
    num_variables: usize,
    num_clauses: usize,
    width: usize,
) -> CnfResult<CnfInstance> {
    validate_width(num_variables, width)?;
    validate_clause_count(num_clauses)?;
    let clauses = (0..num_clauses)
        .map(|_| random_clause(rng, num_variables, width))
        .collect::<CnfResult<Vec<_>>>()?;
    CnfInstance::new(num_variables, clauses)
}

/// Draw `num_clauses` pairwise-distinct clauses.
///
/// Clauses equal to an earlier one as literal multisets are rejected and
/// redrawn. This never returns if `num_clauses` exceeds
/// [`clause_space_size`]; callers own that bound.
pub fn random_unique_instance<R: Rng + ?Sized>(
    rng: &mut R,
    num_variables: usize,
    num_clauses: usize,
    width: usize,
) -> CnfResult<CnfInstance> {
    validate_width(num_variables, width)?;
    validate_clause_count(num_clauses)?;
    let space = clause_space_size(num_variables, width);
    if num_clauses as u128 > space {
        warn!(
            num_clauses,
            clause_space = space,
            "requested more distinct clauses than exist; generation will not terminate"
        );
    }

    let capacity = usize::try_from(space).map_or(num_clauses, |s| num_clauses.min(s));
    let mut seen = HashSet::with_capacity(capacity);
    let mut clauses = Vec::with_capacity(capacity);
    let mut rejected = 0usize;
    while clauses.len() < num_clauses {
        let clause = random_clause(rng, num_variables, width)?;
        if seen.insert(clause.canonical_key()) {
            clauses.push(clause);
        } else {
            rejected += 1;
        }
    }
    debug!(num_variables, num_clauses, rejected, "generated unique instance");
    CnfInstance::new(num_variables, clauses)
}

/// Number of distinct width-k clauses over n variables: C(n,k)·2^k.
///
/// Saturates at `u128::MAX`.
pub fn clause_space_size(num_variables: usize, width: usize) -> u128 {
    if width > num_variables {
        return 0;
    }
    let n = num_variables as u128;
    let k = width.min(num_variables - width) as u128;
    let mut binom: u128 = 1;
    for i in 0..k {
        binom = match binom.checked_mul(n - i) {
            Some(v) => v / (i + 1),
            None => return u128::MAX,
        };
    }
    u32::try_from(width)
        .ok()
        .and_then(|w| 2u128.checked_pow(w))
        .and_then(|p| binom.checked_mul(p))
        .unwrap_or(u128::MAX)
}

fn validate_width(num_variables: usize, width: usize) -> CnfResult<()> {
    if width == 0 {
        return Err(CnfError::InvalidArgument(
            "clause width must be at least 1".into(),
        ));
    }
    if width > num_variables {
        return Err(CnfError::InvalidArgument(format!(
            "clause width {width} exceeds variable count {num_variables}"
        )));
    }
    Ok(())
}

fn validate_clause_count(num_clauses: usize) -> CnfResult<()> {
    if num_clauses > MAX_CLAUSES {
        return Err(CnfError::InvalidArgument(format!(
            "clause count {num_clauses} exceeds the limit of {MAX_CLAUSES}"
        )));
    }
    Ok(())
}

/// Parameters of a random instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Variable count n.
    pub num_variables: usize,
    /// Clause count m.
    pub num_clauses: usize,
    /// Literals per clause k.
    pub clause_width: usize,
    /// Reject duplicate clauses.
    pub unique: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            num_variables: 10,
            num_clauses: 42,
            clause_width: DEFAULT_CLAUSE_WIDTH,
            unique: false,
        }
    }
}

impl GeneratorConfig {
    /// Config for n variables at the given clause density, m = ⌊n·density⌋.
    ///
    /// A non-finite or negative density saturates m; [`Self::generate`]
    /// rejects counts above [`MAX_CLAUSES`].
    pub fn at_density(num_variables: usize, density: f64) -> Self {
        Self {
            num_variables,
            num_clauses: (num_variables as f64 * density).floor() as usize,
            ..Self::default()
        }
    }

    /// Set the clause width.
    #[must_use]
    pub fn with_clause_width(mut self, width: usize) -> Self {
        self.clause_width = width;
        self
    }

    /// Enable or disable duplicate rejection.
    #[must_use]
    pub fn with_unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    /// Generate one instance.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> CnfResult<CnfInstance> {
        if self.unique {
            random_unique_instance(rng, self.num_variables, self.num_clauses, self.clause_width)
        } else {
            random_instance(rng, self.num_variables, self.num_clauses, self.clause_width)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn width_larger_than_variables_fails() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            random_clause(&mut rng, 2, 3),
            Err(CnfError::InvalidArgument(_))
        ));
        assert!(random_instance(&mut rng, 2, 5, 3).is_err());
    }

    #[test]
    fn oversized_clause_count_fails() {
        let mut rng = StdRng::seed_from_u64(1);
        for unique in [false, true] {
            let config = GeneratorConfig::at_density(10, 1e300).with_unique(unique);
            assert_eq!(config.num_clauses, usize::MAX);
            assert!(matches!(
                config.generate(&mut rng),
                Err(CnfError::InvalidArgument(_))
            ));
        }
        assert!(random_instance(&mut rng, 10, MAX_CLAUSES + 1, 3).is_err());
    }

    #[test]
    fn zero_width_fails() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(random_clause(&mut rng, 5, 0).is_err());
    }

    #[test]
    fn width_equal_to_variables_uses_all() {
        let mut rng = StdRng::seed_from_u64(3);
        let c = random_clause(&mut rng, 3, 3).unwrap();
        let mut vars: Vec<usize> = c.variables().collect();
        vars.sort_unstable();
        assert_eq!(vars, vec![1, 2, 3]);
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let a = random_instance(&mut StdRng::seed_from_u64(99), 8, 20, 3).unwrap();
        let b = random_instance(&mut StdRng::seed_from_u64(99), 8, 20, 3).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn clause_space() {
        // C(3,3)·8
        assert_eq!(clause_space_size(3, 3), 8);
        // C(5,3)·8 = 10·8
        assert_eq!(clause_space_size(5, 3), 80);
        assert_eq!(clause_space_size(2, 3), 0);
        assert_eq!(clause_space_size(4, 1), 8);
    }

    #[test]
    fn unique_instance_can_exhaust_small_space() {
        let mut rng = StdRng::seed_from_u64(5);
        let inst = random_unique_instance(&mut rng, 3, 8, 3).unwrap();
        assert_eq!(inst.num_clauses(), 8);
        assert!(!inst.has_duplicate_clauses());
    }

    #[test]
    fn config_at_density_floors() {
        let cfg = GeneratorConfig::at_density(10, 4.27);
        assert_eq!(cfg.num_clauses, 42);
        assert_eq!(cfg.clause_width, 3);
        assert!(!cfg.unique);
    }

    #[test]
    fn config_dispatches_on_unique() {
        let cfg = GeneratorConfig::at_density(4, 8.0).with_unique(true);
        let inst = cfg.generate(&mut StdRng::seed_from_u64(11)).unwrap();
        assert_eq!(inst.num_clauses(), 32);
        assert!(!inst.has_duplicate_clauses());
    }
}

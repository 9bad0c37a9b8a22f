//! SAT oracles.
//!
//! [`SatOracle`] is the seam between the experiments and whatever decides
//! satisfiability. Two implementations ship:
//!
//! - [`VarisatOracle`]: the `varisat` CDCL solver, complete and exact.
//! - [`BoundedOracle`]: exhaustive enumeration under an assignment budget;
//!   answers [`SatVerdict::Unknown`] once the budget runs out.
//!
//! Every reported model is checked against the instance before it leaves
//! the oracle.

use quasat_cnf::{Assignment, CnfInstance};
use tracing::{debug, trace};
use varisat::{ExtendFormula, Lit, Solver};

use crate::error::{OracleError, OracleResult};
use crate::verdict::SatVerdict;

/// A procedure deciding satisfiability of CNF instances.
pub trait SatOracle {
    /// Short identifier used in logs and errors.
    fn name(&self) -> &str;

    /// Decide `instance`.
    ///
    /// Solver failures are returned as errors; an undecided instance is
    /// `Ok(SatVerdict::Unknown)`.
    fn solve(&self, instance: &CnfInstance) -> OracleResult<SatVerdict>;
}

impl<O: SatOracle + ?Sized> SatOracle for &O {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn solve(&self, instance: &CnfInstance) -> OracleResult<SatVerdict> {
        (**self).solve(instance)
    }
}

impl<O: SatOracle + ?Sized> SatOracle for Box<O> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn solve(&self, instance: &CnfInstance) -> OracleResult<SatVerdict> {
        (**self).solve(instance)
    }
}

// ---------------------------------------------------------------------------
// varisat
// ---------------------------------------------------------------------------

/// Exact oracle backed by the `varisat` CDCL solver.
///
/// A fresh solver is built per query, so queries are independent.
#[derive(Debug, Clone, Copy, Default)]
pub struct VarisatOracle;

impl VarisatOracle {
    /// Create the oracle.
    pub fn new() -> Self {
        Self
    }
}

impl SatOracle for VarisatOracle {
    fn name(&self) -> &str {
        "varisat"
    }

    fn solve(&self, instance: &CnfInstance) -> OracleResult<SatVerdict> {
        let mut solver = Solver::new();
        let mut lits: Vec<Lit> = Vec::new();
        for clause in instance.raw_clauses() {
            lits.clear();
            lits.extend(clause.iter().map(|&v| Lit::from_dimacs(v as isize)));
            solver.add_clause(&lits);
        }

        let satisfiable = solver.solve().map_err(|e| OracleError::Solver {
            solver: self.name().into(),
            message: e.to_string(),
        })?;
        debug!(
            num_variables = instance.num_variables(),
            num_clauses = instance.num_clauses(),
            satisfiable,
            "varisat finished"
        );

        if !satisfiable {
            return Ok(SatVerdict::Unsatisfiable);
        }

        let model: Vec<i32> = solver
            .model()
            .ok_or_else(|| OracleError::Solver {
                solver: self.name().into(),
                message: "satisfiable result without a model".into(),
            })?
            .into_iter()
            .map(|lit| lit.to_dimacs() as i32)
            .filter(|v| v.unsigned_abs() as usize <= instance.num_variables())
            .collect();
        let assignment = Assignment::from_dimacs(&model, instance.num_variables())?;
        verified(self.name(), instance, assignment)
    }
}

// ---------------------------------------------------------------------------
// Bounded enumeration
// ---------------------------------------------------------------------------

/// Exhaustive oracle that examines at most `budget` assignments.
///
/// Assignments are enumerated in binary counting order (bit `v-1` of the
/// counter is the value of variable v), so small instances are decided
/// exactly and large ones come back [`SatVerdict::Unknown`].
#[derive(Debug, Clone, Copy)]
pub struct BoundedOracle {
    budget: u64,
}

impl Default for BoundedOracle {
    fn default() -> Self {
        Self { budget: 1 << 20 }
    }
}

impl BoundedOracle {
    /// Oracle examining at most `budget` assignments.
    pub fn new(budget: u64) -> Self {
        Self { budget }
    }

    /// The assignment budget.
    pub fn budget(&self) -> u64 {
        self.budget
    }
}

impl SatOracle for BoundedOracle {
    fn name(&self) -> &str {
        "bounded-enumeration"
    }

    fn solve(&self, instance: &CnfInstance) -> OracleResult<SatVerdict> {
        let n = instance.num_variables();
        if instance.num_clauses() == 0 {
            return verified(self.name(), instance, Assignment::all_false(n));
        }
        // None: more assignments than a u64 counter can reach.
        let total: Option<u64> = u32::try_from(n).ok().and_then(|n| 1u64.checked_shl(n));
        let limit = total.map_or(self.budget, |t| t.min(self.budget));

        for index in 0..limit {
            let assignment = Assignment::from(
                (0..n)
                    .map(|q| q < 64 && (index >> q) & 1 == 1)
                    .collect::<Vec<bool>>(),
            );
            if instance.is_satisfied_by(&assignment)? {
                trace!(index, "bounded oracle found model");
                return verified(self.name(), instance, assignment);
            }
        }

        match total {
            Some(t) if limit == t => Ok(SatVerdict::Unsatisfiable),
            _ => {
                debug!(
                    num_variables = n,
                    budget = self.budget,
                    "assignment budget exhausted"
                );
                Ok(SatVerdict::Unknown)
            }
        }
    }
}

fn verified(
    solver: &str,
    instance: &CnfInstance,
    assignment: Assignment,
) -> OracleResult<SatVerdict> {
    let violated = instance.violated_count(&assignment)?;
    if violated > 0 {
        return Err(OracleError::InvalidModel {
            solver: solver.into(),
            violated,
        });
    }
    Ok(SatVerdict::Satisfiable(assignment))
}

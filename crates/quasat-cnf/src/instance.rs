//! CNF instances: a conjunction of clauses over a fixed variable count.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::assignment::Assignment;
use crate::clause::Clause;
use crate::error::{CnfError, CnfResult};

/// A formula in conjunctive normal form.
///
/// Clause order carries no meaning but is preserved, so a seeded generator
/// reproduces the exact same instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CnfInstance {
    num_variables: usize,
    clauses: Vec<Clause>,
}

impl CnfInstance {
    /// Build an instance, checking every literal against `num_variables`.
    pub fn new(num_variables: usize, clauses: Vec<Clause>) -> CnfResult<Self> {
        for clause in &clauses {
            check_range(clause, num_variables)?;
        }
        Ok(Self {
            num_variables,
            clauses,
        })
    }

    /// An instance with no clauses (vacuously satisfiable).
    pub fn empty(num_variables: usize) -> Self {
        Self {
            num_variables,
            clauses: Vec::new(),
        }
    }

    /// Build from DIMACS integer clauses.
    pub fn from_dimacs(num_variables: usize, clauses: &[Vec<i32>]) -> CnfResult<Self> {
        let clauses = clauses
            .iter()
            .map(|c| Clause::from_dimacs(c))
            .collect::<CnfResult<Vec<_>>>()?;
        Self::new(num_variables, clauses)
    }

    /// Append a clause.
    pub fn push(&mut self, clause: Clause) -> CnfResult<()> {
        check_range(&clause, self.num_variables)?;
        self.clauses.push(clause);
        Ok(())
    }

    /// Declared variable count n.
    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    /// Clause count m.
    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    /// The clauses, in insertion order.
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Clause density m / n (0 for an instance without variables).
    pub fn density(&self) -> f64 {
        if self.num_variables == 0 {
            0.0
        } else {
            self.clauses.len() as f64 / self.num_variables as f64
        }
    }

    /// DIMACS integer clauses, the shape external solvers consume.
    pub fn raw_clauses(&self) -> Vec<Vec<i32>> {
        self.clauses.iter().map(Clause::to_dimacs).collect()
    }

    /// Number of clauses falsified by `assignment`.
    pub fn violated_count(&self, assignment: &Assignment) -> CnfResult<usize> {
        self.check_assignment(assignment)?;
        Ok(self
            .clauses
            .iter()
            .filter(|c| !c.is_satisfied_by(assignment))
            .count())
    }

    /// True if `assignment` satisfies every clause.
    pub fn is_satisfied_by(&self, assignment: &Assignment) -> CnfResult<bool> {
        self.check_assignment(assignment)?;
        Ok(self.clauses.iter().all(|c| c.is_satisfied_by(assignment)))
    }

    /// True if two clauses are equal as literal multisets.
    pub fn has_duplicate_clauses(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.clauses.len());
        !self.clauses.iter().all(|c| seen.insert(c.canonical_key()))
    }

    fn check_assignment(&self, assignment: &Assignment) -> CnfResult<()> {
        if assignment.len() != self.num_variables {
            return Err(CnfError::AssignmentLength {
                expected: self.num_variables,
                actual: assignment.len(),
            });
        }
        Ok(())
    }
}

fn check_range(clause: &Clause, num_variables: usize) -> CnfResult<()> {
    match clause.max_var() {
        Some(var) if var > num_variables => {
            Err(CnfError::VariableOutOfRange { var, num_variables })
        }
        _ => Ok(()),
    }
}

impl fmt::Display for CnfInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "CNF ({} variables, {} clauses, density {:.2}):",
            self.num_variables,
            self.clauses.len(),
            self.density()
        )?;
        for clause in &self.clauses {
            writeln!(f, "  {clause}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_literal_rejected() {
        let err = CnfInstance::from_dimacs(3, &[vec![1, 2, 4]]).unwrap_err();
        assert!(matches!(
            err,
            CnfError::VariableOutOfRange {
                var: 4,
                num_variables: 3
            }
        ));
    }

    #[test]
    fn violated_count_counts_falsified_clauses() {
        let inst = CnfInstance::from_dimacs(2, &[vec![1], vec![2], vec![-1, -2]]).unwrap();
        let tt = Assignment::from(vec![true, true]);
        let ff = Assignment::from(vec![false, false]);
        assert_eq!(inst.violated_count(&tt).unwrap(), 1);
        assert_eq!(inst.violated_count(&ff).unwrap(), 2);
    }

    #[test]
    fn assignment_length_checked() {
        let inst = CnfInstance::from_dimacs(2, &[vec![1, 2]]).unwrap();
        assert!(matches!(
            inst.is_satisfied_by(&Assignment::from(vec![true])),
            Err(CnfError::AssignmentLength {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn duplicate_detection_uses_multisets() {
        let inst = CnfInstance::from_dimacs(3, &[vec![1, -2, 3], vec![3, 1, -2]]).unwrap();
        assert!(inst.has_duplicate_clauses());
        let inst = CnfInstance::from_dimacs(3, &[vec![1, -2, 3], vec![1, 2, 3]]).unwrap();
        assert!(!inst.has_duplicate_clauses());
    }

    #[test]
    fn density() {
        let inst = CnfInstance::from_dimacs(4, &[vec![1], vec![2]]).unwrap();
        assert!((inst.density() - 0.5).abs() < 1e-12);
        assert_eq!(CnfInstance::empty(0).density(), 0.0);
    }
}

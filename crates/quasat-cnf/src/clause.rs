//! Clauses: disjunctions of literals over distinct variables.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::assignment::Assignment;
use crate::error::{CnfError, CnfResult};
use crate::literal::Literal;

/// A disjunction of literals.
///
/// Literal order is preserved as given; no two literals share a variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Literal>", into = "Vec<Literal>")]
pub struct Clause {
    literals: Vec<Literal>,
}

impl Clause {
    /// Build a clause, rejecting repeated variables.
    pub fn new(literals: impl IntoIterator<Item = Literal>) -> CnfResult<Self> {
        let literals: Vec<Literal> = literals.into_iter().collect();
        let mut vars: Vec<usize> = literals.iter().map(|l| l.var()).collect();
        vars.sort_unstable();
        if let Some(w) = vars.windows(2).find(|w| w[0] == w[1]) {
            return Err(CnfError::DuplicateVariable { var: w[0] });
        }
        Ok(Self { literals })
    }

    /// Build a clause from DIMACS integers.
    pub fn from_dimacs(values: &[i32]) -> CnfResult<Self> {
        let literals = values
            .iter()
            .map(|&v| Literal::new(v))
            .collect::<CnfResult<Vec<_>>>()?;
        Self::new(literals)
    }

    /// The literals, in insertion order.
    pub fn literals(&self) -> &[Literal] {
        &self.literals
    }

    /// Number of literals.
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    /// The empty clause is unsatisfiable.
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Variables touched by this clause, in literal order.
    pub fn variables(&self) -> impl Iterator<Item = usize> + '_ {
        self.literals.iter().map(|l| l.var())
    }

    /// Highest variable index, `None` for the empty clause.
    pub fn max_var(&self) -> Option<usize> {
        self.variables().max()
    }

    /// Order-independent identity: the literals sorted by variable.
    ///
    /// Two clauses are equal as literal multisets iff their keys are equal.
    pub fn canonical_key(&self) -> Vec<Literal> {
        let mut key = self.literals.clone();
        key.sort_unstable_by_key(|l| (l.var(), l.is_negative()));
        key
    }

    /// The clause with every literal flipped.
    ///
    /// The pair forbids exactly two assignments of the clause's variables,
    /// so it is contradictory only for unit clauses.
    #[must_use]
    pub fn negated(&self) -> Self {
        Self {
            literals: self.literals.iter().map(|l| l.negate()).collect(),
        }
    }

    /// True if at least one literal holds under `assignment`.
    ///
    /// Variables beyond the assignment's length read as `false`.
    pub fn is_satisfied_by(&self, assignment: &Assignment) -> bool {
        self.literals
            .iter()
            .any(|l| l.is_satisfied_by(assignment.value(l.var())))
    }

    /// DIMACS integers of this clause.
    pub fn to_dimacs(&self) -> Vec<i32> {
        self.literals.iter().map(|l| l.to_dimacs()).collect()
    }
}

impl TryFrom<Vec<Literal>> for Clause {
    type Error = CnfError;

    fn try_from(literals: Vec<Literal>) -> Result<Self, Self::Error> {
        Self::new(literals)
    }
}

impl From<Clause> for Vec<Literal> {
    fn from(clause: Clause) -> Self {
        clause.literals
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.literals.is_empty() {
            return write!(f, "⊥");
        }
        write!(f, "(")?;
        for (i, lit) in self.literals.iter().enumerate() {
            if i > 0 {
                write!(f, " ∨ ")?;
            }
            write!(f, "{lit}")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_variable_rejected() {
        assert!(matches!(
            Clause::from_dimacs(&[1, -2, -1]),
            Err(CnfError::DuplicateVariable { var: 1 })
        ));
    }

    #[test]
    fn canonical_key_ignores_order() {
        let a = Clause::from_dimacs(&[3, -1, 2]).unwrap();
        let b = Clause::from_dimacs(&[-1, 2, 3]).unwrap();
        assert_ne!(a, b);
        assert_eq!(a.canonical_key(), b.canonical_key());
    }

    #[test]
    fn negated_flips_every_literal() {
        let c = Clause::from_dimacs(&[1, -2, 3]).unwrap();
        assert_eq!(c.negated().to_dimacs(), vec![-1, 2, -3]);
    }

    #[test]
    fn satisfaction() {
        let c = Clause::from_dimacs(&[1, -2]).unwrap();
        assert!(c.is_satisfied_by(&Assignment::from(vec![true, true])));
        assert!(c.is_satisfied_by(&Assignment::from(vec![false, false])));
        assert!(!c.is_satisfied_by(&Assignment::from(vec![false, true])));
    }

    #[test]
    fn empty_clause_is_never_satisfied() {
        let c = Clause::new(Vec::<Literal>::new()).unwrap();
        assert!(c.is_empty());
        assert!(!c.is_satisfied_by(&Assignment::from(vec![true])));
        assert_eq!(c.to_string(), "⊥");
    }

    #[test]
    fn display() {
        let c = Clause::from_dimacs(&[1, -2]).unwrap();
        assert_eq!(c.to_string(), "(x1 ∨ ¬x2)");
    }
}

//! Signed literals in the DIMACS convention.
//!
//! A literal is a nonzero integer: its magnitude is the 1-based variable
//! index and its sign the polarity (`3` is x₃, `-3` is ¬x₃).

use std::fmt;
use std::num::NonZeroI32;

use serde::{Deserialize, Serialize};

use crate::error::{CnfError, CnfResult};

/// A variable or its negation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Literal(NonZeroI32);

impl Literal {
    /// Build a literal from its DIMACS integer.
    ///
    /// `i32::MIN` is rejected so every literal can be negated.
    pub fn new(value: i32) -> CnfResult<Self> {
        if value == i32::MIN {
            return Err(CnfError::InvalidArgument(format!(
                "literal {value} has no negation"
            )));
        }
        NonZeroI32::new(value).map(Self).ok_or(CnfError::ZeroLiteral)
    }

    /// Positive literal of a 1-based variable.
    pub fn positive(var: usize) -> CnfResult<Self> {
        Self::new(var_to_i32(var)?)
    }

    /// Negative literal of a 1-based variable.
    pub fn negative(var: usize) -> CnfResult<Self> {
        Self::new(-var_to_i32(var)?)
    }

    /// The 1-based variable index.
    pub fn var(self) -> usize {
        self.0.get().unsigned_abs() as usize
    }

    /// True for an un-negated variable.
    pub fn is_positive(self) -> bool {
        self.0.get() > 0
    }

    /// True for a negated variable.
    pub fn is_negative(self) -> bool {
        !self.is_positive()
    }

    /// The opposite-polarity literal on the same variable.
    #[must_use]
    pub fn negate(self) -> Self {
        Self(-self.0)
    }

    /// The DIMACS integer.
    pub fn to_dimacs(self) -> i32 {
        self.0.get()
    }

    /// Whether this literal is true when its variable takes `value`.
    pub fn is_satisfied_by(self, value: bool) -> bool {
        self.is_positive() == value
    }
}

fn var_to_i32(var: usize) -> CnfResult<i32> {
    i32::try_from(var)
        .ok()
        .filter(|v| *v > 0)
        .ok_or_else(|| CnfError::InvalidArgument(format!("variable index {var} out of range")))
}

impl TryFrom<i32> for Literal {
    type Error = CnfError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Literal> for i32 {
    fn from(lit: Literal) -> Self {
        lit.to_dimacs()
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_positive() {
            write!(f, "x{}", self.var())
        } else {
            write!(f, "¬x{}", self.var())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_rejected() {
        assert!(matches!(Literal::new(0), Err(CnfError::ZeroLiteral)));
    }

    #[test]
    fn unnegatable_minimum_is_rejected() {
        assert!(matches!(
            Literal::new(i32::MIN),
            Err(CnfError::InvalidArgument(_))
        ));
        let l = Literal::new(-i32::MAX).unwrap();
        assert_eq!(l.negate().to_dimacs(), i32::MAX);
    }

    #[test]
    fn sign_and_magnitude() {
        let l = Literal::new(-7).unwrap();
        assert_eq!(l.var(), 7);
        assert!(l.is_negative());
        assert_eq!(l.negate().to_dimacs(), 7);
        assert!(l.is_satisfied_by(false));
        assert!(!l.is_satisfied_by(true));
    }

    #[test]
    fn constructors_from_var() {
        assert_eq!(Literal::positive(3).unwrap().to_dimacs(), 3);
        assert_eq!(Literal::negative(3).unwrap().to_dimacs(), -3);
        assert!(Literal::positive(0).is_err());
    }

    #[test]
    fn serde_uses_plain_integer() {
        let l = Literal::new(-4).unwrap();
        assert_eq!(serde_json::to_string(&l).unwrap(), "-4");
        assert!(serde_json::from_str::<Literal>("0").is_err());
    }

    #[test]
    fn display() {
        assert_eq!(Literal::new(2).unwrap().to_string(), "x2");
        assert_eq!(Literal::new(-2).unwrap().to_string(), "¬x2");
    }
}

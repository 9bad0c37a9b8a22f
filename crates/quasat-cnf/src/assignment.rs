//! Total truth assignments.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CnfError, CnfResult};

/// A truth value per variable; index `i` holds variable `i + 1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Assignment(Vec<bool>);

impl Assignment {
    /// All variables false.
    pub fn all_false(num_variables: usize) -> Self {
        Self(vec![false; num_variables])
    }

    /// Build from signed DIMACS values (`v` = true, `-v` = false).
    ///
    /// Variables not mentioned default to `false`.
    pub fn from_dimacs(values: &[i32], num_variables: usize) -> CnfResult<Self> {
        let mut assignment = Self::all_false(num_variables);
        for &value in values {
            if value == 0 {
                return Err(CnfError::ZeroLiteral);
            }
            let var = value.unsigned_abs() as usize;
            if var > num_variables {
                return Err(CnfError::VariableOutOfRange { var, num_variables });
            }
            assignment.0[var - 1] = value > 0;
        }
        Ok(assignment)
    }

    /// Signed DIMACS values, one per variable.
    pub fn to_dimacs(&self) -> Vec<i32> {
        self.0
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let var = i as i32 + 1;
                if v { var } else { -var }
            })
            .collect()
    }

    /// Value of a 1-based variable; out-of-range variables read as `false`.
    pub fn value(&self, var: usize) -> bool {
        var.checked_sub(1)
            .and_then(|i| self.0.get(i))
            .copied()
            .unwrap_or(false)
    }

    /// Set a 1-based variable.
    pub fn set(&mut self, var: usize, value: bool) -> CnfResult<()> {
        let num_variables = self.0.len();
        let slot = var
            .checked_sub(1)
            .and_then(|i| self.0.get_mut(i))
            .ok_or(CnfError::VariableOutOfRange { var, num_variables })?;
        *slot = value;
        Ok(())
    }

    /// Number of variables covered.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no variables are covered.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The raw values.
    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }
}

impl From<Vec<bool>> for Assignment {
    fn from(values: Vec<bool>) -> Self {
        Self(values)
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &v in &self.0 {
            write!(f, "{}", u8::from(v))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimacs_roundtrip() {
        let a = Assignment::from_dimacs(&[1, -2, 3], 3).unwrap();
        assert_eq!(a.as_slice(), &[true, false, true]);
        assert_eq!(a.to_dimacs(), vec![1, -2, 3]);
    }

    #[test]
    fn missing_variables_default_false() {
        let a = Assignment::from_dimacs(&[2], 3).unwrap();
        assert_eq!(a.as_slice(), &[false, true, false]);
    }

    #[test]
    fn out_of_range_rejected() {
        assert!(matches!(
            Assignment::from_dimacs(&[4], 3),
            Err(CnfError::VariableOutOfRange { var: 4, num_variables: 3 })
        ));
        let mut a = Assignment::all_false(2);
        assert!(a.set(3, true).is_err());
        assert!(a.set(0, true).is_err());
    }

    #[test]
    fn value_out_of_range_is_false() {
        let a = Assignment::from(vec![true]);
        assert!(a.value(1));
        assert!(!a.value(0));
        assert!(!a.value(2));
    }

    #[test]
    fn display_as_bits() {
        assert_eq!(Assignment::from(vec![true, false, true]).to_string(), "101");
    }
}

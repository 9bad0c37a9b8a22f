//! The three-valued answer of a SAT oracle.

use std::fmt;

use quasat_cnf::Assignment;
use serde::{Deserialize, Serialize};

/// Outcome of a satisfiability query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SatVerdict {
    /// The instance has a model; one is attached.
    Satisfiable(Assignment),
    /// No assignment satisfies the instance.
    Unsatisfiable,
    /// A resource-bounded oracle gave up before deciding.
    Unknown,
}

impl SatVerdict {
    /// True for [`SatVerdict::Satisfiable`].
    pub fn is_satisfiable(&self) -> bool {
        matches!(self, Self::Satisfiable(_))
    }

    /// True for [`SatVerdict::Unsatisfiable`].
    pub fn is_unsatisfiable(&self) -> bool {
        matches!(self, Self::Unsatisfiable)
    }

    /// True for [`SatVerdict::Unknown`].
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// The model, if satisfiable.
    pub fn assignment(&self) -> Option<&Assignment> {
        match self {
            Self::Satisfiable(a) => Some(a),
            _ => None,
        }
    }
}

impl fmt::Display for SatVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Satisfiable(_) => write!(f, "SATISFIABLE"),
            Self::Unsatisfiable => write!(f, "UNSATISFIABLE"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

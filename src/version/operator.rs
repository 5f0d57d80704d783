//! Comparison operators used to evaluate a [crate::dependency::DepAtom]'s
//! version constraint against a candidate [Version].

use super::Version;
use std::cmp::Ordering;

/// One of the five relational operators Debian dependency syntax permits
/// inside a version constraint, e.g. the `>=` in `foo (>= 1.0)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VersionOperator {
    /// `=` -- exact match.
    Equal,
    /// `>=` -- greater than or equal to.
    GreaterOrEqual,
    /// `<=` -- less than or equal to.
    LessOrEqual,
    /// `>>` -- strictly greater than.
    StrictlyGreater,
    /// `<<` -- strictly less than.
    StrictlyLess,
}

impl VersionOperator {
    /// Parse the operator token exactly as it appears between a package
    /// name and a version inside `( … )`. Unlike `==`-tolerant parsers
    /// elsewhere in the Debian tooling ecosystem, only the five canonical
    /// tokens are accepted; anything else is a programmer/parser error.
    pub fn from_token(token: &str) -> Option<Self> {
        Some(match token {
            "=" => Self::Equal,
            ">=" => Self::GreaterOrEqual,
            "<=" => Self::LessOrEqual,
            ">>" => Self::StrictlyGreater,
            "<<" => Self::StrictlyLess,
            _ => return None,
        })
    }

    /// Render the operator back to its canonical token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::GreaterOrEqual => ">=",
            Self::LessOrEqual => "<=",
            Self::StrictlyGreater => ">>",
            Self::StrictlyLess => "<<",
        }
    }

    fn accepts(&self, ord: Ordering) -> bool {
        match self {
            Self::Equal => ord == Ordering::Equal,
            Self::GreaterOrEqual => ord != Ordering::Less,
            Self::LessOrEqual => ord != Ordering::Greater,
            Self::StrictlyGreater => ord == Ordering::Greater,
            Self::StrictlyLess => ord == Ordering::Less,
        }
    }
}

impl std::fmt::Display for VersionOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Evaluate whether `candidate` satisfies an (optional) version constraint.
/// Per §4.1, the absence of a constraint is always satisfied.
pub fn version_satisfies(candidate: &Version, constraint: Option<(VersionOperator, &Version)>) -> bool {
    match constraint {
        None => true,
        Some((op, needed)) => op.accepts(candidate.cmp(needed)),
    }
}

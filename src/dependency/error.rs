use super::GrammarRule as Rule;

/// A fault encountered while parsing a dependency-field or Provides-field
/// value. Every variant is surfaced as a [crate::error::ResolveError::ParseError]
/// by the caller.
#[derive(Debug)]
pub enum Error {
    /// The input did not match the dependency grammar at all (malformed
    /// name, unbalanced parens/brackets, stray punctuation, ...).
    Grammar(Box<pest::error::Error<Rule>>),
    /// An operator token was not one of `=`, `>=`, `<=`, `>>`, `<<`.
    UnknownOperator(String),
    /// A version string inside `( … )` did not parse as a [crate::version::Version].
    InvalidVersion(String),
    /// An atom had `(` without both an operator and a version, or vice versa.
    MalformedVersionConstraint,
    /// An atom or Provides entry had no parseable name.
    MalformedName,
    /// An arch qualifier or arch-list entry was empty.
    EmptyArchQualifier,
    /// A build-profile restriction annotation (`<...>`) was present. Per
    /// §4.3 these are never permitted; silently dropping one could hide a
    /// real runtime requirement.
    BuildProfileNotPermitted,
    /// A Provides entry used an operator other than `=`; Debian policy
    /// only permits `=` in versioned Provides.
    InvalidProvidesOperator(String),
}

impl From<pest::error::Error<Rule>> for Error {
    fn from(e: pest::error::Error<Rule>) -> Self {
        Error::Grammar(Box::new(e))
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Grammar(e) => write!(f, "malformed dependency expression: {e}"),
            Error::UnknownOperator(op) => write!(f, "unknown version operator {op:?}"),
            Error::InvalidVersion(msg) => write!(f, "invalid version: {msg}"),
            Error::MalformedVersionConstraint => {
                write!(f, "version constraint requires both an operator and a version")
            }
            Error::MalformedName => write!(f, "missing or malformed package name"),
            Error::EmptyArchQualifier => write!(f, "empty architecture qualifier"),
            Error::BuildProfileNotPermitted => {
                write!(f, "build-profile restriction annotations (<...>) are not permitted")
            }
            Error::InvalidProvidesOperator(op) => write!(
                f,
                "Provides entries may only use '=', found {op:?}"
            ),
        }
    }
}

impl std::error::Error for Error {}

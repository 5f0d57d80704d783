use super::error::Error;
use super::{Grammar, GrammarRule as Rule};
use crate::architecture::Architecture;
use crate::version::{Version, VersionOperator};
use pest::iterators::Pair;
use pest::Parser;
use std::str::FromStr;

/// The `:any`/`:native`/`:<arch>` suffix on a dependency atom.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArchQualifier {
    /// `:any` -- satisfied by any architecture able to execute on this host
    /// (Multi-Arch `any`/`foreign` semantics collapse into the same
    /// candidate-arch set per §4.5 step 2).
    Any,
    /// `:native` -- must be resolved against the build/run architecture.
    Native,
    /// `:arch` -- an explicit, literal architecture.
    Literal(Architecture),
}

impl std::fmt::Display for ArchQualifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArchQualifier::Any => write!(f, "any"),
            ArchQualifier::Native => write!(f, "native"),
            ArchQualifier::Literal(arch) => write!(f, "{arch}"),
        }
    }
}

impl FromStr for ArchQualifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        Ok(match s {
            "any" => ArchQualifier::Any,
            "native" => ArchQualifier::Native,
            other => ArchQualifier::Literal(
                Architecture::from_str(other).map_err(|_| Error::EmptyArchQualifier)?,
            ),
        })
    }
}

/// One atomic dependency requirement, e.g. `foo:any (>= 1.0) [amd64 arm64]`.
#[derive(Clone, Debug, PartialEq)]
pub struct DepAtom {
    /// The required package (or virtual package) name.
    pub name: String,
    /// The `:qual` suffix, if present.
    pub arch_qual: Option<ArchQualifier>,
    /// The `(op ver)` version constraint, if present.
    pub version_constraint: Option<(VersionOperator, Version)>,
    /// The `[arch ...]` restriction list. Empty means "no restriction".
    pub arch_list: Vec<Architecture>,
}

impl std::fmt::Display for DepAtom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(qual) = &self.arch_qual {
            write!(f, ":{qual}")?;
        }
        if let Some((op, ver)) = &self.version_constraint {
            write!(f, " ({op} {ver})")?;
        }
        if !self.arch_list.is_empty() {
            let archs: Vec<String> = self.arch_list.iter().map(|a| a.to_string()).collect();
            write!(f, " [{}]", archs.join(" "))?;
        }
        Ok(())
    }
}

/// An ordered, non-empty list of [DepAtom]s joined by `|` -- any single
/// atom satisfies the whole group.
#[derive(Clone, Debug, PartialEq)]
pub struct DepGroup {
    /// The atoms, in their original left-to-right order.
    pub atoms: Vec<DepAtom>,
}

impl std::fmt::Display for DepGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.atoms.iter().map(|a| a.to_string()).collect();
        write!(f, "{}", parts.join(" | "))
    }
}

fn build_atom(pair: Pair<'_, Rule>) -> Result<DepAtom, Error> {
    debug_assert_eq!(pair.as_rule(), Rule::atom);

    let mut name = None;
    let mut arch_qual = None;
    let mut op = None;
    let mut ver = None;
    let mut arch_list = Vec::new();
    let mut saw_build_profile = false;

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::name => name = Some(inner.as_str().to_owned()),
            Rule::archqual => arch_qual = Some(ArchQualifier::from_str(inner.as_str())?),
            Rule::op => {
                op = Some(
                    VersionOperator::from_token(inner.as_str())
                        .ok_or_else(|| Error::UnknownOperator(inner.as_str().to_owned()))?,
                )
            }
            Rule::ver => {
                let raw = inner.as_str().trim();
                ver = Some(Version::from_str(raw).map_err(|e| Error::InvalidVersion(e.to_string()))?)
            }
            Rule::archlist => {
                for tok in inner.into_inner() {
                    arch_list.push(
                        Architecture::from_str(tok.as_str())
                            .map_err(|_| Error::EmptyArchQualifier)?,
                    );
                }
            }
            Rule::build_profile => saw_build_profile = true,
            _ => {}
        }
    }

    if saw_build_profile {
        return Err(Error::BuildProfileNotPermitted);
    }

    let name = name.ok_or(Error::MalformedName)?;
    let version_constraint = match (op, ver) {
        (Some(op), Some(ver)) => Some((op, ver)),
        (None, None) => None,
        _ => return Err(Error::MalformedVersionConstraint),
    };

    Ok(DepAtom {
        name,
        arch_qual,
        version_constraint,
        arch_list,
    })
}

fn build_group(pair: Pair<'_, Rule>) -> Result<DepGroup, Error> {
    debug_assert_eq!(pair.as_rule(), Rule::group);
    let atoms = pair
        .into_inner()
        .map(build_atom)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(DepGroup { atoms })
}

pub(super) fn parse_field(input: &str) -> Result<Vec<DepGroup>, Error> {
    let mut pairs = Grammar::parse(Rule::field, input)?;
    let field = pairs.next().expect("field rule always produces one pair");
    field
        .into_inner()
        .filter(|p| p.as_rule() == Rule::group)
        .map(build_group)
        .collect()
}

pub(super) fn parse_provides(
    input: &str,
) -> Result<Vec<(String, Option<Version>)>, Error> {
    let mut pairs = Grammar::parse(Rule::provides_field, input)?;
    let field = pairs
        .next()
        .expect("provides_field rule always produces one pair");

    let mut out = Vec::new();
    for entry in field.into_inner().filter(|p| p.as_rule() == Rule::provides_entry) {
        let mut name = None;
        let mut op = None;
        let mut ver = None;
        for inner in entry.into_inner() {
            match inner.as_rule() {
                Rule::name => name = Some(inner.as_str().to_owned()),
                Rule::op => op = Some(inner.as_str().to_owned()),
                Rule::ver => {
                    ver = Some(
                        Version::from_str(inner.as_str().trim())
                            .map_err(|e| Error::InvalidVersion(e.to_string()))?,
                    )
                }
                _ => {}
            }
        }
        let name = name.ok_or(Error::MalformedName)?;
        let version = match (op, ver) {
            (None, None) => None,
            (Some(op), Some(ver)) if op == "=" => Some(ver),
            (Some(op), _) => return Err(Error::InvalidProvidesOperator(op)),
            (None, Some(_)) => return Err(Error::MalformedVersionConstraint),
        };
        out.push((name, version));
    }
    Ok(out)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn simple_atom() {
        let groups = parse_field("foo").unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].atoms.len(), 1);
        assert_eq!(groups[0].atoms[0].name, "foo");
        assert!(groups[0].atoms[0].version_constraint.is_none());
    }

    #[test]
    fn versioned_atom() {
        let groups = parse_field("foo (>= 1.0)").unwrap();
        let (op, ver) = groups[0].atoms[0].version_constraint.as_ref().unwrap();
        assert_eq!(*op, VersionOperator::GreaterOrEqual);
        assert_eq!(ver.to_string(), "1.0");
    }

    #[test]
    fn arch_qualified_atom() {
        let groups = parse_field("foo:any").unwrap();
        assert_eq!(groups[0].atoms[0].arch_qual, Some(ArchQualifier::Any));
    }

    #[test]
    fn arch_restricted_atom() {
        let groups = parse_field("foo [amd64 arm64]").unwrap();
        assert_eq!(groups[0].atoms[0].arch_list.len(), 2);
    }

    #[test]
    fn groups_and_alternatives() {
        let groups = parse_field("a (>= 1.0) | b, c:arm64 [amd64]").unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].atoms.len(), 2);
        assert_eq!(groups[1].atoms.len(), 1);
    }

    #[test]
    fn round_trip_preserves_structure() {
        let original = "foo:any (>= 1.0) [amd64 arm64] | bar, baz:native (<< 2.0)";
        let groups = parse_field(original).unwrap();
        let rebuilt: Vec<String> = groups.iter().map(|g| g.to_string()).collect();
        let groups2 = parse_field(&rebuilt.join(", ")).unwrap();
        assert_eq!(groups, groups2);
    }

    #[test]
    fn build_profile_is_fatal() {
        let err = parse_field("foo <!nocheck>").unwrap_err();
        assert!(matches!(err, Error::BuildProfileNotPermitted));
    }

    #[test]
    fn unknown_operator_is_fatal() {
        assert!(parse_field("foo (~= 1.0)").is_err());
    }

    #[test]
    fn provides_simple() {
        let provides = parse_provides("default-mta, mail-transport-agent").unwrap();
        assert_eq!(provides.len(), 2);
        assert!(provides[0].1.is_none());
    }

    #[test]
    fn provides_versioned() {
        let provides = parse_provides("foo (= 2.1)").unwrap();
        assert_eq!(provides[0].0, "foo");
        assert_eq!(provides[0].1.as_ref().unwrap().to_string(), "2.1");
    }

    #[test]
    fn provides_non_equal_operator_is_fatal() {
        assert!(parse_provides("foo (>= 2.1)").is_err());
    }
}

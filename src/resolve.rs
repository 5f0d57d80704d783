// {{{ Copyright (c) Paul R. Tagliamonte <paultag@debian.org>, 2024
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN
// THE SOFTWARE. }}}

//! The atom resolver (C5) and alternative resolver (C6). Together these
//! turn one [DepGroup] into either a chosen [PackageRecord], "vacuously
//! satisfied" (every atom was not-applicable on this arch), or a fatal
//! [ResolveError::Unsatisfied].

use crate::architecture::Architecture;
use crate::dependency::{ArchQualifier, DepAtom, DepGroup};
use crate::error::ResolveError;
use crate::index::Indexes;
use crate::record::PackageRecord;
use crate::version::{version_satisfies, Version, VersionOperator};
use std::rc::Rc;

/// The outcome of resolving one [DepAtom], distinguishing "this atom
/// doesn't apply here" from "this atom applies but nothing satisfies it"
/// (§9, Design Notes) -- collapsing the two into one sentinel would lose
/// the information C6 needs for actionable diagnostics.
pub enum AtomOutcome {
    /// `atom.arch_list` was non-empty and excluded `target_arch`.
    NotApplicable,
    /// The atom applies here, but no record (real or virtual) satisfies it.
    Unsatisfied,
    /// Resolved to this concrete record.
    Resolved(Rc<PackageRecord>),
}

fn candidate_arches(atom: &DepAtom, target_arch: &Architecture) -> Vec<Architecture> {
    match &atom.arch_qual {
        None | Some(ArchQualifier::Any) | Some(ArchQualifier::Native) => {
            vec![target_arch.clone(), Architecture::All]
        }
        Some(ArchQualifier::Literal(arch)) => vec![arch.clone()],
    }
}

/// Whether a provider's declared (or own) version satisfies the atom's
/// constraint, per §4.5's "provided-version satisfaction" rule.
fn provider_satisfies(
    provider: &PackageRecord,
    virt_name: &str,
    constraint: Option<&(VersionOperator, Version)>,
) -> bool {
    let Some((op, needed)) = constraint else {
        return true;
    };
    match provider.provides.get(virt_name) {
        Some(Some(declared)) => version_satisfies(declared, Some((*op, needed))),
        _ => version_satisfies(&provider.version, Some((*op, needed))),
    }
}

/// Sort candidates descending by `(Version, source_hint)` and return the
/// first, per §4.5's best-candidate selection rule.
fn pick_best(mut candidates: Vec<Rc<PackageRecord>>) -> Option<Rc<PackageRecord>> {
    candidates.sort_by(|a, b| {
        b.version
            .cmp(&a.version)
            .then_with(|| a.source_hint.cmp(&b.source_hint))
    });
    candidates.into_iter().next()
}

/// Resolve a single [DepAtom] under `indexes.target_arch` (C5).
pub fn resolve_atom(indexes: &Indexes, atom: &DepAtom) -> AtomOutcome {
    if !atom.arch_list.is_empty() && !atom.arch_list.contains(&indexes.target_arch) {
        return AtomOutcome::NotApplicable;
    }

    let arches = candidate_arches(atom, &indexes.target_arch);
    let constraint = atom.version_constraint.as_ref();

    if let Some(records) = indexes.pkgs_by_name.get(&atom.name) {
        let direct: Vec<Rc<PackageRecord>> = records
            .iter()
            .filter(|r| arches.contains(&r.arch))
            .filter(|r| {
                version_satisfies(
                    &r.version,
                    constraint.map(|(op, ver)| (*op, ver)),
                )
            })
            .cloned()
            .collect();
        if let Some(best) = pick_best(direct) {
            return AtomOutcome::Resolved(best);
        }
    }

    if let Some(providers) = indexes.provides_index.get(&atom.name) {
        let virtual_candidates: Vec<Rc<PackageRecord>> = providers
            .iter()
            .filter(|r| arches.contains(&r.arch))
            .filter(|r| provider_satisfies(r, &atom.name, constraint))
            .cloned()
            .collect();
        if let Some(best) = pick_best(virtual_candidates) {
            return AtomOutcome::Resolved(best);
        }
    }

    AtomOutcome::Unsatisfied
}

/// Describe why an atom failed to resolve, for use in a group's fatal
/// diagnostic message.
fn reason(indexes: &Indexes, atom: &DepAtom) -> &'static str {
    match indexes.pkgs_by_name.get(&atom.name) {
        Some(records) if !records.is_empty() => "only other arches",
        _ if indexes.provides_index.contains_key(&atom.name) => {
            "only virtual without valid provider"
        }
        _ => "not in index",
    }
}

/// Resolve a [DepGroup] (C6): try atoms left-to-right, skipping
/// not-applicable ones, and return the first resolved record. `Ok(None)`
/// means the group was entirely not-applicable (vacuously satisfied, no
/// edge added). `Err` enumerates every atom and its reason.
pub fn resolve_group(
    indexes: &Indexes,
    group: &DepGroup,
) -> Result<Option<Rc<PackageRecord>>, ResolveError> {
    let mut all_not_applicable = true;

    for atom in &group.atoms {
        match resolve_atom(indexes, atom) {
            AtomOutcome::NotApplicable => continue,
            AtomOutcome::Resolved(record) => return Ok(Some(record)),
            AtomOutcome::Unsatisfied => all_not_applicable = false,
        }
    }

    if all_not_applicable {
        return Ok(None);
    }

    let detail: Vec<String> = group
        .atoms
        .iter()
        .map(|a| format!("{a} ({})", reason(indexes, a)))
        .collect();
    Err(ResolveError::Unsatisfied(format!(
        "no alternative satisfied: {}",
        detail.join(", ")
    )))
}


// vim: foldmethod=marker

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

//! The cycle-safe closure walker (C7): DFS from user-named roots,
//! downloading and recursing on every chosen record.

use crate::control_reader::read_control;
use crate::dependency::parse_dependency_field;
use crate::error::ResolveError;
use crate::fetch::{fetch_artifact, Downloader};
use crate::index::Indexes;
use crate::record::PackageRecord;
use crate::resolve::resolve_group;
use log::debug;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Resolver-scoped state for one invocation of [walk_closure]. Indexes are
/// immutable and shared across an entire run; the two visited sets belong
/// to a single walk and are never shared between runs (§3, Lifecycle).
pub struct ResolverContext<'a> {
    /// The immutable indexes built at startup (C4).
    pub indexes: &'a Indexes,
    /// Base URLs tried in order for every artifact (§6).
    pub base_urls: Vec<String>,
    /// Directory `.deb` artifacts are written to.
    pub download_dir: PathBuf,
    /// The [Downloader] implementation used to materialize artifacts.
    pub downloader: &'a dyn Downloader,
    /// `(name, version, arch)` triples already walked; prevents
    /// re-walking a chosen record reached through different virtual
    /// aliases (§9, Cyclic dependency graphs).
    pub visited_pkgkeys: HashSet<(String, String, String)>,
    /// Artifact relative paths already materialized this run.
    pub visited_filenames: HashSet<String>,
}

impl<'a> ResolverContext<'a> {
    /// Build a fresh context for one walk.
    pub fn new(
        indexes: &'a Indexes,
        base_urls: Vec<String>,
        download_dir: PathBuf,
        downloader: &'a dyn Downloader,
    ) -> Self {
        ResolverContext {
            indexes,
            base_urls,
            download_dir,
            downloader,
            visited_pkgkeys: HashSet::new(),
            visited_filenames: HashSet::new(),
        }
    }
}

fn pkgkey(record: &PackageRecord) -> (String, String, String) {
    (
        record.name.clone(),
        record.version.to_string(),
        record.arch.to_string(),
    )
}

/// Walk the closure of the install dependency graph starting from
/// `root_records`, one push per resolved top-level name (C7). Downloads
/// every newly-reached `.deb`, re-parses its real `Depends`/`Pre-Depends`
/// (mirror drift, §9), and recurses.
pub fn walk_closure(ctx: &mut ResolverContext<'_>, root_records: Vec<Rc<PackageRecord>>) -> Result<(), ResolveError> {
    let mut stack: Vec<Rc<PackageRecord>> = root_records;

    while let Some(record) = stack.pop() {
        let key = pkgkey(&record);
        if ctx.visited_pkgkeys.contains(&key) {
            continue;
        }
        ctx.visited_pkgkeys.insert(key);

        debug!("materializing {} {} ({})", record.name, record.version, record.arch);
        let deb_path = fetch_artifact(
            &record,
            &ctx.base_urls,
            &ctx.download_dir,
            ctx.downloader,
            &mut ctx.visited_filenames,
        )?;

        let control = read_control(&deb_path)?;
        let depends = control.field("Depends").unwrap_or("").trim();
        let pre_depends = control.field("Pre-Depends").unwrap_or("").trim();
        let combined = match (pre_depends, depends) {
            ("", "") => String::new(),
            ("", d) => d.to_owned(),
            (p, "") => p.to_owned(),
            (p, d) => format!("{p}, {d}"),
        };

        if combined.is_empty() {
            continue;
        }

        let groups = parse_dependency_field(&combined)?;
        for group in &groups {
            if let Some(chosen) = resolve_group(ctx.indexes, group)? {
                stack.push(chosen);
            }
        }
    }

    Ok(())
}

/// Resolve one user-supplied top-level name, treated as a singleton group
/// per §4.7; a failure here is fatal with diagnostics from C6.
pub fn resolve_root(indexes: &Indexes, atom_text: &str) -> Result<Rc<PackageRecord>, ResolveError> {
    let groups = parse_dependency_field(atom_text)?;
    let group = groups
        .into_iter()
        .next()
        .ok_or_else(|| ResolveError::ParseError(format!("empty top-level package name {atom_text:?}")))?;
    resolve_group(indexes, &group)?.ok_or_else(|| {
        ResolveError::Unsatisfied(format!(
            "top-level package {atom_text:?} is not applicable on this architecture"
        ))
    })
}

/// Entry point wiring C4's indexes, the user's `--packages` roots, and C8
/// together. Used by the CLI (C10); `download_dir` is created if absent.
pub fn resolve_and_download(
    indexes: &Indexes,
    package_names: &[String],
    base_urls: Vec<String>,
    download_dir: &Path,
    downloader: &dyn Downloader,
) -> Result<(), ResolveError> {
    let mut ctx = ResolverContext::new(indexes, base_urls, download_dir.to_path_buf(), downloader);

    let mut roots = Vec::new();
    for name in package_names {
        roots.push(resolve_root(indexes, name)?);
    }

    walk_closure(&mut ctx, roots)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::architecture::Architecture;
    use crate::stanza::parse_stanzas;
    use std::collections::HashMap;

    struct NullDownloader;
    impl Downloader for NullDownloader {
        fn get(&self, _url: &str) -> Result<Vec<u8>, String> {
            Err("network disabled in test".to_owned())
        }
    }

    fn indexes_from(stanzas: &[&str]) -> Indexes {
        let mut pkgs_by_name: HashMap<String, Vec<Rc<PackageRecord>>> = HashMap::new();
        let provides_index: HashMap<String, Vec<Rc<PackageRecord>>> = HashMap::new();
        for text in stanzas {
            let s = parse_stanzas(text).unwrap().remove(0);
            let record = Rc::new(PackageRecord::from_stanza(&s, "t/t/t/binary-arm64").unwrap());
            pkgs_by_name.entry(record.name.clone()).or_default().push(record);
        }
        Indexes {
            pkgs_by_name,
            provides_index,
            target_arch: Architecture::Named("arm64".to_owned()),
        }
    }

    #[test]
    fn unresolvable_root_is_fatal() {
        let indexes = indexes_from(&[]);
        assert!(resolve_root(&indexes, "nonexistent").is_err());
    }

    #[test]
    fn fetch_failure_surfaces_as_resolve_error() {
        let indexes = indexes_from(&[
            "Package: foo\nVersion: 1.0\nArchitecture: arm64\nFilename: pool/f/foo_1.0_arm64.deb\n",
        ]);
        let tmp = tempfile::tempdir().unwrap();
        let downloader = NullDownloader;
        let err = resolve_and_download(
            &indexes,
            &["foo".to_owned()],
            vec!["https://example.invalid".to_owned()],
            tmp.path(),
            &downloader,
        )
        .unwrap_err();
        assert!(matches!(err, ResolveError::FetchFailure(_)));
    }
}

// vim: foldmethod=marker

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

//! Builds the two name-keyed indexes the resolver walks: `pkgs_by_name` and
//! `provides_index`. Built once per run from a directory of pre-downloaded
//! `Packages` index files; immutable afterwards.

use crate::architecture::Architecture;
use crate::error::ResolveError;
use crate::record::PackageRecord;
use crate::stanza::parse_stanzas;
use log::debug;
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;
use std::str::FromStr;

/// The two indexes built from a directory of Packages files, plus the
/// single target architecture they were all found to share.
pub struct Indexes {
    /// `name` -> every record found under that name, across all suites,
    /// components, and versions.
    pub pkgs_by_name: HashMap<String, Vec<Rc<PackageRecord>>>,
    /// virtual `name` -> every record that `Provides:` it.
    pub provides_index: HashMap<String, Vec<Rc<PackageRecord>>>,
    /// The architecture this run resolves for.
    pub target_arch: Architecture,
}

/// Split an index file stem `<host>-<suite>-<component>-binary-<arch>`
/// into its four parts plus the architecture token, per §4.4. `host` may
/// itself contain hyphens, so parsing proceeds from the right.
fn parse_stem(stem: &str) -> Result<(String, String, String, String), ResolveError> {
    let bad = || {
        ResolveError::IndexStructural(format!(
            "index file name {stem:?} does not match <host>-<suite>-<component>-binary-<arch>"
        ))
    };

    let (head, arch) = stem.rsplit_once('-').ok_or_else(bad)?;
    let head = head.strip_suffix("-binary").ok_or_else(bad)?;
    let (head, component) = head.rsplit_once('-').ok_or_else(bad)?;
    let (host, suite) = head.rsplit_once('-').ok_or_else(bad)?;

    Ok((
        host.to_owned(),
        suite.to_owned(),
        component.to_owned(),
        arch.to_owned(),
    ))
}

impl Indexes {
    /// Scan every file in `dir`, parse its stanzas, and build both index
    /// maps. Fatal (`IndexStructural`) if the directory is missing, empty,
    /// a file name doesn't match the expected shape, a stanza is malformed
    /// or missing a mandatory field, or target architectures disagree.
    pub fn build(dir: &Path) -> Result<Self, ResolveError> {
        let entries = std::fs::read_dir(dir).map_err(|e| {
            ResolveError::IndexStructural(format!("cannot read index directory {dir:?}: {e}"))
        })?;

        let mut pkgs_by_name: HashMap<String, Vec<Rc<PackageRecord>>> = HashMap::new();
        let mut provides_index: HashMap<String, Vec<Rc<PackageRecord>>> = HashMap::new();
        let mut target_arch: Option<Architecture> = None;
        let mut file_count = 0usize;

        let mut paths: Vec<_> = entries
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| p.is_file())
            .collect();
        paths.sort();

        for path in paths {
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .ok_or_else(|| ResolveError::IndexStructural(format!("non-UTF8 file name {path:?}")))?;
            let (host, suite, component, arch_str) = parse_stem(stem)?;
            let arch = Architecture::from_str(&arch_str)
                .map_err(|_| ResolveError::IndexStructural(format!("empty arch token in {stem:?}")))?;

            match &target_arch {
                None => target_arch = Some(arch.clone()),
                Some(existing) if *existing != arch => {
                    return Err(ResolveError::IndexStructural(format!(
                        "index files disagree on target architecture: {existing} vs {arch} (from {stem:?})"
                    )));
                }
                Some(_) => {}
            }

            let source_hint = format!("{host}/{suite}/{component}/binary-{arch_str}");
            let text = std::fs::read_to_string(&path)
                .map_err(|e| ResolveError::IndexStructural(format!("cannot read {path:?}: {e}")))?;
            let stanzas = parse_stanzas(&text)?;
            debug!("{}: {} stanzas", source_hint, stanzas.len());

            for stanza in &stanzas {
                let record = Rc::new(PackageRecord::from_stanza(stanza, &source_hint)?);
                for virt in record.provides.keys() {
                    provides_index
                        .entry(virt.clone())
                        .or_default()
                        .push(record.clone());
                }
                pkgs_by_name
                    .entry(record.name.clone())
                    .or_default()
                    .push(record);
            }
            file_count += 1;
        }

        let target_arch = target_arch.ok_or_else(|| {
            ResolveError::IndexStructural(format!("no index files found in {dir:?}"))
        })?;
        debug!("loaded {file_count} index file(s) for target arch {target_arch}");

        Ok(Indexes {
            pkgs_by_name,
            provides_index,
            target_arch,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_simple_stem() {
        let (host, suite, component, arch) =
            parse_stem("archive.ubuntu.com-jammy-main-binary-arm64").unwrap();
        assert_eq!(host, "archive.ubuntu.com");
        assert_eq!(suite, "jammy");
        assert_eq!(component, "main");
        assert_eq!(arch, "arm64");
    }

    #[test]
    fn host_may_contain_hyphens() {
        let (host, suite, component, arch) =
            parse_stem("my-mirror-host-jammy-main-binary-amd64").unwrap();
        assert_eq!(host, "my-mirror-host");
        assert_eq!(suite, "jammy");
        assert_eq!(component, "main");
        assert_eq!(arch, "amd64");
    }

    #[test]
    fn rejects_malformed_stem() {
        assert!(parse_stem("not-the-right-shape").is_err());
    }

    fn write_index(dir: &Path, name: &str, contents: &str) {
        std::fs::write(dir.join(name), contents).unwrap();
    }

    #[test]
    fn builds_from_directory() {
        let tmp = tempfile::tempdir().unwrap();
        write_index(
            tmp.path(),
            "archive-jammy-main-binary-arm64.txt",
            "Package: foo\nVersion: 1.0\nArchitecture: arm64\nFilename: pool/f/foo_1.0_arm64.deb\nProvides: virt-foo\n\n",
        );
        let idx = Indexes::build(tmp.path()).unwrap();
        assert_eq!(idx.target_arch, Architecture::Named("arm64".to_owned()));
        assert_eq!(idx.pkgs_by_name["foo"].len(), 1);
        assert_eq!(idx.provides_index["virt-foo"].len(), 1);
    }

    #[test]
    fn mismatched_target_arch_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        write_index(
            tmp.path(),
            "archive-jammy-main-binary-arm64.txt",
            "Package: foo\nVersion: 1.0\nArchitecture: arm64\nFilename: f.deb\n\n",
        );
        write_index(
            tmp.path(),
            "archive-jammy-main-binary-amd64.txt",
            "Package: bar\nVersion: 1.0\nArchitecture: amd64\nFilename: g.deb\n\n",
        );
        assert!(Indexes::build(tmp.path()).is_err());
    }

    #[test]
    fn empty_directory_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(Indexes::build(tmp.path()).is_err());
    }
}

// vim: foldmethod=marker

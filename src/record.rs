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

//! [PackageRecord] -- the typed form of one `Packages` index stanza (or one
//! re-parsed `.deb` control stanza).

use crate::architecture::Architecture;
use crate::dependency::{self, DepGroup};
use crate::priority::Priority;
use crate::stanza::RawParagraph;
use crate::version::Version;
use std::collections::BTreeMap;
use std::str::FromStr;

/// One stanza from a Packages index, or from a re-read `.deb` control file.
#[derive(Clone, Debug)]
pub struct PackageRecord {
    /// `Package`.
    pub name: String,
    /// `Version`.
    pub version: Version,
    /// `Architecture`.
    pub arch: Architecture,
    /// `Filename`, relative pool path, forward-slash separated, with any
    /// leading slash stripped.
    pub filename: String,
    /// Raw `Depends` field text (may be empty).
    pub depends_raw: String,
    /// Raw `Pre-Depends` field text (may be empty).
    pub pre_depends_raw: String,
    /// Parsed `Provides`: virtual name -> optional declared version.
    pub provides: BTreeMap<String, Option<Version>>,
    /// `Multi-Arch`, retained for diagnostics only (§9).
    pub multi_arch: Option<String>,
    /// `Priority`, retained for diagnostics only (§9).
    pub priority: Option<Priority>,
    /// `host/suite/component/platform`, derived by the index builder (C4).
    pub source_hint: String,
}

/// A fault building a [PackageRecord] from a stanza.
#[derive(Debug)]
pub enum Error {
    /// One of `Package`, `Version`, `Architecture`, `Filename` was absent.
    MissingField(&'static str),
    /// `Version` did not parse as a Debian version string.
    InvalidVersion(crate::version::Error),
    /// `Architecture` was empty.
    InvalidArchitecture,
    /// `Provides` used a syntax outside the restricted subgrammar.
    InvalidProvides(dependency::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::MissingField(name) => write!(f, "stanza is missing mandatory field {name:?}"),
            Error::InvalidVersion(e) => write!(f, "invalid Version field: {e}"),
            Error::InvalidArchitecture => write!(f, "empty Architecture field"),
            Error::InvalidProvides(e) => write!(f, "invalid Provides field: {e}"),
        }
    }
}

impl std::error::Error for Error {}

impl PackageRecord {
    /// Build a [PackageRecord] from one [RawParagraph], given the
    /// `source_hint` the caller has already derived (C4) or re-derived
    /// (C9, where the hint of the owning record is simply carried over).
    pub fn from_stanza(stanza: &RawParagraph, source_hint: &str) -> Result<Self, Error> {
        let name = stanza
            .field("Package")
            .ok_or(Error::MissingField("Package"))?
            .to_owned();
        let version_str = stanza.field("Version").ok_or(Error::MissingField("Version"))?;
        let version = Version::from_str(version_str).map_err(Error::InvalidVersion)?;
        let arch_str = stanza
            .field("Architecture")
            .ok_or(Error::MissingField("Architecture"))?;
        let arch = Architecture::from_str(arch_str).map_err(|_| Error::InvalidArchitecture)?;
        let filename = stanza
            .field("Filename")
            .ok_or(Error::MissingField("Filename"))?
            .trim_start_matches('/')
            .to_owned();

        let depends_raw = stanza.field("Depends").unwrap_or("").to_owned();
        let pre_depends_raw = stanza.field("Pre-Depends").unwrap_or("").to_owned();

        let provides = match stanza.field("Provides") {
            Some(raw) if !raw.trim().is_empty() => dependency::parse_provides_field(raw)
                .map_err(Error::InvalidProvides)?
                .into_iter()
                .collect(),
            _ => BTreeMap::new(),
        };

        let multi_arch = stanza.field("Multi-Arch").map(|s| s.to_owned());
        let priority = stanza.field("Priority").and_then(|s| Priority::from_str(s).ok());

        Ok(PackageRecord {
            name,
            version,
            arch,
            filename,
            depends_raw,
            pre_depends_raw,
            provides,
            multi_arch,
            priority,
            source_hint: source_hint.to_owned(),
        })
    }

    /// `Pre-Depends` and `Depends`, concatenated per §4.7 -- both are
    /// required for a bootable offline install and are treated uniformly.
    pub fn install_dependency_groups(&self) -> Result<Vec<DepGroup>, dependency::Error> {
        let combined = match (self.pre_depends_raw.trim(), self.depends_raw.trim()) {
            ("", "") => return Ok(Vec::new()),
            ("", d) => d.to_owned(),
            (p, "") => p.to_owned(),
            (p, d) => format!("{p}, {d}"),
        };
        dependency::parse_dependency_field(&combined)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::stanza::parse_stanzas;

    fn stanza(text: &str) -> RawParagraph {
        parse_stanzas(text).unwrap().remove(0)
    }

    #[test]
    fn minimal_record() {
        let s = stanza("Package: foo\nVersion: 1.0-1\nArchitecture: arm64\nFilename: pool/f/foo_1.0-1_arm64.deb\n");
        let rec = PackageRecord::from_stanza(&s, "archive/jammy/main/binary-arm64").unwrap();
        assert_eq!(rec.name, "foo");
        assert_eq!(rec.arch, Architecture::Named("arm64".to_owned()));
        assert_eq!(rec.filename, "pool/f/foo_1.0-1_arm64.deb");
        assert!(rec.provides.is_empty());
    }

    #[test]
    fn missing_mandatory_field_is_fatal() {
        let s = stanza("Package: foo\nVersion: 1.0-1\n");
        assert!(PackageRecord::from_stanza(&s, "x").is_err());
    }

    #[test]
    fn provides_is_parsed() {
        let s = stanza(
            "Package: bar\nVersion: 1.0\nArchitecture: arm64\nFilename: f.deb\nProvides: foo (= 2.1), other-virtual\n",
        );
        let rec = PackageRecord::from_stanza(&s, "x").unwrap();
        assert_eq!(rec.provides.len(), 2);
        assert_eq!(rec.provides["foo"].as_ref().unwrap().to_string(), "2.1");
        assert!(rec.provides["other-virtual"].is_none());
    }

    #[test]
    fn pre_depends_and_depends_are_concatenated() {
        let s = stanza(
            "Package: bar\nVersion: 1.0\nArchitecture: arm64\nFilename: f.deb\nPre-Depends: a\nDepends: b, c\n",
        );
        let rec = PackageRecord::from_stanza(&s, "x").unwrap();
        let groups = rec.install_dependency_groups().unwrap();
        assert_eq!(groups.len(), 3);
    }
}

// vim: foldmethod=marker

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

//! The `architecture` module contains support for parsing Debian
//! architecture strings, as seen on dependency atoms (`foo:arm64`) and
//! on `Packages` index stanzas (`Architecture: arm64`).
//!
//! Every effort is made to correctly handle the known Debian architectures,
//! but since index files can legitimately contain architectures this crate
//! has never heard of (ports, out-of-tree builds), unknown tokens are kept
//! around rather than rejected.

use std::str::FromStr;

/// A Debian architecture token. This is something like `arm64`, `amd64`, or
/// `kfreebsd-amd64`. The two special tokens `any` and `all` get their own
/// variants since §4.5 treats them differently from a literal arch.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Architecture {
    /// Special "any" token -- used as a dependency arch-qualifier
    /// (`pkg:any`), meaning "any architecture the host can execute".
    Any,

    /// Special "all" token -- an architecture-independent package
    /// (scripts, docs, data files).
    All,

    /// A named, literal architecture such as `arm64` or `amd64`.
    Named(String),
}

/// Error conditions which may be encountered when parsing a String
/// into an [Architecture].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// Returned when the string provided to [Architecture] is empty.
    Empty,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Empty => write!(f, "architecture token is empty"),
        }
    }
}

impl std::error::Error for Error {}

impl Architecture {
    /// Return true if the Architecture has a specific special meaning
    /// rather than naming a concrete CPU/kernel combination.
    pub const fn is_special(&self) -> bool {
        matches!(self, Self::Any | Self::All)
    }

    /// Return the Architecture as our conventional string representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Any => "any",
            Self::All => "all",
            Self::Named(v) => v.as_str(),
        }
    }
}

impl FromStr for Architecture {
    type Err = Error;

    fn from_str(arch: &str) -> Result<Self, Error> {
        Ok(match arch {
            "" => return Err(Error::Empty),
            "any" => Architecture::Any,
            "all" => Architecture::All,
            other => Architecture::Named(other.to_owned()),
        })
    }
}

impl std::fmt::Display for Architecture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_named() {
        let arch: Architecture = "arm64".parse().unwrap();
        assert_eq!(arch, Architecture::Named("arm64".to_owned()));
        assert_eq!(arch.to_string(), "arm64");
    }

    #[test]
    fn parse_special() {
        assert_eq!("any".parse::<Architecture>().unwrap(), Architecture::Any);
        assert_eq!("all".parse::<Architecture>().unwrap(), Architecture::All);
        assert!(Architecture::Any.is_special());
        assert!(!Architecture::Named("arm64".to_owned()).is_special());
    }

    #[test]
    fn empty_is_error() {
        assert_eq!("".parse::<Architecture>(), Err(Error::Empty));
    }

    #[test]
    fn unknown_arch_is_retained() {
        let arch: Architecture = "loong64".parse().unwrap();
        assert_eq!(arch.as_str(), "loong64");
    }
}

// vim: foldmethod=marker

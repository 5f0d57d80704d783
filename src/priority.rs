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

//! `Priority` is retained on a [crate::record::PackageRecord] for
//! diagnostics only -- per §9's Open Questions, it is not consulted by
//! the resolver.

use std::str::FromStr;

/// Each package must have a priority value, which is set in the metadata for
/// the Debian archive and is also included in the package's control files.
/// This information is used to control which packages are included in
/// standard or minimal Debian installations.
///
/// Most Debian packages will have a priority of `optional`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Priority {
    /// Packages necessary for the proper functioning of the system.
    Required,
    /// Important programs one would expect to find on any Unix-like system.
    Important,
    /// A reasonably small but not too limited character-mode system.
    Standard,
    /// The default priority for the majority of the archive.
    Optional,
    /// Deprecated; treated as equivalent to `optional`.
    Extra,
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "required" => Priority::Required,
            "important" => Priority::Important,
            "standard" => Priority::Standard,
            "optional" => Priority::Optional,
            "extra" => Priority::Extra,
            other => return Err(format!("unknown priority {:?}", other)),
        })
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Priority::Required => "required",
            Priority::Important => "important",
            Priority::Standard => "standard",
            Priority::Optional => "optional",
            Priority::Extra => "extra",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn round_trips() {
        for p in ["required", "important", "standard", "optional", "extra"] {
            let parsed: Priority = p.parse().unwrap();
            assert_eq!(parsed.to_string(), p);
        }
    }

    #[test]
    fn unknown_is_error() {
        assert!("bogus".parse::<Priority>().is_err());
    }
}

// vim: foldmethod=marker

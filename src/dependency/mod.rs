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

//! Parses `Depends`/`Pre-Depends`/`Provides` field values into typed
//! [DepAtom]s and [DepGroup]s.
//!
//! This crate does **not** support dpkg substvars (`${shlibs:Depends}` and
//! friends) -- by the time an index or a `.deb`'s control data is read,
//! those have always already been expanded by the package's build.
//!
//! ```
//! use debclose::dependency::parse_dependency_field;
//!
//! let groups = parse_dependency_field("foo:any (>= 1.0) | bar, baz").unwrap();
//! assert_eq!(groups.len(), 2);
//! assert_eq!(groups[0].atoms.len(), 2);
//! ```

mod atom;
mod error;

use pest_derive::Parser;

pub use atom::{ArchQualifier, DepAtom, DepGroup};
pub use error::Error;

#[derive(Parser)]
#[grammar = "dependency/grammar.pest"]
pub(crate) struct DependencyParser;

pub(crate) use DependencyParser as Grammar;
pub(crate) use Rule as GrammarRule;

/// Parse one `Depends`/`Pre-Depends`-style field value into its ordered
/// list of [DepGroup]s (comma = AND, `|` = OR within a group).
pub fn parse_dependency_field(input: &str) -> Result<Vec<DepGroup>, Error> {
    atom::parse_field(input)
}

/// Parse one `Provides` field value into a list of (virtual name,
/// optional declared version) pairs, per the restricted Provides
/// subgrammar: `name [(= ver)]`, comma-separated, no alternatives.
pub fn parse_provides_field(
    input: &str,
) -> Result<Vec<(String, Option<crate::version::Version>)>, Error> {
    atom::parse_provides(input)
}

// vim: foldmethod=marker

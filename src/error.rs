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

//! The single error taxonomy surfaced through the CLI (§7). Every fallible
//! library function returns `Result<_, ResolveError>` (or a narrower error
//! that converts into it).

use crate::{dependency, record, stanza};

/// The five fatal error kinds this crate can raise. Propagation policy is
/// fail-loud, fail-fast: nothing here is ever demoted to a warning.
#[derive(thiserror::Error, Debug)]
pub enum ResolveError {
    /// Missing directory, no index files, malformed stanza, missing
    /// mandatory field, or inconsistent target architecture across index
    /// files. Fatal at startup.
    #[error("index error: {0}")]
    IndexStructural(String),

    /// Malformed dependency or Provides syntax, unknown operator, illegal
    /// name. Fatal at the point encountered.
    #[error("parse error: {0}")]
    ParseError(String),

    /// No atom in a dependency group resolved, or a top-level name has no
    /// viable record.
    #[error("unsatisfied dependency: {0}")]
    Unsatisfied(String),

    /// All base URLs failed for one artifact.
    #[error("failed to fetch artifact: {0}")]
    FetchFailure(String),

    /// A downloaded `.deb` could not be opened or its control data could
    /// not be parsed.
    #[error("failed to read control data: {0}")]
    ControlReadError(String),
}

impl From<stanza::Error> for ResolveError {
    fn from(e: stanza::Error) -> Self {
        ResolveError::IndexStructural(e.to_string())
    }
}

impl From<dependency::Error> for ResolveError {
    fn from(e: dependency::Error) -> Self {
        ResolveError::ParseError(e.to_string())
    }
}

impl From<record::Error> for ResolveError {
    fn from(e: record::Error) -> Self {
        match e {
            record::Error::InvalidProvides(de) => ResolveError::ParseError(de.to_string()),
            other => ResolveError::IndexStructural(other.to_string()),
        }
    }
}

// vim: foldmethod=marker

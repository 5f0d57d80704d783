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

#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
#![deny(unused_import_braces)]
#![deny(unused_qualifications)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

//! `debclose` computes the transitive closure of Debian package
//! installation dependencies starting from a set of user-named top-level
//! packages, and downloads the corresponding `.deb` artifacts into a flat
//! local directory -- an offline-installable bundle.
//!
//! Given pre-downloaded `Packages` index files ([index]), it parses
//! dependency expressions ([dependency]), compares [version] numbers,
//! resolves virtual packages and architecture qualifiers ([resolve]),
//! and walks the dependency graph ([walker]) to a fixed point, re-reading
//! each downloaded `.deb`'s own control data ([control_reader]) rather
//! than trusting a potentially stale index.
//!
//! # Introduction
//!
//! Common concerns are broken out into modules: [version] for Debian
//! version ordering, [architecture] for architecture tokens, [dependency]
//! for dependency-expression parsing, [stanza] for the RFC822-style
//! control-file tokenizer, and [record]/[index] for the typed package
//! data model built from a directory of indexes.

pub mod architecture;
pub mod control_reader;
pub mod dependency;
pub mod error;
pub mod fetch;
pub mod index;
pub mod priority;
pub mod record;
pub mod resolve;
pub mod stanza;
pub mod version;
pub mod walker;

// vim: foldmethod=marker

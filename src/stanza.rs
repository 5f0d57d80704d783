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

//! Tokenizes RFC822-style "control file" text -- the format used by Debian
//! `Packages` indexes and by the `control` member inside a `.deb`'s
//! `control.tar.*` -- into ordered stanzas of key/value fields.
//!
//! Unlike a general-purpose deserializer, this is a direct, single-pass
//! line loop: callers that need a typed record build one from a
//! [RawParagraph] themselves (see [crate::record]).

/// One `Key: value` pair from a stanza, in the order it was encountered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawField {
    /// The field name, e.g. `Package`.
    pub key: String,
    /// The field value, with continuation lines joined by `\n` and their
    /// leading whitespace stripped.
    pub value: String,
}

/// One paragraph (stanza) of a control file: an ordered list of fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawParagraph {
    /// Fields, in the order they appeared in the source text.
    pub fields: Vec<RawField>,
}

impl RawParagraph {
    /// Return the value of the first field with a case-sensitive key match,
    /// if any. Debian field names are conventionally capitalized, and this
    /// crate does not fold case.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.value.as_str())
    }
}

/// A fault encountered while tokenizing stanza text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// A continuation line (leading whitespace) appeared before any `Key:`
    /// line had been seen in the current stanza.
    ContinuationBeforeKey {
        /// 1-based line number within the input text.
        line: usize,
    },
    /// A non-blank line contained no `:` separator.
    MissingColon {
        /// 1-based line number within the input text.
        line: usize,
    },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::ContinuationBeforeKey { line } => {
                write!(f, "line {line}: continuation line before any field")
            }
            Error::MissingColon { line } => {
                write!(f, "line {line}: expected \"Key: value\", no ':' found")
            }
        }
    }
}

impl std::error::Error for Error {}

/// Parse `text` into an ordered list of stanzas.
///
/// Blank lines separate stanzas. A stanza lacking a trailing blank line at
/// end-of-input is still emitted.
pub fn parse_stanzas(text: &str) -> Result<Vec<RawParagraph>, Error> {
    let mut stanzas = Vec::new();
    let mut current = RawParagraph::default();

    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim_end_matches('\r');

        if line.trim().is_empty() {
            if !current.fields.is_empty() {
                stanzas.push(std::mem::take(&mut current));
            }
            continue;
        }

        if line.starts_with(' ') || line.starts_with('\t') {
            let Some(last) = current.fields.last_mut() else {
                return Err(Error::ContinuationBeforeKey { line: line_no });
            };
            last.value.push('\n');
            last.value.push_str(line.trim_start());
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            return Err(Error::MissingColon { line: line_no });
        };
        current.fields.push(RawField {
            key: key.trim().to_owned(),
            value: value.trim().to_owned(),
        });
    }

    if !current.fields.is_empty() {
        stanzas.push(current);
    }

    Ok(stanzas)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn single_stanza() {
        let stanzas = parse_stanzas("Package: foo\nVersion: 1.0\n").unwrap();
        assert_eq!(stanzas.len(), 1);
        assert_eq!(stanzas[0].field("Package"), Some("foo"));
        assert_eq!(stanzas[0].field("Version"), Some("1.0"));
    }

    #[test]
    fn continuation_line_joins_with_newline() {
        let stanzas = parse_stanzas("Package: foo\nDescription: short\n long line one\n .\n more\n").unwrap();
        assert_eq!(
            stanzas[0].field("Description"),
            Some("short\nlong line one\n.\nmore")
        );
    }

    #[test]
    fn multiple_stanzas_separated_by_blank_line() {
        let stanzas = parse_stanzas("Package: a\n\nPackage: b\n").unwrap();
        assert_eq!(stanzas.len(), 2);
        assert_eq!(stanzas[0].field("Package"), Some("a"));
        assert_eq!(stanzas[1].field("Package"), Some("b"));
    }

    #[test]
    fn no_trailing_blank_line_still_emits_stanza() {
        let stanzas = parse_stanzas("Package: a").unwrap();
        assert_eq!(stanzas.len(), 1);
    }

    #[test]
    fn multiple_blank_lines_collapse() {
        let stanzas = parse_stanzas("Package: a\n\n\n\nPackage: b\n").unwrap();
        assert_eq!(stanzas.len(), 2);
    }

    #[test]
    fn continuation_before_any_key_is_fatal() {
        let err = parse_stanzas(" leading space\nPackage: a\n").unwrap_err();
        assert_eq!(err, Error::ContinuationBeforeKey { line: 1 });
    }

    #[test]
    fn missing_colon_is_fatal() {
        let err = parse_stanzas("Package: a\nthis has no colon\n").unwrap_err();
        assert_eq!(err, Error::MissingColon { line: 2 });
    }

    #[test]
    fn empty_input_yields_no_stanzas() {
        let stanzas = parse_stanzas("").unwrap();
        assert!(stanzas.is_empty());
    }
}

// vim: foldmethod=marker

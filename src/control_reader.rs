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

//! Re-reads `Depends`/`Pre-Depends` from a downloaded `.deb`'s own control
//! data (C9). A `.deb` is an `ar(1)` archive holding, in order,
//! `debian-binary`, a compressed `control.tar.*` member, and a compressed
//! `data.tar.*` member. Mirrors can drift from their indexes, so C7 treats
//! this re-parse as authoritative.

use crate::error::ResolveError;
use crate::stanza::{parse_stanzas, RawParagraph};
use std::io::Read;
use std::path::Path;

fn decompress_member(name: &str, raw: Vec<u8>) -> Result<Vec<u8>, String> {
    if name.ends_with(".tar.gz") {
        let mut out = Vec::new();
        flate2::read::GzDecoder::new(raw.as_slice())
            .read_to_end(&mut out)
            .map_err(|e| e.to_string())?;
        Ok(out)
    } else if name.ends_with(".tar.xz") {
        let mut out = Vec::new();
        xz2::read::XzDecoder::new(raw.as_slice())
            .read_to_end(&mut out)
            .map_err(|e| e.to_string())?;
        Ok(out)
    } else if name.ends_with(".tar.zst") {
        zstd::stream::decode_all(raw.as_slice()).map_err(|e| e.to_string())
    } else if name.ends_with(".tar") {
        Ok(raw)
    } else {
        Err(format!("unrecognized control member compression: {name}"))
    }
}

/// Open `deb_path`, locate and decompress its `control.tar.*` member, find
/// `./control` within it, and tokenize it into a single [RawParagraph].
pub fn read_control(deb_path: &Path) -> Result<RawParagraph, ResolveError> {
    let context = || format!("{}", deb_path.display());
    let err = |msg: String| ResolveError::ControlReadError(format!("{}: {msg}", context()));

    let file = std::fs::File::open(deb_path).map_err(|e| err(format!("cannot open: {e}")))?;
    let mut archive = ar::Archive::new(file);

    let mut control_tar = None;
    while let Some(entry) = archive.next_entry() {
        let mut entry = entry.map_err(|e| err(format!("cannot read ar entry: {e}")))?;
        let name = String::from_utf8_lossy(entry.header().identifier()).to_string();
        if name.starts_with("control.tar") {
            let mut raw = Vec::new();
            entry
                .read_to_end(&mut raw)
                .map_err(|e| err(format!("cannot read {name}: {e}")))?;
            control_tar = Some(decompress_member(&name, raw).map_err(&err)?);
            break;
        }
    }

    let control_tar =
        control_tar.ok_or_else(|| err("no control.tar.* member found in ar archive".to_owned()))?;

    let mut tar = tar::Archive::new(control_tar.as_slice());
    let entries = tar
        .entries()
        .map_err(|e| err(format!("cannot read control.tar entries: {e}")))?;

    for entry in entries {
        let mut entry = entry.map_err(|e| err(format!("cannot read tar entry: {e}")))?;
        let path = entry
            .path()
            .map_err(|e| err(format!("cannot read tar entry path: {e}")))?
            .to_string_lossy()
            .to_string();
        if path == "./control" || path == "control" {
            let mut text = String::new();
            entry
                .read_to_string(&mut text)
                .map_err(|e| err(format!("cannot read control member: {e}")))?;
            let mut stanzas = parse_stanzas(&text)
                .map_err(|e| err(format!("cannot tokenize control member: {e}")))?;
            return stanzas
                .pop()
                .ok_or_else(|| err("control member contained no stanza".to_owned()));
        }
    }

    Err(err("control.tar.* did not contain a ./control member".to_owned()))
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write as _;

    fn build_fake_deb(control_text: &[u8]) -> Vec<u8> {
        let mut control_tar = Vec::new();
        {
            let mut builder = tar::Builder::new(&mut control_tar);
            let mut header = tar::Header::new_gnu();
            header.set_size(control_text.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append_data(&mut header, "./control", control_text)
                .unwrap();
            builder.finish().unwrap();
        }

        let mut ar_bytes = Vec::new();
        {
            let mut builder = ar::Builder::new(&mut ar_bytes);
            let header = ar::Header::new(b"control.tar".to_vec(), control_tar.len() as u64);
            builder.append(&header, control_tar.as_slice()).unwrap();
        }
        ar_bytes
    }

    #[test]
    fn reads_control_from_fake_deb() {
        let control_text = b"Package: foo\nVersion: 1.0\nArchitecture: arm64\nDepends: bar\n";
        let deb_bytes = build_fake_deb(control_text);

        let tmp = tempfile::tempdir().unwrap();
        let deb_path = tmp.path().join("foo_1.0_arm64.deb");
        std::fs::File::create(&deb_path)
            .unwrap()
            .write_all(&deb_bytes)
            .unwrap();

        let stanza = read_control(&deb_path).unwrap();
        assert_eq!(stanza.field("Package"), Some("foo"));
        assert_eq!(stanza.field("Depends"), Some("bar"));
    }

    #[test]
    fn missing_ar_member_is_control_read_error() {
        let tmp = tempfile::tempdir().unwrap();
        let deb_path = tmp.path().join("bad.deb");
        std::fs::write(&deb_path, b"not an ar archive at all").unwrap();
        let err = read_control(&deb_path).unwrap_err();
        assert!(matches!(err, ResolveError::ControlReadError(_)));
    }
}

// vim: foldmethod=marker

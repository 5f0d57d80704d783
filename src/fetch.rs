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

//! Materializes `.deb` artifacts on disk (C8). A single-threaded, blocking
//! HTTP client is used throughout: §5 establishes the whole tool as
//! single-threaded and cooperative, so there is no async runtime here.

use crate::error::ResolveError;
use crate::record::PackageRecord;
use log::{debug, warn};
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Abstracts "given a URL, produce bytes or fail" so the walker isn't
/// wedded to one HTTP stack; the default implementation wired into the CLI
/// is [CurlDownloader].
pub trait Downloader {
    /// Perform a blocking GET against `url`, returning the response body
    /// on a 2xx status, or an error message otherwise.
    fn get(&self, url: &str) -> Result<Vec<u8>, String>;
}

/// The default [Downloader], backed by `curl`'s blocking `Easy` handle.
#[derive(Default)]
pub struct CurlDownloader;

impl Downloader for CurlDownloader {
    fn get(&self, url: &str) -> Result<Vec<u8>, String> {
        let mut body = Vec::new();
        let mut handle = curl::easy::Easy::new();
        handle.url(url).map_err(|e| e.to_string())?;
        handle.follow_location(true).map_err(|e| e.to_string())?;
        {
            let mut transfer = handle.transfer();
            transfer
                .write_function(|data| {
                    body.extend_from_slice(data);
                    Ok(data.len())
                })
                .map_err(|e| e.to_string())?;
            transfer.perform().map_err(|e| e.to_string())?;
        }
        let status = handle.response_code().map_err(|e| e.to_string())?;
        if !(200..300).contains(&status) {
            return Err(format!("HTTP status {status}"));
        }
        Ok(body)
    }
}

/// Materialize `record`'s `.deb` under `download_dir`, trying each of
/// `base_urls` in order. Returns the local path. Idempotent: an on-disk
/// file with the expected name short-circuits the network entirely.
pub fn fetch_artifact(
    record: &PackageRecord,
    base_urls: &[String],
    download_dir: &Path,
    downloader: &dyn Downloader,
    visited_filenames: &mut HashSet<String>,
) -> Result<PathBuf, ResolveError> {
    let file_name = record
        .filename
        .rsplit('/')
        .next()
        .unwrap_or(record.filename.as_str());
    let local_path = download_dir.join(file_name);

    if visited_filenames.contains(&record.filename) || local_path.exists() {
        debug!("{} already present at {}", record.filename, local_path.display());
        visited_filenames.insert(record.filename.clone());
        return Ok(local_path);
    }

    std::fs::create_dir_all(download_dir).map_err(|e| {
        ResolveError::FetchFailure(format!("cannot create download dir {download_dir:?}: {e}"))
    })?;

    let mut attempted = Vec::new();
    for base in base_urls {
        let url = format!(
            "{}/{}",
            base.trim_end_matches('/'),
            record.filename.trim_start_matches('/')
        );
        debug!("fetching {} from {}", record.filename, url);
        match downloader.get(&url) {
            Ok(body) => {
                let tmp_path = local_path.with_extension("part");
                let mut f = std::fs::File::create(&tmp_path).map_err(|e| {
                    ResolveError::FetchFailure(format!("cannot write {tmp_path:?}: {e}"))
                })?;
                f.write_all(&body).map_err(|e| {
                    ResolveError::FetchFailure(format!("cannot write {tmp_path:?}: {e}"))
                })?;
                drop(f);
                std::fs::rename(&tmp_path, &local_path).map_err(|e| {
                    ResolveError::FetchFailure(format!("cannot finalize {local_path:?}: {e}"))
                })?;
                visited_filenames.insert(record.filename.clone());
                return Ok(local_path);
            }
            Err(e) => {
                warn!("fetch of {url} failed: {e}");
                attempted.push(format!("{url} ({e})"));
            }
        }
    }

    Err(ResolveError::FetchFailure(format!(
        "all base URLs failed for {}: [{}]",
        record.filename,
        attempted.join(", ")
    )))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::architecture::Architecture;
    use crate::version::Version;
    use std::str::FromStr;

    struct FakeDownloader {
        fail_first: bool,
    }

    impl Downloader for FakeDownloader {
        fn get(&self, url: &str) -> Result<Vec<u8>, String> {
            if self.fail_first && url.contains("bad-mirror") {
                return Err("connection refused".to_owned());
            }
            Ok(b"fake deb contents".to_vec())
        }
    }

    fn sample_record() -> PackageRecord {
        PackageRecord {
            name: "foo".to_owned(),
            version: Version::from_str("1.0").unwrap(),
            arch: Architecture::Named("arm64".to_owned()),
            filename: "pool/f/foo_1.0_arm64.deb".to_owned(),
            depends_raw: String::new(),
            pre_depends_raw: String::new(),
            provides: Default::default(),
            multi_arch: None,
            priority: None,
            source_hint: "x".to_owned(),
        }
    }

    #[test]
    fn fetches_and_writes_file() {
        let tmp = tempfile::tempdir().unwrap();
        let dl = FakeDownloader { fail_first: false };
        let mut visited = HashSet::new();
        let path = fetch_artifact(
            &sample_record(),
            &["https://example.invalid".to_owned()],
            tmp.path(),
            &dl,
            &mut visited,
        )
        .unwrap();
        assert!(path.exists());
        assert_eq!(std::fs::read(&path).unwrap(), b"fake deb contents");
    }

    #[test]
    fn falls_back_to_next_base_url() {
        let tmp = tempfile::tempdir().unwrap();
        let dl = FakeDownloader { fail_first: true };
        let mut visited = HashSet::new();
        let path = fetch_artifact(
            &sample_record(),
            &["https://bad-mirror.invalid".to_owned(), "https://good.invalid".to_owned()],
            tmp.path(),
            &dl,
            &mut visited,
        )
        .unwrap();
        assert!(path.exists());
    }

    #[test]
    fn existing_file_short_circuits_network() {
        let tmp = tempfile::tempdir().unwrap();
        let record = sample_record();
        let local_path = tmp.path().join("foo_1.0_arm64.deb");
        std::fs::write(&local_path, b"already here").unwrap();

        struct PanicDownloader;
        impl Downloader for PanicDownloader {
            fn get(&self, _url: &str) -> Result<Vec<u8>, String> {
                panic!("network should not be touched");
            }
        }

        let mut visited = HashSet::new();
        let path = fetch_artifact(&record, &["https://x.invalid".to_owned()], tmp.path(), &PanicDownloader, &mut visited).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"already here");
    }
}

// vim: foldmethod=marker

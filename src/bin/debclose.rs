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

use clap::Parser;
use debclose::error::ResolveError;
use debclose::fetch::CurlDownloader;
use debclose::index::Indexes;
use debclose::walker::resolve_and_download;
use log::error;
use std::path::PathBuf;
use std::process::ExitCode;

/// Assemble an offline-installable set of Debian `.deb` packages by
/// resolving the transitive install closure of one or more top-level
/// package names against a directory of pre-downloaded Packages indexes.
#[derive(Parser, Debug)]
#[command(name = "debclose", version, about)]
struct Args {
    /// Comma-separated mirror base URLs, tried in order per artifact.
    #[arg(long, default_value = "https://archive.ubuntu.com/ubuntu")]
    base_url: String,

    /// One or more top-level package names to resolve (DepAtom syntax permitted).
    #[arg(long, required = true, num_args = 1..)]
    packages: Vec<String>,

    /// Directory holding the pre-downloaded Packages index files.
    #[arg(long, default_value = "./indexes")]
    index_dir: PathBuf,

    /// Directory `.deb` artifacts are written to.
    #[arg(long, default_value = "./packages")]
    download_dir: PathBuf,

    /// Raise the log level (repeatable: -v = debug, -vv = trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logger(verbosity: u8) {
    let default_level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .init();
}

fn exit_code_for(err: &ResolveError) -> u8 {
    match err {
        ResolveError::IndexStructural(_) => 2,
        ResolveError::ParseError(_) => 3,
        ResolveError::Unsatisfied(_) => 4,
        ResolveError::FetchFailure(_) => 5,
        ResolveError::ControlReadError(_) => 6,
    }
}

fn run(args: Args) -> Result<(), ResolveError> {
    let indexes = Indexes::build(&args.index_dir)?;
    let base_urls: Vec<String> = args
        .base_url
        .split(',')
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
        .collect();
    let downloader = CurlDownloader;
    resolve_and_download(
        &indexes,
        &args.packages,
        base_urls,
        &args.download_dir,
        &downloader,
    )
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logger(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::from(exit_code_for(&err))
        }
    }
}

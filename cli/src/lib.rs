#![allow(missing_docs)]

use std::{fs, path::PathBuf, process::ExitCode, time::Instant};

use anyhow::Context;
use clap::Parser;
use clap_verbosity_flag::Verbosity;
use env_logger::Env;
use log::{debug, error, info};
use refdata::{Exporter, Source};

// Default to debug logs on debug builds, info otherwise
#[cfg(debug_assertions)]
type RefdataVerbosity = Verbosity<clap_verbosity_flag::DebugLevel>;
#[cfg(not(debug_assertions))]
type RefdataVerbosity = Verbosity<clap_verbosity_flag::InfoLevel>;

#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// The directory to write the JSON file into
    #[arg(short = 'o', long, default_value = ".")]
    out_dir: PathBuf,

    /// Download the package from this URL instead of the default
    #[arg(long, conflicts_with = "local")]
    url: Option<String>,

    /// Install the package from a local file instead of downloading it
    #[arg(long)]
    local: Option<PathBuf>,

    #[command(flatten)]
    verbosity: RefdataVerbosity,
}

impl Args {
    fn source(&self) -> Option<Source> {
        match (&self.url, &self.local) {
            (_, Some(local)) => Some(Source::Local(local.clone())),
            (Some(url), None) => Some(Source::Remote(url.clone())),
            (None, None) => None,
        }
    }
}

/// Entrypoint shared by all the `get-*` binaries.
///
/// `with_source` points the exporter at a non-default package location when
/// `--url` or `--local` is passed.
pub fn run<E: Exporter + Default>(
    with_source: impl FnOnce(E, Source) -> E,
) -> ExitCode {
    let args = Args::parse();

    env_logger::builder()
        .filter_level(args.verbosity.log_level_filter())
        .parse_env(Env::new().filter("REFDATA_LOG"))
        .init();

    exit_code(&args, with_source)
}

fn exit_code<E: Exporter + Default>(
    args: &Args,
    with_source: impl FnOnce(E, Source) -> E,
) -> ExitCode {
    match _main(args, with_source) {
        Ok(()) => ExitCode::SUCCESS,
        Err(why) => {
            error!("{why}");
            debug!("{why:?}");
            ExitCode::FAILURE
        },
    }
}

fn _main<E: Exporter + Default>(
    args: &Args,
    with_source: impl FnOnce(E, Source) -> E,
) -> anyhow::Result<()> {
    let exporter = match args.source() {
        Some(source) => with_source(E::default(), source),
        None => E::default(),
    };

    fs::create_dir_all(&args.out_dir).with_context(|| {
        format!("failed to create {}", args.out_dir.display())
    })?;

    let start = Instant::now();
    let written = refdata::export(&exporter, &args.out_dir)?;
    info!("Exported {} in {:?}", written.display(), start.elapsed());
    Ok(())
}

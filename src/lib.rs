//! Core library entry for the `tstransform` CLI.
//!
//! Source files carry `///ts:` directive comments; each run regenerates the
//! lines below every directive from the current set of target files.

pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod ports;
pub mod transform;

#[cfg(test)]
mod test_support;

use clap::Parser;
use env_logger::{Builder, Env, Target};
use log::LevelFilter;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    init_logging(cli.verbose, cli.quiet);
    commands::dispatch(&cli)
}

fn init_logging(verbose: bool, quiet: bool) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    } else if quiet {
        builder.filter_level(LevelFilter::Warn);
    }
    builder.target(Target::Stderr).format_timestamp(None);
    // Already initialized when run() is called more than once in a process.
    let _ = builder.try_init();
}

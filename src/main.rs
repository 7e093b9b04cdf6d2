//! Binary entrypoint for the `tstransform` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    // Recording is handled in commands::dispatch via TSTRANSFORM_RECORD=<file>.
    match tstransform::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

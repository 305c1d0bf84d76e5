#![allow(missing_docs)]

use std::process::ExitCode;

use refdata::ColorNames;

fn main() -> ExitCode {
    refdata_cli::run(ColorNames::with_source)
}

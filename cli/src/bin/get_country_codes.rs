#![allow(missing_docs)]

use std::process::ExitCode;

use refdata::CountryCodes;

fn main() -> ExitCode {
    refdata_cli::run(CountryCodes::with_source)
}

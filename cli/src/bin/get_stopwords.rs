#![allow(missing_docs)]

use std::process::ExitCode;

use refdata::Stopwords;

fn main() -> ExitCode {
    refdata_cli::run(Stopwords::with_source)
}

//! cityatlas CLI - European Cities Atlas viewer

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use std::process::ExitCode;

fn main() -> ExitCode {
    cityatlas::cli::run()
}

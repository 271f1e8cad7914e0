//! testfile - declarative shell test runner
//!
//! Runs the tests described in one or more YAML Testfiles, with optional
//! one-time and per-test setup/teardown fixtures.

use clap::Parser;
use testfile::cli::{self, Cli};
use testfile::common::logging;

fn main() {
    logging::init_cli();

    let cli = Cli::parse();

    match cli::run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

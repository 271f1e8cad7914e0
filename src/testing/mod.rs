//! Testfile runner
//!
//! Reads a YAML Testfile of shell tests with optional setup/teardown
//! fixtures, runs them in order through a shell and reports pass/fail per
//! test.

mod command;
mod config;
mod report;
mod runner;

pub use command::{CommandRunner, ExecutionResult, Script, ShellRunner, STATEMENT_SEPARATOR};
pub use config::{FixtureConfig, TestCase, TestKind, TestSuiteConfig};
pub use report::{
    decorate, format_outcome, format_verbose, ConsoleReporter, Reporter, TestOutcome,
};
pub use runner::run_suite;

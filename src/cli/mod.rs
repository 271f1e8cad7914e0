//! CLI command handling
//!
//! Loads each Testfile named on the command line and hands it to the runner.

use std::path::PathBuf;

use clap::{CommandFactory, Parser};

use crate::common::config::Config;
use crate::common::Result;
use crate::testing::{run_suite, ConsoleReporter, ShellRunner, TestSuiteConfig};

/// Conventional Testfile name used when no `--file` is given
pub const DEFAULT_TESTFILE: &str = "Testfile";

#[derive(Parser, Debug)]
#[command(name = "testfile", about = "Run shell tests described in a YAML Testfile")]
#[command(version, long_about = None)]
pub struct Cli {
    /// Testfile(s) to run, in order
    #[arg(short, long = "file", num_args = 1.., default_value = DEFAULT_TESTFILE)]
    pub files: Vec<PathBuf>,

    /// Print stdout, stderr and exit status of every command
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored PASS/FAILED markers
    #[arg(long)]
    pub no_color: bool,
}

/// Run every Testfile and return the process exit code
///
/// Stops at the first file whose run ends with a non-zero code, or with 1 at
/// the first file that does not exist.
pub fn run(cli: Cli) -> Result<i32> {
    let config = Config::load()?;
    let color = config.output.color && !cli.no_color;
    let mut runner = ShellRunner::new(config.shell);

    for path in &cli.files {
        if !path.is_file() {
            eprintln!("{} not found\n", path.display());
            Cli::command().print_help()?;
            return Ok(1);
        }

        let suite = TestSuiteConfig::load(path)?;
        tracing::info!(file = %path.display(), "Running Testfile");

        let mut reporter = ConsoleReporter::stdout(cli.verbose, color);
        let code = run_suite(&suite, &mut runner, &mut reporter)?;
        if code != 0 {
            tracing::warn!(file = %path.display(), code, "Testfile run failed");
            return Ok(code);
        }
    }

    Ok(0)
}

//! Result reporting
//!
//! One line per test on stdout, plus an optional dump of every command's
//! captured output when running verbosely.

use std::io::Write;

use colored::Colorize;

use super::command::ExecutionResult;

/// Final outcome of one entry of `tests`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestOutcome {
    pub name: String,
    /// The steps script that was (or would have been) run
    pub body: String,
    /// Exit status recorded for the test
    pub status: i32,
    pub disabled: bool,
}

impl TestOutcome {
    pub fn passed(&self) -> bool {
        self.status == 0
    }

    /// Outcome of a test that was skipped because it is disabled
    pub fn disabled(name: &str) -> Self {
        Self {
            name: name.to_string(),
            body: String::new(),
            status: 0,
            disabled: true,
        }
    }
}

/// Receives results and command diagnostics from the engine
///
/// Reporting is observational: nothing a reporter does feeds back into
/// sequencing.
pub trait Reporter {
    /// Called once per entry of `tests`, in order
    fn test_finished(&mut self, outcome: &TestOutcome);

    /// Called after every command the engine executes
    fn command_finished(&mut self, result: &ExecutionResult);
}

/// Writes human-readable results to a stream, normally stdout
pub struct ConsoleReporter<W: Write> {
    out: W,
    verbose: bool,
    color: bool,
}

impl ConsoleReporter<std::io::Stdout> {
    pub fn stdout(verbose: bool, color: bool) -> Self {
        Self::new(std::io::stdout(), verbose, color)
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, verbose: bool, color: bool) -> Self {
        Self {
            out,
            verbose,
            color,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{}", text) {
            tracing::debug!("Failed to write report: {}", e);
        }
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn test_finished(&mut self, outcome: &TestOutcome) {
        let text = format_outcome(outcome, self.color);
        self.emit(&text);
    }

    fn command_finished(&mut self, result: &ExecutionResult) {
        if self.verbose {
            let text = format_verbose(result);
            self.emit(&text);
        }
    }
}

/// Decorate `label` green for a zero status and red otherwise
pub fn decorate(label: &str, status: i32, color: bool) -> String {
    if !color {
        label.to_string()
    } else if status == 0 {
        label.green().to_string()
    } else {
        label.red().to_string()
    }
}

/// Render the result line(s) for one test
pub fn format_outcome(outcome: &TestOutcome, color: bool) -> String {
    let verdict = if outcome.passed() { "PASS" } else { "FAILED" };
    let mut text = format!(
        "{} ... {}",
        outcome.name,
        decorate(verdict, outcome.status, color)
    );

    if outcome.disabled {
        let marker = if color {
            "(disabled)".dimmed().to_string()
        } else {
            "(disabled)".to_string()
        };
        text.push(' ');
        text.push_str(&marker);
    }

    if !outcome.passed() {
        text.push_str(&format!(
            "\nCommand '{}' failed; expected exitcode {}, but was {}",
            outcome.body, 0, outcome.status
        ));
    }

    text
}

/// Render the captured output of one command
pub fn format_verbose(result: &ExecutionResult) -> String {
    format!(
        "Out: [\n{}\n]\nErr: [\n{}\n]\nReturncode: {}",
        result.stdout, result.stderr, result.status
    )
}
